//! User-facing messages for failed operations.
//!
//! Reads the classification already made by the client (status code, error
//! kind) and phrases it for a person; it never reclassifies.

use std::error::Error as StdError;
use std::fmt;

use crate::retry::ClientError;

/// What the caller was doing when the error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Delete,
    Import,
}

impl Operation {
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Delete => "delete",
            Operation::Import => "import",
        }
    }

    pub fn gerund(&self) -> &'static str {
        match self {
            Operation::Create => "creating",
            Operation::Read => "reading",
            Operation::Delete => "deleting",
            Operation::Import => "importing",
        }
    }

    fn title(&self) -> String {
        let verb = self.verb();
        let mut chars = verb.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }
}

/// The resource an operation targeted.
#[derive(Debug, Clone, Copy)]
pub struct ErrorContext<'a> {
    /// E.g. "Cache" or "User".
    pub resource_type: &'a str,
    pub resource_name: &'a str,
    pub operation: Operation,
}

/// A summary line plus a longer explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub summary: String,
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.summary, self.detail)
    }
}

/// Outcome of reading a resource that may have disappeared remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The API reported 404: the resource is gone and should be forgotten.
    Removed,
    Failed(Diagnostic),
}

/// `err` followed by its sources, joined with ": ".
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        out.push_str(": ");
        out.push_str(&e.to_string());
        source = e.source();
    }
    out
}

/// Phrase a client error for the user.
pub fn describe(ctx: &ErrorContext<'_>, err: &ClientError) -> Diagnostic {
    let ErrorContext {
        resource_type,
        resource_name,
        operation,
    } = *ctx;

    // Wrappers mark which step of a multi-request operation failed; the
    // status of the carried error alone would misdescribe it.
    match err {
        ClientError::CreatedButUnreadable(_) => {
            return Diagnostic {
                summary: format!("{resource_type} Created But Unreadable"),
                detail: format!(
                    "The {resource_type} '{resource_name}' was created, but reading it back failed. It exists remotely; read or import it before retrying the create.\n\nError: {}",
                    error_chain(err)
                ),
            };
        }
        ClientError::UserLookup(_) => {
            return Diagnostic {
                summary: format!("Unable to {} {resource_type}", operation.title()),
                detail: format!(
                    "Looking up the current user failed before {} the {resource_type}, so nothing was changed.\n\nError: {}",
                    operation.gerund(),
                    error_chain(err)
                ),
            };
        }
        _ => {}
    }

    let Some(api) = err.api_error() else {
        return Diagnostic {
            summary: format!("Unable to {} {resource_type}", operation.title()),
            detail: format!(
                "An unexpected error occurred while {} the {resource_type}. Please retry the operation.\n\nError: {}",
                operation.gerund(),
                error_chain(err)
            ),
        };
    };

    if api.is_auth_failure() {
        Diagnostic {
            summary: "Authentication Error".to_string(),
            detail: format!(
                "Unable to {} {resource_type}: authentication failed. Please verify your CACHIX_AUTH_TOKEN is valid. Details: {}",
                operation.verb(),
                api.message
            ),
        }
    } else if api.is_not_found() {
        Diagnostic {
            summary: format!("{resource_type} Not Found"),
            detail: format!(
                "The {resource_type} '{resource_name}' was not found. Please verify the name exists."
            ),
        }
    } else if api.is_server_error() {
        Diagnostic {
            summary: "Server Error".to_string(),
            detail: format!(
                "A server error occurred while {} the {resource_type} (HTTP {}). Please retry the operation. Details: {}",
                operation.gerund(),
                api.status,
                error_chain(err)
            ),
        }
    } else {
        Diagnostic {
            summary: format!("Unable to {} {resource_type}", operation.title()),
            detail: format!(
                "An error occurred while {} the {resource_type}: {}",
                operation.gerund(),
                api.message
            ),
        }
    }
}

/// Treat a 404 as the resource having been removed outside our control.
pub fn not_found_as_removed(ctx: &ErrorContext<'_>, err: &ClientError) -> ReadOutcome {
    if err.is_not_found() {
        ReadOutcome::Removed
    } else {
        ReadOutcome::Failed(describe(ctx, err))
    }
}
