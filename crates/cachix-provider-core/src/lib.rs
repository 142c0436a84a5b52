//! Cachix API client with bounded retries, exponential backoff and a typed
//! error taxonomy, plus the cache/user operations built on it.

pub mod client;
pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod model;
pub mod retry;
pub mod transport;

pub use client::CachixClient;
pub use config::{ClientConfig, ConfigError};
pub use model::{Cache, CreateCacheRequest, User};
pub use retry::{is_not_found_error, ApiError, ClientError, ErrorKind};
