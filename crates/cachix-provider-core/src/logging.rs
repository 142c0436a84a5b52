//! Logging init: append to a file under the XDG state dir, or fall back to stderr.
//!
//! The filter comes from `CACHIX_PROVIDER_LOG` (EnvFilter syntax).

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::APP_NAME;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CACHIX_PROVIDER_LOG";

const FILE_FILTER: &str = "info,cachix_provider_core=debug";
// Stderr is shared with command output; keep it quiet unless asked.
const STDERR_FILTER: &str = "warn";

/// Each event gets its own handle to the log file; stderr if cloning the handle fails.
enum LogSink {
    File(fs::File),
    Stderr,
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::File(f) => f.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::File(f) => f.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct LogFile(fs::File);

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(LogSink::File)
            .unwrap_or(LogSink::Stderr)
    }
}

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// `~/.local/state/cachix-provider/cachix-provider.log`, creating the directory.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME)?;
    Ok(xdg_dirs.place_state_file(format!("{APP_NAME}.log"))?)
}

/// Initialize structured logging to the state-dir log file.
/// Returns Err (without installing anything) when the file cannot be opened,
/// so the caller can use [`init_logging_stderr`] instead.
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(FILE_FILTER))
        .with_writer(BoxMakeWriter::new(LogFile(file)))
        .with_ansi(false)
        .init();

    tracing::info!("cachix-provider logging initialized at {}", path.display());
    Ok(())
}

/// Initialize logging to stderr only.
pub fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(filter(STDERR_FILTER))
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}
