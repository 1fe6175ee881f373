//! Error types for testboard core.
//!
//! The ingestion pipeline itself never fails; these errors only describe
//! problems obtaining the CSV text in the first place.

use std::{error::Error, fmt, io};

/// Error type for testboard core operations.
#[derive(Debug)]
pub enum TestboardError {
    /// An underlying I/O error.
    Io(io::Error),
    /// A sheet export answered with a non-success HTTP status.
    Fetch {
        /// HTTP status code returned by the export endpoint.
        status: u16,
        /// URL that was requested.
        url: String,
    },
    /// The HTTP request could not be completed.
    Http(String),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for TestboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Fetch { status, url } => write!(
                f,
                "failed to fetch sheet from {url}: status {status}; make sure the sheet is shared as \"Anyone with the link can view\""
            ),
            Self::Http(message) => write!(f, "http error: {message}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for TestboardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TestboardError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Convenience result type for testboard core.
pub type Result<T> = std::result::Result<T, TestboardError>;
