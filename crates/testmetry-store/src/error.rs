use std::fmt;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the embedded store layer
#[derive(Debug)]
pub enum Error {
    /// Database operation failed
    Database(rusqlite::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Database(err) => {
                let msg = err.to_string();
                // A db file without the telemetry tables reads as unreachable
                if msg.contains("no such table") {
                    write!(f, "Not a telemetry database: {}", msg)
                } else {
                    write!(f, "Database error: {}", err)
                }
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Database(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err)
    }
}
