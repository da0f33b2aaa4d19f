use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Connection errors. Queries themselves never error, they degrade to
/// the sentinel values described on [`Monitor`](crate::Monitor).
#[derive(Debug)]
pub enum Error {
    /// The embedded store could not be opened
    Store(testmetry_store::Error),
    /// The HTTP client could not be built
    Client(testmetry_client::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(err) => write!(f, "{}", err),
            Error::Client(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(err) => Some(err),
            Error::Client(err) => Some(err),
        }
    }
}

impl From<testmetry_store::Error> for Error {
    fn from(err: testmetry_store::Error) -> Self {
        Error::Store(err)
    }
}

impl From<testmetry_client::Error> for Error {
    fn from(err: testmetry_client::Error) -> Self {
        Error::Client(err)
    }
}
