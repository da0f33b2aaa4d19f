use std::fmt;

/// Result type for remote backend operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while talking to a telemetry server
#[derive(Debug)]
pub enum Error {
    /// Request never completed (connection, TLS, timeout)
    Transport(reqwest::Error),
    /// Server answered with a status outside the protocol
    Status(reqwest::StatusCode),
    /// Response body was not the JSON we asked for
    Decode(serde_json::Error),
    /// Response JSON was missing the expected payload key
    Envelope(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(err) => write!(f, "Request failed: {}", err),
            Error::Status(status) => write!(f, "Unexpected response status: {}", status),
            Error::Decode(err) => write!(f, "Malformed response body: {}", err),
            Error::Envelope(key) => write!(f, "Response is missing the '{}' field", key),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(err) => Some(err),
            Error::Decode(err) => Some(err),
            Error::Status(_) | Error::Envelope(_) => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = Error::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_envelope_error_message() {
        let err = Error::Envelope("sessions");
        assert!(err.to_string().contains("'sessions'"));
    }

    #[test]
    fn test_decode_error_has_source() {
        let bad = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err = Error::from(bad);
        assert!(std::error::Error::source(&err).is_some());
    }
}
