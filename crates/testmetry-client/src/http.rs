use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;
use testmetry_core::COUNT_UNAVAILABLE;

use crate::error::{Error, Result};

/// Connection tuning for a remote telemetry server.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Applies to the whole request, connect included.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("testmetry/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Thin wrapper over a blocking HTTP client that knows the server's
/// envelope conventions: `{"count": n}` bodies, 204 for absent entities
/// and paginated listings chained through `next_url`.
pub(crate) struct HttpClient {
    base: String,
    client: Client,
}

impl HttpClient {
    pub(crate) fn new(base: &str, options: &ClientOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .build()?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Servers hand out `next_url` cursors relative to their root, but an
    /// absolute URL is followed as-is.
    fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base, path.trim_start_matches('/'))
        }
    }

    fn fetch(&self, path: &str) -> Result<(StatusCode, String)> {
        let response = self.client.get(self.absolute(path)).send()?;
        let status = response.status();
        let body = response.text()?;
        Ok((status, body))
    }

    /// Point lookup: 200 yields the body, 204 means the entity does not
    /// exist, anything else is a protocol violation.
    pub(crate) fn lookup(&self, path: &str) -> Result<Option<Value>> {
        let (status, body) = self.fetch(path)?;
        match status {
            StatusCode::NO_CONTENT => Ok(None),
            StatusCode::OK => Ok(Some(serde_json::from_str(&body)?)),
            other => Err(Error::Status(other)),
        }
    }

    /// Fetch a `{"count": n}` body. A well-formed answer without the
    /// count key degrades to the unavailable sentinel rather than erroring.
    pub(crate) fn count(&self, path: &str) -> Result<i64> {
        let (status, body) = self.fetch(path)?;
        if status != StatusCode::OK {
            return Err(Error::Status(status));
        }
        let value: Value = serde_json::from_str(&body)?;
        Ok(value
            .get("count")
            .and_then(Value::as_i64)
            .unwrap_or(COUNT_UNAVAILABLE))
    }

    /// Walk a paginated listing from `first`, concatenating the arrays
    /// found under `key` until a page carries no `next_url` or the server
    /// answers 204. The walk is atomic: a bad status or body anywhere
    /// fails the whole listing, partial results never escape.
    pub(crate) fn items(&self, first: &str, key: &'static str) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut next = Some(first.to_string());
        while let Some(path) = next {
            let (status, body) = self.fetch(&path)?;
            if status == StatusCode::NO_CONTENT {
                break;
            }
            if status != StatusCode::OK {
                return Err(Error::Status(status));
            }
            let page: Value = serde_json::from_str(&body)?;
            let Some(array) = page.get(key).and_then(Value::as_array) else {
                return Err(Error::Envelope(key));
            };
            items.extend(array.iter().cloned());
            next = page
                .get("next_url")
                .and_then(Value::as_str)
                .map(str::to_string);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(base, &ClientOptions::default()).expect("client")
    }

    #[test]
    fn joins_relative_paths_with_a_single_slash() {
        let c = client("http://server:7557/");
        assert_eq!(c.absolute("/sessions/"), "http://server:7557/sessions/");
        assert_eq!(c.absolute("sessions/count"), "http://server:7557/sessions/count");
    }

    #[test]
    fn absolute_cursors_pass_through() {
        let c = client("http://server:7557");
        let cursor = "http://elsewhere:9000/metrics/?page=2";
        assert_eq!(c.absolute(cursor), cursor);
    }
}
