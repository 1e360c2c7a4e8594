use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        }
    }
}

/// Status code and decoded JSON body of a Jira call.
///
/// Non-2xx statuses are returned as-is; callers decide what they mean.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerResponse {
    pub status: u16,
    pub body: Value,
}

impl TrackerResponse {
    /// Decode a raw response body. An empty body becomes `{}`.
    pub fn decode(path: &str, status: u16, content: &[u8]) -> Result<Self> {
        if !(200..300).contains(&status) {
            warn!(
                status,
                path,
                body = %String::from_utf8_lossy(content),
                "non 2xx response from Jira"
            );
        }

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self {
                status,
                body: Value::Object(Default::default()),
            });
        }

        let body = serde_json::from_slice(content).map_err(|e| Error::MalformedResponse {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { status, body })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body into a typed payload.
    pub fn parse<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        T::deserialize(&self.body).map_err(|e| Error::MalformedResponse {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

/// One authenticated request/response round trip against Jira.
///
/// `path` is relative to the Jira base URL and may carry a query string.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>)
        -> Result<TrackerResponse>;
}
