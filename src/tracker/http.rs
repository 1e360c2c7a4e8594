use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use tracing::debug;

use super::transport::{Method, TrackerResponse, Transport};
use crate::config::TrackerConfig;
use crate::error::Result;

/// reqwest-backed [`Transport`] holding the Basic credential for the run.
pub struct HttpTransport {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &TrackerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self::with_client(config, client))
    }

    fn with_client(config: &TrackerConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url(),
            auth_header: basic_auth(&config.user_email, &config.user_token),
            client,
        }
    }
}

pub fn basic_auth(email: &str, token: &str) -> String {
    let creds = format!("{email}:{token}");
    let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
    format!("Basic {encoded}")
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<TrackerResponse> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method.into(), &url)
            .header(AUTHORIZATION, &self.auth_header)
            .header(ACCEPT, "application/json");
        match body {
            Some(body) => {
                debug!(?method, path, %body, "sending Jira request");
                request = request.json(body);
            }
            None => debug!(?method, path, "sending Jira request"),
        }

        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let content = resp.bytes().await?;

        TrackerResponse::decode(path, status, &content)
    }
}
