use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::sources::sources::Source;

/// Outbound GET used to reach the flight-state feed.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Body of a successful (2xx) response.  Non-success statuses and
    /// transport failures come back as [`Error::Upstream`].
    async fn get(&self, source: &Source) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, source: &Source) -> Result<String> {
        let mut request = self.client.get(source.url());
        if let Some(cred) = source.credentials() {
            request = request.basic_auth(&cred.username, Some(&cred.password));
        }

        let response = request.send().await
            .map_err(|e| Error::upstream_transport(e.to_string()))?;

        let status = response.status();
        debug!(url = source.url(), status = status.as_u16(), "Upstream responded");
        if !status.is_success() {
            return Err(Error::upstream_status(status.as_u16()));
        }

        response.text().await
            .map_err(|e| Error::upstream_transport(e.to_string()))
    }
}
