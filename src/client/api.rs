use async_trait::async_trait;
use tracing::debug;

use crate::data::{FlightView, FlightsResponse};
use crate::error::{Error, ErrorReport, Result, TITLE_FETCH_FAILED};
use crate::server::{FLIGHT_ROUTE, SEARCH_PARAM};

/// Same-origin access to `GET /api/flight`.
#[async_trait]
pub trait FlightApi: Send + Sync {
    /// # Errors
    ///
    /// [`Error::Endpoint`] for a non-2xx response, or a transport error.
    async fn lookup(&self, term: &str) -> Result<Vec<FlightView>>;
}

#[derive(Debug, Clone)]
pub struct HttpFlightApi {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpFlightApi {
    /// `base_url` is the endpoint's origin, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self { client, endpoint: format!("{}{}", base_url.trim_end_matches('/'), FLIGHT_ROUTE) }
    }
}

#[async_trait]
impl FlightApi for HttpFlightApi {
    async fn lookup(&self, term: &str) -> Result<Vec<FlightView>> {
        let response = self.client
            .get(&self.endpoint)
            .query(&[(SEARCH_PARAM, term)])
            .send()
            .await?;

        let status = response.status();
        debug!(term, status = status.as_u16(), "Flight endpoint responded");

        if status.is_success() {
            let body: FlightsResponse = response.json().await?;
            return Ok(body.into_views());
        }

        let text = response.text().await?;
        let report = serde_json::from_str::<ErrorReport>(&text)
            .unwrap_or_else(|_| ErrorReport::new(TITLE_FETCH_FAILED));
        Err(Error::Endpoint { status: status.as_u16(), report })
    }
}
