//! The `GET /api/flight` endpoint.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::data::FlightsResponse;
use crate::error::{Error, Result};
use crate::lookup::FlightLookup;

pub const FLIGHT_ROUTE: &str = "/api/flight";
pub const SEARCH_PARAM: &str = "flightNumber";

#[derive(Debug, Clone)]
pub struct AppState {
    pub lookup: Arc<FlightLookup>,
}

impl AppState {
    pub fn new(lookup: FlightLookup) -> Self {
        Self { lookup: Arc::new(lookup) }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route(FLIGHT_ROUTE, get(flight_handler))
        .with_state(state)
}

/// Status code for a lookup failure.
#[must_use]
pub fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::Validation => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[must_use]
pub fn error_response(err: &Error) -> Response {
    (error_status(err), Json(err.report())).into_response()
}

async fn healthz_handler() -> &'static str {
    "ok"
}

async fn flight_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let term = params.get(SEARCH_PARAM).map(String::as_str);

    match state.lookup.search(term).await {
        Ok(flights) => {
            info!(term, matches = flights.len(), "Flight lookup succeeded");
            Json(FlightsResponse::from(flights)).into_response()
        }
        Err(err) => {
            if err.is_upstream() {
                error!(term, error = %err, "Flight lookup failed upstream");
            } else {
                warn!(term, error = %err, "Flight lookup rejected");
            }
            error_response(&err)
        }
    }
}

/// Bind `addr` and serve until the process is interrupted.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Flight endpoint listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}
