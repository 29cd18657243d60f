//! Error types for flight lookups, the endpoint and the mint flow.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TITLE_TERM_REQUIRED: &str = "Flight number is required";
pub const TITLE_NO_ACTIVE_FLIGHTS: &str = "No active flights found";
pub const TITLE_NO_MATCH: &str = "No flights found matching your search";
pub const TITLE_FETCH_FAILED: &str = "Failed to fetch flight data";
pub const TITLE_WALLET_MISSING: &str = "Wallet not connected";
pub const TITLE_MINT_FAILED: &str = "Failed to mint NFT";

pub const HINT_NO_MATCH: &str = "Try searching with a different flight number or ICAO24 code";
pub const HINT_WALLET_MISSING: &str = "Please connect your wallet before minting";

/// Why a lookup produced nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFound {
    /// The feed itself carried no state vectors.
    NoActiveFlights,
    /// The feed had state vectors but none matched the search term.
    NoMatch,
}

impl std::fmt::Display for NotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NoActiveFlights => TITLE_NO_ACTIVE_FLIGHTS,
            Self::NoMatch => TITLE_NO_MATCH,
        })
    }
}

#[derive(Error, Debug)]
pub enum Error {
    // === Lookup ===
    #[error("search term is missing or blank")]
    Validation,

    #[error("{0}")]
    NotFound(NotFound),

    /// Non-success status or transport failure from the flight-state feed.
    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("malformed flight-state feed: {0}")]
    MalformedFeed(#[from] serde_json::Error),

    // === Mint ===
    #[error("no wallet address is bound")]
    WalletNotConnected,

    #[error("{0}")]
    MintRejected(String),

    // === Client ===
    #[error("no flight selected")]
    NoSelection,

    #[error("selection {index} is outside the {len} current results")]
    SelectionOutOfRange { index: usize, len: usize },

    #[error("flight endpoint responded {status}: {report}")]
    Endpoint { status: u16, report: ErrorReport },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // === Configuration ===
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    #[error("invalid configuration: {message}")]
    ConfigValidation { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    #[must_use]
    pub fn upstream_status(status: u16) -> Self {
        Self::Upstream {
            status: Some(status),
            message: format!("flight-state feed error! status: {status}"),
        }
    }

    #[must_use]
    pub fn upstream_transport(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// True for failures reaching or reading the feed.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::MalformedFeed(_))
    }

    /// Short title plus optional detail, as shown to the caller.
    #[must_use]
    pub fn report(&self) -> ErrorReport {
        match self {
            Self::Validation => ErrorReport::new(TITLE_TERM_REQUIRED),
            Self::NotFound(NotFound::NoActiveFlights) => ErrorReport::new(TITLE_NO_ACTIVE_FLIGHTS),
            Self::NotFound(NotFound::NoMatch) => {
                ErrorReport::with_details(TITLE_NO_MATCH, HINT_NO_MATCH)
            }
            Self::Upstream { .. } | Self::MalformedFeed(_) => {
                ErrorReport::with_details(TITLE_FETCH_FAILED, self.to_string())
            }
            Self::WalletNotConnected => {
                ErrorReport::with_details(TITLE_WALLET_MISSING, HINT_WALLET_MISSING)
            }
            Self::MintRejected(message) => ErrorReport::with_details(TITLE_MINT_FAILED, message),
            Self::Endpoint { report, .. } => {
                ErrorReport::with_details(TITLE_FETCH_FAILED, report.error.clone())
            }
            Self::Http(err) => ErrorReport::with_details(TITLE_FETCH_FAILED, err.to_string()),
            other => ErrorReport::new(other.to_string()),
        }
    }
}

/// Wire and display form of an error: `{ error, details? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorReport {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{} ({details})", self.error),
            None => f.write_str(&self.error),
        }
    }
}
