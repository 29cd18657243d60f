//! Live flight lookup against the OpenSky state-vector feed, served as
//! `GET /api/flight`, plus the client that searches it and mints a token for
//! a selected flight's altitude.

pub mod cli;
pub mod client;
pub mod clock;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod server;
pub mod sources;

pub use config::Config;
pub use error::{Error, ErrorReport, Result};
pub use logging::init_logging;
pub use lookup::{FlightLookup, SearchTerm};
pub use server::{build_router, AppState};
