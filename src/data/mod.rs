pub mod aircraft;
pub mod flight;

pub use aircraft::{StateSnapshot, StateVector};
pub use flight::{FlightEntry, FlightRecord, FlightStatus, FlightView, FlightsResponse};
