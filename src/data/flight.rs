use serde::*;
use crate::data::aircraft::StateVector;

const UNKNOWN: &str = "Unknown";

/// Round to a whole number with halves going towards positive infinity, so
/// `-2.5` becomes `-2` and small negatives print as `0`, never `-0`.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Normalized projection of a state vector.  Every field is present: text is
/// trimmed and defaults to empty, numbers default to 0, the ground flag to false.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightRecord {
    pub icao24: String,
    pub callsign: String,
    pub origin_country: String,
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
    pub on_ground: bool,
    pub velocity: f64,
    pub true_track: f64,
    pub vertical_rate: f64,
}

impl From<&StateVector> for FlightRecord {
    fn from(sv: &StateVector) -> Self {
        let text = |s: &Option<String>| s.as_deref().map(str::trim).unwrap_or_default().to_string();

        Self {
            icao24: text(&sv.icao24),
            callsign: text(&sv.callsign),
            origin_country: text(&sv.origin_country),
            longitude: sv.longitude.unwrap_or_default(),
            latitude: sv.latitude.unwrap_or_default(),
            altitude: sv.baro_altitude.unwrap_or_default(),
            on_ground: sv.on_ground.unwrap_or_default(),
            velocity: sv.velocity.unwrap_or_default(),
            true_track: sv.true_track.unwrap_or_default(),
            vertical_rate: sv.vertical_rate.unwrap_or_default(),
        }
    }
}

impl FlightRecord {
    /// Matches when the callsign or the ICAO24 code contains the (already
    /// upper-cased) needle.
    pub fn matches(&self, needle: &str) -> bool {
        self.callsign.to_uppercase().contains(needle)
            || self.icao24.to_uppercase().contains(needle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightStatus {
    #[serde(rename = "On Ground")]  OnGround,
    #[serde(rename = "In Air")]     InAir,
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::OnGround => "On Ground",
            Self::InAir => "In Air",
        })
    }
}

/// A match as presented to clients.  Numeric fields are the feed's values,
/// unconverted: altitude in meters, speeds in m/s, track in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightView {
    pub number: String,
    pub iata: String,
    pub status: FlightStatus,
    pub altitude: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub velocity: f64,
    pub true_track: f64,
    pub vertical_rate: f64,
    pub origin_country: String,
    pub icao24: String,
}

impl From<&FlightRecord> for FlightView {
    fn from(record: &FlightRecord) -> Self {
        let or_unknown = |s: &str| if s.is_empty() { UNKNOWN.to_string() } else { s.to_string() };

        Self {
            number: or_unknown(&record.callsign),
            iata: or_unknown(&record.callsign),
            status: if record.on_ground { FlightStatus::OnGround } else { FlightStatus::InAir },
            altitude: record.altitude,
            latitude: record.latitude,
            longitude: record.longitude,
            velocity: record.velocity,
            true_track: record.true_track,
            vertical_rate: record.vertical_rate,
            origin_country: or_unknown(&record.origin_country),
            icao24: or_unknown(&record.icao24),
        }
    }
}

impl FlightView {
    /// Altitude as a whole number, rounding halves towards positive infinity.
    pub fn rounded_altitude(&self) -> i64 {
        round_half_up(self.altitude)
    }

    /// One-line summary used in result listings.
    pub fn summary(&self) -> String {
        format!("{} - {}", self.number, self.origin_country)
    }
}

impl std::fmt::Display for FlightView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Flight Number:         {}", self.number)?;
        writeln!(f, "Status:                {}", self.status)?;
        writeln!(f, "Altitude:              {} meters", self.rounded_altitude())?;
        writeln!(f, "Speed:                 {} m/s", round_half_up(self.velocity))?;
        writeln!(f, "Heading:               {}°", round_half_up(self.true_track))?;
        writeln!(f, "Vertical Rate:         {} m/s", round_half_up(self.vertical_rate))?;
        writeln!(f, "Origin Country:        {}", self.origin_country)?;
        writeln!(f, "Location:              {:.4}, {:.4}", self.latitude, self.longitude)?;
        write!(f, "Aircraft Registration: {}", self.icao24)
    }
}

/// Wrapper carried per entry in the endpoint's `flights` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightEntry {
    pub flight: FlightView,
}

/// Success body of `GET /api/flight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightsResponse {
    pub flights: Vec<FlightEntry>,
}

impl FlightsResponse {
    pub fn into_views(self) -> Vec<FlightView> {
        self.flights.into_iter().map(|e| e.flight).collect()
    }
}

impl From<Vec<FlightView>> for FlightsResponse {
    fn from(views: Vec<FlightView>) -> Self {
        Self { flights: views.into_iter().map(|flight| FlightEntry { flight }).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(icao24: &str, callsign: Option<&str>) -> StateVector {
        StateVector {
            icao24: Some(icao24.to_string()),
            callsign: callsign.map(String::from),
            origin_country: Some("United States".to_string()),
            baro_altitude: Some(10668.4),
            on_ground: Some(false),
            velocity: Some(240.2),
            ..StateVector::default()
        }
    }

    #[test]
    fn test_record_trims_and_defaults() {
        let record = FlightRecord::from(&vector(" a0b1c2 ", Some("HA92  ")));
        assert_eq!(record.callsign, "HA92");
        assert_eq!(record.icao24, "a0b1c2");
        assert_eq!(record.latitude, 0.0);
        assert_eq!(record.true_track, 0.0);

        let blank = FlightRecord::from(&StateVector::default());
        assert_eq!(blank, FlightRecord::default());
    }

    #[test]
    fn test_matches_either_field_case_insensitively() {
        let record = FlightRecord::from(&vector("a0b1c2", Some("UAL123")));
        assert!(record.matches("UAL1"));
        assert!(record.matches("A0B1"));
        assert!(!record.matches("HA92"));
    }

    #[test]
    fn test_view_status_and_unknowns() {
        let mut sv = vector("a0b1c2", None);
        sv.on_ground = Some(true);
        sv.origin_country = None;
        let view = FlightView::from(&FlightRecord::from(&sv));
        assert_eq!(view.status, FlightStatus::OnGround);
        assert_eq!(view.number, "Unknown");
        assert_eq!(view.iata, "Unknown");
        assert_eq!(view.origin_country, "Unknown");
        assert_eq!(view.icao24, "a0b1c2");
        assert_eq!(view.altitude, 10668.4);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_value(FlightStatus::InAir).unwrap(), "In Air");
        assert_eq!(serde_json::to_value(FlightStatus::OnGround).unwrap(), "On Ground");
    }

    #[test]
    fn test_rounded_altitude() {
        let mut view = FlightView::from(&FlightRecord::default());
        view.altitude = 10668.5;
        assert_eq!(view.rounded_altitude(), 10669);
        view.altitude = -2.5;
        assert_eq!(view.rounded_altitude(), -2);
        view.altitude = 0.0;
        assert_eq!(view.rounded_altitude(), 0);
    }

    #[test]
    fn test_detail_rounds_every_figure_alike() {
        let mut view = FlightView::from(&FlightRecord::default());
        view.altitude = 10668.5;
        view.velocity = 240.5;
        view.true_track = 89.5;
        view.vertical_rate = -2.5;
        let detail = view.to_string();
        assert!(detail.contains(" 10669 meters"));
        assert!(detail.contains(" 241 m/s"));
        assert!(detail.contains(" 90°"));
        assert!(detail.contains(" -2 m/s"));

        view.vertical_rate = -0.3;
        let detail = view.to_string();
        assert!(detail.contains(" 0 m/s"));
        assert!(!detail.contains("-0"));
    }

    #[test]
    fn test_response_shape() {
        let view = FlightView::from(&FlightRecord::from(&vector("a0b1c2", Some("HA92"))));
        let json = serde_json::to_value(FlightsResponse::from(vec![view])).unwrap();
        let flight = &json["flights"][0]["flight"];
        assert_eq!(flight["number"], "HA92");
        assert_eq!(flight["status"], "In Air");
        assert_eq!(flight["icao24"], "a0b1c2");
        assert!(flight.get("vertical_rate").is_some());
    }
}
