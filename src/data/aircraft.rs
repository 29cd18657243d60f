use serde::*;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_tuple::*;
use tracing::{trace, warn};

/// Number of positional fields in a state vector from `/states/all`.
pub const STATE_VECTOR_FIELDS: usize = 17;

/// One tracked aircraft as delivered by the feed.  Every position may be null
/// upstream, so every field is optional here; defaults are applied later.
#[derive(Clone, Debug, Default, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct StateVector {
    pub icao24: Option<String>,
    pub callsign: Option<String>,           // Can be null if not received
    pub origin_country: Option<String>,
    pub time_position: Option<i64>,         // Time of last position update, as unix timestamp
    pub last_contact: Option<i64>,          // Time of last update received, as unix timestamp
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub baro_altitude: Option<f64>,         // Barometric altitude, meters
    pub on_ground: Option<bool>,
    pub velocity: Option<f64>,              // Ground speed, m/s
    pub true_track: Option<f64>,            // Decimal degrees clockwise from N
    pub vertical_rate: Option<f64>,         // m/s, positive means climbing
    pub sensors: Option<Vec<i32>>,          // Will not contain useful data in these queries
    pub geo_altitude: Option<f64>,          // Geometric altitude, meters
    pub squawk: Option<String>,             // Transponder code
    pub spi: Option<bool>,                  // Special purpose indicator
    pub position_source: Option<i32>        // 0=ADS-B, 1=ASTERIX, 2=MLAT, 3=FLARM
}

impl StateVector {
    /// Interpret one raw `states` entry.  Short rows are padded with nulls and
    /// trailing extras (e.g. `category` on extended queries) are dropped.
    /// Mistyped values in positions the lookup never reads are nulled; rows
    /// that are not arrays or carry a mistyped identity, position or motion
    /// field are rejected.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let mut fields: Vec<Value> = serde_json::from_value(value)?;
        fields.resize(STATE_VECTOR_FIELDS, Value::Null);

        null_if_mistyped::<i64>(&mut fields[3]);          // time_position
        null_if_mistyped::<i64>(&mut fields[4]);          // last_contact
        null_if_mistyped::<Vec<i32>>(&mut fields[12]);    // sensors
        null_if_mistyped::<f64>(&mut fields[13]);         // geo_altitude
        null_if_mistyped::<String>(&mut fields[14]);      // squawk
        null_if_mistyped::<bool>(&mut fields[15]);        // spi
        null_if_mistyped::<i32>(&mut fields[16]);         // position_source

        serde_json::from_value(Value::Array(fields))
    }
}

fn null_if_mistyped<T: DeserializeOwned>(field: &mut Value) {
    if serde_json::from_value::<Option<T>>(field.clone()).is_err() {
        trace!(raw = %field, "Ignoring mistyped auxiliary field");
        *field = Value::Null;
    }
}

/// Body of a `/states/all` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateSnapshot {
    #[serde(default)]
    pub time: Option<f64>,                  // Time of data receipt

    #[serde(default)]
    pub states: Option<Vec<Value>>          // Raw rows; null when nothing is tracked
}

impl StateSnapshot {
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// True when the feed carried no rows at all, absent and empty alike.
    pub fn is_empty(&self) -> bool {
        self.states.as_ref().map_or(true, Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.states.as_ref().map_or(0, Vec::len)
    }

    /// Validated state vectors in upstream order, skipping malformed rows.
    pub fn state_vectors(&self) -> Vec<StateVector> {
        self.states.iter()
            .flatten()
            .enumerate()
            .filter_map(|(ix, row)| match StateVector::from_value(row.clone()) {
                Ok(sv) => Some(sv),
                Err(e) => {
                    warn!(row = ix, error = %e, "Skipping malformed state vector");
                    trace!(row = ix, raw = %row, "Rejected state vector");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_row() -> Value {
        json!(["a0b1c2", "HA92    ", "United States", 1700000000, 1700000001,
               -157.9, 21.3, 10668.0, false, 250.5, 90.0, -1.5,
               null, 10700.0, "1200", false, 0])
    }

    #[test]
    fn test_full_row() {
        let sv = StateVector::from_value(full_row()).unwrap();
        assert_eq!(sv.icao24.as_deref(), Some("a0b1c2"));
        assert_eq!(sv.callsign.as_deref(), Some("HA92    "));
        assert_eq!(sv.baro_altitude, Some(10668.0));
        assert_eq!(sv.on_ground, Some(false));
        assert_eq!(sv.position_source, Some(0));
    }

    #[test]
    fn test_short_row_is_padded() {
        let sv = StateVector::from_value(json!(["abc123", null, "France"])).unwrap();
        assert_eq!(sv.icao24.as_deref(), Some("abc123"));
        assert_eq!(sv.callsign, None);
        assert_eq!(sv.longitude, None);
        assert_eq!(sv.on_ground, None);
    }

    #[test]
    fn test_extended_row_is_truncated() {
        let mut row = full_row();
        row.as_array_mut().unwrap().push(json!(4));
        assert!(StateVector::from_value(row).is_ok());
    }

    #[test]
    fn test_integer_altitude_accepted() {
        let mut row = full_row();
        row[7] = json!(3000);
        assert_eq!(StateVector::from_value(row).unwrap().baro_altitude, Some(3000.0));
    }

    #[test]
    fn test_rejects_non_array_and_mistyped_rows() {
        assert!(StateVector::from_value(json!({"icao24": "abc"})).is_err());
        assert!(StateVector::from_value(json!(["abc", null, "X", null, null, null, null, "high"])).is_err());
        assert!(StateVector::from_value(json!([42, "HA92", "X"])).is_err());
    }

    #[test]
    fn test_mistyped_auxiliary_fields_are_nulled() {
        let row = json!(["abc123", "HA92  ", "US", 1700000000.5, "late",
                         -157.9, 21.3, 10668.0, false, 250.5, 90.0, -1.5,
                         "none", "high", 1200, "no", "ADS-B"]);
        let sv = StateVector::from_value(row).unwrap();
        assert_eq!(sv.callsign.as_deref(), Some("HA92  "));
        assert_eq!(sv.baro_altitude, Some(10668.0));
        assert_eq!(sv.time_position, None);
        assert_eq!(sv.last_contact, None);
        assert_eq!(sv.sensors, None);
        assert_eq!(sv.geo_altitude, None);
        assert_eq!(sv.squawk, None);
        assert_eq!(sv.spi, None);
        assert_eq!(sv.position_source, None);
    }

    #[test]
    fn test_snapshot_empty_variants() {
        assert!(StateSnapshot::parse(r#"{"time": 1, "states": null}"#).unwrap().is_empty());
        assert!(StateSnapshot::parse(r#"{"time": 1, "states": []}"#).unwrap().is_empty());
        assert!(StateSnapshot::parse(r#"{"time": 1}"#).unwrap().is_empty());
        assert!(StateSnapshot::parse("[]").is_err());
        assert!(StateSnapshot::parse("<html>").is_err());
    }

    #[test]
    fn test_snapshot_skips_malformed_rows() {
        let body = json!({ "time": 1, "states": [full_row(), "garbage", ["def456"]] }).to_string();
        let snapshot = StateSnapshot::parse(&body).unwrap();
        assert_eq!(snapshot.len(), 3);

        let vectors = snapshot.state_vectors();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[1].icao24.as_deref(), Some("def456"));
    }
}
