use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A position fix as reported by the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct GeoLocationData {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in meters
    pub accuracy: f64,
    pub timestamp: i64, // Unix timestamp of the fix
    #[serde(default)]
    pub mocked: Option<bool>,
}

impl GeoLocationData {
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.latitude,
            lng: self.longitude,
        }
    }
}

/// Outcome of checking a position against a user's geofenced territories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeoVerification {
    /// False when the fix was too coarse to be trusted
    pub accuracy_accepted: bool,
    pub matched_territory_id: Option<String>,
    pub matched_territory_name: Option<String>,
    pub nearest_distance_meters: Option<f64>,
}

impl GeoVerification {
    pub fn is_match(&self) -> bool {
        self.accuracy_accepted && self.matched_territory_id.is_some()
    }
}
