use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerType {
    Doctor,
    Chemist,
    Stockist,
}

/// Call priority class; A is the most valuable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
pub enum CustomerCategory {
    A,
    B,
    C,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub customer_type: CustomerType,
    pub category: CustomerCategory,
    pub territory_id: String,
    pub geo_lat: Option<f64>,
    pub geo_lng: Option<f64>,
    #[serde(default)]
    pub is_tagged: bool,
}

impl Customer {
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.geo_lat, self.geo_lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct OptimizeRouteRequest {
    pub start: GeoPoint,
    pub customers: Vec<Customer>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct OptimizeRouteResponse {
    pub customers: Vec<Customer>,
    pub total_distance_km: f64,
}
