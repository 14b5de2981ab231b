use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::GeoPoint;

/// Expense category of a working day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    Hq,
    ExHq,
    Outstation,
    Holiday,
    Sunday,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Hq => "HQ",
            ExpenseCategory::ExHq => "EX_HQ",
            ExpenseCategory::Outstation => "OUTSTATION",
            ExpenseCategory::Holiday => "HOLIDAY",
            ExpenseCategory::Sunday => "SUNDAY",
        }
    }

    /// Days on which no distance-based travel is claimed
    pub fn is_non_travel(&self) -> bool {
        matches!(
            self,
            ExpenseCategory::Hq | ExpenseCategory::Holiday | ExpenseCategory::Sunday
        )
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Territory {
    pub id: String,
    pub name: String,
    pub category: ExpenseCategory,
    /// Admin-defined distance for the territory, in km
    #[serde(default)]
    pub fixed_km: f64,
    pub geo_lat: Option<f64>,
    pub geo_lng: Option<f64>,
    pub geo_radius_meters: Option<f64>,
}

impl Territory {
    /// Centre and radius of the geofence, when the territory has one
    pub fn geofence(&self) -> Option<(GeoPoint, f64)> {
        match (self.geo_lat, self.geo_lng, self.geo_radius_meters) {
            (Some(lat), Some(lng), Some(radius)) if radius > 0.0 => {
                Some((GeoPoint { lat, lng }, radius))
            }
            _ => None,
        }
    }
}
