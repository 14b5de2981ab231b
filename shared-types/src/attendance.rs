use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GeoLocationData, GeoVerification};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PunchType {
    In,
    Out,
}

impl std::fmt::Display for PunchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PunchType::In => write!(f, "IN"),
            PunchType::Out => write!(f, "OUT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PunchRecord {
    pub id: String,
    pub punch_type: PunchType,
    pub timestamp: i64,
    pub location: GeoLocationData,
    pub verified_territory_id: Option<String>,
    pub verified_territory_name: Option<String>,
    /// Warning recorded when the punch was accepted outside every geofence
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyAttendance {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub punch_in: Option<PunchRecord>,
    pub punch_outs: Vec<PunchRecord>,
    pub is_synced_to_sheets: bool,
}

impl DailyAttendance {
    pub fn attendance_id(user_id: &str, date: NaiveDate) -> String {
        format!("{}_{}", user_id, date.format("%Y-%m-%d"))
    }

    /// An empty record for a day with no punches yet
    pub fn empty(user_id: &str, date: NaiveDate) -> Self {
        Self {
            id: Self::attendance_id(user_id, date),
            user_id: user_id.to_string(),
            date,
            punch_in: None,
            punch_outs: Vec::new(),
            is_synced_to_sheets: false,
        }
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct PunchRequest {
    pub punch_type: PunchType,
    pub location: GeoLocationData,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct PunchResponse {
    pub attendance: DailyAttendance,
    pub verification: GeoVerification,
    pub message: String,
    pub warning: Option<String>,
}
