use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Territory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Zm,
    Rm,
    Asm,
    Mr,
}

impl UserRole {
    pub const ALL: [UserRole; 5] = [
        UserRole::Admin,
        UserRole::Zm,
        UserRole::Rm,
        UserRole::Asm,
        UserRole::Mr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Zm => "ZM",
            UserRole::Rm => "RM",
            UserRole::Asm => "ASM",
            UserRole::Mr => "MR",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == value)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Employment status, the second half of a rate table key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Trainee,
    Confirmed,
}

impl UserStatus {
    pub const ALL: [UserStatus; 2] = [UserStatus::Trainee, UserStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Trainee => "TRAINEE",
            UserStatus::Confirmed => "CONFIRMED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A field-force member. Territory order is significant: geofence matching
/// walks it front to back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub hq_location: String,
    pub reporting_manager_id: Option<String>,
    #[serde(default)]
    pub territories: Vec<Territory>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct UpsertUserRequest {
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub hq_location: String,
    pub reporting_manager_id: Option<String>,
    #[serde(default)]
    pub territories: Vec<Territory>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct UsersResponse {
    pub users: Vec<UserProfile>,
}
