use serde::{Deserialize, Serialize};

pub mod attendance;
pub mod customer;
pub mod error;
pub mod expense;
pub mod geo;
pub mod rate;
pub mod territory;
pub mod user;

pub use attendance::{DailyAttendance, PunchRecord, PunchRequest, PunchResponse, PunchType};
pub use customer::{
    Customer, CustomerCategory, CustomerType, OptimizeRouteRequest, OptimizeRouteResponse,
};
pub use error::WorkflowError;
pub use expense::{
    ExpenseEntry, ExpenseEntryEdit, ExpenseStatus, MonthlyExpenseSheet, PendingSheetsResponse,
    RejectSheetRequest, SheetResponse, SheetSummary, SheetTotals,
};
pub use geo::{GeoLocationData, GeoPoint, GeoVerification};
pub use rate::{RateConfig, RateTable, RatesResponse, UpdateRatesRequest};
pub use territory::{ExpenseCategory, Territory};
pub use user::{UpsertUserRequest, UserProfile, UserRole, UserStatus, UsersResponse};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
