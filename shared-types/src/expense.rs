use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ExpenseCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    Draft,
    Submitted,
    ApprovedAsm,
    ApprovedAdmin,
    Rejected,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Draft => "DRAFT",
            ExpenseStatus::Submitted => "SUBMITTED",
            ExpenseStatus::ApprovedAsm => "APPROVED_ASM",
            ExpenseStatus::ApprovedAdmin => "APPROVED_ADMIN",
            ExpenseStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DRAFT" => Some(ExpenseStatus::Draft),
            "SUBMITTED" => Some(ExpenseStatus::Submitted),
            "APPROVED_ASM" => Some(ExpenseStatus::ApprovedAsm),
            "APPROVED_ADMIN" => Some(ExpenseStatus::ApprovedAdmin),
            "REJECTED" => Some(ExpenseStatus::Rejected),
            _ => None,
        }
    }

    /// Only admin approval is final
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExpenseStatus::ApprovedAdmin)
    }

    /// States in which the owner may change entries and submit
    pub fn is_owner_editable(&self) -> bool {
        matches!(self, ExpenseStatus::Draft | ExpenseStatus::Rejected)
    }
}

impl std::fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One calendar day of a monthly expense sheet.
///
/// `daily_allowance`, `travel_amount` and `total_amount` are derived from the
/// other fields and the owner's rate config; they are never edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExpenseEntry {
    pub id: String,
    pub date: NaiveDate,
    pub territory_id: Option<String>,
    pub towns: String,
    pub category: ExpenseCategory,
    pub km: f64,
    pub train_fare: f64,
    pub misc_amount: f64,
    pub remarks: String,
    pub daily_allowance: f64,
    pub travel_amount: f64,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyExpenseSheet {
    pub id: String,
    pub user_id: String,
    pub year: i32,
    pub month: u32, // 1-12
    pub status: ExpenseStatus,
    pub entries: Vec<ExpenseEntry>,
    pub submitted_at: Option<i64>,
    pub approved_by_asm_at: Option<i64>,
    pub approved_by_admin_at: Option<i64>,
    pub rejection_reason: Option<String>,
}

impl MonthlyExpenseSheet {
    /// Storage key for a sheet. `month` is 1-12 but the key carries it
    /// 0-based (`mr1_2025_2` is March), matching records written by the
    /// field app.
    pub fn sheet_id(user_id: &str, year: i32, month: u32) -> String {
        format!("{}_{}_{}", user_id, year, month.saturating_sub(1))
    }

    pub fn entry_for(&self, date: NaiveDate) -> Option<&ExpenseEntry> {
        self.entries.iter().find(|e| e.date == date)
    }
}

/// A single user edit to an expense row. Derived amounts are recomputed after
/// every edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ExpenseEntryEdit {
    Category(ExpenseCategory),
    /// Selects a territory by id, or clears it with `null`
    Territory(Option<String>),
    Km(f64),
    TrainFare(f64),
    MiscAmount(f64),
    Towns(String),
    Remarks(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct SheetTotals {
    pub allowance: f64,
    pub travel: f64,
    pub misc: f64,
    pub km: f64,
    pub total: f64,
    pub hq_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SheetSummary {
    pub totals: SheetTotals,
    pub is_hq_compliant: bool,
    pub compliance_warning: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SheetResponse {
    pub sheet: MonthlyExpenseSheet,
    pub summary: SheetSummary,
    pub can_edit: bool,
    pub can_submit: bool,
    pub can_review: bool,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct RejectSheetRequest {
    pub reason: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct PendingSheetsResponse {
    pub sheets: Vec<MonthlyExpenseSheet>,
}
