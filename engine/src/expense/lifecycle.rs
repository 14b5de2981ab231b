//! Approval workflow for monthly expense sheets.
//!
//! ```text
//! DRAFT|REJECTED --submit--> SUBMITTED --approve(ASM)--> APPROVED_ASM
//! SUBMITTED|APPROVED_ASM --approve(ADMIN)--> APPROVED_ADMIN
//! any non-terminal --reject--> REJECTED
//! ```
//!
//! Each operation takes the current sheet by reference and returns a new one,
//! so a refused operation leaves the caller's copy untouched.

use chrono::NaiveDate;
use shared_types::{
    ExpenseEntryEdit, ExpenseStatus, MonthlyExpenseSheet, RateConfig, Territory, UserRole,
    WorkflowError,
};

use super::{apply_edit, materialize_month, recompute};

/// The user performing an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn owns(&self, sheet: &MonthlyExpenseSheet) -> bool {
        self.user_id == sheet.user_id
    }
}

/// A fresh DRAFT sheet with one recomputed row per day
pub fn new_sheet(user_id: &str, year: i32, month: u32, rates: &RateConfig) -> MonthlyExpenseSheet {
    MonthlyExpenseSheet {
        id: MonthlyExpenseSheet::sheet_id(user_id, year, month),
        user_id: user_id.to_string(),
        year,
        month,
        status: ExpenseStatus::Draft,
        entries: materialize_month(year, month, rates),
        submitted_at: None,
        approved_by_asm_at: None,
        approved_by_admin_at: None,
        rejection_reason: None,
    }
}

/// Rows of an owner-editable sheet recomputed with `rates`. Submitted and
/// approved sheets keep the amounts they were sent for review with.
pub fn refresh_amounts(sheet: &MonthlyExpenseSheet, rates: &RateConfig) -> MonthlyExpenseSheet {
    let mut refreshed = sheet.clone();
    if sheet.status.is_owner_editable() {
        refreshed.entries = sheet.entries.iter().map(|e| recompute(e, rates)).collect();
    }
    refreshed
}

/// Whether the state machine has an edge from `from` to `to`
pub fn can_transition(from: ExpenseStatus, to: ExpenseStatus) -> bool {
    use ExpenseStatus::*;

    if from.is_terminal() {
        return false;
    }

    matches!(
        (from, to),
        (Draft | Rejected, Submitted)
            | (Submitted, ApprovedAsm)
            | (Submitted | ApprovedAsm, ApprovedAdmin)
            | (Draft | Submitted | ApprovedAsm | Rejected, Rejected)
    )
}

/// Owners edit their own DRAFT or REJECTED sheets; admins edit anything,
/// approved sheets included.
pub fn can_edit(sheet: &MonthlyExpenseSheet, actor: &Actor) -> bool {
    if actor.role == UserRole::Admin {
        return true;
    }
    sheet.status.is_owner_editable() && actor.owns(sheet)
}

pub fn can_submit(sheet: &MonthlyExpenseSheet, actor: &Actor) -> bool {
    actor.owns(sheet) && sheet.status.is_owner_editable()
}

/// Approve/reject rights: never on one's own sheet, ASM only at SUBMITTED,
/// ADMIN at SUBMITTED or APPROVED_ASM.
pub fn can_review(sheet: &MonthlyExpenseSheet, actor: &Actor) -> bool {
    if actor.owns(sheet) {
        return false;
    }

    match actor.role {
        UserRole::Asm => sheet.status == ExpenseStatus::Submitted,
        UserRole::Admin => matches!(
            sheet.status,
            ExpenseStatus::Submitted | ExpenseStatus::ApprovedAsm
        ),
        UserRole::Zm | UserRole::Rm | UserRole::Mr => false,
    }
}

fn ensure_transition(sheet: &MonthlyExpenseSheet, to: ExpenseStatus) -> Result<(), WorkflowError> {
    if can_transition(sheet.status, to) {
        Ok(())
    } else {
        Err(WorkflowError::InvalidTransition(format!(
            "sheet {} cannot move from {} to {}",
            sheet.id, sheet.status, to
        )))
    }
}

fn ensure_reviewer(sheet: &MonthlyExpenseSheet, actor: &Actor) -> Result<(), WorkflowError> {
    if actor.owns(sheet) {
        return Err(WorkflowError::Forbidden(
            "reviewers cannot act on their own sheet".to_string(),
        ));
    }
    if !can_review(sheet, actor) {
        return Err(WorkflowError::Forbidden(format!(
            "{} cannot review a {} sheet",
            actor.role, sheet.status
        )));
    }
    Ok(())
}

/// Applies an edit to the entry dated `date`
pub fn edit_entry(
    sheet: &MonthlyExpenseSheet,
    actor: &Actor,
    date: NaiveDate,
    edit: &ExpenseEntryEdit,
    territories: &[Territory],
    rates: &RateConfig,
) -> Result<MonthlyExpenseSheet, WorkflowError> {
    if !can_edit(sheet, actor) {
        return Err(WorkflowError::Forbidden(format!(
            "sheet {} is not editable by {} while {}",
            sheet.id, actor.user_id, sheet.status
        )));
    }

    let index = sheet
        .entries
        .iter()
        .position(|e| e.date == date)
        .ok_or_else(|| WorkflowError::NotFound(format!("no entry for {} in {}", date, sheet.id)))?;

    let mut updated = sheet.clone();
    updated.entries[index] = apply_edit(&sheet.entries[index], edit, territories, rates);
    Ok(updated)
}

pub fn submit(
    sheet: &MonthlyExpenseSheet,
    actor: &Actor,
    now: i64,
) -> Result<MonthlyExpenseSheet, WorkflowError> {
    if !actor.owns(sheet) {
        return Err(WorkflowError::Forbidden(
            "only the owner can submit a sheet".to_string(),
        ));
    }
    ensure_transition(sheet, ExpenseStatus::Submitted)?;

    let mut updated = sheet.clone();
    updated.status = ExpenseStatus::Submitted;
    updated.submitted_at = Some(now);
    Ok(updated)
}

/// ASM approval moves to APPROVED_ASM; admin approval is final and may skip
/// the ASM stage.
pub fn approve(
    sheet: &MonthlyExpenseSheet,
    actor: &Actor,
    now: i64,
) -> Result<MonthlyExpenseSheet, WorkflowError> {
    ensure_reviewer(sheet, actor)?;

    let target = match actor.role {
        UserRole::Admin => ExpenseStatus::ApprovedAdmin,
        _ => ExpenseStatus::ApprovedAsm,
    };
    ensure_transition(sheet, target)?;

    let mut updated = sheet.clone();
    updated.status = target;
    match target {
        ExpenseStatus::ApprovedAdmin => updated.approved_by_admin_at = Some(now),
        _ => updated.approved_by_asm_at = Some(now),
    }
    Ok(updated)
}

/// Sends a sheet back to its owner. Entries and earlier stamps stay as they
/// were.
pub fn reject(
    sheet: &MonthlyExpenseSheet,
    actor: &Actor,
    reason: &str,
) -> Result<MonthlyExpenseSheet, WorkflowError> {
    ensure_reviewer(sheet, actor)?;

    let reason = reason.trim();
    if reason.is_empty() {
        return Err(WorkflowError::InvalidInput(
            "a rejection reason is required".to_string(),
        ));
    }
    ensure_transition(sheet, ExpenseStatus::Rejected)?;

    let mut updated = sheet.clone();
    updated.status = ExpenseStatus::Rejected;
    updated.rejection_reason = Some(reason.to_string());
    Ok(updated)
}
