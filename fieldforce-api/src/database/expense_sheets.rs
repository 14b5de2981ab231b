use anyhow::{anyhow, Result};
use rusqlite::{params, OptionalExtension, Row};
use shared_types::{ExpenseEntry, ExpenseStatus, MonthlyExpenseSheet, RateConfig};

use crate::database::AsyncDbConnection;

const SHEET_COLUMNS: &str = "id, user_id, year, month, status, entries, submitted_at, \
     approved_by_asm_at, approved_by_admin_at, rejection_reason";

struct SheetRow {
    id: String,
    user_id: String,
    year: i32,
    month: u32,
    status: String,
    entries: String,
    submitted_at: Option<i64>,
    approved_by_asm_at: Option<i64>,
    approved_by_admin_at: Option<i64>,
    rejection_reason: Option<String>,
}

impl SheetRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(SheetRow {
            id: row.get(0)?,
            user_id: row.get(1)?,
            year: row.get(2)?,
            month: row.get(3)?,
            status: row.get(4)?,
            entries: row.get(5)?,
            submitted_at: row.get(6)?,
            approved_by_asm_at: row.get(7)?,
            approved_by_admin_at: row.get(8)?,
            rejection_reason: row.get(9)?,
        })
    }

    fn into_sheet(self) -> Result<MonthlyExpenseSheet> {
        let status = ExpenseStatus::parse(&self.status)
            .ok_or_else(|| anyhow!("Unknown status {} on sheet {}", self.status, self.id))?;
        let entries: Vec<ExpenseEntry> = serde_json::from_str(&self.entries)?;

        Ok(MonthlyExpenseSheet {
            id: self.id,
            user_id: self.user_id,
            year: self.year,
            month: self.month,
            status,
            entries,
            submitted_at: self.submitted_at,
            approved_by_asm_at: self.approved_by_asm_at,
            approved_by_admin_at: self.approved_by_admin_at,
            rejection_reason: self.rejection_reason,
        })
    }
}

pub async fn get_sheet(
    conn: AsyncDbConnection,
    user_id: &str,
    year: i32,
    month: u32,
) -> Result<Option<MonthlyExpenseSheet>> {
    let conn = conn.lock().await?;

    let row = conn
        .query_row(
            &format!(
                "SELECT {} FROM expense_sheets WHERE user_id = ?1 AND year = ?2 AND month = ?3",
                SHEET_COLUMNS
            ),
            params![user_id, year, month],
            SheetRow::from_row,
        )
        .optional()?;

    row.map(SheetRow::into_sheet).transpose()
}

/// Returns the stored sheet, creating a DRAFT with one row per day first when
/// the month has never been opened.
pub async fn get_or_create_sheet(
    conn: AsyncDbConnection,
    user_id: &str,
    year: i32,
    month: u32,
    rates: &RateConfig,
) -> Result<MonthlyExpenseSheet> {
    if let Some(sheet) = get_sheet(conn.clone(), user_id, year, month).await? {
        return Ok(sheet);
    }

    let sheet = engine::lifecycle::new_sheet(user_id, year, month, rates);
    let entries = serde_json::to_string(&sheet.entries)?;
    let now = chrono::Utc::now().timestamp();

    {
        let db = conn.lock().await?;
        // A concurrent first access may have inserted it already
        db.execute(
            "INSERT INTO expense_sheets (id, user_id, year, month, status, entries, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             ON CONFLICT(id) DO NOTHING",
            params![sheet.id, user_id, year, month, sheet.status.as_str(), entries, now],
        )?;
    }
    tracing::info!("Created expense sheet {}", sheet.id);

    get_sheet(conn, user_id, year, month)
        .await?
        .ok_or_else(|| anyhow!("Expense sheet {} missing after insert", sheet.id))
}

/// Writes the whole sheet. Concurrent saves of the same sheet are not merged:
/// the last one wins.
pub async fn save_sheet(conn: AsyncDbConnection, sheet: &MonthlyExpenseSheet) -> Result<()> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();
    let entries = serde_json::to_string(&sheet.entries)?;

    conn.execute(
        "INSERT INTO expense_sheets (id, user_id, year, month, status, entries, submitted_at,
             approved_by_asm_at, approved_by_admin_at, rejection_reason, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
         ON CONFLICT(id) DO UPDATE SET
             status = excluded.status,
             entries = excluded.entries,
             submitted_at = excluded.submitted_at,
             approved_by_asm_at = excluded.approved_by_asm_at,
             approved_by_admin_at = excluded.approved_by_admin_at,
             rejection_reason = excluded.rejection_reason,
             updated_at = excluded.updated_at",
        params![
            sheet.id,
            sheet.user_id,
            sheet.year,
            sheet.month,
            sheet.status.as_str(),
            entries,
            sheet.submitted_at,
            sheet.approved_by_asm_at,
            sheet.approved_by_admin_at,
            sheet.rejection_reason,
            now,
        ],
    )?;

    Ok(())
}

pub async fn list_sheets_by_status(
    conn: AsyncDbConnection,
    statuses: &[ExpenseStatus],
) -> Result<Vec<MonthlyExpenseSheet>> {
    if statuses.is_empty() {
        return Ok(Vec::new());
    }

    let conn = conn.lock().await?;
    let placeholders = vec!["?"; statuses.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM expense_sheets WHERE status IN ({}) ORDER BY year, month, user_id",
        SHEET_COLUMNS, placeholders
    ))?;

    let rows = stmt
        .query_map(
            rusqlite::params_from_iter(statuses.iter().map(|s| s.as_str())),
            SheetRow::from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(SheetRow::into_sheet).collect()
}
