use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use shared_types::{DailyAttendance, PunchRecord};

use crate::database::AsyncDbConnection;

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub async fn get_attendance(
    conn: AsyncDbConnection,
    user_id: &str,
    date: NaiveDate,
) -> Result<Option<DailyAttendance>> {
    let conn = conn.lock().await?;

    let row = conn
        .query_row(
            "SELECT id, punch_in, punch_outs, is_synced_to_sheets
             FROM attendance
             WHERE user_id = ?1 AND date = ?2",
            params![user_id, date_key(date)],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, bool>(3)?,
                ))
            },
        )
        .optional()?;

    let Some((id, punch_in, punch_outs, is_synced_to_sheets)) = row else {
        return Ok(None);
    };

    let punch_in: Option<PunchRecord> = punch_in
        .map(|json| serde_json::from_str(&json))
        .transpose()?;
    let punch_outs: Vec<PunchRecord> = serde_json::from_str(&punch_outs)?;

    Ok(Some(DailyAttendance {
        id,
        user_id: user_id.to_string(),
        date,
        punch_in,
        punch_outs,
        is_synced_to_sheets,
    }))
}

/// Writes the whole day record; the last concurrent save wins
pub async fn save_attendance(conn: AsyncDbConnection, attendance: &DailyAttendance) -> Result<()> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let punch_in = attendance
        .punch_in
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let punch_outs = serde_json::to_string(&attendance.punch_outs)?;

    conn.execute(
        "INSERT INTO attendance (id, user_id, date, punch_in, punch_outs, is_synced_to_sheets, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
             punch_in = excluded.punch_in,
             punch_outs = excluded.punch_outs,
             is_synced_to_sheets = excluded.is_synced_to_sheets,
             updated_at = excluded.updated_at",
        params![
            attendance.id,
            attendance.user_id,
            date_key(attendance.date),
            punch_in,
            punch_outs,
            attendance.is_synced_to_sheets,
            now,
        ],
    )?;

    Ok(())
}

/// Confirmation from the sheet sync. Returns false when the day has no record.
pub async fn mark_attendance_synced(
    conn: AsyncDbConnection,
    user_id: &str,
    date: NaiveDate,
) -> Result<bool> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let updated = conn.execute(
        "UPDATE attendance SET is_synced_to_sheets = 1, updated_at = ?1
         WHERE user_id = ?2 AND date = ?3",
        params![now, user_id, date_key(date)],
    )?;

    Ok(updated > 0)
}
