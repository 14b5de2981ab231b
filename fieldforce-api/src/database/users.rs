use anyhow::{anyhow, Result};
use rusqlite::{params, OptionalExtension, Row};
use shared_types::{Territory, UserProfile, UserRole, UserStatus};

use crate::database::AsyncDbConnection;

const USER_COLUMNS: &str =
    "id, email, display_name, role, status, hq_location, reporting_manager_id, territories";

struct UserRow {
    id: String,
    email: String,
    display_name: String,
    role: String,
    status: String,
    hq_location: String,
    reporting_manager_id: Option<String>,
    territories: String,
}

impl UserRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(UserRow {
            id: row.get(0)?,
            email: row.get(1)?,
            display_name: row.get(2)?,
            role: row.get(3)?,
            status: row.get(4)?,
            hq_location: row.get(5)?,
            reporting_manager_id: row.get(6)?,
            territories: row.get(7)?,
        })
    }

    fn into_profile(self) -> Result<UserProfile> {
        let role = UserRole::parse(&self.role)
            .ok_or_else(|| anyhow!("Unknown role {} for user {}", self.role, self.id))?;
        let status = UserStatus::parse(&self.status)
            .ok_or_else(|| anyhow!("Unknown status {} for user {}", self.status, self.id))?;
        let territories: Vec<Territory> = serde_json::from_str(&self.territories)?;

        Ok(UserProfile {
            id: self.id,
            email: self.email,
            display_name: self.display_name,
            role,
            status,
            hq_location: self.hq_location,
            reporting_manager_id: self.reporting_manager_id,
            territories,
        })
    }
}

pub async fn list_users(conn: AsyncDbConnection) -> Result<Vec<UserProfile>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users ORDER BY display_name, id",
        USER_COLUMNS
    ))?;

    let rows = stmt
        .query_map([], UserRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(UserRow::into_profile).collect()
}

pub async fn get_user(conn: AsyncDbConnection, user_id: &str) -> Result<Option<UserProfile>> {
    let conn = conn.lock().await?;

    let row = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
            [user_id],
            UserRow::from_row,
        )
        .optional()?;

    row.map(UserRow::into_profile).transpose()
}

pub async fn upsert_user(conn: AsyncDbConnection, user: &UserProfile) -> Result<()> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();
    let territories = serde_json::to_string(&user.territories)?;

    conn.execute(
        "INSERT INTO users (id, email, display_name, role, status, hq_location, reporting_manager_id, territories, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
         ON CONFLICT(id) DO UPDATE SET
             email = excluded.email,
             display_name = excluded.display_name,
             role = excluded.role,
             status = excluded.status,
             hq_location = excluded.hq_location,
             reporting_manager_id = excluded.reporting_manager_id,
             territories = excluded.territories,
             updated_at = excluded.updated_at",
        params![
            user.id,
            user.email,
            user.display_name,
            user.role.as_str(),
            user.status.as_str(),
            user.hq_location,
            user.reporting_manager_id,
            territories,
            now,
        ],
    )?;

    Ok(())
}

pub async fn count_users(conn: AsyncDbConnection) -> Result<i64> {
    let conn = conn.lock().await?;
    let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count)
}
