use std::path::PathBuf;
use std::sync::Arc;

use shared_types::{UserProfile, UserRole, UserStatus};

use crate::config::{BootstrapConfig, DatabaseConfig};
use crate::database::{users as users_db, AsyncDbConnection, Database};

/// Returns the path to the fieldforce database
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/fieldforce/fieldforce.db`
/// - **Linux**: `~/.local/share/fieldforce/fieldforce.db`
/// - **Windows**: `%LOCALAPPDATA%\fieldforce\fieldforce.db`
///
/// A `path` set in the `[database]` section takes precedence.
pub fn get_db_path(config: Option<&DatabaseConfig>) -> anyhow::Result<PathBuf> {
    if let Some(path) = config.and_then(|c| c.path.as_ref()) {
        return Ok(PathBuf::from(path));
    }

    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("fieldforce").join("fieldforce.db"))
}

/// Open the database, running migrations. Existing data is kept.
pub fn initialize_database(config: Option<&DatabaseConfig>) -> anyhow::Result<Arc<Database>> {
    let db_path = get_db_path(config)?;
    let db = Database::new(&db_path)?;
    tracing::info!("Database initialized at: {}", db_path.display());
    Ok(Arc::new(db))
}

/// Insert the configured ADMIN profile when no users exist yet.
/// Returns whether a profile was created.
pub async fn bootstrap_admin(
    conn: AsyncDbConnection,
    bootstrap: &BootstrapConfig,
) -> anyhow::Result<bool> {
    if users_db::count_users(conn.clone()).await? > 0 {
        return Ok(false);
    }

    let admin = UserProfile {
        id: bootstrap.admin_user_id.clone(),
        email: bootstrap.admin_email.clone(),
        display_name: "Administrator".to_string(),
        role: UserRole::Admin,
        status: UserStatus::Confirmed,
        hq_location: String::new(),
        reporting_manager_id: None,
        territories: Vec::new(),
    };
    users_db::upsert_user(conn, &admin).await?;
    tracing::info!("Created bootstrap admin {}", admin.id);

    Ok(true)
}
