use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiConfig {
    pub server: Option<ServerConfig>,
    pub cors: Option<CorsConfig>,
    pub database: Option<DatabaseConfig>,
    pub attendance: Option<AttendanceConfig>,
    pub bootstrap: Option<BootstrapConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Overrides the platform data directory location
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default)]
pub struct AttendanceConfig {
    /// Refuse punch-ins made outside every assigned territory
    #[serde(default)]
    pub strict_geofence: bool,
}

/// ADMIN profile created on first start, while the users table is empty
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BootstrapConfig {
    pub admin_user_id: String,
    pub admin_email: String,
}

const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8080

[cors]
allowed_origins = ["http://localhost:3000"]

[database]
# path = "/var/lib/fieldforce/fieldforce.db"

[attendance]
strict_geofence = false

[bootstrap]
admin_user_id = "admin"
admin_email = "admin@example.com"
"#;

impl ApiConfig {
    /// Loads the config file, writing the defaults first when it is missing.
    /// `FIELDFORCE__SECTION__KEY` environment variables override file values.
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .add_source(Environment::with_prefix("FIELDFORCE").separator("__"))
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }

    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    pub fn attendance(&self) -> AttendanceConfig {
        self.attendance.unwrap_or_default()
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("fieldforce").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
