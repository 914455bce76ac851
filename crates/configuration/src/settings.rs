use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section may be omitted from `config.toml`; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub dashboard: DashboardSettings,
    pub auth: AuthSettings,
}

/// Where the JSON API listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Connection pool tuning. The URL itself comes from `DATABASE_URL`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// How many trades the dashboard's "recent trades" table shows.
    pub recent_trades_limit: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Profiles registered with this email receive the admin role.
    pub admin_email: Option<String>,
}

// --- Default Implementations ---

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 3000 }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self { max_connections: 10, acquire_timeout_secs: 5 }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "tradebook.log".to_string(),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self { recent_trades_limit: 10 }
    }
}

impl Config {
    /// Rejects settings that would start a broken server.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError("server.host must not be empty".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.dashboard.recent_trades_limit == 0 {
            return Err(ConfigError::ValidationError(
                "dashboard.recent_trades_limit must be at least 1".to_string(),
            ));
        }
        if let Some(email) = &self.auth.admin_email {
            if !email.contains('@') {
                return Err(ConfigError::ValidationError(format!(
                    "auth.admin_email '{email}' is not an email address"
                )));
            }
        }
        Ok(())
    }

    /// `host:port` for binding the listener.
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
