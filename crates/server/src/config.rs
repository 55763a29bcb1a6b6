use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config invalid: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    Dev,
    Prod,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub app: AppConfig,
    pub http: HttpConfig,
    pub sqlite: SqliteConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub dev: DevConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub mode: AppMode,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct SqliteConfig {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    pub session_ttl_seconds: u64,
}

#[derive(Debug, Deserialize)]
pub struct DevConfig {
    pub reset_on_start: bool,
}

#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    pub email: String,
    pub password: String,
}

impl ServerConfig {
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: ServerConfig = toml::from_str(&content)?;

        if config.auth.session_ttl_seconds == 0 {
            return Err(ConfigError::Invalid(
                "auth.session_ttl_seconds must be positive".into(),
            ));
        }
        if config.seed.email.trim().is_empty() {
            return Err(ConfigError::Invalid("seed.email must not be empty".into()));
        }

        Ok(config)
    }

    pub fn sqlite_path(&self, base_dir: &Path) -> PathBuf {
        let raw = self.sqlite.path.trim();
        if raw.is_empty() {
            return base_dir.join("registry.sqlite");
        }
        base_dir.join(raw)
    }
}
