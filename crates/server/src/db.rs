use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::app_state::AppState;
use crate::auth::hash_password;
use crate::config::{ConfigError, ServerConfig};

pub async fn connect_db(
    config: &ServerConfig,
    config_path: &Path,
) -> Result<AppState, ConfigError> {
    let base_dir = config_path
        .parent()
        .ok_or_else(|| ConfigError::Invalid("config path has no parent".into()))?;
    let path = config.sqlite_path(base_dir);

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .map_err(|e| ConfigError::Invalid(format!("sqlite connect failed: {e}")))?;

    Ok(AppState {
        db: pool,
        session_ttl_seconds: config.auth.session_ttl_seconds,
    })
}

/// Dev-mode wipe of every data table. Keeps the schema in place so the
/// seed step can repopulate the admin account.
pub async fn reset_server_data(pool: &Pool<Sqlite>) -> Result<(), ConfigError> {
    let tables = [
        "sessions",
        "users",
        "contacts",
        "addresses",
        "encumbrances",
        "tenders",
        "financials",
        "shareholders",
        "directors",
        "companies",
    ];
    for table in tables {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(pool)
            .await
            .map_err(|e| ConfigError::Invalid(format!("data reset error: {e}")))?;
    }
    tracing::info!("dev reset: all data tables cleared");
    Ok(())
}

/// Upserts the configured admin account so a fresh database is administrable.
pub async fn seed_admin(config: &ServerConfig, pool: &Pool<Sqlite>) -> Result<(), ConfigError> {
    let email = config.seed.email.trim();

    let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ?1")
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(|e| ConfigError::Invalid(format!("seed lookup error: {e}")))?;

    if existing.is_some() {
        return Ok(());
    }

    let password_hash =
        hash_password(config.seed.password.trim()).map_err(ConfigError::Invalid)?;

    sqlx::query(
        "INSERT INTO users (email, name, password_hash, is_admin, created_at) \
         VALUES (?1, 'Administrator', ?2, 1, datetime('now'))",
    )
    .bind(email)
    .bind(&password_hash)
    .execute(pool)
    .await
    .map_err(|e| ConfigError::Invalid(format!("seed insert error: {e}")))?;

    tracing::info!(email, "seeded admin user");
    Ok(())
}
