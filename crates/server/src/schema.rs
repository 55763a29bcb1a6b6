use std::path::Path;

use sqlx::{Pool, Sqlite};
use tokio::fs;

use crate::config::ConfigError;

pub async fn apply_server_schema(
    pool: &Pool<Sqlite>,
    config_path: &Path,
) -> Result<(), ConfigError> {
    let base_dir = config_path
        .parent()
        .ok_or_else(|| ConfigError::Invalid("config path has no parent".into()))?;
    let schema_path = base_dir.join("sql").join("sqlite").join("schema.sql");
    let content = fs::read_to_string(&schema_path).await.map_err(|_| {
        ConfigError::Invalid(format!("schema not found at {}", schema_path.display()))
    })?;
    execute_schema(pool, &content).await
}

pub async fn execute_schema(pool: &Pool<Sqlite>, content: &str) -> Result<(), ConfigError> {
    for stmt in content.split(';') {
        let trimmed = stmt.trim();
        if trimmed.is_empty() {
            continue;
        }
        sqlx::query(trimmed)
            .execute(pool)
            .await
            .map_err(|e| ConfigError::Invalid(format!("schema apply error: {e}")))?;
    }
    Ok(())
}
