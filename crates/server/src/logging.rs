use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, ServerConfig};

// Quiet sqlx statement logging unless the operator opts back in.
const DEFAULT_FILTER: &str = "info,sqlx=warn";

pub fn init_tracing(config: &ServerConfig) -> Result<(), ConfigError> {
    let filter = build_filter(config.logging.level.as_deref())?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn build_filter(level: Option<&str>) -> Result<EnvFilter, ConfigError> {
    let directives = match level.map(str::trim) {
        Some(level) if !level.is_empty() => level,
        _ => DEFAULT_FILTER,
    };
    EnvFilter::try_new(directives)
        .map_err(|e| ConfigError::Invalid(format!("invalid logging.level: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_level_falls_back_to_default() {
        assert!(build_filter(None).is_ok());
        assert!(build_filter(Some("  ")).is_ok());
        assert!(build_filter(Some("debug,tower_http=info")).is_ok());
    }

    #[test]
    fn malformed_level_is_rejected() {
        assert!(matches!(
            build_filter(Some("not==valid")),
            Err(ConfigError::Invalid(_))
        ));
    }
}
