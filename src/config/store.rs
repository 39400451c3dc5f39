//! Configuration file loading

use std::path::Path;
use tracing::{debug, info};

use super::AppConfig;
use crate::error::{AppError, Result};

/// Parse configuration from TOML text
pub fn parse(text: &str) -> Result<AppConfig> {
    let config: AppConfig =
        toml::from_str(text).map_err(|e| AppError::Config(format!("invalid config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from `path`, or defaults when no path is given
pub async fn load(path: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = path else {
        debug!("No config file given, using defaults");
        let config = AppConfig::default();
        config.validate()?;
        return Ok(config);
    };

    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::Config(format!("failed to read {}: {}", path.display(), e))
    })?;
    let config = parse(&text)?;
    info!(
        "Loaded config from {} ({} cameras)",
        path.display(),
        config.cameras.len()
    );
    Ok(config)
}
