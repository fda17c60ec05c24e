//! Configuration resolution for magicmap-ui
//!
//! The generative AI credential is resolved with Database → ENV → TOML
//! priority and is required at startup.

use magicmap_common::config::{CompiledDefaults, TomlConfig};
use magicmap_common::db::settings;
use magicmap_common::{Error, Result};
use sqlx::{Pool, Sqlite};
use tracing::{info, warn};

/// Settings key holding the API key
pub const API_KEY_SETTING: &str = "gemini_api_key";

/// Environment variables checked for the API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["MAGICMAP_API_KEY", "API_KEY"];

/// Environment variable overriding the model name
pub const MODEL_ENV: &str = "MAGICMAP_MODEL";

/// Resolve the API key
///
/// **Priority:** Database → ENV (`MAGICMAP_API_KEY`, then `API_KEY`) → TOML
pub async fn resolve_api_key(db: &Pool<Sqlite>, toml_config: &TomlConfig) -> Result<String> {
    let db_key = settings::get_setting_text(db, API_KEY_SETTING)
        .await?
        .filter(|k| is_valid_key(k));
    let env_key = API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|k| is_valid_key(k));
    let toml_key = toml_config.api_key.clone().filter(|k| is_valid_key(k));

    let sources: Vec<&str> = [
        db_key.as_ref().map(|_| "database"),
        env_key.as_ref().map(|_| "environment"),
        toml_key.as_ref().map(|_| "TOML"),
    ]
    .into_iter()
    .flatten()
    .collect();

    if sources.len() > 1 {
        warn!(
            "API key found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    if let Some(key) = db_key {
        info!("API key loaded from database");
        return Ok(key);
    }
    if let Some(key) = env_key {
        info!("API key loaded from environment variable");
        return Ok(key);
    }
    if let Some(key) = toml_key {
        info!("API key loaded from TOML config");
        return Ok(key);
    }

    Err(Error::Config(
        "API key not configured. Please configure using one of:\n\
         1. Environment: MAGICMAP_API_KEY=your-key-here (or API_KEY)\n\
         2. TOML config: ~/.config/magicmap/config.toml (api_key = \"your-key\")"
            .to_string(),
    ))
}

/// Model name: ENV → TOML → compiled default
pub fn resolve_model(toml_config: &TomlConfig, defaults: &CompiledDefaults) -> String {
    std::env::var(MODEL_ENV)
        .ok()
        .filter(|m| !m.trim().is_empty())
        .or_else(|| toml_config.model.clone().filter(|m| !m.trim().is_empty()))
        .unwrap_or_else(|| defaults.model.clone())
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("  \t"));
    }
}
