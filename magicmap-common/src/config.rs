//! Configuration loading and root folder resolution
//!
//! Resolution priority for the root folder:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable `MAGICMAP_ROOT_FOLDER`
//! 3. TOML config file (`root_folder` key)
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or unreadable TOML file is never fatal: compiled defaults are
//! used and the caller reports the problem once logging is up.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "MAGICMAP_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "magicmap.db";

/// Default HTTP port for the service
pub const DEFAULT_PORT: u16 = 5780;

/// Default generative model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default env filter directive when neither RUST_LOG nor the TOML sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default bind address (localhost only)
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";

/// Logging section of the TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Env filter directive used when RUST_LOG is unset, e.g. "debug" or
    /// "magicmap_ui=debug,tower_http=info"
    #[serde(default)]
    pub level: Option<String>,
}

/// Contents of `config.toml`
///
/// Every field is optional so a partial file still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub root_folder: Option<PathBuf>,
    /// Address to bind, e.g. "127.0.0.1"
    #[serde(default)]
    pub bind_address: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    /// Credential for the generative AI service
    #[serde(default)]
    pub api_key: Option<String>,
    /// Generative model name
    #[serde(default)]
    pub model: Option<String>,
    /// Base URL of the generative API (e.g. a local proxy)
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// `[logging]` table (kept last so it serializes after plain keys)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Platform defaults compiled into the binary
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub bind_address: String,
    pub port: u16,
    pub model: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Env filter fallback: TOML `[logging] level` → compiled default
    pub fn resolve_log_level(&self, toml: &TomlConfig) -> String {
        non_blank(toml.logging.level.as_deref()).unwrap_or_else(|| self.log_level.clone())
    }

    /// Bind address (TOML → default) and port (CLI → TOML → default)
    pub fn resolve_listen_address(&self, cli_port: Option<u16>, toml: &TomlConfig) -> (String, u16) {
        let address = non_blank(toml.bind_address.as_deref())
            .unwrap_or_else(|| self.bind_address.clone());
        let port = cli_port.or(toml.port).unwrap_or(self.port);
        (address, port)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/magicmap
        dirs::data_local_dir()
            .map(|d| d.join("magicmap"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/magicmap"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/magicmap
        dirs::data_dir()
            .map(|d| d.join("magicmap"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/magicmap"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\magicmap
        dirs::data_local_dir()
            .map(|d| d.join("magicmap"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\magicmap"))
    } else {
        PathBuf::from("./magicmap_data")
    }
}

/// Default location of the TOML config file for this platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("magicmap").join("config.toml"))
}

/// Load a TOML config file
///
/// Returns `Ok(None)` when the file does not exist; parse failures are errors.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<TomlConfig>(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;
    Ok(Some(config))
}

/// Load a TOML config file, degrading to defaults on any failure
///
/// The failure comes back next to the defaults for the caller to log.
pub fn load_toml_config_or_default(path: Option<&Path>) -> (TomlConfig, Option<Error>) {
    let Some(path) = path else {
        return (TomlConfig::default(), None);
    };

    match load_toml_config(path) {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(e) => (TomlConfig::default(), Some(e)),
    }
}

/// Write a TOML config file, creating parent directories
///
/// Writes to a sibling temp file first and renames it into place.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Root folder resolution following the CLI → ENV → TOML → default order
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml: TomlConfig,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, toml: TomlConfig) -> Self {
        Self { cli_arg, toml }
    }

    pub fn resolve(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Some(path) = &self.toml.root_folder {
            return path.clone();
        }

        // Priority 4: OS-dependent compiled default
        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and locates files inside it
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            debug!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TomlConfig = toml::from_str("port = 6000\n").unwrap();
        assert_eq!(config.port, Some(6000));
        assert!(config.logging.level.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_logging_level_from_toml() {
        let defaults = CompiledDefaults::for_current_platform();
        let config: TomlConfig = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(defaults.resolve_log_level(&config), "debug");
        assert_eq!(defaults.resolve_log_level(&TomlConfig::default()), DEFAULT_LOG_LEVEL);

        let blank: TomlConfig = toml::from_str("[logging]\nlevel = \" \"\n").unwrap();
        assert_eq!(defaults.resolve_log_level(&blank), DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_listen_address_priority() {
        let defaults = CompiledDefaults::for_current_platform();
        assert_eq!(
            defaults.resolve_listen_address(None, &TomlConfig::default()),
            (DEFAULT_BIND_ADDRESS.to_string(), DEFAULT_PORT)
        );

        let toml = TomlConfig {
            bind_address: Some("0.0.0.0".to_string()),
            port: Some(6000),
            ..Default::default()
        };
        assert_eq!(
            defaults.resolve_listen_address(None, &toml),
            ("0.0.0.0".to_string(), 6000)
        );
        assert_eq!(
            defaults.resolve_listen_address(Some(7000), &toml),
            ("0.0.0.0".to_string(), 7000)
        );
    }

    #[test]
    fn test_cli_arg_wins() {
        let toml = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            ..Default::default()
        };
        let resolver = RootFolderResolver::new(Some(PathBuf::from("/from/cli")), toml);
        assert_eq!(resolver.resolve(), PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_database_path_is_inside_root() {
        let init = RootFolderInitializer::new(PathBuf::from("/tmp/mm-root"));
        assert_eq!(init.database_path(), PathBuf::from("/tmp/mm-root/magicmap.db"));
    }
}
