//! Configuration loading and root folder resolution

use crate::{Error, IdentityId, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "SPECTRUM_ROOT_FOLDER";

/// Bootstrap configuration loaded from TOML file
///
/// Every section is optional. A missing or unreadable file is never fatal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database and snapshot blob
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP port override
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub reputation: ReputationSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Reputation engine settings (`[reputation]` table)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReputationSettings {
    /// The assistant's own identity; reactions on its content never count
    pub bot_id: Option<IdentityId>,

    /// Identities allowed to react to their own content (add events)
    pub add_overrides: Vec<IdentityId>,

    /// Identities allowed to retract reactions on their own content
    pub remove_overrides: Vec<IdentityId>,

    /// Seconds between full-table snapshot sweeps
    pub snapshot_interval_secs: u64,

    /// Upper bound on a single durable write
    pub persist_timeout_ms: u64,

    /// IANA time zone used when rendering repost timestamps
    pub repost_timezone: String,

    pub emoji: EmojiSettings,
}

impl Default for ReputationSettings {
    fn default() -> Self {
        Self {
            bot_id: None,
            add_overrides: vec![
                IdentityId::new("214037134477230080"),
                IdentityId::new("168722115447488512"),
            ],
            remove_overrides: vec![IdentityId::new("214037134477230080")],
            snapshot_interval_secs: 600,
            persist_timeout_ms: 5000,
            repost_timezone: "America/New_York".to_string(),
            emoji: EmojiSettings::default(),
        }
    }
}

/// Reaction symbols counted for each score field
///
/// A symbol matches either a plain unicode emoji or a custom emoji by name.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmojiSettings {
    pub autism: String,
    pub normie: String,
    pub nice: String,
    pub toxic: String,
}

impl Default for EmojiSettings {
    fn default() -> Self {
        Self {
            autism: "🅱".to_string(),
            normie: "reee".to_string(),
            nice: "❤".to_string(),
            toxic: "pech".to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Load from an explicit path, else the platform config location, else defaults
    ///
    /// Missing files degrade to defaults with a warning.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match locate_config_file() {
                Ok(p) => p,
                Err(e) => {
                    info!("No config file found ({}), using defaults", e);
                    return Self::default();
                }
            },
        };

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to load config {}: {} (using defaults)", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(root) = &config.root_folder {
        return root.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Find the platform config file
fn locate_config_file() -> Result<PathBuf> {
    // ~/.config/spectrum/config.toml first, then /etc/spectrum/config.toml
    let user_config = dirs::config_dir().map(|d| d.join("spectrum").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/spectrum/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("spectrum"))
        .unwrap_or_else(|| PathBuf::from("./spectrum_data"))
}

/// SQLite database location under a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join("spectrum.db")
}

/// Snapshot blob location under a root folder
pub fn snapshot_path(root_folder: &Path) -> PathBuf {
    root_folder.join("data").join("karma.json")
}
