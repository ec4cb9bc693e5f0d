//! spectrum-rep specific configuration

use spectrum_common::config::{
    database_path, resolve_root_folder, snapshot_path, ReputationSettings, TomlConfig,
    ROOT_FOLDER_ENV,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5790;

/// Reputation service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub root_folder: PathBuf,
    pub db_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub reputation: ReputationSettings,
}

impl Config {
    /// Merge CLI values over the TOML file and compiled defaults
    pub fn resolve(cli_root: Option<&Path>, cli_port: Option<u16>, toml: TomlConfig) -> Self {
        let root_folder = resolve_root_folder(cli_root, ROOT_FOLDER_ENV, &toml);
        let port = cli_port.or(toml.port).unwrap_or(DEFAULT_PORT);

        Self {
            db_path: database_path(&root_folder),
            snapshot_path: snapshot_path(&root_folder),
            root_folder,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], port)),
            log_level: toml.logging.level,
            reputation: toml.reputation,
        }
    }

    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_secs(self.reputation.snapshot_interval_secs.max(1))
    }

    pub fn persist_timeout(&self) -> Duration {
        Duration::from_millis(self.reputation.persist_timeout_ms.max(1))
    }
}
