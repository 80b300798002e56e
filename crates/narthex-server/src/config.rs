use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Key material is small; anything larger is rejected before the core runs.
pub const DEFAULT_MAX_BODY_SIZE: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding the `0x<hex>.key` records.
    pub store_root: PathBuf,
    pub max_body_size: usize,
    /// `fsync` every record before answering `201 Created`.
    pub sync_on_write: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8192)),
            store_root: PathBuf::from("."),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            sync_on_write: true,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "0.0.0.0:8192".parse::<SocketAddr>().unwrap());
        assert_eq!(c.store_root, PathBuf::from("."));
        assert_eq!(c.max_body_size, 32);
        assert!(c.sync_on_write);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml_str(r#"store_root = "/var/narthex""#).unwrap();
        assert_eq!(c.store_root, PathBuf::from("/var/narthex"));
        assert_eq!(c.max_body_size, DEFAULT_MAX_BODY_SIZE);
        assert_eq!(c.bind_addr.port(), 8192);
    }

    #[test]
    fn full_toml() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "127.0.0.1:9000"
            store_root = "keys"
            max_body_size = 64
            sync_on_write = false
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.max_body_size, 64);
        assert!(!c.sync_on_write);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = ServerConfig::from_toml_str("bind_addr = 12").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("narthex.toml");
        std::fs::write(&path, "max_body_size = 48\n").unwrap();
        assert_eq!(ServerConfig::from_file(&path).unwrap().max_body_size, 48);
    }
}
