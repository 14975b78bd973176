//! Environment-driven configuration, read once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use inventrobil_inventory::NumericPolicy;

pub const BIND_VAR: &str = "INVENTROBIL_BIND";
pub const DATA_DIR_VAR: &str = "INVENTROBIL_DATA_DIR";
pub const STORAGE_VAR: &str = "INVENTROBIL_STORAGE";
pub const NUMERIC_POLICY_VAR: &str = "INVENTROBIL_NUMERIC_POLICY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Where the inventory store keeps its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON file per storage key under the data directory.
    File,
    /// Process memory only; every restart starts from the sample catalog.
    Memory,
}

impl core::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            StorageBackend::File => "file",
            StorageBackend::Memory => "memory",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub storage: StorageBackend,
    pub numeric_policy: NumericPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: PathBuf::from(".inventrobil"),
            storage: StorageBackend::File,
            numeric_policy: NumericPolicy::Strict,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; unset or blank variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(BIND_VAR) {
            config.bind_addr = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                var: BIND_VAR,
                message: format!("{e} (got \"{raw}\")"),
            })?;
        }

        if let Some(raw) = get(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(raw);
        }

        if let Some(raw) = get(STORAGE_VAR) {
            config.storage = match raw.trim().to_ascii_lowercase().as_str() {
                "file" => StorageBackend::File,
                "memory" => StorageBackend::Memory,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: STORAGE_VAR,
                        message: format!("must be one of: file, memory (got \"{raw}\")"),
                    });
                }
            };
        }

        if let Some(raw) = get(NUMERIC_POLICY_VAR) {
            config.numeric_policy = raw.parse().map_err(|e: inventrobil_core::DomainError| {
                ConfigError::Invalid {
                    var: NUMERIC_POLICY_VAR,
                    message: e.to_string(),
                }
            })?;
        }

        Ok(config)
    }

    /// Memory-backed configuration on an ephemeral local port (tests, demos).
    pub fn in_memory() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            storage: StorageBackend::Memory,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])).unwrap(), AppConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            (BIND_VAR, "127.0.0.1:5000"),
            (DATA_DIR_VAR, "/var/lib/inventrobil"),
            (STORAGE_VAR, "Memory"),
            (NUMERIC_POLICY_VAR, "lenient"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 5000)));
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/inventrobil"));
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.numeric_policy, NumericPolicy::Lenient);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[(STORAGE_VAR, "  ")])).unwrap();
        assert_eq!(config.storage, StorageBackend::File);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = AppConfig::from_lookup(lookup(&[(STORAGE_VAR, "redis")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: STORAGE_VAR, .. }));

        let err = AppConfig::from_lookup(lookup(&[(BIND_VAR, "localhost")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: BIND_VAR, .. }));

        let err = AppConfig::from_lookup(lookup(&[(NUMERIC_POLICY_VAR, "loose")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: NUMERIC_POLICY_VAR, .. }));
    }
}
