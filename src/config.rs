//! Configuration stored in `vlm.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::car::DEFAULT_OWNER;

pub const DEFAULT_CONFIG_PATH: &str = "vlm.toml";

/// Top-level configuration (TOML). Missing fields fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VlmConfig {
    /// SQLite ledger file used by the CLI and the server.
    pub database_path: PathBuf,

    /// Recorded as the actor on every audit event.
    pub actor: String,

    pub lifecycle: LifecycleConfig,
    pub server: ServerConfig,
}

/// Knobs of the car state machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Owner written by `createCar`.
    pub default_owner: String,

    /// When set, a scrapped car rejects every further mutation.
    pub scrap_is_terminal: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for VlmConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("vlm.db"),
            actor: "vlm-cli".to_string(),
            lifecycle: LifecycleConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            default_owner: DEFAULT_OWNER.to_string(),
            scrap_is_terminal: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl VlmConfig {
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(anyhow!("database_path must not be empty"));
        }
        if self.actor.trim().is_empty() {
            return Err(anyhow!("actor must not be empty"));
        }
        if self.lifecycle.default_owner.trim().is_empty() {
            return Err(anyhow!("lifecycle.default_owner must not be empty"));
        }
        if self.server.bind_addr.trim().is_empty() {
            return Err(anyhow!("server.bind_addr must not be empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `VlmConfig::default()`.
pub fn load_config(path: &Path) -> Result<VlmConfig> {
    if !path.exists() {
        let cfg = VlmConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: VlmConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, VlmConfig::default());
        assert_eq!(cfg.lifecycle.default_owner, "Manufacturer");
        assert!(!cfg.lifecycle.scrap_is_terminal);
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("vlm.toml");
        fs::write(
            &path,
            "database_path = \"fleet.db\"\n\n[lifecycle]\nscrap_is_terminal = true\n",
        )
        .expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.database_path, PathBuf::from("fleet.db"));
        assert!(cfg.lifecycle.scrap_is_terminal);
        assert_eq!(cfg.lifecycle.default_owner, "Manufacturer");
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:3000");
    }

    #[test]
    fn load_rejects_blank_owner() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("vlm.toml");
        fs::write(&path, "[lifecycle]\ndefault_owner = \" \"\n").expect("write");

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("default_owner"));
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("vlm.toml");
        fs::write(&path, "database_path = [").expect("write");

        assert!(load_config(&path).is_err());
    }
}
