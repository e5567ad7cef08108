//! Configuration for facility-taskview

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::bytes::{ByteUnits, BytesForHumans};
use crate::display::{TaskDisplayInfoMapper, TerminalStatuses};
use crate::error::{Error, Result};
use crate::strings::{MessageCatalog, MessageKey};

/// Environment variable pointing at a config file
pub const CONFIG_ENV: &str = "FACILITY_TASKVIEW_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Message template overrides, keyed by catalog id
    #[serde(default)]
    pub messages: HashMap<MessageKey, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// "decimal" (KB) or "binary" (KiB)
    #[serde(default)]
    pub byte_units: ByteUnits,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3031
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Default config path
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(env_path));
        }

        let local = PathBuf::from("config.toml");
        if local.exists() {
            return Ok(local);
        }

        let config_dir = dirs::config_dir()
            .ok_or(Error::NoConfigDir)?
            .join("facility-taskview");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from default path, falling back to defaults
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            overrides = config.messages.len(),
            "Loaded config"
        );
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let write_err = |source| Error::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let content = toml::to_string_pretty(self)?;
        let with_comments = format!(
            "# facility-taskview configuration\n\n\
             {}\n\n\
             # Override any message template by catalog id, e.g.\n\
             # [messages]\n\
             # taskFailedStatus = \"Failed\"\n",
            content
        );

        std::fs::write(path, with_comments).map_err(write_err)?;

        Ok(())
    }

    /// English catalog with this config's overrides applied
    pub fn catalog(&self) -> MessageCatalog {
        MessageCatalog::english().with_overrides(&self.messages)
    }

    /// A mapper wired with this config's catalog and byte units
    pub fn mapper(&self) -> TaskDisplayInfoMapper<MessageCatalog> {
        TaskDisplayInfoMapper::new(
            self.catalog(),
            BytesForHumans::new(self.display.byte_units),
            TerminalStatuses,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskRecord, TaskStatus};
    use crate::strings::StringResolver;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.server.port, 3031);
        assert_eq!(cfg.display.byte_units, ByteUnits::Decimal);
        assert!(cfg.messages.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let cfg: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [display]
            byte_units = "binary"

            [messages]
            taskFailedStatus = "Did not finish"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.display.byte_units, ByteUnits::Binary);
        assert_eq!(
            cfg.catalog().resolve(MessageKey::TaskFailedStatus, &[]),
            "Did not finish"
        );
    }

    #[test]
    fn test_unknown_message_id_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(
            r#"
            [messages]
            notARealKey = "x"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_mapper_uses_config() {
        let mut cfg = Config::default();
        cfg.display.byte_units = ByteUnits::Binary;
        cfg.messages
            .insert(MessageKey::TaskFinishedStatus, "Done".to_string());

        let task = TaskRecord {
            status: TaskStatus::Completed,
            bytes_sent: 2048,
            bytes_received: 4096,
            ..Default::default()
        };
        let info = cfg.mapper().sync_facility(&task);
        assert_eq!(info.status_msg, "Done");
        assert_eq!(info.bytes_transferred_msg, "2 KiB sent • 4 KiB received");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.server.port = 4000;
        cfg.messages
            .insert(MessageKey::QuotedPhrase, "«{phrase}»".to_string());
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server.port, 4000);
        assert_eq!(
            loaded.messages.get(&MessageKey::QuotedPhrase).map(String::as_str),
            Some("«{phrase}»")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
