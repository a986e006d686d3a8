use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store::FileStore;

pub const CONFIG_VERSION: u64 = 1;
pub const APP_DIR: &str = "quill";

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join(APP_DIR)
}

fn default_version() -> u64 {
    CONFIG_VERSION
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to write config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct QuillConfig {
    #[serde(default = "default_version")]
    pub version: u64,
    pub data_directory: PathBuf,
    pub debug_logging: bool,
}

impl Default for QuillConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data_directory: default_data_dir(),
            debug_logging: false,
        }
    }
}

impl QuillConfig {
    /// `~/.config/quill/config.json` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR)
            .join("config.json")
    }

    /// Read the config, falling back to defaults when missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Failed to read config {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(io_err)
    }

    /// Ensure the data directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_directory)
    }

    pub fn store(&self) -> FileStore {
        FileStore::new(&self.data_directory)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.data_directory.join("export")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = QuillConfig::load(&dir.path().join("config.json"));
        assert_eq!(config, QuillConfig::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert_eq!(QuillConfig::load(&path), QuillConfig::default());
    }

    #[test]
    fn unreadable_path_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::create_dir(&path).unwrap();
        assert_eq!(QuillConfig::load(&path), QuillConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"debug_logging": true}"#).unwrap();
        let config = QuillConfig::load(&path);
        assert!(config.debug_logging);
        assert_eq!(config.data_directory, default_data_dir());
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = QuillConfig {
            data_directory: dir.path().join("data"),
            debug_logging: true,
            ..QuillConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(QuillConfig::load(&path), config);
    }

    #[test]
    fn store_lives_in_data_directory() {
        let dir = tempdir().unwrap();
        let config = QuillConfig {
            data_directory: dir.path().to_path_buf(),
            ..QuillConfig::default()
        };
        config.ensure_dirs().unwrap();
        assert_eq!(config.store().path_for("notes"), dir.path().join("notes.json"));
    }
}
