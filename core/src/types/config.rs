use crate::types::FieldName;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Core configuration: where the persisted slots live.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_path: PathBuf,
}

impl Config {
    pub fn records_path(&self) -> PathBuf {
        self.base_path.join("garantias.json")
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.base_path.join("usuarios.json")
    }
}

/// User-facing console configuration, persisted as config.toml.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default field for the filter box.
    pub campo_filtro: FieldName,
    /// Ask before deleting a record.
    pub confirmar_borrado: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            campo_filtro: FieldName::Apellido,
            confirmar_borrado: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl AppConfig {
    /// Returns the config file path within the given data directory.
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.toml")
    }

    /// Loads config from a TOML file. Returns default config if the file
    /// doesn't exist.
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), AppConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
