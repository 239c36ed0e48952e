use super::defaults::{default_box, get_settings_file_path};
use super::ClientConfig;
use crate::core::launcher::LaunchFlags;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Persistent CLI settings. Every field is optional so a partial file only
/// overrides what it names.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_box: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,
    #[serde(default)]
    pub launch: LaunchFlags,
}

impl Settings {
    /// Starter file written by `sbiectl config init`.
    pub fn starter() -> Self {
        Self {
            default_box: Some(default_box()),
            install_dir: None,
            launch: LaunchFlags::default(),
        }
    }

    /// Folds these settings into client options. `default_box` and
    /// `install_dir` arguments are command-line overrides and win.
    pub fn to_client_config(
        &self,
        default_box: Option<String>,
        install_dir: Option<PathBuf>,
    ) -> ClientConfig {
        let mut config = ClientConfig::new().with_flags(self.launch.clone());
        if let Some(name) = default_box.or_else(|| self.default_box.clone()) {
            config = config.with_default_box(name);
        }
        if let Some(dir) = install_dir.or_else(|| self.install_dir.clone()) {
            config = config.with_install_dir(dir);
        }
        config
    }
}

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub struct ConfigManager;

impl ConfigManager {
    pub fn get_settings_path() -> PathBuf {
        get_settings_file_path()
    }

    /// Loads the settings file if it exists. A missing file yields defaults
    /// and is never created here.
    pub fn load_or_default() -> Result<Settings> {
        Self::load_or_default_with_path(None)
    }

    pub fn load_or_default_with_path(settings_path: Option<&Path>) -> Result<Settings> {
        let settings_path = match settings_path {
            Some(path) => path.to_path_buf(),
            None => get_settings_file_path(),
        };

        if settings_path.exists() {
            Self::load_from_file(&settings_path)
        } else {
            Ok(Settings::default())
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Settings> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to_path(settings: &Settings, path: &Path) -> Result<()> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(settings).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let mut file = fs::File::create(path).map_err(io_err)?;
        file.write_all(json.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;

        Ok(())
    }
}
