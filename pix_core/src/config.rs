use crate::qr::QrOptions;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "pix";
const APP_NAME: &str = "pix_qr";
const CONFIG_FILE: &str = "config.json";

/// Overrides the platform config directory (tests, containers)
pub const CONFIG_DIR_ENV: &str = "PIX_CONFIG_DIR";

/// Fallbacks used when a charge has no owner name or city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantDefaults {
    pub merchant_name: String,
    pub merchant_city: String,
}

impl Default for MerchantDefaults {
    fn default() -> Self {
        Self {
            merchant_name: "QUARTINHO".to_string(),
            merchant_city: "CIDADE".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixConfig {
    pub qr: QrOptions,
    pub defaults: MerchantDefaults,
}

impl PixConfig {
    /// Get the config file path
    fn get_config_path() -> Option<PathBuf> {
        get_config_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    /// Load config from disk or return default
    pub fn load() -> Self {
        let path = match Self::get_config_path() {
            Some(p) => p,
            None => return Self::default(),
        };

        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save config to disk
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = Self::get_config_path()
            .ok_or_else(|| anyhow::anyhow!("No config directory available"))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(path)
    }
}

/// Get the config directory path for this app
pub fn get_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }

    ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
}
