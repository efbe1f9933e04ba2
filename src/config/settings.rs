use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::ObserverContext;

fn default_calc_method() -> String {
    "MuslimWorldLeague".to_string()
}
fn default_madhab() -> String {
    "Hanafi".to_string()
}
fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

/// Where the user observes prayers. All fields default to the degraded
/// zero/empty profile; the engine treats that as defined input, not an
/// error.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ObserverConfig {
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// IANA name, e.g. "Asia/Jakarta". Empty falls back to UTC.
    #[serde(default)]
    pub timezone: String,
}

impl ObserverConfig {
    pub fn context(&self) -> ObserverContext {
        ObserverContext::new(self.latitude, self.longitude, self.timezone.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationConfig {
    #[serde(default = "default_calc_method")]
    pub calc_method: String,
    #[serde(default = "default_madhab")]
    pub madhab: String,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            calc_method: default_calc_method(),
            madhab: default_madhab(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub observer: ObserverConfig,
    #[serde(default)]
    pub calculation: CalculationConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "mutabaah")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(&path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }
}
