//! Runtime configuration
//!
//! Defaults come from the embedded `config.toml`. A user file in the
//! platform config directory is layered on top, then `FIELD_REPORT_*`
//! environment variables (a `.env` file is honoured via dotenvy).

use crate::error::ConfigError;
use crate::media::FacingMode;
use crate::platform::PlatformFamily;
use crate::sequencer::StrategyOverride;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Embedded defaults
const CONFIG_TOML: &str = include_str!("../config.toml");

const ENV_BASE_URL: &str = "FIELD_REPORT_BASE_URL";
const ENV_PAGE_URL: &str = "FIELD_REPORT_PAGE_URL";
const ENV_STRATEGY: &str = "FIELD_REPORT_STRATEGY";

/// Complete application settings
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Settings {
    pub(crate) backend: BackendSettings,
    pub(crate) page: PageSettings,
    #[serde(default)]
    pub(crate) platform: PlatformSettings,
    pub(crate) speech: SpeechSettings,
    pub(crate) capture: CaptureSettings,
}

/// Backend endpoint settings
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BackendSettings {
    /// Origin serving `/guardar-registro` and friends
    pub(crate) base_url: String,
    pub(crate) connect_timeout_secs: u64,
}

/// The page the form is opened from; `project_id` lives in its query string
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PageSettings {
    pub(crate) url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PlatformSettings {
    #[serde(default)]
    pub(crate) user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SpeechSettings {
    /// Locale for both synthesis and recognition (e.g. "es-ES")
    pub(crate) locale: String,
    /// Pause between the end of a spoken prompt and listening
    pub(crate) listen_delay_ms: u64,
    /// Length of the microphone clip in record-and-upload mode
    pub(crate) clip_duration_secs: u64,
    pub(crate) strategy: StrategyOverride,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CaptureSettings {
    /// JPEG quality for snapshots (1-100)
    pub(crate) photo_quality: u8,
    pub(crate) default_facing: FacingMode,
    #[serde(default)]
    pub(crate) environment_image: String,
    #[serde(default)]
    pub(crate) user_image: String,
}

impl BackendSettings {
    pub(crate) fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl PlatformSettings {
    /// Family from the configured user agent, else from the build target
    pub(crate) fn family(&self) -> PlatformFamily {
        if self.user_agent.trim().is_empty() {
            PlatformFamily::current()
        } else {
            PlatformFamily::from_user_agent(&self.user_agent)
        }
    }
}

impl SpeechSettings {
    pub(crate) fn listen_delay(&self) -> Duration {
        Duration::from_millis(self.listen_delay_ms)
    }

    pub(crate) fn clip_duration(&self) -> Duration {
        Duration::from_secs(self.clip_duration_secs)
    }
}

impl CaptureSettings {
    /// Still image configured for a facing mode, if any
    pub(crate) fn still_image(&self, facing: FacingMode) -> Option<PathBuf> {
        let path = match facing {
            FacingMode::Environment => &self.environment_image,
            FacingMode::User => &self.user_image,
        };
        let trimmed = path.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

impl Settings {
    /// Load defaults, the user file (if present) and environment overrides
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let overlay = match user_config_path() {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
                    path: path.clone(),
                    source: e,
                })?;
                info!("Loaded user configuration from {:?}", path);
                Some(contents)
            }
            _ => None,
        };

        let mut settings = Self::from_layers(CONFIG_TOML, overlay.as_deref())?;
        settings.apply_env_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse `base` and deep-merge `overlay` on top of it
    pub(crate) fn from_layers(base: &str, overlay: Option<&str>) -> Result<Self, ConfigError> {
        let mut merged: toml::Table = toml::from_str(base)?;
        if let Some(overlay) = overlay {
            let overlay: toml::Table = toml::from_str(overlay)?;
            merge_tables(&mut merged, overlay);
        }
        Ok(toml::Value::Table(merged).try_into()?)
    }

    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            info!("Backend URL overridden from environment");
            self.backend.base_url = url;
        }
        if let Some(url) = lookup(ENV_PAGE_URL) {
            info!("Page URL overridden from environment");
            self.page.url = url;
        }
        if let Some(strategy) = lookup(ENV_STRATEGY) {
            self.speech.strategy = strategy.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_STRATEGY,
                value: strategy.clone(),
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.capture.photo_quality) {
            return Err(ConfigError::InvalidValue {
                key: "capture.photo_quality",
                value: self.capture.photo_quality.to_string(),
            });
        }
        if self.speech.locale.trim().is_empty() {
            warn!("Empty speech locale configured");
            return Err(ConfigError::InvalidValue {
                key: "speech.locale",
                value: self.speech.locale.clone(),
            });
        }
        Ok(())
    }
}

/// Location of the optional user configuration file
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("FieldReport").join("config.toml"))
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
