use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::types::LocaleCode;

/// Top-level configuration for Voxfield.
///
/// Loaded from `~/.voxfield/config.toml` by default. Each section covers one
/// concern: general application settings, platform recognizer options, and
/// widget behavior/geometry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxfieldConfig {
    pub general: GeneralConfig,
    pub recognizer: RecognizerConfig,
    pub widget: WidgetConfig,
}

impl VoxfieldConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VoxfieldConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform recognizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Locale tag handed to the recognizer, e.g. "en-US".
    pub locale: LocaleCode,
    /// Deliver partial results while the utterance is still in progress.
    pub partial_results: bool,
    /// Maximum number of candidate transcriptions per utterance.
    pub max_alternatives: u32,
    /// Prompt for microphone permission automatically on first start.
    pub auto_request_permissions: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            locale: LocaleCode::default(),
            partial_results: true,
            max_alternatives: 5,
            auto_request_permissions: true,
        }
    }
}

/// Widget behavior and geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Idle window after the last recognition result before recording is
    /// stopped automatically, in milliseconds.
    pub auto_stop_ms: u64,
    /// Horizontal space reserved at the trailing edge of the wrapped input
    /// so the microphone button does not overlap the text.
    pub trailing_inset: f32,
    /// Distance of the microphone button from the input's right edge.
    pub mic_button_right: f32,
    /// Width of the alternatives dropdown.
    pub dropdown_width: f32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            auto_stop_ms: 1000,
            trailing_inset: 40.0,
            mic_button_right: 10.0,
            dropdown_width: 150.0,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
