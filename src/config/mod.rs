use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::prompt::{default_library, Prompt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComposerPosition {
    #[default]
    Bottom,
    Top,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Rows of the prompt list shown at once
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,

    /// Where the composer sits; decides which way the picker usually opens
    #[serde(default)]
    pub composer: ComposerPosition,
}

fn default_max_visible() -> usize {
    8
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            max_visible: default_max_visible(),
            composer: ComposerPosition::default(),
        }
    }
}

/// Optional colour overrides, as `#RRGGBB` or `#RGB`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_dim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_selected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// UI language code, e.g. "en", "zh-CN", "ja"
    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default)]
    pub picker: PickerConfig,

    #[serde(default)]
    pub theme: ThemeConfig,

    /// The prompt library
    #[serde(default = "default_library")]
    pub prompts: Vec<Prompt>,
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            picker: PickerConfig::default(),
            theme: ThemeConfig::default(),
            prompts: default_library(),
        }
    }
}

impl AppConfig {
    /// Directory holding config.toml and the TUI log
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(Error::NoConfigDir)?.join("promptpick");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from `path`, or create it with defaults.
    ///
    /// A file that can't be read or parsed is left alone and defaults are
    /// used for this session.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match Self::parse(&content) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            return AppConfig::default();
        }

        let config = AppConfig::default();
        if let Err(e) = config.save_to(path) {
            tracing::warn!("Could not write default config: {}", e);
        }
        config
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let mut clean_config = self.clone();
        clean_config.prompts = clean_prompts(&self.prompts);

        let content = toml::to_string_pretty(&clean_config)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Drop prompts without a name and repeated ids (first one wins)
fn clean_prompts(prompts: &[Prompt]) -> Vec<Prompt> {
    let mut seen = HashSet::new();
    prompts
        .iter()
        .filter(|p| !p.name.trim().is_empty())
        .filter(|p| seen.insert(p.id.clone()))
        .cloned()
        .collect()
}
