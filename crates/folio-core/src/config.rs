use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the Folio viewer dialogues.
///
/// Loaded from `~/.folio/config.toml` by default. Every section is optional
/// and falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub share_dialogue: ShareDialogueConfig,
    #[serde(default)]
    pub embed_size: EmbedSizeConfig,
}

impl FolioConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FolioConfig = toml::from_str(&content)?;
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
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

/// Feature flags of the share dialogue. Read-only once the dialogue exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareDialogueConfig {
    /// Show the IIIF manifest link section.
    pub share_manifests_enabled: bool,
    /// Show the embed code section and its size controls.
    pub embed_enabled: bool,
    /// Attach copy-to-clipboard buttons to the link fields.
    pub copy_to_clipboard_enabled: bool,
    /// Allow the terms-of-use link when the resource has a required statement.
    pub terms_of_use_enabled: bool,
}

impl Default for ShareDialogueConfig {
    fn default() -> Self {
        Self {
            share_manifests_enabled: false,
            embed_enabled: false,
            copy_to_clipboard_enabled: true,
            terms_of_use_enabled: true,
        }
    }
}

/// Embed iframe sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedSizeConfig {
    /// Height divided by width.
    pub aspect_ratio: f64,
    /// Smallest accepted width in pixels. The height bound is derived.
    pub min_width: u32,
    /// Largest accepted width in pixels. The height bound is derived.
    pub max_width: u32,
    /// Delay before focusing the embed code after an embed-button open.
    pub focus_delay_ms: u64,
}

impl Default for EmbedSizeConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 0.75,
            min_width: 200,
            max_width: 8000,
            focus_delay_ms: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FolioError;

    #[test]
    fn test_default_config() {
        let config = FolioConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert!(!config.share_dialogue.share_manifests_enabled);
        assert!(!config.share_dialogue.embed_enabled);
        assert!(config.share_dialogue.copy_to_clipboard_enabled);
        assert!(config.share_dialogue.terms_of_use_enabled);
        assert_eq!(config.embed_size.aspect_ratio, 0.75);
        assert_eq!(config.embed_size.min_width, 200);
        assert_eq!(config.embed_size.max_width, 8000);
        assert_eq!(config.embed_size.focus_delay_ms, 2);
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: FolioConfig = toml::from_str("").unwrap();
        assert_eq!(config, FolioConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let toml_str = r#"
            [share_dialogue]
            embed_enabled = true

            [embed_size]
            max_width = 4000
        "#;
        let config: FolioConfig = toml::from_str(toml_str).unwrap();
        assert!(config.share_dialogue.embed_enabled);
        assert!(config.share_dialogue.copy_to_clipboard_enabled);
        assert_eq!(config.embed_size.max_width, 4000);
        assert_eq!(config.embed_size.min_width, 200);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = toml::from_str::<FolioConfig>("[embed_size]\nmin_width = \"wide\"")
            .map_err(FolioError::from)
            .unwrap_err();
        assert!(matches!(err, FolioError::Config(_)));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = FolioConfig::default();
        config.share_dialogue.share_manifests_enabled = true;
        config.embed_size.aspect_ratio = 0.5625;
        config.save(&path).unwrap();

        let loaded = FolioConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = FolioConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, FolioError::Io(_)));
    }

    #[test]
    fn test_load_or_default_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert_eq!(FolioConfig::load_or_default(&path), FolioConfig::default());
    }
}
