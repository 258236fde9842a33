//! Embed size presets offered by the size drop-down.

use serde::{Deserialize, Serialize};

use crate::aspect::EmbedSize;

/// Id of the sentinel preset that unlocks free-form width/height entry.
pub const CUSTOM_PRESET_ID: &str = "custom";

/// One drop-down option. `size` is `None` only for the custom sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizePreset {
    pub id: String,
    pub size: Option<EmbedSize>,
}

impl SizePreset {
    pub fn fixed(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            size: Some(EmbedSize::new(width, height)),
        }
    }

    pub fn custom() -> Self {
        Self {
            id: CUSTOM_PRESET_ID.to_string(),
            size: None,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.size.is_none()
    }
}

/// The built-in options, in display order. The first one is selected initially.
pub fn default_presets() -> Vec<SizePreset> {
    vec![
        SizePreset::fixed("small", 560, 420),
        SizePreset::fixed("medium", 640, 480),
        SizePreset::fixed("large", 800, 600),
        SizePreset::custom(),
    ]
}
