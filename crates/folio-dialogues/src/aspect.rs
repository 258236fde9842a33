//! Aspect-ratio constraint for the embed iframe size.
//!
//! Keeps a `(width, height)` pair consistent under a fixed
//! `height / width` ratio while either dimension is being edited. Only the
//! edited dimension is clamped to its bounds; the other one is derived from
//! it with `floor` and never clamped on its own. Because both directions
//! floor, editing width, then height, then width again can drift by one
//! pixel. That drift is accepted.

use folio_core::config::EmbedSizeConfig;
use folio_core::error::{FolioError, Result};
use serde::{Deserialize, Serialize};

/// A concrete iframe size in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmbedSize {
    pub width: u32,
    pub height: u32,
}

impl EmbedSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for EmbedSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// Ratio plus bounds. Height bounds follow from the width bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectConstraint {
    aspect_ratio: f64,
    min_width: u32,
    max_width: u32,
    min_height: u32,
    max_height: u32,
}

impl Default for AspectConstraint {
    fn default() -> Self {
        Self {
            aspect_ratio: 0.75,
            min_width: 200,
            max_width: 8000,
            min_height: 150,
            max_height: 6000,
        }
    }
}

impl AspectConstraint {
    /// Build a constraint from `aspect_ratio = height / width` and width bounds.
    ///
    /// Height bounds are `min_width * ratio` rounded up and
    /// `max_width * ratio` rounded down, so they stay integral and inside the
    /// exact range.
    pub fn new(aspect_ratio: f64, min_width: u32, max_width: u32) -> Result<Self> {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return Err(FolioError::Config(format!(
                "aspect_ratio must be a positive number, got {}",
                aspect_ratio
            )));
        }
        if min_width == 0 || min_width > max_width {
            return Err(FolioError::Config(format!(
                "width bounds must satisfy 0 < min_width <= max_width, got {}..{}",
                min_width, max_width
            )));
        }

        let min_height = (f64::from(min_width) * aspect_ratio).ceil();
        let max_height = (f64::from(max_width) * aspect_ratio).floor();
        if min_height > max_height || max_height > f64::from(u32::MAX) {
            return Err(FolioError::Config(format!(
                "aspect_ratio {} leaves no valid height between {} and {}",
                aspect_ratio, min_height, max_height
            )));
        }

        Ok(Self {
            aspect_ratio,
            min_width,
            max_width,
            min_height: min_height as u32,
            max_height: max_height as u32,
        })
    }

    pub fn from_config(config: &EmbedSizeConfig) -> Result<Self> {
        Self::new(config.aspect_ratio, config.min_width, config.max_width)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn min_width(&self) -> u32 {
        self.min_width
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn min_height(&self) -> u32 {
        self.min_height
    }

    pub fn max_height(&self) -> u32 {
        self.max_height
    }

    pub fn clamp_width(&self, width: i64) -> u32 {
        width.clamp(i64::from(self.min_width), i64::from(self.max_width)) as u32
    }

    pub fn clamp_height(&self, height: i64) -> u32 {
        height.clamp(i64::from(self.min_height), i64::from(self.max_height)) as u32
    }

    /// Clamp the edited width, then derive `height = floor(width * ratio)`.
    pub fn derive_height_from_width(&self, width: i64) -> EmbedSize {
        let width = self.clamp_width(width);
        let height = (f64::from(width) * self.aspect_ratio).floor() as u32;
        EmbedSize { width, height }
    }

    /// Clamp the edited height, then derive `width = floor(height / ratio)`.
    pub fn derive_width_from_height(&self, height: i64) -> EmbedSize {
        let height = self.clamp_height(height);
        let width = (f64::from(height) / self.aspect_ratio).floor() as u32;
        EmbedSize { width, height }
    }
}

/// Parse the text of a dimension field.
///
/// Never fails: whitespace is trimmed, fractional values are floored, values
/// too large for `i64` saturate, and empty or non-numeric text reads as `0`.
/// Callers clamp the result, so bad input lands on the nearest bound.
pub fn parse_dimension(text: &str) -> i64 {
    let text = text.trim();
    if let Ok(value) = text.parse::<i64>() {
        return value;
    }
    match text.parse::<f64>() {
        // `as` saturates for out-of-range floats.
        Ok(value) if value.is_finite() => value.floor() as i64,
        _ => 0,
    }
}
