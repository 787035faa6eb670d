//! Reproducible description of an offline render.
//!
//! A [`Seed`] captures everything needed to redraw a frame of a field:
//! preset name, surface size, the viewport width used for point-count
//! breakpoints, parameter overrides, PRNG seed, and the number of ticks.

use crate::error::FieldError;
use serde::{Deserialize, Serialize};

/// Reproducible render description.
///
/// Two identical `Seed` values rendered by the same binary produce
/// bit-identical images.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub preset: String,
    pub width: u32,
    pub height: u32,
    /// Width used to resolve breakpoint point counts. Defaults to `width`.
    #[serde(default)]
    pub viewport_width: Option<u32>,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    pub frames: u32,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Seed {
    /// Creates a seed with no overrides that renders a single frame.
    pub fn new(preset: &str, width: u32, height: u32, seed: u64) -> Self {
        Self {
            preset: preset.to_string(),
            width,
            height,
            viewport_width: None,
            params: empty_params(),
            seed,
            frames: 1,
        }
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width.unwrap_or(self.width)
    }

    /// Rejects zero dimensions and pixel counts that overflow `usize`.
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.width == 0 || self.height == 0 {
            return Err(FieldError::InvalidDimensions);
        }
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(FieldError::InvalidDimensions)?;
        Ok(())
    }
}
