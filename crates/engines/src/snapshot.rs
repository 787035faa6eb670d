//! PNG output of a [`RasterSurface`].
//!
//! This module is feature-gated behind `png` (default on) so that WASM builds
//! can depend on the `engines` crate without pulling in the `image` crate.

use neural_flow_core::{FieldError, Srgb, Surface};
use std::path::Path;

use crate::pixel::RasterSurface;

/// Writes the surface composited over an opaque `background` as a PNG.
///
/// Returns `FieldError::Io` on write failure.
pub fn write_png(surface: &RasterSurface, background: Srgb, path: &Path) -> Result<(), FieldError> {
    let extent = surface.extent();
    let img = image::RgbaImage::from_raw(extent.width, extent.height, surface.flatten(background))
        .ok_or_else(|| FieldError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FieldError::Io(e.to_string()))?;
    log::debug!("wrote {}x{} png to {}", extent.width, extent.height, path.display());
    Ok(())
}
