//! Two-stop linear gradient spanning a surface diagonal.
//!
//! Node-graph fields fill every node with one shared gradient running from
//! the top-left corner to the bottom-right corner. Only the span follows the
//! surface on resize; the stops are fixed at creation.

use glam::DVec2;

use crate::color::Srgb;
use crate::surface::Extent;

/// A linear gradient from `start` (offset 0) to `end` (offset 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient {
    pub from: DVec2,
    pub to: DVec2,
    pub start: Srgb,
    pub end: Srgb,
}

impl LinearGradient {
    /// Gradient over the diagonal `(0, 0) -> (width, height)` of `extent`.
    pub fn diagonal(extent: Extent, start: Srgb, end: Srgb) -> Self {
        Self {
            from: DVec2::ZERO,
            to: extent.as_dvec2(),
            start,
            end,
        }
    }

    /// Returns the same stops re-spanned over a new extent.
    pub fn respan(self, extent: Extent) -> Self {
        Self::diagonal(extent, self.start, self.end)
    }

    /// Gradient offset of `point`: its projection onto the axis, clamped to [0, 1].
    ///
    /// A degenerate axis (zero-sized surface) maps everything to offset 0.
    pub fn offset_at(&self, point: DVec2) -> f64 {
        let axis = self.to - self.from;
        let len_sq = axis.length_squared();
        if len_sq <= 0.0 {
            return 0.0;
        }
        ((point - self.from).dot(axis) / len_sq).clamp(0.0, 1.0)
    }

    /// Color at `point`.
    pub fn sample(&self, point: DVec2) -> Srgb {
        self.start.lerp(self.end, self.offset_at(point))
    }
}
