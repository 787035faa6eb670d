//! CPU raster implementation of [`Surface`].
//!
//! This module is always available (no feature gate) so that the `png`
//! snapshot path and tests share the same rasterizer. Colors are kept as
//! straight-alpha `f64` and composited source-over, the way a 2D canvas
//! blends translucent strokes and fills.

use glam::DVec2;
use neural_flow_core::{Extent, Fill, FieldError, Rgba, Srgb, Surface};

/// An RGBA pixel buffer that fields can draw on.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    extent: Extent,
    pixels: Vec<Rgba>,
}

impl RasterSurface {
    /// A transparent surface of the given size.
    ///
    /// Returns `FieldError::InvalidDimensions` if either side is zero or the
    /// pixel count overflows.
    pub fn new(extent: Extent) -> Result<Self, FieldError> {
        if extent.is_empty() {
            return Err(FieldError::InvalidDimensions);
        }
        let len = (extent.width as usize)
            .checked_mul(extent.height as usize)
            .ok_or(FieldError::InvalidDimensions)?;
        Ok(Self {
            extent,
            pixels: vec![Rgba::TRANSPARENT; len],
        })
    }

    /// Row-major pixels, top-left first.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.extent.width || y >= self.extent.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.extent.width as usize + x as usize)
            .copied()
    }

    /// Straight-alpha RGBA8 bytes, `width * height * 4` long.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_rgba8()).collect()
    }

    /// The surface composited over an opaque `background`, as RGBA8 with
    /// every alpha byte 255.
    pub fn flatten(&self, background: Srgb) -> Vec<u8> {
        let bg = background.with_alpha(1.0);
        self.pixels
            .iter()
            .flat_map(|p| p.over(bg).to_rgba8())
            .collect()
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= self.extent.width as i64 || y >= self.extent.height as i64 {
            return;
        }
        let i = y as usize * self.extent.width as usize + x as usize;
        if let Some(dst) = self.pixels.get_mut(i) {
            *dst = color.over(*dst);
        }
    }
}

impl Surface for RasterSurface {
    fn extent(&self) -> Extent {
        self.extent
    }

    /// An offscreen raster has no layout; its container is itself.
    fn container_extent(&self) -> Extent {
        self.extent
    }

    fn set_extent(&mut self, extent: Extent) {
        let len = (extent.width as usize).saturating_mul(extent.height as usize);
        self.extent = extent;
        self.pixels.clear();
        self.pixels.resize(len, Rgba::TRANSPARENT);
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
    }

    /// Unit-step DDA over the part of the segment that can touch the surface.
    /// Widths above 1 stamp a square brush.
    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba, width: f64) {
        let half = ((width - 1.0) / 2.0).max(0.0).round() as i64;
        let pad = half as f64 + 1.0;
        let lo = DVec2::splat(-pad);
        let hi = self.extent.as_dvec2() + pad;
        let Some((from, to)) = clip_segment(from, to, lo, hi) else {
            return;
        };

        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as i64;
        let inc = delta / steps as f64;

        let mut last = None;
        for s in 0..=steps {
            let p = from + inc * s as f64;
            let cell = (p.x.floor() as i64, p.y.floor() as i64);
            if last == Some(cell) {
                continue;
            }
            last = Some(cell);
            for dy in -half..=half {
                for dx in -half..=half {
                    self.blend(cell.0 + dx, cell.1 + dy, color);
                }
            }
        }
    }

    /// Covers every on-surface pixel whose center lies within `radius` of
    /// `center`.
    fn fill_circle(&mut self, center: DVec2, radius: f64, fill: &Fill) {
        if radius.is_nan() || radius <= 0.0 || !center.is_finite() || self.extent.is_empty() {
            return;
        }
        let max_x = self.extent.width as i64 - 1;
        let max_y = self.extent.height as i64 - 1;
        let x0 = ((center.x - radius).floor() as i64).max(0);
        let x1 = ((center.x + radius).ceil() as i64).min(max_x);
        let y0 = ((center.y - radius).floor() as i64).max(0);
        let y1 = ((center.y + radius).ceil() as i64).min(max_y);
        let r2 = radius * radius;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let pc = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if pc.distance_squared(center) > r2 {
                    continue;
                }
                let color = match fill {
                    Fill::Solid(c) => *c,
                    Fill::Gradient(g) => g.sample(pc).with_alpha(1.0),
                };
                self.blend(x, y, color);
            }
        }
    }
}

/// Liang-Barsky clip of `from -> to` to the box `[lo, hi]`.
fn clip_segment(from: DVec2, to: DVec2, lo: DVec2, hi: DVec2) -> Option<(DVec2, DVec2)> {
    if !from.is_finite() || !to.is_finite() {
        return None;
    }
    let d = to - from;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-d.x, from.x - lo.x),
        (d.x, hi.x - from.x),
        (-d.y, from.y - lo.y),
        (d.y, hi.y - from.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((from + d * t0, from + d * t1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use neural_flow_core::LinearGradient;

    const CYAN: Srgb = Srgb {
        r: 0.0,
        g: 1.0,
        b: 1.0,
    };

    fn surface(w: u32, h: u32) -> RasterSurface {
        RasterSurface::new(Extent::new(w, h)).unwrap()
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(matches!(
            RasterSurface::new(Extent::new(0, 4)),
            Err(FieldError::InvalidDimensions)
        ));
        assert!(matches!(
            RasterSurface::new(Extent::new(4, 0)),
            Err(FieldError::InvalidDimensions)
        ));
    }

    #[test]
    fn new_surface_is_transparent() {
        let s = surface(8, 4);
        assert_eq!(s.pixels().len(), 32);
        assert_eq!(s.to_rgba8().len(), 8 * 4 * 4);
        assert!(s.pixels().iter().all(|p| *p == Rgba::TRANSPARENT));
    }

    #[test]
    fn fill_circle_covers_pixel_centers_inside_radius() {
        let mut s = surface(10, 10);
        s.fill_circle(DVec2::new(5.0, 5.0), 1.0, &Fill::Solid(CYAN.with_alpha(1.0)));
        // centers at (4.5,4.5), (5.5,4.5), (4.5,5.5), (5.5,5.5) are ~0.707 away
        for (x, y) in [(4, 4), (5, 4), (4, 5), (5, 5)] {
            assert_eq!(s.pixel(x, y).unwrap().a, 1.0, "({x},{y})");
        }
        // (6.5,5.5) is ~1.58 away
        assert_eq!(s.pixel(6, 5).unwrap().a, 0.0);
        assert_eq!(s.pixel(3, 5).unwrap().a, 0.0);
    }

    #[test]
    fn fill_circle_clips_at_edges() {
        let mut s = surface(4, 4);
        s.fill_circle(DVec2::new(-0.3, 2.0), 2.0, &Fill::Solid(CYAN.with_alpha(0.5)));
        assert!(s.pixel(0, 2).unwrap().a > 0.0);
        s.fill_circle(DVec2::new(100.0, 100.0), 3.0, &Fill::Solid(CYAN.with_alpha(0.5)));
    }

    #[test]
    fn translucent_fills_composite_source_over() {
        let mut s = surface(4, 4);
        let fill = Fill::Solid(CYAN.with_alpha(0.5));
        s.fill_circle(DVec2::new(2.0, 2.0), 1.0, &fill);
        s.fill_circle(DVec2::new(2.0, 2.0), 1.0, &fill);
        let a = s.pixel(2, 2).unwrap().a;
        assert!((a - 0.75).abs() < 1e-12, "alpha = {a}");
    }

    #[test]
    fn gradient_fill_samples_per_pixel() {
        let mut s = surface(100, 100);
        let g = LinearGradient::diagonal(
            Extent::new(100, 100),
            Srgb::BLACK,
            Srgb {
                r: 1.0,
                g: 1.0,
                b: 1.0,
            },
        );
        s.fill_circle(DVec2::new(10.0, 10.0), 3.0, &Fill::Gradient(g));
        s.fill_circle(DVec2::new(90.0, 90.0), 3.0, &Fill::Gradient(g));
        let dark = s.pixel(10, 10).unwrap();
        let light = s.pixel(90, 90).unwrap();
        assert!(dark.r < 0.2 && light.r > 0.8);
        assert_eq!(dark.a, 1.0);
    }

    #[test]
    fn stroke_line_horizontal_covers_each_pixel_once() {
        let mut s = surface(10, 3);
        s.stroke_line(
            DVec2::new(0.5, 1.5),
            DVec2::new(8.5, 1.5),
            CYAN.with_alpha(0.5),
            1.0,
        );
        for x in 0..=8 {
            assert_eq!(s.pixel(x, 1).unwrap().a, 0.5, "x = {x}");
        }
        assert_eq!(s.pixel(9, 1).unwrap().a, 0.0);
        assert_eq!(s.pixel(4, 0).unwrap().a, 0.0);
    }

    #[test]
    fn stroke_line_diagonal_reaches_both_ends() {
        let mut s = surface(8, 8);
        s.stroke_line(
            DVec2::new(0.5, 0.5),
            DVec2::new(6.5, 6.5),
            CYAN.with_alpha(1.0),
            1.0,
        );
        for i in 0..=6 {
            assert_eq!(s.pixel(i, i).unwrap().a, 1.0);
        }
    }

    #[test]
    fn wide_stroke_stamps_neighbours() {
        let mut s = surface(10, 10);
        s.stroke_line(
            DVec2::new(2.5, 5.5),
            DVec2::new(7.5, 5.5),
            CYAN.with_alpha(1.0),
            3.0,
        );
        assert_eq!(s.pixel(4, 4).unwrap().a, 1.0);
        assert_eq!(s.pixel(4, 6).unwrap().a, 1.0);
        assert_eq!(s.pixel(4, 7).unwrap().a, 0.0);
    }

    #[test]
    fn clear_resets_to_transparent() {
        let mut s = surface(4, 4);
        s.fill_circle(DVec2::new(2.0, 2.0), 2.0, &Fill::Solid(CYAN.with_alpha(1.0)));
        s.clear();
        assert!(s.pixels().iter().all(|p| *p == Rgba::TRANSPARENT));
    }

    #[test]
    fn huge_circle_only_visits_surface_pixels() {
        let mut s = surface(16, 16);
        s.fill_circle(DVec2::new(8.0, 8.0), 1e12, &Fill::Solid(CYAN.with_alpha(1.0)));
        assert!(s.pixels().iter().all(|p| p.a == 1.0));
    }

    #[test]
    fn huge_circle_off_surface_draws_nothing() {
        let mut s = surface(16, 16);
        s.fill_circle(DVec2::new(-1e9, 8.0), 5e8, &Fill::Solid(CYAN.with_alpha(1.0)));
        assert!(s.pixels().iter().all(|p| p.a == 0.0));
    }

    #[test]
    fn long_line_is_clipped_to_surface() {
        let mut s = surface(8, 4);
        s.stroke_line(
            DVec2::new(-1e12, 1.5),
            DVec2::new(1e12, 1.5),
            CYAN.with_alpha(1.0),
            1.0,
        );
        for x in 0..8 {
            assert_eq!(s.pixel(x, 1).unwrap().a, 1.0, "x = {x}");
        }
        assert_eq!(s.pixel(3, 0).unwrap().a, 0.0);
    }

    #[test]
    fn clip_segment_trims_and_rejects() {
        let lo = DVec2::ZERO;
        let hi = DVec2::new(10.0, 10.0);
        let (a, b) = clip_segment(DVec2::new(-5.0, 5.0), DVec2::new(15.0, 5.0), lo, hi).unwrap();
        assert_eq!(a, DVec2::new(0.0, 5.0));
        assert_eq!(b, DVec2::new(10.0, 5.0));
        assert!(clip_segment(DVec2::new(-5.0, -1.0), DVec2::new(15.0, -1.0), lo, hi).is_none());
        assert!(clip_segment(DVec2::new(f64::NAN, 0.0), DVec2::ZERO, lo, hi).is_none());
        let inside = (DVec2::new(1.0, 2.0), DVec2::new(3.0, 4.0));
        assert_eq!(clip_segment(inside.0, inside.1, lo, hi), Some(inside));
    }

    #[test]
    fn set_extent_reallocates() {
        let mut s = surface(4, 4);
        s.set_extent(Extent::new(6, 2));
        assert_eq!(s.extent(), Extent::new(6, 2));
        assert_eq!(s.container_extent(), Extent::new(6, 2));
        assert_eq!(s.pixels().len(), 12);
        assert_eq!(s.pixel(5, 1), Some(Rgba::TRANSPARENT));
        assert_eq!(s.pixel(6, 1), None);
    }

    #[test]
    fn flatten_is_opaque_over_background() {
        let mut s = surface(2, 1);
        s.fill_circle(DVec2::new(0.5, 0.5), 0.5, &Fill::Solid(CYAN.with_alpha(0.5)));
        let bytes = s.flatten(Srgb::BLACK);
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[0..4], &[0, 128, 128, 255]);
        assert_eq!(&bytes[4..8], &[0, 0, 0, 255]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn drawing_never_panics_or_leaves_unit_range(
                cx in -50.0_f64..150.0,
                cy in -50.0_f64..150.0,
                r in 0.0_f64..20.0,
                x2 in -50.0_f64..150.0,
                y2 in -50.0_f64..150.0,
                a in 0.0_f64..=1.0,
            ) {
                let mut s = surface(64, 48);
                s.fill_circle(DVec2::new(cx, cy), r, &Fill::Solid(CYAN.with_alpha(a)));
                s.stroke_line(DVec2::new(cx, cy), DVec2::new(x2, y2), CYAN.with_alpha(a), 1.0);
                for p in s.pixels() {
                    prop_assert!((0.0..=1.0).contains(&p.a));
                    prop_assert!((0.0..=1.0 + 1e-12).contains(&p.g));
                }
            }
        }
    }
}
