#![deny(unsafe_code)]
//! Preset registry: maps preset names to field configurations and provides
//! CPU-side offline rendering.
//!
//! This crate sits between `neural-flow-core` (points, fields, surfaces) and
//! the front ends. Both the CLI and the WASM bindings depend on it so preset
//! lookup and override handling live in one place.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use neural_flow_core::config::{PointCount, Sizing, DEFAULT_BREAKPOINT};
use neural_flow_core::{AnimatedField, Extent, FieldConfig, FieldError, Seed, Xorshift64};

use crate::pixel::RasterSurface;

/// A named field configuration and where the page mounts it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    /// Canvas id the browser host starts this preset on at load, if any.
    pub surface_id: Option<&'static str>,
    /// Delay before an autostarted preset begins, in milliseconds.
    pub start_delay_ms: u32,
    pub config: FieldConfig,
}

const PRESETS: &[Preset] = &[
    Preset {
        name: "hero-particles",
        description: "translucent cyan dots drifting inside the hero banner",
        surface_id: Some("particles-canvas"),
        start_delay_ms: 800,
        config: FieldConfig::particles(),
    },
    Preset {
        name: "neuron-background",
        description: "full-viewport node graph with distance-faded edges",
        surface_id: Some("neuron-canvas"),
        start_delay_ms: 0,
        config: FieldConfig::node_graph(),
    },
    Preset {
        name: "neuron-panel",
        description: "smaller node graph sized to its container",
        surface_id: None,
        start_delay_ms: 0,
        config: FieldConfig {
            sizing: Sizing::Container,
            count: PointCount::Breakpoint {
                narrow: 50,
                wide: 60,
                breakpoint: DEFAULT_BREAKPOINT,
            },
            ..FieldConfig::node_graph()
        },
    },
];

impl Preset {
    /// Looks up a preset by name.
    ///
    /// Returns `FieldError::UnknownPreset` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<&'static Preset, FieldError> {
        PRESETS
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| FieldError::UnknownPreset(name.to_string()))
    }

    /// All registered presets, in display order.
    pub fn list_presets() -> &'static [Preset] {
        PRESETS
    }

    /// Presets the browser host starts on its own at page load.
    pub fn autostart() -> impl Iterator<Item = &'static Preset> {
        PRESETS.iter().filter(|p| p.surface_id.is_some())
    }
}

/// Renders `seed` onto a fresh raster surface.
///
/// The surface is `seed.width` x `seed.height`, the point count is resolved
/// against `seed.viewport_width()`, and the field is ticked `seed.frames`
/// times. The surface holds the last drawn frame.
pub fn render(seed: &Seed) -> Result<RasterSurface, FieldError> {
    seed.validate()?;
    let preset = Preset::from_name(&seed.preset)?;
    let config = preset.config.with_overrides(&seed.params)?;
    let extent = Extent::new(seed.width, seed.height);

    let mut surface = RasterSurface::new(extent)?;
    let mut rng = Xorshift64::new(seed.seed);
    let mut field = AnimatedField::new(&config, extent, seed.viewport_width(), &mut rng);
    log::debug!(
        "rendering '{}' at {}x{}: {} points, {} frames",
        preset.name,
        extent.width,
        extent.height,
        field.points().len(),
        seed.frames
    );
    for _ in 0..seed.frames {
        field.tick(&mut surface);
    }
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use neural_flow_core::{Mode, Surface};
    use serde_json::json;

    #[test]
    fn from_name_known_presets_succeed() {
        for name in ["hero-particles", "neuron-background", "neuron-panel"] {
            assert_eq!(Preset::from_name(name).unwrap().name, name);
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = Preset::from_name("starfield");
        assert!(matches!(result, Err(FieldError::UnknownPreset(n)) if n == "starfield"));
    }

    #[test]
    fn preset_configs_are_valid() {
        for preset in Preset::list_presets() {
            assert!(preset.config.validate().is_ok(), "{}", preset.name);
        }
    }

    #[test]
    fn hero_particles_matches_page_setup() {
        let p = Preset::from_name("hero-particles").unwrap();
        assert_eq!(p.surface_id, Some("particles-canvas"));
        assert_eq!(p.start_delay_ms, 800);
        assert_eq!(p.config.mode, Mode::Particles);
        assert_eq!(p.config.sizing, Sizing::Container);
        assert_eq!(p.config.count.resolve(1024), 60);
        assert_eq!(p.config.count.resolve(500), 30);
    }

    #[test]
    fn neuron_background_fills_viewport() {
        let p = Preset::from_name("neuron-background").unwrap();
        assert_eq!(p.surface_id, Some("neuron-canvas"));
        assert_eq!(p.config.sizing, Sizing::Viewport);
        assert_eq!(p.config.count.resolve(1920), 80);
        assert_eq!(p.config.count.resolve(767), 50);
    }

    #[test]
    fn neuron_panel_is_not_autostarted() {
        let p = Preset::from_name("neuron-panel").unwrap();
        assert_eq!(p.config.mode, Mode::NodeGraph);
        assert_eq!(p.config.sizing, Sizing::Container);
        assert_eq!(p.config.count.resolve(1024), 60);
        let auto: Vec<&str> = Preset::autostart().map(|p| p.name).collect();
        assert_eq!(auto, ["hero-particles", "neuron-background"]);
    }

    #[test]
    fn render_draws_requested_size() {
        let seed = Seed::new("neuron-background", 64, 48, 42);
        let surface = render(&seed).unwrap();
        assert_eq!(surface.extent(), Extent::new(64, 48));
        assert!(surface.pixels().iter().any(|p| p.a > 0.0));
    }

    #[test]
    fn render_is_deterministic() {
        let mut seed = Seed::new("hero-particles", 80, 60, 7);
        seed.frames = 10;
        let a = render(&seed).unwrap();
        let b = render(&seed).unwrap();
        assert_eq!(a.to_rgba8(), b.to_rgba8());
    }

    #[test]
    fn render_zero_frames_is_blank() {
        let mut seed = Seed::new("hero-particles", 16, 16, 7);
        seed.frames = 0;
        let surface = render(&seed).unwrap();
        assert!(surface.pixels().iter().all(|p| p.a == 0.0));
    }

    #[test]
    fn render_applies_overrides() {
        let mut seed = Seed::new("hero-particles", 16, 16, 7);
        seed.params = json!({"point_count": 0});
        let surface = render(&seed).unwrap();
        assert!(surface.pixels().iter().all(|p| p.a == 0.0));
    }

    #[test]
    fn render_huge_radius_on_tiny_surface_finishes() {
        let mut seed = Seed::new("hero-particles", 16, 16, 1);
        seed.params = json!({"point_count": 1, "radius_min": 5e5, "radius_max": 5e5, "opacity_min": 1.0, "opacity_max": 1.0});
        let surface = render(&seed).unwrap();
        assert!(surface.pixels().iter().all(|p| p.a == 1.0));
    }

    #[test]
    fn render_rejects_bad_input() {
        assert!(matches!(
            render(&Seed::new("hero-particles", 0, 16, 1)),
            Err(FieldError::InvalidDimensions)
        ));
        assert!(matches!(
            render(&Seed::new("nope", 16, 16, 1)),
            Err(FieldError::UnknownPreset(_))
        ));
        let mut seed = Seed::new("hero-particles", 16, 16, 1);
        seed.params = json!({"speed": -1.0});
        assert!(render(&seed).is_err());
    }
}
