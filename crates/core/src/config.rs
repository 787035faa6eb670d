//! Field configuration: mode, sizing, point count, motion, and colors.
//!
//! The two built-in configurations are the ones the portfolio page ships
//! with: a cyan particle drift for the hero banner and a cyan-to-violet node
//! graph behind the whole page. Every tuning number is a named constant here;
//! alternative tunings live in the engines crate's preset registry.
//!
//! Configs can be adjusted with a flat JSON object of overrides (see
//! [`FieldConfig::param_schema`] for the recognized keys).

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::color::Srgb;
use crate::error::FieldError;
use crate::params::{param_f64, param_str, param_u32, param_usize};
use crate::prng::Xorshift64;

/// Viewports narrower than this get the narrow point count.
pub const DEFAULT_BREAKPOINT: u32 = 768;

pub const CYAN: Srgb = Srgb {
    r: 0.0,
    g: 1.0,
    b: 1.0,
};
/// `#9b30ff`
pub const VIOLET: Srgb = Srgb {
    r: 155.0 / 255.0,
    g: 48.0 / 255.0,
    b: 1.0,
};

pub const PARTICLE_COUNT_WIDE: usize = 60;
pub const PARTICLE_COUNT_NARROW: usize = 30;
pub const PARTICLE_SPEED: f64 = 0.4;
pub const PARTICLE_RADIUS: Span = Span::new(1.0, 3.0);
pub const PARTICLE_OPACITY: Span = Span::new(0.25, 0.75);

/// Upper bound on any point count. Edges are found by checking every pair,
/// so cost grows with the square of the count.
pub const MAX_POINTS: usize = 1_000;

pub const NODE_COUNT_WIDE: usize = 80;
pub const NODE_COUNT_NARROW: usize = 50;
pub const NODE_SPEED: f64 = 0.35;
pub const NODE_RADIUS: f64 = 2.6;
pub const EDGE_THRESHOLD: f64 = 180.0;
pub const EDGE_BASE_ALPHA: f64 = 0.25;
/// Canvas default `lineWidth`.
pub const EDGE_WIDTH: f64 = 1.0;

/// Which visual a field renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Independent translucent dots.
    Particles,
    /// Gradient-filled nodes joined by distance-faded edges.
    NodeGraph,
}

impl FromStr for Mode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "particles" => Ok(Mode::Particles),
            "node_graph" => Ok(Mode::NodeGraph),
            other => Err(FieldError::UnknownVariant {
                kind: "mode",
                name: other.to_string(),
            }),
        }
    }
}

/// What the drawing surface is sized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sizing {
    /// The surface element's own layout box.
    Container,
    /// The full host viewport.
    Viewport,
}

impl FromStr for Sizing {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "container" => Ok(Sizing::Container),
            "viewport" => Ok(Sizing::Viewport),
            other => Err(FieldError::UnknownVariant {
                kind: "sizing",
                name: other.to_string(),
            }),
        }
    }
}

/// A closed-open uniform range `[min, max)`. `min == max` is a constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub const fn constant(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn sample(&self, rng: &mut Xorshift64) -> f64 {
        rng.next_range(self.min, self.max)
    }

    fn validate(&self, name: &str, floor: f64, ceiling: f64) -> Result<(), FieldError> {
        let ok = self.min.is_finite()
            && self.max.is_finite()
            && self.min <= self.max
            && self.min >= floor
            && self.max <= ceiling;
        if ok {
            Ok(())
        } else {
            Err(FieldError::InvalidRange {
                name: name.to_string(),
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// How many points a field gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointCount {
    Fixed(usize),
    /// `narrow` points below `breakpoint` viewport pixels, `wide` otherwise.
    Breakpoint {
        narrow: usize,
        wide: usize,
        breakpoint: u32,
    },
}

impl PointCount {
    /// The largest count this rule can resolve to.
    pub fn max(&self) -> usize {
        match *self {
            PointCount::Fixed(n) => n,
            PointCount::Breakpoint { narrow, wide, .. } => narrow.max(wide),
        }
    }

    /// The count for a viewport of the given width.
    pub fn resolve(&self, viewport_width: u32) -> usize {
        match *self {
            PointCount::Fixed(n) => n,
            PointCount::Breakpoint {
                narrow,
                wide,
                breakpoint,
            } => {
                if viewport_width < breakpoint {
                    narrow
                } else {
                    wide
                }
            }
        }
    }
}

/// Edge drawing rules for node-graph mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    /// Pairs at or beyond this distance get no edge.
    pub threshold: f64,
    /// Alpha of an edge between coincident nodes.
    pub base_alpha: f64,
    pub color: Srgb,
    pub width: f64,
}

impl EdgeStyle {
    /// Edge alpha for two nodes `distance` apart, or `None` if no edge is drawn.
    ///
    /// Falls linearly from `base_alpha` at distance 0 to 0 at `threshold`.
    pub fn alpha_at(&self, distance: f64) -> Option<f64> {
        if distance < self.threshold {
            Some((1.0 - distance / self.threshold) * self.base_alpha)
        } else {
            None
        }
    }
}

/// Fill colors for points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorScheme {
    /// One color; each point supplies its own opacity.
    Flat { color: Srgb },
    /// A two-stop gradient across the surface diagonal, shared by all points.
    Gradient { start: Srgb, end: Srgb },
}

/// Everything needed to build an [`AnimatedField`](crate::field::AnimatedField).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub mode: Mode,
    pub sizing: Sizing,
    pub count: PointCount,
    /// Full width of the velocity range; each component is drawn from
    /// `[-speed/2, speed/2)`.
    pub speed: f64,
    pub radius: Span,
    /// Ignored in node-graph mode.
    pub opacity: Span,
    /// Ignored in particle mode.
    pub edges: EdgeStyle,
    pub color: ColorScheme,
}

const DEFAULT_EDGES: EdgeStyle = EdgeStyle {
    threshold: EDGE_THRESHOLD,
    base_alpha: EDGE_BASE_ALPHA,
    color: CYAN,
    width: EDGE_WIDTH,
};

impl FieldConfig {
    /// Hero-banner particle drift, sized to its container.
    pub const fn particles() -> Self {
        Self {
            mode: Mode::Particles,
            sizing: Sizing::Container,
            count: PointCount::Breakpoint {
                narrow: PARTICLE_COUNT_NARROW,
                wide: PARTICLE_COUNT_WIDE,
                breakpoint: DEFAULT_BREAKPOINT,
            },
            speed: PARTICLE_SPEED,
            radius: PARTICLE_RADIUS,
            opacity: PARTICLE_OPACITY,
            edges: DEFAULT_EDGES,
            color: ColorScheme::Flat { color: CYAN },
        }
    }

    /// Full-viewport neural network background.
    pub const fn node_graph() -> Self {
        Self {
            mode: Mode::NodeGraph,
            sizing: Sizing::Viewport,
            count: PointCount::Breakpoint {
                narrow: NODE_COUNT_NARROW,
                wide: NODE_COUNT_WIDE,
                breakpoint: DEFAULT_BREAKPOINT,
            },
            speed: NODE_SPEED,
            radius: Span::constant(NODE_RADIUS),
            opacity: Span::constant(1.0),
            edges: DEFAULT_EDGES,
            color: ColorScheme::Gradient {
                start: CYAN,
                end: VIOLET,
            },
        }
    }

    /// Checks every numeric field against its domain.
    pub fn validate(&self) -> Result<(), FieldError> {
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(FieldError::InvalidValue {
                name: "speed".into(),
                value: self.speed,
                reason: "must be finite and non-negative",
            });
        }
        if self.count.max() > MAX_POINTS {
            return Err(FieldError::InvalidValue {
                name: "point_count".into(),
                value: self.count.max() as f64,
                reason: "must not exceed MAX_POINTS (1000)",
            });
        }
        self.radius.validate("radius", 0.0, f64::MAX)?;
        self.opacity.validate("opacity", 0.0, 1.0)?;
        if !self.edges.threshold.is_finite() || self.edges.threshold <= 0.0 {
            return Err(FieldError::InvalidValue {
                name: "edge_threshold".into(),
                value: self.edges.threshold,
                reason: "must be finite and positive",
            });
        }
        if !(0.0..=1.0).contains(&self.edges.base_alpha) {
            return Err(FieldError::InvalidValue {
                name: "edge_alpha".into(),
                value: self.edges.base_alpha,
                reason: "must lie in [0, 1]",
            });
        }
        if !self.edges.width.is_finite() || self.edges.width <= 0.0 {
            return Err(FieldError::InvalidValue {
                name: "edge_width".into(),
                value: self.edges.width,
                reason: "must be finite and positive",
            });
        }
        Ok(())
    }

    /// Applies a flat JSON override object and validates the result.
    ///
    /// Unknown keys are ignored; known keys with the wrong JSON type keep the
    /// base value. Unparseable colors and mode names are errors.
    pub fn with_overrides(&self, params: &Value) -> Result<Self, FieldError> {
        let mut cfg = *self;

        if let Some(mode) = param_str(params, "mode") {
            cfg.mode = mode.parse()?;
        }
        if let Some(sizing) = param_str(params, "sizing") {
            cfg.sizing = sizing.parse()?;
        }

        cfg.count = override_count(cfg.count, params);

        cfg.speed = param_f64(params, "speed", cfg.speed);
        cfg.radius = Span::new(
            param_f64(params, "radius_min", cfg.radius.min),
            param_f64(params, "radius_max", cfg.radius.max),
        );
        cfg.opacity = Span::new(
            param_f64(params, "opacity_min", cfg.opacity.min),
            param_f64(params, "opacity_max", cfg.opacity.max),
        );

        cfg.edges.threshold = param_f64(params, "edge_threshold", cfg.edges.threshold);
        cfg.edges.base_alpha = param_f64(params, "edge_alpha", cfg.edges.base_alpha);
        cfg.edges.width = param_f64(params, "edge_width", cfg.edges.width);
        if let Some(hex) = param_str(params, "edge_color") {
            cfg.edges.color = Srgb::from_hex(hex)?;
        }

        cfg.color = override_colors(cfg.color, params)?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// The config as a flat override object; feeding it back through
    /// [`with_overrides`](Self::with_overrides) reproduces `self`.
    pub fn to_params(&self) -> Value {
        let mut out = json!({
            "mode": self.mode,
            "sizing": self.sizing,
            "speed": self.speed,
            "radius_min": self.radius.min,
            "radius_max": self.radius.max,
            "opacity_min": self.opacity.min,
            "opacity_max": self.opacity.max,
            "edge_threshold": self.edges.threshold,
            "edge_alpha": self.edges.base_alpha,
            "edge_width": self.edges.width,
            "edge_color": self.edges.color,
        });
        match self.count {
            PointCount::Fixed(n) => out["point_count"] = json!(n),
            PointCount::Breakpoint {
                narrow,
                wide,
                breakpoint,
            } => {
                out["narrow_point_count"] = json!(narrow);
                out["wide_point_count"] = json!(wide);
                out["breakpoint"] = json!(breakpoint);
            }
        }
        match self.color {
            ColorScheme::Flat { color } => out["color"] = json!(color),
            ColorScheme::Gradient { start, end } => {
                out["gradient_start"] = json!(start);
                out["gradient_end"] = json!(end);
            }
        }
        out
    }

    /// Describes every override key [`with_overrides`](Self::with_overrides) understands.
    pub fn param_schema() -> Value {
        json!({
            "mode": {"type": "string", "enum": ["particles", "node_graph"], "description": "Visual mode"},
            "sizing": {"type": "string", "enum": ["container", "viewport"], "description": "What the surface is sized to"},
            "point_count": {"type": "integer", "min": 0, "max": MAX_POINTS, "description": "Fixed point count (replaces any breakpoint rule)"},
            "narrow_point_count": {"type": "integer", "min": 0, "max": MAX_POINTS, "description": "Point count below the breakpoint"},
            "wide_point_count": {"type": "integer", "min": 0, "max": MAX_POINTS, "description": "Point count at or above the breakpoint"},
            "breakpoint": {"type": "integer", "default": DEFAULT_BREAKPOINT, "description": "Viewport width in pixels separating narrow from wide"},
            "speed": {"type": "number", "min": 0.0, "description": "Velocity components are drawn from [-speed/2, speed/2)"},
            "radius_min": {"type": "number", "min": 0.0, "description": "Smallest point radius"},
            "radius_max": {"type": "number", "min": 0.0, "description": "Largest point radius"},
            "opacity_min": {"type": "number", "min": 0.0, "max": 1.0, "description": "Smallest particle opacity"},
            "opacity_max": {"type": "number", "min": 0.0, "max": 1.0, "description": "Largest particle opacity"},
            "edge_threshold": {"type": "number", "default": EDGE_THRESHOLD, "description": "Node distance beyond which no edge is drawn"},
            "edge_alpha": {"type": "number", "default": EDGE_BASE_ALPHA, "min": 0.0, "max": 1.0, "description": "Edge alpha at distance 0"},
            "edge_width": {"type": "number", "default": EDGE_WIDTH, "description": "Edge stroke width"},
            "edge_color": {"type": "string", "format": "hex", "description": "Edge color"},
            "color": {"type": "string", "format": "hex", "description": "Flat fill color (switches to a flat scheme)"},
            "gradient_start": {"type": "string", "format": "hex", "description": "Gradient color at the top-left corner"},
            "gradient_end": {"type": "string", "format": "hex", "description": "Gradient color at the bottom-right corner"}
        })
    }
}

fn override_count(base: PointCount, params: &Value) -> PointCount {
    if params.get("point_count").and_then(Value::as_u64).is_some() {
        return PointCount::Fixed(param_usize(params, "point_count", 0));
    }
    let touched = ["narrow_point_count", "wide_point_count", "breakpoint"]
        .iter()
        .any(|k| params.get(*k).is_some());
    if !touched {
        return base;
    }
    let (narrow, wide, breakpoint) = match base {
        PointCount::Fixed(n) => (n, n, DEFAULT_BREAKPOINT),
        PointCount::Breakpoint {
            narrow,
            wide,
            breakpoint,
        } => (narrow, wide, breakpoint),
    };
    PointCount::Breakpoint {
        narrow: param_usize(params, "narrow_point_count", narrow),
        wide: param_usize(params, "wide_point_count", wide),
        breakpoint: param_u32(params, "breakpoint", breakpoint),
    }
}

fn override_colors(base: ColorScheme, params: &Value) -> Result<ColorScheme, FieldError> {
    if let Some(hex) = param_str(params, "color") {
        return Ok(ColorScheme::Flat {
            color: Srgb::from_hex(hex)?,
        });
    }
    let start = param_str(params, "gradient_start");
    let end = param_str(params, "gradient_end");
    if start.is_none() && end.is_none() {
        return Ok(base);
    }
    let (base_start, base_end) = match base {
        ColorScheme::Flat { color } => (color, color),
        ColorScheme::Gradient { start, end } => (start, end),
    };
    Ok(ColorScheme::Gradient {
        start: start.map(Srgb::from_hex).transpose()?.unwrap_or(base_start),
        end: end.map(Srgb::from_hex).transpose()?.unwrap_or(base_end),
    })
}
