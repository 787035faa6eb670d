#![deny(unsafe_code)]
//! Core types for neural-flow animated point fields.
//!
//! Provides [`Point`] and its reflection step, [`AnimatedField`] (particles
//! and node graphs), [`FieldConfig`] with JSON overrides, color and gradient
//! types, the [`Surface`] and [`Host`] seams, the frame runner
//! [`host::start`], the `Xorshift64` PRNG, and the render [`Seed`].

pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod gradient;
pub mod host;
pub mod params;
pub mod point;
pub mod prng;
pub mod seed;
pub mod surface;

pub use color::{Rgba, Srgb};
pub use config::{ColorScheme, EdgeStyle, FieldConfig, Mode, PointCount, Sizing, Span};
pub use error::FieldError;
pub use field::{AnimatedField, Edge};
pub use gradient::LinearGradient;
pub use host::{start, Host, StopHandle};
pub use point::{advance, Point};
pub use prng::Xorshift64;
pub use seed::Seed;
pub use surface::{DrawCommand, Extent, Fill, Recorder, Surface};
