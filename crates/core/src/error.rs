//! Error types for neural-flow.
//!
//! The animation loop itself never fails: a missing surface disables a field
//! and a zero-sized surface just animates degenerate points. These errors
//! belong to configuration parsing, preset lookup, and offline rendering.

use thiserror::Error;

/// Errors produced while configuring fields or rendering them offline.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Width or height was zero when creating a raster surface or seed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A preset name did not match any registered preset.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// A mode or sizing name in a JSON override was not recognized.
    #[error("unknown {kind}: {name}")]
    UnknownVariant { kind: &'static str, name: String },

    /// A numeric range was empty, inverted, or not finite.
    #[error("invalid range for '{name}': [{min}, {max}]")]
    InvalidRange { name: String, min: f64, max: f64 },

    /// A scalar parameter was out of its allowed domain.
    #[error("invalid value for '{name}': {value} ({reason})")]
    InvalidValue {
        name: String,
        value: f64,
        reason: &'static str,
    },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Writing an output file failed.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = FieldError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn unknown_preset_includes_name() {
        let msg = FieldError::UnknownPreset("starfield".into()).to_string();
        assert!(msg.contains("starfield"), "missing preset name in: {msg}");
    }

    #[test]
    fn unknown_variant_includes_kind_and_name() {
        let err = FieldError::UnknownVariant {
            kind: "mode",
            name: "swarm".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("mode"), "missing kind in: {msg}");
        assert!(msg.contains("swarm"), "missing name in: {msg}");
    }

    #[test]
    fn invalid_range_includes_bounds() {
        let err = FieldError::InvalidRange {
            name: "radius".into(),
            min: 3.0,
            max: 1.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("radius"), "missing name in: {msg}");
        assert!(msg.contains('3') && msg.contains('1'), "missing bounds in: {msg}");
    }

    #[test]
    fn invalid_value_includes_reason() {
        let err = FieldError::InvalidValue {
            name: "edge_threshold".into(),
            value: -4.0,
            reason: "must be positive",
        };
        let msg = err.to_string();
        assert!(msg.contains("edge_threshold"), "missing name in: {msg}");
        assert!(msg.contains("must be positive"), "missing reason in: {msg}");
    }

    #[test]
    fn invalid_color_includes_message() {
        let msg = FieldError::InvalidColor("bad hex".into()).to_string();
        assert!(msg.contains("bad hex"), "missing message in: {msg}");
    }

    #[test]
    fn field_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FieldError>();
    }

    #[test]
    fn field_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<FieldError>();
    }
}
