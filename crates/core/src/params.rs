//! Typed lookups into a JSON override object.
//!
//! Each helper returns the default when the key is missing or holds the wrong
//! JSON type, matching the page's habit of treating malformed numbers as
//! absent. Range and domain checks happen afterwards in
//! [`FieldConfig::validate`](crate::config::FieldConfig::validate).

use serde_json::Value;

/// `params[name]` as `f64`; integers are accepted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// `params[name]` as a non-negative integer `usize`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// `params[name]` as a `u32`; values that do not fit fall back to `default`.
pub fn param_u32(params: &Value, name: &str, default: u32) -> u32 {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

/// `params[name]` as a borrowed string, or `None`.
pub fn param_str<'a>(params: &'a Value, name: &str) -> Option<&'a str> {
    params.get(name).and_then(Value::as_str)
}
