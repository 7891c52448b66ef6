//! Parse-or-default helpers for loosely typed sheet data.
//!
//! Character files are hand-edited and written by several tool versions, so a
//! number may arrive as a JSON number, a numeric string, a bool or null. These
//! helpers turn any of those into the typed value or a caller-chosen default,
//! and never fail.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Integer from a JSON value. Floats truncate toward zero; out-of-range
/// values, non-numeric strings, arrays and objects yield `default`.
pub fn int_or(value: &Value, default: i32) -> i32 {
    try_int(value).unwrap_or(default)
}

pub fn try_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .or_else(|| n.as_f64().and_then(f64_to_i32)),
        Value::String(s) => {
            let t = s.trim();
            t.parse::<i32>()
                .ok()
                .or_else(|| t.parse::<f64>().ok().and_then(f64_to_i32))
        }
        Value::Bool(b) => Some(i32::from(*b)),
        _ => None,
    }
}

pub fn float_or(value: &Value, default: f64) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(default),
        Value::String(s) => s
            .trim()
            .parse()
            .ok()
            .filter(|f: &f64| f.is_finite())
            .unwrap_or(default),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => default,
    }
}

pub fn bool_or(value: &Value, default: bool) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(default, |f| f != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => true,
            "false" | "no" | "0" | "" => false,
            _ => default,
        },
        _ => default,
    }
}

/// Integer from user-entered text; blank or malformed text yields `default`.
pub fn str_int_or(s: &str, default: i32) -> i32 {
    try_int(&Value::String(s.to_string())).unwrap_or(default)
}

pub fn string_or_empty(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn f64_to_i32(f: f64) -> Option<i32> {
    let t = f.trunc();
    (t.is_finite() && t >= f64::from(i32::MIN) && t <= f64::from(i32::MAX)).then_some(t as i32)
}

/// `deserialize_with` adapters. Pair each with `#[serde(default)]` so a
/// missing field also takes the type's default.
pub mod lenient {
    use super::*;

    pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
        Ok(int_or(&Value::deserialize(d)?, 0))
    }

    pub fn float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(match v {
            Value::Null => None,
            other => Some(float_or(&other, f64::NAN)).filter(|f| f.is_finite()),
        })
    }

    /// `None` when the value is absent, null or not a number.
    pub fn opt_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
        Ok(try_int(&Value::deserialize(d)?))
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(bool_or(&Value::deserialize(d)?, false))
    }

    pub fn flag_true<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(bool_or(&Value::deserialize(d)?, true))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(string_or_empty(&Value::deserialize(d)?))
    }
}
