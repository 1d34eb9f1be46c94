//! Lenient deserializers for loosely typed server fields
//!
//! The reload endpoint reports `server_status` and `lastupdated` as whatever
//! the server-side JSON encoder produced (numbers, numeric strings or null).
//! These helpers normalise them into stable Rust types.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an integer that may arrive as a number, a numeric string or
/// null (null and the empty string become 0)
pub fn int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| D::Error::custom(format!("integer out of range: {n}"))),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => {
            s.trim().parse::<i64>().map_err(|_| D::Error::custom(format!("not an integer: {s}")))
        }
        other => Err(D::Error::custom(format!("expected integer, got {other}"))),
    }
}

/// Deserialize an opaque marker that may arrive as a string, a number or null
pub fn opaque_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(D::Error::custom(format!("expected string or number, got {other}"))),
    }
}
