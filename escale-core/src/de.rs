//! Lenient deserializers for fields the upstream API sends with varying types.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

/// Accepts `"42"`, `42` or `42.0` and yields `"42"`.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(i) => i.to_string(),
        StringOrNumber::Float(f) if f.fract() == 0.0 => (f as i64).to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    })
}

/// Prices and ratings sometimes arrive as strings (`"12.50"`) or null.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(match value {
        None => 0.0,
        Some(StringOrNumber::Int(i)) => i as f64,
        Some(StringOrNumber::Float(f)) => f,
        Some(StringOrNumber::String(s)) => s.trim().parse().map_err(serde::de::Error::custom)?,
    })
}
