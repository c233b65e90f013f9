//! Numeric stat parsing.
//!
//! The feed reports nearly every figure as a display string (`"25341.01"`,
//! `"17%"`, `"--"`). Values are parsed once here; anything that is not a
//! finite number becomes `0.0`.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Parse a display-formatted stat into a number.
///
/// Accepts an optional trailing `%` and `,` digit grouping. Unparseable
/// input yields `0.0`.
pub fn parse_stat(raw: &str) -> f64 {
    let trimmed = raw.trim().trim_end_matches('%').trim();

    let parsed = if trimmed.contains(',') {
        trimmed.replace(',', "").parse::<f64>()
    } else {
        trimmed.parse::<f64>()
    };

    parsed.map(sanitize).unwrap_or(0.0)
}

fn to_count(value: f64) -> u32 {
    // float-to-int casts saturate, negatives land on 0
    value.round() as u32
}

fn sanitize(value: f64) -> f64 {
    if !value.is_finite() || value == 0.0 {
        0.0
    } else {
        value
    }
}

/// A stat field as it appears on the wire: usually a string, occasionally a
/// number, and now and then `null` or something stranger.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStat {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl RawStat {
    fn value(self) -> f64 {
        match self {
            RawStat::Number(n) => sanitize(n),
            RawStat::Text(s) => parse_stat(&s),
            RawStat::Other(_) => 0.0,
        }
    }
}

/// Serde adapter for numeric stat fields.
pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawStat::deserialize(deserializer)?.value())
}

/// Serde adapter for count stat fields.
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(to_count(RawStat::deserialize(deserializer)?.value()))
}

/// Serde adapter for display strings that may arrive as `null`.
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
