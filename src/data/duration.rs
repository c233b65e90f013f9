//! Interval strings for settings and flags: a decimal amount followed by a
//! unit, as in `"250ms"` or `"1.5s"`.

use std::time::Duration;

use anyhow::{anyhow, ensure, Context, Result};

/// Nanoseconds in one of the given unit, if it is a unit we accept.
fn unit_nanos(unit: &str) -> Option<f64> {
    match unit {
        "ns" => Some(1.0),
        "us" | "µs" => Some(1e3),
        "ms" => Some(1e6),
        "s" => Some(1e9),
        _ => None,
    }
}

/// Parse an interval such as `"250ms"`, `"1.5s"`, `"16µs"` or `"0ns"`.
///
/// The unit is required; negative and non-finite amounts are rejected.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let text = input.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .ok_or_else(|| anyhow!("missing unit in interval {:?} (use ns, us, ms or s)", text))?;
    let (amount, unit) = text.split_at(split);

    let nanos_per_unit = unit_nanos(unit.trim())
        .ok_or_else(|| anyhow!("unrecognised interval unit {:?} in {:?}", unit, text))?;
    let amount: f64 = amount
        .parse()
        .with_context(|| format!("interval {:?} does not start with a number", text))?;
    ensure!(
        amount.is_finite() && amount >= 0.0,
        "interval {:?} must be zero or more",
        text
    );

    Ok(Duration::from_nanos((amount * nanos_per_unit) as u64))
}
