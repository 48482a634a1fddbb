//! Duration values in configuration files.
//!
//! Accepts plain integers (seconds) or unit-suffixed strings in the form
//! Go services write them: `250ns`, `300us`, `500ms`, `1.5s`, `2m`, `1h`
//! and compound forms like `1h2m30.5s`. Signs are not accepted.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Fraction digits beyond this are below nanosecond resolution for every unit.
const MAX_FRACTION_DIGITS: usize = 18;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parse a unit-suffixed duration string.
///
/// # Errors
///
/// Returns a description of the problem when the string is empty, has a
/// number without a unit, or uses an unknown unit.
///
/// # Examples
///
/// ```
/// use mpay_common::duration::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("1m30s"), Ok(Duration::from_secs(90)));
/// assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1500)));
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty duration".to_string());
    }
    if let Ok(secs) = input.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let is_number = |c: char| c.is_ascii_digit() || c == '.';
    let mut total: u128 = 0;
    let mut rest = input;
    while !rest.is_empty() {
        let len = rest.find(|c: char| !is_number(c)).unwrap_or(rest.len());
        let (whole, fraction) = rest[..len].split_once('.').unwrap_or((&rest[..len], ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(format!("invalid duration {input:?}: expected a number"));
        }
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|e| format!("invalid duration {input:?}: {e}"))?
        };
        let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
        let numerator: u128 = if fraction.is_empty() {
            0
        } else {
            fraction.parse().map_err(|e| format!("invalid duration {input:?}: {e}"))?
        };
        rest = &rest[len..];

        let unit_len = rest.find(is_number).unwrap_or(rest.len());
        let unit = match &rest[..unit_len] {
            "" => return Err(format!("invalid duration {input:?}: missing unit")),
            unit => unit_nanos(unit)
                .ok_or_else(|| format!("invalid duration {input:?}: unknown unit {unit:?}"))?,
        };
        let scale = 10u128.pow(u32::try_from(fraction.len()).unwrap_or(0));
        total = total
            .saturating_add(whole.saturating_mul(unit))
            .saturating_add(numerator * unit / scale);
        rest = &rest[unit_len..];
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).unwrap_or(u64::MAX);
    let nanos = u32::try_from(total % NANOS_PER_SEC).unwrap_or(0);
    Ok(Duration::new(secs, nanos))
}

/// Serde `deserialize_with` helper for [`Duration`] fields.
///
/// # Errors
///
/// Fails on negative numbers and strings rejected by [`parse_duration`].
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DurationVisitor)
}

struct DurationVisitor;

impl Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number of seconds or a duration string like \"5s\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
        Ok(Duration::from_secs(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
        u64::try_from(v)
            .map(Duration::from_secs)
            .map_err(|_| E::custom("duration must not be negative"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
        parse_duration(v).map_err(E::custom)
    }
}
