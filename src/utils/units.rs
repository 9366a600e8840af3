//! Distance parsing for field notes, which mix feet and Gunter's chains.

use crate::utils::error::{Result, SurveyError};
use regex::Regex;
use std::sync::LazyLock;

/// Feet per Gunter's chain.
pub const FEET_PER_CHAIN: f64 = 66.0;

static DISTANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([+-]?(?:\d+\.?\d*|\.\d+))\s*(ft|feet|foot|ch|chs|chain|chains)?\.?\s*$")
        .expect("distance pattern is valid")
});

pub fn chains_to_feet(chains: f64) -> f64 {
    chains * FEET_PER_CHAIN
}

pub fn feet_to_chains(feet: f64) -> f64 {
    feet / FEET_PER_CHAIN
}

/// Parses `"2640"`, `"2640 ft"`, `"40ch"` or `"40 chains"` into feet.
/// A bare number is taken as feet.
pub fn parse_distance(field_name: &str, text: &str) -> Result<f64> {
    let caps = DISTANCE_RE.captures(text).ok_or_else(|| {
        SurveyError::invalid_input(field_name, text, "expected a number in feet or chains")
    })?;

    let value: f64 = caps[1]
        .parse()
        .map_err(|_| SurveyError::invalid_input(field_name, text, "not a number"))?;

    let feet = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(unit) if unit.starts_with("ch") => chains_to_feet(value),
        _ => value,
    };

    if !feet.is_finite() {
        return Err(SurveyError::invalid_input(
            field_name,
            text,
            "distance is not finite",
        ));
    }
    Ok(feet)
}
