//! Custom serde helpers for query strings and form payloads.
//!
//! Browsers submit everything as strings: empty inputs arrive as `""`,
//! unchecked checkboxes are absent, and list parameters are comma separated.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Coerces a submitted form value into a boolean.
///
/// `1`, `true`, `on` and `yes` (any case) are true; everything else is false.
pub fn coerce_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

/// Deserializes an optional id, treating an empty string as `None`.
pub fn deserialize_optional_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Deserializes a comma-separated list such as `module_ids=3,1,7`.
///
/// Empty segments are skipped, so `""` and `"3,,1"` are accepted.
pub fn deserialize_id_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = opt else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<T>().map_err(serde::de::Error::custom))
        .collect()
}
