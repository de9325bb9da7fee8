//! Second-precision local timestamps, as carried in webhook bodies.
//!
//! Use with `#[serde(with = "paywire_webhooks::timestamp")]` on a
//! `NaiveDateTime` field to write `2024-01-15T10:30:00`.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};

/// Wire format: `YYYY-MM-DDTHH:MM:SS`, no zone or fraction
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Current local wall-clock time, truncated to whole seconds
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
}
