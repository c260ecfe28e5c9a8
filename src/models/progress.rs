//! Progress series for a single exercise.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::wire::lenient_f64;
use crate::error::ValidationError;

/// One sample on an exercise's progress chart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawProgressPoint")]
pub struct ProgressPoint {
    pub recorded_at: DateTime<Utc>,
    pub value: f64,
}

#[derive(Deserialize)]
struct RawProgressPoint {
    #[serde(alias = "fecha", alias = "date")]
    time: Value,
    #[serde(default, alias = "valor", alias = "peso", deserialize_with = "lenient_f64")]
    value: Option<f64>,
}

impl TryFrom<RawProgressPoint> for ProgressPoint {
    type Error = String;

    fn try_from(raw: RawProgressPoint) -> Result<Self, Self::Error> {
        let recorded_at =
            parse_timestamp(&raw.time).ok_or_else(|| format!("invalid progress time: {}", raw.time))?;
        Ok(ProgressPoint {
            recorded_at,
            value: raw.value.unwrap_or(0.0),
        })
    }
}

/// RFC 3339, `YYYY-MM-DD` (midnight UTC) or unix seconds.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
            }
            s.parse::<i64>()
                .ok()
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        }
        _ => None,
    }
}

/// Trailing window shown on the progress chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartRange {
    OneDay,
    OneWeek,
    OneMonth,
    #[default]
    OneYear,
}

impl ChartRange {
    pub const ALL: [ChartRange; 4] = [
        ChartRange::OneDay,
        ChartRange::OneWeek,
        ChartRange::OneMonth,
        ChartRange::OneYear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartRange::OneDay => "1D",
            ChartRange::OneWeek => "1W",
            ChartRange::OneMonth => "1M",
            ChartRange::OneYear => "1Y",
        }
    }

    pub fn window(&self) -> Duration {
        match self {
            ChartRange::OneDay => Duration::days(1),
            ChartRange::OneWeek => Duration::weeks(1),
            ChartRange::OneMonth => Duration::days(30),
            ChartRange::OneYear => Duration::days(365),
        }
    }

    /// Points inside `(now - window, now]`, oldest first.
    pub fn filter_points(&self, points: &[ProgressPoint], now: DateTime<Utc>) -> Vec<ProgressPoint> {
        let start = now - self.window();
        let mut visible: Vec<ProgressPoint> = points
            .iter()
            .filter(|p| p.recorded_at > start && p.recorded_at <= now)
            .cloned()
            .collect();
        visible.sort_by_key(|p| p.recorded_at);
        visible
    }
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "range",
                message: format!("'{}' is not one of 1D, 1W, 1M, 1Y", s),
            })
    }
}
