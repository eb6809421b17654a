/*
    clock.rs - Current-time provider and timestamp text format

    The store never reads the system time directly. A Clock is injected at
    construction so owners can share one time source and tests can pin it.

    Timestamps are stored as text inside the map itself, so the rendering
    layout is part of the data:
    - rfc3339:   2026-10-18T09:30:00Z
    - text_date: Sun Oct 18 09:30:00 2026 GMT (day of month unpadded)
    Parsing accepts either layout regardless of the configured one.
*/

use super::errors::TimestampError;
use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

const TEXT_DATE_LAYOUT: &str = "%a %b %d %H:%M:%S %Y";
const TEXT_DATE_RENDER: &str = "%a %b %-d %H:%M:%S %Y GMT";

/// Source of the current UTC time
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    /// Pin the clock to `time`
    pub fn set(&self, time: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = time;
    }

    /// Move the clock forward by `secs` seconds
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Text layout used when writing timestamps into the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    #[default]
    Rfc3339,
    TextDate,
}

impl TimestampFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimestampFormat::Rfc3339 => "rfc3339",
            TimestampFormat::TextDate => "text_date",
        }
    }

    /// Render `time` with second precision
    pub fn render(&self, time: DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Rfc3339 => time.to_rfc3339_opts(SecondsFormat::Secs, true),
            TimestampFormat::TextDate => time.format(TEXT_DATE_RENDER).to_string(),
        }
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimestampFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rfc3339" | "iso" | "iso8601" => Ok(TimestampFormat::Rfc3339),
            "text_date" | "text" => Ok(TimestampFormat::TextDate),
            other => Err(format!("unknown timestamp format: {}", other)),
        }
    }
}

/// Parse a stored timestamp in either supported layout.
///
/// Text dates carry no offset and are read as UTC; a trailing `GMT` or
/// `UTC` designator is accepted.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TimestampError::Empty);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let text = raw
        .strip_suffix(" GMT")
        .or_else(|| raw.strip_suffix(" UTC"))
        .unwrap_or(raw);

    NaiveDateTime::parse_from_str(text, TEXT_DATE_LAYOUT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| TimestampError::Unrecognised(raw.to_string()))
}
