/*!
 * Timestamp decoration: raw epoch seconds plus an ISO-8601 rendering
 */

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use log::warn;
use serde_json::{Map, Value};

/// Zone used to render timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// Host local time, with the offset in effect at each instant
    #[default]
    Local,
    /// A fixed offset from UTC
    Fixed(FixedOffset),
    /// An IANA zone, with its daylight saving rules
    Named(Tz),
}

/// Turns epoch timestamps into `{seconds, nanoseconds?, iso8601}` records
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeDecorator {
    zone: Zone,
}

impl TimeDecorator {
    pub fn new(zone: Zone) -> Self {
        Self { zone }
    }

    /// Decorator rendering in the host's local zone
    pub fn local() -> Self {
        Self::new(Zone::Local)
    }

    /// Build the decorated record for a timestamp
    pub fn decorate(&self, seconds: f64, nanoseconds: Option<i64>) -> Value {
        let mut about = Map::new();
        about.insert("seconds".to_string(), Value::from(seconds));
        if let Some(ns) = nanoseconds {
            about.insert("nanoseconds".to_string(), Value::from(ns));
        }
        let iso = match self.iso8601(seconds) {
            Some(iso) => Value::String(iso),
            None => {
                warn!("timestamp {} cannot be represented as a date", seconds);
                Value::Null
            }
        };
        about.insert("iso8601".to_string(), iso);
        Value::Object(about)
    }

    /// ISO-8601 text with an explicit `±HH:MM` offset.
    ///
    /// Microsecond precision; the fraction is left out when it is zero.
    /// Returns `None` for non-finite or out-of-range input.
    pub fn iso8601(&self, seconds: f64) -> Option<String> {
        let utc = to_utc(seconds)?;
        Some(match self.zone {
            Zone::Local => format_instant(&utc.with_timezone(&Local)),
            Zone::Fixed(offset) => format_instant(&utc.with_timezone(&offset)),
            Zone::Named(tz) => format_instant(&utc.with_timezone(&tz)),
        })
    }
}

/// Round fractional epoch seconds to the nearest microsecond
fn to_utc(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    let mut secs = whole as i64;
    let mut micros = ((seconds - whole) * 1e6).round() as u32;
    if micros >= 1_000_000 {
        secs = secs.checked_add(1)?;
        micros -= 1_000_000;
    }
    DateTime::from_timestamp(secs, micros * 1_000)
}

fn format_instant<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let format = if dt.timestamp_subsec_micros() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    dt.to_rfc3339_opts(format, false)
}
