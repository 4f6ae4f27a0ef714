//! Lenient event timestamps.
//!
//! Datasets carry dates as strings in several shapes (`2024-11-26`,
//! `2024-11-26T10:30:00Z`, `2024-11-26T10:30:00`). A value that cannot be
//! parsed is kept verbatim and reported as undated: it never matches a date
//! window, but the record itself stays in the ledger.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventDate {
    raw: String,
    instant: Option<DateTime<Utc>>,
}

impl EventDate {
    /// Parses `raw`, keeping it even when it is not a recognized timestamp.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let instant = parse_instant(raw.trim());
        Self { raw, instant }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed instant, `None` for malformed or missing dates.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }

    /// Whole days elapsed between this date and `now`, rounded towards
    /// negative infinity. Future dates give negative values.
    pub fn days_before(&self, now: DateTime<Utc>) -> Option<i64> {
        self.instant
            .map(|instant| (now - instant).num_milliseconds().div_euclid(MILLIS_PER_DAY))
    }
}

impl From<DateTime<Utc>> for EventDate {
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            raw: value.to_rfc3339(),
            instant: Some(value),
        }
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl Serialize for EventDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for EventDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::parse(raw.unwrap_or_default()))
    }
}
