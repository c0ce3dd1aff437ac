//! Calendar-day bucketing in one explicit reference frame.
//!
//! Every timestamp-to-date conversion in the crate goes through a [`CalendarFrame`], so
//! transaction dates and bucket keys never depend on the host's local zone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Offset, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::time::Clock;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";
const LABEL_FORMAT: &str = "%b %d";
/// Real-world offsets stay within UTC-12:00 and UTC+14:00; allow the symmetric bound.
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Longest window the series builders produce: one hundred years of days.
pub const MAX_WINDOW_DAYS: usize = 36_525;

/// Fixed UTC offset used to turn instants into calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFrame {
    offset: FixedOffset,
}

impl Default for CalendarFrame {
    fn default() -> Self {
        Self::utc()
    }
}

impl CalendarFrame {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Returns `None` for offsets beyond ±14 hours.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        if minutes.abs() > MAX_OFFSET_MINUTES {
            return None;
        }
        FixedOffset::east_opt(minutes * 60).map(|offset| Self { offset })
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / 60
    }

    /// Calendar date of `at` in this frame; time of day is discarded.
    pub fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    pub fn key_of(&self, at: DateTime<Utc>) -> DateKey {
        DateKey(self.date_of(at))
    }

    pub fn today(&self, clock: &dyn Clock) -> NaiveDate {
        self.date_of(clock.now())
    }

    /// `days` contiguous dates, oldest first, ending at `today`.
    ///
    /// `days` is capped at [`MAX_WINDOW_DAYS`], and the window never starts before
    /// [`NaiveDate::MIN`]; both cases yield fewer dates but never a gap.
    pub fn window(today: NaiveDate, days: usize) -> Vec<NaiveDate> {
        let days = days.min(MAX_WINDOW_DAYS);
        if days == 0 {
            return Vec::new();
        }
        let start = today
            .checked_sub_days(Days::new(days as u64 - 1))
            .unwrap_or(NaiveDate::MIN);
        start
            .iter_days()
            .take_while(|date| *date <= today)
            .collect()
    }
}

/// Canonical `YYYY-MM-DD` key of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Short chart label such as `Mar 07`.
    pub fn label(&self) -> String {
        self.0.format(LABEL_FORMAT).to_string()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(value.trim(), DATE_KEY_FORMAT).map(Self)
    }
}

impl Serialize for DateKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateKey::from_str(&raw).map_err(de::Error::custom)
    }
}
