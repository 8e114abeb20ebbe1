use crate::config::TimeZoneSetting;
use crate::record::{TextualTime, Timestamp};
use chrono::NaiveDate;
use std::fmt;
use tracing::warn;

/// Calendar day of a record, rendered `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Day of `time` in `zone`. Naive textual timestamps are taken as
    /// already local; unparseable text has no day.
    pub fn of(time: &Timestamp, zone: &TimeZoneSetting) -> Option<Self> {
        let date = match time.epoch_parts() {
            Some((secs, nanos)) => zone.date_of_epoch(secs, nanos)?,
            None => match time.calendar()? {
                TextualTime::Instant(instant) => zone.date_of(&instant),
                TextualTime::LocalDate(date) => date,
            },
        };
        Some(DayKey(date))
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

/// Tracks the current day of the stream and reports when a record opens a
/// new one.
#[derive(Debug, Clone)]
pub struct DayBoundary {
    zone: TimeZoneSetting,
    current: Option<DayKey>,
    /// Set once an undatable timestamp has been reported.
    saw_undated: bool,
}

impl DayBoundary {
    pub fn new(zone: TimeZoneSetting) -> Self {
        Self {
            zone,
            current: None,
            saw_undated: false,
        }
    }

    /// Returns the day being left when `time` belongs to a different day than
    /// the current one. The first dated record only sets the day.
    pub fn advance(&mut self, time: &Timestamp) -> Option<DayKey> {
        let Some(key) = DayKey::of(time, &self.zone) else {
            if !self.saw_undated {
                self.saw_undated = true;
                warn!(
                    time = ?time,
                    "timestamp has no calendar day; such records never trigger a day flush"
                );
            }
            return None;
        };
        match self.current.replace(key) {
            Some(previous) if previous != key => Some(previous),
            _ => None,
        }
    }

    pub fn current(&self) -> Option<DayKey> {
        self.current
    }
}
