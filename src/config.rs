use crate::error::{FilterError, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Names of the columns the filter reads. Everything else is payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub time: String,
    pub vehicle_id: String,
    pub vehicle_distance: String,
    pub stop_tag: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            time: "time".to_string(),
            vehicle_id: "vehicle_id".to_string(),
            vehicle_distance: "vehicle_distance".to_string(),
            stop_tag: "stop_tag".to_string(),
        }
    }
}

/// Zone in which a timestamp's calendar day is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum TimeZoneSetting {
    /// The host's local zone.
    #[default]
    Local,
    Named(Tz),
}

impl TimeZoneSetting {
    pub fn date_of_epoch(&self, secs: i64, nanos: u32) -> Option<NaiveDate> {
        match self {
            TimeZoneSetting::Local => Local
                .timestamp_opt(secs, nanos)
                .single()
                .map(|dt| dt.date_naive()),
            TimeZoneSetting::Named(tz) => tz
                .timestamp_opt(secs, nanos)
                .single()
                .map(|dt| dt.date_naive()),
        }
    }

    pub fn date_of(&self, instant: &DateTime<FixedOffset>) -> NaiveDate {
        match self {
            TimeZoneSetting::Local => instant.with_timezone(&Local).date_naive(),
            TimeZoneSetting::Named(tz) => instant.with_timezone(tz).date_naive(),
        }
    }
}

impl FromStr for TimeZoneSetting {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("local") {
            return Ok(TimeZoneSetting::Local);
        }
        name.parse::<Tz>()
            .map(TimeZoneSetting::Named)
            .map_err(|_| FilterError::UnknownTimeZone(name.to_string()))
    }
}

impl TryFrom<String> for TimeZoneSetting {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for TimeZoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneSetting::Local => f.write_str("local"),
            TimeZoneSetting::Named(tz) => f.write_str(tz.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub fields: FieldNames,
    pub time_zone: TimeZoneSetting,
    pub delimiter: char,
    /// Bound of each channel in the async pipeline.
    pub channel_capacity: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            fields: FieldNames::default(),
            time_zone: TimeZoneSetting::default(),
            delimiter: ',',
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl FilterConfig {
    /// Reads a JSON config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_error = |reason: String| FilterError::Config {
            path: path.display().to_string(),
            reason,
        };
        let content = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| config_error(e.to_string()))
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(FilterError::InvalidDelimiter(self.delimiter.to_string()))
        }
    }
}
