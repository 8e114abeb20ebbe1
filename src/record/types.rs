use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::cmp::Ordering;

/// Layouts carrying an offset that RFC 3339 parsing rejects (`-0700`, no seconds).
const OFFSET_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];
/// Naive layouts accepted for textual timestamps, read as local wall-clock time.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const NAIVE_DATE_FORMAT: &str = "%Y-%m-%d";

/// The parsed form of a record's `time` field.
///
/// Numeric values are epoch seconds (Splunk writes `_time` as
/// `1433116800.000`); anything else is kept as text and ordered lexically,
/// which is correct for ISO 8601 strings sharing one layout.
#[derive(Debug, Clone)]
pub enum Timestamp {
    Epoch(f64),
    Text(String),
}

impl Timestamp {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(secs) if secs.is_finite() => Timestamp::Epoch(secs),
            _ => Timestamp::Text(trimmed.to_string()),
        }
    }

    /// Splits an epoch timestamp into whole seconds and nanoseconds.
    pub fn epoch_parts(&self) -> Option<(i64, u32)> {
        match self {
            Timestamp::Epoch(secs) => {
                let whole = secs.floor();
                if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
                    return None;
                }
                let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
                Some((whole as i64, nanos))
            }
            Timestamp::Text(_) => None,
        }
    }

    /// Interprets a textual timestamp, either as an instant carrying its own
    /// offset or as a calendar date already expressed in local time.
    pub fn calendar(&self) -> Option<TextualTime> {
        let Timestamp::Text(text) = self else {
            return None;
        };
        if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
            return Some(TextualTime::Instant(instant));
        }
        for format in OFFSET_DATETIME_FORMATS {
            if let Ok(instant) = DateTime::parse_from_str(text, format) {
                return Some(TextualTime::Instant(instant));
            }
        }
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Some(TextualTime::LocalDate(naive.date()));
            }
        }
        NaiveDate::parse_from_str(text, NAIVE_DATE_FORMAT)
            .ok()
            .map(TextualTime::LocalDate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextualTime {
    Instant(DateTime<FixedOffset>),
    LocalDate(NaiveDate),
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Timestamp::Epoch(a), Timestamp::Epoch(b)) => a.total_cmp(b),
            (Timestamp::Text(a), Timestamp::Text(b)) => a.cmp(b),
            (Timestamp::Epoch(_), Timestamp::Text(_)) => Ordering::Less,
            (Timestamp::Text(_), Timestamp::Epoch(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timestamp {}

/// A row that passed validation, with its key fields lifted out of the
/// untouched source row.
#[derive(Debug, Clone)]
pub struct VehicleRecord {
    pub vehicle_id: String,
    pub stop_tag: String,
    pub distance: i64,
    pub time: Timestamp,
    /// The full input row, written back out unchanged when emitted.
    pub row: StringRecord,
}

impl VehicleRecord {
    /// Field value of the source row at `index`, if present.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.row.get(index)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::config::FieldNames;
    use crate::record::Validator;

    /// Header matching [`FieldNames::default`] plus one payload column.
    pub fn header() -> StringRecord {
        StringRecord::from(vec!["time", "vehicle_id", "vehicle_distance", "stop_tag", "route"])
    }

    pub fn record(time: &str, vehicle_id: &str, stop_tag: &str, distance: i64) -> VehicleRecord {
        let validator = Validator::new(&header(), &FieldNames::default());
        let distance = distance.to_string();
        let row = StringRecord::from(vec![time, vehicle_id, distance.as_str(), stop_tag, "N"]);
        validator.validate(row).expect("fixture rows are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_timestamps_order_numerically() {
        let early = Timestamp::parse("999.5");
        let late = Timestamp::parse("1000");
        assert!(early < late);
        assert_eq!(Timestamp::parse(" 1000.0 "), late);
    }

    #[test]
    fn test_text_timestamps_order_lexically() {
        let early = Timestamp::parse("2015-06-01T08:00:00");
        let late = Timestamp::parse("2015-06-01T09:00:00");
        assert!(early < late);
        assert!(Timestamp::parse("1433116800") < early);
    }

    #[test]
    fn test_epoch_parts() {
        assert_eq!(Timestamp::parse("1433116800.25").epoch_parts(), Some((1433116800, 250_000_000)));
        assert_eq!(Timestamp::parse("-1.5").epoch_parts(), Some((-2, 500_000_000)));
        assert_eq!(Timestamp::parse("2015-06-01").epoch_parts(), None);
    }

    #[test]
    fn test_offsets_without_colon() {
        let expected = DateTime::parse_from_rfc3339("2015-06-01T23:30:00-07:00").unwrap();
        for text in [
            "2015-06-01T23:30:00-0700",
            "2015-06-01 23:30:00.000-0700",
            "2015-06-01T23:30-0700",
        ] {
            assert_eq!(
                Timestamp::parse(text).calendar(),
                Some(TextualTime::Instant(expected)),
                "{text}"
            );
        }
    }

    #[test]
    fn test_calendar_formats() {
        let date = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();
        assert_eq!(
            Timestamp::parse("2015-06-01 23:59:59.500").calendar(),
            Some(TextualTime::LocalDate(date))
        );
        assert_eq!(
            Timestamp::parse("2015-06-01").calendar(),
            Some(TextualTime::LocalDate(date))
        );
        assert!(matches!(
            Timestamp::parse("2015-06-01T23:30:00-07:00").calendar(),
            Some(TextualTime::Instant(_))
        ));
        assert_eq!(
            Timestamp::parse("2015-06-01T08:00").calendar(),
            Some(TextualTime::LocalDate(date))
        );
        assert_eq!(Timestamp::parse("yesterday").calendar(), None);
        assert_eq!(Timestamp::parse("1433116800").calendar(), None);
    }
}
