use crate::config::FieldNames;
use crate::record::{Timestamp, VehicleRecord};
use csv::StringRecord;

/// Why a row was turned away. The stream harness discards these; they exist
/// so the rules can be tested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    /// The header has no column with this name.
    MissingColumn(String),
    /// The row is too short to hold the named field.
    MissingField(String),
    EmptyField(String),
    InvalidDistance(String),
}

/// Column positions of the four required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldIndex {
    pub time: usize,
    pub vehicle_id: usize,
    pub vehicle_distance: usize,
    pub stop_tag: usize,
}

impl FieldIndex {
    pub fn resolve(headers: &StringRecord, names: &FieldNames) -> Result<Self, Malformed> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Malformed::MissingColumn(name.to_string()))
        };
        Ok(Self {
            time: position(&names.time)?,
            vehicle_id: position(&names.vehicle_id)?,
            vehicle_distance: position(&names.vehicle_distance)?,
            stop_tag: position(&names.stop_tag)?,
        })
    }
}

/// Checks rows against the header they were read under.
#[derive(Debug, Clone)]
pub struct Validator {
    names: FieldNames,
    index: Result<FieldIndex, Malformed>,
}

impl Validator {
    pub fn new(headers: &StringRecord, names: &FieldNames) -> Self {
        Self {
            names: names.clone(),
            index: FieldIndex::resolve(headers, names),
        }
    }

    /// Whether any row could pass; false when a required column is absent.
    pub fn accepts_rows(&self) -> bool {
        self.index.is_ok()
    }

    pub fn validate(&self, row: StringRecord) -> Result<VehicleRecord, Malformed> {
        let index = self.index.clone()?;

        let time = required(&row, index.time, &self.names.time)?;
        let vehicle_id = required(&row, index.vehicle_id, &self.names.vehicle_id)?;
        let stop_tag = required(&row, index.stop_tag, &self.names.stop_tag)?;
        let raw_distance = required(&row, index.vehicle_distance, &self.names.vehicle_distance)?;
        let distance: i64 = raw_distance
            .trim()
            .parse()
            .map_err(|_| Malformed::InvalidDistance(raw_distance.to_string()))?;

        let time = Timestamp::parse(time);
        let vehicle_id = vehicle_id.to_string();
        let stop_tag = stop_tag.to_string();

        Ok(VehicleRecord {
            vehicle_id,
            stop_tag,
            distance,
            time,
            row,
        })
    }
}

/// The field as written. Padding only matters for the emptiness check, so
/// `S1` and `S1 ` stay distinct stops.
fn required<'a>(row: &'a StringRecord, index: usize, name: &str) -> Result<&'a str, Malformed> {
    let value = row
        .get(index)
        .ok_or_else(|| Malformed::MissingField(name.to_string()))?;
    if value.trim().is_empty() {
        return Err(Malformed::EmptyField(name.to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures::header;

    fn validator() -> Validator {
        Validator::new(&header(), &FieldNames::default())
    }

    fn row(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_valid_row_keeps_payload() {
        let record = validator()
            .validate(row(&["1000", "V1", " 42 ", "S1", "N"]))
            .unwrap();
        assert_eq!(record.vehicle_id, "V1");
        assert_eq!(record.stop_tag, "S1");
        assert_eq!(record.distance, 42);
        assert_eq!(record.field(2), Some(" 42 "));
        assert_eq!(record.field(4), Some("N"));
    }

    #[test]
    fn test_identifiers_keep_their_padding() {
        let record = validator()
            .validate(row(&["1", " V1", "10", "S1 ", "N"]))
            .unwrap();
        assert_eq!(record.vehicle_id, " V1");
        assert_eq!(record.stop_tag, "S1 ");
    }

    #[test]
    fn test_signed_distances_parse() {
        let v = validator();
        assert_eq!(v.validate(row(&["1", "V1", "-3", "S1", ""])).unwrap().distance, -3);
        assert_eq!(v.validate(row(&["1", "V1", "+7", "S1", ""])).unwrap().distance, 7);
    }

    #[test]
    fn test_rejects_non_integer_distance() {
        let v = validator();
        assert_eq!(
            v.validate(row(&["1", "V1", " abc", "S1", "N"])).unwrap_err(),
            Malformed::InvalidDistance(" abc".to_string())
        );
        assert!(matches!(
            v.validate(row(&["1", "V1", "12.5", "S1", "N"])),
            Err(Malformed::InvalidDistance(_))
        ));
    }

    #[test]
    fn test_rejects_empty_fields() {
        let v = validator();
        assert_eq!(
            v.validate(row(&["1", "V1", "10", "", "N"])).unwrap_err(),
            Malformed::EmptyField("stop_tag".to_string())
        );
        assert_eq!(
            v.validate(row(&["  ", "V1", "10", "S1", "N"])).unwrap_err(),
            Malformed::EmptyField("time".to_string())
        );
        assert_eq!(
            v.validate(row(&["1", "", "10", "S1", "N"])).unwrap_err(),
            Malformed::EmptyField("vehicle_id".to_string())
        );
    }

    #[test]
    fn test_rejects_short_rows() {
        assert_eq!(
            validator().validate(row(&["1", "V1", "10"])).unwrap_err(),
            Malformed::MissingField("stop_tag".to_string())
        );
    }

    #[test]
    fn test_missing_column_rejects_everything() {
        let headers = row(&["time", "vehicle_id", "vehicle_distance"]);
        let v = Validator::new(&headers, &FieldNames::default());
        assert!(!v.accepts_rows());
        assert_eq!(
            v.validate(row(&["1", "V1", "10"])).unwrap_err(),
            Malformed::MissingColumn("stop_tag".to_string())
        );
    }

    #[test]
    fn test_custom_field_names() {
        let names = FieldNames {
            time: "_time".to_string(),
            ..FieldNames::default()
        };
        let headers = row(&["stop_tag", "vehicle_distance", "vehicle_id", "_time"]);
        let index = FieldIndex::resolve(&headers, &names).unwrap();
        assert_eq!(index.time, 3);
        assert_eq!(index.stop_tag, 0);

        let record = Validator::new(&headers, &names)
            .validate(row(&["S9", "5", "V2", "1433116800.000"]))
            .unwrap();
        assert_eq!(record.stop_tag, "S9");
        assert_eq!(record.vehicle_id, "V2");
    }
}
