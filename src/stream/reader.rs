use crate::config::FilterConfig;
use crate::error::Result;
use crate::record::{Validator, VehicleRecord};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use tracing::warn;

/// Reads CSV rows and yields the ones that pass validation.
pub struct RecordReader<R> {
    reader: csv::Reader<R>,
    headers: StringRecord,
    validator: Validator,
}

impl<R: Read> RecordReader<R> {
    pub fn new(input: R, config: &FilterConfig) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(config.delimiter_byte()?)
            .flexible(true)
            .from_reader(input);
        let headers = reader.headers()?.clone();
        let validator = Validator::new(&headers, &config.fields);
        if !headers.is_empty() && !validator.accepts_rows() {
            warn!(
                headers = ?headers,
                "input lacks a required column; no records will pass"
            );
        }
        Ok(Self {
            reader,
            headers,
            validator,
        })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// Next valid record, `None` at end of input. Malformed rows are skipped.
    pub fn next_record(&mut self) -> Result<Option<VehicleRecord>> {
        loop {
            let mut row = StringRecord::new();
            if !self.reader.read_record(&mut row)? {
                return Ok(None);
            }
            if let Ok(record) = self.validator.validate(row) {
                return Ok(Some(record));
            }
        }
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<VehicleRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
