use crate::error::{FilterError, Result};
use crate::record::VehicleRecord;
use csv::{StringRecord, WriterBuilder};
use std::io::Write;

/// Writes emitted records under the input's header, fields untouched.
pub struct RecordWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> RecordWriter<W> {
    /// Creates the writer and writes `headers` straight away, so an input with
    /// no surviving rows still produces its header.
    pub fn new(output: W, headers: &StringRecord, delimiter: u8) -> Result<Self> {
        let mut writer = WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_writer(output);
        if !headers.is_empty() {
            writer.write_record(headers)?;
        }
        Ok(Self { writer })
    }

    pub fn write(&mut self, record: &VehicleRecord) -> Result<()> {
        self.writer.write_record(&record.row)?;
        Ok(())
    }

    /// Flushes buffered output and hands back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| FilterError::Io(e.into_error()))
    }
}
