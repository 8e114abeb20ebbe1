//! CSV plumbing around the filter: reading rows, writing survivors, and
//! driving a whole stream through to its final flush.

mod pipeline;
mod reader;
mod writer;

pub use pipeline::{run_pipeline, PipelineReport};
pub use reader::RecordReader;
pub use writer::RecordWriter;

use crate::config::FilterConfig;
use crate::error::Result;
use crate::filter::{ClosestStopFilter, FilterStats};
use std::io::{Read, Write};

/// Filters a whole CSV stream on the calling thread.
///
/// The final flush runs even when reading fails part way, so every buffered
/// candidate reaches `output` before the read error is returned.
pub fn filter_csv<R: Read, W: Write>(
    input: R,
    output: W,
    config: &FilterConfig,
) -> Result<FilterStats> {
    let mut reader = RecordReader::new(input, config)?;
    let mut writer = RecordWriter::new(output, reader.headers(), config.delimiter_byte()?)?;
    let mut filter = ClosestStopFilter::new(config.time_zone);

    let mut emitted = Vec::new();
    let read_outcome = loop {
        match reader.next_record() {
            Ok(Some(record)) => filter.process(record, |r| emitted.push(r)),
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
        for record in emitted.drain(..) {
            writer.write(&record)?;
        }
    };

    filter.flush(|r| emitted.push(r));
    for record in emitted.drain(..) {
        writer.write(&record)?;
    }
    writer.finish()?;
    read_outcome?;

    Ok(*filter.stats())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeZoneSetting;

    fn utc_config() -> FilterConfig {
        FilterConfig {
            time_zone: TimeZoneSetting::Named(chrono_tz::UTC),
            ..FilterConfig::default()
        }
    }

    #[test]
    fn test_filter_csv_round_trip() {
        let input = "\
time,vehicle_id,vehicle_distance,stop_tag,route
1433116801,V1,50,S1,N
1433116802,V1,30,S1,N
1433116803,V1,10,S1,N
1433116804,V1,20,S1,N
1433116805,V1,400,S2,N
";
        let mut output = Vec::new();
        let stats = filter_csv(input.as_bytes(), &mut output, &utc_config()).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "\
time,vehicle_id,vehicle_distance,stop_tag,route
1433116803,V1,10,S1,N
1433116805,V1,400,S2,N
"
        );
        assert_eq!(stats.accepted, 5);
        assert_eq!(stats.emitted, 2);
    }

    #[test]
    fn test_read_error_still_flushes() {
        // Invalid UTF-8 in the third row fails the read.
        let mut input = b"time,vehicle_id,vehicle_distance,stop_tag\n1,V1,10,S1\n".to_vec();
        input.extend_from_slice(b"2,V\xff,5,S1\n");

        let mut output = Vec::new();
        let result = filter_csv(input.as_slice(), &mut output, &utc_config());
        assert!(result.is_err());
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "time,vehicle_id,vehicle_distance,stop_tag\n1,V1,10,S1\n"
        );
    }
}
