//! # nbclosest
//!
//! Filters a stream of vehicle-position records down to one record per
//! approach: the sample where the vehicle was closest to the stop it was
//! heading for.
//!
//! Records are CSV rows carrying at least a timestamp, a vehicle id, a stop
//! tag and an integer distance to that stop. All other columns pass through
//! untouched. Rows missing any of the four, or with a non-integer distance,
//! are dropped silently.
//!
//! ```rust
//! use nbclosest::{filter_csv, FilterConfig};
//!
//! let input = "\
//! time,vehicle_id,vehicle_distance,stop_tag
//! 1433116801,V1,50,S1
//! 1433116802,V1,10,S1
//! 1433116803,V1,20,S1
//! ";
//! let mut output = Vec::new();
//! filter_csv(input.as_bytes(), &mut output, &FilterConfig::default()).unwrap();
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     "time,vehicle_id,vehicle_distance,stop_tag\n1433116802,V1,10,S1\n"
//! );
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod record;
pub mod stream;

pub use config::{FieldNames, FilterConfig, TimeZoneSetting};
pub use error::{FilterError, Result};
pub use filter::{closest_approaches, ClosestStopFilter, DayKey, FilterStats};
pub use record::{Timestamp, Validator, VehicleRecord};
pub use stream::{filter_csv, run_pipeline, PipelineReport, RecordReader, RecordWriter};
