mod types;
mod validator;

pub use types::{TextualTime, Timestamp, VehicleRecord};
pub use validator::{FieldIndex, Malformed, Validator};

#[cfg(test)]
pub(crate) use types::fixtures;
