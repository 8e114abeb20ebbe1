use super::{ClosestStopFilter, FilterStats};
use crate::config::TimeZoneSetting;
use crate::record::VehicleRecord;
use std::collections::VecDeque;

/// Lazily filters an iterator of valid records.
///
/// Records are yielded as soon as they become final. When the input runs
/// out, the remaining candidates are flushed in time order.
#[derive(Debug)]
pub struct ClosestApproaches<I> {
    input: Option<I>,
    filter: ClosestStopFilter,
    ready: VecDeque<VehicleRecord>,
}

pub fn closest_approaches<I>(records: I, zone: TimeZoneSetting) -> ClosestApproaches<I::IntoIter>
where
    I: IntoIterator<Item = VehicleRecord>,
{
    ClosestApproaches {
        input: Some(records.into_iter()),
        filter: ClosestStopFilter::new(zone),
        ready: VecDeque::new(),
    }
}

impl<I> ClosestApproaches<I> {
    pub fn stats(&self) -> &FilterStats {
        self.filter.stats()
    }
}

impl<I: Iterator<Item = VehicleRecord>> Iterator for ClosestApproaches<I> {
    type Item = VehicleRecord;

    fn next(&mut self) -> Option<VehicleRecord> {
        loop {
            if let Some(record) = self.ready.pop_front() {
                return Some(record);
            }
            let input = self.input.as_mut()?;
            let ready = &mut self.ready;
            match input.next() {
                Some(record) => self.filter.process(record, |r| ready.push_back(r)),
                None => {
                    self.input = None;
                    self.filter.flush(|r| ready.push_back(r));
                }
            }
        }
    }
}
