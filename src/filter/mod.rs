//! Closest-approach filtering over a time-ordered stream of vehicle records.
//!
//! Each vehicle keeps one buffered candidate: its closest sample to the stop
//! it is currently approaching. A candidate is emitted when the vehicle
//! switches stops, when the stream crosses into a new calendar day, or when
//! the stream ends. Day and end-of-stream flushes emit in time order.

mod day_key;
mod sequencer;
mod tracker;

pub use day_key::{DayBoundary, DayKey};
pub use sequencer::{closest_approaches, ClosestApproaches};
pub use tracker::{ClosestApproachTracker, Transition};

use crate::config::TimeZoneSetting;
use crate::record::VehicleRecord;
use tracing::debug;

/// Running totals for one stream.
///
/// Once the stream has been flushed, `accepted == emitted + superseded`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Valid records handed to the filter.
    pub accepted: u64,
    /// Samples that lost to a closer (or equally close, later) sample.
    pub superseded: u64,
    pub emitted: u64,
    /// Non-empty flushes, day boundaries and end of stream alike.
    pub flushes: u64,
    /// Largest number of vehicles buffered at once.
    pub peak_buffered: usize,
}

/// The filter state for a single stream: day boundary, per-vehicle
/// candidates and counters.
#[derive(Debug)]
pub struct ClosestStopFilter {
    boundary: DayBoundary,
    tracker: ClosestApproachTracker,
    stats: FilterStats,
}

impl ClosestStopFilter {
    pub fn new(zone: TimeZoneSetting) -> Self {
        Self {
            boundary: DayBoundary::new(zone),
            tracker: ClosestApproachTracker::new(),
            stats: FilterStats::default(),
        }
    }

    /// Feeds one valid record, handing any record that became final to `emit`.
    pub fn process(&mut self, record: VehicleRecord, mut emit: impl FnMut(VehicleRecord)) {
        if let Some(previous_day) = self.boundary.advance(&record.time) {
            debug!(
                day = %previous_day,
                buffered = self.tracker.len(),
                "day boundary, flushing candidates"
            );
            self.flush(&mut emit);
        }

        self.stats.accepted += 1;
        match self.tracker.observe(record) {
            Transition::Buffered => {}
            Transition::Replaced | Transition::Dropped => self.stats.superseded += 1,
            Transition::Switched(finished) => {
                self.stats.emitted += 1;
                emit(finished);
            }
        }
        self.stats.peak_buffered = self.stats.peak_buffered.max(self.tracker.len());
    }

    /// Emits every buffered candidate in time order and clears the buffer.
    pub fn flush(&mut self, mut emit: impl FnMut(VehicleRecord)) {
        let batch = self.tracker.drain_ordered();
        if batch.is_empty() {
            return;
        }
        self.stats.flushes += 1;
        self.stats.emitted += batch.len() as u64;
        for record in batch {
            emit(record);
        }
    }

    pub fn buffered(&self) -> usize {
        self.tracker.len()
    }

    pub fn candidate(&self, vehicle_id: &str) -> Option<&VehicleRecord> {
        self.tracker.candidate(vehicle_id)
    }

    pub fn current_day(&self) -> Option<DayKey> {
        self.boundary.current()
    }

    pub fn stats(&self) -> &FilterStats {
        &self.stats
    }
}
