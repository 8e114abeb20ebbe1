use crate::record::VehicleRecord;
use std::collections::HashMap;

/// A vehicle's closest sample so far on its current approach.
#[derive(Debug, Clone)]
struct Candidate {
    record: VehicleRecord,
    /// Arrival order, used to keep flushes stable on equal timestamps.
    seq: u64,
}

/// What the tracker did with an incoming record.
#[derive(Debug)]
pub enum Transition {
    /// First sample of a new approach for a vehicle with nothing buffered.
    Buffered,
    /// Same stop, no farther away: the record became the candidate.
    Replaced,
    /// Same stop, farther away than the candidate: the record was discarded.
    Dropped,
    /// The vehicle moved on to another stop. Carries the finished approach's
    /// candidate, which must be emitted before anything else for the vehicle.
    Switched(VehicleRecord),
}

#[derive(Debug, Default)]
pub struct ClosestApproachTracker {
    candidates: HashMap<String, Candidate>,
    next_seq: u64,
}

impl ClosestApproachTracker {
    pub fn new() -> Self {
        Self {
            candidates: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn observe(&mut self, record: VehicleRecord) -> Transition {
        let seq = self.next_seq;
        self.next_seq += 1;

        let Some(current) = self.candidates.get_mut(&record.vehicle_id) else {
            self.candidates
                .insert(record.vehicle_id.clone(), Candidate { record, seq });
            return Transition::Buffered;
        };

        if current.record.stop_tag != record.stop_tag {
            let finished = std::mem::replace(current, Candidate { record, seq });
            return Transition::Switched(finished.record);
        }

        // Ties go to the later sample.
        if record.distance <= current.record.distance {
            *current = Candidate { record, seq };
            Transition::Replaced
        } else {
            Transition::Dropped
        }
    }

    /// Takes every candidate out, ordered by time then arrival.
    pub fn drain_ordered(&mut self) -> Vec<VehicleRecord> {
        let mut batch: Vec<Candidate> = self.candidates.drain().map(|(_, c)| c).collect();
        batch.sort_by(|a, b| {
            a.record
                .time
                .cmp(&b.record.time)
                .then(a.seq.cmp(&b.seq))
        });
        batch.into_iter().map(|c| c.record).collect()
    }

    pub fn candidate(&self, vehicle_id: &str) -> Option<&VehicleRecord> {
        self.candidates.get(vehicle_id).map(|c| &c.record)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
