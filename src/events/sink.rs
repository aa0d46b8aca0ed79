//! Event sinks.
//!
//! The engine pushes every record into an `EventSink`; where records end
//! up is the sink's business. `MemoryLog` keeps them in a persistent
//! vector, `NullSink` drops them.

use im::Vector;

use super::record::{EventAction, EventRecord};

/// Append-only destination for event records.
pub trait EventSink {
    /// Append a record.
    fn record(&mut self, record: EventRecord);

    /// Whether mutating commands should carry before/after snapshots.
    fn wants_snapshots(&self) -> bool {
        false
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _record: EventRecord) {}
}

/// In-memory event log.
///
/// Backed by `im::Vector`, so cloning the log is O(1).
#[derive(Clone, Debug, Default)]
pub struct MemoryLog {
    records: Vector<EventRecord>,
    snapshots: bool,
}

impl MemoryLog {
    /// Empty log without snapshots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the engine for before/after snapshots around mutating commands.
    #[must_use]
    pub fn with_snapshots(mut self) -> Self {
        self.snapshots = true;
        self
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in order.
    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Records of one kind.
    pub fn of_action(&self, action: EventAction) -> impl Iterator<Item = &EventRecord> {
        self.records.iter().filter(move |r| r.action == action)
    }

    /// Most recent record.
    #[must_use]
    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }

    /// All records as a plain vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<EventRecord> {
        self.records.iter().cloned().collect()
    }
}

impl EventSink for MemoryLog {
    fn record(&mut self, record: EventRecord) {
        self.records.push_back(record);
    }

    fn wants_snapshots(&self) -> bool {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn record(sequence: u64, action: EventAction) -> EventRecord {
        EventRecord::new(sequence, 1, None, action, Value::Null)
    }

    #[test]
    fn test_memory_log_appends() {
        let mut log = MemoryLog::new();
        assert!(log.is_empty());
        assert!(!log.wants_snapshots());

        log.record(record(0, EventAction::TurnStarted));
        log.record(record(1, EventAction::DiceRolled));
        log.record(record(2, EventAction::TurnEnded));

        assert_eq!(log.len(), 3);
        assert_eq!(log.of_action(EventAction::DiceRolled).count(), 1);
        assert_eq!(log.last().map(|r| r.sequence), Some(2));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut log = MemoryLog::new().with_snapshots();
        log.record(record(0, EventAction::TurnStarted));
        let copy = log.clone();
        log.record(record(1, EventAction::TurnEnded));

        assert!(copy.wants_snapshots());
        assert_eq!(copy.len(), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_null_sink() {
        let mut sink = NullSink;
        sink.record(record(0, EventAction::GameOver));
        assert!(!sink.wants_snapshots());
    }
}
