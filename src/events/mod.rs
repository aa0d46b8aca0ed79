//! Event log and summary export.
//!
//! - `EventRecord`: one append-only entry, optionally with state snapshots
//! - `EventSink`: where the engine sends records
//! - `MemoryLog` / `NullSink`: the shipped sinks
//! - `GameSummary`: final export built from the state and a `MemoryLog`

mod record;
mod sink;
mod summary;

pub use record::{EventAction, EventRecord};
pub use sink::{EventSink, MemoryLog, NullSink};
pub use summary::{GameSummary, PlayerSummary};
