//! Event records.
//!
//! One record per discrete thing that happened in a game. Records that
//! wrap a mutating command may carry state snapshots from before and after
//! it, when the sink asks for them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{PlayerId, StateSnapshot};

/// What a record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    GameStarted,
    TurnStarted,
    /// Turn skipped because the seat is bankrupt.
    TurnSkipped,
    DiceRolled,
    Moved,
    SentToJail,
    JailReleased,
    /// Jail roll without doubles.
    JailStay,
    PurchaseOffered,
    RentPaid,
    TaxPaid,
    CardDrawn,
    ObligationRecorded,
    ObligationForced,
    AuctionOpened,
    AuctionClosed,
    /// A provider decision was dispatched as a command.
    Command,
    /// A provider decision had no actionable intent.
    DecisionFailed,
    /// The provider could not produce a decision; the engine ended the turn.
    ProviderFallback,
    /// The per-turn decision cap or failure cap ended the turn.
    TurnForcedEnd,
    TradeResolved,
    Bankruptcy,
    TurnEnded,
    GameOver,
}

/// One append-only log entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Wall-clock milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Position in the game's event stream, starting at 0.
    pub sequence: u64,
    pub turn: u32,
    pub player: Option<PlayerId>,
    pub action: EventAction,
    pub details: Value,
    pub state_before: Option<StateSnapshot>,
    pub state_after: Option<StateSnapshot>,
}

impl EventRecord {
    /// Create a record without snapshots.
    #[must_use]
    pub fn new(sequence: u64, turn: u32, player: Option<PlayerId>, action: EventAction, details: Value) -> Self {
        Self {
            timestamp_ms: now_ms(),
            sequence,
            turn,
            player,
            action,
            details,
            state_before: None,
            state_after: None,
        }
    }

    /// Attach before/after snapshots.
    #[must_use]
    pub fn with_snapshots(mut self, before: StateSnapshot, after: StateSnapshot) -> Self {
        self.state_before = Some(before);
        self.state_after = Some(after);
        self
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_serializes_snake_case() {
        let json = serde_json::to_value(EventAction::ProviderFallback).unwrap();
        assert_eq!(json, "provider_fallback");
    }

    #[test]
    fn test_record_json() {
        let record = EventRecord::new(3, 7, Some(PlayerId::new(1)), EventAction::RentPaid, json!({"amount": 50}));
        assert!(record.timestamp_ms > 0);

        let text = serde_json::to_string(&record).unwrap();
        let back: EventRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }
}
