//! End-of-game summary export.

use serde::{Deserialize, Serialize};

use super::record::EventRecord;
use super::sink::MemoryLog;
use crate::board::{Board, Location};
use crate::core::{GameConfig, GameOutcome, GameState, InteractionStats, PlayerId, StateSnapshot};
use crate::rules::net_worth;

/// Final standing of one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub money: i64,
    pub net_worth: i64,
    pub bankrupt: bool,
    pub properties: Vec<Location>,
    /// How the seat's decision provider behaved.
    pub stats: InteractionStats,
}

/// Everything worth keeping from a finished (or abandoned) game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub config: GameConfig,
    pub final_state: StateSnapshot,
    pub players: Vec<PlayerSummary>,
    pub turns_played: u32,
    pub outcome: Option<GameOutcome>,
    pub events: Vec<EventRecord>,
}

impl GameSummary {
    /// Gather a summary from the final state and its event log.
    #[must_use]
    pub fn build(board: &Board, config: &GameConfig, state: &GameState, log: &MemoryLog) -> Self {
        let players = state
            .players
            .iter()
            .map(|(id, p)| PlayerSummary {
                id,
                name: p.name.clone(),
                money: p.money,
                net_worth: net_worth(board, state, id),
                bankrupt: p.bankrupt,
                properties: p.properties.clone(),
                stats: state.stats[id],
            })
            .collect();

        Self {
            config: config.clone(),
            final_state: state.snapshot(),
            players,
            turns_played: state.turn_number,
            outcome: state.outcome,
            events: log.to_vec(),
        }
    }

    /// Summary of one player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerSummary> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a JSON export.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Compact binary export.
    ///
    /// Write-only: event details are free-form JSON, which bincode cannot
    /// read back. Use `to_json` when the summary must be reloaded.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }
}
