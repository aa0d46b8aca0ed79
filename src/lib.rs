//! # rust-monopoly
//!
//! A full-rules property trading board game engine. Seats are driven by
//! pluggable decision providers; every state change is reported to an
//! event sink.
//!
//! ## Design Principles
//!
//! 1. **Validated transitions**: All money and ownership changes go through
//!    the `TransactionResolver`. A refused command leaves the state as it
//!    was and the turn continues.
//!
//! 2. **Deterministic**: Dice, shuffles and auctions draw from one seeded
//!    `GameRng`. The same seed and the same decisions replay the same game.
//!
//! 3. **Configuration Over Convention**: Rule constants (starting money,
//!    jail fine, bank inventory, decision caps) live in `GameConfig`.
//!
//! ## Architecture
//!
//! - **Turn engine**: `Engine` walks each turn through
//!   jail check, roll, landing and free actions, with caps on decisions
//!   and failures so every game terminates.
//!
//! - **Persistent Data Structures**: Property records and event logs use
//!   `im-rs`, so snapshots for the event log are cheap.
//!
//! ## Modules
//!
//! - `core`: Players, state, commands, RNG, configuration, errors
//! - `board`: Tiles and the board registry
//! - `cards`: Card definitions, catalog and decks
//! - `rules`: Rent, transactions, movement, auctions, trades, bankruptcy, win
//! - `effects`: Card effect executor
//! - `decision`: Decision provider interface and built-in providers
//! - `engine`: Turn state machine and command dispatch
//! - `events`: Event records, sinks and game summaries

pub mod board;
pub mod cards;
pub mod core;
pub mod decision;
pub mod effects;
pub mod engine;
pub mod events;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Command, CommandOutcome, RawCommand,
    GameConfig, AuctionMode,
    DecisionError, TransactionError, TxResult,
    Player, PlayerId, PlayerMap,
    DiceRoll, GameRng, GameRngState,
    GameOutcome, GameState, OutcomeReason, StateSnapshot,
};

pub use crate::board::{Board, ColorGroup, Location, Tile, TileKind};

pub use crate::cards::{Card, CardCatalog, CardEffect, CardId, Deck, DeckKind};

pub use crate::rules::{ChargeOutcome, TransactionResolver};

pub use crate::effects::{CardEffectExecutor, CardOutcome};

pub use crate::decision::{BasicBot, DecisionHint, DecisionProvider, DecisionRequest, ScriptedProvider, Seats};

pub use crate::engine::{Engine, TurnEnd, TurnReport};

pub use crate::events::{EventAction, EventRecord, EventSink, GameSummary, MemoryLog, NullSink};
