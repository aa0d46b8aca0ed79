//! Core engine types: players, state, commands, RNG, configuration, errors.
//!
//! These are the building blocks every other module works on. Rule
//! constants live in `GameConfig` rather than being hardcoded.

pub mod command;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use command::{Command, CommandOutcome, LocationList, RawCommand};
pub use config::{AuctionMode, GameConfig};
pub use error::{BoardError, DecisionError, TransactionError, TxResult};
pub use player::{Player, PlayerId, PlayerMap};
pub use rng::{DiceRoll, GameRng, GameRngState};
pub use state::{
    AuctionState, BankInventory, GameOutcome, GameState, InteractionStats, Obligation,
    OutcomeReason, Payee, PropertyState, StateSnapshot, TradeOffer, TurnPhase, TurnState,
};
