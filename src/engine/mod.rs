//! Turn engine.
//!
//! `Engine` owns the static rules (board, card catalog, configuration) and
//! drives a `GameState` one turn at a time:
//!
//! ```text
//! JailCheck -> AwaitingRoll -> Moving -> ResolvingLanding -> AwaitingAction* -> TurnEnded
//! ```
//!
//! It asks each seat's `DecisionProvider` for commands, dispatches them to
//! the transaction resolver, and reports every step to an `EventSink`.
//! Execution is sequential; the provider call is the only suspension point.
//!
//! ## Safety valves
//!
//! - at most `max_decisions_per_turn` decisions per turn
//! - `max_consecutive_failures` decisions without actionable intent end
//!   the turn
//! - a provider that fails `max_decision_attempts` times in a row is
//!   replaced by a forced `end_turn`, recorded as `ProviderFallback`

mod dispatch;
mod landing;
mod negotiation;
mod turn;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::board::Board;
use crate::cards::CardCatalog;
use crate::core::{GameConfig, GameOutcome, GameState, PlayerId};
use crate::decision::Seats;
use crate::effects::CardEffectExecutor;
use crate::events::{EventAction, EventRecord, EventSink};
use crate::rules::TransactionResolver;

/// How a turn ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnEnd {
    /// The provider sent `end_turn`.
    Ended,
    /// The seat is bankrupt.
    Skipped,
    /// Jail roll without doubles.
    StayedInJail,
    /// Jail time ran out; the fine was forced.
    FineForced,
    /// The player went bankrupt during the turn.
    Bankrupt,
    /// Decision cap reached.
    DecisionCap,
    /// Too many consecutive decisions without actionable intent.
    FailureCap,
    /// The provider could not produce a decision.
    ProviderFallback,
    /// The game was already over; nothing happened.
    GameOver,
}

/// Result of `Engine::play_turn`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u32,
    pub player: PlayerId,
    pub end: TurnEnd,
    /// Decisions requested from the player's provider.
    pub decisions: u32,
    /// Set once the game is decided.
    pub outcome: Option<GameOutcome>,
}

/// The game engine.
///
/// ```
/// use rust_monopoly::core::GameConfig;
/// use rust_monopoly::decision::{BasicBot, Seats};
/// use rust_monopoly::engine::Engine;
/// use rust_monopoly::events::NullSink;
///
/// let engine = Engine::new(GameConfig::default().with_seed(7).with_max_turns(200));
/// let mut state = engine.new_game(&["alice", "bob", "carol"]);
/// let mut seats = Seats::uniform(3, |_| BasicBot::new());
///
/// let outcome = engine.run(&mut state, &mut seats, &mut NullSink);
/// assert!(outcome.is_some());
/// assert!(state.turn_number <= 200);
/// ```
#[derive(Clone, Debug)]
pub struct Engine {
    board: Board,
    catalog: CardCatalog,
    config: GameConfig,
}

impl Engine {
    /// Engine on the standard board and card set.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            board: Board::standard(),
            catalog: CardCatalog::standard(),
            config,
        }
    }

    /// Use a custom board.
    #[must_use]
    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    /// Use a custom card catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: CardCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Transaction resolver over this engine's rules.
    #[must_use]
    pub fn resolver(&self) -> TransactionResolver<'_> {
        TransactionResolver::new(&self.board, &self.config)
    }

    fn executor(&self) -> CardEffectExecutor<'_> {
        CardEffectExecutor::new(self.resolver(), &self.catalog)
    }

    /// Fresh game for the given seats, in turn order.
    #[must_use]
    pub fn new_game<S: AsRef<str>>(&self, names: &[S]) -> GameState {
        GameState::new(names, &self.config, &self.board, &self.catalog)
    }

    /// Play turns until the game is decided. The turn ceiling guarantees
    /// termination.
    pub fn run(
        &self,
        state: &mut GameState,
        seats: &mut Seats,
        sink: &mut dyn EventSink,
    ) -> Option<GameOutcome> {
        while !state.is_over() {
            self.play_turn(state, seats, sink);
        }
        state.outcome
    }
}

/// Append a record to the sink, stamping the next sequence number.
pub(crate) fn emit(
    state: &mut GameState,
    sink: &mut dyn EventSink,
    player: Option<PlayerId>,
    action: EventAction,
    details: Value,
) {
    let record = EventRecord::new(state.event_sequence, state.turn_number, player, action, details);
    state.event_sequence += 1;
    sink.record(record);
}
