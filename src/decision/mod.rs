//! Decision providers.
//!
//! The engine never chooses moves itself. Whenever a player must act it
//! builds a `DecisionRequest` and asks that seat's `DecisionProvider` for
//! an ordered batch of commands. The call is the engine's only suspension
//! point; a provider that keeps failing is replaced by a forced `end_turn`.
//!
//! ## Shipped providers
//!
//! - `ScriptedProvider`: replays queued batches, for tests
//! - `BasicBot`: a deterministic heuristic player
//! - any `FnMut(&DecisionRequest) -> Result<Vec<Command>, DecisionError>`

mod bot;
mod scripted;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

pub use bot::BasicBot;
pub use scripted::ScriptedProvider;

use crate::board::{Board, Location};
use crate::core::{Command, DecisionError, GameState, Player, PlayerId, StateSnapshot, TradeOffer};

/// What the engine is waiting for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "hint", rename_all = "snake_case")]
pub enum DecisionHint {
    /// In jail before the jail roll: pay, use a card, or roll.
    InJail { fine: i64, jail_cards: u8 },
    /// Landed on an unowned tile: `buy_property` or decline.
    PurchaseOffer { location: Location, price: i64 },
    /// A charge is outstanding and must be settled.
    Obligation { amount: i64, reason: String },
    /// A trade awaits `respond_to_trade`.
    TradeOffer { offer: TradeOffer },
    /// Ascending auction: `auction_bid` or `pass_auction`.
    AuctionBid { location: Location, minimum_bid: i64 },
}

impl fmt::Display for DecisionHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionHint::InJail { fine, jail_cards } => {
                write!(f, "in_jail: fine {fine}, {jail_cards} jail card(s)")
            }
            DecisionHint::PurchaseOffer { location, price } => {
                write!(f, "purchase_offer: tile {location} for {price}")
            }
            DecisionHint::Obligation { amount, reason } => {
                write!(f, "pending_obligation: {amount} ({reason})")
            }
            DecisionHint::TradeOffer { offer } => {
                write!(f, "trade_offer from {}", offer.proposer)
            }
            DecisionHint::AuctionBid { location, minimum_bid } => {
                write!(f, "auction: tile {location}, minimum bid {minimum_bid}")
            }
        }
    }
}

/// Everything a provider sees when asked to decide.
#[derive(Clone, Copy)]
pub struct DecisionRequest<'a> {
    /// Read-only game state.
    pub state: &'a GameState,
    pub board: &'a Board,
    /// The deciding player.
    pub player: PlayerId,
    pub hint: Option<&'a DecisionHint>,
}

impl<'a> DecisionRequest<'a> {
    /// The deciding player's record.
    #[must_use]
    pub fn me(&self) -> &'a Player {
        &self.state.players[self.player]
    }

    /// Serializable copy of the state, for providers that ship it elsewhere.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    /// Hint rendered as text.
    #[must_use]
    pub fn hint_text(&self) -> Option<String> {
        self.hint.map(ToString::to_string)
    }
}

/// Source of decisions for one seat.
pub trait DecisionProvider {
    /// Choose the next commands, in order. An empty batch is a decision
    /// without actionable intent.
    fn decide(&mut self, request: &DecisionRequest<'_>) -> Result<Vec<Command>, DecisionError>;
}

impl<F> DecisionProvider for F
where
    F: FnMut(&DecisionRequest<'_>) -> Result<Vec<Command>, DecisionError>,
{
    fn decide(&mut self, request: &DecisionRequest<'_>) -> Result<Vec<Command>, DecisionError> {
        self(request)
    }
}

/// Provider kept outside the roster so its owner can inspect it.
struct Shared<P>(Rc<RefCell<P>>);

impl<P: DecisionProvider> DecisionProvider for Shared<P> {
    fn decide(&mut self, request: &DecisionRequest<'_>) -> Result<Vec<Command>, DecisionError> {
        self.0.borrow_mut().decide(request)
    }
}

/// One provider per seat, in seat order.
#[derive(Default)]
pub struct Seats {
    providers: Vec<Box<dyn DecisionProvider>>,
}

impl Seats {
    /// Empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the provider for the next seat.
    #[must_use]
    pub fn with(mut self, provider: impl DecisionProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Add a provider the caller keeps a handle to.
    #[must_use]
    pub fn with_shared<P: DecisionProvider + 'static>(self, provider: &Rc<RefCell<P>>) -> Self {
        self.with(Shared(Rc::clone(provider)))
    }

    /// Same kind of provider on every seat.
    pub fn uniform<P, F>(player_count: usize, mut factory: F) -> Self
    where
        P: DecisionProvider + 'static,
        F: FnMut(PlayerId) -> P,
    {
        let providers = PlayerId::all(player_count)
            .map(|id| Box::new(factory(id)) as Box<dyn DecisionProvider>)
            .collect();
        Self { providers }
    }

    /// Number of seats with a provider.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if no provider is seated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider of a seat.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut (dyn DecisionProvider + 'static)> {
        self.providers.get_mut(player.index()).map(|p| p.as_mut())
    }
}

impl fmt::Debug for Seats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seats").field("len", &self.providers.len()).finish()
    }
}
