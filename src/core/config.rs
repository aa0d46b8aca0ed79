//! Game configuration.
//!
//! `GameConfig` collects every tunable rule constant and engine safety
//! valve. It is built with chained setters or deserialized from JSON;
//! missing JSON fields fall back to the classic rules.

use serde::{Deserialize, Serialize};

/// How a declined property is auctioned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionMode {
    /// Single round: every candidate offers a fixed share of list price
    /// (capped by cash) and the highest offer wins.
    #[default]
    Automatic,
    /// Ascending auction driven by `auction_bid` / `pass_auction` decisions.
    Bidding,
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cash each player starts with.
    pub starting_money: i64,

    /// Bonus for passing or landing on Go.
    pub go_bonus: i64,

    /// Fine to leave jail.
    pub jail_fine: i64,

    /// Jail turns after which the fine is forced.
    pub max_jail_turns: u8,

    /// Turn ceiling; the net-worth tiebreak decides the game when reached.
    pub max_turns: u32,

    /// Decisions the provider may make in a single turn.
    pub max_decisions_per_turn: u32,

    /// Consecutive non-actionable decisions that force the turn to end.
    pub max_consecutive_failures: u32,

    /// Attempts to obtain one decision before falling back to `end_turn`.
    pub max_decision_attempts: u32,

    /// Houses in the bank at game start.
    pub bank_houses: u32,

    /// Hotels in the bank at game start.
    pub bank_hotels: u32,

    /// Auction policy for declined properties.
    pub auction_mode: AuctionMode,

    /// Automatic auction: share of list price each candidate will pay.
    pub auction_willingness_percent: i64,

    /// Bidding auction: minimum raise over the current high bid.
    pub min_bid_increment: i64,

    /// Bidding auction: rounds before the auction is closed.
    pub max_auction_rounds: u32,

    /// Return buildings to the bank inventory when a player goes bankrupt
    /// to the bank. Off by default to match observed behavior.
    pub return_buildings_to_bank: bool,

    /// Reject non-settlement commands while a payment is outstanding.
    pub enforce_pending_obligation: bool,

    /// RNG seed for dice and the initial deck shuffle.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_money: 1500,
            go_bonus: 200,
            jail_fine: 50,
            max_jail_turns: 3,
            max_turns: 1000,
            max_decisions_per_turn: 20,
            max_consecutive_failures: 3,
            max_decision_attempts: 3,
            bank_houses: 32,
            bank_hotels: 12,
            auction_mode: AuctionMode::Automatic,
            auction_willingness_percent: 80,
            min_bid_increment: 10,
            max_auction_rounds: 50,
            return_buildings_to_bank: false,
            enforce_pending_obligation: false,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Classic rules with the default seed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the starting cash.
    #[must_use]
    pub fn with_starting_money(mut self, money: i64) -> Self {
        self.starting_money = money;
        self
    }

    /// Set the turn ceiling.
    #[must_use]
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    /// Set the per-turn decision cap.
    #[must_use]
    pub fn with_max_decisions(mut self, decisions: u32) -> Self {
        self.max_decisions_per_turn = decisions;
        self
    }

    /// Set the auction policy.
    #[must_use]
    pub fn with_auction_mode(mut self, mode: AuctionMode) -> Self {
        self.auction_mode = mode;
        self
    }

    /// Set the building inventory of the bank.
    #[must_use]
    pub fn with_bank_inventory(mut self, houses: u32, hotels: u32) -> Self {
        self.bank_houses = houses;
        self.bank_hotels = hotels;
        self
    }

    /// Return buildings to the bank on bankruptcy to the bank.
    #[must_use]
    pub fn returning_buildings_to_bank(mut self) -> Self {
        self.return_buildings_to_bank = true;
        self
    }

    /// Gate ordinary commands behind outstanding payments.
    #[must_use]
    pub fn enforcing_pending_obligation(mut self) -> Self {
        self.enforce_pending_obligation = true;
        self
    }
}
