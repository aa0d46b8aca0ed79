//! Game rules over `GameState`.
//!
//! - `transactions`: validated purchases, buildings, mortgages, payments
//! - `rent`: rent computation for streets, railroads and utilities
//! - `movement`: token movement and the Go bonus
//! - `bankruptcy`: asset hand-over when a player cannot pay
//! - `auction`: ownership for declined properties
//! - `trade`: negotiated exchanges between players
//! - `win`: net worth and game-over detection
//!
//! Nothing here talks to decision providers; the engine does that and
//! calls into these modules.

pub mod auction;
pub mod bankruptcy;
pub mod movement;
pub mod rent;
pub mod trade;
pub mod transactions;
pub mod win;

pub use auction::AuctionResult;
pub use bankruptcy::{declare_bankrupt, BankruptcyReport};
pub use movement::Movement;
pub use rent::{owns_group, rent_due};
pub use trade::TradeResolution;
pub use transactions::{ChargeOutcome, Settlement, TransactionResolver};
pub use win::{evaluate, liquidation_value, net_worth};
