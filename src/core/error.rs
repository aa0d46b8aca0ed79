//! Error types.
//!
//! Resolver failures are ordinary game outcomes: they carry a readable
//! reason, leave state untouched, and the turn continues.

use thiserror::Error;

use crate::board::Location;
use crate::core::PlayerId;

/// Why a transaction or command was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("location {0} is not on the board")]
    InvalidLocation(u32),
    #[error("tile {0} cannot be owned")]
    NotOwnable(Location),
    #[error("tile {0} is already owned")]
    AlreadyOwned(Location),
    #[error("tile {0} is not owned by {1}")]
    NotOwner(Location, PlayerId),
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },
    #[error("tile {0} is not a street")]
    NotAStreet(Location),
    #[error("the color group of tile {0} is not fully owned")]
    NoMonopoly(Location),
    #[error("a property in the color group of tile {0} is mortgaged")]
    GroupMortgaged(Location),
    #[error("tile {0} already has a hotel")]
    HasHotel(Location),
    #[error("tile {0} already has 4 houses")]
    MaxHouses(Location),
    #[error("tile {0} needs exactly 4 houses for a hotel")]
    NeedsFourHouses(Location),
    #[error("uneven building: tile {0} must wait for the rest of its group")]
    UnevenBuilding(Location),
    #[error("uneven selling: tile {0} must wait for the rest of its group")]
    UnevenSelling(Location),
    #[error("tile {0} has no houses to sell")]
    NoHouses(Location),
    #[error("tile {0} has no hotel to sell")]
    NoHotel(Location),
    #[error("the bank has no houses left")]
    BankOutOfHouses,
    #[error("the bank has no hotels left")]
    BankOutOfHotels,
    #[error("tile {0} is mortgaged")]
    Mortgaged(Location),
    #[error("tile {0} is not mortgaged")]
    NotMortgaged(Location),
    #[error("buildings stand in the color group of tile {0}")]
    BuildingsInGroup(Location),
    #[error("{0} is bankrupt")]
    PlayerBankrupt(PlayerId),
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("{0} is not in jail")]
    NotInJail(PlayerId),
    #[error("{0} holds no get-out-of-jail card")]
    NoJailCard(PlayerId),
    #[error("roll not allowed: {0}")]
    RollNotAllowed(&'static str),
    #[error("no purchase is on offer")]
    NoPurchaseOffer,
    #[error("no auction is in progress")]
    NoAuction,
    #[error("no trade offer is pending")]
    NoTradeOffer,
    #[error("invalid trade: {0}")]
    InvalidTrade(&'static str),
    #[error("no matching payment is outstanding")]
    NoObligation,
    #[error("a payment of {0} must be settled first")]
    ObligationOutstanding(i64),
    #[error("missing argument `{0}`")]
    MissingArgument(&'static str),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("game is over")]
    GameOver,
}

/// Result alias for resolver operations.
pub type TxResult<T> = Result<T, TransactionError>;

/// Why a decision provider failed to produce a decision.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("decision provider unavailable: {0}")]
    Unavailable(String),
    #[error("decision provider timed out")]
    Timeout,
    #[error("decision provider gave up after {0} attempts")]
    Exhausted(u32),
}

/// Why a board layout was rejected at load time.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("a board needs exactly {expected} tiles, got {actual}")]
    WrongTileCount { expected: usize, actual: usize },
    #[error("tile at index {index} claims location {location}")]
    LocationMismatch { index: usize, location: Location },
    #[error("tile {0} is ownable but has no positive price")]
    MissingPrice(Location),
    #[error("board has {0} jail tiles, expected exactly one")]
    JailCount(usize),
}
