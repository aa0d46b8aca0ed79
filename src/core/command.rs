//! Command vocabulary and command results.
//!
//! A `Command` is one decision from the fixed vocabulary. Providers that
//! work with text tool calls hand the engine a `RawCommand` (name plus JSON
//! arguments); parsing never fails hard:
//! - malformed JSON arguments degrade to empty arguments
//! - missing arguments surface as a failed `CommandOutcome` at dispatch
//! - unknown names become `Command::Unrecognized`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;

use super::player::PlayerId;
use crate::board::{Location, BOARD_SIZE};

/// Short list of locations offered or requested in a trade.
pub type LocationList = SmallVec<[Location; 4]>;

/// A decision from the fixed command vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    RollDice,
    BuyProperty {
        confirm: bool,
    },
    AuctionBid {
        amount: i64,
    },
    PassAuction,
    BuildHouse {
        location: Option<Location>,
    },
    BuildHotel {
        location: Option<Location>,
    },
    MortgageProperty {
        location: Option<Location>,
    },
    UnmortgageProperty {
        location: Option<Location>,
    },
    SellHouse {
        location: Option<Location>,
    },
    SellHotel {
        location: Option<Location>,
    },
    PayJailFine,
    UseJailCard,
    TradeProperty {
        target: Option<PlayerId>,
        offer_properties: LocationList,
        offer_money: i64,
        request_properties: LocationList,
        request_money: i64,
    },
    RespondToTrade {
        accept: bool,
    },
    PayRent,
    PayBank,
    PayAllPlayers,
    GetGameState,
    GetPropertyInfo {
        location: Option<Location>,
    },
    EndTurn,
    /// A name outside the vocabulary. Carries no actionable intent.
    Unrecognized {
        name: String,
    },
}

impl Command {
    /// Build a house on `location`.
    #[must_use]
    pub fn build_house(location: Location) -> Self {
        Self::BuildHouse { location: Some(location) }
    }

    /// Build a hotel on `location`.
    #[must_use]
    pub fn build_hotel(location: Location) -> Self {
        Self::BuildHotel { location: Some(location) }
    }

    /// Sell a house from `location`.
    #[must_use]
    pub fn sell_house(location: Location) -> Self {
        Self::SellHouse { location: Some(location) }
    }

    /// Sell the hotel on `location`.
    #[must_use]
    pub fn sell_hotel(location: Location) -> Self {
        Self::SellHotel { location: Some(location) }
    }

    /// Mortgage `location`.
    #[must_use]
    pub fn mortgage(location: Location) -> Self {
        Self::MortgageProperty { location: Some(location) }
    }

    /// Lift the mortgage on `location`.
    #[must_use]
    pub fn unmortgage(location: Location) -> Self {
        Self::UnmortgageProperty { location: Some(location) }
    }

    /// Query one property.
    #[must_use]
    pub fn property_info(location: Location) -> Self {
        Self::GetPropertyInfo { location: Some(location) }
    }

    /// Propose a trade to `target`.
    #[must_use]
    pub fn trade(
        target: PlayerId,
        offer_properties: &[Location],
        offer_money: i64,
        request_properties: &[Location],
        request_money: i64,
    ) -> Self {
        Self::TradeProperty {
            target: Some(target),
            offer_properties: SmallVec::from_slice(offer_properties),
            offer_money,
            request_properties: SmallVec::from_slice(request_properties),
            request_money,
        }
    }

    /// Vocabulary name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Command::RollDice => "roll_dice",
            Command::BuyProperty { .. } => "buy_property",
            Command::AuctionBid { .. } => "auction_bid",
            Command::PassAuction => "pass_auction",
            Command::BuildHouse { .. } => "build_house",
            Command::BuildHotel { .. } => "build_hotel",
            Command::MortgageProperty { .. } => "mortgage_property",
            Command::UnmortgageProperty { .. } => "unmortgage_property",
            Command::SellHouse { .. } => "sell_house",
            Command::SellHotel { .. } => "sell_hotel",
            Command::PayJailFine => "pay_jail_fine",
            Command::UseJailCard => "use_jail_card",
            Command::TradeProperty { .. } => "trade_property",
            Command::RespondToTrade { .. } => "respond_to_trade",
            Command::PayRent => "pay_rent",
            Command::PayBank => "pay_bank",
            Command::PayAllPlayers => "pay_all_players",
            Command::GetGameState => "get_game_state",
            Command::GetPropertyInfo { .. } => "get_property_info",
            Command::EndTurn => "end_turn",
            Command::Unrecognized { name } => name,
        }
    }

    /// Whether the command carries an actionable intent.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Command::Unrecognized { .. })
    }

    /// Read-only commands.
    #[must_use]
    pub fn is_query(&self) -> bool {
        matches!(self, Command::GetGameState | Command::GetPropertyInfo { .. })
    }

    /// Commands that settle or raise money for an outstanding payment.
    #[must_use]
    pub fn is_settlement(&self) -> bool {
        matches!(
            self,
            Command::PayRent
                | Command::PayBank
                | Command::PayAllPlayers
                | Command::MortgageProperty { .. }
                | Command::SellHouse { .. }
                | Command::SellHotel { .. }
                | Command::EndTurn
        )
    }
}

/// A command as produced by a text-based provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCommand {
    /// Vocabulary name, e.g. `build_house`.
    pub name: String,
    /// JSON object with the arguments.
    pub arguments: String,
}

impl RawCommand {
    /// Create a raw command.
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Parse into a `Command`. Never fails.
    #[must_use]
    pub fn parse(&self) -> Command {
        let args = match serde_json::from_str::<Value>(&self.arguments) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        match self.name.trim() {
            "roll_dice" => Command::RollDice,
            "buy_property" => Command::BuyProperty {
                confirm: bool_arg(&args, "confirm").unwrap_or(false),
            },
            "auction_bid" => Command::AuctionBid {
                amount: int_arg(&args, "amount").unwrap_or(0),
            },
            "pass_auction" => Command::PassAuction,
            "build_house" => Command::BuildHouse { location: location_arg(&args) },
            "build_hotel" => Command::BuildHotel { location: location_arg(&args) },
            "mortgage_property" => Command::MortgageProperty { location: location_arg(&args) },
            "unmortgage_property" => Command::UnmortgageProperty { location: location_arg(&args) },
            "sell_house" => Command::SellHouse { location: location_arg(&args) },
            "sell_hotel" => Command::SellHotel { location: location_arg(&args) },
            "pay_jail_fine" => Command::PayJailFine,
            "use_jail_card" => Command::UseJailCard,
            "trade_property" => Command::TradeProperty {
                target: int_arg(&args, "target")
                    .and_then(|t| u8::try_from(t).ok())
                    .map(PlayerId::new),
                offer_properties: locations_arg(&args, "offer_properties"),
                offer_money: int_arg(&args, "offer_money").unwrap_or(0),
                request_properties: locations_arg(&args, "request_properties"),
                request_money: int_arg(&args, "request_money").unwrap_or(0),
            },
            "respond_to_trade" => Command::RespondToTrade {
                accept: bool_arg(&args, "accept").unwrap_or(false),
            },
            "pay_rent" => Command::PayRent,
            "pay_bank" => Command::PayBank,
            "pay_all_players" => Command::PayAllPlayers,
            "get_game_state" => Command::GetGameState,
            "get_property_info" => Command::GetPropertyInfo { location: location_arg(&args) },
            "end_turn" => Command::EndTurn,
            other => Command::Unrecognized { name: other.to_string() },
        }
    }
}

fn int_arg(args: &Map<String, Value>, key: &str) -> Option<i64> {
    match args.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bool_arg(args: &Map<String, Value>, key: &str) -> Option<bool> {
    match args.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_location(value: i64) -> Option<Location> {
    usize::try_from(value)
        .ok()
        .filter(|&v| v < BOARD_SIZE)
        .and_then(|v| Location::try_from(v).ok())
}

fn location_arg(args: &Map<String, Value>) -> Option<Location> {
    int_arg(args, "location")
        .or_else(|| int_arg(args, "property_id"))
        .and_then(as_location)
}

fn locations_arg(args: &Map<String, Value>, key: &str) -> LocationList {
    match args.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_i64)
            .filter_map(as_location)
            .collect(),
        _ => SmallVec::new(),
    }
}

/// Structured result of dispatching one command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Whether the command took effect.
    pub success: bool,
    /// Failure reason.
    pub error: Option<String>,
    /// Operation-specific data.
    pub payload: Value,
}

impl CommandOutcome {
    /// Successful result with a payload.
    #[must_use]
    pub fn ok(payload: Value) -> Self {
        Self {
            success: true,
            error: None,
            payload,
        }
    }

    /// Failed result.
    #[must_use]
    pub fn fail(reason: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            error: Some(reason.to_string()),
            payload: Value::Null,
        }
    }
}
