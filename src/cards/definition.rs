//! Static card data for both decks.
//!
//! A `Card` pairs display text with a `CardEffect` descriptor. The
//! descriptor is a bag of independent, optional attributes; the effect
//! executor applies whichever are present in a fixed order.

use serde::{Deserialize, Serialize};

use crate::board::Location;

/// Unique identifier for a card in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Catalog number: 1-16 for Chance, 101-116 for Community Chest.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "card #{}", self.0)
    }
}

/// Which deck a card belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckKind {
    Chance,
    CommunityChest,
}

impl std::fmt::Display for DeckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckKind::Chance => f.write_str("chance"),
            DeckKind::CommunityChest => f.write_str("community chest"),
        }
    }
}

/// Broad card category, as printed in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardCategory {
    Movement,
    MovementPenalty,
    MovementToJail,
    Special,
    Financial,
    FinancialPenalty,
}

/// Target of an "advance to nearest" card and how its owner is paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NearestTarget {
    /// Pay the owner `rent_multiplier` times the normal railroad rent.
    Railroad { rent_multiplier: i64 },
    /// Throw the dice and pay the owner `dice_multiplier` times the total.
    Utility { dice_multiplier: i64 },
}

/// Per-building assessment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairCharge {
    pub per_house: i64,
    pub per_hotel: i64,
}

/// Effect descriptor. Every field is optional and independent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardEffect {
    /// Move this many tiles (negative moves backward).
    pub move_relative: Option<i8>,
    /// Advance to the nearest railroad or utility.
    pub advance_to_nearest: Option<NearestTarget>,
    /// Advance to a fixed location.
    pub advance_to: Option<Location>,
    /// Credit the Go bonus when `advance_to` wraps past Go.
    pub collect_go_bonus: bool,
    /// Cash adjustment: positive collects from the bank, negative pays it.
    pub amount: i64,
    /// Grant a get-out-of-jail token.
    pub jail_card: bool,
    /// Send the player directly to jail.
    pub go_to_jail: bool,
    /// Collect this much from every other active player.
    pub collect_from_each: i64,
    /// Pay this much to every other active player.
    pub pay_each: i64,
    /// Pay for every house and hotel owned.
    pub repairs: Option<RepairCharge>,
}

impl CardEffect {
    /// Move by `steps` tiles.
    #[must_use]
    pub fn relative(steps: i8) -> Self {
        Self {
            move_relative: Some(steps),
            ..Self::default()
        }
    }

    /// Advance to `location`, collecting the Go bonus when passing it.
    #[must_use]
    pub fn advance_to(location: Location) -> Self {
        Self {
            advance_to: Some(location),
            collect_go_bonus: true,
            ..Self::default()
        }
    }

    /// Advance to the nearest tile of the given kind.
    #[must_use]
    pub fn nearest(target: NearestTarget) -> Self {
        Self {
            advance_to_nearest: Some(target),
            ..Self::default()
        }
    }

    /// Collect (positive) or pay (negative) a flat amount.
    #[must_use]
    pub fn money(amount: i64) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    /// Add a flat amount on top of other attributes.
    #[must_use]
    pub fn plus_money(mut self, amount: i64) -> Self {
        self.amount += amount;
        self
    }

    /// Grant a get-out-of-jail token.
    #[must_use]
    pub fn jail_card() -> Self {
        Self {
            jail_card: true,
            ..Self::default()
        }
    }

    /// Go directly to jail.
    #[must_use]
    pub fn go_to_jail() -> Self {
        Self {
            go_to_jail: true,
            ..Self::default()
        }
    }

    /// Collect from every other player.
    #[must_use]
    pub fn collect_from_each(amount: i64) -> Self {
        Self {
            collect_from_each: amount,
            ..Self::default()
        }
    }

    /// Pay every other player.
    #[must_use]
    pub fn pay_each(amount: i64) -> Self {
        Self {
            pay_each: amount,
            ..Self::default()
        }
    }

    /// Pay per house and per hotel owned.
    #[must_use]
    pub fn repairs(per_house: i64, per_hotel: i64) -> Self {
        Self {
            repairs: Some(RepairCharge { per_house, per_hotel }),
            ..Self::default()
        }
    }

    /// Whether the descriptor moves the player.
    #[must_use]
    pub fn moves(&self) -> bool {
        self.move_relative.is_some() || self.advance_to_nearest.is_some() || self.advance_to.is_some()
    }
}

/// A catalog card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub deck: DeckKind,
    pub category: CardCategory,
    pub text: String,
    pub effect: CardEffect,
}

impl Card {
    /// Create a card.
    #[must_use]
    pub fn new(
        id: CardId,
        deck: DeckKind,
        category: CardCategory,
        text: impl Into<String>,
        effect: CardEffect,
    ) -> Self {
        Self {
            id,
            deck,
            category,
            text: text.into(),
            effect,
        }
    }
}
