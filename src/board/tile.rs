//! Tile definitions - static board data.

use serde::{Deserialize, Serialize};

use super::Location;
use crate::cards::DeckKind;

/// Street color groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorGroup {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
}

impl std::fmt::Display for ColorGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColorGroup::Brown => "brown",
            ColorGroup::LightBlue => "light blue",
            ColorGroup::Pink => "pink",
            ColorGroup::Orange => "orange",
            ColorGroup::Red => "red",
            ColorGroup::Yellow => "yellow",
            ColorGroup::Green => "green",
            ColorGroup::DarkBlue => "dark blue",
        };
        f.write_str(name)
    }
}

/// Street rent schedule and building cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentTable {
    /// Rent with no buildings.
    pub base: i64,
    /// Rent with 1-4 houses.
    pub houses: [i64; 4],
    /// Rent with a hotel.
    pub hotel: i64,
    /// Cost of one house; a hotel costs one more unit on top of 4 houses.
    pub house_cost: i64,
}

impl RentTable {
    /// Create a rent table.
    #[must_use]
    pub const fn new(base: i64, houses: [i64; 4], hotel: i64, house_cost: i64) -> Self {
        Self {
            base,
            houses,
            hotel,
            house_cost,
        }
    }

    /// Rent for `houses` houses (1-4).
    #[must_use]
    pub fn with_houses(&self, houses: u8) -> i64 {
        match houses {
            0 => self.base,
            n => self.houses[usize::from(n.min(4)) - 1],
        }
    }
}

/// How a tax tile computes its charge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRule {
    /// Fixed amount.
    Flat(i64),
    /// The lesser of a fixed amount and a percentage of net worth.
    LesserOf { flat: i64, percent: i64 },
}

impl TaxRule {
    /// Tax owed by a player with the given net worth.
    #[must_use]
    pub fn amount(self, net_worth: i64) -> i64 {
        match self {
            TaxRule::Flat(amount) => amount,
            TaxRule::LesserOf { flat, percent } => flat.min(net_worth.max(0) * percent / 100),
        }
    }
}

/// Tile category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileCategory {
    Property,
    Railroad,
    Utility,
    Tax,
    Card,
    Jail,
    Free,
    Go,
    GoToJail,
}

/// What a tile is and the data its category needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TileKind {
    Go,
    Street {
        group: ColorGroup,
        price: i64,
        rent: RentTable,
    },
    Railroad {
        price: i64,
    },
    Utility {
        price: i64,
    },
    Tax {
        rule: TaxRule,
    },
    Card {
        deck: DeckKind,
    },
    Jail,
    FreeParking,
    GoToJail,
}

/// A single board tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Position on the board (0-39).
    pub location: Location,
    /// Display name.
    pub name: String,
    /// Category-specific data.
    pub kind: TileKind,
}

impl Tile {
    /// Create a tile.
    #[must_use]
    pub fn new(location: Location, name: impl Into<String>, kind: TileKind) -> Self {
        Self {
            location,
            name: name.into(),
            kind,
        }
    }

    /// The tile's category.
    #[must_use]
    pub fn category(&self) -> TileCategory {
        match self.kind {
            TileKind::Go => TileCategory::Go,
            TileKind::Street { .. } => TileCategory::Property,
            TileKind::Railroad { .. } => TileCategory::Railroad,
            TileKind::Utility { .. } => TileCategory::Utility,
            TileKind::Tax { .. } => TileCategory::Tax,
            TileKind::Card { .. } => TileCategory::Card,
            TileKind::Jail => TileCategory::Jail,
            TileKind::FreeParking => TileCategory::Free,
            TileKind::GoToJail => TileCategory::GoToJail,
        }
    }

    /// List price; defined exactly for ownable tiles.
    #[must_use]
    pub fn price(&self) -> Option<i64> {
        match self.kind {
            TileKind::Street { price, .. }
            | TileKind::Railroad { price }
            | TileKind::Utility { price } => Some(price),
            _ => None,
        }
    }

    /// Whether the tile can be bought.
    #[must_use]
    pub fn is_ownable(&self) -> bool {
        self.price().is_some()
    }

    /// Color group for streets.
    #[must_use]
    pub fn color_group(&self) -> Option<ColorGroup> {
        match self.kind {
            TileKind::Street { group, .. } => Some(group),
            _ => None,
        }
    }

    /// Rent table for streets.
    #[must_use]
    pub fn rent_table(&self) -> Option<&RentTable> {
        match &self.kind {
            TileKind::Street { rent, .. } => Some(rent),
            _ => None,
        }
    }

    /// House cost for streets.
    #[must_use]
    pub fn house_cost(&self) -> Option<i64> {
        self.rent_table().map(|rent| rent.house_cost)
    }

    /// Half the list price, paid out on mortgage.
    #[must_use]
    pub fn mortgage_value(&self) -> Option<i64> {
        self.price().map(|price| price / 2)
    }
}
