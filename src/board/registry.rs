//! Board registry for tile lookup.
//!
//! The `Board` holds the 40 tiles in order and precomputed group
//! membership. It is immutable once built.

use rustc_hash::FxHashMap;

use super::tile::{ColorGroup, RentTable, TaxRule, Tile, TileCategory, TileKind};
use super::{Location, BOARD_SIZE, JAIL_LOCATION};
use crate::cards::DeckKind;
use crate::core::BoardError;

/// The ordered tile registry.
///
/// ```
/// use rust_monopoly::board::{Board, ColorGroup};
///
/// let board = Board::standard();
/// assert_eq!(board.tile(39).map(|t| t.name.as_str()), Some("Boardwalk"));
/// assert_eq!(board.group_members(ColorGroup::DarkBlue), &[37, 39]);
/// ```
#[derive(Clone, Debug)]
pub struct Board {
    tiles: Vec<Tile>,
    groups: FxHashMap<ColorGroup, Vec<Location>>,
    railroads: Vec<Location>,
    utilities: Vec<Location>,
    jail: Location,
}

impl Board {
    /// Build and validate a board from tiles ordered by location.
    pub fn from_tiles(tiles: Vec<Tile>) -> Result<Self, BoardError> {
        if tiles.len() != BOARD_SIZE {
            return Err(BoardError::WrongTileCount {
                expected: BOARD_SIZE,
                actual: tiles.len(),
            });
        }

        let mut groups: FxHashMap<ColorGroup, Vec<Location>> = FxHashMap::default();
        let mut railroads = Vec::new();
        let mut utilities = Vec::new();
        let mut jails = Vec::new();

        for (index, tile) in tiles.iter().enumerate() {
            if usize::from(tile.location) != index {
                return Err(BoardError::LocationMismatch {
                    index,
                    location: tile.location,
                });
            }
            if tile.is_ownable() && tile.price().unwrap_or(0) <= 0 {
                return Err(BoardError::MissingPrice(tile.location));
            }
            match tile.kind {
                TileKind::Street { group, .. } => groups.entry(group).or_default().push(tile.location),
                TileKind::Railroad { .. } => railroads.push(tile.location),
                TileKind::Utility { .. } => utilities.push(tile.location),
                TileKind::Jail => jails.push(tile.location),
                _ => {}
            }
        }

        if jails.len() != 1 {
            return Err(BoardError::JailCount(jails.len()));
        }

        Ok(Self {
            tiles,
            groups,
            railroads,
            utilities,
            jail: jails[0],
        })
    }

    /// The classic 40-tile layout.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_tiles(standard_tiles()).unwrap_or_else(|err| {
            unreachable!("standard board is valid: {err}")
        })
    }

    /// Get a tile by location.
    #[must_use]
    pub fn tile(&self, location: Location) -> Option<&Tile> {
        self.tiles.get(usize::from(location))
    }

    /// Iterate over all tiles in board order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Locations of every ownable tile.
    pub fn ownable_locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.tiles.iter().filter(|t| t.is_ownable()).map(|t| t.location)
    }

    /// Streets in a color group, in board order.
    #[must_use]
    pub fn group_members(&self, group: ColorGroup) -> &[Location] {
        self.groups.get(&group).map_or(&[], Vec::as_slice)
    }

    /// All railroad locations.
    #[must_use]
    pub fn railroads(&self) -> &[Location] {
        &self.railroads
    }

    /// All utility locations.
    #[must_use]
    pub fn utilities(&self) -> &[Location] {
        &self.utilities
    }

    /// Jail tile location.
    #[must_use]
    pub fn jail(&self) -> Location {
        self.jail
    }

    /// First tile of `category` strictly ahead of `from`, wrapping past Go.
    #[must_use]
    pub fn nearest_forward(&self, from: Location, category: TileCategory) -> Option<Location> {
        (1..=BOARD_SIZE)
            .map(|step| ((usize::from(from) + step) % BOARD_SIZE) as Location)
            .find(|&loc| self.tile(loc).map(Tile::category) == Some(category))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

fn street(location: Location, name: &str, group: ColorGroup, price: i64, rent: RentTable) -> Tile {
    Tile::new(location, name, TileKind::Street { group, price, rent })
}

fn standard_tiles() -> Vec<Tile> {
    use ColorGroup::*;

    vec![
        Tile::new(0, "Go", TileKind::Go),
        street(1, "Mediterranean Avenue", Brown, 60, RentTable::new(2, [10, 30, 90, 160], 250, 50)),
        Tile::new(2, "Community Chest", TileKind::Card { deck: DeckKind::CommunityChest }),
        street(3, "Baltic Avenue", Brown, 60, RentTable::new(4, [20, 60, 180, 320], 450, 50)),
        Tile::new(4, "Income Tax", TileKind::Tax { rule: TaxRule::Flat(200) }),
        Tile::new(5, "Reading Railroad", TileKind::Railroad { price: 200 }),
        street(6, "Oriental Avenue", LightBlue, 100, RentTable::new(6, [30, 90, 270, 400], 550, 50)),
        Tile::new(7, "Chance", TileKind::Card { deck: DeckKind::Chance }),
        street(8, "Vermont Avenue", LightBlue, 100, RentTable::new(6, [30, 90, 270, 400], 550, 50)),
        street(9, "Connecticut Avenue", LightBlue, 120, RentTable::new(8, [40, 100, 300, 450], 600, 50)),
        Tile::new(JAIL_LOCATION, "Jail", TileKind::Jail),
        street(11, "St. Charles Place", Pink, 140, RentTable::new(10, [50, 150, 450, 625], 750, 100)),
        Tile::new(12, "Electric Company", TileKind::Utility { price: 150 }),
        street(13, "States Avenue", Pink, 140, RentTable::new(10, [50, 150, 450, 625], 750, 100)),
        street(14, "Virginia Avenue", Pink, 160, RentTable::new(12, [60, 180, 500, 700], 900, 100)),
        Tile::new(15, "Pennsylvania Railroad", TileKind::Railroad { price: 200 }),
        street(16, "St. James Place", Orange, 180, RentTable::new(14, [70, 200, 550, 750], 950, 100)),
        Tile::new(17, "Community Chest", TileKind::Card { deck: DeckKind::CommunityChest }),
        street(18, "Tennessee Avenue", Orange, 180, RentTable::new(14, [70, 200, 550, 750], 950, 100)),
        street(19, "New York Avenue", Orange, 200, RentTable::new(16, [80, 220, 600, 800], 1000, 100)),
        Tile::new(20, "Free Parking", TileKind::FreeParking),
        street(21, "Kentucky Avenue", Red, 220, RentTable::new(18, [90, 250, 700, 875], 1050, 150)),
        Tile::new(22, "Chance", TileKind::Card { deck: DeckKind::Chance }),
        street(23, "Indiana Avenue", Red, 220, RentTable::new(18, [90, 250, 700, 875], 1050, 150)),
        street(24, "Illinois Avenue", Red, 240, RentTable::new(20, [100, 300, 750, 925], 1100, 150)),
        Tile::new(25, "B. & O. Railroad", TileKind::Railroad { price: 200 }),
        street(26, "Atlantic Avenue", Yellow, 260, RentTable::new(22, [110, 330, 800, 975], 1150, 150)),
        street(27, "Ventnor Avenue", Yellow, 260, RentTable::new(22, [110, 330, 800, 975], 1150, 150)),
        Tile::new(28, "Water Works", TileKind::Utility { price: 150 }),
        street(29, "Marvin Gardens", Yellow, 280, RentTable::new(24, [120, 360, 850, 1025], 1200, 150)),
        Tile::new(30, "Go To Jail", TileKind::GoToJail),
        street(31, "Pacific Avenue", Green, 300, RentTable::new(26, [130, 390, 900, 1100], 1275, 200)),
        street(32, "North Carolina Avenue", Green, 300, RentTable::new(26, [130, 390, 900, 1100], 1275, 200)),
        Tile::new(33, "Community Chest", TileKind::Card { deck: DeckKind::CommunityChest }),
        street(34, "Pennsylvania Avenue", Green, 320, RentTable::new(28, [150, 450, 1000, 1200], 1400, 200)),
        Tile::new(35, "Short Line", TileKind::Railroad { price: 200 }),
        Tile::new(36, "Chance", TileKind::Card { deck: DeckKind::Chance }),
        street(37, "Park Place", DarkBlue, 350, RentTable::new(35, [175, 500, 1100, 1300], 1500, 200)),
        Tile::new(38, "Luxury Tax", TileKind::Tax { rule: TaxRule::Flat(100) }),
        street(39, "Boardwalk", DarkBlue, 400, RentTable::new(50, [200, 600, 1400, 1700], 2000, 200)),
    ]
}
