//! Rent computation.
//!
//! - Streets: hotel tier, else house tier, else base (doubled when the
//!   owner holds the whole color group)
//! - Railroads: `25 × 2^(railroads owned − 1)`
//! - Utilities: dice total × 4 with one utility owned, × 10 with both
//!
//! Mortgaged and unowned tiles charge nothing.

use crate::board::{Board, ColorGroup, Location, TileKind};
use crate::core::{GameState, PlayerId};

/// Base railroad rent with a single railroad owned.
pub const RAILROAD_BASE_RENT: i64 = 25;

/// Whether `player` owns every street of `group`.
#[must_use]
pub fn owns_group(board: &Board, state: &GameState, player: PlayerId, group: ColorGroup) -> bool {
    let members = board.group_members(group);
    !members.is_empty() && members.iter().all(|&loc| state.owner_of(loc) == Some(player))
}

/// Count how many of `locations` belong to `player`.
fn owned_among(state: &GameState, player: PlayerId, locations: &[Location]) -> u32 {
    locations
        .iter()
        .filter(|&&loc| state.owner_of(loc) == Some(player))
        .count() as u32
}

/// Railroad rent for an owner holding `count` railroads.
#[must_use]
pub fn railroad_rent(count: u32) -> i64 {
    match count {
        0 => 0,
        n => RAILROAD_BASE_RENT << (n.min(4) - 1),
    }
}

/// Utility rent for an owner holding `count` utilities.
#[must_use]
pub fn utility_rent(count: u32, dice_total: u8) -> i64 {
    let multiplier = if count >= 2 { 10 } else { 4 };
    match count {
        0 => 0,
        _ => i64::from(dice_total) * multiplier,
    }
}

/// Rent owed for landing on `location` with the given dice total.
///
/// ```
/// use rust_monopoly::board::Board;
/// use rust_monopoly::cards::CardCatalog;
/// use rust_monopoly::core::{GameConfig, GameState, PlayerId};
/// use rust_monopoly::rules::rent_due;
///
/// let board = Board::standard();
/// let mut state = GameState::new(&["a", "b"], &GameConfig::default(), &board, &CardCatalog::standard());
/// state.property_mut(5).unwrap().owner = Some(PlayerId::new(1));
/// assert_eq!(rent_due(&board, &state, 5, 7), 25);
/// ```
#[must_use]
pub fn rent_due(board: &Board, state: &GameState, location: Location, dice_total: u8) -> i64 {
    let (Some(tile), Some(prop)) = (board.tile(location), state.property(location)) else {
        return 0;
    };
    let Some(owner) = prop.owner else {
        return 0;
    };
    if prop.mortgaged {
        return 0;
    }

    match &tile.kind {
        TileKind::Street { group, rent, .. } => {
            if prop.hotel {
                rent.hotel
            } else if prop.houses > 0 {
                rent.with_houses(prop.houses)
            } else if owns_group(board, state, owner, *group) {
                rent.base * 2
            } else {
                rent.base
            }
        }
        TileKind::Railroad { .. } => railroad_rent(owned_among(state, owner, board.railroads())),
        TileKind::Utility { .. } => {
            utility_rent(owned_among(state, owner, board.utilities()), dice_total)
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardCatalog;
    use crate::core::GameConfig;

    fn setup() -> (Board, GameState) {
        let board = Board::standard();
        let state = GameState::new(
            &["a", "b"],
            &GameConfig::default(),
            &board,
            &CardCatalog::standard(),
        );
        (board, state)
    }

    fn give(state: &mut GameState, player: PlayerId, locations: &[Location]) {
        for &loc in locations {
            state.property_mut(loc).unwrap().owner = Some(player);
            state.players[player].add_property(loc);
        }
    }

    #[test]
    fn test_railroad_tiers() {
        assert_eq!(railroad_rent(1), 25);
        assert_eq!(railroad_rent(2), 50);
        assert_eq!(railroad_rent(3), 100);
        assert_eq!(railroad_rent(4), 200);
    }

    #[test]
    fn test_utility_multiplier() {
        let (board, mut state) = setup();
        let p = PlayerId::new(0);

        give(&mut state, p, &[12]);
        assert_eq!(rent_due(&board, &state, 12, 8), 32);

        give(&mut state, p, &[28]);
        assert_eq!(rent_due(&board, &state, 12, 8), 80);
    }

    #[test]
    fn test_street_monopoly_doubles_base() {
        let (board, mut state) = setup();
        let p = PlayerId::new(0);

        give(&mut state, p, &[1]);
        assert_eq!(rent_due(&board, &state, 1, 7), 2);

        give(&mut state, p, &[3]);
        assert_eq!(rent_due(&board, &state, 1, 7), 4);
    }

    #[test]
    fn test_buildings_use_tiers() {
        let (board, mut state) = setup();
        let p = PlayerId::new(0);
        give(&mut state, p, &[37, 39]);

        state.property_mut(39).unwrap().houses = 3;
        assert_eq!(rent_due(&board, &state, 39, 7), 1400);

        let prop = state.property_mut(39).unwrap();
        prop.houses = 0;
        prop.hotel = true;
        assert_eq!(rent_due(&board, &state, 39, 7), 2000);
    }

    #[test]
    fn test_mortgaged_and_unowned_free() {
        let (board, mut state) = setup();
        assert_eq!(rent_due(&board, &state, 1, 7), 0);
        assert_eq!(rent_due(&board, &state, 0, 7), 0);

        give(&mut state, PlayerId::new(0), &[1]);
        state.property_mut(1).unwrap().mortgaged = true;
        assert_eq!(rent_due(&board, &state, 1, 7), 0);
    }
}
