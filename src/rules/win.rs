//! Win evaluation and asset valuation.
//!
//! ## Net worth
//!
//! Cash + list price of every property + buildings at cost (a hotel counts
//! as 5 house units) − half price of every mortgaged property. Used for the
//! turn-ceiling tiebreak and percentage taxes.
//!
//! ## Liquidation value
//!
//! Cash a player could still raise: mortgage value of every unmortgaged
//! property plus half the build cost of every building.

use crate::board::Board;
use crate::core::{GameOutcome, GameState, OutcomeReason, PlayerId};

/// Net worth of a player.
#[must_use]
pub fn net_worth(board: &Board, state: &GameState, player: PlayerId) -> i64 {
    let Some(p) = state.player(player) else {
        return 0;
    };

    p.properties.iter().fold(p.money, |total, &loc| {
        let (Some(tile), Some(prop)) = (board.tile(loc), state.property(loc)) else {
            return total;
        };
        let price = tile.price().unwrap_or(0);
        let buildings = tile.house_cost().unwrap_or(0) * i64::from(prop.level());
        let mortgage = if prop.mortgaged { price / 2 } else { 0 };
        total + price + buildings - mortgage
    })
}

/// Cash a player could raise by selling every building and mortgaging
/// every property.
#[must_use]
pub fn liquidation_value(board: &Board, state: &GameState, player: PlayerId) -> i64 {
    let Some(p) = state.player(player) else {
        return 0;
    };

    p.properties
        .iter()
        .filter_map(|&loc| Some((board.tile(loc)?, state.property(loc)?)))
        .map(|(tile, prop)| {
            let buildings = tile.house_cost().unwrap_or(0) * i64::from(prop.level()) / 2;
            let mortgage = if prop.mortgaged {
                0
            } else {
                tile.mortgage_value().unwrap_or(0)
            };
            buildings + mortgage
        })
        .sum()
}

/// Richest active player by net worth. Ties go to the earliest seat.
#[must_use]
pub fn richest_player(board: &Board, state: &GameState) -> Option<PlayerId> {
    state
        .active_players()
        .map(|id| (id, net_worth(board, state, id)))
        .fold(None, |best: Option<(PlayerId, i64)>, (id, worth)| match best {
            Some((_, best_worth)) if best_worth >= worth => best,
            _ => Some((id, worth)),
        })
        .map(|(id, _)| id)
}

/// Decide whether the game is over after a turn.
///
/// Returns the outcome without storing it.
#[must_use]
pub fn evaluate(board: &Board, state: &GameState, max_turns: u32) -> Option<GameOutcome> {
    if let Some(outcome) = state.outcome {
        return Some(outcome);
    }

    let mut active = state.active_players();
    let outcome = match (active.next(), active.next()) {
        (None, _) => GameOutcome {
            winner: None,
            reason: OutcomeReason::NoPlayersLeft,
            turns: state.turn_number,
        },
        (Some(last), None) => GameOutcome {
            winner: Some(last),
            reason: OutcomeReason::LastPlayerStanding,
            turns: state.turn_number,
        },
        _ if state.turn_number >= max_turns => GameOutcome {
            winner: richest_player(board, state),
            reason: OutcomeReason::TurnLimit,
            turns: state.turn_number,
        },
        _ => return None,
    };

    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Location;
    use crate::cards::CardCatalog;
    use crate::core::GameConfig;

    fn setup(players: &[&str]) -> (Board, GameState) {
        let board = Board::standard();
        let state = GameState::new(players, &GameConfig::default(), &board, &CardCatalog::standard());
        (board, state)
    }

    fn give(state: &mut GameState, player: PlayerId, locations: &[Location]) {
        for &loc in locations {
            state.property_mut(loc).unwrap().owner = Some(player);
            state.players[player].add_property(loc);
        }
    }

    #[test]
    fn test_net_worth() {
        let (board, mut state) = setup(&["a", "b"]);
        let a = PlayerId::new(0);
        state.players[a].money = 100;
        give(&mut state, a, &[37, 39, 5]);
        state.property_mut(39).unwrap().hotel = true;
        state.property_mut(37).unwrap().houses = 2;
        state.property_mut(5).unwrap().mortgaged = true;

        // 100 + (350 + 2*200) + (400 + 5*200) + (200 - 100)
        assert_eq!(net_worth(&board, &state, a), 100 + 750 + 1400 + 100);
    }

    #[test]
    fn test_liquidation_value() {
        let (board, mut state) = setup(&["a", "b"]);
        let a = PlayerId::new(0);
        give(&mut state, a, &[37, 39, 5]);
        state.property_mut(37).unwrap().houses = 2;
        state.property_mut(5).unwrap().mortgaged = true;

        // 175 + 200 (houses) + 200 + 0
        assert_eq!(liquidation_value(&board, &state, a), 575);
    }

    #[test]
    fn test_last_player_standing() {
        let (board, mut state) = setup(&["a", "b", "c"]);
        assert_eq!(evaluate(&board, &state, 1000), None);

        state.players[PlayerId::new(0)].bankrupt = true;
        state.players[PlayerId::new(2)].bankrupt = true;
        let outcome = evaluate(&board, &state, 1000).unwrap();
        assert_eq!(outcome.winner, Some(PlayerId::new(1)));
        assert_eq!(outcome.reason, OutcomeReason::LastPlayerStanding);
    }

    #[test]
    fn test_turn_limit_tiebreak_earliest_seat() {
        let (board, mut state) = setup(&["a", "b", "c"]);
        state.turn_number = 10;

        let outcome = evaluate(&board, &state, 10).unwrap();
        assert_eq!(outcome.reason, OutcomeReason::TurnLimit);
        assert_eq!(outcome.winner, Some(PlayerId::new(0)));

        state.players[PlayerId::new(2)].money = 1600;
        assert_eq!(evaluate(&board, &state, 10).unwrap().winner, Some(PlayerId::new(2)));
    }

    #[test]
    fn test_nobody_left() {
        let (board, mut state) = setup(&["a", "b"]);
        for p in PlayerId::all(2) {
            state.players[p].bankrupt = true;
        }
        let outcome = evaluate(&board, &state, 1000).unwrap();
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.reason, OutcomeReason::NoPlayersLeft);
    }
}
