//! Token movement and the Go bonus.
//!
//! Forward moves wrap modulo the board size and credit the Go bonus once
//! per wrap (passing or landing exactly on Go). Backward moves and jail
//! transfers never credit it.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Location, BOARD_SIZE};
use crate::core::{GameConfig, GameState, PlayerId};

/// Where a move started and ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub from: Location,
    pub to: Location,
    pub passed_go: bool,
    /// Bonus credited for passing Go.
    pub bonus: i64,
}

fn finish(
    config: &GameConfig,
    state: &mut GameState,
    player: PlayerId,
    (from, to): (Location, Location),
    passed_go: bool,
    collect: bool,
) -> Movement {
    let bonus = if passed_go && collect { config.go_bonus } else { 0 };
    let p = &mut state.players[player];
    p.position = to;
    p.money += bonus;
    debug!("{} moves {} -> {} (Go bonus {})", player, from, to, bonus);
    Movement {
        from,
        to,
        passed_go,
        bonus,
    }
}

/// Move forward `steps` tiles.
pub fn advance(config: &GameConfig, state: &mut GameState, player: PlayerId, steps: u8) -> Movement {
    let from = state.players[player].position;
    let raw = usize::from(from) + usize::from(steps);
    let to = (raw % BOARD_SIZE) as Location;
    finish(config, state, player, (from, to), raw >= BOARD_SIZE, true)
}

/// Move forward to `target`, wrapping past Go if it lies behind.
pub fn advance_to(
    config: &GameConfig,
    state: &mut GameState,
    player: PlayerId,
    target: Location,
    collect_go_bonus: bool,
) -> Movement {
    let from = state.players[player].position;
    finish(config, state, player, (from, target), target < from, collect_go_bonus)
}

/// Move backward `steps` tiles. Never credits the Go bonus.
pub fn retreat(config: &GameConfig, state: &mut GameState, player: PlayerId, steps: u8) -> Movement {
    let from = state.players[player].position;
    let back = usize::from(steps) % BOARD_SIZE;
    let to = ((usize::from(from) + BOARD_SIZE - back) % BOARD_SIZE) as Location;
    finish(config, state, player, (from, to), false, false)
}

/// Send a player straight to jail without passing Go.
pub fn send_to_jail(board: &Board, state: &mut GameState, player: PlayerId) {
    let p = &mut state.players[player];
    p.position = board.jail();
    p.in_jail = true;
    p.jail_turns = 0;
    debug!("{} goes to jail", player);
}

/// Release a player from jail.
pub fn release_from_jail(state: &mut GameState, player: PlayerId) {
    let p = &mut state.players[player];
    p.in_jail = false;
    p.jail_turns = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardCatalog;

    const A: PlayerId = PlayerId::new(0);

    fn setup() -> (Board, GameConfig, GameState) {
        let board = Board::standard();
        let config = GameConfig::default();
        let state = GameState::new(&["a", "b"], &config, &board, &CardCatalog::standard());
        (board, config, state)
    }

    #[test]
    fn test_advance_wraps_with_bonus() {
        let (_, config, mut state) = setup();
        state.players[A].position = 35;

        let mv = advance(&config, &mut state, A, 7);
        assert_eq!(mv.to, 2);
        assert!(mv.passed_go);
        assert_eq!(state.players[A].money, 1700);
    }

    #[test]
    fn test_landing_on_go_counts() {
        let (_, config, mut state) = setup();
        state.players[A].position = 33;

        let mv = advance(&config, &mut state, A, 7);
        assert_eq!(mv.to, 0);
        assert_eq!(mv.bonus, 200);
    }

    #[test]
    fn test_advance_without_wrap() {
        let (_, config, mut state) = setup();
        let mv = advance(&config, &mut state, A, 12);
        assert_eq!(mv.to, 12);
        assert!(!mv.passed_go);
        assert_eq!(state.players[A].money, 1500);
    }

    #[test]
    fn test_advance_to_behind_wraps() {
        let (_, config, mut state) = setup();
        state.players[A].position = 36;

        let mv = advance_to(&config, &mut state, A, 11, true);
        assert!(mv.passed_go);
        assert_eq!(state.players[A].money, 1700);

        let mv = advance_to(&config, &mut state, A, 39, true);
        assert!(!mv.passed_go);
        assert_eq!(state.players[A].money, 1700);
    }

    #[test]
    fn test_retreat_never_pays() {
        let (_, config, mut state) = setup();
        state.players[A].position = 2;

        let mv = retreat(&config, &mut state, A, 3);
        assert_eq!(mv.to, 39);
        assert_eq!(mv.bonus, 0);
        assert_eq!(state.players[A].money, 1500);
    }

    #[test]
    fn test_send_to_jail() {
        let (board, _, mut state) = setup();
        state.players[A].position = 30;
        state.players[A].jail_turns = 2;

        send_to_jail(&board, &mut state, A);
        let p = &state.players[A];
        assert_eq!(p.position, 10);
        assert!(p.in_jail);
        assert_eq!(p.jail_turns, 0);
        assert_eq!(p.money, 1500);
    }
}
