//! Property-based tests for dice, movement, building and settlement rules.

use proptest::prelude::*;

use rust_monopoly::board::{Board, ColorGroup, BOARD_SIZE};
use rust_monopoly::cards::CardCatalog;
use rust_monopoly::core::{Command, GameConfig, GameRng, GameState, PlayerId, RawCommand};
use rust_monopoly::decision::{BasicBot, ScriptedProvider, Seats};
use rust_monopoly::engine::Engine;
use rust_monopoly::events::{MemoryLog, NullSink};
use rust_monopoly::rules::bankruptcy::declare_bankrupt;
use rust_monopoly::rules::movement;
use rust_monopoly::rules::rent::{railroad_rent, utility_rent};

const A: PlayerId = PlayerId::new(0);
const B: PlayerId = PlayerId::new(1);

/// Streets of the two cheapest groups.
const BUILD_SITES: [u8; 5] = [1, 3, 6, 8, 9];

fn new_state(config: &GameConfig) -> GameState {
    GameState::new(&["a", "b", "c"], config, &Board::standard(), &CardCatalog::standard())
}

fn command_for(op: u8, location: u8) -> Command {
    match op % 4 {
        0 | 1 => Command::build_house(location),
        2 => Command::sell_house(location),
        _ => Command::build_hotel(location),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Dice faces stay in range for any seed.
    #[test]
    fn prop_dice_in_range(seed in any::<u64>()) {
        let mut rng = GameRng::new(seed);
        for _ in 0..50 {
            let roll = rng.roll_dice();
            prop_assert!((2..=12).contains(&roll.total()));
            prop_assert!((1..=6).contains(&roll.die1));
            prop_assert!((1..=6).contains(&roll.die2));
        }
    }

    /// Forward moves wrap modulo the board and pay Go exactly on a wrap.
    #[test]
    fn prop_movement_wraps(start in 0u8..40, steps in 2u8..=12) {
        let config = GameConfig::default();
        let mut state = new_state(&config);
        state.players[A].position = start;

        let moved = movement::advance(&config, &mut state, A, steps);

        let raw = usize::from(start) + usize::from(steps);
        prop_assert_eq!(usize::from(moved.to), raw % BOARD_SIZE);
        prop_assert_eq!(moved.passed_go, raw >= BOARD_SIZE);
        let expected = if raw >= BOARD_SIZE { 1700 } else { 1500 };
        prop_assert_eq!(state.players[A].money, expected);
    }

    /// Backward moves never pay the Go bonus.
    #[test]
    fn prop_retreat_never_pays(start in 0u8..40, steps in 1u8..=12) {
        let config = GameConfig::default();
        let mut state = new_state(&config);
        state.players[A].position = start;

        let moved = movement::retreat(&config, &mut state, A, steps);

        prop_assert!(usize::from(moved.to) < BOARD_SIZE);
        prop_assert_eq!(moved.bonus, 0);
        prop_assert_eq!(state.players[A].money, 1500);
    }

    /// Railroad rent doubles per railroad held.
    #[test]
    fn prop_railroad_rent(count in 1u32..=4) {
        prop_assert_eq!(railroad_rent(count), 25 * (1 << (count - 1)));
    }

    /// Utility rent is 4x or 10x the dice total.
    #[test]
    fn prop_utility_rent(count in 1u32..=2, dice in 2u8..=12) {
        let multiplier = if count == 2 { 10 } else { 4 };
        prop_assert_eq!(utility_rent(count, dice), i64::from(dice) * multiplier);
    }

    /// No sequence of build and sell commands breaks even building or
    /// creates buildings out of thin air.
    #[test]
    fn prop_even_building(ops in prop::collection::vec((any::<u8>(), 0usize..5), 1..60)) {
        let engine = Engine::new(GameConfig::default().with_starting_money(5000));
        let mut state = engine.new_game(&["a", "b"]);
        for loc in BUILD_SITES {
            state.property_mut(loc).unwrap().owner = Some(A);
            state.players[A].add_property(loc);
        }
        let mut seats = Seats::new();
        let mut sink = NullSink;

        for (op, site) in ops {
            let before = state.snapshot();
            let outcome = engine.execute(&mut state, A, &command_for(op, BUILD_SITES[site]), &mut seats, &mut sink);
            if !outcome.success {
                prop_assert_eq!(state.snapshot(), before);
            }

            for group in [ColorGroup::Brown, ColorGroup::LightBlue] {
                let levels: Vec<u8> = engine
                    .board()
                    .group_members(group)
                    .iter()
                    .map(|&loc| state.property(loc).unwrap().level())
                    .collect();
                let high = levels.iter().max().unwrap();
                let low = levels.iter().min().unwrap();
                prop_assert!(high - low <= 1, "uneven {:?}: {:?}", group, levels);
            }

            let built: u32 = BUILD_SITES.iter().map(|&loc| u32::from(state.property(loc).unwrap().houses)).sum();
            let hotels: u32 = BUILD_SITES.iter().map(|&loc| u32::from(state.property(loc).unwrap().hotel)).sum();
            prop_assert_eq!(state.bank.houses + built, 32);
            prop_assert_eq!(state.bank.hotels + hotels, 12);
            prop_assert!(state.players[A].money >= 0);
        }
    }

    /// A bankrupt player ends with nothing; a player creditor receives the
    /// cash and every property.
    #[test]
    fn prop_bankruptcy_empties_debtor(
        money in 0i64..2000,
        owned in prop::collection::btree_set(prop::sample::select(vec![1u8, 3, 5, 6, 12, 39]), 0..6),
        to_player in any::<bool>(),
    ) {
        let config = GameConfig::default();
        let mut state = new_state(&config);
        state.players[A].money = money;
        state.players[A].jail_cards = 1;
        for &loc in &owned {
            state.property_mut(loc).unwrap().owner = Some(A);
            state.players[A].add_property(loc);
        }
        let creditor = to_player.then_some(B);

        let report = declare_bankrupt(&config, &mut state, A, creditor);

        let debtor = &state.players[A];
        prop_assert!(debtor.bankrupt);
        prop_assert_eq!(debtor.money, 0);
        prop_assert!(debtor.properties.is_empty());
        prop_assert_eq!(debtor.jail_cards, 0);
        prop_assert_eq!(report.cash, money);
        for &loc in &owned {
            prop_assert_eq!(state.owner_of(loc), creditor);
        }
        if to_player {
            prop_assert_eq!(state.players[B].money, 1500 + money);
            prop_assert_eq!(state.players[B].jail_cards, 1);
        } else {
            prop_assert_eq!(state.players[B].money, 1500);
        }
    }

    /// Parsing never panics, whatever a text provider sends.
    #[test]
    fn prop_raw_commands_parse(name in "[a-z_]{0,20}", arguments in ".{0,40}") {
        let command = RawCommand::new(name, arguments).parse();
        prop_assert!(!command.name().is_empty() || !command.is_actionable());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Queries never change the state, at any point of a game.
    #[test]
    fn prop_queries_are_idempotent(seed in any::<u64>(), turns in 0usize..40, location in 0u8..40) {
        let engine = Engine::new(GameConfig::default().with_seed(seed));
        let mut state = engine.new_game(&["a", "b", "c"]);
        let mut seats = Seats::uniform(3, |_| BasicBot::new());
        let mut sink = NullSink;
        for _ in 0..turns {
            engine.play_turn(&mut state, &mut seats, &mut sink);
        }

        let before = state.snapshot();
        let mut log = MemoryLog::new();
        let mut quiet = Seats::uniform(3, |_| ScriptedProvider::new());
        let player = state.current;
        let first = engine.execute(&mut state, player, &Command::GetGameState, &mut quiet, &mut log);
        let again = engine.execute(&mut state, player, &Command::GetGameState, &mut quiet, &mut log);
        let info = engine.execute(&mut state, player, &Command::property_info(location), &mut quiet, &mut log);

        prop_assert_eq!(state.snapshot(), before);
        prop_assert_eq!(first.payload, again.payload);
        prop_assert_eq!(info.success, !state.is_over());
    }

    /// Bot games always finish by the turn ceiling.
    #[test]
    fn prop_games_terminate(seed in any::<u64>(), players in 2usize..=6) {
        let engine = Engine::new(GameConfig::default().with_seed(seed).with_max_turns(120));
        let names: Vec<String> = (0..players).map(|i| format!("p{i}")).collect();
        let mut state = engine.new_game(names.as_slice());
        let mut seats = Seats::uniform(players, |_| BasicBot::new());

        let outcome = engine.run(&mut state, &mut seats, &mut NullSink);

        prop_assert!(outcome.is_some());
        prop_assert!(state.turn_number <= 120);
    }
}
