//! Log output of a whole game.
//!
//! The `log` facade has one global logger per process, so this file holds a
//! single test.

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use rust_monopoly::core::GameConfig;
use rust_monopoly::decision::{BasicBot, Seats};
use rust_monopoly::engine::Engine;
use rust_monopoly::events::NullSink;

struct Capture {
    lines: Mutex<Vec<(Level, String)>>,
}

impl Log for Capture {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture {
    lines: Mutex::new(Vec::new()),
};

#[test]
fn test_game_end_is_logged_once() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(LevelFilter::Debug);

    let engine = Engine::new(GameConfig::default().with_seed(11).with_max_turns(30));
    let mut state = engine.new_game(&["alice", "bob", "carol"]);
    let mut seats = Seats::uniform(3, |_| BasicBot::new());
    let outcome = engine.run(&mut state, &mut seats, &mut NullSink);
    assert!(outcome.is_some());

    let lines = CAPTURE.lines.lock().unwrap();
    let game_over: Vec<_> = lines
        .iter()
        .filter(|(_, line)| line.starts_with("game over"))
        .collect();
    assert_eq!(game_over.len(), 1, "{game_over:?}");
    assert_eq!(game_over[0].0, Level::Info);
    assert!(lines.iter().any(|(level, _)| *level == Level::Debug));
}
