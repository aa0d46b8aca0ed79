//! Cyclic card decks.
//!
//! A deck is shuffled once when the game is created. Drawing takes the
//! front card and puts it straight back at the bottom, so the order only
//! ever rotates.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::definition::{CardId, DeckKind};
use crate::core::GameRng;

/// A rotating queue of card IDs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    kind: DeckKind,
    cards: VecDeque<CardId>,
    draws: u32,
}

impl Deck {
    /// Create a deck in the given order (front is drawn first).
    #[must_use]
    pub fn from_order(kind: DeckKind, cards: Vec<CardId>) -> Self {
        Self {
            kind,
            cards: cards.into(),
            draws: 0,
        }
    }

    /// Create a deck and shuffle it.
    #[must_use]
    pub fn shuffled(kind: DeckKind, mut cards: Vec<CardId>, rng: &mut GameRng) -> Self {
        rng.shuffle(&mut cards);
        Self::from_order(kind, cards)
    }

    /// Which deck this is.
    #[must_use]
    pub fn kind(&self) -> DeckKind {
        self.kind
    }

    /// Draw the front card and rotate it to the back.
    ///
    /// Returns `None` only for an empty deck.
    pub fn draw(&mut self) -> Option<CardId> {
        let card = self.cards.pop_front()?;
        self.cards.push_back(card);
        self.draws += 1;
        Some(card)
    }

    /// Next card to be drawn.
    #[must_use]
    pub fn peek(&self) -> Option<CardId> {
        self.cards.front().copied()
    }

    /// Total draws so far (the cursor position modulo deck size).
    #[must_use]
    pub fn draws(&self) -> u32 {
        self.draws
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the deck is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Current order, front first.
    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }
}
