//! Card system: definitions, catalog, and decks.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for catalog cards
//! - `CardEffect`: Effect descriptor applied by the effect executor
//! - `Card`: Static card data (deck, category, text, effect)
//! - `CardCatalog`: Card lookup, standard Chance and Community Chest sets
//! - `Deck`: Cyclic draw order, never reshuffled after creation

pub mod catalog;
pub mod deck;
pub mod definition;

pub use catalog::CardCatalog;
pub use deck::Deck;
pub use definition::{Card, CardCategory, CardEffect, CardId, DeckKind, NearestTarget, RepairCharge};
