//! Card catalog for definition lookup.
//!
//! The `CardCatalog` stores every card of both decks. Decks hold only
//! `CardId`s; the catalog is the single source of card effects.

use rustc_hash::FxHashMap;

use super::definition::{Card, CardCategory, CardEffect, CardId, DeckKind, NearestTarget};

/// Registry of card definitions.
///
/// ```
/// use rust_monopoly::cards::{CardCatalog, DeckKind};
///
/// let catalog = CardCatalog::standard();
/// assert_eq!(catalog.deck_ids(DeckKind::Chance).len(), 16);
/// assert_eq!(catalog.deck_ids(DeckKind::CommunityChest).len(), 16);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, Card>,
    order: Vec<CardId>,
}

impl CardCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The classic 16 Chance and 16 Community Chest cards.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for card in chance_cards().into_iter().chain(community_chest_cards()) {
            catalog.register(card);
        }
        catalog
    }

    /// Add a card to the end of its deck's printed order.
    ///
    /// # Panics
    ///
    /// Panics if the id is already taken, in either deck.
    pub fn register(&mut self, card: Card) {
        assert!(!self.cards.contains_key(&card.id), "{} is already in the catalog", card.id);
        self.order.push(card.id);
        self.cards.insert(card.id, card);
    }

    /// Get a card by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// IDs of one deck in registration order.
    #[must_use]
    pub fn deck_ids(&self, deck: DeckKind) -> Vec<CardId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.cards.get(id).is_some_and(|c| c.deck == deck))
            .collect()
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over cards in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.order.iter().filter_map(|id| self.cards.get(id))
    }
}

fn chance_cards() -> Vec<Card> {
    use CardCategory::*;
    let card = |id: u32, category, text: &str, effect| {
        Card::new(CardId::new(id), DeckKind::Chance, category, text, effect)
    };

    vec![
        card(1, Movement, "Advance to Boardwalk.", CardEffect::advance_to(39)),
        card(
            2,
            Movement,
            "Advance to Go (collect $200).",
            CardEffect::advance_to(0).plus_money(200),
        ),
        card(
            3,
            Movement,
            "Advance to Illinois Avenue. If you pass Go, collect $200.",
            CardEffect::advance_to(24),
        ),
        card(
            4,
            Movement,
            "Advance to St. Charles Place. If you pass Go, collect $200.",
            CardEffect::advance_to(11),
        ),
        card(
            5,
            MovementPenalty,
            "Advance to the nearest Railroad. If owned, pay the owner twice the rental.",
            CardEffect::nearest(NearestTarget::Railroad { rent_multiplier: 2 }),
        ),
        card(
            6,
            MovementPenalty,
            "Advance to the nearest Railroad. If owned, pay the owner twice the rental.",
            CardEffect::nearest(NearestTarget::Railroad { rent_multiplier: 2 }),
        ),
        card(
            7,
            MovementPenalty,
            "Advance to the nearest Utility. If owned, throw dice and pay the owner ten times the amount thrown.",
            CardEffect::nearest(NearestTarget::Utility { dice_multiplier: 10 }),
        ),
        card(8, Financial, "Bank pays you a dividend of $50.", CardEffect::money(50)),
        card(9, Special, "Get Out of Jail Free.", CardEffect::jail_card()),
        card(10, Movement, "Go back 3 spaces.", CardEffect::relative(-3)),
        card(11, MovementToJail, "Go to Jail. Do not pass Go.", CardEffect::go_to_jail()),
        card(
            12,
            FinancialPenalty,
            "Make general repairs: $25 per house, $100 per hotel.",
            CardEffect::repairs(25, 100),
        ),
        card(13, FinancialPenalty, "Speeding fine $15.", CardEffect::money(-15)),
        card(
            14,
            Movement,
            "Take a trip to Reading Railroad. If you pass Go, collect $200.",
            CardEffect::advance_to(5),
        ),
        card(
            15,
            FinancialPenalty,
            "You have been elected Chairman of the Board. Pay each player $50.",
            CardEffect::pay_each(50),
        ),
        card(16, Financial, "Your building loan matures. Collect $150.", CardEffect::money(150)),
    ]
}

fn community_chest_cards() -> Vec<Card> {
    use CardCategory::*;
    let card = |id: u32, category, text: &str, effect| {
        Card::new(CardId::new(id), DeckKind::CommunityChest, category, text, effect)
    };

    vec![
        card(
            101,
            Movement,
            "Advance to Go (collect $200).",
            CardEffect::advance_to(0).plus_money(200),
        ),
        card(102, Financial, "Bank error in your favor. Collect $200.", CardEffect::money(200)),
        card(103, FinancialPenalty, "Doctor's fee. Pay $50.", CardEffect::money(-50)),
        card(104, Financial, "From sale of stock you get $50.", CardEffect::money(50)),
        card(105, Special, "Get Out of Jail Free.", CardEffect::jail_card()),
        card(106, MovementToJail, "Go to Jail. Do not pass Go.", CardEffect::go_to_jail()),
        card(107, Financial, "Holiday fund matures. Receive $100.", CardEffect::money(100)),
        card(108, Financial, "Income tax refund. Collect $20.", CardEffect::money(20)),
        card(
            109,
            Financial,
            "It is your birthday. Collect $10 from every player.",
            CardEffect::collect_from_each(10),
        ),
        card(110, Financial, "Life insurance matures. Collect $100.", CardEffect::money(100)),
        card(111, FinancialPenalty, "Pay hospital fees of $100.", CardEffect::money(-100)),
        card(112, FinancialPenalty, "Pay school fees of $50.", CardEffect::money(-50)),
        card(113, Financial, "Receive $25 consultancy fee.", CardEffect::money(25)),
        card(
            114,
            FinancialPenalty,
            "You are assessed for street repairs: $40 per house, $115 per hotel.",
            CardEffect::repairs(40, 115),
        ),
        card(
            115,
            Financial,
            "You have won second prize in a beauty contest. Collect $10.",
            CardEffect::money(10),
        ),
        card(116, Financial, "You inherit $100.", CardEffect::money(100)),
    ]
}
