//! Game state: the single mutable aggregate of a game.
//!
//! ## GameState
//!
//! Everything that changes during play:
//! - Players in fixed turn order and the current seat
//! - Property table (owner, buildings, mortgage flag) keyed by location
//! - Both card decks, the bank's building inventory, the RNG
//! - Per-turn bookkeeping (`TurnState`) and transient negotiation state
//!   (pending obligation, pending trade, running auction)
//! - Outcome and per-player interaction statistics
//!
//! ## StateSnapshot
//!
//! Serializable, read-only copy handed to decision providers and stored in
//! event records. The property table is an `im::OrdMap`, so taking a
//! snapshot shares structure with the live state.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::command::LocationList;
use super::config::GameConfig;
use super::player::{Player, PlayerId, PlayerMap};
use super::rng::{DiceRoll, GameRng, GameRngState};
use crate::board::{Board, Location};
use crate::cards::{CardCatalog, CardId, Deck, DeckKind};

/// Ownership and development of one ownable tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyState {
    /// Owning player, if any.
    pub owner: Option<PlayerId>,
    /// Houses (0-4). Always 0 while a hotel stands.
    pub houses: u8,
    /// Whether a hotel stands.
    pub hotel: bool,
    /// Mortgage flag.
    pub mortgaged: bool,
}

impl PropertyState {
    /// Development level: houses, or 5 for a hotel.
    #[must_use]
    pub fn level(&self) -> u8 {
        if self.hotel {
            5
        } else {
            self.houses
        }
    }

    /// Whether any building stands.
    #[must_use]
    pub fn has_buildings(&self) -> bool {
        self.hotel || self.houses > 0
    }

    /// Reset to the unowned, undeveloped state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Houses and hotels remaining in the bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankInventory {
    pub houses: u32,
    pub hotels: u32,
}

/// Phase of the current turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    JailCheck,
    AwaitingRoll,
    Moving,
    ResolvingLanding,
    AwaitingAction,
    TurnEnded,
}

/// Per-turn bookkeeping, reset at the start of every turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub phase: TurnPhase,
    /// Whether the player has rolled this turn.
    pub has_rolled: bool,
    /// Doubles thrown this turn.
    pub doubles_count: u8,
    /// Most recent roll.
    pub last_roll: Option<DiceRoll>,
    /// Unowned tile the player landed on and may buy.
    pub pending_purchase: Option<Location>,
    /// Decisions requested so far this turn.
    pub decisions: u32,
    /// Consecutive decisions without actionable intent.
    pub consecutive_failures: u32,
    /// Left jail by rolling doubles; that roll grants no re-roll.
    pub left_jail_on_doubles: bool,
}

impl TurnState {
    /// Whether another roll is legal: the first roll, or a re-roll after
    /// doubles while fewer than 3 doubles have been thrown.
    #[must_use]
    pub fn can_roll(&self) -> bool {
        if !self.has_rolled {
            return true;
        }
        if self.left_jail_on_doubles {
            return false;
        }
        self.last_roll.is_some_and(DiceRoll::is_doubles) && self.doubles_count < 3
    }
}

/// Who receives an outstanding payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payee {
    Bank,
    Player(PlayerId),
    /// Every other active player receives `amount`.
    AllPlayers,
}

/// A charge that could not be collected from cash alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obligation {
    pub debtor: PlayerId,
    /// Amount owed (per recipient for `Payee::AllPlayers`).
    pub amount: i64,
    pub payee: Payee,
    pub reason: String,
}

impl Obligation {
    /// Total cash the debtor must produce.
    #[must_use]
    pub fn total(&self, state: &GameState) -> i64 {
        match self.payee {
            Payee::AllPlayers => {
                let recipients = state
                    .active_players()
                    .filter(|&p| p != self.debtor)
                    .count();
                self.amount * recipients as i64
            }
            Payee::Bank | Payee::Player(_) => self.amount,
        }
    }
}

/// A proposed exchange awaiting the target's answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub proposer: PlayerId,
    pub target: PlayerId,
    pub offer_properties: LocationList,
    pub offer_money: i64,
    pub request_properties: LocationList,
    pub request_money: i64,
}

/// A running ascending auction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionState {
    pub location: Location,
    /// Bidders still in, in visiting order.
    pub bidders: Vec<PlayerId>,
    pub high_bid: i64,
    pub high_bidder: Option<PlayerId>,
}

/// Why the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeReason {
    /// Exactly one player is not bankrupt.
    LastPlayerStanding,
    /// Turn ceiling reached; highest net worth wins.
    TurnLimit,
    /// Nobody is left.
    NoPlayersLeft,
}

/// Final result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: Option<PlayerId>,
    pub reason: OutcomeReason,
    pub turns: u32,
}

/// How one seat's decision provider behaved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionStats {
    /// Decision requests sent to the provider.
    pub decisions_requested: u32,
    /// Decisions that carried no actionable command.
    pub failed_decisions: u32,
    /// Turns ended by the engine after provider errors.
    pub fallbacks: u32,
    pub commands_succeeded: u32,
    pub commands_failed: u32,
}

/// Complete mutable game state.
#[derive(Clone, Debug)]
pub struct GameState {
    // === Players ===
    /// Players in fixed turn order.
    pub players: PlayerMap<Player>,

    /// Seat whose turn it is.
    pub current: PlayerId,

    // === Board ===
    /// One entry per ownable tile.
    pub properties: OrdMap<Location, PropertyState>,

    pub chance: Deck,
    pub community_chest: Deck,

    /// Building inventory.
    pub bank: BankInventory,

    // === Progression ===
    /// Turns attempted so far, including skipped bankrupt seats.
    pub turn_number: u32,

    pub turn: TurnState,

    // === Transient negotiation ===
    pub pending_obligation: Option<Obligation>,
    pub pending_trade: Option<TradeOffer>,
    pub auction: Option<AuctionState>,

    // === Result ===
    pub outcome: Option<GameOutcome>,
    pub stats: PlayerMap<InteractionStats>,

    /// Sequence number of the next event record.
    pub event_sequence: u64,

    /// Dice and shuffle RNG.
    pub rng: GameRng,
}

impl GameState {
    /// Create a fresh game: everyone on Go with starting money, decks
    /// shuffled once with the seeded RNG.
    ///
    /// ```
    /// use rust_monopoly::board::Board;
    /// use rust_monopoly::cards::CardCatalog;
    /// use rust_monopoly::core::{GameConfig, GameState, PlayerId};
    ///
    /// let state = GameState::new(
    ///     &["alice", "bob"],
    ///     &GameConfig::default(),
    ///     &Board::standard(),
    ///     &CardCatalog::standard(),
    /// );
    /// assert_eq!(state.player_count(), 2);
    /// assert_eq!(state.current, PlayerId::new(0));
    /// assert_eq!(state.players[PlayerId::new(1)].money, 1500);
    /// ```
    #[must_use]
    pub fn new<S: AsRef<str>>(
        names: &[S],
        config: &GameConfig,
        board: &Board,
        catalog: &CardCatalog,
    ) -> Self {
        let mut rng = GameRng::new(config.seed);
        let chance = Deck::shuffled(DeckKind::Chance, catalog.deck_ids(DeckKind::Chance), &mut rng);
        let community_chest = Deck::shuffled(
            DeckKind::CommunityChest,
            catalog.deck_ids(DeckKind::CommunityChest),
            &mut rng,
        );

        let players = PlayerMap::from_fn(names.len(), |id| {
            Player::new(id, names[id.index()].as_ref(), config.starting_money)
        });

        let properties = board
            .ownable_locations()
            .map(|loc| (loc, PropertyState::default()))
            .collect();

        Self {
            stats: PlayerMap::seated(names.len()),
            players,
            current: PlayerId::new(0),
            properties,
            chance,
            community_chest,
            bank: BankInventory {
                houses: config.bank_houses,
                hotels: config.bank_hotels,
            },
            turn_number: 0,
            turn: TurnState::default(),
            pending_obligation: None,
            pending_trade: None,
            auction: None,
            outcome: None,
            event_sequence: 0,
            rng,
        }
    }

    /// Number of seats, bankrupt or not.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    // === Players ===

    /// Get a player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Get a player mutably.
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    /// Non-bankrupt players in seat order.
    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players
            .iter()
            .filter(|(_, p)| p.is_active())
            .map(|(id, _)| id)
    }

    /// Number of non-bankrupt players.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_players().count()
    }

    /// Active players in seat order starting after `from` (wrapping).
    #[must_use]
    pub fn seats_after(&self, from: PlayerId) -> Vec<PlayerId> {
        let count = self.player_count();
        (1..=count)
            .map(|offset| PlayerId::new(((from.index() + offset) % count) as u8))
            .filter(|&id| self.players[id].is_active())
            .collect()
    }

    /// Next non-bankrupt seat after `from`, if any.
    #[must_use]
    pub fn next_active_after(&self, from: PlayerId) -> Option<PlayerId> {
        self.seats_after(from).into_iter().next()
    }

    // === Properties ===

    /// Ownership record of a location (`None` for non-ownable tiles).
    #[must_use]
    pub fn property(&self, location: Location) -> Option<&PropertyState> {
        self.properties.get(&location)
    }

    /// Mutable ownership record.
    pub fn property_mut(&mut self, location: Location) -> Option<&mut PropertyState> {
        self.properties.get_mut(&location)
    }

    /// Owner of a location.
    #[must_use]
    pub fn owner_of(&self, location: Location) -> Option<PlayerId> {
        self.property(location).and_then(|p| p.owner)
    }

    /// Houses and hotels standing on a player's properties.
    #[must_use]
    pub fn buildings_of(&self, player: PlayerId) -> (u32, u32) {
        self.properties
            .values()
            .filter(|p| p.owner == Some(player))
            .fold((0, 0), |(houses, hotels), p| {
                (houses + u32::from(p.houses), hotels + u32::from(p.hotel))
            })
    }

    // === Decks ===

    /// Deck of the given kind.
    #[must_use]
    pub fn deck(&self, kind: DeckKind) -> &Deck {
        match kind {
            DeckKind::Chance => &self.chance,
            DeckKind::CommunityChest => &self.community_chest,
        }
    }

    /// Mutable deck of the given kind.
    pub fn deck_mut(&mut self, kind: DeckKind) -> &mut Deck {
        match kind {
            DeckKind::Chance => &mut self.chance,
            DeckKind::CommunityChest => &mut self.community_chest,
        }
    }

    // === Progression ===

    /// Check if the game has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Read-only serializable copy.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            turn_number: self.turn_number,
            current: self.current,
            players: self.players.values().cloned().collect(),
            properties: self.properties.clone(),
            bank: self.bank,
            turn: self.turn.clone(),
            pending_obligation: self.pending_obligation.clone(),
            pending_trade: self.pending_trade.clone(),
            auction: self.auction.clone(),
            outcome: self.outcome,
            chance: self.chance.iter().collect(),
            community_chest: self.community_chest.iter().collect(),
            rng: self.rng.state(),
        }
    }
}

/// Serializable view of a `GameState`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub turn_number: u32,
    pub current: PlayerId,
    pub players: Vec<Player>,
    pub properties: OrdMap<Location, PropertyState>,
    pub bank: BankInventory,
    pub turn: TurnState,
    pub pending_obligation: Option<Obligation>,
    pub pending_trade: Option<TradeOffer>,
    pub auction: Option<AuctionState>,
    pub outcome: Option<GameOutcome>,
    /// Deck orders, next draw first.
    pub chance: Vec<CardId>,
    pub community_chest: Vec<CardId>,
    pub rng: GameRngState,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_state(players: usize) -> GameState {
        let names: Vec<String> = (0..players).map(|i| format!("p{i}")).collect();
        GameState::new(
            &names,
            &GameConfig::default(),
            &Board::standard(),
            &CardCatalog::standard(),
        )
    }

    #[test]
    fn test_new_game() {
        let state = new_state(3);

        assert_eq!(state.player_count(), 3);
        assert_eq!(state.properties.len(), 28);
        assert_eq!(state.bank, BankInventory { houses: 32, hotels: 12 });
        assert_eq!(state.chance.len(), 16);
        assert_eq!(state.community_chest.len(), 16);
        assert!(state.property(0).is_none());
        assert!(state.players.values().all(|p| p.money == 1500 && p.position == 0));
    }

    #[test]
    fn test_same_seed_same_decks() {
        let a = new_state(2);
        let b = new_state(2);
        assert_eq!(a.chance, b.chance);
        assert_eq!(a.community_chest, b.community_chest);
    }

    #[test]
    fn test_seats_after_skips_bankrupt() {
        let mut state = new_state(4);
        state.players[PlayerId::new(2)].bankrupt = true;

        assert_eq!(
            state.seats_after(PlayerId::new(1)),
            vec![PlayerId::new(3), PlayerId::new(0), PlayerId::new(1)]
        );
        assert_eq!(state.next_active_after(PlayerId::new(1)), Some(PlayerId::new(3)));
        assert_eq!(state.active_count(), 3);
    }

    #[test]
    fn test_can_roll() {
        let mut turn = TurnState::default();
        assert!(turn.can_roll());

        turn.has_rolled = true;
        turn.last_roll = Some(DiceRoll::new(3, 3));
        turn.doubles_count = 1;
        assert!(turn.can_roll());

        turn.doubles_count = 3;
        assert!(!turn.can_roll());

        turn.doubles_count = 1;
        turn.last_roll = Some(DiceRoll::new(3, 4));
        assert!(!turn.can_roll());

        turn.last_roll = Some(DiceRoll::new(5, 5));
        turn.left_jail_on_doubles = true;
        assert!(!turn.can_roll());
    }

    #[test]
    fn test_property_level() {
        let mut prop = PropertyState {
            owner: Some(PlayerId::new(0)),
            houses: 3,
            ..PropertyState::default()
        };
        assert_eq!(prop.level(), 3);
        assert!(prop.has_buildings());

        prop.houses = 0;
        prop.hotel = true;
        assert_eq!(prop.level(), 5);

        prop.clear();
        assert_eq!(prop, PropertyState::default());
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = new_state(2);
        let snapshot = state.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: StateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_all_players_obligation_total() {
        let mut state = new_state(4);
        state.players[PlayerId::new(3)].bankrupt = true;
        let owed = Obligation {
            debtor: PlayerId::new(0),
            amount: 50,
            payee: Payee::AllPlayers,
            reason: "chairman".into(),
        };
        assert_eq!(owed.total(&state), 100);
    }
}
