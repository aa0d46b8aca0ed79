//! Player identification, per-player storage, and player records.
//!
//! ## PlayerId
//!
//! Seat index in the fixed turn order, assigned at game creation.
//!
//! ## PlayerMap
//!
//! Per-player storage backed by `Vec` for O(1) access by `PlayerId`.
//!
//! ## Player
//!
//! The mutable record for one seat: cash, position, holdings, jail status.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::board::Location;

/// Player identifier (seat index, 0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Position in turn order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Seats of a `player_count`-player game, in turn order.
    ///
    /// ```
    /// use rust_monopoly::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count).map(|seat| PlayerId(seat as u8))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One entry per seat, indexed directly by `PlayerId`.
///
/// ```
/// use rust_monopoly::core::{PlayerId, PlayerMap};
///
/// let mut cash = PlayerMap::from_fn(4, |_| 1500_i64);
/// cash[PlayerId::new(1)] -= 200;
/// assert_eq!(cash[PlayerId::new(1)], 1300);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build the entry for each seat in turn order.
    ///
    /// # Panics
    ///
    /// Panics if `player_count` does not fit a `PlayerId`.
    pub fn from_fn(player_count: usize, init: impl FnMut(PlayerId) -> T) -> Self {
        assert!(player_count <= usize::from(u8::MAX), "too many seats: {player_count}");
        Self {
            seats: PlayerId::all(player_count).map(init).collect(),
        }
    }

    /// A default entry for every seat.
    pub fn seated(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::from_fn(player_count, |_| T::default())
    }

    /// Number of seats, bankrupt ones included.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    /// Entry for `player`, or `None` for a seat that does not exist.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.seats.get(player.index())
    }

    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.seats.get_mut(player.index())
    }

    /// Seats paired with their entries, in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::all(self.seats.len()).zip(self.seats.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.seats.iter()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.seats[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.seats[player.index()]
    }
}

/// One seat's mutable game record.
///
/// `money` may only go negative inside a single settlement step; every
/// resolver operation leaves it non-negative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat in turn order.
    pub id: PlayerId,

    /// Display name (usually the model or bot driving the seat).
    pub name: String,

    /// Cash on hand.
    pub money: i64,

    /// Board position (0-39).
    pub position: Location,

    /// Owned tile locations, kept sorted.
    pub properties: Vec<Location>,

    /// Get-out-of-jail tokens held.
    pub jail_cards: u8,

    /// Whether the player is currently in jail.
    pub in_jail: bool,

    /// Turns spent in jail so far (0-3).
    pub jail_turns: u8,

    /// Terminal, one-way.
    pub bankrupt: bool,
}

impl Player {
    /// Create a fresh player on Go.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, money: i64) -> Self {
        Self {
            id,
            name: name.into(),
            money,
            position: 0,
            properties: Vec::new(),
            jail_cards: 0,
            in_jail: false,
            jail_turns: 0,
            bankrupt: false,
        }
    }

    /// Whether the player still takes turns.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.bankrupt
    }

    /// Check ownership of a location.
    #[must_use]
    pub fn owns(&self, location: Location) -> bool {
        self.properties.binary_search(&location).is_ok()
    }

    /// Record a newly acquired location.
    pub fn add_property(&mut self, location: Location) {
        if let Err(pos) = self.properties.binary_search(&location) {
            self.properties.insert(pos, location);
        }
    }

    /// Drop a location. Returns true if it was held.
    pub fn remove_property(&mut self, location: Location) -> bool {
        match self.properties.binary_search(&location) {
            Ok(pos) => {
                self.properties.remove(pos);
                true
            }
            Err(_) => false,
        }
    }
}
