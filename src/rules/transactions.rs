//! Transaction resolver - validated money and property operations.
//!
//! Every operation checks legality first and mutates only when all checks
//! pass, so a failed operation leaves the state untouched. Failures carry a
//! `TransactionError` with a readable reason.
//!
//! ## Building
//!
//! Houses go on streets of a fully owned, unmortgaged color group, one at a
//! time and low-to-high (even-building). A hotel replaces 4 houses and
//! needs every other street of the group at 4 houses or a hotel. Selling
//! mirrors this at half the build cost, high-to-low.
//!
//! ## Charges
//!
//! Unavoidable charges go through `charge`: cash pays at once; a shortfall
//! the player could cover by liquidating becomes a pending obligation;
//! anything else is bankruptcy.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::bankruptcy::{creditor_for, declare_bankrupt, BankruptcyReport};
use super::rent::owns_group;
use super::win::liquidation_value;
use crate::board::{Board, ColorGroup, Location, Tile};
use crate::core::{
    GameConfig, GameState, Obligation, Payee, PlayerId, PropertyState, TransactionError, TxResult,
};

/// Result of an unavoidable charge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChargeOutcome {
    /// Paid from cash.
    Paid { amount: i64 },
    /// Recorded as a pending obligation.
    Pending { amount: i64 },
    /// The debtor could not pay and went bankrupt.
    Bankrupt { report: BankruptcyReport },
}

impl ChargeOutcome {
    /// Whether the debtor went bankrupt.
    #[must_use]
    pub fn is_bankrupt(&self) -> bool {
        matches!(self, ChargeOutcome::Bankrupt { .. })
    }
}

/// Which settlement command is being used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settlement {
    /// `pay_rent`: a payment to another player.
    Rent,
    /// `pay_bank`: a payment to the bank.
    Bank,
    /// `pay_all_players`: a payment to every other player.
    AllPlayers,
}

impl Settlement {
    fn covers(self, payee: Payee) -> bool {
        matches!(
            (self, payee),
            (Settlement::Rent, Payee::Player(_))
                | (Settlement::Bank, Payee::Bank)
                | (Settlement::AllPlayers, Payee::AllPlayers)
        )
    }
}

/// Validated state transitions for purchases, buildings, mortgages and
/// payments.
#[derive(Clone, Copy)]
pub struct TransactionResolver<'a> {
    board: &'a Board,
    config: &'a GameConfig,
}

impl<'a> TransactionResolver<'a> {
    /// Create a resolver over a board and rule set.
    #[must_use]
    pub fn new(board: &'a Board, config: &'a GameConfig) -> Self {
        Self { board, config }
    }

    /// The board.
    #[must_use]
    pub fn board(&self) -> &'a Board {
        self.board
    }

    /// The rule set.
    #[must_use]
    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    // === Validation helpers ===

    fn tile(&self, location: Location) -> TxResult<&'a Tile> {
        self.board
            .tile(location)
            .ok_or(TransactionError::InvalidLocation(u32::from(location)))
    }

    fn check_active(state: &GameState, player: PlayerId) -> TxResult<()> {
        match state.player(player) {
            None => Err(TransactionError::UnknownPlayer(player)),
            Some(p) if p.bankrupt => Err(TransactionError::PlayerBankrupt(player)),
            Some(_) => Ok(()),
        }
    }

    fn check_funds(state: &GameState, player: PlayerId, needed: i64) -> TxResult<()> {
        let available = state.players[player].money;
        if available < needed {
            return Err(TransactionError::InsufficientFunds { needed, available });
        }
        Ok(())
    }

    /// Property record of a location owned by `player`.
    fn owned_by(&self, state: &GameState, player: PlayerId, location: Location) -> TxResult<PropertyState> {
        Self::check_active(state, player)?;
        self.tile(location)?;
        let prop = *state
            .property(location)
            .ok_or(TransactionError::NotOwnable(location))?;
        if prop.owner != Some(player) {
            return Err(TransactionError::NotOwner(location, player));
        }
        Ok(prop)
    }

    /// Color group and house cost of a street.
    fn street(&self, location: Location) -> TxResult<(ColorGroup, i64)> {
        let tile = self.tile(location)?;
        match (tile.color_group(), tile.house_cost()) {
            (Some(group), Some(cost)) => Ok((group, cost)),
            _ => Err(TransactionError::NotAStreet(location)),
        }
    }

    /// Development levels of the other streets in a group.
    fn group_levels(&self, state: &GameState, group: ColorGroup, except: Location) -> Vec<u8> {
        self.board
            .group_members(group)
            .iter()
            .filter(|&&loc| loc != except)
            .filter_map(|&loc| state.property(loc).map(PropertyState::level))
            .collect()
    }

    fn check_buildable(
        &self,
        state: &GameState,
        player: PlayerId,
        location: Location,
    ) -> TxResult<(PropertyState, ColorGroup, i64)> {
        let prop = self.owned_by(state, player, location)?;
        let (group, cost) = self.street(location)?;
        if !owns_group(self.board, state, player, group) {
            return Err(TransactionError::NoMonopoly(location));
        }
        let mortgaged = self
            .board
            .group_members(group)
            .iter()
            .any(|&loc| state.property(loc).is_some_and(|p| p.mortgaged));
        if mortgaged {
            return Err(TransactionError::GroupMortgaged(location));
        }
        if prop.hotel {
            return Err(TransactionError::HasHotel(location));
        }
        Ok((prop, group, cost))
    }

    // === Purchases ===

    /// Buy an unowned tile at list price. Returns the price paid.
    pub fn buy(&self, state: &mut GameState, player: PlayerId, location: Location) -> TxResult<i64> {
        Self::check_active(state, player)?;
        let tile = self.tile(location)?;
        let price = tile.price().ok_or(TransactionError::NotOwnable(location))?;
        let prop = state
            .property(location)
            .ok_or(TransactionError::NotOwnable(location))?;
        if prop.owner.is_some() {
            return Err(TransactionError::AlreadyOwned(location));
        }
        Self::check_funds(state, player, price)?;

        self.award(state, player, location, price);
        info!("{} buys {} for ${}", player, tile.name, price);
        Ok(price)
    }

    /// Hand an unowned tile to `player` for `price` (purchase or auction).
    pub(crate) fn award(&self, state: &mut GameState, player: PlayerId, location: Location, price: i64) {
        state.players[player].money -= price;
        state.players[player].add_property(location);
        if let Some(prop) = state.property_mut(location) {
            prop.owner = Some(player);
        }
    }

    // === Buildings ===

    /// Build one house. Returns the cost.
    pub fn build_house(&self, state: &mut GameState, player: PlayerId, location: Location) -> TxResult<i64> {
        let (prop, group, cost) = self.check_buildable(state, player, location)?;
        if prop.houses >= 4 {
            return Err(TransactionError::MaxHouses(location));
        }
        let lowest = self
            .group_levels(state, group, location)
            .into_iter()
            .min()
            .unwrap_or(prop.houses);
        if prop.houses > lowest {
            return Err(TransactionError::UnevenBuilding(location));
        }
        if state.bank.houses == 0 {
            return Err(TransactionError::BankOutOfHouses);
        }
        Self::check_funds(state, player, cost)?;

        state.players[player].money -= cost;
        state.bank.houses -= 1;
        if let Some(prop) = state.property_mut(location) {
            prop.houses += 1;
        }
        debug!("{} builds a house on {} for ${}", player, location, cost);
        Ok(cost)
    }

    /// Replace 4 houses with a hotel. Returns the cost.
    pub fn build_hotel(&self, state: &mut GameState, player: PlayerId, location: Location) -> TxResult<i64> {
        let (prop, group, cost) = self.check_buildable(state, player, location)?;
        if prop.houses != 4 {
            return Err(TransactionError::NeedsFourHouses(location));
        }
        if self.group_levels(state, group, location).iter().any(|&level| level < 4) {
            return Err(TransactionError::UnevenBuilding(location));
        }
        if state.bank.hotels == 0 {
            return Err(TransactionError::BankOutOfHotels);
        }
        Self::check_funds(state, player, cost)?;

        state.players[player].money -= cost;
        state.bank.hotels -= 1;
        state.bank.houses += 4;
        if let Some(prop) = state.property_mut(location) {
            prop.houses = 0;
            prop.hotel = true;
        }
        debug!("{} builds a hotel on {} for ${}", player, location, cost);
        Ok(cost)
    }

    /// Sell one house at half cost. Returns the proceeds.
    pub fn sell_house(&self, state: &mut GameState, player: PlayerId, location: Location) -> TxResult<i64> {
        let prop = self.owned_by(state, player, location)?;
        let (group, cost) = self.street(location)?;
        if prop.houses == 0 {
            return Err(TransactionError::NoHouses(location));
        }
        let highest = self
            .group_levels(state, group, location)
            .into_iter()
            .max()
            .unwrap_or(prop.houses);
        if prop.houses < highest {
            return Err(TransactionError::UnevenSelling(location));
        }

        let proceeds = cost / 2;
        state.players[player].money += proceeds;
        state.bank.houses += 1;
        if let Some(prop) = state.property_mut(location) {
            prop.houses -= 1;
        }
        debug!("{} sells a house on {} for ${}", player, location, proceeds);
        Ok(proceeds)
    }

    /// Break a hotel back down to 4 houses at half cost. Returns the
    /// proceeds.
    pub fn sell_hotel(&self, state: &mut GameState, player: PlayerId, location: Location) -> TxResult<i64> {
        let prop = self.owned_by(state, player, location)?;
        let (_, cost) = self.street(location)?;
        if !prop.hotel {
            return Err(TransactionError::NoHotel(location));
        }
        if state.bank.houses < 4 {
            return Err(TransactionError::BankOutOfHouses);
        }

        let proceeds = cost / 2;
        state.players[player].money += proceeds;
        state.bank.hotels += 1;
        state.bank.houses -= 4;
        if let Some(prop) = state.property_mut(location) {
            prop.hotel = false;
            prop.houses = 4;
        }
        debug!("{} sells the hotel on {} for ${}", player, location, proceeds);
        Ok(proceeds)
    }

    // === Mortgages ===

    /// Mortgage a property for half its price. Returns the proceeds.
    pub fn mortgage(&self, state: &mut GameState, player: PlayerId, location: Location) -> TxResult<i64> {
        let prop = self.owned_by(state, player, location)?;
        if prop.mortgaged {
            return Err(TransactionError::Mortgaged(location));
        }
        let tile = self.tile(location)?;
        if let Some(group) = tile.color_group() {
            let built = self
                .board
                .group_members(group)
                .iter()
                .any(|&loc| state.property(loc).is_some_and(PropertyState::has_buildings));
            if built {
                return Err(TransactionError::BuildingsInGroup(location));
            }
        }

        let proceeds = tile.mortgage_value().unwrap_or(0);
        state.players[player].money += proceeds;
        if let Some(prop) = state.property_mut(location) {
            prop.mortgaged = true;
        }
        debug!("{} mortgages {} for ${}", player, tile.name, proceeds);
        Ok(proceeds)
    }

    /// Cost to lift a mortgage: 110% of the mortgage value, rounded up.
    #[must_use]
    pub fn unmortgage_cost(&self, location: Location) -> Option<i64> {
        let half = self.board.tile(location)?.mortgage_value()?;
        Some((half * 11 + 9) / 10)
    }

    /// Lift a mortgage. Returns the cost.
    pub fn unmortgage(&self, state: &mut GameState, player: PlayerId, location: Location) -> TxResult<i64> {
        let prop = self.owned_by(state, player, location)?;
        if !prop.mortgaged {
            return Err(TransactionError::NotMortgaged(location));
        }
        let cost = self
            .unmortgage_cost(location)
            .ok_or(TransactionError::NotOwnable(location))?;
        Self::check_funds(state, player, cost)?;

        state.players[player].money -= cost;
        if let Some(prop) = state.property_mut(location) {
            prop.mortgaged = false;
        }
        debug!("{} lifts the mortgage on {} for ${}", player, location, cost);
        Ok(cost)
    }

    // === Jail ===

    /// Pay the fine and leave jail. Returns the fine.
    pub fn pay_jail_fine(&self, state: &mut GameState, player: PlayerId) -> TxResult<i64> {
        Self::check_active(state, player)?;
        if !state.players[player].in_jail {
            return Err(TransactionError::NotInJail(player));
        }
        let fine = self.config.jail_fine;
        Self::check_funds(state, player, fine)?;

        let p = &mut state.players[player];
        p.money -= fine;
        p.in_jail = false;
        p.jail_turns = 0;
        debug!("{} pays ${} to leave jail", player, fine);
        Ok(fine)
    }

    /// Spend a get-out-of-jail token.
    pub fn use_jail_card(&self, state: &mut GameState, player: PlayerId) -> TxResult<()> {
        Self::check_active(state, player)?;
        let p = &mut state.players[player];
        if !p.in_jail {
            return Err(TransactionError::NotInJail(player));
        }
        if p.jail_cards == 0 {
            return Err(TransactionError::NoJailCard(player));
        }
        p.jail_cards -= 1;
        p.in_jail = false;
        p.jail_turns = 0;
        debug!("{} uses a get-out-of-jail card", player);
        Ok(())
    }

    // === Payments ===

    /// Total a debtor pays for `amount` to `payee`.
    fn total_for(state: &GameState, debtor: PlayerId, amount: i64, payee: Payee) -> i64 {
        match payee {
            Payee::AllPlayers => {
                let recipients = state.active_players().filter(|&p| p != debtor).count();
                amount * recipients as i64
            }
            Payee::Bank | Payee::Player(_) => amount,
        }
    }

    /// Move cash without any checks.
    fn transfer(state: &mut GameState, debtor: PlayerId, amount: i64, payee: Payee) -> i64 {
        let total = Self::total_for(state, debtor, amount, payee);
        state.players[debtor].money -= total;
        match payee {
            Payee::Bank => {}
            Payee::Player(to) => state.players[to].money += amount,
            Payee::AllPlayers => {
                let recipients: Vec<PlayerId> =
                    state.active_players().filter(|&p| p != debtor).collect();
                for to in recipients {
                    state.players[to].money += amount;
                }
            }
        }
        total
    }

    /// Charge that must be paid now: cash if possible, otherwise
    /// bankruptcy in favor of the payee.
    pub fn pay_or_bankrupt(
        &self,
        state: &mut GameState,
        debtor: PlayerId,
        amount: i64,
        payee: Payee,
    ) -> ChargeOutcome {
        let total = Self::total_for(state, debtor, amount, payee);
        if state.players[debtor].money >= total {
            Self::transfer(state, debtor, amount, payee);
            return ChargeOutcome::Paid { amount: total };
        }
        let report = declare_bankrupt(self.config, state, debtor, creditor_for(payee));
        ChargeOutcome::Bankrupt { report }
    }

    /// Unavoidable charge with room to raise funds.
    ///
    /// Cash pays at once. If cash is short but selling buildings and
    /// mortgaging could cover the total, the debt becomes the pending
    /// obligation. Otherwise the debtor goes bankrupt.
    ///
    /// Only one obligation is held at a time; an earlier one is closed
    /// first, from cash or by bankruptcy.
    pub fn charge(
        &self,
        state: &mut GameState,
        debtor: PlayerId,
        amount: i64,
        payee: Payee,
        reason: &str,
    ) -> ChargeOutcome {
        if let Some(earlier) = self.force_settle(state) {
            if state.players[debtor].bankrupt {
                return earlier;
            }
        }

        let total = Self::total_for(state, debtor, amount, payee);
        let cash = state.players[debtor].money;
        if cash >= total {
            Self::transfer(state, debtor, amount, payee);
            return ChargeOutcome::Paid { amount: total };
        }

        if cash + liquidation_value(self.board, state, debtor) >= total {
            info!("{} owes ${} ({}) and must raise funds", debtor, total, reason);
            state.pending_obligation = Some(Obligation {
                debtor,
                amount,
                payee,
                reason: reason.to_string(),
            });
            return ChargeOutcome::Pending { amount: total };
        }

        let report = declare_bankrupt(self.config, state, debtor, creditor_for(payee));
        ChargeOutcome::Bankrupt { report }
    }

    /// Pay the pending obligation with a settlement command. Returns the
    /// total paid.
    pub fn settle(&self, state: &mut GameState, player: PlayerId, via: Settlement) -> TxResult<i64> {
        Self::check_active(state, player)?;
        let obligation = state
            .pending_obligation
            .clone()
            .filter(|o| o.debtor == player && via.covers(o.payee))
            .ok_or(TransactionError::NoObligation)?;

        let total = Self::total_for(state, player, obligation.amount, obligation.payee);
        Self::check_funds(state, player, total)?;

        Self::transfer(state, player, obligation.amount, obligation.payee);
        state.pending_obligation = None;
        debug!("{} settles ${} ({})", player, total, obligation.reason);
        Ok(total)
    }

    /// Close any outstanding obligation at turn end: pay from cash or go
    /// bankrupt.
    pub fn force_settle(&self, state: &mut GameState) -> Option<ChargeOutcome> {
        let obligation = state.pending_obligation.take()?;
        Some(self.pay_or_bankrupt(state, obligation.debtor, obligation.amount, obligation.payee))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardCatalog;

    struct Fixture {
        board: Board,
        config: GameConfig,
        state: GameState,
    }

    impl Fixture {
        fn new() -> Self {
            let board = Board::standard();
            let config = GameConfig::default();
            let state = GameState::new(&["a", "b", "c"], &config, &board, &CardCatalog::standard());
            Self { board, config, state }
        }

        fn give(&mut self, player: PlayerId, locations: &[Location]) {
            for &loc in locations {
                self.state.property_mut(loc).unwrap().owner = Some(player);
                self.state.players[player].add_property(loc);
            }
        }

        fn houses(&mut self, location: Location, houses: u8) {
            self.state.property_mut(location).unwrap().houses = houses;
        }
    }

    const A: PlayerId = PlayerId::new(0);
    const B: PlayerId = PlayerId::new(1);

    #[test]
    fn test_buy() {
        let mut fx = Fixture::new();
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        assert_eq!(resolver.buy(&mut fx.state, A, 1), Ok(60));
        assert_eq!(fx.state.players[A].money, 1440);
        assert_eq!(fx.state.owner_of(1), Some(A));
        assert!(fx.state.players[A].owns(1));

        assert_eq!(resolver.buy(&mut fx.state, B, 1), Err(TransactionError::AlreadyOwned(1)));
        assert_eq!(resolver.buy(&mut fx.state, B, 0), Err(TransactionError::NotOwnable(0)));
    }

    #[test]
    fn test_buy_insufficient_funds_leaves_state() {
        let mut fx = Fixture::new();
        fx.state.players[A].money = 100;
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        let err = resolver.buy(&mut fx.state, A, 39).unwrap_err();
        assert_eq!(err, TransactionError::InsufficientFunds { needed: 400, available: 100 });
        assert_eq!(fx.state.players[A].money, 100);
        assert_eq!(fx.state.owner_of(39), None);
    }

    #[test]
    fn test_build_requires_monopoly() {
        let mut fx = Fixture::new();
        fx.give(A, &[1]);
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        assert_eq!(
            resolver.build_house(&mut fx.state, A, 1),
            Err(TransactionError::NoMonopoly(1))
        );
        assert_eq!(
            resolver.build_house(&mut fx.state, A, 5),
            Err(TransactionError::NotOwner(5, A))
        );
    }

    #[test]
    fn test_even_building() {
        let mut fx = Fixture::new();
        fx.give(A, &[6, 8, 9]);
        fx.houses(6, 1);
        fx.houses(8, 1);
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        assert_eq!(
            resolver.build_house(&mut fx.state, A, 6),
            Err(TransactionError::UnevenBuilding(6))
        );
        assert_eq!(
            resolver.build_house(&mut fx.state, A, 8),
            Err(TransactionError::UnevenBuilding(8))
        );
        assert_eq!(resolver.build_house(&mut fx.state, A, 9), Ok(50));
        assert_eq!(resolver.build_house(&mut fx.state, A, 6), Ok(50));
        assert_eq!(fx.state.bank.houses, 30);
        assert_eq!(fx.state.players[A].money, 1400);
    }

    #[test]
    fn test_build_blocked_by_group_mortgage() {
        let mut fx = Fixture::new();
        fx.give(A, &[1, 3]);
        fx.state.property_mut(3).unwrap().mortgaged = true;
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        assert_eq!(
            resolver.build_house(&mut fx.state, A, 1),
            Err(TransactionError::GroupMortgaged(1))
        );
    }

    #[test]
    fn test_bank_inventory_limits() {
        let mut fx = Fixture::new();
        fx.give(A, &[1, 3]);
        fx.state.bank.houses = 0;
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        assert_eq!(
            resolver.build_house(&mut fx.state, A, 1),
            Err(TransactionError::BankOutOfHouses)
        );
    }

    #[test]
    fn test_hotel_cycle() {
        let mut fx = Fixture::new();
        fx.give(A, &[37, 39]);
        fx.houses(37, 4);
        fx.houses(39, 3);
        fx.state.bank.houses = 25;
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        assert_eq!(
            resolver.build_hotel(&mut fx.state, A, 39),
            Err(TransactionError::NeedsFourHouses(39))
        );
        assert_eq!(
            resolver.build_hotel(&mut fx.state, A, 37),
            Err(TransactionError::UnevenBuilding(37))
        );

        resolver.build_house(&mut fx.state, A, 39).unwrap();
        assert_eq!(resolver.build_hotel(&mut fx.state, A, 39), Ok(200));
        let prop = fx.state.property(39).unwrap();
        assert!(prop.hotel);
        assert_eq!(prop.houses, 0);
        assert_eq!(fx.state.bank.houses, 28);
        assert_eq!(fx.state.bank.hotels, 11);

        // Houses on 37 can't be sold while 39 has a hotel.
        assert_eq!(
            resolver.sell_house(&mut fx.state, A, 37),
            Err(TransactionError::UnevenSelling(37))
        );

        assert_eq!(resolver.sell_hotel(&mut fx.state, A, 39), Ok(100));
        let prop = fx.state.property(39).unwrap();
        assert!(!prop.hotel);
        assert_eq!(prop.houses, 4);
        assert_eq!(fx.state.bank.houses, 24);
        assert_eq!(fx.state.bank.hotels, 12);
    }

    #[test]
    fn test_sell_hotel_needs_bank_houses() {
        let mut fx = Fixture::new();
        fx.give(A, &[37, 39]);
        fx.state.property_mut(39).unwrap().hotel = true;
        fx.houses(37, 4);
        fx.state.bank.houses = 3;
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        assert_eq!(
            resolver.sell_hotel(&mut fx.state, A, 39),
            Err(TransactionError::BankOutOfHouses)
        );
        assert!(fx.state.property(39).unwrap().hotel);
    }

    #[test]
    fn test_even_selling() {
        let mut fx = Fixture::new();
        fx.give(A, &[1, 3]);
        fx.houses(1, 2);
        fx.houses(3, 1);
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        assert_eq!(
            resolver.sell_house(&mut fx.state, A, 3),
            Err(TransactionError::UnevenSelling(3))
        );
        assert_eq!(resolver.sell_house(&mut fx.state, A, 1), Ok(25));
        assert_eq!(resolver.sell_house(&mut fx.state, A, 3), Ok(25));
    }

    #[test]
    fn test_mortgage_cycle() {
        let mut fx = Fixture::new();
        fx.give(A, &[1, 3]);
        fx.houses(3, 1);
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        assert_eq!(
            resolver.mortgage(&mut fx.state, A, 1),
            Err(TransactionError::BuildingsInGroup(1))
        );

        fx.state.property_mut(3).unwrap().houses = 0;
        assert_eq!(resolver.mortgage(&mut fx.state, A, 1), Ok(30));
        assert_eq!(resolver.mortgage(&mut fx.state, A, 1), Err(TransactionError::Mortgaged(1)));
        assert_eq!(fx.state.players[A].money, 1530);

        assert_eq!(resolver.unmortgage(&mut fx.state, A, 1), Ok(33));
        assert_eq!(fx.state.players[A].money, 1497);
        assert_eq!(
            resolver.unmortgage(&mut fx.state, A, 1),
            Err(TransactionError::NotMortgaged(1))
        );
    }

    #[test]
    fn test_unmortgage_cost_rounds_up() {
        let fx = Fixture::new();
        let resolver = TransactionResolver::new(&fx.board, &fx.config);
        assert_eq!(resolver.unmortgage_cost(5), Some(110));
        assert_eq!(resolver.unmortgage_cost(1), Some(33));
        assert_eq!(resolver.unmortgage_cost(11), Some(77));
        assert_eq!(resolver.unmortgage_cost(21), Some(121));
        // 175 * 1.1 = 192.5
        assert_eq!(resolver.unmortgage_cost(37), Some(193));
        assert_eq!(resolver.unmortgage_cost(0), None);
    }

    #[test]
    fn test_jail_release() {
        let mut fx = Fixture::new();
        let resolver = TransactionResolver::new(&fx.board, &fx.config);
        assert_eq!(resolver.pay_jail_fine(&mut fx.state, A), Err(TransactionError::NotInJail(A)));

        fx.state.players[A].in_jail = true;
        assert_eq!(resolver.use_jail_card(&mut fx.state, A), Err(TransactionError::NoJailCard(A)));
        assert_eq!(resolver.pay_jail_fine(&mut fx.state, A), Ok(50));
        assert!(!fx.state.players[A].in_jail);

        fx.state.players[A].in_jail = true;
        fx.state.players[A].jail_cards = 1;
        assert_eq!(resolver.use_jail_card(&mut fx.state, A), Ok(()));
        assert_eq!(fx.state.players[A].jail_cards, 0);
    }

    #[test]
    fn test_charge_paths() {
        let mut fx = Fixture::new();
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        let paid = resolver.charge(&mut fx.state, A, 100, Payee::Player(B), "rent");
        assert_eq!(paid, ChargeOutcome::Paid { amount: 100 });
        assert_eq!(fx.state.players[B].money, 1600);

        // Short on cash but Boardwalk can be mortgaged.
        fx.state.property_mut(39).unwrap().owner = Some(A);
        fx.state.players[A].add_property(39);
        fx.state.players[A].money = 50;
        let pending = resolver.charge(&mut fx.state, A, 200, Payee::Bank, "tax");
        assert_eq!(pending, ChargeOutcome::Pending { amount: 200 });
        assert_eq!(fx.state.players[A].money, 50);

        assert_eq!(
            resolver.settle(&mut fx.state, A, Settlement::Rent),
            Err(TransactionError::NoObligation)
        );
        assert!(resolver.settle(&mut fx.state, A, Settlement::Bank).is_err());
        resolver.mortgage(&mut fx.state, A, 39).unwrap();
        assert_eq!(resolver.settle(&mut fx.state, A, Settlement::Bank), Ok(200));
        assert_eq!(fx.state.players[A].money, 50);
        assert!(fx.state.pending_obligation.is_none());
    }

    #[test]
    fn test_charge_beyond_liquidation_bankrupts() {
        let mut fx = Fixture::new();
        fx.state.players[A].money = 30;
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        let outcome = resolver.charge(&mut fx.state, A, 75, Payee::Player(B), "rent");
        assert!(outcome.is_bankrupt());
        assert!(fx.state.players[A].bankrupt);
        assert_eq!(fx.state.players[B].money, 1530);
    }

    #[test]
    fn test_new_charge_closes_earlier_obligation() {
        let mut fx = Fixture::new();
        fx.give(A, &[39]);
        fx.state.players[A].money = 50;
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        let rent = resolver.charge(&mut fx.state, A, 100, Payee::Player(B), "rent");
        assert_eq!(rent, ChargeOutcome::Pending { amount: 100 });
        resolver.mortgage(&mut fx.state, A, 39).unwrap();

        // The rent is paid from the raised cash before the tax is charged.
        let tax = resolver.charge(&mut fx.state, A, 100, Payee::Bank, "tax");
        assert_eq!(tax, ChargeOutcome::Paid { amount: 100 });
        assert_eq!(fx.state.players[B].money, 1600);
        assert_eq!(fx.state.players[A].money, 50);
        assert!(fx.state.pending_obligation.is_none());
    }

    #[test]
    fn test_unpayable_earlier_obligation_bankrupts_first() {
        let mut fx = Fixture::new();
        fx.give(A, &[39]);
        fx.state.players[A].money = 50;
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        resolver.charge(&mut fx.state, A, 100, Payee::Player(B), "rent");
        let tax = resolver.charge(&mut fx.state, A, 30, Payee::Bank, "tax");

        assert!(tax.is_bankrupt());
        assert!(fx.state.players[A].bankrupt);
        // The owner, not the bank, is the creditor.
        assert_eq!(fx.state.owner_of(39), Some(B));
        assert_eq!(fx.state.players[B].money, 1550);
        assert!(fx.state.pending_obligation.is_none());
    }

    #[test]
    fn test_pay_all_players() {
        let mut fx = Fixture::new();
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        let outcome = resolver.pay_or_bankrupt(&mut fx.state, A, 50, Payee::AllPlayers);
        assert_eq!(outcome, ChargeOutcome::Paid { amount: 100 });
        assert_eq!(fx.state.players[A].money, 1400);
        assert_eq!(fx.state.players[B].money, 1550);
        assert_eq!(fx.state.players[PlayerId::new(2)].money, 1550);
    }

    #[test]
    fn test_force_settle() {
        let mut fx = Fixture::new();
        fx.state.players[A].money = 10;
        fx.state.pending_obligation = Some(Obligation {
            debtor: A,
            amount: 40,
            payee: Payee::AllPlayers,
            reason: "test".into(),
        });
        let resolver = TransactionResolver::new(&fx.board, &fx.config);

        let outcome = resolver.force_settle(&mut fx.state).unwrap();
        assert!(outcome.is_bankrupt());
        assert!(fx.state.pending_obligation.is_none());
        assert_eq!(resolver.force_settle(&mut fx.state), None);
    }
}
