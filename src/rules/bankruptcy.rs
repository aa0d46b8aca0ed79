//! Bankruptcy settlement.
//!
//! A bankrupt player hands everything over and leaves the game for good.
//! What the creditor receives depends on who it is:
//!
//! - **Another player**: all cash, every property exactly as it stands
//!   (buildings and mortgage flags intact), and all jail tokens.
//! - **The bank**: properties return to an unowned, unmortgaged,
//!   building-free state. Their buildings vanish from play unless
//!   `GameConfig::return_buildings_to_bank` is set.
//!
//! Either way the debtor ends with money 0, no properties and no tokens.

use log::info;
use serde::{Deserialize, Serialize};

use crate::board::Location;
use crate::core::{GameConfig, GameState, Payee, PlayerId};

/// What a settlement moved, for logging and events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankruptcyReport {
    pub debtor: PlayerId,
    /// `None` when the bank is the creditor.
    pub creditor: Option<PlayerId>,
    pub cash: i64,
    pub properties: Vec<Location>,
    pub jail_cards: u8,
    /// Houses and hotels restored to the bank inventory.
    pub returned_houses: u32,
    pub returned_hotels: u32,
}

/// Creditor named by a payee. Payments to everyone fall back to the bank.
#[must_use]
pub fn creditor_for(payee: Payee) -> Option<PlayerId> {
    match payee {
        Payee::Player(id) => Some(id),
        Payee::Bank | Payee::AllPlayers => None,
    }
}

/// Settle `debtor`'s bankruptcy in favor of `creditor` (or the bank).
///
/// Settling an already bankrupt player is a no-op that reports nothing
/// moved.
pub fn declare_bankrupt(
    config: &GameConfig,
    state: &mut GameState,
    debtor: PlayerId,
    creditor: Option<PlayerId>,
) -> BankruptcyReport {
    // A creditor that is itself out of the game cannot receive assets.
    let creditor = creditor.filter(|&c| {
        c != debtor && state.player(c).is_some_and(|p| p.is_active())
    });

    let mut report = BankruptcyReport {
        debtor,
        creditor,
        cash: 0,
        properties: Vec::new(),
        jail_cards: 0,
        returned_houses: 0,
        returned_hotels: 0,
    };

    let Some(player) = state.player_mut(debtor) else {
        return report;
    };
    if player.bankrupt {
        return report;
    }

    report.cash = player.money.max(0);
    report.properties = std::mem::take(&mut player.properties);
    report.jail_cards = player.jail_cards;
    player.money = 0;
    player.jail_cards = 0;
    player.bankrupt = true;
    player.in_jail = false;
    player.jail_turns = 0;

    match creditor {
        Some(to) => {
            let receiver = &mut state.players[to];
            receiver.money += report.cash;
            receiver.jail_cards += report.jail_cards;
            for &loc in &report.properties {
                receiver.add_property(loc);
            }
            for &loc in &report.properties {
                if let Some(prop) = state.property_mut(loc) {
                    prop.owner = Some(to);
                }
            }
        }
        None => {
            for &loc in &report.properties {
                if let Some(prop) = state.property_mut(loc) {
                    if prop.hotel {
                        report.returned_hotels += 1;
                    }
                    report.returned_houses += u32::from(prop.houses);
                    prop.clear();
                }
            }
            if config.return_buildings_to_bank {
                state.bank.houses += report.returned_houses;
                state.bank.hotels += report.returned_hotels;
            } else {
                report.returned_houses = 0;
                report.returned_hotels = 0;
            }
        }
    }

    if state
        .pending_obligation
        .as_ref()
        .is_some_and(|o| o.debtor == debtor)
    {
        state.pending_obligation = None;
    }
    if state
        .pending_trade
        .as_ref()
        .is_some_and(|t| t.proposer == debtor || t.target == debtor)
    {
        state.pending_trade = None;
    }
    if let Some(auction) = state.auction.as_mut() {
        auction.bidders.retain(|&p| p != debtor);
        if auction.high_bidder == Some(debtor) {
            auction.high_bidder = None;
            auction.high_bid = 0;
        }
    }

    info!(
        "{} is bankrupt; {} properties and ${} go to {}",
        debtor,
        report.properties.len(),
        report.cash,
        creditor.map_or_else(|| "the bank".to_string(), |c| c.to_string()),
    );

    report
}
