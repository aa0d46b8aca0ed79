//! Auctions for declined properties.
//!
//! ## Automatic
//!
//! One round, no bids: each active player offers a fixed share of the list
//! price capped by their cash. The highest positive offer wins and pays
//! its offer. Candidates are visited starting with the seat after the
//! decliner; ties go to the first visited.
//!
//! ## Bidding
//!
//! An ascending auction. The engine asks each remaining bidder in turn
//! for `auction_bid` or `pass_auction`; `place_bid`, `pass` and `close`
//! apply those decisions.

use log::info;
use serde::{Deserialize, Serialize};

use super::transactions::TransactionResolver;
use crate::board::Location;
use crate::core::{AuctionState, GameState, PlayerId, TransactionError, TxResult};

/// How an auction ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionResult {
    pub location: Location,
    /// `None` when nobody was willing; the tile stays unowned.
    pub winner: Option<PlayerId>,
    pub price: i64,
}

/// Run the single-round automatic auction.
pub fn run_automatic(
    resolver: &TransactionResolver<'_>,
    state: &mut GameState,
    location: Location,
    decliner: PlayerId,
) -> AuctionResult {
    let price = resolver
        .board()
        .tile(location)
        .and_then(|t| t.price())
        .unwrap_or(0);
    let percent = resolver.config().auction_willingness_percent;

    let mut best: Option<(PlayerId, i64)> = None;
    if state.owner_of(location).is_none() {
        for candidate in state.seats_after(decliner) {
            let offer = (price * percent / 100).min(state.players[candidate].money);
            if offer > 0 && best.map_or(true, |(_, high)| offer > high) {
                best = Some((candidate, offer));
            }
        }
    }

    finish(resolver, state, location, best)
}

fn finish(
    resolver: &TransactionResolver<'_>,
    state: &mut GameState,
    location: Location,
    best: Option<(PlayerId, i64)>,
) -> AuctionResult {
    match best {
        Some((winner, price)) => {
            resolver.award(state, winner, location, price);
            info!("{} wins the auction for {} at ${}", winner, location, price);
            AuctionResult {
                location,
                winner: Some(winner),
                price,
            }
        }
        None => {
            info!("no bids for {}; it stays with the bank", location);
            AuctionResult {
                location,
                winner: None,
                price: 0,
            }
        }
    }
}

/// Start an ascending auction. Bidders are every active player, starting
/// after the decliner.
pub fn open(state: &mut GameState, location: Location, decliner: PlayerId) -> TxResult<()> {
    if state.property(location).is_none() {
        return Err(TransactionError::NotOwnable(location));
    }
    if state.owner_of(location).is_some() {
        return Err(TransactionError::AlreadyOwned(location));
    }
    state.auction = Some(AuctionState {
        location,
        bidders: state.seats_after(decliner),
        high_bid: 0,
        high_bidder: None,
    });
    Ok(())
}

/// Smallest bid the auction accepts next.
#[must_use]
pub fn minimum_bid(auction: &AuctionState, increment: i64) -> i64 {
    auction.high_bid + increment.max(1)
}

/// Raise the high bid.
pub fn place_bid(
    resolver: &TransactionResolver<'_>,
    state: &mut GameState,
    player: PlayerId,
    amount: i64,
) -> TxResult<()> {
    let increment = resolver.config().min_bid_increment;
    let money = state.player(player).map_or(0, |p| p.money);
    let auction = state.auction.as_mut().ok_or(TransactionError::NoAuction)?;
    if !auction.bidders.contains(&player) {
        return Err(TransactionError::NoAuction);
    }
    let minimum = minimum_bid(auction, increment);
    if amount < minimum {
        return Err(TransactionError::InsufficientFunds {
            needed: minimum,
            available: amount,
        });
    }
    if amount > money {
        return Err(TransactionError::InsufficientFunds {
            needed: amount,
            available: money,
        });
    }
    auction.high_bid = amount;
    auction.high_bidder = Some(player);
    Ok(())
}

/// Drop out of the auction.
pub fn pass(state: &mut GameState, player: PlayerId) -> TxResult<()> {
    let auction = state.auction.as_mut().ok_or(TransactionError::NoAuction)?;
    let before = auction.bidders.len();
    auction.bidders.retain(|&p| p != player);
    if auction.bidders.len() == before {
        return Err(TransactionError::NoAuction);
    }
    Ok(())
}

/// Whether the running auction is decided: nobody is left to bid, or the
/// only bidder left holds the high bid. A standing bid survives its
/// bidder passing.
#[must_use]
pub fn is_settled(state: &GameState) -> bool {
    state.auction.as_ref().map_or(true, |a| match a.bidders.as_slice() {
        [] => true,
        [only] => a.high_bidder == Some(*only),
        _ => false,
    })
}

/// Close the running auction, awarding the tile to the high bidder.
pub fn close(resolver: &TransactionResolver<'_>, state: &mut GameState) -> TxResult<AuctionResult> {
    let auction = state.auction.take().ok_or(TransactionError::NoAuction)?;
    let best = auction
        .high_bidder
        .filter(|&p| state.player(p).is_some_and(|pl| pl.is_active() && pl.money >= auction.high_bid))
        .map(|p| (p, auction.high_bid));
    Ok(finish(resolver, state, auction.location, best))
}
