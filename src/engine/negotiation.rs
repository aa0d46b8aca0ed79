//! Provider requests, auctions and trade responses.

use log::{info, warn};
use serde_json::json;

use super::{emit, Engine};
use crate::board::Location;
use crate::core::{AuctionMode, Command, DecisionError, GameState, PlayerId, TradeOffer, TxResult};
use crate::decision::{DecisionHint, DecisionRequest, Seats};
use crate::events::{EventAction, EventSink};
use crate::rules::{auction, trade, AuctionResult, TradeResolution};

impl Engine {
    /// Ask `player`'s provider for a decision, retrying failures.
    ///
    /// Returns `None` once the attempts are used up; the fallback is
    /// recorded as a `ProviderFallback` event.
    pub(super) fn ask(
        &self,
        state: &mut GameState,
        player: PlayerId,
        hint: Option<&DecisionHint>,
        seats: &mut Seats,
        sink: &mut dyn EventSink,
    ) -> Option<Vec<Command>> {
        state.stats[player].decisions_requested += 1;
        if player == state.current {
            state.turn.decisions += 1;
        }

        let attempts = self.config.max_decision_attempts.max(1);
        let error = match seats.get_mut(player) {
            None => DecisionError::Unavailable(format!("no provider seated for {player}")),
            Some(provider) => {
                let mut last = DecisionError::Exhausted(attempts);
                for attempt in 1..=attempts {
                    let request = DecisionRequest {
                        state,
                        board: &self.board,
                        player,
                        hint,
                    };
                    match provider.decide(&request) {
                        Ok(commands) => return Some(commands),
                        Err(err) => {
                            warn!("{} provider failed (attempt {}/{}): {}", player, attempt, attempts, err);
                            last = err;
                        }
                    }
                }
                last
            }
        };

        state.stats[player].fallbacks += 1;
        warn!("{} has no decision; falling back to end_turn", player);
        let details = json!({
            "error": error.to_string(),
            "attempts": attempts,
            "hint": hint.map(ToString::to_string),
        });
        emit(state, sink, Some(player), EventAction::ProviderFallback, details);
        None
    }

    // === Auctions ===

    /// Auction a declined tile with the configured policy.
    pub(super) fn auction(
        &self,
        state: &mut GameState,
        decliner: PlayerId,
        location: Location,
        seats: &mut Seats,
        sink: &mut dyn EventSink,
    ) -> AuctionResult {
        let mode = self.config.auction_mode;
        let details = json!({ "location": location, "mode": mode });
        emit(state, sink, Some(decliner), EventAction::AuctionOpened, details);

        let result = match mode {
            AuctionMode::Automatic => auction::run_automatic(&self.resolver(), state, location, decliner),
            AuctionMode::Bidding => self.run_bidding(state, decliner, location, seats, sink),
        };

        emit(state, sink, result.winner, EventAction::AuctionClosed, json!({ "result": result }));
        result
    }

    fn run_bidding(
        &self,
        state: &mut GameState,
        decliner: PlayerId,
        location: Location,
        seats: &mut Seats,
        sink: &mut dyn EventSink,
    ) -> AuctionResult {
        let unsold = AuctionResult {
            location,
            winner: None,
            price: 0,
        };
        if auction::open(state, location, decliner).is_err() {
            return unsold;
        }
        let resolver = self.resolver();

        for _ in 0..self.config.max_auction_rounds {
            let bidders = state.auction.as_ref().map(|a| a.bidders.clone()).unwrap_or_default();
            for bidder in bidders {
                if auction::is_settled(state) {
                    break;
                }
                let Some(running) = state.auction.as_ref() else {
                    break;
                };
                if running.high_bidder == Some(bidder) || !running.bidders.contains(&bidder) {
                    continue;
                }

                let minimum_bid = auction::minimum_bid(running, self.config.min_bid_increment);
                let hint = DecisionHint::AuctionBid { location, minimum_bid };
                let bid = self
                    .ask(state, bidder, Some(&hint), seats, sink)
                    .unwrap_or_default()
                    .into_iter()
                    .find_map(|c| match c {
                        Command::AuctionBid { amount } => Some(Some(amount)),
                        Command::PassAuction => Some(None),
                        _ => None,
                    })
                    .flatten();

                let placed = bid.is_some_and(|amount| auction::place_bid(&resolver, state, bidder, amount).is_ok());
                if !placed {
                    // Stray answers and rejected bids both count as passing.
                    let _ = auction::pass(state, bidder);
                }
            }
            if auction::is_settled(state) {
                break;
            }
        }

        auction::close(&resolver, state).unwrap_or(unsold)
    }

    // === Trades ===

    /// Record a proposal and put it to the target's provider.
    pub(super) fn negotiate_trade(
        &self,
        state: &mut GameState,
        offer: TradeOffer,
        seats: &mut Seats,
        sink: &mut dyn EventSink,
    ) -> TxResult<TradeResolution> {
        let resolver = self.resolver();
        let offer = trade::propose(&resolver, state, offer)?;
        let target = offer.target;

        let hint = DecisionHint::TradeOffer { offer };
        let accept = self
            .ask(state, target, Some(&hint), seats, sink)
            .and_then(|commands| {
                commands.into_iter().find_map(|c| match c {
                    Command::RespondToTrade { accept } => Some(accept),
                    _ => None,
                })
            })
            .unwrap_or(false);

        let resolution = trade::respond(&resolver, state, target, accept)?;
        info!("trade between {} and {}: accepted = {}", resolution.offer.proposer, target, accept);
        emit(state, sink, Some(target), EventAction::TradeResolved, json!({ "resolution": resolution }));
        Ok(resolution)
    }
}
