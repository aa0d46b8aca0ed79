//! Negotiated trades between two players.
//!
//! A proposal is validated and parked as the pending trade; the target
//! answers with `respond_to_trade`. Acceptance re-validates (holdings may
//! have changed) and swaps the assets. Mortgage flags travel with the
//! properties. Streets in a group with buildings cannot change hands.

use log::info;
use serde::{Deserialize, Serialize};

use super::transactions::TransactionResolver;
use crate::board::Location;
use crate::core::{GameState, PlayerId, PropertyState, TradeOffer, TransactionError, TxResult};

/// Answer to a trade offer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeResolution {
    pub offer: TradeOffer,
    pub accepted: bool,
}

fn check_party(state: &GameState, player: PlayerId) -> TxResult<()> {
    match state.player(player) {
        None => Err(TransactionError::UnknownPlayer(player)),
        Some(p) if p.bankrupt => Err(TransactionError::PlayerBankrupt(player)),
        Some(_) => Ok(()),
    }
}

fn check_side(
    resolver: &TransactionResolver<'_>,
    state: &GameState,
    owner: PlayerId,
    properties: &[Location],
    money: i64,
) -> TxResult<()> {
    if money < 0 {
        return Err(TransactionError::InvalidTrade("negative amount"));
    }
    let available = state.players[owner].money;
    if available < money {
        return Err(TransactionError::InsufficientFunds {
            needed: money,
            available,
        });
    }

    let board = resolver.board();
    for (i, &loc) in properties.iter().enumerate() {
        if properties[..i].contains(&loc) {
            return Err(TransactionError::InvalidTrade("property listed twice"));
        }
        let tile = board
            .tile(loc)
            .ok_or(TransactionError::InvalidLocation(u32::from(loc)))?;
        if state.owner_of(loc) != Some(owner) {
            return Err(TransactionError::NotOwner(loc, owner));
        }
        if let Some(group) = tile.color_group() {
            let built = board
                .group_members(group)
                .iter()
                .any(|&m| state.property(m).is_some_and(PropertyState::has_buildings));
            if built {
                return Err(TransactionError::BuildingsInGroup(loc));
            }
        }
    }
    Ok(())
}

fn validate(resolver: &TransactionResolver<'_>, state: &GameState, offer: &TradeOffer) -> TxResult<()> {
    check_party(state, offer.proposer)?;
    check_party(state, offer.target)?;
    if offer.proposer == offer.target {
        return Err(TransactionError::InvalidTrade("cannot trade with yourself"));
    }
    if offer.offer_properties.is_empty()
        && offer.request_properties.is_empty()
        && offer.offer_money == 0
        && offer.request_money == 0
    {
        return Err(TransactionError::InvalidTrade("nothing offered or requested"));
    }
    check_side(resolver, state, offer.proposer, &offer.offer_properties, offer.offer_money)?;
    check_side(resolver, state, offer.target, &offer.request_properties, offer.request_money)
}

/// Validate a proposal and park it as the pending trade.
pub fn propose(
    resolver: &TransactionResolver<'_>,
    state: &mut GameState,
    offer: TradeOffer,
) -> TxResult<TradeOffer> {
    validate(resolver, state, &offer)?;

    info!(
        "{} offers {:?} + ${} to {} for {:?} + ${}",
        offer.proposer,
        offer.offer_properties,
        offer.offer_money,
        offer.target,
        offer.request_properties,
        offer.request_money
    );
    state.pending_trade = Some(offer.clone());
    Ok(offer)
}

fn hand_over(state: &mut GameState, from: PlayerId, to: PlayerId, properties: &[Location], money: i64) {
    state.players[from].money -= money;
    state.players[to].money += money;
    for &loc in properties {
        state.players[from].remove_property(loc);
        state.players[to].add_property(loc);
        if let Some(prop) = state.property_mut(loc) {
            prop.owner = Some(to);
        }
    }
}

/// Answer the pending trade addressed to `responder`.
///
/// The offer is consumed either way. An accepted offer that no longer
/// validates fails and nothing changes hands.
pub fn respond(
    resolver: &TransactionResolver<'_>,
    state: &mut GameState,
    responder: PlayerId,
    accept: bool,
) -> TxResult<TradeResolution> {
    if !state
        .pending_trade
        .as_ref()
        .is_some_and(|t| t.target == responder)
    {
        return Err(TransactionError::NoTradeOffer);
    }
    let offer = state
        .pending_trade
        .take()
        .ok_or(TransactionError::NoTradeOffer)?;

    if accept {
        validate(resolver, state, &offer)?;
        hand_over(state, offer.proposer, offer.target, &offer.offer_properties, offer.offer_money);
        hand_over(state, offer.target, offer.proposer, &offer.request_properties, offer.request_money);
    }
    info!(
        "{} {} the trade from {}",
        responder,
        if accept { "accepts" } else { "rejects" },
        offer.proposer
    );
    Ok(TradeResolution { offer, accepted: accept })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::cards::CardCatalog;
    use crate::core::{GameConfig, LocationList};
    use smallvec::smallvec;

    const A: PlayerId = PlayerId::new(0);
    const B: PlayerId = PlayerId::new(1);

    fn offer(
        target: PlayerId,
        offer_properties: LocationList,
        offer_money: i64,
        request_properties: LocationList,
        request_money: i64,
    ) -> TradeOffer {
        TradeOffer {
            proposer: A,
            target,
            offer_properties,
            offer_money,
            request_properties,
            request_money,
        }
    }

    fn setup() -> (Board, GameConfig, GameState) {
        let board = Board::standard();
        let config = GameConfig::default();
        let mut state = GameState::new(&["a", "b"], &config, &board, &CardCatalog::standard());
        for (player, loc) in [(A, 1), (B, 3), (B, 5)] {
            state.property_mut(loc).unwrap().owner = Some(player);
            state.players[player].add_property(loc);
        }
        (board, config, state)
    }

    #[test]
    fn test_accepted_trade_swaps_assets() {
        let (board, config, mut state) = setup();
        let resolver = TransactionResolver::new(&board, &config);
        state.property_mut(5).unwrap().mortgaged = true;

        propose(&resolver, &mut state, offer(B, smallvec![1], 100, smallvec![3, 5], 0)).unwrap();
        assert!(state.pending_trade.is_some());

        let resolution = respond(&resolver, &mut state, B, true).unwrap();
        assert!(resolution.accepted);
        assert!(state.pending_trade.is_none());

        assert_eq!(state.players[A].properties, vec![3, 5]);
        assert_eq!(state.players[B].properties, vec![1]);
        assert_eq!(state.players[A].money, 1400);
        assert_eq!(state.players[B].money, 1600);
        assert!(state.property(5).unwrap().mortgaged);
        assert_eq!(state.owner_of(5), Some(A));
    }

    #[test]
    fn test_rejected_trade_changes_nothing() {
        let (board, config, mut state) = setup();
        let resolver = TransactionResolver::new(&board, &config);

        propose(&resolver, &mut state, offer(B, smallvec![1], 0, smallvec![], 50)).unwrap();
        let resolution = respond(&resolver, &mut state, B, false).unwrap();

        assert!(!resolution.accepted);
        assert_eq!(state.owner_of(1), Some(A));
        assert_eq!(state.players[B].money, 1500);
    }

    #[test]
    fn test_only_target_can_respond() {
        let (board, config, mut state) = setup();
        let resolver = TransactionResolver::new(&board, &config);

        propose(&resolver, &mut state, offer(B, smallvec![1], 0, smallvec![], 50)).unwrap();
        assert_eq!(respond(&resolver, &mut state, A, true), Err(TransactionError::NoTradeOffer));
        assert!(state.pending_trade.is_some());
    }

    #[test]
    fn test_invalid_proposals() {
        let (board, config, mut state) = setup();
        let resolver = TransactionResolver::new(&board, &config);

        assert_eq!(
            propose(&resolver, &mut state, offer(PlayerId::new(7), smallvec![1], 0, smallvec![], 0)),
            Err(TransactionError::UnknownPlayer(PlayerId::new(7)))
        );
        assert_eq!(
            propose(&resolver, &mut state, offer(B, smallvec![3], 0, smallvec![], 0)),
            Err(TransactionError::NotOwner(3, A))
        );
        assert!(propose(&resolver, &mut state, offer(A, smallvec![1], 0, smallvec![], 0)).is_err());
        assert!(propose(&resolver, &mut state, offer(B, smallvec![], 0, smallvec![], 0)).is_err());
        assert!(propose(&resolver, &mut state, offer(B, smallvec![], 5000, smallvec![], 0)).is_err());
        assert!(state.pending_trade.is_none());
    }

    #[test]
    fn test_buildings_block_trade() {
        let (board, config, mut state) = setup();
        let resolver = TransactionResolver::new(&board, &config);
        state.property_mut(3).unwrap().owner = Some(A);
        state.players[B].remove_property(3);
        state.players[A].add_property(3);
        state.property_mut(3).unwrap().houses = 1;

        assert_eq!(
            propose(&resolver, &mut state, offer(B, smallvec![1], 0, smallvec![5], 0)),
            Err(TransactionError::BuildingsInGroup(1))
        );
    }
}
