//! A deterministic heuristic player.
//!
//! `BasicBot` keeps a cash reserve and otherwise spends greedily: buys
//! whatever it lands on, develops complete color groups evenly, lifts
//! mortgages when flush. When it owes money it sells buildings before
//! mortgaging. It never proposes trades and accepts one only when it gains
//! list-price value.
//!
//! Each decision is a single command, so the engine sees the state after
//! every step.

use super::{DecisionHint, DecisionProvider, DecisionRequest};
use crate::board::{Board, ColorGroup, Location};
use crate::core::{Command, DecisionError, GameState, Payee, PlayerId, TradeOffer};
use crate::rules::owns_group;

/// Heuristic provider.
#[derive(Clone, Copy, Debug)]
pub struct BasicBot {
    reserve: i64,
}

impl Default for BasicBot {
    fn default() -> Self {
        Self { reserve: 200 }
    }
}

impl BasicBot {
    /// Bot keeping $200 in hand.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cash the bot will not spend voluntarily.
    #[must_use]
    pub fn with_reserve(mut self, reserve: i64) -> Self {
        self.reserve = reserve;
        self
    }

    fn spare(&self, money: i64, cost: i64) -> bool {
        money - cost >= self.reserve
    }

    // === Prompts ===

    fn jail(&self, request: &DecisionRequest<'_>, fine: i64, jail_cards: u8) -> Command {
        if jail_cards > 0 {
            Command::UseJailCard
        } else if self.spare(request.me().money, fine) {
            Command::PayJailFine
        } else {
            Command::RollDice
        }
    }

    fn trade(request: &DecisionRequest<'_>, offer: &TradeOffer) -> Command {
        let value = |locations: &[Location]| -> i64 {
            locations
                .iter()
                .filter_map(|&loc| request.board.tile(loc)?.price())
                .sum()
        };
        let gain = value(&offer.offer_properties) + offer.offer_money;
        let loss = value(&offer.request_properties) + offer.request_money;
        Command::RespondToTrade { accept: gain > loss }
    }

    fn bid(&self, request: &DecisionRequest<'_>, location: Location, minimum_bid: i64) -> Command {
        let price = request.board.tile(location).and_then(|t| t.price()).unwrap_or(0);
        if minimum_bid <= price && self.spare(request.me().money, minimum_bid) {
            Command::AuctionBid { amount: minimum_bid }
        } else {
            Command::PassAuction
        }
    }

    /// Pay if cash allows, otherwise take one step toward raising funds.
    fn settle(request: &DecisionRequest<'_>) -> Command {
        let state = request.state;
        let Some(obligation) = state.pending_obligation.as_ref() else {
            return Command::EndTurn;
        };
        if request.me().money >= obligation.total(state) {
            return match obligation.payee {
                Payee::Bank => Command::PayBank,
                Payee::Player(_) => Command::PayRent,
                Payee::AllPlayers => Command::PayAllPlayers,
            };
        }
        sell_step(request.board, state, request.player)
            .or_else(|| mortgage_step(request.board, state, request.player))
            .unwrap_or(Command::EndTurn)
    }

    // === Free actions ===

    fn free_action(&self, request: &DecisionRequest<'_>) -> Command {
        let state = request.state;
        let me = request.me();
        if state.current == request.player && !me.in_jail && state.turn.can_roll() {
            return Command::RollDice;
        }
        self.build_step(request)
            .or_else(|| self.unmortgage_step(request))
            .unwrap_or(Command::EndTurn)
    }

    fn build_step(&self, request: &DecisionRequest<'_>) -> Option<Command> {
        let (board, state) = (request.board, request.state);
        let money = request.me().money;

        for group in owned_groups(board, state, request.player) {
            let members = board.group_members(group);
            if !owns_group(board, state, request.player, group)
                || members
                    .iter()
                    .any(|&loc| state.property(loc).is_some_and(|p| p.mortgaged))
            {
                continue;
            }
            let Some(&target) = members
                .iter()
                .min_by_key(|&&loc| state.property(loc).map_or(5, |p| p.level()))
            else {
                continue;
            };
            let level = state.property(target).map_or(5, |p| p.level());
            let cost = board.tile(target).and_then(|t| t.house_cost()).unwrap_or(0);
            if !self.spare(money, cost) {
                continue;
            }
            if level < 4 && state.bank.houses > 0 {
                return Some(Command::build_house(target));
            }
            if level == 4 && state.bank.hotels > 0 {
                return Some(Command::build_hotel(target));
            }
        }
        None
    }

    fn unmortgage_step(&self, request: &DecisionRequest<'_>) -> Option<Command> {
        let me = request.me();
        me.properties.iter().find_map(|&loc| {
            let mortgaged = request.state.property(loc).is_some_and(|p| p.mortgaged);
            let half = request.board.tile(loc)?.mortgage_value()?;
            let cost = (half * 11 + 9) / 10;
            (mortgaged && self.spare(me.money, cost + self.reserve)).then(|| Command::unmortgage(loc))
        })
    }
}

/// Color groups in which `player` owns at least one street.
fn owned_groups(board: &Board, state: &GameState, player: PlayerId) -> Vec<ColorGroup> {
    let mut groups = Vec::new();
    for group in state.players[player]
        .properties
        .iter()
        .filter_map(|&loc| board.tile(loc)?.color_group())
    {
        if !groups.contains(&group) {
            groups.push(group);
        }
    }
    groups
}

/// Sell from the most developed street of any developed group.
fn sell_step(board: &Board, state: &GameState, player: PlayerId) -> Option<Command> {
    owned_groups(board, state, player).into_iter().find_map(|group| {
        let &target = board
            .group_members(group)
            .iter()
            .max_by_key(|&&loc| state.property(loc).map_or(0, |p| p.level()))?;
        let prop = state.property(target)?;
        if prop.hotel {
            (state.bank.houses >= 4).then(|| Command::sell_hotel(target))
        } else if prop.houses > 0 {
            Some(Command::sell_house(target))
        } else {
            None
        }
    })
}

/// Mortgage the first unmortgaged property whose group is undeveloped.
fn mortgage_step(board: &Board, state: &GameState, player: PlayerId) -> Option<Command> {
    state.players[player].properties.iter().find_map(|&loc| {
        let prop = state.property(loc)?;
        let developed = board
            .tile(loc)?
            .color_group()
            .is_some_and(|g| {
                board
                    .group_members(g)
                    .iter()
                    .any(|&m| state.property(m).is_some_and(|p| p.has_buildings()))
            });
        (!prop.mortgaged && !developed).then(|| Command::mortgage(loc))
    })
}

impl DecisionProvider for BasicBot {
    fn decide(&mut self, request: &DecisionRequest<'_>) -> Result<Vec<Command>, DecisionError> {
        let command = match request.hint {
            Some(DecisionHint::InJail { fine, jail_cards }) => self.jail(request, *fine, *jail_cards),
            Some(DecisionHint::PurchaseOffer { price, .. }) => Command::BuyProperty {
                confirm: self.spare(request.me().money, *price),
            },
            Some(DecisionHint::Obligation { .. }) => Self::settle(request),
            Some(DecisionHint::TradeOffer { offer }) => Self::trade(request, offer),
            Some(DecisionHint::AuctionBid { location, minimum_bid }) => {
                self.bid(request, *location, *minimum_bid)
            }
            None => self.free_action(request),
        };
        Ok(vec![command])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardCatalog;
    use crate::core::{GameConfig, Obligation};

    const ME: PlayerId = PlayerId::new(0);

    fn setup() -> (Board, GameState) {
        let board = Board::standard();
        let state = GameState::new(&["bot", "other"], &GameConfig::default(), &board, &CardCatalog::standard());
        (board, state)
    }

    fn give(state: &mut GameState, locations: &[Location]) {
        for &loc in locations {
            state.property_mut(loc).unwrap().owner = Some(ME);
            state.players[ME].add_property(loc);
        }
    }

    fn decide(board: &Board, state: &GameState, hint: Option<DecisionHint>) -> Command {
        let request = DecisionRequest {
            state,
            board,
            player: ME,
            hint: hint.as_ref(),
        };
        BasicBot::new().decide(&request).unwrap().remove(0)
    }

    #[test]
    fn test_rolls_first() {
        let (board, state) = setup();
        assert_eq!(decide(&board, &state, None), Command::RollDice);
    }

    #[test]
    fn test_buys_with_reserve() {
        let (board, mut state) = setup();
        let hint = DecisionHint::PurchaseOffer { location: 39, price: 400 };
        assert_eq!(decide(&board, &state, Some(hint.clone())), Command::BuyProperty { confirm: true });

        state.players[ME].money = 500;
        assert_eq!(decide(&board, &state, Some(hint)), Command::BuyProperty { confirm: false });
    }

    #[test]
    fn test_builds_evenly() {
        let (board, mut state) = setup();
        give(&mut state, &[1, 3]);
        state.turn.has_rolled = true;
        state.property_mut(1).unwrap().houses = 1;

        assert_eq!(decide(&board, &state, None), Command::build_house(3));

        state.property_mut(1).unwrap().houses = 4;
        state.property_mut(3).unwrap().houses = 4;
        assert_eq!(decide(&board, &state, None), Command::build_hotel(1));
    }

    #[test]
    fn test_ends_turn_when_nothing_to_do() {
        let (board, mut state) = setup();
        state.turn.has_rolled = true;
        assert_eq!(decide(&board, &state, None), Command::EndTurn);
    }

    #[test]
    fn test_raises_funds_before_paying() {
        let (board, mut state) = setup();
        give(&mut state, &[1, 3, 5]);
        state.property_mut(3).unwrap().houses = 1;
        state.players[ME].money = 10;
        state.pending_obligation = Some(Obligation {
            debtor: ME,
            amount: 100,
            payee: Payee::Player(PlayerId::new(1)),
            reason: "rent".into(),
        });
        let hint = Some(DecisionHint::Obligation {
            amount: 100,
            reason: "rent".into(),
        });

        assert_eq!(decide(&board, &state, hint.clone()), Command::sell_house(3));

        state.property_mut(3).unwrap().houses = 0;
        assert_eq!(decide(&board, &state, hint.clone()), Command::mortgage(1));

        state.players[ME].money = 100;
        assert_eq!(decide(&board, &state, hint), Command::PayRent);
    }

    #[test]
    fn test_jail_prefers_card() {
        let (board, mut state) = setup();
        let hint = Some(DecisionHint::InJail { fine: 50, jail_cards: 1 });
        assert_eq!(decide(&board, &state, hint), Command::UseJailCard);

        state.players[ME].money = 100;
        let hint = Some(DecisionHint::InJail { fine: 50, jail_cards: 0 });
        assert_eq!(decide(&board, &state, hint), Command::RollDice);
    }

    #[test]
    fn test_trade_and_auction() {
        let (board, state) = setup();
        let offer = TradeOffer {
            proposer: PlayerId::new(1),
            target: ME,
            offer_properties: smallvec::smallvec![39],
            offer_money: 0,
            request_properties: smallvec::smallvec![1],
            request_money: 0,
        };
        assert_eq!(
            decide(&board, &state, Some(DecisionHint::TradeOffer { offer })),
            Command::RespondToTrade { accept: true }
        );

        let hint = DecisionHint::AuctionBid { location: 1, minimum_bid: 10 };
        assert_eq!(decide(&board, &state, Some(hint)), Command::AuctionBid { amount: 10 });
        let hint = DecisionHint::AuctionBid { location: 1, minimum_bid: 70 };
        assert_eq!(decide(&board, &state, Some(hint)), Command::PassAuction);
    }
}
