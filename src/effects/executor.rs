//! Card effect execution.
//!
//! A `CardEffect` is a bag of optional attributes. The executor applies the
//! ones present in a fixed order, so a card carrying several attributes
//! fires all of them:
//!
//! 1. relative move
//! 2. advance to nearest railroad/utility (with owner settlement)
//! 3. advance to a fixed location
//! 4. flat amount
//! 5. jail token
//! 6. go to jail
//! 7. collect from each player
//! 8. pay each player
//! 9. repairs
//!
//! Execution stops as soon as the player goes bankrupt. Money that cannot
//! be paid from cash bankrupts the payer to the bank, except the
//! nearest-tile settlement, whose creditor is the tile's owner. Paying each
//! player is the one step that leaves room to raise funds: a shortfall the
//! player's holdings could cover becomes a pending obligation settled with
//! `pay_all_players`.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::{Location, TileCategory};
use crate::cards::{Card, CardCatalog, CardId, DeckKind, NearestTarget};
use crate::core::{GameState, Payee, PlayerId};
use crate::rules::bankruptcy::declare_bankrupt;
use crate::rules::movement::{self, Movement};
use crate::rules::rent::rent_due;
use crate::rules::{ChargeOutcome, TransactionResolver};

/// One applied attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum CardStep {
    Moved { movement: Movement },
    /// Special rent paid to the owner of the nearest railroad/utility.
    OwnerPaid { owner: PlayerId, amount: i64 },
    Money { amount: i64 },
    JailCard,
    Jailed,
    Collected { total: i64 },
    PaidEach { total: i64 },
    /// Paying each player left an obligation of `total`.
    Owed { total: i64 },
    Repairs { total: i64 },
    Bankrupt { creditor: Option<PlayerId> },
}

/// Result of executing one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardOutcome {
    pub card: CardId,
    pub deck: DeckKind,
    pub text: String,
    pub steps: Vec<CardStep>,
    /// Tile whose landing rules still apply (purchase offer or rent).
    pub land_on: Option<Location>,
}

impl CardOutcome {
    /// Whether the card bankrupted the player.
    #[must_use]
    pub fn bankrupted(&self) -> bool {
        self.steps.iter().any(|s| matches!(s, CardStep::Bankrupt { .. }))
    }
}

/// Applies card effects through the transaction resolver.
pub struct CardEffectExecutor<'a> {
    resolver: TransactionResolver<'a>,
    catalog: &'a CardCatalog,
}

impl<'a> CardEffectExecutor<'a> {
    /// Create an executor.
    #[must_use]
    pub fn new(resolver: TransactionResolver<'a>, catalog: &'a CardCatalog) -> Self {
        Self { resolver, catalog }
    }

    /// Draw the next card of `deck` and apply it to `player`.
    ///
    /// Returns `None` if the deck is empty or the card is unknown.
    pub fn draw_and_apply(
        &self,
        state: &mut GameState,
        player: PlayerId,
        deck: DeckKind,
    ) -> Option<CardOutcome> {
        let id = state.deck_mut(deck).draw()?;
        let card = self.catalog.get(id)?;
        debug!("{} draws {} card {}: {}", player, deck, id, card.text);
        Some(self.apply(state, player, card))
    }

    /// Apply a card's effect to `player`.
    pub fn apply(&self, state: &mut GameState, player: PlayerId, card: &Card) -> CardOutcome {
        let mut outcome = CardOutcome {
            card: card.id,
            deck: card.deck,
            text: card.text.clone(),
            steps: Vec::new(),
            land_on: None,
        };
        let effect = &card.effect;
        let config = self.resolver.config();
        let board = self.resolver.board();

        // 1. Relative move.
        if let Some(steps) = effect.move_relative {
            let movement = if steps >= 0 {
                movement::advance(config, state, player, steps.unsigned_abs())
            } else {
                movement::retreat(config, state, player, steps.unsigned_abs())
            };
            outcome.land_on = Some(movement.to);
            outcome.steps.push(CardStep::Moved { movement });
        }

        // 2. Nearest railroad or utility.
        if let Some(target) = effect.advance_to_nearest {
            let category = match target {
                NearestTarget::Railroad { .. } => TileCategory::Railroad,
                NearestTarget::Utility { .. } => TileCategory::Utility,
            };
            let from = state.players[player].position;
            if let Some(nearest) = board.nearest_forward(from, category) {
                let movement = movement::advance_to(config, state, player, nearest, true);
                outcome.steps.push(CardStep::Moved { movement });
                let land_on = self.settle_nearest(state, player, nearest, target, &mut outcome);
                outcome.land_on = land_on;
                if outcome.bankrupted() {
                    return outcome;
                }
            }
        }

        // 3. Absolute move.
        if let Some(target) = effect.advance_to {
            let movement = movement::advance_to(config, state, player, target, effect.collect_go_bonus);
            outcome.land_on = Some(target);
            outcome.steps.push(CardStep::Moved { movement });
        }

        // 4. Flat amount.
        if effect.amount > 0 {
            state.players[player].money += effect.amount;
            outcome.steps.push(CardStep::Money { amount: effect.amount });
        } else if effect.amount < 0 {
            let charge = self.resolver.pay_or_bankrupt(state, player, -effect.amount, Payee::Bank);
            if Self::record_charge(&mut outcome, charge, CardStep::Money { amount: effect.amount }) {
                return outcome;
            }
        }

        // 5. Jail token.
        if effect.jail_card {
            state.players[player].jail_cards += 1;
            outcome.steps.push(CardStep::JailCard);
        }

        // 6. Go to jail.
        if effect.go_to_jail {
            movement::send_to_jail(board, state, player);
            outcome.land_on = None;
            outcome.steps.push(CardStep::Jailed);
        }

        // 7. Collect from each other player.
        if effect.collect_from_each > 0 {
            let total = self.collect_from_each(state, player, effect.collect_from_each);
            outcome.steps.push(CardStep::Collected { total });
        }

        // 8. Pay each other player.
        if effect.pay_each > 0 {
            let charge = self
                .resolver
                .charge(state, player, effect.pay_each, Payee::AllPlayers, "pay each player");
            let step = match &charge {
                ChargeOutcome::Pending { amount } => CardStep::Owed { total: *amount },
                ChargeOutcome::Paid { amount } => CardStep::PaidEach { total: *amount },
                ChargeOutcome::Bankrupt { .. } => CardStep::PaidEach { total: 0 },
            };
            if Self::record_charge(&mut outcome, charge, step) {
                return outcome;
            }
        }

        // 9. Repairs.
        if let Some(repairs) = effect.repairs {
            let (houses, hotels) = state.buildings_of(player);
            let total = i64::from(houses) * repairs.per_house + i64::from(hotels) * repairs.per_hotel;
            if total > 0 {
                let charge = self.resolver.pay_or_bankrupt(state, player, total, Payee::Bank);
                if Self::record_charge(&mut outcome, charge, CardStep::Repairs { total }) {
                    return outcome;
                }
            } else {
                outcome.steps.push(CardStep::Repairs { total: 0 });
            }
        }

        outcome
    }

    /// Record a charge. Returns true if it bankrupted the player.
    fn record_charge(outcome: &mut CardOutcome, charge: ChargeOutcome, paid: CardStep) -> bool {
        match charge {
            ChargeOutcome::Bankrupt { report } => {
                outcome.land_on = None;
                outcome.steps.push(CardStep::Bankrupt {
                    creditor: report.creditor,
                });
                true
            }
            ChargeOutcome::Paid { .. } | ChargeOutcome::Pending { .. } => {
                outcome.steps.push(paid);
                false
            }
        }
    }

    /// Pay the owner of the nearest tile its special rent. Returns the
    /// tile when it is unowned and so still open for purchase.
    fn settle_nearest(
        &self,
        state: &mut GameState,
        player: PlayerId,
        location: Location,
        target: NearestTarget,
        outcome: &mut CardOutcome,
    ) -> Option<Location> {
        let owner = match state.owner_of(location) {
            None => return Some(location),
            Some(owner) if owner == player => return None,
            Some(owner) => owner,
        };

        let amount = match target {
            NearestTarget::Railroad { rent_multiplier } => {
                rent_due(self.resolver.board(), state, location, 0) * rent_multiplier
            }
            NearestTarget::Utility { dice_multiplier } => {
                if state.property(location).is_some_and(|p| p.mortgaged) {
                    0
                } else {
                    let roll = state.rng.roll_dice();
                    debug!("{} throws {} for the utility", player, roll);
                    i64::from(roll.total()) * dice_multiplier
                }
            }
        };
        if amount == 0 {
            return None;
        }

        let charge = self
            .resolver
            .pay_or_bankrupt(state, player, amount, Payee::Player(owner));
        Self::record_charge(outcome, charge, CardStep::OwnerPaid { owner, amount });
        None
    }

    /// Every other active player pays `amount`; those who cannot go
    /// bankrupt to the bank. Returns the total collected.
    fn collect_from_each(&self, state: &mut GameState, collector: PlayerId, amount: i64) -> i64 {
        let payers: Vec<PlayerId> = state.active_players().filter(|&p| p != collector).collect();
        let mut total = 0;
        for payer in payers {
            if state.players[payer].money >= amount {
                state.players[payer].money -= amount;
                state.players[collector].money += amount;
                total += amount;
            } else {
                declare_bankrupt(self.resolver.config(), state, payer, None);
            }
        }
        total
    }
}
