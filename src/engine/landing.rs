//! Landing resolution.

use log::{debug, info};
use serde_json::{json, Value};

use super::{emit, Engine};
use crate::board::{Location, TileKind};
use crate::core::{GameState, Payee, PlayerId};
use crate::effects::CardStep;
use crate::events::{EventAction, EventSink};
use crate::rules::{movement, net_worth, rent_due, ChargeOutcome};

/// Card moves that may chain into further landings in one step.
const MAX_LANDING_HOPS: usize = 4;

impl Engine {
    /// Apply the rules of the tile a player landed on, following any card
    /// that moves them on.
    pub(super) fn resolve_landing(
        &self,
        state: &mut GameState,
        player: PlayerId,
        location: Location,
        dice_total: u8,
        sink: &mut dyn EventSink,
    ) {
        let mut next = Some(location);
        let mut hops = 0;
        while let Some(location) = next.take() {
            if hops == MAX_LANDING_HOPS || state.players[player].bankrupt {
                break;
            }
            hops += 1;
            next = self.land(state, player, location, dice_total, sink);
        }
    }

    /// Resolve one tile. Returns where a card moved the player, if the new
    /// tile still needs resolving.
    fn land(
        &self,
        state: &mut GameState,
        player: PlayerId,
        location: Location,
        dice_total: u8,
        sink: &mut dyn EventSink,
    ) -> Option<Location> {
        let tile = self.board.tile(location)?;
        debug!("{} lands on {} ({})", player, tile.name, location);

        match &tile.kind {
            TileKind::Street { .. } | TileKind::Railroad { .. } | TileKind::Utility { .. } => {
                self.land_on_ownable(state, player, location, dice_total, sink);
                None
            }
            TileKind::Tax { rule } => {
                let amount = rule.amount(net_worth(&self.board, state, player));
                let charge = self
                    .resolver()
                    .charge(state, player, amount, Payee::Bank, &tile.name);
                let details = json!({ "location": location, "amount": amount, "charge": charge });
                self.note_charge(state, player, EventAction::TaxPaid, details, &charge, sink);
                None
            }
            TileKind::Card { deck } => {
                let others: Vec<PlayerId> = state.active_players().filter(|&p| p != player).collect();
                let outcome = self.executor().draw_and_apply(state, player, *deck)?;
                emit(state, sink, Some(player), EventAction::CardDrawn, json!({ "card": outcome }));
                let bankrupted: Vec<PlayerId> =
                    others.into_iter().filter(|&p| state.players[p].bankrupt).collect();
                for payer in bankrupted {
                    let details = json!({ "creditor": null, "card": outcome.card });
                    emit(state, sink, Some(payer), EventAction::Bankruptcy, details);
                }
                if let Some(CardStep::Bankrupt { creditor }) = outcome.steps.last() {
                    let details = json!({ "creditor": creditor, "card": outcome.card });
                    emit(state, sink, Some(player), EventAction::Bankruptcy, details);
                }
                if let Some(CardStep::Owed { total }) =
                    outcome.steps.iter().find(|s| matches!(s, CardStep::Owed { .. }))
                {
                    let details = json!({ "amount": total, "obligation": state.pending_obligation });
                    emit(state, sink, Some(player), EventAction::ObligationRecorded, details);
                }
                if outcome.steps.iter().any(|s| matches!(s, CardStep::Jailed)) {
                    emit(state, sink, Some(player), EventAction::SentToJail, json!({ "reason": "card" }));
                }
                outcome.land_on.filter(|&next| next != location)
            }
            TileKind::GoToJail => {
                movement::send_to_jail(&self.board, state, player);
                info!("{} is sent to jail", player);
                emit(state, sink, Some(player), EventAction::SentToJail, json!({ "reason": "go_to_jail" }));
                None
            }
            TileKind::Go | TileKind::Jail | TileKind::FreeParking => None,
        }
    }

    fn land_on_ownable(
        &self,
        state: &mut GameState,
        player: PlayerId,
        location: Location,
        dice_total: u8,
        sink: &mut dyn EventSink,
    ) {
        match state.owner_of(location) {
            None => {
                let price = self.board.tile(location).and_then(|t| t.price()).unwrap_or(0);
                state.turn.pending_purchase = Some(location);
                let details = json!({ "location": location, "price": price });
                emit(state, sink, Some(player), EventAction::PurchaseOffered, details);
            }
            Some(owner) if owner == player => {}
            Some(owner) => {
                let rent = rent_due(&self.board, state, location, dice_total);
                if rent == 0 {
                    return;
                }
                let charge = self
                    .resolver()
                    .charge(state, player, rent, Payee::Player(owner), "rent");
                let details = json!({ "location": location, "owner": owner, "amount": rent, "charge": charge });
                self.note_charge(state, player, EventAction::RentPaid, details, &charge, sink);
            }
        }
    }

    /// Log a charge and whatever it triggered.
    pub(super) fn note_charge(
        &self,
        state: &mut GameState,
        player: PlayerId,
        action: EventAction,
        details: Value,
        charge: &ChargeOutcome,
        sink: &mut dyn EventSink,
    ) {
        emit(state, sink, Some(player), action, details);
        match charge {
            ChargeOutcome::Paid { .. } => {}
            ChargeOutcome::Pending { amount } => {
                let details = json!({ "amount": amount, "obligation": state.pending_obligation });
                emit(state, sink, Some(player), EventAction::ObligationRecorded, details);
            }
            ChargeOutcome::Bankrupt { report } => {
                emit(state, sink, Some(player), EventAction::Bankruptcy, json!({ "report": report }));
            }
        }
    }
}
