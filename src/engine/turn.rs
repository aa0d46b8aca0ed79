//! One turn, phase by phase.

use log::{debug, info, warn};
use serde_json::json;

use super::{emit, Engine, TurnEnd, TurnReport};
use crate::core::{
    Command, DiceRoll, GameState, Payee, PlayerId, TransactionError, TurnPhase, TurnState, TxResult,
};
use crate::decision::{DecisionHint, Seats};
use crate::events::{EventAction, EventSink};
use crate::rules::{evaluate, movement};

/// How the jail check let the player go.
enum JailExit {
    /// Paid or used a card before rolling; the turn proceeds normally.
    Released,
    /// Rolled doubles; move by that roll without a re-roll.
    Doubles(DiceRoll),
    /// Still jailed.
    Stay,
    /// Fine forced after the last jail turn.
    Forced,
}

impl Engine {
    /// Play the current seat's turn and advance to the next seat.
    pub fn play_turn(
        &self,
        state: &mut GameState,
        seats: &mut Seats,
        sink: &mut dyn EventSink,
    ) -> TurnReport {
        let player = state.current;
        if let Some(outcome) = state.outcome {
            return TurnReport {
                turn: state.turn_number,
                player,
                end: TurnEnd::GameOver,
                decisions: 0,
                outcome: Some(outcome),
            };
        }

        if state.turn_number == 0 && state.event_sequence == 0 {
            let names: Vec<&str> = state.players.values().map(|p| p.name.as_str()).collect();
            let details = json!({ "players": names, "seed": self.config.seed });
            emit(state, sink, None, EventAction::GameStarted, details);
        }

        state.turn_number += 1;
        state.turn = TurnState::default();

        let end = if state.players[player].bankrupt {
            emit(state, sink, Some(player), EventAction::TurnSkipped, json!({}));
            TurnEnd::Skipped
        } else {
            let p = &state.players[player];
            let details = json!({ "position": p.position, "money": p.money, "in_jail": p.in_jail });
            debug!("turn {}: {} at {} with ${}", state.turn_number, player, p.position, p.money);
            emit(state, sink, Some(player), EventAction::TurnStarted, details);
            self.take_turn(state, player, seats, sink)
        };

        self.finish_turn(state, player, end, seats, sink)
    }

    fn take_turn(
        &self,
        state: &mut GameState,
        player: PlayerId,
        seats: &mut Seats,
        sink: &mut dyn EventSink,
    ) -> TurnEnd {
        state.turn.phase = TurnPhase::JailCheck;
        let mut jail_roll = None;
        if state.players[player].in_jail {
            match self.jail_check(state, player, seats, sink) {
                JailExit::Released => {}
                JailExit::Doubles(roll) => jail_roll = Some(roll),
                JailExit::Stay => return TurnEnd::StayedInJail,
                JailExit::Forced if state.players[player].bankrupt => return TurnEnd::Bankrupt,
                JailExit::Forced => return TurnEnd::FineForced,
            }
        }

        state.turn.phase = TurnPhase::AwaitingRoll;
        match jail_roll {
            Some(roll) => self.move_and_land(state, player, roll, sink),
            None => {
                if let Err(err) = self.roll(state, player, sink) {
                    warn!("{} cannot open the turn with a roll: {}", player, err);
                }
            }
        }
        if state.players[player].bankrupt {
            return TurnEnd::Bankrupt;
        }

        self.action_loop(state, player, seats, sink)
    }

    // === JailCheck ===

    fn jail_check(
        &self,
        state: &mut GameState,
        player: PlayerId,
        seats: &mut Seats,
        sink: &mut dyn EventSink,
    ) -> JailExit {
        let fine = self.config.jail_fine;
        let (money, jail_cards) = {
            let p = &state.players[player];
            (p.money, p.jail_cards)
        };

        if money >= fine || jail_cards > 0 {
            let hint = DecisionHint::InJail { fine, jail_cards };
            let release = self
                .ask(state, player, Some(&hint), seats, sink)
                .and_then(|commands| {
                    commands
                        .into_iter()
                        .find(|c| matches!(c, Command::PayJailFine | Command::UseJailCard))
                });
            if let Some(command) = release {
                if self.execute(state, player, &command, seats, sink).success {
                    let details = json!({ "via": command.name() });
                    emit(state, sink, Some(player), EventAction::JailReleased, details);
                    return JailExit::Released;
                }
            }
        }

        state.players[player].jail_turns += 1;
        let jail_turns = state.players[player].jail_turns;

        if jail_turns >= self.config.max_jail_turns {
            let charge = self.resolver().pay_or_bankrupt(state, player, fine, Payee::Bank);
            if charge.is_bankrupt() {
                emit(state, sink, Some(player), EventAction::Bankruptcy, json!({ "charge": charge }));
            } else {
                movement::release_from_jail(state, player);
                let details = json!({ "via": "forced_fine", "fine": fine });
                emit(state, sink, Some(player), EventAction::JailReleased, details);
            }
            return JailExit::Forced;
        }

        let roll = state.rng.roll_dice();
        state.turn.has_rolled = true;
        state.turn.last_roll = Some(roll);
        debug!("{} rolls {} in jail", player, roll);
        let details = json!({ "roll": roll, "total": roll.total(), "doubles": roll.is_doubles(), "in_jail": true });
        emit(state, sink, Some(player), EventAction::DiceRolled, details);

        if roll.is_doubles() {
            movement::release_from_jail(state, player);
            state.turn.left_jail_on_doubles = true;
            emit(state, sink, Some(player), EventAction::JailReleased, json!({ "via": "doubles" }));
            JailExit::Doubles(roll)
        } else {
            emit(state, sink, Some(player), EventAction::JailStay, json!({ "jail_turns": jail_turns }));
            JailExit::Stay
        }
    }

    // === AwaitingRoll / Moving ===

    /// Roll and move. Three doubles in one turn send the player to jail
    /// instead of moving.
    pub(super) fn roll(
        &self,
        state: &mut GameState,
        player: PlayerId,
        sink: &mut dyn EventSink,
    ) -> TxResult<DiceRoll> {
        if player != state.current {
            return Err(TransactionError::RollNotAllowed("not this player's turn"));
        }
        if state.players[player].in_jail {
            return Err(TransactionError::RollNotAllowed("player is in jail"));
        }
        if !state.turn.can_roll() {
            return Err(TransactionError::RollNotAllowed("no roll left this turn"));
        }
        if state.turn.pending_purchase.is_some() {
            return Err(TransactionError::RollNotAllowed("decide on the purchase offer first"));
        }
        if let Some(obligation) = state.pending_obligation.as_ref().filter(|o| o.debtor == player) {
            return Err(TransactionError::ObligationOutstanding(obligation.total(state)));
        }

        let roll = state.rng.roll_dice();
        state.turn.has_rolled = true;
        state.turn.last_roll = Some(roll);
        if roll.is_doubles() {
            state.turn.doubles_count += 1;
        }
        debug!("{} rolls {}", player, roll);
        let details = json!({
            "roll": roll,
            "total": roll.total(),
            "doubles": roll.is_doubles(),
            "doubles_count": state.turn.doubles_count,
        });
        emit(state, sink, Some(player), EventAction::DiceRolled, details);

        if state.turn.doubles_count >= 3 {
            movement::send_to_jail(&self.board, state, player);
            info!("{} rolled three doubles and goes to jail", player);
            emit(state, sink, Some(player), EventAction::SentToJail, json!({ "reason": "three_doubles" }));
            state.turn.phase = TurnPhase::AwaitingAction;
            return Ok(roll);
        }

        self.move_and_land(state, player, roll, sink);
        Ok(roll)
    }

    fn move_and_land(&self, state: &mut GameState, player: PlayerId, roll: DiceRoll, sink: &mut dyn EventSink) {
        state.turn.phase = TurnPhase::Moving;
        let moved = movement::advance(&self.config, state, player, roll.total());
        emit(state, sink, Some(player), EventAction::Moved, json!({ "movement": moved }));

        state.turn.phase = TurnPhase::ResolvingLanding;
        self.resolve_landing(state, player, moved.to, roll.total(), sink);
        state.turn.phase = TurnPhase::AwaitingAction;
    }

    // === AwaitingAction ===

    fn hint_for(&self, state: &GameState, player: PlayerId) -> Option<DecisionHint> {
        if let Some(obligation) = state.pending_obligation.as_ref().filter(|o| o.debtor == player) {
            return Some(DecisionHint::Obligation {
                amount: obligation.total(state),
                reason: obligation.reason.clone(),
            });
        }
        let location = state.turn.pending_purchase?;
        let price = self.board.tile(location).and_then(|t| t.price()).unwrap_or(0);
        Some(DecisionHint::PurchaseOffer { location, price })
    }

    fn action_loop(
        &self,
        state: &mut GameState,
        player: PlayerId,
        seats: &mut Seats,
        sink: &mut dyn EventSink,
    ) -> TurnEnd {
        state.turn.phase = TurnPhase::AwaitingAction;
        loop {
            if state.players[player].bankrupt {
                return TurnEnd::Bankrupt;
            }
            if state.turn.decisions >= self.config.max_decisions_per_turn {
                warn!("{} hit the decision cap; ending the turn", player);
                let details = json!({ "reason": "decision_cap", "decisions": state.turn.decisions });
                emit(state, sink, Some(player), EventAction::TurnForcedEnd, details);
                return TurnEnd::DecisionCap;
            }
            if state.turn.consecutive_failures >= self.config.max_consecutive_failures {
                warn!("{} made {} decisions without intent; ending the turn", player, state.turn.consecutive_failures);
                let details = json!({
                    "reason": "consecutive_failures",
                    "failures": state.turn.consecutive_failures,
                });
                emit(state, sink, Some(player), EventAction::TurnForcedEnd, details);
                return TurnEnd::FailureCap;
            }

            let hint = self.hint_for(state, player);
            let Some(commands) = self.ask(state, player, hint.as_ref(), seats, sink) else {
                return TurnEnd::ProviderFallback;
            };

            if !commands.iter().any(Command::is_actionable) {
                state.turn.consecutive_failures += 1;
                state.stats[player].failed_decisions += 1;
                let names: Vec<&str> = commands.iter().map(Command::name).collect();
                let details = json!({ "commands": names, "consecutive": state.turn.consecutive_failures });
                emit(state, sink, Some(player), EventAction::DecisionFailed, details);
                continue;
            }
            state.turn.consecutive_failures = 0;

            for command in &commands {
                self.execute(state, player, command, seats, sink);
                if matches!(command, Command::EndTurn) {
                    return TurnEnd::Ended;
                }
                if state.players[player].bankrupt {
                    return TurnEnd::Bankrupt;
                }
            }
        }
    }

    // === TurnEnded ===

    fn finish_turn(
        &self,
        state: &mut GameState,
        player: PlayerId,
        end: TurnEnd,
        seats: &mut Seats,
        sink: &mut dyn EventSink,
    ) -> TurnReport {
        state.turn.phase = TurnPhase::TurnEnded;

        if let Some(location) = state.turn.pending_purchase.take() {
            if state.players[player].is_active() {
                self.auction(state, player, location, seats, sink);
            }
        }

        if let Some(obligation) = state.pending_obligation.clone() {
            if let Some(charge) = self.resolver().force_settle(state) {
                warn!("{} did not settle ${} ({}); forcing it", obligation.debtor, obligation.amount, obligation.reason);
                let bankrupt = charge.is_bankrupt();
                let details = json!({ "obligation": obligation, "charge": charge });
                emit(state, sink, Some(obligation.debtor), EventAction::ObligationForced, details);
                if bankrupt {
                    emit(state, sink, Some(obligation.debtor), EventAction::Bankruptcy, json!({ "charge": charge }));
                }
            }
        }
        state.pending_trade = None;

        let p = &state.players[player];
        let details = json!({ "end": end, "money": p.money, "position": p.position });
        emit(state, sink, Some(player), EventAction::TurnEnded, details);

        let outcome = evaluate(&self.board, state, self.config.max_turns);
        match outcome {
            Some(outcome) => {
                state.outcome = Some(outcome);
                info!(
                    "game over after {} turns: {:?} ({:?})",
                    outcome.turns, outcome.winner, outcome.reason
                );
                emit(state, sink, outcome.winner, EventAction::GameOver, json!({ "outcome": outcome }));
            }
            None => {
                if let Some(next) = state.next_active_after(player) {
                    state.current = next;
                }
            }
        }

        TurnReport {
            turn: state.turn_number,
            player,
            end,
            decisions: state.turn.decisions,
            outcome,
        }
    }
}
