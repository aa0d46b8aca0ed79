//! Command dispatch.
//!
//! Every command maps to one resolver or query operation. Failures become
//! a failed `CommandOutcome` and leave the state untouched.

use log::{debug, info};
use serde_json::{json, Value};

use super::{emit, Engine};
use crate::board::Location;
use crate::core::{
    Command, CommandOutcome, DiceRoll, GameState, PlayerId, TradeOffer, TransactionError, TxResult,
};
use crate::decision::Seats;
use crate::events::{EventAction, EventRecord, EventSink};
use crate::rules::{auction, rent_due, trade, Settlement};

fn required(location: Option<Location>) -> TxResult<Location> {
    location.ok_or(TransactionError::MissingArgument("location"))
}

impl Engine {
    /// Execute one command for `player` and log it.
    ///
    /// Mutating commands carry before/after snapshots when the sink asks
    /// for them. Queries never change the state.
    pub fn execute(
        &self,
        state: &mut GameState,
        player: PlayerId,
        command: &Command,
        seats: &mut Seats,
        sink: &mut dyn EventSink,
    ) -> CommandOutcome {
        let before = (sink.wants_snapshots() && !command.is_query()).then(|| state.snapshot());

        let outcome = match self.dispatch(state, player, command, seats, sink) {
            Ok(payload) => CommandOutcome::ok(payload),
            Err(err) => CommandOutcome::fail(err),
        };

        if let Some(stats) = state.stats.get_mut(player) {
            if outcome.success {
                stats.commands_succeeded += 1;
            } else {
                stats.commands_failed += 1;
            }
        }
        debug!("{} {} -> {:?}", player, command.name(), outcome.error);

        let details = json!({
            "command": command,
            "success": outcome.success,
            "error": outcome.error,
            "payload": outcome.payload,
        });
        let mut record = EventRecord::new(
            state.event_sequence,
            state.turn_number,
            Some(player),
            EventAction::Command,
            details,
        );
        if let Some(before) = before {
            record = record.with_snapshots(before, state.snapshot());
        }
        state.event_sequence += 1;
        sink.record(record);

        outcome
    }

    fn check_player(&self, state: &GameState, player: PlayerId, command: &Command) -> TxResult<()> {
        if state.is_over() {
            return Err(TransactionError::GameOver);
        }
        match state.player(player) {
            None => return Err(TransactionError::UnknownPlayer(player)),
            Some(p) if p.bankrupt => return Err(TransactionError::PlayerBankrupt(player)),
            Some(_) => {}
        }
        if self.config.enforce_pending_obligation && !command.is_settlement() && !command.is_query() {
            if let Some(obligation) = state.pending_obligation.as_ref().filter(|o| o.debtor == player) {
                return Err(TransactionError::ObligationOutstanding(obligation.total(state)));
            }
        }
        Ok(())
    }

    fn dispatch(
        &self,
        state: &mut GameState,
        player: PlayerId,
        command: &Command,
        seats: &mut Seats,
        sink: &mut dyn EventSink,
    ) -> TxResult<Value> {
        self.check_player(state, player, command)?;
        let resolver = self.resolver();

        match command {
            Command::RollDice => {
                let roll = self.roll(state, player, sink)?;
                let p = &state.players[player];
                Ok(json!({ "roll": roll, "position": p.position, "in_jail": p.in_jail }))
            }
            Command::BuyProperty { confirm } => {
                let location = state
                    .turn
                    .pending_purchase
                    .filter(|_| player == state.current)
                    .ok_or(TransactionError::NoPurchaseOffer)?;
                if *confirm {
                    let price = resolver.buy(state, player, location)?;
                    state.turn.pending_purchase = None;
                    Ok(json!({ "location": location, "price": price }))
                } else {
                    state.turn.pending_purchase = None;
                    info!("{} declines {}", player, location);
                    let result = self.auction(state, player, location, seats, sink);
                    Ok(json!({ "declined": location, "auction": result }))
                }
            }
            Command::AuctionBid { amount } => {
                auction::place_bid(&resolver, state, player, *amount)?;
                Ok(json!({ "bid": amount }))
            }
            Command::PassAuction => {
                auction::pass(state, player)?;
                Ok(json!({ "passed": true }))
            }
            Command::BuildHouse { location } => {
                let location = required(*location)?;
                let cost = resolver.build_house(state, player, location)?;
                Ok(json!({ "location": location, "cost": cost, "property": state.property(location) }))
            }
            Command::BuildHotel { location } => {
                let location = required(*location)?;
                let cost = resolver.build_hotel(state, player, location)?;
                Ok(json!({ "location": location, "cost": cost, "property": state.property(location) }))
            }
            Command::SellHouse { location } => {
                let location = required(*location)?;
                let proceeds = resolver.sell_house(state, player, location)?;
                Ok(json!({ "location": location, "proceeds": proceeds, "property": state.property(location) }))
            }
            Command::SellHotel { location } => {
                let location = required(*location)?;
                let proceeds = resolver.sell_hotel(state, player, location)?;
                Ok(json!({ "location": location, "proceeds": proceeds, "property": state.property(location) }))
            }
            Command::MortgageProperty { location } => {
                let location = required(*location)?;
                let proceeds = resolver.mortgage(state, player, location)?;
                Ok(json!({ "location": location, "proceeds": proceeds }))
            }
            Command::UnmortgageProperty { location } => {
                let location = required(*location)?;
                let cost = resolver.unmortgage(state, player, location)?;
                Ok(json!({ "location": location, "cost": cost }))
            }
            Command::PayJailFine => {
                let fine = resolver.pay_jail_fine(state, player)?;
                Ok(json!({ "paid": fine }))
            }
            Command::UseJailCard => {
                resolver.use_jail_card(state, player)?;
                Ok(json!({ "jail_cards": state.players[player].jail_cards }))
            }
            Command::TradeProperty {
                target,
                offer_properties,
                offer_money,
                request_properties,
                request_money,
            } => {
                let offer = TradeOffer {
                    proposer: player,
                    target: target.ok_or(TransactionError::MissingArgument("target"))?,
                    offer_properties: offer_properties.clone(),
                    offer_money: *offer_money,
                    request_properties: request_properties.clone(),
                    request_money: *request_money,
                };
                let resolution = self.negotiate_trade(state, offer, seats, sink)?;
                Ok(json!({ "resolution": resolution }))
            }
            Command::RespondToTrade { accept } => {
                let resolution = trade::respond(&resolver, state, player, *accept)?;
                emit(state, sink, Some(player), EventAction::TradeResolved, json!({ "resolution": resolution }));
                Ok(json!({ "resolution": resolution }))
            }
            Command::PayRent => self.settle(state, player, Settlement::Rent),
            Command::PayBank => self.settle(state, player, Settlement::Bank),
            Command::PayAllPlayers => self.settle(state, player, Settlement::AllPlayers),
            Command::GetGameState => Ok(serde_json::to_value(state.snapshot()).unwrap_or(Value::Null)),
            Command::GetPropertyInfo { location } => self.property_info(state, required(*location)?),
            Command::EndTurn => Ok(json!({ "ended": true })),
            Command::Unrecognized { name } => Err(TransactionError::UnknownCommand(name.clone())),
        }
    }

    fn settle(&self, state: &mut GameState, player: PlayerId, via: Settlement) -> TxResult<Value> {
        let paid = self.resolver().settle(state, player, via)?;
        Ok(json!({ "paid": paid, "money": state.players[player].money }))
    }

    fn property_info(&self, state: &GameState, location: Location) -> TxResult<Value> {
        let tile = self
            .board
            .tile(location)
            .ok_or(TransactionError::InvalidLocation(u32::from(location)))?;
        let dice_total = state.turn.last_roll.map_or(7, DiceRoll::total);
        Ok(json!({
            "tile": tile,
            "property": state.property(location),
            "rent": rent_due(&self.board, state, location, dice_total),
            "unmortgage_cost": self.resolver().unmortgage_cost(location),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::decision::ScriptedProvider;
    use crate::events::MemoryLog;

    const A: PlayerId = PlayerId::new(0);
    const B: PlayerId = PlayerId::new(1);

    fn setup() -> (Engine, GameState, Seats) {
        let engine = Engine::new(GameConfig::default());
        let state = engine.new_game(&["a", "b"]);
        let seats = Seats::new().with(ScriptedProvider::new()).with(ScriptedProvider::new());
        (engine, state, seats)
    }

    #[test]
    fn test_queries_do_not_mutate() {
        let (engine, mut state, mut seats) = setup();
        let mut log = MemoryLog::new().with_snapshots();
        let before = state.snapshot();

        let outcome = engine.execute(&mut state, A, &Command::GetGameState, &mut seats, &mut log);
        assert!(outcome.success);
        assert_eq!(outcome.payload["players"][0]["money"], 1500);

        let outcome = engine.execute(&mut state, A, &Command::property_info(39), &mut seats, &mut log);
        assert!(outcome.success);
        assert_eq!(outcome.payload["tile"]["name"], "Boardwalk");
        assert_eq!(outcome.payload["rent"], 0);

        assert_eq!(state.snapshot(), before);
        assert!(log.iter().all(|r| r.state_before.is_none()));
    }

    #[test]
    fn test_mutating_command_carries_snapshots() {
        let (engine, mut state, mut seats) = setup();
        let mut log = MemoryLog::new().with_snapshots();
        state.property_mut(1).unwrap().owner = Some(A);
        state.players[A].add_property(1);

        let outcome = engine.execute(&mut state, A, &Command::mortgage(1), &mut seats, &mut log);
        assert!(outcome.success);
        assert_eq!(outcome.payload["proceeds"], 30);

        let record = log.last().unwrap();
        assert_eq!(record.action, EventAction::Command);
        assert_eq!(record.state_before.as_ref().unwrap().players[0].money, 1500);
        assert_eq!(record.state_after.as_ref().unwrap().players[0].money, 1530);
        assert_eq!(state.stats[A].commands_succeeded, 1);
    }

    #[test]
    fn test_failure_leaves_state_untouched() {
        let (engine, mut state, mut seats) = setup();
        let mut log = MemoryLog::new();
        let before = state.snapshot();

        let outcome = engine.execute(&mut state, A, &Command::build_house(1), &mut seats, &mut log);
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("tile 1 is not owned by Player 0"));

        let outcome = engine.execute(&mut state, A, &Command::BuildHouse { location: None }, &mut seats, &mut log);
        assert_eq!(outcome.error.as_deref(), Some("missing argument `location`"));

        let outcome = engine.execute(
            &mut state,
            A,
            &Command::Unrecognized { name: "fly".into() },
            &mut seats,
            &mut log,
        );
        assert_eq!(outcome.error.as_deref(), Some("unknown command `fly`"));

        assert_eq!(state.snapshot(), before);
        assert_eq!(state.stats[A].commands_failed, 3);
    }

    #[test]
    fn test_enforced_obligation_blocks_other_commands() {
        let engine = Engine::new(GameConfig::default().enforcing_pending_obligation());
        let mut state = engine.new_game(&["a", "b"]);
        let mut seats = Seats::new();
        let mut log = MemoryLog::new();
        state.pending_obligation = Some(crate::core::Obligation {
            debtor: A,
            amount: 100,
            payee: crate::core::Payee::Player(B),
            reason: "rent".into(),
        });

        let outcome = engine.execute(&mut state, A, &Command::RollDice, &mut seats, &mut log);
        assert_eq!(outcome.error.as_deref(), Some("a payment of 100 must be settled first"));

        let outcome = engine.execute(&mut state, A, &Command::PayRent, &mut seats, &mut log);
        assert!(outcome.success);
        assert_eq!(state.players[A].money, 1400);
        assert_eq!(state.players[B].money, 1600);
        assert!(state.pending_obligation.is_none());
    }

    #[test]
    fn test_roll_rejected_for_other_seat() {
        let (engine, mut state, mut seats) = setup();
        let mut log = MemoryLog::new();

        let outcome = engine.execute(&mut state, B, &Command::RollDice, &mut seats, &mut log);
        assert_eq!(outcome.error.as_deref(), Some("roll not allowed: not this player's turn"));
    }
}
