//! Scripted provider for tests and replays.

use std::collections::VecDeque;

use super::{DecisionHint, DecisionProvider, DecisionRequest};
use crate::core::{Command, DecisionError, PlayerId};

/// Replays queued decisions in order.
///
/// Once the script runs out every request is answered with the fallback
/// batch (`end_turn` unless changed). Every request is remembered so tests
/// can check what the engine asked for.
#[derive(Clone, Debug)]
pub struct ScriptedProvider {
    script: VecDeque<Result<Vec<Command>, DecisionError>>,
    fallback: Vec<Command>,
    seen: Vec<(PlayerId, Option<DecisionHint>)>,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self {
            script: VecDeque::new(),
            fallback: vec![Command::EndTurn],
            seen: Vec::new(),
        }
    }
}

impl ScriptedProvider {
    /// Empty script that always ends the turn.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one batch of commands.
    #[must_use]
    pub fn then(mut self, commands: Vec<Command>) -> Self {
        self.script.push_back(Ok(commands));
        self
    }

    /// Queue a single command as its own decision.
    #[must_use]
    pub fn then_one(self, command: Command) -> Self {
        self.then(vec![command])
    }

    /// Queue a provider failure.
    #[must_use]
    pub fn then_fail(mut self, error: DecisionError) -> Self {
        self.script.push_back(Err(error));
        self
    }

    /// Answer used once the script is exhausted.
    #[must_use]
    pub fn with_fallback(mut self, commands: Vec<Command>) -> Self {
        self.fallback = commands;
        self
    }

    /// Queued decisions not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Every request received so far.
    #[must_use]
    pub fn seen(&self) -> &[(PlayerId, Option<DecisionHint>)] {
        &self.seen
    }
}

impl DecisionProvider for ScriptedProvider {
    fn decide(&mut self, request: &DecisionRequest<'_>) -> Result<Vec<Command>, DecisionError> {
        self.seen.push((request.player, request.hint.cloned()));
        self.script
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}
