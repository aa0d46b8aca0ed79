//! Card effects.
//!
//! - `CardEffectExecutor`: applies a drawn card's effect descriptor
//! - `CardOutcome`: what the card did, step by step
//!
//! The descriptor itself (`CardEffect`) lives with the card definitions in
//! `cards`; this module only interprets it.

mod executor;

pub use executor::{CardEffectExecutor, CardOutcome, CardStep};
