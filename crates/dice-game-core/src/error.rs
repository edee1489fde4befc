//! Error taxonomy for the dice game.

use crate::crypto::Digest;
use crate::protocol::{Outcome, Party, Purpose};
use thiserror::Error;

/// Malformed startup configuration. Fatal: no protocol state is entered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("at least {min} dice are required to play, got {got}")]
    TooFewDice { min: usize, got: usize },

    #[error("dice {dice} contains a non-integer value {value:?}; all dice values must be integers")]
    NonInteger { dice: usize, value: String },

    #[error("dice {dice} has no sides; each dice must have at least one value")]
    EmptyDice { dice: usize },

    #[error("commitment range must be greater than zero")]
    InvalidRange,
}

/// Malformed interactive input. Recoverable: the same prompt is shown again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unrecognised input {0:?}")]
    Unrecognised(String),

    #[error("selection {value} is out of range 0..{range}")]
    OutOfRange { value: u32, range: u32 },

    #[error("the game is over; no further input is accepted")]
    GameOver,
}

/// A revealed key or secret does not match what was published.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("revealed key and secret do not reproduce digest {digest}")]
    DigestMismatch { digest: Digest },

    #[error("revealed secret {secret} is outside the committed range 0..{range}")]
    SecretOutOfRange { secret: u32, range: u32 },

    #[error("external input {input} is outside the committed range 0..{range}")]
    InputOutOfRange { input: u32, range: u32 },

    #[error("recorded result {recorded} does not match ({secret} + {input}) mod {range} = {expected}")]
    ResultMismatch {
        secret: u32,
        input: u32,
        range: u32,
        recorded: u32,
        expected: u32,
    },

    #[error("recorded decision for the {purpose} does not follow from its reveal")]
    DecisionMismatch { purpose: Purpose },

    #[error("the {purpose} appears more than once")]
    DuplicatePurpose { purpose: Purpose },

    #[error("recorded dice claims for the {party} party are inconsistent")]
    ClaimMismatch { party: Party },

    #[error("recorded outcome {recorded:?} does not follow from the recorded throws")]
    OutcomeMismatch { recorded: Outcome },
}
