//! Interactive input tokens and what the machine is waiting for.

use crate::crypto::Digest;
use crate::dice::Dice;
use crate::error::ValidationError;
use crate::protocol::{DiceId, Party};

/// One recognised line of input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Exit,
    Help,
    Number(u32),
}

impl Input {
    /// `x`/`X` exits, `?` asks for help, a non-negative integer selects.
    pub fn parse(line: &str) -> Result<Self, ValidationError> {
        let token = line.trim();
        match token {
            "x" | "X" => Ok(Input::Exit),
            "?" => Ok(Input::Help),
            _ => token
                .parse::<u32>()
                .map(Input::Number)
                .map_err(|_| ValidationError::Unrecognised(token.to_string())),
        }
    }
}

/// What the machine is suspended on
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prompt {
    /// Guess the host's secret bit
    Guess { digest: Digest, range: u32 },
    /// Pick one of the remaining dice, listed in order
    ChooseDice { options: Vec<(DiceId, Dice)> },
    /// Add a number modulo the face count of `party`'s dice
    AddModulo {
        party: Party,
        digest: Digest,
        range: u32,
    },
}

impl Prompt {
    /// Numeric selections accepted are `0..range`
    pub fn range(&self) -> u32 {
        match self {
            Prompt::Guess { range, .. } | Prompt::AddModulo { range, .. } => *range,
            Prompt::ChooseDice { options } => options.len() as u32,
        }
    }

    pub fn digest(&self) -> Option<Digest> {
        match self {
            Prompt::Guess { digest, .. } | Prompt::AddModulo { digest, .. } => Some(*digest),
            Prompt::ChooseDice { .. } => None,
        }
    }
}
