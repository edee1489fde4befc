//! Dice model and probability engine.

mod dice;
mod probability;

pub use dice::{Dice, Probability};
pub use probability::ProbabilityTable;
