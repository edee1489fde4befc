//! Game state machine: first move, dice claims, throws, resolution.

mod input;
mod machine;
mod pool;

pub use input::{Input, Prompt};
pub use machine::{DiceGame, Event, Phase, Round, MIN_MACHINE_DICE};
pub use pool::{Claims, DicePool};
