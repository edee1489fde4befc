//! Dice Game Core Library
//!
//! Provably fair two-party dice game: the host commits to every random draw
//! with a keyed hash before the external party supplies its input, and the
//! two are combined so neither side can bias the result.

pub mod crypto;
pub mod dice;
pub mod error;
pub mod game;
pub mod protocol;

pub use crypto::{combine, Commitment, Digest, Key};
pub use dice::{Dice, Probability, ProbabilityTable};
pub use error::{ConfigurationError, ProtocolError, ValidationError};
pub use game::{DiceGame, Event, Input, Phase, Prompt, Round};
pub use protocol::{DiceId, Outcome, Party, SessionId, Transcript};

/// Fewest dice a playable game is configured with
pub const MIN_DICE: usize = 3;
