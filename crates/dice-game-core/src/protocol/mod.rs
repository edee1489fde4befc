//! Protocol types and messages.

mod messages;
mod types;

pub use messages::{
    ClaimRecord, CommitMessage, Decision, Purpose, RevealMessage, Transcript, TranscriptEntry,
};
pub use types::{DiceId, Outcome, Party, SessionId};
