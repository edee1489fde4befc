//! Protocol messages and the session transcript.

use crate::crypto::{self, combine, Digest, Key};
use crate::dice::Dice;
use crate::error::ProtocolError;
use crate::protocol::{DiceId, Outcome, Party, SessionId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decision point a commitment was made for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purpose {
    FirstMove,
    Throw(Party),
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purpose::FirstMove => write!(f, "first move"),
            Purpose::Throw(party) => write!(f, "{} throw", party),
        }
    }
}

/// Published before the external input is collected
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage {
    pub purpose: Purpose,
    pub range: u32,
    pub digest: Digest,
}

/// Published after the external input is locked in
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealMessage {
    pub purpose: Purpose,
    pub key: Key,
    pub secret: u32,
    pub external_input: u32,
}

/// What the host derived from a reveal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// External party moves first iff its guess equals the secret
    FirstMove { mover: Party },
    /// `index = (secret + external_input) mod range`, `value = faces[index]`
    Throw {
        party: Party,
        dice: DiceId,
        index: u32,
        value: i64,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub commit: CommitMessage,
    pub reveal: RevealMessage,
    pub decision: Decision,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub party: Party,
    pub dice: DiceId,
}

/// Everything published during one session, enough to re-check every draw
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub session_id: SessionId,
    pub dice: Vec<Dice>,
    pub entries: Vec<TranscriptEntry>,
    pub claims: Vec<ClaimRecord>,
    pub outcome: Option<Outcome>,
}

impl Transcript {
    pub fn new(session_id: SessionId, dice: Vec<Dice>) -> Self {
        Self {
            session_id,
            dice,
            entries: Vec::new(),
            claims: Vec::new(),
            outcome: None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Re-check every reveal against its digest, every decision against its
    /// reveal, and the claims against the mover and the throws
    pub fn verify(&self) -> Result<(), ProtocolError> {
        for (i, entry) in self.entries.iter().enumerate() {
            let purpose = entry.commit.purpose;
            if self.entries[..i].iter().any(|e| e.commit.purpose == purpose) {
                return Err(ProtocolError::DuplicatePurpose { purpose });
            }
            self.verify_entry(entry)?;
        }
        self.verify_claims()?;
        self.verify_outcome()
    }

    /// Dice claimed by `party`, if recorded
    pub fn claim_of(&self, party: Party) -> Option<DiceId> {
        self.claims
            .iter()
            .find(|claim| claim.party == party)
            .map(|claim| claim.dice)
    }

    fn mover(&self) -> Option<Party> {
        self.entries.iter().find_map(|entry| match entry.decision {
            Decision::FirstMove { mover } => Some(mover),
            _ => None,
        })
    }

    /// At most one claim per party on distinct, configured dice; the mover
    /// claims first; both parties have claimed once anything is thrown.
    fn verify_claims(&self) -> Result<(), ProtocolError> {
        for (i, claim) in self.claims.iter().enumerate() {
            let earlier = &self.claims[..i];
            if claim.dice.0 >= self.dice.len()
                || earlier.iter().any(|c| c.party == claim.party || c.dice == claim.dice)
            {
                return Err(ProtocolError::ClaimMismatch { party: claim.party });
            }
        }
        if let Some(first) = self.claims.first() {
            if self.mover() != Some(first.party) {
                return Err(ProtocolError::ClaimMismatch { party: first.party });
            }
        }

        let thrown = self
            .entries
            .iter()
            .any(|entry| matches!(entry.decision, Decision::Throw { .. }));
        if thrown || self.outcome.is_some() {
            for party in [Party::Host, Party::External] {
                if self.claim_of(party).is_none() {
                    return Err(ProtocolError::ClaimMismatch { party });
                }
            }
        }
        Ok(())
    }

    /// Check a single entry
    pub fn verify_entry(&self, entry: &TranscriptEntry) -> Result<(), ProtocolError> {
        let TranscriptEntry {
            commit,
            reveal,
            decision,
        } = entry;
        let purpose = commit.purpose;
        if reveal.purpose != purpose {
            return Err(ProtocolError::DecisionMismatch { purpose });
        }
        crypto::verify(&commit.digest, commit.range, &reveal.key, reveal.secret)?;
        if reveal.external_input >= commit.range {
            return Err(ProtocolError::InputOutOfRange {
                input: reveal.external_input,
                range: commit.range,
            });
        }

        match (purpose, decision) {
            (Purpose::FirstMove, Decision::FirstMove { mover }) => {
                if commit.range != 2 {
                    return Err(ProtocolError::DecisionMismatch { purpose });
                }
                let expected = if reveal.external_input == reveal.secret {
                    Party::External
                } else {
                    Party::Host
                };
                if *mover != expected {
                    return Err(ProtocolError::DecisionMismatch { purpose });
                }
            }
            (
                Purpose::Throw(thrower),
                Decision::Throw {
                    party,
                    dice,
                    index,
                    value,
                },
            ) if thrower == *party => {
                let expected = combine(reveal.secret, reveal.external_input, commit.range);
                if *index != expected {
                    return Err(ProtocolError::ResultMismatch {
                        secret: reveal.secret,
                        input: reveal.external_input,
                        range: commit.range,
                        recorded: *index,
                        expected,
                    });
                }
                if self.claim_of(*party) != Some(*dice) {
                    return Err(ProtocolError::ClaimMismatch { party: *party });
                }
                let thrown = self.dice.get(dice.0);
                let consistent = thrown.is_some_and(|d| {
                    d.face_count() as u32 == commit.range && d.face(*index as usize) == Some(*value)
                });
                if !consistent {
                    return Err(ProtocolError::DecisionMismatch { purpose });
                }
            }
            _ => return Err(ProtocolError::DecisionMismatch { purpose }),
        }
        Ok(())
    }

    /// Value thrown by `party`, if recorded
    pub fn throw_of(&self, party: Party) -> Option<i64> {
        self.entries.iter().find_map(|entry| match entry.decision {
            Decision::Throw {
                party: p, value, ..
            } if p == party => Some(value),
            _ => None,
        })
    }

    fn verify_outcome(&self) -> Result<(), ProtocolError> {
        let Some(recorded) = self.outcome else {
            return Ok(());
        };
        match (self.throw_of(Party::Host), self.throw_of(Party::External)) {
            (Some(host), Some(external)) if Outcome::decide(host, external) == recorded => Ok(()),
            _ => Err(ProtocolError::OutcomeMismatch { recorded }),
        }
    }
}
