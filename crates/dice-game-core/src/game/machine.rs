//! Turn sequencing for one round.
//!
//! `DiceGame` is a transition function: each call to [`DiceGame::step`]
//! consumes one input and returns the side effects as [`Event`]s. The
//! machine never prints; the driver owns the terminal.

use super::input::{Input, Prompt};
use super::pool::{Claims, DicePool};
use crate::crypto::{combine, Commitment};
use crate::dice::{Dice, ProbabilityTable};
use crate::error::{ConfigurationError, ValidationError};
use crate::protocol::{
    ClaimRecord, CommitMessage, Decision, DiceId, Outcome, Party, Purpose, RevealMessage,
    SessionId, Transcript, TranscriptEntry,
};
use rand::rngs::ThreadRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, info, info_span, Span};

/// Fewest dice the machine can run with: one per party
pub const MIN_MACHINE_DICE: usize = 2;

/// Observable position in the round
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    DetermineFirstMove,
    ClaimDice,
    ThrowHost,
    ThrowExternal,
    Resolved,
    Exited,
}

/// The finished round
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Round {
    pub host_dice: DiceId,
    pub external_dice: DiceId,
    pub host_throw: i64,
    pub external_throw: i64,
    pub outcome: Outcome,
}

/// Side effect of a transition, in the order it happened
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Digest published; input for `purpose` is now awaited
    Committed(CommitMessage),
    /// Key and secret disclosed after the input was locked in
    Revealed(RevealMessage),
    FirstMoveDecided { mover: Party },
    Claimed { party: Party, dice: DiceId },
    Thrown {
        party: Party,
        dice: DiceId,
        secret: u32,
        input: u32,
        modulus: u32,
        index: u32,
        value: i64,
    },
    Resolved(Round),
    HelpRequested,
    Exited,
}

enum State {
    FirstMove(Commitment),
    ClaimDice,
    Throw { party: Party, commitment: Commitment },
    Resolved(Round),
    Exited,
}

/// One game between the host and the external party
pub struct DiceGame<R = ThreadRng> {
    dice: Vec<Dice>,
    pool: DicePool,
    claims: Claims,
    host_throw: Option<i64>,
    state: State,
    transcript: Transcript,
    rng: R,
    span: Span,
}

impl<R: RngCore + CryptoRng> DiceGame<R> {
    /// Enter `DetermineFirstMove`, publishing the first digest.
    pub fn start(dice: Vec<Dice>, mut rng: R) -> Result<(Self, Vec<Event>), ConfigurationError> {
        if dice.len() < MIN_MACHINE_DICE {
            return Err(ConfigurationError::TooFewDice {
                min: MIN_MACHINE_DICE,
                got: dice.len(),
            });
        }
        let session_id = SessionId::new();
        let span = info_span!("session", id = %session_id);
        let commitment = Commitment::generate_with(2, &mut rng)?;
        let commit = CommitMessage {
            purpose: Purpose::FirstMove,
            range: commitment.range(),
            digest: commitment.digest(),
        };
        span.in_scope(|| info!(dice = dice.len(), digest = %commit.digest, "session started"));

        let game = Self {
            pool: DicePool::full(dice.len()),
            transcript: Transcript::new(session_id, dice.clone()),
            dice,
            claims: Claims::default(),
            host_throw: None,
            state: State::FirstMove(commitment),
            rng,
            span,
        };
        Ok((game, vec![Event::Committed(commit)]))
    }

    pub fn phase(&self) -> Phase {
        match &self.state {
            State::FirstMove(_) => Phase::DetermineFirstMove,
            State::ClaimDice => Phase::ClaimDice,
            State::Throw {
                party: Party::Host, ..
            } => Phase::ThrowHost,
            State::Throw {
                party: Party::External,
                ..
            } => Phase::ThrowExternal,
            State::Resolved(_) => Phase::Resolved,
            State::Exited => Phase::Exited,
        }
    }

    /// What input is awaited; `None` once the round is over or exited
    pub fn prompt(&self) -> Option<Prompt> {
        match &self.state {
            State::FirstMove(commitment) => Some(Prompt::Guess {
                digest: commitment.digest(),
                range: commitment.range(),
            }),
            State::ClaimDice => Some(Prompt::ChooseDice {
                options: self
                    .pool
                    .iter()
                    .map(|id| (id, self.dice[id.0].clone()))
                    .collect(),
            }),
            State::Throw { party, commitment } => Some(Prompt::AddModulo {
                party: *party,
                digest: commitment.digest(),
                range: commitment.range(),
            }),
            State::Resolved(_) | State::Exited => None,
        }
    }

    /// Apply one input. Invalid input leaves the state untouched.
    pub fn step(&mut self, input: Input) -> Result<Vec<Event>, ValidationError> {
        let span = self.span.clone();
        let _guard = span.enter();

        let prompt = self.prompt().ok_or(ValidationError::GameOver)?;
        let value = match input {
            Input::Exit => {
                info!(phase = ?self.phase(), "session exited");
                self.state = State::Exited;
                return Ok(vec![Event::Exited]);
            }
            Input::Help => return Ok(vec![Event::HelpRequested]),
            Input::Number(value) => value,
        };
        if value >= prompt.range() {
            debug!(value, range = prompt.range(), "input out of range");
            return Err(ValidationError::OutOfRange {
                value,
                range: prompt.range(),
            });
        }

        let mut events = Vec::new();
        match std::mem::replace(&mut self.state, State::Exited) {
            State::FirstMove(commitment) => self.decide_first_move(commitment, value, &mut events),
            State::ClaimDice => self.claim_external(value, &mut events),
            State::Throw { party, commitment } => {
                self.throw(party, commitment, value, &mut events)
            }
            State::Resolved(_) | State::Exited => unreachable!("prompt() returned None"),
        }
        debug!(phase = ?self.phase(), "transition complete");
        Ok(events)
    }

    fn decide_first_move(&mut self, commitment: Commitment, guess: u32, events: &mut Vec<Event>) {
        let (commit, reveal) = self.open(Purpose::FirstMove, commitment, guess);
        let mover = if guess == reveal.secret {
            Party::External
        } else {
            Party::Host
        };
        info!(%mover, "first move decided");
        self.transcript.entries.push(TranscriptEntry {
            commit,
            reveal: reveal.clone(),
            decision: Decision::FirstMove { mover },
        });
        events.push(Event::Revealed(reveal));
        events.push(Event::FirstMoveDecided { mover });

        if mover == Party::Host {
            self.claim_host(events);
        }
        self.state = State::ClaimDice;
    }

    fn claim_external(&mut self, index: u32, events: &mut Vec<Event>) {
        let id = self.pool.nth(index as usize).expect("index checked against pool size");
        self.transfer(Party::External, id, events);

        if self.claims.host.is_none() {
            self.claim_host(events);
        }
        self.begin_throw(Party::Host, events);
    }

    fn claim_host(&mut self, events: &mut Vec<Event>) {
        let id = self
            .pool
            .claim_random(&mut self.rng)
            .map(|(_, id)| id)
            .expect("pool holds a dice for each party");
        self.transfer(Party::Host, id, events);
    }

    fn transfer(&mut self, party: Party, id: DiceId, events: &mut Vec<Event>) {
        self.pool = self
            .pool
            .claim(id)
            .expect("claimed dice comes from the pool");
        self.claims.set(party, id);
        self.transcript.claims.push(ClaimRecord { party, dice: id });
        info!(%party, dice = %self.dice[id.0], remaining = self.pool.len(), "dice claimed");
        events.push(Event::Claimed { party, dice: id });
    }

    fn dice_of(&self, party: Party) -> DiceId {
        self.claims
            .of(party)
            .expect("both parties claim before throwing")
    }

    fn begin_throw(&mut self, party: Party, events: &mut Vec<Event>) {
        let faces = self.dice[self.dice_of(party).0].face_count() as u32;
        let commitment = Commitment::generate_with(faces, &mut self.rng)
            .expect("dice have at least one face");
        let commit = CommitMessage {
            purpose: Purpose::Throw(party),
            range: commitment.range(),
            digest: commitment.digest(),
        };
        info!(%party, range = commit.range, digest = %commit.digest, "throw committed");
        events.push(Event::Committed(commit));
        self.state = State::Throw { party, commitment };
    }

    fn throw(&mut self, party: Party, commitment: Commitment, input: u32, events: &mut Vec<Event>) {
        let dice = self.dice_of(party);
        let modulus = commitment.range();
        let (commit, reveal) = self.open(Purpose::Throw(party), commitment, input);
        let index = combine(reveal.secret, input, modulus);
        let value = self.dice[dice.0]
            .face(index as usize)
            .expect("combine result is below the face count");
        info!(%party, index, value, "dice thrown");

        let secret = reveal.secret;
        self.transcript.entries.push(TranscriptEntry {
            commit,
            reveal: reveal.clone(),
            decision: Decision::Throw {
                party,
                dice,
                index,
                value,
            },
        });
        events.push(Event::Revealed(reveal));
        events.push(Event::Thrown {
            party,
            dice,
            secret,
            input,
            modulus,
            index,
            value,
        });

        match party {
            Party::Host => {
                self.host_throw = Some(value);
                self.begin_throw(Party::External, events);
            }
            Party::External => self.resolve(value, events),
        }
    }

    fn resolve(&mut self, external_throw: i64, events: &mut Vec<Event>) {
        let host_throw = self.host_throw.expect("host throws first");
        let round = Round {
            host_dice: self.dice_of(Party::Host),
            external_dice: self.dice_of(Party::External),
            host_throw,
            external_throw,
            outcome: Outcome::decide(host_throw, external_throw),
        };
        info!(host_throw, external_throw, outcome = %round.outcome, "round resolved");
        self.transcript.outcome = Some(round.outcome);
        events.push(Event::Resolved(round));
        self.state = State::Resolved(round);
    }

    /// Reveal once the input is fixed; the commitment is consumed here.
    fn open(
        &self,
        purpose: Purpose,
        commitment: Commitment,
        external_input: u32,
    ) -> (CommitMessage, RevealMessage) {
        let commit = CommitMessage {
            purpose,
            range: commitment.range(),
            digest: commitment.digest(),
        };
        let (key, secret) = commitment.reveal();
        let reveal = RevealMessage {
            purpose,
            key,
            secret,
            external_input,
        };
        (commit, reveal)
    }
}

impl<R> DiceGame<R> {
    pub fn session_id(&self) -> SessionId {
        self.transcript.session_id
    }

    pub fn dice(&self) -> &[Dice] {
        &self.dice
    }

    pub fn get_dice(&self, id: DiceId) -> Option<&Dice> {
        self.dice.get(id.0)
    }

    pub fn pool(&self) -> &DicePool {
        &self.pool
    }

    pub fn claims(&self) -> Claims {
        self.claims
    }

    /// The resolved round, once there is one
    pub fn round(&self) -> Option<Round> {
        match self.state {
            State::Resolved(round) => Some(round),
            _ => None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn into_transcript(self) -> Transcript {
        self.transcript
    }

    /// Win probabilities over every configured dice, for help display
    pub fn probability_table(&self) -> ProbabilityTable {
        ProbabilityTable::compute(&self.dice)
    }
}
