//! Line-oriented session loop.
//!
//! The driver owns the input and output handles for the whole session and
//! is the only place that suspends waiting for the external party.

use crate::render;
use dice_game_core::game::{DiceGame, Event, Input};
use dice_game_core::Round;
use rand::{CryptoRng, RngCore};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// How a session ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Resolved(Round),
    Exited,
}

/// Run `game` to completion, one input line per suspension.
///
/// `initial` are the events returned by [`DiceGame::start`]. End of input
/// counts as an exit request.
pub fn run_session<G, I, O>(
    game: &mut DiceGame<G>,
    initial: Vec<Event>,
    mut input: I,
    mut output: O,
) -> io::Result<SessionEnd>
where
    G: RngCore + CryptoRng,
    I: BufRead,
    O: Write,
{
    writeln!(output, "Welcome to the Dice Game!")?;
    writeln!(output, "You and I will each select a dice, and we will compete.")?;
    emit(game, &initial, &mut output)?;

    let mut line = String::new();
    while let Some(prompt) = game.prompt() {
        write!(output, "{}", render::prompt(&prompt))?;
        output.flush()?;

        line.clear();
        let parsed = if input.read_line(&mut line)? == 0 {
            debug!("input closed");
            writeln!(output)?;
            Ok(Input::Exit)
        } else {
            Input::parse(&line)
        };

        match parsed.and_then(|input| game.step(input)) {
            Ok(events) => emit(game, &events, &mut output)?,
            Err(err) => {
                debug!(%err, "rejected input");
                writeln!(output, "Invalid selection: {err}.")?;
            }
        }
    }
    output.flush()?;

    Ok(match game.round() {
        Some(round) => SessionEnd::Resolved(round),
        None => SessionEnd::Exited,
    })
}

fn emit<G, O: Write>(game: &DiceGame<G>, events: &[Event], output: &mut O) -> io::Result<()> {
    for event in events {
        let text = render::event(event, game.dice(), || game.probability_table());
        write!(output, "{text}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dice_game_core::game::Phase;
    use dice_game_core::Dice;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn start(seed: u64) -> (DiceGame<StdRng>, Vec<Event>) {
        let dice = vec![
            Dice::new(vec![2, 2, 4, 4, 9, 9]).unwrap(),
            Dice::new(vec![1, 1, 6, 6, 8, 8]).unwrap(),
            Dice::new(vec![3, 3, 5, 5, 7, 7]).unwrap(),
        ];
        DiceGame::start(dice, StdRng::seed_from_u64(seed)).unwrap()
    }

    fn run(seed: u64, script: &str) -> (DiceGame<StdRng>, SessionEnd, String) {
        let (mut game, initial) = start(seed);
        let mut out = Vec::new();
        let end = run_session(&mut game, initial, Cursor::new(script), &mut out).unwrap();
        (game, end, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_scripted_game_resolves() {
        let (game, end, out) = run(1, "0\n0\n0\n0\n0\n");

        assert_eq!(end, SessionEnd::Resolved(game.round().unwrap()));
        assert!(out.starts_with("Welcome to the Dice Game!"));
        assert!(out.contains("(HMAC="));
        assert!(out.contains("(KEY="));
        assert!(out.contains("win") || out.contains("Tie"));
    }

    #[test]
    fn test_invalid_input_reprompts() {
        let (game, end, out) = run(1, "7\nabc\nx\n");

        assert_eq!(end, SessionEnd::Exited);
        assert_eq!(game.phase(), Phase::Exited);
        assert_eq!(out.matches("Invalid selection").count(), 2);
        assert_eq!(out.matches("Try to guess my selection.").count(), 3);
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_help_shows_table_and_keeps_state() {
        let (game, end, out) = run(2, "?\nX\n");

        assert_eq!(end, SessionEnd::Exited);
        assert!(out.contains("Probability of the win for the user:"));
        assert!(out.contains("| User dice v |"));
        assert_eq!(out.matches("Try to guess my selection.").count(), 2);
        assert!(game.transcript().entries.is_empty());
    }

    #[test]
    fn test_end_of_input_exits() {
        let (game, end, _) = run(3, "");

        assert_eq!(end, SessionEnd::Exited);
        assert_eq!(game.phase(), Phase::Exited);
    }

    #[test]
    fn test_every_commitment_is_published_and_revealed() {
        let (game, _, out) = run(4, "1\n1\n1\n1\n");

        assert_eq!(game.phase(), Phase::Resolved);
        assert_eq!(out.matches("(HMAC=").count(), 3);
        assert_eq!(out.matches("(KEY=").count(), 3);
        for entry in &game.transcript().entries {
            let digest = format!("(HMAC={})", entry.commit.digest);
            let key = format!("(KEY={})", entry.reveal.key);
            assert!(out.find(&digest).unwrap() < out.find(&key).unwrap());
        }
    }
}
