//! Text for prompts, events and the help table.

use dice_game_core::game::{Event, Prompt};
use dice_game_core::protocol::{Party, Purpose};
use comfy_table::presets::ASCII_FULL;
use comfy_table::Table;
use dice_game_core::{Dice, Outcome, ProbabilityTable};
use std::fmt::Write;

const CONTROLS: &str = "X - exit\n? - help\nYour selection: ";

const HELP: &str = "Help:
- Guess my random bit to decide who picks a dice first.
- Each of us picks a different dice, then both are thrown.
- Every throw adds your number to my committed one, modulo the face count.
- The higher throw wins.
";

/// What to print when the machine awaits `prompt`
pub fn prompt(prompt: &Prompt) -> String {
    let mut out = String::new();
    match prompt {
        Prompt::Guess { range, .. } => {
            out.push_str("Try to guess my selection.\n");
            numbered(&mut out, *range);
        }
        Prompt::ChooseDice { options } => {
            out.push_str("Choose your dice:\n");
            for (i, (_, dice)) in options.iter().enumerate() {
                let _ = writeln!(out, "{i} - {}", dice.signature());
            }
        }
        Prompt::AddModulo { range, .. } => {
            let _ = writeln!(out, "Add your number modulo {range}.");
            numbered(&mut out, *range);
        }
    }
    out.push_str(CONTROLS);
    out
}

fn numbered(out: &mut String, range: u32) {
    for i in 0..range {
        let _ = writeln!(out, "{i} - {i}");
    }
}

/// What to print for `event`. `dice` resolves claimed ids to faces.
pub fn event(event: &Event, dice: &[Dice], table: impl FnOnce() -> ProbabilityTable) -> String {
    let label = |id: &dice_game_core::DiceId| {
        dice.get(id.0)
            .map(|d| d.to_string())
            .unwrap_or_else(|| id.to_string())
    };
    match event {
        Event::Committed(commit) => {
            let intro = match commit.purpose {
                Purpose::FirstMove => "Let's determine who makes the first move.\n",
                Purpose::Throw(Party::Host) => "It's time for my throw.\n",
                Purpose::Throw(Party::External) => "It's time for your throw.\n",
            };
            format!(
                "{intro}I selected a random value in the range 0..{} (HMAC={}).\n",
                commit.range.saturating_sub(1),
                commit.digest
            )
        }
        Event::Revealed(reveal) => match reveal.purpose {
            Purpose::FirstMove => format!("My selection: {} (KEY={}).\n", reveal.secret, reveal.key),
            Purpose::Throw(_) => format!("My number is {} (KEY={}).\n", reveal.secret, reveal.key),
        },
        Event::FirstMoveDecided { mover } => match mover {
            Party::External => "You guessed right, you make the first move.\n".to_string(),
            Party::Host => "I make the first move.\n".to_string(),
        },
        Event::Claimed { party, dice: id } => match party {
            Party::Host => format!("I choose the dice: {}.\n", label(id)),
            Party::External => format!("You chose the dice: {}.\n", label(id)),
        },
        Event::Thrown {
            party,
            secret,
            input,
            modulus,
            index,
            value,
            ..
        } => {
            let whose = match party {
                Party::Host => "My",
                Party::External => "Your",
            };
            format!(
                "The fair number generation result is {secret} + {input} = {index} (mod {modulus}).\n{whose} throw is {value}.\n"
            )
        }
        Event::Resolved(round) => {
            let (h, e) = (round.host_throw, round.external_throw);
            match round.outcome {
                Outcome::ExternalWins => format!("You win ({e} > {h})!\n"),
                Outcome::HostWins => format!("I win ({h} > {e})!\n"),
                Outcome::Tie => format!("Tie ({h} = {e})!\n"),
            }
        }
        Event::HelpRequested => format!(
            "{HELP}\nProbability of the win for the user:\n{}",
            probability_table(&table())
        ),
        Event::Exited => "Exiting...\n".to_string(),
    }
}

/// Bordered table, user dice down the side, opponent dice across the top.
/// Diagonal cells are shown as `- (p)`.
pub fn probability_table(table: &ProbabilityTable) -> String {
    let header = std::iter::once("User dice v".to_string()).chain(table.labels().iter().cloned());
    let mut out = Table::new();
    out.load_preset(ASCII_FULL).set_header(header);
    for (i, (label, cells)) in table.rows().enumerate() {
        let row = cells.iter().enumerate().map(|(j, p)| {
            if i == j {
                format!("- ({p})")
            } else {
                p.to_string()
            }
        });
        out.add_row(std::iter::once(label.to_string()).chain(row));
    }
    format!("{out}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dice_game_core::protocol::CommitMessage;
    use dice_game_core::{Digest, DiceId, Round};

    fn dice() -> Vec<Dice> {
        vec![
            Dice::new(vec![2, 2, 4, 4, 9, 9]).unwrap(),
            Dice::new(vec![1, 1, 6, 6, 8, 8]).unwrap(),
            Dice::new(vec![3, 3, 5, 5, 7, 7]).unwrap(),
        ]
    }

    #[test]
    fn test_table_layout() {
        let text = probability_table(&ProbabilityTable::compute(&dice()));
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with('+'));
        assert!(lines[1].starts_with("| User dice v"));
        assert!(lines[1].contains("2,2,4,4,9,9"));
        let first = lines
            .iter()
            .find(|l| l.starts_with("| 2,2,4,4,9,9"))
            .unwrap();
        assert!(first.contains("- (0.3333)"));
        assert!(first.contains("0.5556"));
        assert_eq!(text.matches("- (").count(), 3);
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
        assert!(text.ends_with("+\n"));
    }

    #[test]
    fn test_guess_prompt() {
        let text = prompt(&Prompt::Guess {
            digest: Digest::from_bytes([0; 32]),
            range: 2,
        });

        assert_eq!(
            text,
            "Try to guess my selection.\n0 - 0\n1 - 1\nX - exit\n? - help\nYour selection: "
        );
    }

    #[test]
    fn test_choose_prompt_lists_remaining_in_order() {
        let dice = dice();
        let text = prompt(&Prompt::ChooseDice {
            options: vec![(DiceId(0), dice[0].clone()), (DiceId(2), dice[2].clone())],
        });

        assert!(text.contains("0 - 2,2,4,4,9,9\n1 - 3,3,5,5,7,7\n"));
    }

    #[test]
    fn test_commit_event_shows_digest() {
        let digest = Digest::from_bytes([0xcd; 32]);
        let text = event(
            &Event::Committed(CommitMessage {
                purpose: Purpose::Throw(Party::Host),
                range: 6,
                digest,
            }),
            &dice(),
            || unreachable!(),
        );

        assert!(text.contains(&format!("range 0..5 (HMAC={digest})")));
    }

    #[test]
    fn test_resolution_messages() {
        let round = |host_throw, external_throw| Round {
            host_dice: DiceId(0),
            external_dice: DiceId(1),
            host_throw,
            external_throw,
            outcome: Outcome::decide(host_throw, external_throw),
        };
        let render = |r| event(&Event::Resolved(r), &dice(), || unreachable!());

        assert_eq!(render(round(2, 6)), "You win (6 > 2)!\n");
        assert_eq!(render(round(9, 6)), "I win (9 > 6)!\n");
        assert_eq!(render(round(4, 4)), "Tie (4 = 4)!\n");
    }

    #[test]
    fn test_claim_event_names_dice() {
        let text = event(
            &Event::Claimed {
                party: Party::Host,
                dice: DiceId(1),
            },
            &dice(),
            || unreachable!(),
        );

        assert_eq!(text, "I choose the dice: [1,1,6,6,8,8].\n");
    }
}
