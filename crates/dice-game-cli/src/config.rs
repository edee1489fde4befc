//! Command line and startup dice configuration.

use clap::Parser;
use dice_game_core::{ConfigurationError, Dice, MIN_DICE};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dice-game", version)]
#[command(about = "Play a provably fair non-transitive dice game against the computer")]
pub struct Args {
    /// Write the session transcript as JSON to this path when the game ends
    #[arg(long, env = "DICE_GAME_TRANSCRIPT", value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Dice configurations, each a comma-separated list of integer faces (e.g. 2,2,4,4,9,9)
    #[arg(value_name = "DICE", allow_hyphen_values = true)]
    pub dice: Vec<String>,
}

/// Validated startup configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub dice: Vec<Dice>,
    pub transcript: Option<PathBuf>,
}

impl GameConfig {
    pub fn from_args(args: Args) -> Result<Self, ConfigurationError> {
        Ok(Self {
            dice: parse_dice(&args.dice)?,
            transcript: args.transcript,
        })
    }
}

/// Parse one token per dice. Dice are numbered from 1 in error messages.
pub fn parse_dice<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Dice>, ConfigurationError> {
    if tokens.len() < MIN_DICE {
        return Err(ConfigurationError::TooFewDice {
            min: MIN_DICE,
            got: tokens.len(),
        });
    }
    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| parse_token(i + 1, token.as_ref()))
        .collect()
}

fn parse_token(number: usize, token: &str) -> Result<Dice, ConfigurationError> {
    if token.trim().is_empty() {
        return Err(ConfigurationError::EmptyDice { dice: number });
    }
    let faces = token
        .split(',')
        .map(|value| {
            let value = value.trim();
            value
                .parse::<i64>()
                .map_err(|_| ConfigurationError::NonInteger {
                    dice: number,
                    value: value.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Dice::new(faces).ok_or(ConfigurationError::EmptyDice { dice: number })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_valid_dice() {
        let dice = parse_dice(&["2,2,4,4,9,9", "1,1,6,6,8,8", " 3, 3,5 ,5,7,7"]).unwrap();

        assert_eq!(dice.len(), 3);
        assert_eq!(dice[2].faces(), &[3, 3, 5, 5, 7, 7]);
    }

    #[test]
    fn test_identical_dice_allowed() {
        let dice = parse_dice(&["1,2,3", "1,2,3", "1,2,3"]).unwrap();

        assert_eq!(dice.len(), 3);
    }

    #[test]
    fn test_negative_and_single_faces() {
        let dice = parse_dice(&["-3,0,3", "7", "-1"]).unwrap();

        assert_eq!(dice[0].faces(), &[-3, 0, 3]);
        assert_eq!(dice[1].face_count(), 1);
    }

    #[test]
    fn test_too_few_dice() {
        assert_eq!(
            parse_dice(&["1,2,3", "4,5,6"]),
            Err(ConfigurationError::TooFewDice { min: 3, got: 2 })
        );
        assert_eq!(
            parse_dice::<&str>(&[]),
            Err(ConfigurationError::TooFewDice { min: 3, got: 0 })
        );
    }

    #[test]
    fn test_non_integer_value() {
        let err = parse_dice(&["1,2,3", "1,2,x", "4,5,6"]).unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::NonInteger {
                dice: 2,
                value: "x".into()
            }
        );
        assert!(err.to_string().contains("non-integer"));
    }

    #[test]
    fn test_fractional_and_blank_elements_rejected() {
        assert!(matches!(
            parse_dice(&["1,2.5", "1", "2"]),
            Err(ConfigurationError::NonInteger { dice: 1, .. })
        ));
        assert!(matches!(
            parse_dice(&["1,,2", "1", "2"]),
            Err(ConfigurationError::NonInteger { dice: 1, .. })
        ));
    }

    #[test]
    fn test_empty_dice() {
        assert_eq!(
            parse_dice(&["1", "", "2"]),
            Err(ConfigurationError::EmptyDice { dice: 2 })
        );
    }

    #[test]
    fn test_args_accept_negative_faces() {
        let args = Args::try_parse_from(["dice-game", "-1,2", "3,-4", "5"]).unwrap();

        assert_eq!(args.dice, ["-1,2", "3,-4", "5"]);
        assert_eq!(args.transcript, None);
    }

    #[test]
    fn test_args_transcript_flag() {
        let args =
            Args::try_parse_from(["dice-game", "--transcript", "out.json", "1", "2", "3"]).unwrap();
        let config = GameConfig::from_args(args).unwrap();

        assert_eq!(config.transcript, Some(PathBuf::from("out.json")));
        assert_eq!(config.dice.len(), 3);
    }

    proptest! {
        #[test]
        fn prop_integer_tokens_parse(faces in prop::collection::vec(prop::collection::vec(any::<i64>(), 1..8), 3..6)) {
            let tokens: Vec<String> = faces
                .iter()
                .map(|f| f.iter().map(i64::to_string).collect::<Vec<_>>().join(","))
                .collect();
            let dice = parse_dice(&tokens).unwrap();
            for (d, f) in dice.iter().zip(&faces) {
                prop_assert_eq!(d.faces(), f.as_slice());
            }
        }
    }
}
