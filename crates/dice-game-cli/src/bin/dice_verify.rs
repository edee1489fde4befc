//! Transcript verifier
//!
//! Independently re-checks a dice game transcript: every revealed key and
//! secret must reproduce the digest published before the player's input,
//! and every throw and the final outcome must follow from the reveals.
//!
//! Usage: dice-verify session.json

use anyhow::{bail, Context, Result};
use clap::Parser;
use dice_game_core::protocol::{Decision, Transcript};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dice-verify", version)]
#[command(about = "Verify the commitments in a dice game transcript")]
struct Args {
    /// Transcript written by `dice-game --transcript`
    transcript: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let json = fs::read_to_string(&args.transcript)
        .with_context(|| format!("reading {}", args.transcript.display()))?;
    let transcript = Transcript::from_json(&json).context("parsing transcript")?;

    println!("Session {}", transcript.session_id);
    let mut failures = 0;
    for entry in &transcript.entries {
        let detail = match &entry.decision {
            Decision::FirstMove { mover } => format!("mover={mover}"),
            Decision::Throw { index, value, .. } => format!("index={index} value={value}"),
        };
        match transcript.verify_entry(entry) {
            Ok(()) => println!("ok    {}: {detail}", entry.commit.purpose),
            Err(err) => {
                failures += 1;
                println!("FAIL  {}: {err}", entry.commit.purpose);
            }
        }
    }
    if failures > 0 {
        bail!("{failures} commitment(s) failed verification");
    }
    transcript
        .verify()
        .context("outcome does not follow from the throws")?;
    match transcript.outcome {
        Some(outcome) => println!("Outcome verified: {outcome}"),
        None => println!("Session ended before resolution"),
    }
    Ok(())
}
