//! Dice Game
//!
//! Interactive terminal session against a computer host whose every random
//! draw is committed to before the player answers.

use anyhow::{Context, Result};
use clap::Parser;
use dice_game_cli::{run_session, Args, GameConfig, SessionEnd};
use dice_game_core::DiceGame;
use std::fs;
use std::io;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the game itself
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config = GameConfig::from_args(args)?;
    info!(dice = config.dice.len(), "configuration loaded");

    let (mut game, initial) = DiceGame::start(config.dice, rand::thread_rng())?;
    let end = run_session(&mut game, initial, io::stdin().lock(), io::stdout().lock())
        .context("terminal session failed")?;
    match end {
        SessionEnd::Resolved(round) => info!(outcome = %round.outcome, "game finished"),
        SessionEnd::Exited => info!("game abandoned"),
    }

    if let Some(path) = config.transcript {
        let json = game.transcript().to_json()?;
        fs::write(&path, json)
            .with_context(|| format!("writing transcript to {}", path.display()))?;
        info!(path = %path.display(), "transcript written");
    }
    Ok(())
}
