//! Terminal front end for the dice game.
//!
//! Startup validation, the line-oriented session driver, and text rendering
//! of prompts, events and the probability table.

pub mod config;
pub mod driver;
pub mod render;

pub use config::{Args, GameConfig};
pub use driver::{run_session, SessionEnd};
