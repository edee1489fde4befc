//! Commitment protocol primitives.

mod commitment;

pub use commitment::{combine, verify, Commitment, Digest, Key};
