//! Petanque Sim is a library for simulating petanque matches.
//! Two sides with their own accuracy profiles and throwing strategies play
//! full matches to 13, one ball at a time. It's meant for estimating how
//! likely one style of play is to beat another.

/// The data everything else works on: sides, balls on the terrain,
/// validated player profiles, and the random throw model.
pub mod core;
/// Matches, rounds, strategies and the tools to run lots of them.
pub mod arena;

pub use arena::competition::run_batch;
pub use arena::{decide_and_act, simulate_match};
