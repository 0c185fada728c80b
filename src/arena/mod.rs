//! This is the arena module for simulating matches.
//!
//! # Single Match
//!
//! The tools allow explicit control over the
//! simulation all the way down to the rng.
//!
//! ## Single Match Example
//!
//! ```
//! use petanque_sim::arena::MatchSimulationBuilder;
//! use petanque_sim::core::{PlayerProfile, StrategyKind};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let pointer = PlayerProfile::builder()
//!     .point_mean(40.0)
//!     .point_std_dev(15.0)
//!     .build()
//!     .unwrap();
//! let shooter = PlayerProfile::builder()
//!     .hit_rate(0.55)
//!     .stay_rate(0.25)
//!     .strategy(StrategyKind::monte_carlo())
//!     .build()
//!     .unwrap();
//! let mut rng = StdRng::seed_from_u64(420);
//!
//! let mut sim = MatchSimulationBuilder::default()
//!     .profiles(pointer, shooter)
//!     .logging(true)
//!     .build()
//!     .unwrap();
//!
//! let result = sim.run(&mut rng).unwrap();
//! assert_eq!(13, result.score[result.winner]);
//! ```
//!
//! # Batch Example
//!
//! It's also possible to play many matches between the same two profiles
//! with tabulated results.
//!
//! ```
//! use petanque_sim::arena::competition::run_batch;
//! use petanque_sim::core::{PlayerProfile, Side, StrategyKind};
//!
//! let a = PlayerProfile::default();
//! let b = PlayerProfile::builder()
//!     .strategy(StrategyKind::conditional())
//!     .build()
//!     .unwrap();
//!
//! let result = run_batch(a, b, 200, |done| println!("{done} matches played")).unwrap();
//! println!("A wins {:.1}%", 100.0 * result.win_probability(Side::A));
//! for (label, count) in result.histogram.labelled() {
//!     println!("{label}: {count}");
//! }
//! ```
//!
//! # Interactive Example
//!
//! A [`MatchSession`] advances one ball at a time, for a person choosing
//! what to throw.
//!
//! ```
//! use petanque_sim::arena::{Action, MatchSession};
//! use petanque_sim::core::PlayerProfile;
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let profile = PlayerProfile::default();
//! let mut session = MatchSession::new(profile, profile, &mut rng);
//!
//! let record = session.play(Action::Point, &mut rng).unwrap();
//! println!("{}", record.description);
//! ```
pub mod action;
pub mod action_model;
pub mod competition;
pub mod errors;
pub mod evaluator;
pub mod historian;
pub mod match_context;
pub mod player;
pub mod round;
pub mod round_context;
pub mod session;
pub mod sim_builder;
pub mod simulation;
pub mod strategy;

#[cfg(any(test, feature = "test-util"))]
pub mod test_util;

pub use action::{Action, ActionOutcome, ActionRecord, OutcomeKind};
pub use action_model::{ActionResult, apply_action};
pub use errors::SimulationError;
pub use evaluator::{evaluate, evaluate_field};
pub use historian::{Historian, HistorianError, MatchEvent};
pub use match_context::{MatchContext, WINNING_SCORE};
pub use player::Player;
pub use round::RoundSimulation;
pub use round_context::{DEFAULT_BALLS_PER_SIDE, RoundContext, RoundPhase, RoundScore};
pub use session::{MatchSession, SessionStatus, decide_and_act};
pub use sim_builder::{DEFAULT_MAX_ROUNDS, MatchSimulationBuilder};
pub use simulation::{MatchResult, MatchSimulation, simulate_match};
pub use strategy::{Decision, EvDecision, Strategy, TurnView};
