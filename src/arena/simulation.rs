use std::fmt;

use rand::Rng;
use tracing::{event, trace_span};

use crate::core::{PerSide, PlayerProfile, Side};

use super::{
    errors::SimulationError,
    historian::{Historian, MatchEvent, RoundLog},
    match_context::MatchContext,
    player::Player,
    round::RoundSimulation,
    sim_builder::MatchSimulationBuilder,
};

/// How a finished match ended.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub score: PerSide<u8>,
    pub winner: Side,
    pub rounds: u32,
    /// Every round played, only present when logging was turned on.
    pub log: Option<Vec<RoundLog>>,
}

impl MatchResult {
    /// Side A's score minus side B's.
    pub fn score_gap(&self) -> i32 {
        i32::from(self.score.a) - i32::from(self.score.b)
    }
}

/// A match between two players, played round by round until one side
/// reaches the winning score.
///
/// Use [`MatchSimulationBuilder`] to create one.
pub struct MatchSimulation {
    pub(crate) players: PerSide<Player>,
    pub context: MatchContext,
    pub(crate) balls_per_side: u8,
    pub(crate) max_rounds: u32,
    pub(crate) first_thrower: Option<Side>,
    pub(crate) logging: bool,
    pub(crate) historians: Vec<Box<dyn Historian>>,
    pub(crate) panic_on_historian_error: bool,
}

impl MatchSimulation {
    /// Play rounds until the match is decided.
    ///
    /// Returns `SimulationError::RoundLimitReached` if neither side has
    /// won after the configured number of rounds.
    pub fn run<R: Rng>(&mut self, rng: &mut R) -> Result<MatchResult, SimulationError> {
        let span = trace_span!("MatchSimulation::run");
        let _enter = span.enter();

        let mut log = self.logging.then(Vec::new);

        let winner = loop {
            if let Some(winner) = self.context.winner() {
                break winner;
            }
            if self.context.round_number >= self.max_rounds {
                event!(
                    tracing::Level::WARN,
                    rounds = self.context.round_number,
                    score_a = self.context.score.a,
                    score_b = self.context.score.b,
                    "Match abandoned at the round limit"
                );
                return Err(SimulationError::RoundLimitReached {
                    rounds: self.context.round_number,
                });
            }
            let round_log = self.run_round(rng);
            if let Some(log) = log.as_mut() {
                log.push(round_log);
            }
        };

        let score = self.context.score;
        let rounds = self.context.round_number;
        self.record_event(|| MatchEvent::MatchEnd {
            winner,
            score,
            rounds,
        });

        Ok(MatchResult {
            score,
            winner,
            rounds,
            log,
        })
    }

    fn run_round<R: Rng>(&mut self, rng: &mut R) -> RoundLog {
        self.context.round_number += 1;
        let round_number = self.context.round_number;
        let first_thrower = self
            .context
            .last_round_winner
            .or(self.first_thrower)
            .unwrap_or_else(|| if rng.random() { Side::A } else { Side::B });
        let start_score = self.context.score;

        self.record_event(|| MatchEvent::RoundStart {
            round_number,
            first_thrower,
            score: start_score,
        });

        let mut round = RoundSimulation::new(round_number, first_thrower, self.balls_per_side);
        let logging = self.logging;
        let mut actions = vec![];
        let historians = &mut self.historians;
        let panic_on_historian_error = self.panic_on_historian_error;
        let result = round.run(&mut self.players, rng, |record| {
            dispatch(historians, panic_on_historian_error, || {
                MatchEvent::Action(record.clone())
            });
            if logging {
                actions.push(record.clone());
            }
        });

        self.context.record_round(&result);
        let end_score = self.context.score;

        self.record_event(|| MatchEvent::RoundEnd {
            round_number,
            result,
            field: round.context.field.clone(),
            score: end_score,
        });

        RoundLog {
            round_number,
            first_thrower,
            start_score,
            end_score,
            actions,
            final_field: round.context.field,
            winner: result.winner,
            points: result.points,
        }
    }

    fn record_event(&mut self, event: impl FnOnce() -> MatchEvent) {
        dispatch(&mut self.historians, self.panic_on_historian_error, event);
    }
}

/// Send an event to every historian, dropping the ones that fail.
///
/// The event is only built when someone is listening.
fn dispatch(
    historians: &mut Vec<Box<dyn Historian>>,
    panic_on_historian_error: bool,
    event: impl FnOnce() -> MatchEvent,
) {
    if historians.is_empty() {
        return;
    }
    let event = event();
    historians.retain_mut(|historian| match historian.record_event(&event) {
        Ok(()) => true,
        Err(error) => {
            if panic_on_historian_error {
                panic!("Historian failed to record event: {error}");
            }
            event!(
                tracing::Level::WARN,
                ?error,
                "Historian failed to record event, dropping it"
            );
            false
        }
    });
}

impl fmt::Debug for MatchSimulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchSimulation")
            .field("players", &self.players)
            .field("context", &self.context)
            .field("balls_per_side", &self.balls_per_side)
            .field("max_rounds", &self.max_rounds)
            .finish_non_exhaustive()
    }
}

/// Play one full match between two profiles.
///
/// ```
/// use petanque_sim::arena::simulate_match;
/// use petanque_sim::core::PlayerProfile;
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(420);
/// let profile = PlayerProfile::default();
/// let result = simulate_match(profile, profile, true, &mut rng).unwrap();
///
/// assert_eq!(13, result.score[result.winner]);
/// assert_eq!(result.rounds as usize, result.log.unwrap().len());
/// ```
pub fn simulate_match<R: Rng>(
    profile_a: PlayerProfile,
    profile_b: PlayerProfile,
    logging: bool,
    rng: &mut R,
) -> Result<MatchResult, SimulationError> {
    MatchSimulationBuilder::default()
        .profiles(profile_a, profile_b)
        .logging(logging)
        .build()?
        .run(rng)
}
