//! Turn by turn play, for when a person is at the controls.
use rand::Rng;
use tracing::event;

use crate::core::{PerSide, PlayerProfile, Side};

use super::{
    action::{Action, ActionOutcome, ActionRecord},
    errors::SimulationError,
    match_context::MatchContext,
    player::Player,
    round_context::{DEFAULT_BALLS_PER_SIDE, RoundContext, RoundScore},
    strategy::EvDecision,
};

/// Let `profile`'s strategy pick an action for `side` and throw it.
///
/// The opening ball of a round is always pointed. The EV decision is only
/// present for monte carlo strategies.
///
/// # Panics
///
/// Panics if `side` has no balls left in the round.
///
/// ```
/// use petanque_sim::arena::{RoundContext, decide_and_act};
/// use petanque_sim::core::{PlayerProfile, Side};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(420);
/// let mut ctx = RoundContext::new(1, Side::A, 6);
/// let profile = PlayerProfile::default();
///
/// let (outcome, ev) = decide_and_act(Side::A, &mut ctx, &profile, &mut rng);
/// assert!(outcome.placed().is_some());
/// assert!(ev.is_none());
/// assert_eq!(5, ctx.balls_remaining.a);
/// ```
pub fn decide_and_act<R: Rng>(
    side: Side,
    ctx: &mut RoundContext,
    profile: &PlayerProfile,
    rng: &mut R,
) -> (ActionOutcome, Option<EvDecision>) {
    let record = Player::new(*profile).act(side, ctx, rng);
    (record.outcome, record.ev_decision)
}

/// Where an interactive match stands.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Balls are still being thrown.
    Playing,
    /// The round has been scored, waiting for the next one to start.
    RoundEnd(RoundScore),
    MatchEnd(Side),
}

/// A match that advances one throw at a time.
///
/// Either side can throw an action chosen by a person with
/// [`MatchSession::play`], or let its profile's strategy choose with
/// [`MatchSession::play_strategy`].
///
/// ```
/// use petanque_sim::arena::{Action, MatchSession, SessionStatus};
/// use petanque_sim::core::{PlayerProfile, Side};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut rng = StdRng::seed_from_u64(420);
/// let profile = PlayerProfile::default();
/// let mut session = MatchSession::with_first_thrower(profile, profile, Side::A);
///
/// while session.status() == SessionStatus::Playing {
///     match session.next_thrower() {
///         Some(Side::A) => session.play(Action::Point, &mut rng).unwrap(),
///         _ => session.play_strategy(&mut rng).unwrap(),
///     };
/// }
/// assert!(matches!(session.status(), SessionStatus::RoundEnd(_)));
/// session.start_next_round().unwrap();
/// assert_eq!(2, session.round().round_number);
/// ```
#[derive(Debug)]
pub struct MatchSession {
    players: PerSide<Player>,
    context: MatchContext,
    round: RoundContext,
    balls_per_side: u8,
    status: SessionStatus,
}

impl MatchSession {
    /// Start a match, picking the first thrower at random.
    pub fn new<R: Rng>(profile_a: PlayerProfile, profile_b: PlayerProfile, rng: &mut R) -> Self {
        let first = if rng.random() { Side::A } else { Side::B };
        Self::with_first_thrower(profile_a, profile_b, first)
    }

    pub fn with_first_thrower(
        profile_a: PlayerProfile,
        profile_b: PlayerProfile,
        first_thrower: Side,
    ) -> Self {
        let mut context = MatchContext::new();
        context.round_number = 1;
        Self {
            players: PerSide::new(Player::new(profile_a), Player::new(profile_b)),
            context,
            round: RoundContext::new(1, first_thrower, DEFAULT_BALLS_PER_SIDE),
            balls_per_side: DEFAULT_BALLS_PER_SIDE,
            status: SessionStatus::Playing,
        }
    }

    /// Balls each side throws per round, at least one. Meant to be set
    /// right after creating the session, it restarts the current round.
    pub fn balls_per_side(mut self, balls_per_side: u8) -> Self {
        self.balls_per_side = balls_per_side.max(1);
        self.round = RoundContext::new(
            self.round.round_number,
            self.round.first_thrower,
            self.balls_per_side,
        );
        self
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn score(&self) -> PerSide<u8> {
        self.context.score
    }

    pub fn round(&self) -> &RoundContext {
        &self.round
    }

    pub fn profile(&self, side: Side) -> &PlayerProfile {
        &self.players[side].profile
    }

    /// Who is up, `None` between rounds.
    pub fn next_thrower(&self) -> Option<Side> {
        match self.status {
            SessionStatus::Playing => self.round.current_thrower,
            _ => None,
        }
    }

    /// Throw `action` for whoever is up.
    pub fn play<R: Rng>(
        &mut self,
        action: Action,
        rng: &mut R,
    ) -> Result<ActionRecord, SimulationError> {
        let side = self.thrower()?;
        let record = self
            .round
            .throw(side, action, None, &self.players[side].profile, rng);
        self.after_throw();
        Ok(record)
    }

    /// Let the strategy of whoever is up choose and throw.
    pub fn play_strategy<R: Rng>(&mut self, rng: &mut R) -> Result<ActionRecord, SimulationError> {
        let side = self.thrower()?;
        let record = self.players[side].act(side, &mut self.round, rng);
        self.after_throw();
        Ok(record)
    }

    /// Begin the next round with the last round's winner throwing first.
    pub fn start_next_round(&mut self) -> Result<(), SimulationError> {
        let last = match self.status {
            SessionStatus::Playing => return Err(SimulationError::RoundInProgress),
            SessionStatus::MatchEnd(_) => return Err(SimulationError::MatchOver),
            SessionStatus::RoundEnd(score) => score,
        };
        self.context.round_number += 1;
        self.round = RoundContext::new(self.context.round_number, last.winner, self.balls_per_side);
        self.status = SessionStatus::Playing;
        Ok(())
    }

    fn thrower(&self) -> Result<Side, SimulationError> {
        match self.status {
            SessionStatus::RoundEnd(_) => Err(SimulationError::RoundOver),
            SessionStatus::MatchEnd(_) => Err(SimulationError::MatchOver),
            SessionStatus::Playing => self.round.current_thrower.ok_or(SimulationError::RoundOver),
        }
    }

    fn after_throw(&mut self) {
        if !self.round.is_complete() {
            return;
        }
        let score = self.round.score();
        self.context.record_round(&score);
        event!(
            tracing::Level::DEBUG,
            round = self.round.round_number,
            winner = ?score.winner,
            points = score.points,
            "Session round complete"
        );
        self.status = match self.context.winner() {
            Some(winner) => SessionStatus::MatchEnd(winner),
            None => SessionStatus::RoundEnd(score),
        };
    }
}
