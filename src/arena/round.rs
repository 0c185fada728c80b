use rand::Rng;
use tracing::{event, trace_span};

use crate::core::{PerSide, Side};

use super::{
    action::ActionRecord,
    player::Player,
    round_context::{RoundContext, RoundPhase, RoundScore},
};

/// One end of a match: both sides throw every ball, then the field is
/// scored.
///
/// The round moves `AwaitingFirstThrow -> Alternating -> Complete`. The
/// round decides whose turn it is, the players only decide what to throw.
#[derive(Debug, Clone)]
pub struct RoundSimulation {
    pub context: RoundContext,
}

impl RoundSimulation {
    pub fn new(round_number: u32, first_thrower: Side, balls_per_side: u8) -> Self {
        Self {
            context: RoundContext::new(round_number, first_thrower, balls_per_side),
        }
    }

    pub fn more_throws(&self) -> bool {
        self.context.phase != RoundPhase::Complete
    }

    /// Throw the next ball. Returns `None` once the round is complete.
    pub fn step<R: Rng>(
        &mut self,
        players: &mut PerSide<Player>,
        rng: &mut R,
    ) -> Option<ActionRecord> {
        let side = self.context.current_thrower?;
        Some(players[side].act(side, &mut self.context, rng))
    }

    /// Play the round out, handing every throw to `on_action`.
    pub fn run<R: Rng>(
        &mut self,
        players: &mut PerSide<Player>,
        rng: &mut R,
        mut on_action: impl FnMut(&ActionRecord),
    ) -> RoundScore {
        let span = trace_span!("RoundSimulation::run", round = self.context.round_number);
        let _enter = span.enter();

        while let Some(record) = self.step(players, rng) {
            on_action(&record);
        }

        let score = self.context.score();
        event!(
            tracing::Level::DEBUG,
            round = self.context.round_number,
            winner = ?score.winner,
            points = score.points,
            "Round complete"
        );
        score
    }
}
