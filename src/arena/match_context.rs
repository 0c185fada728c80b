use crate::core::{PerSide, Side};

use super::round_context::RoundScore;

/// Points needed to take a match. Scores never go past it.
pub const WINNING_SCORE: u8 = 13;

/// The running state of a match between rounds.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchContext {
    pub score: PerSide<u8>,
    /// Number of rounds started so far.
    pub round_number: u32,
    pub last_round_winner: Option<Side>,
}

impl MatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished round into the match.
    ///
    /// ```
    /// use petanque_sim::arena::{MatchContext, RoundScore};
    /// use petanque_sim::core::Side;
    ///
    /// let mut ctx = MatchContext::new();
    /// ctx.score.b = 11;
    /// ctx.record_round(&RoundScore { winner: Side::B, points: 4 });
    /// assert_eq!(13, ctx.score.b);
    /// assert_eq!(Some(Side::B), ctx.winner());
    /// ```
    pub fn record_round(&mut self, round: &RoundScore) {
        let score = &mut self.score[round.winner];
        *score = score.saturating_add(round.points).min(WINNING_SCORE);
        self.last_round_winner = Some(round.winner);
    }

    pub fn is_complete(&self) -> bool {
        self.winner().is_some()
    }

    pub fn winner(&self) -> Option<Side> {
        Side::sides()
            .into_iter()
            .find(|side| self.score[*side] >= WINNING_SCORE)
    }

    /// Winner's score minus loser's score, positive when A is ahead.
    pub fn score_gap(&self) -> i32 {
        i32::from(self.score.a) - i32::from(self.score.b)
    }
}
