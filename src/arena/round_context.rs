use rand::Rng;

use crate::core::{FieldState, PerSide, PlayerProfile, Side};

use super::{
    action::{Action, ActionRecord},
    action_model::apply_action,
    strategy::{EvDecision, TurnView},
};

/// Balls each side throws per round unless configured otherwise.
pub const DEFAULT_BALLS_PER_SIDE: u8 = 6;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// No ball has been thrown yet.
    AwaitingFirstThrow,
    Alternating,
    /// Both sides are out of balls.
    Complete,
}

/// Who took the round and for how much.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundScore {
    pub winner: Side,
    pub points: u8,
}

/// Everything about the round in progress.
///
/// It's created empty at the start of a round, changed one throw at a time
/// by [`RoundContext::throw`], and thrown away once the round is scored.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RoundContext {
    pub round_number: u32,
    pub phase: RoundPhase,
    pub balls_remaining: PerSide<u8>,
    pub field: FieldState,
    /// Shots that missed entirely, per side.
    pub misses: PerSide<u32>,
    pub first_thrower: Side,
    pub last_thrower: Option<Side>,
    /// Who throws next, `None` once the round is complete.
    pub current_thrower: Option<Side>,
}

impl RoundContext {
    pub fn new(round_number: u32, first_thrower: Side, balls_per_side: u8) -> Self {
        let phase = if balls_per_side == 0 {
            RoundPhase::Complete
        } else {
            RoundPhase::AwaitingFirstThrow
        };
        let mut ctx = Self {
            round_number,
            phase,
            balls_remaining: PerSide::splat(balls_per_side),
            field: FieldState::new(),
            misses: PerSide::default(),
            first_thrower,
            last_thrower: None,
            current_thrower: None,
        };
        ctx.current_thrower = ctx.next_thrower();
        ctx
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RoundPhase::Complete
    }

    /// Work out whose turn it is.
    ///
    /// The side that isn't holding the point throws. A side that's out of
    /// balls is skipped so the other throws the rest of its balls. If
    /// neither side holds the point the last thrower goes again.
    pub fn next_thrower(&self) -> Option<Side> {
        match (self.balls_remaining.a, self.balls_remaining.b) {
            (0, 0) => return None,
            (0, _) => return Some(Side::B),
            (_, 0) => return Some(Side::A),
            _ => {}
        }
        if self.phase == RoundPhase::AwaitingFirstThrow {
            return Some(self.first_thrower);
        }
        match self.field.holding_side() {
            Some(holder) => Some(holder.opponent()),
            None => Some(self.last_thrower.unwrap_or(self.first_thrower)),
        }
    }

    /// What a strategy for `side` gets to look at.
    pub fn view<'a>(&'a self, side: Side, profile: &'a PlayerProfile) -> TurnView<'a> {
        let (own, opponent) = self.field.own_and_opponent(side);
        TurnView {
            side,
            own,
            opponent,
            misses: self.misses[side],
            profile,
        }
    }

    /// Throw one ball for `side` and advance the round.
    ///
    /// # Panics
    ///
    /// Panics if `side` has no balls left. Only the round decides whose turn
    /// it is so this is a caller bug.
    pub fn throw<R: Rng + ?Sized>(
        &mut self,
        side: Side,
        action: Action,
        ev_decision: Option<EvDecision>,
        profile: &PlayerProfile,
        rng: &mut R,
    ) -> ActionRecord {
        assert!(
            self.balls_remaining[side] > 0,
            "Side {side} has no balls left to throw"
        );

        let best_before = self.field.best_distances();
        let (own, opponent) = self.field.own_and_opponent(side);
        let result = apply_action(action, side, own, opponent, profile, rng);
        let outcome = result.outcome;

        self.field.replace(side, result.own, result.opponent);
        self.balls_remaining[side] -= 1;
        if outcome.is_miss() {
            self.misses[side] += 1;
        }
        self.last_thrower = Some(side);
        self.phase = if self.balls_remaining.a == 0 && self.balls_remaining.b == 0 {
            RoundPhase::Complete
        } else {
            RoundPhase::Alternating
        };
        self.current_thrower = self.next_thrower();

        ActionRecord {
            round_number: self.round_number,
            side,
            action,
            outcome,
            description: outcome.description(),
            ev_decision,
            best_before,
            best_after: self.field.best_distances(),
        }
    }

    /// Score the field as it stands.
    ///
    /// The side with the closest ball scores one point for every ball closer
    /// than the opponent's best. On an exact tie, including an empty field,
    /// nothing is strictly closer so the last thrower takes the round for no
    /// points. Neither side is favoured: either one can end up starting the
    /// next round after a dead end.
    pub fn score(&self) -> RoundScore {
        let winner = self
            .field
            .holding_side()
            .or(self.last_thrower)
            .unwrap_or(self.first_thrower);
        let points = self.field.count_closer_than_opponent(winner);
        RoundScore {
            winner,
            points: u8::try_from(points).unwrap_or(u8::MAX),
        }
    }
}
