use rand::Rng;

use crate::core::{PlayerProfile, Side};

use super::{
    action::{Action, ActionRecord},
    round_context::{RoundContext, RoundPhase},
    strategy::{Decision, Strategy, build_strategy},
};

/// A profile paired with the strategy it selected.
pub struct Player {
    pub profile: PlayerProfile,
    strategy: Box<dyn Strategy>,
}

impl Player {
    pub fn new(profile: PlayerProfile) -> Self {
        Self {
            strategy: build_strategy(profile.strategy()),
            profile,
        }
    }

    /// Use a custom strategy instead of the one named by the profile.
    pub fn with_strategy(profile: PlayerProfile, strategy: Box<dyn Strategy>) -> Self {
        Self { profile, strategy }
    }

    /// Ask the strategy what to do. The opening ball of a round is always
    /// pointed since there's nothing to shoot at yet.
    pub fn decide<R: Rng>(&mut self, side: Side, ctx: &RoundContext, rng: &mut R) -> Decision {
        if ctx.phase == RoundPhase::AwaitingFirstThrow {
            return Decision::new(Action::Point);
        }
        let view = ctx.view(side, &self.profile);
        self.strategy.decide(&view, rng)
    }

    /// Decide and throw one ball for `side`.
    pub fn act<R: Rng>(&mut self, side: Side, ctx: &mut RoundContext, rng: &mut R) -> ActionRecord {
        let decision = self.decide(side, ctx, rng);
        ctx.throw(side, decision.action, decision.ev, &self.profile, rng)
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}
