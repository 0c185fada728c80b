//! `Strategy`s decide what a team does with its next ball. They are the
//! logic behind pointing or shooting.
//!
//! Some baseline strategies are provided along with a monte carlo expected
//! value strategy that simulates each choice before committing.
mod conditional;
mod monte_carlo;
mod pointing;
mod shooting;

use std::fmt;

use rand::RngCore;

use crate::core::{Ball, PlayerProfile, Side, StrategyKind};

use super::action::Action;

/// Everything a strategy may look at before throwing.
#[derive(Debug, Clone, Copy)]
pub struct TurnView<'a> {
    pub side: Side,
    pub own: &'a [Ball],
    pub opponent: &'a [Ball],
    /// Shots this side has missed so far in the round.
    pub misses: u32,
    pub profile: &'a PlayerProfile,
}

/// The audit trail of a monte carlo decision.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvDecision {
    pub chosen: Action,
    pub point_ev: f64,
    pub shoot_ev: f64,
}

impl EvDecision {
    /// How much better the chosen action looked.
    pub fn delta(&self) -> f64 {
        (self.point_ev - self.shoot_ev).abs()
    }

    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EvDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pointing EV: {:.2} | Shooting EV: {:.2}",
            self.point_ev, self.shoot_ev
        )
    }
}

/// The action a strategy settled on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub ev: Option<EvDecision>,
}

impl Decision {
    pub fn new(action: Action) -> Self {
        Self { action, ev: None }
    }
}

/// This is the trait that you need to implement in order to implement
/// different throwing policies.
///
/// The rng is passed in rather than owned so that a whole match can be
/// replayed from a single seed.
pub trait Strategy {
    /// Called by the round whenever it's this side's turn.
    fn decide(&mut self, view: &TurnView<'_>, rng: &mut dyn RngCore) -> Decision;
}

/// Build the strategy a profile asks for.
pub fn build_strategy(kind: StrategyKind) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::AlwaysPoint => Box::new(PointingStrategy),
        StrategyKind::AlwaysShoot => Box::new(ShootingStrategy),
        StrategyKind::ConditionalShoot {
            threshold,
            max_misses,
        } => Box::new(ConditionalStrategy::new(threshold, max_misses)),
        StrategyKind::MonteCarloEv { simulations } => {
            Box::new(MonteCarloEvStrategy::new(simulations))
        }
    }
}

pub use conditional::ConditionalStrategy;
pub use monte_carlo::{MonteCarloEvStrategy, SHOOT_SENTINEL_EV};
pub use pointing::PointingStrategy;
pub use shooting::ShootingStrategy;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_format() {
        let ev = EvDecision {
            chosen: Action::Shoot,
            point_ev: -4.5,
            shoot_ev: 7.126,
        };
        assert_eq!("Pointing EV: -4.50 | Shooting EV: 7.13", ev.reason());
        approx::assert_relative_eq!(11.626, ev.delta(), epsilon = 1e-9);
    }
}
