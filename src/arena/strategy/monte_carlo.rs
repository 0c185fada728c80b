use rand::{RngCore, SeedableRng, rngs::StdRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::event;

use crate::arena::{action::Action, action_model::apply_action, evaluator::evaluate};

use super::{Decision, EvDecision, Strategy, TurnView};

/// The shooting EV reported when there is nothing to shoot at. Pointing onto
/// a field with no opposing ball always evaluates above zero.
pub const SHOOT_SENTINEL_EV: f64 = -99.0;

/// Below this many roll-outs it's cheaper to stay on the current thread.
#[cfg(feature = "parallel")]
const PARALLEL_ROLLOUTS: usize = 512;

/// One ply of sampled expectimax.
///
/// For both pointing and shooting the strategy throws `simulations`
/// hypothetical balls on private copies of the field, scores each resulting
/// field with [`evaluate`], and averages. The action with the strictly higher
/// average is chosen, pointing wins ties.
///
/// Every roll-out is seeded from the caller's rng up front, so the decision
/// is the same whether roll-outs run serially or across threads.
#[derive(Debug, Clone, Copy)]
pub struct MonteCarloEvStrategy {
    simulations: usize,
}

impl MonteCarloEvStrategy {
    pub fn new(simulations: usize) -> Self {
        Self {
            simulations: simulations.max(1),
        }
    }

    /// Run the roll-outs for both actions and return the full decision.
    pub fn evaluate_actions(&self, view: &TurnView<'_>, rng: &mut dyn RngCore) -> EvDecision {
        let point_ev = self.expected_value(Action::Point, view, rng);
        if view.opponent.is_empty() {
            return EvDecision {
                chosen: Action::Point,
                point_ev,
                shoot_ev: SHOOT_SENTINEL_EV,
            };
        }
        let shoot_ev = self.expected_value(Action::Shoot, view, rng);

        let chosen = if shoot_ev > point_ev {
            Action::Shoot
        } else {
            Action::Point
        };

        EvDecision {
            chosen,
            point_ev,
            shoot_ev,
        }
    }

    fn expected_value(&self, action: Action, view: &TurnView<'_>, rng: &mut dyn RngCore) -> f64 {
        let seeds: Vec<u64> = (0..self.simulations).map(|_| rng.next_u64()).collect();

        let rollout = |seed: &u64| {
            let mut rollout_rng = StdRng::seed_from_u64(*seed);
            let res = apply_action(
                action,
                view.side,
                view.own,
                view.opponent,
                view.profile,
                &mut rollout_rng,
            );
            evaluate(&res.own, &res.opponent)
        };

        #[cfg(feature = "parallel")]
        let values: Vec<f64> = if seeds.len() >= PARALLEL_ROLLOUTS {
            seeds.par_iter().map(rollout).collect()
        } else {
            seeds.iter().map(rollout).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let values: Vec<f64> = seeds.iter().map(rollout).collect();

        // Summed in order so the result doesn't depend on thread scheduling.
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl Default for MonteCarloEvStrategy {
    fn default() -> Self {
        Self::new(crate::core::DEFAULT_EV_SIMULATIONS)
    }
}

impl Strategy for MonteCarloEvStrategy {
    fn decide(&mut self, view: &TurnView<'_>, rng: &mut dyn RngCore) -> Decision {
        let ev = self.evaluate_actions(view, rng);
        event!(
            tracing::Level::DEBUG,
            side = ?view.side,
            point_ev = ev.point_ev,
            shoot_ev = ev.shoot_ev,
            chosen = ?ev.chosen,
            "Monte carlo decision"
        );
        Decision {
            action: ev.chosen,
            ev: Some(ev),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{Ball, PlayerProfile, Side, StrategyKind};

    use super::*;

    fn profile(hit_rate: f64, stay_rate: f64) -> PlayerProfile {
        PlayerProfile::builder()
            .point_mean(50.0)
            .point_std_dev(20.0)
            .hit_rate(hit_rate)
            .stay_rate(stay_rate)
            .strategy(StrategyKind::monte_carlo())
            .build()
            .unwrap()
    }

    #[test_log::test]
    fn test_empty_opponent_always_points() {
        let profile = profile(1.0, 1.0);
        let own = [Ball::new(70.0, Side::B)];
        let view = TurnView {
            side: Side::B,
            own: &own,
            opponent: &[],
            misses: 0,
            profile: &profile,
        };
        let mut strategy = MonteCarloEvStrategy::new(5);
        let mut rng = StdRng::seed_from_u64(420);
        for _ in 0..1_000 {
            let decision = strategy.decide(&view, &mut rng);
            assert_eq!(Action::Point, decision.action);
            let ev = decision.ev.unwrap();
            assert_eq!(SHOOT_SENTINEL_EV, ev.shoot_ev);
            assert!(ev.point_ev > ev.shoot_ev);
        }
    }

    #[test]
    fn test_reason_with_nothing_to_shoot() {
        let profile = profile(0.5, 0.2);
        let own = [Ball::new(30.0, Side::A)];
        let view = TurnView {
            side: Side::A,
            own: &own,
            opponent: &[],
            misses: 0,
            profile: &profile,
        };
        let ev =
            MonteCarloEvStrategy::new(10).evaluate_actions(&view, &mut StdRng::seed_from_u64(1));

        assert_eq!(Action::Point, ev.chosen);
        let reason = ev.reason();
        assert!(reason.ends_with("| Shooting EV: -99.00"), "{reason}");
        assert!(reason.len() < 50, "{reason}");
        assert!(ev.delta() < 200.0);
    }

    #[test_log::test]
    fn test_shoots_a_dominant_ball_with_perfect_accuracy() {
        // The opponent holds a ball right on the jack, pointing at mean 50
        // almost never beats it but a perfect shot always clears it.
        let profile = profile(1.0, 0.0);
        let opp = [Ball::new(1.0, Side::A)];
        let own = [Ball::new(30.0, Side::B)];
        let view = TurnView {
            side: Side::B,
            own: &own,
            opponent: &opp,
            misses: 0,
            profile: &profile,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let decision = MonteCarloEvStrategy::new(30).decide(&view, &mut rng);
        assert_eq!(Action::Shoot, decision.action);
        let ev = decision.ev.unwrap();
        assert!(ev.shoot_ev > ev.point_ev);
        assert!(ev.reason().starts_with("Pointing EV:"));
    }

    #[test_log::test]
    fn test_never_shoots_when_always_missing() {
        let profile = profile(0.0, 0.0);
        let opp = [Ball::new(1.0, Side::A)];
        let view = TurnView {
            side: Side::B,
            own: &[],
            opponent: &opp,
            misses: 0,
            profile: &profile,
        };
        let mut rng = StdRng::seed_from_u64(8);
        let mut strategy = MonteCarloEvStrategy::new(30);
        for _ in 0..200 {
            // A miss leaves the field unchanged while a point can only help,
            // so the pointing average is never below the shooting one.
            assert_eq!(Action::Point, strategy.decide(&view, &mut rng).action);
        }
    }

    #[test]
    fn test_same_seed_same_decision() {
        let profile = profile(0.6, 0.2);
        let opp = [Ball::new(20.0, Side::A), Ball::new(45.0, Side::A)];
        let own = [Ball::new(35.0, Side::B)];
        let view = TurnView {
            side: Side::B,
            own: &own,
            opponent: &opp,
            misses: 0,
            profile: &profile,
        };
        let strategy = MonteCarloEvStrategy::new(1_000);
        let first = strategy.evaluate_actions(&view, &mut StdRng::seed_from_u64(5));
        let second = strategy.evaluate_actions(&view, &mut StdRng::seed_from_u64(5));
        assert_eq!(first, second);
    }
}
