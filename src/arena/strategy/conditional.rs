use rand::RngCore;

use crate::{arena::action::Action, core::best_distance};

use super::{Decision, Strategy, TurnView};

/// Shoot at threatening balls, but give up after too many misses.
///
/// The strategy shoots when the opponent's closest ball is nearer than
/// `threshold` and the side has missed fewer than `max_misses` shots this
/// round. Otherwise it points.
#[derive(Debug, Clone, Copy)]
pub struct ConditionalStrategy {
    threshold: f64,
    max_misses: u32,
}

impl ConditionalStrategy {
    pub fn new(threshold: f64, max_misses: u32) -> Self {
        Self {
            threshold,
            max_misses,
        }
    }
}

impl Strategy for ConditionalStrategy {
    fn decide(&mut self, view: &TurnView<'_>, _rng: &mut dyn RngCore) -> Decision {
        // An empty opposing field is infinitely far away so this also covers
        // having nothing to shoot at.
        if best_distance(view.opponent) < self.threshold && view.misses < self.max_misses {
            Decision::new(Action::Shoot)
        } else {
            Decision::new(Action::Point)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::core::{Ball, PlayerProfile, Side};

    use super::*;

    fn decide(opp: &[Ball], misses: u32) -> Action {
        let profile = PlayerProfile::default();
        let view = TurnView {
            side: Side::A,
            own: &[],
            opponent: opp,
            misses,
            profile: &profile,
        };
        let mut rng = StdRng::seed_from_u64(0);
        ConditionalStrategy::new(50.0, 2)
            .decide(&view, &mut rng)
            .action
    }

    #[test]
    fn test_shoots_close_balls() {
        let opp = [Ball::new(80.0, Side::B), Ball::new(20.0, Side::B)];
        assert_eq!(Action::Shoot, decide(&opp, 0));
        assert_eq!(Action::Shoot, decide(&opp, 1));
    }

    #[test]
    fn test_stops_after_max_misses() {
        let opp = [Ball::new(20.0, Side::B)];
        assert_eq!(Action::Point, decide(&opp, 2));
        assert_eq!(Action::Point, decide(&opp, 3));
    }

    #[test]
    fn test_ignores_far_and_missing_balls() {
        assert_eq!(Action::Point, decide(&[Ball::new(50.0, Side::B)], 0));
        assert_eq!(Action::Point, decide(&[], 0));
    }
}
