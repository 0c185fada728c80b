use rand::RngCore;

use crate::arena::action::Action;

use super::{Decision, Strategy, TurnView};

/// A strategy that shoots whenever the opponent has a ball down.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShootingStrategy;

impl Strategy for ShootingStrategy {
    fn decide(&mut self, view: &TurnView<'_>, _rng: &mut dyn RngCore) -> Decision {
        if view.opponent.is_empty() {
            Decision::new(Action::Point)
        } else {
            Decision::new(Action::Shoot)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::core::{Ball, PlayerProfile, Side};

    use super::*;

    #[test]
    fn test_shoots_only_with_target() {
        let profile = PlayerProfile::default();
        let mut rng = StdRng::seed_from_u64(0);
        let opp = [Ball::new(90.0, Side::A)];

        let mut view = TurnView {
            side: Side::B,
            own: &[],
            opponent: &[],
            misses: 5,
            profile: &profile,
        };
        assert_eq!(Action::Point, ShootingStrategy.decide(&view, &mut rng).action);

        view.opponent = &opp;
        assert_eq!(Action::Shoot, ShootingStrategy.decide(&view, &mut rng).action);
    }
}
