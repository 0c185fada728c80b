use rand::RngCore;

use crate::arena::action::Action;

use super::{Decision, Strategy, TurnView};

/// A strategy that never shoots.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointingStrategy;

impl Strategy for PointingStrategy {
    fn decide(&mut self, _view: &TurnView<'_>, _rng: &mut dyn RngCore) -> Decision {
        Decision::new(Action::Point)
    }
}
