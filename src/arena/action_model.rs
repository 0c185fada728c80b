use rand::Rng;
use tracing::event;

use crate::core::{Ball, PlayerProfile, Side, sample_distance, sample_stay_distance};

use super::action::{Action, ActionOutcome};

/// The field after one throw, seen from the thrower's side.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub own: Vec<Ball>,
    pub opponent: Vec<Ball>,
    pub outcome: ActionOutcome,
}

/// Throw one ball for `side`.
///
/// The inputs are never modified, the new field is returned. This is what
/// lets strategies run hypothetical throws on copies of the live field.
///
/// Shooting at an empty opposing field is a point. That is not an error.
///
/// Ball counting is left to the caller.
pub fn apply_action<R: Rng + ?Sized>(
    action: Action,
    side: Side,
    own: &[Ball],
    opponent: &[Ball],
    profile: &PlayerProfile,
    rng: &mut R,
) -> ActionResult {
    let result = match action {
        Action::Point => point(side, own, opponent, profile, false, rng),
        Action::Shoot => shoot(side, own, opponent, profile, rng),
    };
    event!(
        tracing::Level::TRACE,
        ?side,
        ?action,
        outcome = ?result.outcome.kind(),
        "Applied action"
    );
    result
}

fn point<R: Rng + ?Sized>(
    side: Side,
    own: &[Ball],
    opponent: &[Ball],
    profile: &PlayerProfile,
    fallback: bool,
    rng: &mut R,
) -> ActionResult {
    let distance = sample_distance(rng, profile.point_mean(), profile.point_std_dev());
    let placed = Ball::new(distance, side);

    let mut own = own.to_vec();
    own.push(placed);

    ActionResult {
        own,
        opponent: opponent.to_vec(),
        outcome: ActionOutcome::Point { placed, fallback },
    }
}

fn shoot<R: Rng + ?Sized>(
    side: Side,
    own: &[Ball],
    opponent: &[Ball],
    profile: &PlayerProfile,
    rng: &mut R,
) -> ActionResult {
    // Always aim at the opposing ball closest to the jack.
    let Some((target_idx, target)) = opponent
        .iter()
        .copied()
        .enumerate()
        .min_by(|(_, l), (_, r)| l.distance.total_cmp(&r.distance))
    else {
        return point(side, own, opponent, profile, true, rng);
    };

    let probs = profile.shot_probabilities();
    let roll: f64 = rng.random();

    if roll < probs.miss {
        return ActionResult {
            own: own.to_vec(),
            opponent: opponent.to_vec(),
            outcome: ActionOutcome::ShootMiss { target },
        };
    }

    let mut remaining = opponent.to_vec();
    remaining.swap_remove(target_idx);

    if roll < probs.miss + probs.clear {
        ActionResult {
            own: own.to_vec(),
            opponent: remaining,
            outcome: ActionOutcome::ShootClear { target },
        }
    } else {
        let placed = Ball::new(sample_stay_distance(rng, target.distance), side);
        let mut own = own.to_vec();
        own.push(placed);
        ActionResult {
            own,
            opponent: remaining,
            outcome: ActionOutcome::ShootStay { target, placed },
        }
    }
}
