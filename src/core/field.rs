use std::fmt;

use super::side::{PerSide, Side};

/// A thrown boule resting on the terrain.
///
/// Distance is measured to the jack, lower is better. Balls never move once
/// placed. They can only be removed by a shot.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub distance: f64,
    pub owner: Side,
}

impl Ball {
    pub fn new(distance: f64, owner: Side) -> Self {
        Self { distance, owner }
    }
}

impl fmt::Display for Ball {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:.1}", self.owner, self.distance)
    }
}

/// The closest ball in `balls`, if any.
pub fn closest(balls: &[Ball]) -> Option<&Ball> {
    balls
        .iter()
        .min_by(|l, r| l.distance.total_cmp(&r.distance))
}

/// Distance of the closest ball in `balls`, infinity when empty.
pub fn best_distance(balls: &[Ball]) -> f64 {
    closest(balls).map_or(f64::INFINITY, |b| b.distance)
}

/// All of the balls currently in play, split by owner.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldState {
    balls: PerSide<Vec<Ball>>,
}

impl FieldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a field from existing per side balls.
    ///
    /// ```
    /// use petanque_sim::core::{Ball, FieldState, Side};
    ///
    /// let field = FieldState::from_balls(
    ///     vec![Ball::new(12.0, Side::A)],
    ///     vec![Ball::new(30.0, Side::B), Ball::new(8.0, Side::B)],
    /// );
    /// assert_eq!(Some(Side::B), field.holding_side());
    /// assert_eq!(8.0, field.best_distance(Side::B));
    /// ```
    pub fn from_balls(a: Vec<Ball>, b: Vec<Ball>) -> Self {
        Self {
            balls: PerSide::new(a, b),
        }
    }

    pub fn balls(&self, side: Side) -> &[Ball] {
        &self.balls[side]
    }

    /// The balls belonging to `side` followed by the opponent's balls.
    pub fn own_and_opponent(&self, side: Side) -> (&[Ball], &[Ball]) {
        (&self.balls[side], &self.balls[side.opponent()])
    }

    /// Replace both sides' balls, the first vec belonging to `side`.
    pub fn replace(&mut self, side: Side, own: Vec<Ball>, opponent: Vec<Ball>) {
        let (own_slot, opp_slot) = self.balls.split_mut(side);
        *own_slot = own;
        *opp_slot = opponent;
    }

    pub fn best_distance(&self, side: Side) -> f64 {
        best_distance(&self.balls[side])
    }

    /// Closest distance for each side, `None` for an empty side.
    pub fn best_distances(&self) -> PerSide<Option<f64>> {
        PerSide::from_fn(|side| closest(&self.balls[side]).map(|b| b.distance))
    }

    /// The side currently holding the point, `None` if the closest
    /// distances are exactly tied (including an empty field).
    pub fn holding_side(&self) -> Option<Side> {
        let best_a = self.best_distance(Side::A);
        let best_b = self.best_distance(Side::B);
        if best_a < best_b {
            Some(Side::A)
        } else if best_b < best_a {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Number of balls `side` has strictly closer than the opponent's best.
    /// With no opposing ball every ball counts.
    pub fn count_closer_than_opponent(&self, side: Side) -> usize {
        let cutoff = self.best_distance(side.opponent());
        self.balls[side]
            .iter()
            .filter(|b| b.distance < cutoff)
            .count()
    }

    pub fn len(&self) -> usize {
        self.balls.a.len() + self.balls.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
