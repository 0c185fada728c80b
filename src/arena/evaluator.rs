use crate::core::{Ball, FieldState, Side, best_distance};

/// Score per ball that would currently count.
const POINT_WEIGHT: f64 = 10.0;
/// Bonus per unit the holding ball is inside this radius.
const PROXIMITY_RADIUS: f64 = 100.0;
const PROXIMITY_WEIGHT: f64 = 0.05;

/// Heuristic value of a field from the point of view of the owner of `own`.
///
/// The side holding the point scores ten per ball that would count if the
/// round ended now, plus a small bonus for how close its best ball is. The
/// result is positive when `own` is holding and negative otherwise. It's a
/// ranking signal only, the absolute value means nothing.
///
/// ```
/// use petanque_sim::arena::evaluate;
/// use petanque_sim::core::{Ball, Side};
///
/// let own = vec![Ball::new(10.0, Side::A), Ball::new(20.0, Side::A)];
/// let opp = vec![Ball::new(30.0, Side::B)];
/// // Two counting balls and (100 - 10) * 0.05 = 4.5
/// assert_eq!(24.5, evaluate(&own, &opp));
/// assert_eq!(-24.5, evaluate(&opp, &own));
/// ```
pub fn evaluate(own: &[Ball], opponent: &[Ball]) -> f64 {
    let best_own = best_distance(own);
    let best_opp = best_distance(opponent);

    if best_own < best_opp {
        holding_score(own, best_own, best_opp)
    } else {
        -holding_score(opponent, best_opp, best_own)
    }
}

/// [`evaluate`] for `side` on a whole field.
pub fn evaluate_field(side: Side, field: &FieldState) -> f64 {
    let (own, opponent) = field.own_and_opponent(side);
    evaluate(own, opponent)
}

fn holding_score(holder: &[Ball], best: f64, cutoff: f64) -> f64 {
    let points = holder.iter().filter(|b| b.distance < cutoff).count() as f64;
    points * POINT_WEIGHT + (PROXIMITY_RADIUS - best.min(PROXIMITY_RADIUS)) * PROXIMITY_WEIGHT
}
