use std::fmt;

use crate::core::{Ball, PerSide, Side};

use super::strategy::EvDecision;

/// The two things a player can do with a ball.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Point,
    Shoot,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Point => write!(f, "point"),
            Action::Shoot => write!(f, "shoot"),
        }
    }
}

/// The shape of an outcome without its payload.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Point,
    ShootMiss,
    ShootClear,
    ShootStay,
}

/// What happened when a ball was thrown.
///
/// Each variant carries the balls it added or removed, which is everything
/// that changed on the field apart from the thrower's ball count.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionOutcome {
    /// A new ball was placed. `fallback` is set when a shot was asked for
    /// but there was nothing to shoot at.
    Point { placed: Ball, fallback: bool },
    ShootMiss { target: Ball },
    ShootClear { target: Ball },
    /// Carreau: the target is gone and the shooter's ball replaced it.
    ShootStay { target: Ball, placed: Ball },
}

impl ActionOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            ActionOutcome::Point { .. } => OutcomeKind::Point,
            ActionOutcome::ShootMiss { .. } => OutcomeKind::ShootMiss,
            ActionOutcome::ShootClear { .. } => OutcomeKind::ShootClear,
            ActionOutcome::ShootStay { .. } => OutcomeKind::ShootStay,
        }
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, ActionOutcome::ShootMiss { .. })
    }

    /// The ball added to the thrower's side, if any.
    pub fn placed(&self) -> Option<&Ball> {
        match self {
            ActionOutcome::Point { placed, .. } | ActionOutcome::ShootStay { placed, .. } => {
                Some(placed)
            }
            _ => None,
        }
    }

    /// The opposing ball knocked out, if any.
    pub fn removed(&self) -> Option<&Ball> {
        match self {
            ActionOutcome::ShootClear { target } | ActionOutcome::ShootStay { target, .. } => {
                Some(target)
            }
            _ => None,
        }
    }

    /// Human readable description for logs and playback.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Point {
                placed,
                fallback: false,
            } => write!(f, "Pointed, landed {:.1} from the jack", placed.distance),
            ActionOutcome::Point {
                placed,
                fallback: true,
            } => write!(
                f,
                "Nothing to shoot at, pointed instead, landed {:.1} from the jack",
                placed.distance
            ),
            ActionOutcome::ShootMiss { .. } => write!(f, "Shot and missed"),
            ActionOutcome::ShootClear { target } => {
                write!(f, "Shot and cleared the ball at {:.1}", target.distance)
            }
            ActionOutcome::ShootStay { target, placed } => write!(
                f,
                "Carreau! Cleared the ball at {:.1} and stayed at {:.1}",
                target.distance, placed.distance
            ),
        }
    }
}

/// A record of a single throw in a round, as seen by historians.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord {
    pub round_number: u32,
    pub side: Side,
    /// What the strategy asked for. The outcome can still be a point when a
    /// shot had no target.
    pub action: Action,
    pub outcome: ActionOutcome,
    pub description: String,
    /// Only set for monte carlo decisions.
    pub ev_decision: Option<EvDecision>,
    pub best_before: PerSide<Option<f64>>,
    pub best_after: PerSide<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let target = Ball::new(20.0, Side::B);
        let placed = Ball::new(35.5, Side::A);
        let stay = ActionOutcome::ShootStay { target, placed };

        assert_eq!(OutcomeKind::ShootStay, stay.kind());
        assert_eq!(Some(&placed), stay.placed());
        assert_eq!(Some(&target), stay.removed());
        assert!(!stay.is_miss());
        assert_eq!(
            "Carreau! Cleared the ball at 20.0 and stayed at 35.5",
            stay.description()
        );

        let miss = ActionOutcome::ShootMiss { target };
        assert!(miss.is_miss());
        assert_eq!(None, miss.placed());
        assert_eq!(None, miss.removed());
    }

    #[test]
    fn test_fallback_description() {
        let outcome = ActionOutcome::Point {
            placed: Ball::new(12.25, Side::B),
            fallback: true,
        };
        assert!(outcome.description().starts_with("Nothing to shoot at"));
    }
}
