use thiserror::Error;

/// Errors raised while building a [`PlayerProfile`](super::PlayerProfile).
///
/// Every variant names the offending field so a configuration surface can
/// point the user at the exact input that was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be between 0 and 1, got {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("{field} can not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be greater than zero, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("Monte carlo strategies need at least one simulation per action")]
    ZeroSimulations,
}
