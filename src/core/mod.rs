//! This is the core module. It exports the data the engine works on:
//! teams, balls on the terrain, validated player profiles, and the random
//! draws used to throw.

/// side.rs has the two teams and per team storage.
mod side;
/// Re-export Side and PerSide
pub use self::side::{PerSide, Side};

/// Balls and the terrain they sit on.
mod field;
pub use self::field::{Ball, FieldState, best_distance, closest};

/// Player accuracy profiles and strategy selection.
mod profile;
pub use self::profile::*;

/// Throw distance and carreau displacement sampling.
mod variate;
pub use self::variate::{STAY_DISPLACEMENT, normal_density, sample_distance, sample_stay_distance};

/// Validation errors.
mod error;
pub use self::error::ProfileError;
