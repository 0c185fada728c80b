use thiserror::Error;

use crate::core::ProfileError;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Both sides need a player profile")]
    NeedProfiles,
    #[error("Each side needs at least one ball")]
    ZeroBalls,
    #[error("No winner after {rounds} rounds")]
    RoundLimitReached { rounds: u32 },
    #[error("The round is over, start the next round first")]
    RoundOver,
    #[error("The current round hasn't finished")]
    RoundInProgress,
    #[error("The match is over")]
    MatchOver,
    #[error("Invalid profile: {0}")]
    Profile(#[from] ProfileError),
    #[cfg(feature = "parallel")]
    #[error("Unable to build the worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
