use thiserror::Error;

use crate::core::{FieldState, PerSide, Side};

use super::{action::ActionRecord, round_context::RoundScore};

/// HistorianError is the error type for historian implementations.
#[derive(Error, Debug)]
pub enum HistorianError {
    #[error("Unable to record event")]
    UnableToRecordEvent,
    #[error("Borrow Mut Error: {0}")]
    BorrowMutError(#[from] std::cell::BorrowMutError),
}

/// Something that happened during a match.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum MatchEvent {
    RoundStart {
        round_number: u32,
        first_thrower: Side,
        score: PerSide<u8>,
    },
    Action(ActionRecord),
    RoundEnd {
        round_number: u32,
        result: RoundScore,
        field: FieldState,
        /// Match score after this round.
        score: PerSide<u8>,
    },
    MatchEnd {
        winner: Side,
        score: PerSide<u8>,
        rounds: u32,
    },
}

/// Historians are a way for the simulation to record or notify of
/// events while the match is progressing. This is useful for
/// logging, debugging, or replaying a match in a user interface.
pub trait Historian {
    /// This method is called by the simulation for every event.
    ///
    /// Returning an error will cause the historian to be dropped from the
    /// `MatchSimulation`.
    fn record_event(&mut self, event: &MatchEvent) -> Result<(), HistorianError>;
}

mod failing;
mod fn_historian;
mod vec;

pub use failing::FailingHistorian;
pub use fn_historian::FnHistorian;
pub use vec::{RoundLog, VecHistorian, round_logs};
