//! Run lots of matches and tally who wins and by how much.
mod batch;

pub use batch::{
    BatchConfig, BatchResult, BatchRunner, DEFAULT_CHUNK_SIZE, MONTE_CARLO_CHUNK_SIZE,
    ScoreGapHistogram, run_batch,
};
