use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use rand::{Rng, SeedableRng, rngs::StdRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{event, trace_span};

use crate::{
    arena::{
        MatchResult, MatchSimulationBuilder, SimulationError, match_context::WINNING_SCORE,
        sim_builder::DEFAULT_MAX_ROUNDS,
    },
    core::{PerSide, PlayerProfile, Side},
};

/// Matches per chunk when neither side runs simulations to decide.
pub const DEFAULT_CHUNK_SIZE: usize = 500;
/// Matches per chunk when a monte carlo strategy is involved.
pub const MONTE_CARLO_CHUNK_SIZE: usize = 10;

const GAP_BUCKETS: usize = 2 * WINNING_SCORE as usize + 1;

/// Knobs for a [`BatchRunner`].
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    chunk_size: Option<usize>,
    workers: Option<usize>,
    seed: Option<u64>,
    max_rounds: Option<u32>,
    cancel: Option<Arc<AtomicBool>>,
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches to play between progress reports.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size.max(1));
        self
    }

    /// Size of a dedicated worker pool. Without it the global pool is used.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }

    /// Seed the whole batch. Match `i` of a batch is always played with the
    /// same rng, no matter how the work is split up.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Share a flag that stops the batch once set.
    pub fn cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Count of matches by final score gap, from `B 13:0` up to `A 13:0`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreGapHistogram {
    buckets: [usize; GAP_BUCKETS],
}

impl Default for ScoreGapHistogram {
    fn default() -> Self {
        Self {
            buckets: [0; GAP_BUCKETS],
        }
    }
}

impl ScoreGapHistogram {
    const OFFSET: i32 = WINNING_SCORE as i32;

    /// Count a match that ended with side A's score minus side B's equal
    /// to `gap`. Gaps outside `-13..=13` land in the end buckets.
    pub fn record(&mut self, gap: i32) {
        self.buckets[Self::index(gap)] += 1;
    }

    pub fn get(&self, gap: i32) -> usize {
        self.buckets[Self::index(gap)]
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().sum()
    }

    /// Every gap with its count, most lopsided B win first.
    pub fn iter(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .map(|(idx, count)| (idx as i32 - Self::OFFSET, *count))
    }

    /// Chart labels for the gaps that actually happened.
    ///
    /// ```
    /// use petanque_sim::arena::competition::ScoreGapHistogram;
    ///
    /// let mut hist = ScoreGapHistogram::default();
    /// hist.record(4);
    /// hist.record(-13);
    /// hist.record(-13);
    ///
    /// let labels: Vec<_> = hist.labelled().collect();
    /// assert_eq!(vec![("B 13:0".to_string(), 2), ("A 13:9".to_string(), 1)], labels);
    /// ```
    pub fn labelled(&self) -> impl Iterator<Item = (String, usize)> + '_ {
        self.iter()
            .filter(|(_, count)| *count > 0)
            .map(|(gap, count)| (Self::label(gap), count))
    }

    /// Winner and final score for a gap, `A 13:x` or `B 13:x`.
    pub fn label(gap: i32) -> String {
        let winner = if gap >= 0 { Side::A } else { Side::B };
        format!("{winner} {WINNING_SCORE}:{}", Self::OFFSET - gap.abs())
    }

    fn index(gap: i32) -> usize {
        (gap.clamp(-Self::OFFSET, Self::OFFSET) + Self::OFFSET) as usize
    }
}

/// Aggregate results of many matches.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatchResult {
    pub total_matches: usize,
    pub wins_a: usize,
    pub wins_b: usize,
    /// Matches stopped at the round limit without a winner.
    pub abandoned: usize,
    pub histogram: ScoreGapHistogram,
    /// The batch stopped early because it was cancelled.
    pub cancelled: bool,
}

impl BatchResult {
    pub fn wins(&self, side: Side) -> usize {
        match side {
            Side::A => self.wins_a,
            Side::B => self.wins_b,
        }
    }

    /// Share of all played matches won by `side`.
    pub fn win_probability(&self, side: Side) -> f64 {
        if self.total_matches == 0 {
            return 0.0;
        }
        self.wins(side) as f64 / self.total_matches as f64
    }

    /// Standard error of side A's win probability.
    pub fn standard_error(&self) -> f64 {
        if self.total_matches == 0 {
            return 0.0;
        }
        let p = self.win_probability(Side::A);
        (p * (1.0 - p) / self.total_matches as f64).sqrt()
    }

    fn record(&mut self, result: &MatchResult) {
        self.total_matches += 1;
        match result.winner {
            Side::A => self.wins_a += 1,
            Side::B => self.wins_b += 1,
        }
        self.histogram.record(result.score_gap());
    }

    fn record_abandoned(&mut self) {
        self.total_matches += 1;
        self.abandoned += 1;
    }
}

/// Plays many independent matches between two fixed profiles.
///
/// Work is done in chunks so callers can report progress, stop early, or
/// come back later for more matches. With the `parallel` feature each chunk
/// is spread over a rayon pool. Every match gets its own rng seeded from the
/// batch seed and the match's index, so the results are identical for any
/// worker count or chunk size.
///
/// ```
/// use petanque_sim::arena::competition::{BatchConfig, BatchRunner};
/// use petanque_sim::core::PlayerProfile;
///
/// let profile = PlayerProfile::default();
/// let mut runner =
///     BatchRunner::new(profile, profile, BatchConfig::new().seed(420)).unwrap();
///
/// runner.run(50).unwrap();
/// let result = runner.run(50).unwrap();
/// assert_eq!(100, result.total_matches);
/// assert_eq!(100, result.wins_a + result.wins_b + result.abandoned);
/// ```
pub struct BatchRunner {
    profiles: PerSide<PlayerProfile>,
    chunk_size: usize,
    seed: u64,
    max_rounds: u32,
    cancel: Option<Arc<AtomicBool>>,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
    result: BatchResult,
}

impl BatchRunner {
    pub fn new(
        profile_a: PlayerProfile,
        profile_b: PlayerProfile,
        config: BatchConfig,
    ) -> Result<Self, SimulationError> {
        let uses_monte_carlo =
            profile_a.strategy().is_monte_carlo() || profile_b.strategy().is_monte_carlo();
        let chunk_size = config.chunk_size.unwrap_or(if uses_monte_carlo {
            MONTE_CARLO_CHUNK_SIZE
        } else {
            DEFAULT_CHUNK_SIZE
        });

        #[cfg(feature = "parallel")]
        let pool = match config.workers {
            Some(workers) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .build()?,
            ),
            None => None,
        };

        Ok(Self {
            profiles: PerSide::new(profile_a, profile_b),
            chunk_size,
            seed: config.seed.unwrap_or_else(|| rand::rng().random()),
            max_rounds: config.max_rounds.unwrap_or(DEFAULT_MAX_ROUNDS),
            cancel: config.cancel,
            #[cfg(feature = "parallel")]
            pool,
            result: BatchResult::default(),
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn result(&self) -> &BatchResult {
        &self.result
    }

    pub fn into_result(self) -> BatchResult {
        self.result
    }

    pub fn is_cancelled(&self) -> bool {
        is_set(self.cancel.as_deref())
    }

    /// Play `num_matches` more matches on top of whatever was already played.
    pub fn run(&mut self, num_matches: usize) -> Result<&BatchResult, SimulationError> {
        let target = self.result.total_matches + num_matches;
        self.run_to(target, |_| {})
    }

    /// Keep playing until `total` matches have been played, calling
    /// `progress` with the running count after every chunk.
    ///
    /// Cancellation is checked before each match. Matches already finished
    /// stay counted.
    pub fn run_to(
        &mut self,
        total: usize,
        mut progress: impl FnMut(usize),
    ) -> Result<&BatchResult, SimulationError> {
        let span = trace_span!("BatchRunner::run_to", total);
        let _enter = span.enter();

        while self.result.total_matches < total && !self.result.cancelled {
            let start = self.result.total_matches;
            let count = self.chunk_size.min(total - start);

            for outcome in self.play_chunk(start, count) {
                match outcome {
                    None => self.result.cancelled = true,
                    Some(Ok(result)) => self.result.record(&result),
                    Some(Err(SimulationError::RoundLimitReached { .. })) => {
                        self.result.record_abandoned()
                    }
                    Some(Err(error)) => return Err(error),
                }
            }

            event!(
                tracing::Level::INFO,
                completed = self.result.total_matches,
                total,
                wins_a = self.result.wins_a,
                wins_b = self.result.wins_b,
                "Batch chunk complete"
            );
            if self.result.total_matches > start {
                progress(self.result.total_matches);
            }
        }

        if self.result.cancelled {
            event!(
                tracing::Level::INFO,
                completed = self.result.total_matches,
                total,
                "Batch cancelled"
            );
        } else {
            event!(
                tracing::Level::INFO,
                completed = self.result.total_matches,
                win_probability_a = self.result.win_probability(Side::A),
                abandoned = self.result.abandoned,
                "Batch complete"
            );
        }
        Ok(&self.result)
    }

    /// Play matches `start..start + count`, `None` for the ones skipped
    /// after cancellation.
    fn play_chunk(
        &self,
        start: usize,
        count: usize,
    ) -> Vec<Option<Result<MatchResult, SimulationError>>> {
        let profiles = self.profiles;
        let max_rounds = self.max_rounds;
        let seed = self.seed;
        let cancel = self.cancel.as_deref();

        let play = move |idx: usize| {
            if is_set(cancel) {
                return None;
            }
            let mut rng = StdRng::seed_from_u64(match_seed(seed, idx));
            Some(play_match(profiles, max_rounds, &mut rng))
        };

        #[cfg(feature = "parallel")]
        let outcomes = {
            let run = || (start..start + count).into_par_iter().map(play).collect::<Vec<_>>();
            match &self.pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        };
        #[cfg(not(feature = "parallel"))]
        let outcomes = (start..start + count).map(play).collect();

        outcomes
    }
}

impl std::fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("profiles", &self.profiles)
            .field("chunk_size", &self.chunk_size)
            .field("seed", &self.seed)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

/// Seed for match `idx` of a batch seeded with `seed`.
///
/// Both words go through a splitmix64 finalizer, so batches with nearby
/// seeds don't share matches at shifted indexes.
fn match_seed(seed: u64, idx: usize) -> u64 {
    splitmix64(splitmix64(seed).wrapping_add(idx as u64))
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn is_set(flag: Option<&AtomicBool>) -> bool {
    flag.is_some_and(|flag| flag.load(Ordering::Relaxed))
}

fn play_match(
    profiles: PerSide<PlayerProfile>,
    max_rounds: u32,
    rng: &mut StdRng,
) -> Result<MatchResult, SimulationError> {
    MatchSimulationBuilder::default()
        .profiles(profiles.a, profiles.b)
        .max_rounds(max_rounds)
        .build()?
        .run(rng)
}

/// Play `count` matches between two profiles with the default batch
/// settings, reporting the completed count after every chunk.
pub fn run_batch(
    profile_a: PlayerProfile,
    profile_b: PlayerProfile,
    count: usize,
    progress: impl FnMut(usize),
) -> Result<BatchResult, SimulationError> {
    let mut runner = BatchRunner::new(profile_a, profile_b, BatchConfig::default())?;
    runner.run_to(count, progress)?;
    Ok(runner.into_result())
}

#[cfg(test)]
mod tests {
    use crate::core::StrategyKind;

    use super::*;

    fn profile(strategy: StrategyKind) -> PlayerProfile {
        PlayerProfile::builder().strategy(strategy).build().unwrap()
    }

    #[test]
    fn test_histogram_buckets() {
        let mut hist = ScoreGapHistogram::default();
        hist.record(13);
        hist.record(1);
        hist.record(-1);
        hist.record(-40);

        assert_eq!(1, hist.get(13));
        assert_eq!(1, hist.get(-13));
        assert_eq!(0, hist.get(0));
        assert_eq!(4, hist.total());
        assert_eq!(27, hist.iter().count());
        assert_eq!("A 13:12", ScoreGapHistogram::label(1));
        assert_eq!("B 13:12", ScoreGapHistogram::label(-1));
        assert_eq!("A 13:0", ScoreGapHistogram::label(13));
    }

    #[test_log::test]
    fn test_wins_add_up() {
        let mut runner = BatchRunner::new(
            profile(StrategyKind::AlwaysPoint),
            profile(StrategyKind::conditional()),
            BatchConfig::new().seed(420).chunk_size(64),
        )
        .unwrap();
        let mut reports = vec![];
        let result = *runner.run_to(300, |done| reports.push(done)).unwrap();

        assert_eq!(300, result.total_matches);
        assert_eq!(0, result.abandoned);
        assert_eq!(result.total_matches, result.wins_a + result.wins_b);
        assert_eq!(result.wins_a + result.wins_b, result.histogram.total());
        let a_buckets: usize = result
            .histogram
            .iter()
            .filter(|(gap, _)| *gap > 0)
            .map(|(_, count)| count)
            .sum();
        assert_eq!(result.wins_a, a_buckets);
        assert_eq!(0, result.histogram.get(0));

        assert_eq!(vec![64, 128, 192, 256, 300], reports);
        approx::assert_relative_eq!(
            1.0,
            result.win_probability(Side::A) + result.win_probability(Side::B)
        );
    }

    #[test_log::test]
    fn test_mirror_match_is_even() {
        let mirror = PlayerProfile::builder()
            .point_mean(50.0)
            .point_std_dev(20.0)
            .hit_rate(0.0)
            .stay_rate(0.0)
            .strategy(StrategyKind::AlwaysPoint)
            .build()
            .unwrap();
        let mut runner =
            BatchRunner::new(mirror, mirror, BatchConfig::new().seed(1234)).unwrap();
        let result = *runner.run(1000).unwrap();

        let diff = (result.win_probability(Side::A) - 0.5).abs();
        assert!(
            diff <= 3.0 * (0.25_f64 / 1000.0).sqrt(),
            "Win rate too far from even: {}",
            result.win_probability(Side::A)
        );
        assert!(result.standard_error() > 0.0);
    }

    #[test_log::test]
    fn test_chunking_and_workers_do_not_change_results() {
        let a = profile(StrategyKind::conditional());
        let b = profile(StrategyKind::MonteCarloEv { simulations: 4 });

        let mut one = BatchRunner::new(a, b, BatchConfig::new().seed(7).chunk_size(3)).unwrap();
        let mut two = BatchRunner::new(
            a,
            b,
            BatchConfig::new().seed(7).chunk_size(20).workers(2),
        )
        .unwrap();

        assert_eq!(one.run(20).unwrap(), two.run(20).unwrap());
    }

    #[test]
    fn test_monte_carlo_uses_small_chunks() {
        let runner = BatchRunner::new(
            profile(StrategyKind::AlwaysPoint),
            profile(StrategyKind::monte_carlo()),
            BatchConfig::new(),
        )
        .unwrap();
        assert_eq!(MONTE_CARLO_CHUNK_SIZE, runner.chunk_size());

        let runner = BatchRunner::new(
            profile(StrategyKind::AlwaysPoint),
            profile(StrategyKind::AlwaysShoot),
            BatchConfig::new(),
        )
        .unwrap();
        assert_eq!(DEFAULT_CHUNK_SIZE, runner.chunk_size());
    }

    #[test_log::test]
    fn test_cancel_keeps_finished_matches() {
        let cancel = Arc::new(AtomicBool::new(false));
        let mut runner = BatchRunner::new(
            PlayerProfile::default(),
            PlayerProfile::default(),
            BatchConfig::new()
                .seed(3)
                .chunk_size(10)
                .cancel(cancel.clone()),
        )
        .unwrap();

        let flag = cancel.clone();
        let result = *runner
            .run_to(1000, |done| {
                if done >= 30 {
                    flag.store(true, Ordering::Relaxed);
                }
            })
            .unwrap();

        assert!(result.cancelled);
        assert_eq!(30, result.total_matches);
        assert_eq!(30, result.wins_a + result.wins_b);
        assert!(runner.is_cancelled());
    }

    #[test_log::test]
    fn test_cancelled_chunk_does_not_repeat_progress() {
        let cancel = Arc::new(AtomicBool::new(false));
        let mut runner = BatchRunner::new(
            PlayerProfile::default(),
            PlayerProfile::default(),
            BatchConfig::new()
                .seed(3)
                .chunk_size(10)
                .cancel(cancel.clone()),
        )
        .unwrap();

        let flag = cancel.clone();
        let mut reports = vec![];
        let result = *runner
            .run_to(100, |done| {
                reports.push(done);
                if done >= 20 {
                    flag.store(true, Ordering::Relaxed);
                }
            })
            .unwrap();

        assert!(result.cancelled);
        assert_eq!(vec![10, 20], reports);
    }

    #[test]
    fn test_match_seeds_do_not_overlap_across_nearby_batches() {
        let seeds: std::collections::HashSet<u64> = (40..46)
            .flat_map(|seed| (0..1000).map(move |idx| match_seed(seed, idx)))
            .collect();
        assert_eq!(6000, seeds.len());
    }

    #[test_log::test]
    fn test_adjacent_seeds_are_independent_batches() {
        let a = profile(StrategyKind::AlwaysPoint);
        let b = profile(StrategyKind::conditional());
        let results = |seed: u64, skip: usize| {
            let runner = BatchRunner::new(a, b, BatchConfig::new().seed(seed)).unwrap();
            runner
                .play_chunk(skip, 200)
                .into_iter()
                .map(|outcome| outcome.unwrap().unwrap())
                .collect::<Vec<_>>()
        };

        // Match `i + 1` of one batch must not be match `i` of the next.
        let shifted = results(42, 1);
        let next = results(43, 0);
        let same = shifted.iter().zip(&next).filter(|(x, y)| x == y).count();
        assert!(same < 20, "{same} of 200 matches repeated");
    }

    #[test_log::test]
    fn test_degenerate_matches_are_abandoned() {
        let sniper = PlayerProfile::builder()
            .hit_rate(1.0)
            .stay_rate(0.0)
            .strategy(StrategyKind::AlwaysShoot)
            .build()
            .unwrap();
        let mut runner =
            BatchRunner::new(sniper, sniper, BatchConfig::new().seed(1).max_rounds(10)).unwrap();
        let result = *runner.run(5).unwrap();

        assert_eq!(5, result.abandoned);
        assert_eq!(0, result.wins_a + result.wins_b);
        assert_eq!(0, result.histogram.total());
    }

    #[test_log::test]
    fn test_run_batch_reports_progress() {
        let mut last = 0;
        let result = run_batch(
            PlayerProfile::default(),
            PlayerProfile::default(),
            25,
            |done| {
                assert!(done > last);
                last = done;
            },
        )
        .unwrap();
        assert_eq!(25, last);
        assert_eq!(25, result.total_matches);
    }
}
