use std::{fs, path::PathBuf};

use clap::Parser;
use petanque_sim::{
    arena::{
        MatchSimulationBuilder,
        competition::{BatchConfig, BatchRunner},
    },
    core::{PlayerProfile, Side},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "petanque-sim")]
#[command(about = "Simulate petanque matches between two player profiles")]
struct Cli {
    /// JSON profile for side A, the default profile if not given
    #[arg(long)]
    profile_a: Option<PathBuf>,

    /// JSON profile for side B, the default profile if not given
    #[arg(long)]
    profile_b: Option<PathBuf>,

    /// Number of matches to play
    #[arg(short, long, default_value_t = 1000)]
    matches: usize,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Worker threads, the global pool if not given
    #[arg(short, long)]
    workers: Option<usize>,

    /// Matches per progress report
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Play a single logged match and print it as JSON
    #[arg(long)]
    replay: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile_a = load_profile(cli.profile_a.as_ref());
    let profile_b = load_profile(cli.profile_b.as_ref());

    if cli.replay {
        replay(profile_a, profile_b, cli.seed);
    } else {
        batch(profile_a, profile_b, &cli);
    }
}

fn load_profile(path: Option<&PathBuf>) -> PlayerProfile {
    let Some(path) = path else {
        return PlayerProfile::default();
    };
    let parsed = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| serde_json::from_str(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!("Error loading profile {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn replay(profile_a: PlayerProfile, profile_b: PlayerProfile, seed: Option<u64>) {
    let mut rng = StdRng::seed_from_u64(seed.unwrap_or_else(|| rand::rng().random()));
    let result = MatchSimulationBuilder::default()
        .profiles(profile_a, profile_b)
        .logging(true)
        .build()
        .and_then(|mut sim| sim.run(&mut rng));

    match result {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error writing match: {e:?}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error playing match: {e}");
            std::process::exit(1);
        }
    }
}

fn batch(profile_a: PlayerProfile, profile_b: PlayerProfile, cli: &Cli) {
    let mut config = BatchConfig::new();
    if let Some(seed) = cli.seed {
        config = config.seed(seed);
    }
    if let Some(workers) = cli.workers {
        config = config.workers(workers);
    }
    if let Some(chunk_size) = cli.chunk_size {
        config = config.chunk_size(chunk_size);
    }

    let total = cli.matches;
    let result = BatchRunner::new(profile_a, profile_b, config).and_then(|mut runner| {
        runner
            .run_to(total, |done| {
                eprintln!("{:>3}% ({done}/{total})", done * 100 / total.max(1));
            })
            .copied()
    });

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error running batch: {e}");
            std::process::exit(1);
        }
    };

    println!("Matches:  {}", result.total_matches);
    for side in Side::sides() {
        println!(
            "{side} wins:   {} ({:.1}%)",
            result.wins(side),
            100.0 * result.win_probability(side)
        );
    }
    println!("Std err:  {:.2}%", 100.0 * result.standard_error());
    if result.abandoned > 0 {
        println!("Abandoned: {}", result.abandoned);
    }
    println!();
    for (label, count) in result.histogram.labelled() {
        println!("{label:>8} {count}");
    }
}
