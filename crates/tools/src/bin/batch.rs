use std::sync::atomic::AtomicBool;

use anyhow::Result;
use clap::Parser;
use map_core::{
    BatchOutcome, DifficultyTier, GenerationRequest, Parameters, generate_batch,
};

/// Generate a run of maps across consecutive seeds and print a summary line
/// per map.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// First seed of the run
    #[arg(long, default_value_t = 1)]
    base_seed: u64,

    /// Number of maps to generate
    #[arg(long, default_value_t = 8)]
    count: u64,

    /// Party size (1..=4)
    #[arg(long, default_value_t = 2)]
    party_size: u8,

    /// Average party level (1..=20)
    #[arg(long, default_value_t = 5)]
    level: u8,

    /// Difficulty tier: novice | seasoned | veteran | legendary
    #[arg(long, default_value = "seasoned")]
    tier: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tier = DifficultyTier::parse(&args.tier).map_err(|e| anyhow::anyhow!("{e}"))?;
    let params = Parameters::new(args.party_size, args.level, tier);
    let requests: Vec<GenerationRequest> = (args.base_seed..args.base_seed + args.count)
        .map(|seed| GenerationRequest { seed, params })
        .collect();

    let cancel = AtomicBool::new(false);
    let outcomes = generate_batch(&requests, &cancel);

    for (request, outcome) in requests.iter().zip(&outcomes) {
        match outcome {
            BatchOutcome::Generated(map) => println!(
                "{:>20}  {}  regions={:<3} interiors={:<2} events={:<4} {}",
                request.seed,
                &map.content_id[..12],
                map.overworld.regions.len(),
                map.interiors.len(),
                map.placed_events().len(),
                map.name
            ),
            BatchOutcome::Cancelled => println!("{:>20}  cancelled", request.seed),
            BatchOutcome::Failed(error) => println!("{:>20}  failed: {error}", request.seed),
        }
    }

    Ok(())
}
