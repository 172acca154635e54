use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use map_core::{
    DifficultyTier, FileMapCache, FileMapStore, MapCache, MapStore, Parameters,
    generate_with_collaborators,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the run; a time-derived seed is used when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Party size (1..=4)
    #[arg(long, default_value_t = 2)]
    party_size: u8,

    /// Average party level (1..=20)
    #[arg(long, default_value_t = 5)]
    level: u8,

    /// Difficulty tier: novice | seasoned | veteran | legendary
    #[arg(long, default_value = "seasoned")]
    tier: String,

    /// Write the map JSON to this path instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Consult/populate a file cache in this directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Persist the result (with metadata) into this directory
    #[arg(long)]
    store_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tier = DifficultyTier::parse(&args.tier).map_err(|e| anyhow::anyhow!("{e}"))?;
    let params = Parameters::new(args.party_size, args.level, tier);
    let seed = args.seed.unwrap_or_else(runtime_seed);

    let cache = args.cache_dir.map(FileMapCache::new);
    let store = args.store_dir.map(FileMapStore::new);
    let outcome = generate_with_collaborators(
        seed,
        &params,
        cache.as_ref().map(|c| c as &dyn MapCache),
        store.as_ref().map(|s| s as &dyn MapStore),
    )
    .map_err(|e| anyhow::anyhow!("generation failed: {e}"))?;

    let map = &outcome.map;
    let json = map.canonical_json().context("Failed to serialize map")?;

    match &args.out {
        Some(path) => {
            fs::write(path, &json)
                .with_context(|| format!("Failed to write map to {}", path.display()))?;
            println!("Map: {}", map.name);
            println!("Content ID: {}", map.content_id);
            println!("Seed: {seed}");
            println!("Regions: {}", map.overworld.regions.len());
            println!("Interiors: {}", map.interiors.len());
            println!("Events: {}", map.placed_events().len());
            println!("Goal: {}", map.goal.description);
            println!("Cache hit: {}", outcome.cache_hit);
            if let Some(error) = &outcome.store_error {
                println!("Store warning: {error}");
            }
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Time-derived fallback seed for interactive use. Reproducible runs should
/// pass --seed explicitly.
fn runtime_seed() -> u64 {
    let now_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(std::process::id());
    mix_seed((now_nanos as u64) ^ ((now_nanos >> 64) as u64) ^ pid.rotate_left(17))
}

fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
