use std::path::PathBuf;

use anyhow::{Context, Result};
use env_logger::Env;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use league_synth::config::arg_value;
use league_synth::sample::{SampleSizes, sample_inputs, write_sample_inputs};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let out_dir = arg_value(&args, "--out-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    let defaults = SampleSizes::default();
    let sizes = SampleSizes {
        teams: parse_count(&args, "--teams")?.unwrap_or(defaults.teams),
        players: parse_count(&args, "--players")?.unwrap_or(defaults.players),
        coaches: parse_count(&args, "--coaches")?.unwrap_or(defaults.coaches),
        referees: parse_count(&args, "--referees")?.unwrap_or(defaults.referees),
    };
    let seed = match arg_value(&args, "--seed") {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("invalid --seed {raw}"))?,
        None => rand::thread_rng().r#gen(),
    };

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let tables = sample_inputs(sizes, &mut rng);
    write_sample_inputs(&out_dir, &tables)?;

    println!("Sample inputs written");
    println!("Dir: {}", out_dir.display());
    println!("Seed: {seed}");
    println!(
        "teams={} players={} coaches={} referees={} positions={}",
        tables.teams.len(),
        tables.players.len(),
        tables.coaches.len(),
        tables.referees.len(),
        tables.positions.len()
    );
    Ok(())
}

fn parse_count(args: &[String], flag: &str) -> Result<Option<usize>> {
    arg_value(args, flag)
        .map(|raw| {
            raw.parse::<usize>()
                .with_context(|| format!("invalid {flag} {raw}"))
        })
        .transpose()
}
