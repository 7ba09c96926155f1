use anyhow::Result;
use env_logger::Env;

use league_synth::config::RunConfig;
use league_synth::pipeline;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = RunConfig::from_env()?.apply_args(std::env::args().skip(1))?;
    let summary = pipeline::run(&config)?;

    println!("Dataset generation complete");
    println!("Seed: {} (year {})", summary.seed, summary.current_year);
    println!("Workbook: {}", summary.workbook.display());
    println!("Goals: {}", summary.goals_csv.display());
    println!("Manifest: {}", summary.manifest.display());
    for (name, count) in &summary.counts {
        println!("  {name}: {count}");
    }
    if summary.unscorable_matches > 0 {
        println!("Matches without backing goals: {}", summary.unscorable_matches);
    }
    if !summary.violations.is_empty() {
        println!("Integrity violations: {}", summary.violations.len());
        for violation in summary.violations.iter().take(6) {
            println!("   - {violation}");
        }
    }
    println!("Elapsed: {:.2}s", summary.elapsed.as_secs_f64());

    Ok(())
}
