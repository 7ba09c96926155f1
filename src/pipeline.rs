//! Stage ordering for one generation run, from input tables to files on disk.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use chrono::Utc;
use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::assignment::{assign_coaches, assign_players};
use crate::config::{GenerationParams, RunConfig};
use crate::export::{
    GOALS_FILE, MANIFEST_FILE, RunManifest, WORKBOOK_FILE, export_workbook, write_goals_csv,
    write_manifest,
};
use crate::fixtures::FixtureGenerator;
use crate::goals::GoalGenerator;
use crate::loaders::{InputTables, build_coaches, build_players, build_referees, build_teams};
use crate::model::Dataset;
use crate::reference::{generate_leagues, generate_seasons, ordered_seasons};
use crate::stadiums::{StadiumAssignmentReport, assign_stadiums, generate_stadiums};
use crate::validate::{Violation, check_dataset};

#[derive(Debug, Clone)]
pub struct Generated {
    pub dataset: Dataset,
    pub stadiums: StadiumAssignmentReport,
    pub unscorable: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seed: u64,
    pub current_year: i32,
    pub workbook: PathBuf,
    pub goals_csv: PathBuf,
    pub manifest: PathBuf,
    pub counts: Vec<(String, usize)>,
    pub unscorable_matches: usize,
    pub violations: Vec<Violation>,
    pub elapsed: Duration,
}

pub fn generate_dataset<R: Rng + ?Sized>(
    inputs: &InputTables,
    params: &GenerationParams,
    rng: &mut R,
) -> Result<Generated> {
    let seasons = generate_seasons(params.current_year, params.season_count)?;
    let leagues = generate_leagues(params.league_count);
    let mut teams = build_teams(&inputs.teams, params.teams_per_league, params.league_count, rng);
    let positions = inputs.positions.clone();
    let players = build_players(&inputs.players, &positions, params.max_goalkeepers, rng)?;
    let mut stadiums = generate_stadiums(&teams, params.stadium_pool_size, rng);
    let coaches = build_coaches(&inputs.coaches, rng);
    let referees = build_referees(&inputs.referees, rng);
    info!(
        "reference data: {} seasons, {} leagues, {} teams, {} stadiums",
        seasons.len(),
        leagues.len(),
        teams.len(),
        stadiums.len()
    );

    let ordered = ordered_seasons(&seasons, params.season_order);
    let coach_assignments = assign_coaches(&coaches, &teams, &ordered, &params.rules, rng);
    let player_assignments = assign_players(&players, &teams, &ordered, &params.rules, rng);

    // Stadiums go in before fixtures so every match picks up its home ground.
    let stadium_report = assign_stadiums(&mut teams, &mut stadiums, rng);

    let matches = FixtureGenerator::new(&referees, params.attendance_min, params.attendance_max)
        .generate(&teams, &ordered, rng);
    let goal_report = GoalGenerator::new().generate(&matches, &player_assignments, rng);

    Ok(Generated {
        dataset: Dataset {
            seasons,
            leagues,
            teams,
            stadiums,
            positions,
            players,
            coaches,
            referees,
            coach_assignments,
            player_assignments,
            matches,
            goals: goal_report.goals,
        },
        stadiums: stadium_report,
        unscorable: goal_report.unscorable,
    })
}

pub fn dataset_counts(data: &Dataset) -> Vec<(String, usize)> {
    [
        ("seasons", data.seasons.len()),
        ("leagues", data.leagues.len()),
        ("teams", data.teams.len()),
        ("stadiums", data.stadiums.len()),
        ("positions", data.positions.len()),
        ("players", data.players.len()),
        ("coaches", data.coaches.len()),
        ("referees", data.referees.len()),
        ("coach_assignments", data.coach_assignments.len()),
        ("player_assignments", data.player_assignments.len()),
        ("matches", data.matches.len()),
        ("goals", data.goals.len()),
    ]
    .into_iter()
    .map(|(name, n)| (name.to_string(), n))
    .collect()
}

/// Logs violations as warnings. In strict mode any violation fails the run.
pub fn screen_violations(violations: &[Violation], strict: bool) -> Result<()> {
    let Some(first) = violations.first() else {
        return Ok(());
    };
    for violation in violations.iter().take(20) {
        warn!("integrity: {violation}");
    }
    if violations.len() > 20 {
        warn!("integrity: {} more violations not shown", violations.len() - 20);
    }
    if strict {
        return Err(anyhow!(
            "{} integrity violations (first: {first})",
            violations.len()
        ));
    }
    Ok(())
}

pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let started = Instant::now();
    let seed = match config.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::thread_rng().r#gen::<u64>();
            info!("no seed configured; using {seed} (pass --seed {seed} to replay)");
            seed
        }
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let inputs = InputTables::load(&config.input_dir)?;
    let generated = generate_dataset(&inputs, &config.params, &mut rng)?;
    let data = generated.dataset;

    let violations = check_dataset(&data, &config.params.rules);
    screen_violations(&violations, config.strict)?;

    let workbook = config.output_dir.join(WORKBOOK_FILE);
    let goals_csv = config.output_dir.join(GOALS_FILE);
    let manifest_path = config.output_dir.join(MANIFEST_FILE);

    let export = export_workbook(&workbook, &data)?;
    info!("wrote {} sheets to {}", export.sheets.len(), workbook.display());
    let goals_written = write_goals_csv(&goals_csv, &data.goals)?;
    info!("wrote {goals_written} goals to {}", goals_csv.display());

    let counts = dataset_counts(&data);
    let manifest = RunManifest {
        seed,
        current_year: config.params.current_year,
        generated_at: Utc::now().to_rfc3339(),
        counts: counts.clone(),
        unscorable_matches: generated.unscorable.len(),
        violations: violations.len(),
    };
    write_manifest(&manifest_path, &manifest)?;

    let elapsed = started.elapsed();
    info!("run finished in {:.2}s", elapsed.as_secs_f64());

    Ok(RunSummary {
        seed,
        current_year: config.params.current_year,
        workbook,
        goals_csv,
        manifest: manifest_path,
        counts,
        unscorable_matches: generated.unscorable.len(),
        violations,
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{SampleSizes, sample_inputs};

    fn small_params() -> GenerationParams {
        GenerationParams {
            season_count: 3,
            league_count: 2,
            teams_per_league: 6,
            stadium_pool_size: 10,
            max_goalkeepers: 40,
            ..GenerationParams::for_year(2025)
        }
    }

    fn small_inputs(seed: u64) -> InputTables {
        let sizes = SampleSizes {
            teams: 12,
            players: 800,
            coaches: 20,
            referees: 5,
        };
        sample_inputs(sizes, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn generated_dataset_passes_integrity_check() {
        let params = small_params();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let generated = generate_dataset(&small_inputs(1), &params, &mut rng).unwrap();
        let data = &generated.dataset;

        assert_eq!(data.matches.len(), 3 * 2 * 6 * 5);
        assert!(data.matches.iter().all(|m| m.stadium_id.is_some()));
        assert_eq!(generated.stadiums.distinct, 10);
        assert_eq!(generated.stadiums.shared, 2);
        assert!(generated.unscorable.is_empty());
        assert_eq!(check_dataset(data, &params.rules), Vec::<Violation>::new());
    }

    #[test]
    fn same_seed_reproduces_dataset() {
        let params = small_params();
        let inputs = small_inputs(2);
        let a = generate_dataset(&inputs, &params, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let b = generate_dataset(&inputs, &params, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(a.dataset.matches, b.dataset.matches);
        assert_eq!(a.dataset.goals, b.dataset.goals);
        assert_eq!(a.dataset.coach_assignments, b.dataset.coach_assignments);
    }

    #[test]
    fn strict_mode_turns_violations_into_errors() {
        let violations = vec![Violation::MatchOutsideSeason {
            match_id: "M3".to_string(),
        }];
        assert!(screen_violations(&violations, false).is_ok());
        let err = screen_violations(&violations, true).unwrap_err();
        assert!(err.to_string().contains("match M3 dated outside its season"));
        assert!(screen_violations(&[], true).is_ok());
    }

    #[test]
    fn counts_cover_every_collection() {
        let counts = dataset_counts(&Dataset::default());
        assert_eq!(counts.len(), 12);
        assert!(counts.iter().all(|(_, n)| *n == 0));
    }
}
