use std::collections::HashMap;
use std::fs;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use league_synth::config::{GenerationParams, RunConfig};
use league_synth::export::{GOALS_FILE, MANIFEST_FILE, RunManifest, WORKBOOK_FILE};
use league_synth::loaders::{InputTables, TeamRow};
use league_synth::model::MatchOutcome;
use league_synth::pipeline::{generate_dataset, run, screen_violations};
use league_synth::sample::{SampleSizes, sample_inputs, sample_positions, write_sample_inputs};
use league_synth::validate::check_dataset;

fn small_sizes() -> SampleSizes {
    SampleSizes {
        teams: 16,
        players: 1_200,
        coaches: 30,
        referees: 6,
    }
}

fn small_params(year: i32) -> GenerationParams {
    GenerationParams {
        season_count: 4,
        league_count: 2,
        teams_per_league: 8,
        stadium_pool_size: 12,
        ..GenerationParams::for_year(year)
    }
}

#[test]
fn full_run_writes_consistent_outputs() {
    let input = tempfile::tempdir().expect("tempdir");
    let output = tempfile::tempdir().expect("tempdir");
    let tables = sample_inputs(small_sizes(), &mut ChaCha8Rng::seed_from_u64(8));
    write_sample_inputs(input.path(), &tables).expect("write sample inputs");

    let config = RunConfig {
        input_dir: input.path().to_path_buf(),
        output_dir: output.path().join("nested"),
        seed: Some(1234),
        strict: true,
        params: small_params(2025),
    };
    let summary = run(&config).expect("strict run should succeed");

    assert_eq!(summary.seed, 1234);
    assert!(summary.violations.is_empty());
    assert!(summary.workbook.ends_with(WORKBOOK_FILE));
    assert!(summary.workbook.exists());

    let counts = summary.counts.iter().cloned().collect::<HashMap<_, _>>();
    assert_eq!(counts["seasons"], 4);
    assert_eq!(counts["teams"], 16);
    assert_eq!(counts["matches"], 4 * 2 * 8 * 7);

    let goals =
        fs::read_to_string(output.path().join("nested").join(GOALS_FILE)).expect("goals csv");
    assert!(goals.starts_with("GoalId,MatchId,PlayerId,TeamId,SeasonId,LeagueId"));
    assert_eq!(goals.lines().count(), counts["goals"] + 1);

    let raw =
        fs::read_to_string(output.path().join("nested").join(MANIFEST_FILE)).expect("manifest");
    let manifest: RunManifest = serde_json::from_str(&raw).expect("manifest json");
    assert_eq!(manifest.seed, 1234);
    assert_eq!(manifest.current_year, 2025);
    assert_eq!(manifest.violations, 0);
}

#[test]
fn same_seed_and_year_replay_identically() {
    let tables = sample_inputs(small_sizes(), &mut ChaCha8Rng::seed_from_u64(10));
    let params = small_params(2020);
    let a = generate_dataset(&tables, &params, &mut ChaCha8Rng::seed_from_u64(77)).unwrap();
    let b = generate_dataset(&tables, &params, &mut ChaCha8Rng::seed_from_u64(77)).unwrap();
    assert_eq!(a.dataset.player_assignments, b.dataset.player_assignments);
    assert_eq!(a.dataset.matches, b.dataset.matches);
    assert_eq!(a.dataset.goals, b.dataset.goals);
}

#[test]
fn two_team_league_plays_home_and_away_each_season() {
    let tables = InputTables {
        teams: vec![
            TeamRow {
                name: "Alpha".to_string(),
                city: "Leiden".to_string(),
            },
            TeamRow {
                name: "Beta".to_string(),
                city: "Breda".to_string(),
            },
        ],
        positions: sample_positions(),
        ..sample_inputs(
            SampleSizes {
                teams: 0,
                players: 200,
                coaches: 4,
                referees: 2,
            },
            &mut ChaCha8Rng::seed_from_u64(1),
        )
    };
    let params = GenerationParams {
        season_count: 2,
        ..GenerationParams::for_year(2024)
    };
    let generated = generate_dataset(&tables, &params, &mut ChaCha8Rng::seed_from_u64(2)).unwrap();
    let data = &generated.dataset;

    assert_eq!(data.matches.len(), 4);
    for season in &data.seasons {
        let pairs = data
            .matches
            .iter()
            .filter(|m| m.season_id == season.id)
            .map(|m| (m.home_team_id, m.away_team_id))
            .collect::<Vec<_>>();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&(1, 2)));
        assert!(pairs.contains(&(2, 1)));
    }
    for m in &data.matches {
        let scored = |team_id: u32| {
            data.goals
                .iter()
                .filter(|g| g.match_id == m.id && g.team_id == team_id)
                .count()
        };
        let (home, away) = (scored(m.home_team_id), scored(m.away_team_id));
        match m.outcome() {
            MatchOutcome::HomeWin => assert!(home > away),
            MatchOutcome::AwayWin => assert!(away > home),
            MatchOutcome::Draw => assert_eq!(home, away),
        }
    }
    assert!(check_dataset(data, &params.rules).is_empty());
}

#[test]
fn run_fails_on_missing_inputs() {
    let empty = tempfile::tempdir().expect("tempdir");
    let config = RunConfig {
        input_dir: empty.path().to_path_buf(),
        output_dir: empty.path().join("out"),
        seed: Some(1),
        strict: false,
        params: small_params(2025),
    };
    assert!(run(&config).is_err());
    assert!(!empty.path().join("out").join(WORKBOOK_FILE).exists());
}

#[test]
fn strict_mode_rejects_a_tampered_dataset() {
    let tables = sample_inputs(small_sizes(), &mut ChaCha8Rng::seed_from_u64(12));
    let params = small_params(2025);
    let generated =
        generate_dataset(&tables, &params, &mut ChaCha8Rng::seed_from_u64(13)).unwrap();
    let mut data = generated.dataset;
    assert!(screen_violations(&check_dataset(&data, &params.rules), true).is_ok());

    let moved = data.matches[0].id.clone();
    data.matches[0].date = data.seasons[0].end_date + chrono::Days::new(30);
    let violations = check_dataset(&data, &params.rules);
    assert!(!violations.is_empty());
    assert!(screen_violations(&violations, false).is_ok());
    let err = screen_violations(&violations, true).expect_err("strict mode rejects violations");
    assert!(err.to_string().contains(&moved));
}
