use std::fs;

use league_synth::export::{
    GOALS_FILE, MANIFEST_FILE, RunManifest, WORKBOOK_FILE, export_workbook, write_goals_csv,
    write_manifest,
};
use league_synth::model::{Dataset, Goal, League};

fn goal(goal_id: u64, match_id: &str, team_id: u32) -> Goal {
    Goal {
        goal_id,
        match_id: match_id.to_string(),
        player_id: 40 + goal_id as u32,
        team_id,
        season_id: 3,
        league_id: 2,
    }
}

#[test]
fn goals_csv_has_header_and_one_line_per_goal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(GOALS_FILE);
    let written =
        write_goals_csv(&path, &[goal(1, "M7", 5), goal(2, "M7", 6)]).expect("write goals");
    assert_eq!(written, 2);

    let raw = fs::read_to_string(&path).expect("read goals");
    let lines = raw.lines().collect::<Vec<_>>();
    assert_eq!(
        lines,
        vec![
            "GoalId,MatchId,PlayerId,TeamId,SeasonId,LeagueId",
            "1,M7,41,5,3,2",
            "2,M7,42,6,3,2",
        ]
    );
}

#[test]
fn empty_goals_csv_still_has_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sub").join(GOALS_FILE);
    assert_eq!(write_goals_csv(&path, &[]).expect("write goals"), 0);
    let raw = fs::read_to_string(&path).expect("read goals");
    assert_eq!(raw.trim_end(), "GoalId,MatchId,PlayerId,TeamId,SeasonId,LeagueId");
}

#[test]
fn workbook_reports_rows_per_sheet() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(WORKBOOK_FILE);
    let data = Dataset {
        leagues: vec![
            League {
                id: 1,
                name: "League 1".to_string(),
            },
            League {
                id: 2,
                name: "League 2".to_string(),
            },
        ],
        ..Dataset::default()
    };
    let report = export_workbook(&path, &data).expect("export workbook");
    assert!(path.exists());
    assert_eq!(report.sheets.len(), 11);
    assert_eq!(report.sheets[1], ("Leagues".to_string(), 2));
    assert_eq!(report.sheets[0], ("Seasons".to_string(), 0));
}

#[test]
fn manifest_round_trips_without_leftover_temp_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(MANIFEST_FILE);
    let manifest = RunManifest {
        seed: 99,
        current_year: 2024,
        generated_at: "2024-06-01T00:00:00+00:00".to_string(),
        counts: vec![("matches".to_string(), 12)],
        unscorable_matches: 1,
        violations: 0,
    };
    write_manifest(&path, &manifest).expect("write manifest");

    let raw = fs::read_to_string(&path).expect("read manifest");
    let back: RunManifest = serde_json::from_str(&raw).expect("parse manifest");
    assert_eq!(back.seed, 99);
    assert_eq!(back.counts, vec![("matches".to_string(), 12)]);
    assert_eq!(back.unscorable_matches, 1);
    assert!(!path.with_extension("json.tmp").exists());
}
