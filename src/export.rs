use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::{Deserialize, Serialize};

use crate::model::{
    Coach, CoachAssignment, Dataset, Goal, League, Match, Player, PlayerAssignment, Position,
    Referee, Season, Stadium, Team,
};

pub const WORKBOOK_FILE: &str = "GeneratedData.xlsx";
pub const GOALS_FILE: &str = "goals.csv";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

impl Cell {
    fn text(value: &str) -> Self {
        Cell::Text(value.to_string())
    }

    fn number<T: Into<f64>>(value: T) -> Self {
        Cell::Number(value.into())
    }

    fn opt_text(value: Option<&str>) -> Self {
        value.map(Cell::text).unwrap_or(Cell::Blank)
    }
}

pub struct SheetData {
    pub name: &'static str,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetData {
    fn new(name: &'static str, header: &[&str], body: impl Iterator<Item = Vec<Cell>>) -> Self {
        let mut rows = vec![header.iter().map(|h| Cell::text(h)).collect::<Vec<_>>()];
        rows.extend(body);
        Self { name, rows }
    }

    /// Data rows, header excluded.
    pub fn len(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub sheets: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub seed: u64,
    pub current_year: i32,
    pub generated_at: String,
    pub counts: Vec<(String, usize)>,
    pub unscorable_matches: usize,
    pub violations: usize,
}

pub fn workbook_sheets(data: &Dataset) -> Vec<SheetData> {
    vec![
        SheetData::new(
            "Seasons",
            &["SeasonId", "Name", "StartDate", "EndDate"],
            data.seasons.iter().map(season_row),
        ),
        SheetData::new("Leagues", &["LeagueId", "Name"], data.leagues.iter().map(league_row)),
        SheetData::new(
            "Teams",
            &["TeamId", "Name", "City", "EstablishmentYear", "LeagueId", "StadiumId"],
            data.teams.iter().map(team_row),
        ),
        SheetData::new(
            "Stadiums",
            &["StadiumId", "Name", "Capacity", "City", "Address"],
            data.stadiums.iter().map(stadium_row),
        ),
        SheetData::new(
            "Positions",
            &["PositionId", "Name", "Category"],
            data.positions.iter().map(position_row),
        ),
        SheetData::new(
            "Players",
            &[
                "PlayerId",
                "FirstName",
                "LastName",
                "Nationality",
                "BirthDate",
                "Height",
                "PositionId",
            ],
            data.players.iter().map(player_row),
        ),
        SheetData::new(
            "Coaches",
            &[
                "CoachId",
                "FirstName",
                "LastName",
                "Nationality",
                "Experience Level",
                "Coaching Licenses",
                "Coaching Style",
                "Training Methods",
                "Player Development Focus",
                "Injury Management",
                "Team Selection Criteria",
                "Communication Style",
                "Motivational Techniques",
                "BirthDate",
            ],
            data.coaches.iter().map(coach_row),
        ),
        SheetData::new(
            "Referees",
            &[
                "RefereeId",
                "FirstName",
                "LastName",
                "Nationality",
                "Email",
                "PhoneNumber",
                "BirthDate",
            ],
            data.referees.iter().map(referee_row),
        ),
        SheetData::new(
            "CoachAssignments",
            &["AssignmentId", "CoachId", "TeamId", "SeasonId"],
            data.coach_assignments.iter().map(coach_assignment_row),
        ),
        SheetData::new(
            "PlayerAssignments",
            &["AssignmentId", "PlayerId", "TeamId", "SeasonId"],
            data.player_assignments.iter().map(player_assignment_row),
        ),
        SheetData::new(
            "Matches",
            &[
                "MatchId",
                "HomeTeamId",
                "AwayTeamId",
                "StadiumId",
                "RefereeId",
                "Date",
                "Attendance",
                "SeasonId",
                "WinnerTeamId",
                "LeagueId",
            ],
            data.matches.iter().map(match_row),
        ),
    ]
}

pub fn export_workbook(path: &Path, data: &Dataset) -> Result<ExportReport> {
    let sheets = workbook_sheets(data);
    let mut workbook = Workbook::new();
    for sheet_data in &sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_data.name)?;
        write_rows(sheet, &sheet_data.rows)
            .with_context(|| format!("write sheet {}", sheet_data.name))?;
    }

    ensure_parent(path)?;
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        sheets: sheets
            .iter()
            .map(|s| (s.name.to_string(), s.len()))
            .collect(),
    })
}

pub fn write_goals_csv(path: &Path, goals: &[Goal]) -> Result<usize> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("open goals csv {}", path.display()))?;
    for goal in goals {
        writer
            .serialize(goal)
            .with_context(|| format!("write goal {}", goal.goal_id))?;
    }
    if goals.is_empty() {
        writer.write_record(["GoalId", "MatchId", "PlayerId", "TeamId", "SeasonId", "LeagueId"])?;
    }
    writer.flush().context("flush goals csv")?;
    Ok(goals.len())
}

pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(manifest).context("serialize run manifest")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write run manifest")?;
    fs::rename(&tmp, path).context("swap run manifest")?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }
    Ok(())
}

fn season_row(season: &Season) -> Vec<Cell> {
    vec![
        Cell::number(season.id),
        Cell::text(&season.name),
        Cell::Text(season.start_date.to_string()),
        Cell::Text(season.end_date.to_string()),
    ]
}

fn league_row(league: &League) -> Vec<Cell> {
    vec![Cell::number(league.id), Cell::text(&league.name)]
}

fn team_row(team: &Team) -> Vec<Cell> {
    vec![
        Cell::number(team.id),
        Cell::text(&team.name),
        Cell::text(&team.city),
        Cell::number(team.founded_year),
        Cell::number(team.league_id),
        Cell::opt_text(team.stadium_id.as_deref()),
    ]
}

fn stadium_row(stadium: &Stadium) -> Vec<Cell> {
    vec![
        Cell::text(&stadium.id),
        Cell::text(&stadium.name),
        Cell::number(stadium.capacity),
        Cell::text(&stadium.city),
        Cell::text(&stadium.address),
    ]
}

fn position_row(position: &Position) -> Vec<Cell> {
    vec![
        Cell::text(&position.id),
        Cell::text(&position.name),
        Cell::text(&position.category),
    ]
}

fn player_row(player: &Player) -> Vec<Cell> {
    vec![
        Cell::number(player.id),
        Cell::text(&player.first_name),
        Cell::text(&player.last_name),
        Cell::text(&player.nationality),
        Cell::Text(player.birth_date.to_string()),
        Cell::number(player.height_cm),
        Cell::text(&player.position_id),
    ]
}

fn coach_row(coach: &Coach) -> Vec<Cell> {
    vec![
        Cell::text(&coach.id),
        Cell::text(&coach.first_name),
        Cell::text(&coach.last_name),
        Cell::text(&coach.nationality),
        Cell::text(&coach.experience_level),
        Cell::number(coach.coaching_licenses),
        Cell::text(&coach.coaching_style),
        Cell::text(&coach.training_methods),
        Cell::text(&coach.player_development_focus),
        Cell::text(&coach.injury_management),
        Cell::text(&coach.team_selection_criteria),
        Cell::text(&coach.communication_style),
        Cell::text(&coach.motivational_techniques),
        Cell::Text(coach.birth_date.to_string()),
    ]
}

fn referee_row(referee: &Referee) -> Vec<Cell> {
    vec![
        Cell::text(&referee.id),
        Cell::text(&referee.first_name),
        Cell::text(&referee.last_name),
        Cell::text(&referee.nationality),
        Cell::text(&referee.email),
        Cell::text(&referee.phone_number),
        Cell::Text(referee.birth_date.to_string()),
    ]
}

fn coach_assignment_row(row: &CoachAssignment) -> Vec<Cell> {
    vec![
        Cell::text(&row.id),
        Cell::text(&row.coach_id),
        Cell::number(row.team_id),
        Cell::number(row.season_id),
    ]
}

fn player_assignment_row(row: &PlayerAssignment) -> Vec<Cell> {
    vec![
        Cell::text(&row.id),
        Cell::number(row.player_id),
        Cell::number(row.team_id),
        Cell::number(row.season_id),
    ]
}

fn match_row(m: &Match) -> Vec<Cell> {
    vec![
        Cell::text(&m.id),
        Cell::number(m.home_team_id),
        Cell::number(m.away_team_id),
        Cell::opt_text(m.stadium_id.as_deref()),
        Cell::opt_text(m.referee_id.as_deref()),
        Cell::Text(m.date.to_string()),
        Cell::number(m.attendance),
        Cell::number(m.season_id),
        m.winner_team_id.map(Cell::number).unwrap_or(Cell::Blank),
        Cell::number(m.league_id),
    ]
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        let r = u32::try_from(row_idx).context("sheet row index overflow")?;
        for (col_idx, value) in row.iter().enumerate() {
            let c = col_idx as u16;
            match value {
                Cell::Text(text) => {
                    worksheet.write_string(r, c, text)?;
                }
                Cell::Number(number) => {
                    worksheet.write_number(r, c, *number)?;
                }
                Cell::Blank => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn match_rows_leave_draw_winner_blank() {
        let m = Match {
            id: "M9".to_string(),
            home_team_id: 1,
            away_team_id: 2,
            stadium_id: Some("S11234".to_string()),
            referee_id: None,
            date: NaiveDate::from_ymd_opt(2023, 8, 15).unwrap(),
            attendance: 7_500,
            season_id: 2,
            league_id: 1,
            winner_team_id: None,
        };
        let row = match_row(&m);
        assert_eq!(row.len(), 10);
        assert_eq!(row[3], Cell::Text("S11234".to_string()));
        assert_eq!(row[4], Cell::Blank);
        assert_eq!(row[5], Cell::Text("2023-08-15".to_string()));
        assert_eq!(row[8], Cell::Blank);
    }

    #[test]
    fn sheets_follow_expected_order() {
        let sheets = workbook_sheets(&Dataset::default());
        let names = sheets.iter().map(|s| s.name).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "Seasons",
                "Leagues",
                "Teams",
                "Stadiums",
                "Positions",
                "Players",
                "Coaches",
                "Referees",
                "CoachAssignments",
                "PlayerAssignments",
                "Matches",
            ]
        );
        assert!(sheets.iter().all(SheetData::is_empty));
        assert_eq!(sheets[6].rows[0].len(), 14);
    }
}
