use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use log::{debug, info};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::{Coach, Player, Position, Referee, Team};
use crate::reference::random_date_between;

pub const TEAMS_FILE: &str = "teams.csv";
pub const POSITIONS_FILE: &str = "positions.csv";
pub const PLAYERS_FILE: &str = "players.csv";
pub const COACHES_FILE: &str = "coaches.csv";
pub const REFEREES_FILE: &str = "referees.csv";

const COACH_ID_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TeamRow {
    pub name: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerRow {
    pub first_name: String,
    pub last_name: String,
    pub nationality: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CoachRow {
    pub first_name: String,
    pub last_name: String,
    pub nationality: String,
    pub experience_level: String,
    pub coaching_licenses: u32,
    pub coaching_style: String,
    pub training_methods: String,
    pub player_development_focus: String,
    pub injury_management: String,
    pub team_selection_criteria: String,
    pub communication_style: String,
    pub motivational_techniques: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RefereeRow {
    pub first_name: String,
    pub last_name: String,
    pub nationality: String,
    pub email: String,
    pub phone_number: String,
}

/// Raw rows of every input table, before ids and synthetic attributes are attached.
#[derive(Debug, Clone, Default)]
pub struct InputTables {
    pub teams: Vec<TeamRow>,
    pub positions: Vec<Position>,
    pub players: Vec<PlayerRow>,
    pub coaches: Vec<CoachRow>,
    pub referees: Vec<RefereeRow>,
}

impl InputTables {
    pub fn load(dir: &Path) -> Result<Self> {
        let tables = Self {
            teams: read_rows(&dir.join(TEAMS_FILE))?,
            positions: read_rows(&dir.join(POSITIONS_FILE))?,
            players: read_rows(&dir.join(PLAYERS_FILE))?,
            coaches: read_rows(&dir.join(COACHES_FILE))?,
            referees: read_rows(&dir.join(REFEREES_FILE))?,
        };
        info!(
            "loaded inputs from {}: {} teams, {} positions, {} players, {} coaches, {} referees",
            dir.display(),
            tables.teams.len(),
            tables.positions.len(),
            tables.players.len(),
            tables.coaches.len(),
            tables.referees.len()
        );
        Ok(tables)
    }
}

pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open input table {}", path.display()))?;
    read_rows_from(file, &path.display().to_string())
}

/// Skips the header, ignores blank rows and maps columns by position.
pub fn read_rows_from<T: DeserializeOwned, R: Read>(reader: R, label: &str) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based row numbers.
        let line = idx + 2;
        let record = record.with_context(|| format!("{label}: unreadable row {line}"))?;
        if record.iter().all(|cell| cell.is_empty()) {
            debug!("{label}: skipping blank row {line}");
            continue;
        }
        let row = record
            .deserialize::<T>(None)
            .with_context(|| format!("{label}: malformed row {line}"))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Teams are bucketed into leagues by load order. Overflow past the last league stays in it.
pub fn build_teams<R: Rng + ?Sized>(
    rows: &[TeamRow],
    teams_per_league: usize,
    league_count: u32,
    rng: &mut R,
) -> Vec<Team> {
    let per_league = teams_per_league.max(1);
    let last_league = league_count.max(1) - 1;
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let bucket = u32::try_from(index / per_league).unwrap_or(u32::MAX);
            Team {
                id: index as u32 + 1,
                name: row.name.clone(),
                city: row.city.clone(),
                founded_year: rng.gen_range(1890..2001),
                league_id: bucket.min(last_league) + 1,
                stadium_id: None,
            }
        })
        .collect()
}

/// Draws player positions while keeping the number of goalkeepers under a cap.
pub struct PositionPicker<'a> {
    positions: &'a [Position],
    outfield: Vec<&'a Position>,
    max_goalkeepers: usize,
    goalkeepers: usize,
}

impl<'a> PositionPicker<'a> {
    pub fn new(positions: &'a [Position], max_goalkeepers: usize) -> Self {
        Self {
            positions,
            outfield: positions.iter().filter(|p| !p.is_goalkeeper()).collect(),
            max_goalkeepers,
            goalkeepers: 0,
        }
    }

    pub fn goalkeepers(&self) -> usize {
        self.goalkeepers
    }

    pub fn pick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&'a Position> {
        if self.positions.is_empty() {
            return Err(anyhow!("positions table is empty"));
        }
        if self.goalkeepers >= self.max_goalkeepers {
            // Same distribution as redrawing until a non-goalkeeper comes up.
            if self.outfield.is_empty() {
                return Err(anyhow!(
                    "goalkeeper cap of {} reached and no other positions exist",
                    self.max_goalkeepers
                ));
            }
            return Ok(self.outfield[rng.gen_range(0..self.outfield.len())]);
        }
        let position = &self.positions[rng.gen_range(0..self.positions.len())];
        if position.is_goalkeeper() {
            self.goalkeepers += 1;
        }
        Ok(position)
    }
}

pub fn player_birth_range() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default(),
        NaiveDate::from_ymd_opt(2007, 12, 31).unwrap_or_default(),
    )
}

pub fn staff_birth_range() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(1940, 1, 1).unwrap_or_default(),
        NaiveDate::from_ymd_opt(2000, 12, 31).unwrap_or_default(),
    )
}

pub fn build_players<R: Rng + ?Sized>(
    rows: &[PlayerRow],
    positions: &[Position],
    max_goalkeepers: usize,
    rng: &mut R,
) -> Result<Vec<Player>> {
    let (born_from, born_to) = player_birth_range();
    let mut picker = PositionPicker::new(positions, max_goalkeepers);
    let mut players = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let birth_date = random_date_between(rng, born_from, born_to);
        let height_cm = rng.gen_range(160..211);
        let position = picker
            .pick(rng)
            .with_context(|| format!("assign position to player row {}", index + 2))?;
        players.push(Player {
            id: index as u32 + 1,
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            nationality: row.nationality.clone(),
            birth_date,
            height_cm,
            position_id: position.id.clone(),
        });
    }
    info!(
        "built {} players ({} goalkeepers, cap {})",
        players.len(),
        picker.goalkeepers(),
        max_goalkeepers
    );
    Ok(players)
}

/// Row number followed by four random lowercase letters. The letters never contain
/// digits, so distinct row numbers always yield distinct ids.
pub fn coach_id<R: Rng + ?Sized>(number: usize, rng: &mut R) -> String {
    let suffix = (0..4)
        .map(|_| COACH_ID_LETTERS[rng.gen_range(0..COACH_ID_LETTERS.len())] as char)
        .collect::<String>();
    format!("{number}{suffix}")
}

pub fn build_coaches<R: Rng + ?Sized>(rows: &[CoachRow], rng: &mut R) -> Vec<Coach> {
    let (born_from, born_to) = staff_birth_range();
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let birth_date = random_date_between(rng, born_from, born_to);
            Coach {
                id: coach_id(index + 1, rng),
                first_name: row.first_name.clone(),
                last_name: row.last_name.clone(),
                nationality: row.nationality.clone(),
                experience_level: row.experience_level.clone(),
                coaching_licenses: row.coaching_licenses,
                coaching_style: row.coaching_style.clone(),
                training_methods: row.training_methods.clone(),
                player_development_focus: row.player_development_focus.clone(),
                injury_management: row.injury_management.clone(),
                team_selection_criteria: row.team_selection_criteria.clone(),
                communication_style: row.communication_style.clone(),
                motivational_techniques: row.motivational_techniques.clone(),
                birth_date,
            }
        })
        .collect()
}

pub fn referee_id(number: usize) -> String {
    format!("REF{number:04}")
}

pub fn build_referees<R: Rng + ?Sized>(rows: &[RefereeRow], rng: &mut R) -> Vec<Referee> {
    let (born_from, born_to) = staff_birth_range();
    rows.iter()
        .enumerate()
        .map(|(index, row)| Referee {
            id: referee_id(index + 1),
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            nationality: row.nationality.clone(),
            email: row.email.clone(),
            phone_number: row.phone_number.clone(),
            birth_date: random_date_between(rng, born_from, born_to),
        })
        .collect()
}
