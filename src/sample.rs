//! Built-in synthetic input tables, for running without real source spreadsheets.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::loaders::{
    COACHES_FILE, CoachRow, InputTables, PLAYERS_FILE, POSITIONS_FILE, PlayerRow, REFEREES_FILE,
    RefereeRow, TEAMS_FILE, TeamRow,
};
use crate::model::{GOALKEEPER, Position};

const FIRST_NAMES: &[&str] = &[
    "Alisson", "Bruno", "Carlos", "Daan", "Emil", "Felix", "Gabriel", "Hugo", "Ivan", "Jonas",
    "Kai", "Luca", "Marco", "Niko", "Oscar", "Pedro", "Quinn", "Rafael", "Sven", "Tomas",
    "Umar", "Victor", "Wout", "Xavi", "Yannick", "Zlatan",
];

const LAST_NAMES: &[&str] = &[
    "Alvarez", "Bakker", "Costa", "Dijkstra", "Eriksen", "Fischer", "Garcia", "Hansen",
    "Ibrahim", "Jansen", "Kovac", "Lopez", "Muller", "Novak", "Olsen", "Petrov", "Rossi",
    "Silva", "Tanaka", "Usman", "Visser", "Weber", "Young", "Zielinski",
];

const NATIONALITIES: &[&str] = &[
    "Netherlands", "Brazil", "Germany", "Spain", "Italy", "Denmark", "Croatia", "Japan",
    "Nigeria", "Poland", "Portugal", "Sweden",
];

const CITIES: &[&str] = &[
    "Amsterdam", "Rotterdam", "Utrecht", "Eindhoven", "Groningen", "Leiden", "Breda",
    "Nijmegen", "Tilburg", "Zwolle", "Arnhem", "Haarlem", "Maastricht", "Enschede",
];

const CLUB_SUFFIXES: &[&str] = &["FC", "United", "City", "Athletic", "Rovers", "Sporting"];

const EXPERIENCE_LEVELS: &[&str] = &["Junior", "Intermediate", "Senior", "Elite"];

const COACHING_STYLES: &[&str] = &["Possession", "Counter-attacking", "High press", "Direct"];

const TRAINING_METHODS: &[&str] = &[
    "Small-sided games",
    "Drills",
    "Video analysis",
    "Periodization",
];

const FOCUS_AREAS: &[&str] = &[
    "Youth academy",
    "Technical skills",
    "Physical conditioning",
    "Tactics",
];

const POSITIONS: &[(&str, &str, &str)] = &[
    ("GK", GOALKEEPER, "Goalkeeper"),
    ("CB", "Centre-Back", "Defender"),
    ("LB", "Left-Back", "Defender"),
    ("RB", "Right-Back", "Defender"),
    ("DM", "Defensive Midfielder", "Midfielder"),
    ("CM", "Central Midfielder", "Midfielder"),
    ("AM", "Attacking Midfielder", "Midfielder"),
    ("LW", "Left Winger", "Forward"),
    ("RW", "Right Winger", "Forward"),
    ("ST", "Striker", "Forward"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSizes {
    pub teams: usize,
    pub players: usize,
    pub coaches: usize,
    pub referees: usize,
}

impl Default for SampleSizes {
    fn default() -> Self {
        Self {
            teams: 240,
            players: 12_000,
            coaches: 400,
            referees: 150,
        }
    }
}

fn pick<'a, R: Rng + ?Sized>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

pub fn sample_positions() -> Vec<Position> {
    POSITIONS
        .iter()
        .map(|(id, name, category)| Position {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
        })
        .collect()
}

pub fn sample_inputs<R: Rng + ?Sized>(sizes: SampleSizes, rng: &mut R) -> InputTables {
    let teams = (1..=sizes.teams)
        .map(|n| {
            let city = pick(CITIES, rng);
            TeamRow {
                // The counter keeps club names unique however small the pools are.
                name: format!("{city} {} {n}", pick(CLUB_SUFFIXES, rng)),
                city: city.to_string(),
            }
        })
        .collect();

    let players = (0..sizes.players)
        .map(|_| PlayerRow {
            first_name: pick(FIRST_NAMES, rng).to_string(),
            last_name: pick(LAST_NAMES, rng).to_string(),
            nationality: pick(NATIONALITIES, rng).to_string(),
        })
        .collect();

    let coaches = (0..sizes.coaches)
        .map(|_| CoachRow {
            first_name: pick(FIRST_NAMES, rng).to_string(),
            last_name: pick(LAST_NAMES, rng).to_string(),
            nationality: pick(NATIONALITIES, rng).to_string(),
            experience_level: pick(EXPERIENCE_LEVELS, rng).to_string(),
            coaching_licenses: rng.gen_range(1..6),
            coaching_style: pick(COACHING_STYLES, rng).to_string(),
            training_methods: pick(TRAINING_METHODS, rng).to_string(),
            player_development_focus: pick(FOCUS_AREAS, rng).to_string(),
            injury_management: "Staged return".to_string(),
            team_selection_criteria: "Form".to_string(),
            communication_style: "Direct".to_string(),
            motivational_techniques: "Goal setting".to_string(),
        })
        .collect();

    let referees = (1..=sizes.referees)
        .map(|n| {
            let last_name = pick(LAST_NAMES, rng);
            RefereeRow {
                first_name: pick(FIRST_NAMES, rng).to_string(),
                last_name: last_name.to_string(),
                nationality: pick(NATIONALITIES, rng).to_string(),
                email: format!("{}.{n}@referees.example", last_name.to_lowercase()),
                phone_number: format!("+31 6 {:08}", rng.gen_range(0..100_000_000u32)),
            }
        })
        .collect();

    InputTables {
        teams,
        positions: sample_positions(),
        players,
        coaches,
        referees,
    }
}

pub fn write_sample_inputs(dir: &Path, tables: &InputTables) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    write_table(&dir.join(TEAMS_FILE), &["Name", "City"], &tables.teams)?;
    write_table(
        &dir.join(POSITIONS_FILE),
        &["PositionId", "Name", "Category"],
        &tables.positions,
    )?;
    write_table(
        &dir.join(PLAYERS_FILE),
        &["FirstName", "LastName", "Nationality"],
        &tables.players,
    )?;
    write_table(
        &dir.join(COACHES_FILE),
        &[
            "FirstName",
            "LastName",
            "Nationality",
            "ExperienceLevel",
            "CoachingLicenses",
            "CoachingStyle",
            "TrainingMethods",
            "PlayerDevelopmentFocus",
            "InjuryManagement",
            "TeamSelectionCriteria",
            "CommunicationStyle",
            "MotivationalTechniques",
        ],
        &tables.coaches,
    )?;
    write_table(
        &dir.join(REFEREES_FILE),
        &["FirstName", "LastName", "Nationality", "Email", "PhoneNumber"],
        &tables.referees,
    )?;
    info!("wrote sample inputs to {}", dir.display());
    Ok(())
}

/// Header is written explicitly so empty tables still carry one.
fn write_table<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    writer
        .write_record(header)
        .with_context(|| format!("write header of {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
