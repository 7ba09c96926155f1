use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Utc};

pub const SEASON_COUNT: usize = 20;
pub const LEAGUE_COUNT: u32 = 8;
pub const TEAMS_PER_LEAGUE: usize = 30;
pub const STADIUM_POOL_SIZE: usize = 200;
pub const MAX_GOALKEEPERS: usize = 4500;

const DEFAULT_INPUT_DIR: &str = "data";
const DEFAULT_OUTPUT_DIR: &str = "out";

/// Order in which the assignment and fixture engines walk the season list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonOrder {
    /// Oldest season first, so coach continuity flows forward in time.
    #[default]
    Chronological,
    /// Whatever order the season generator produced (newest first).
    AsGenerated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignmentRules {
    pub roster_min: usize,
    pub roster_max: usize,
    pub coach_retention: f64,
    pub min_coach_age: u32,
    pub min_player_age: u32,
}

impl Default for AssignmentRules {
    fn default() -> Self {
        Self {
            roster_min: 20,
            roster_max: 50,
            coach_retention: 0.7,
            min_coach_age: 20,
            min_player_age: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub current_year: i32,
    pub season_count: usize,
    pub league_count: u32,
    pub teams_per_league: usize,
    pub stadium_pool_size: usize,
    pub max_goalkeepers: usize,
    pub attendance_min: u32,
    pub attendance_max: u32,
    pub season_order: SeasonOrder,
    pub rules: AssignmentRules,
}

impl GenerationParams {
    pub fn for_year(current_year: i32) -> Self {
        Self {
            current_year,
            season_count: SEASON_COUNT,
            league_count: LEAGUE_COUNT,
            teams_per_league: TEAMS_PER_LEAGUE,
            stadium_pool_size: STADIUM_POOL_SIZE,
            max_goalkeepers: MAX_GOALKEEPERS,
            attendance_min: 5_000,
            attendance_max: 50_000,
            season_order: SeasonOrder::Chronological,
            rules: AssignmentRules::default(),
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::for_year(Utc::now().year())
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub seed: Option<u64>,
    pub strict: bool,
    pub params: GenerationParams,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            seed: None,
            strict: false,
            params: GenerationParams::default(),
        }
    }
}

impl RunConfig {
    /// Reads `APP_*` variables on top of the defaults. Call after `.env` files are loaded.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(dir) = env_nonempty("APP_INPUT_DIR") {
            config.input_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env_nonempty("APP_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = env_nonempty("APP_SEED") {
            config.seed = Some(parse_seed(&raw).context("APP_SEED")?);
        }
        if let Some(raw) = env_nonempty("APP_CURRENT_YEAR") {
            config.params.current_year = parse_year(&raw).context("APP_CURRENT_YEAR")?;
        }
        if let Some(raw) = env_nonempty("APP_STRICT") {
            config.strict = parse_flag(&raw);
        }
        Ok(config)
    }

    /// Applies `--input-dir`, `--out-dir`, `--seed`, `--year` and `--strict`.
    pub fn apply_args<I, S>(mut self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = args.into_iter().map(Into::into).collect::<Vec<String>>();
        if let Some(dir) = arg_value(&args, "--input-dir") {
            self.input_dir = PathBuf::from(dir);
        }
        if let Some(dir) = arg_value(&args, "--out-dir") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = arg_value(&args, "--seed") {
            self.seed = Some(parse_seed(&raw).context("--seed")?);
        }
        if let Some(raw) = arg_value(&args, "--year") {
            self.params.current_year = parse_year(&raw).context("--year")?;
        }
        if args.iter().any(|arg| arg == "--strict") {
            self.strict = true;
        }
        Ok(self)
    }
}

/// Accepts both `--flag=value` and `--flag value`.
pub fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

fn parse_seed(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|err| anyhow!("invalid seed {raw:?}: {err}"))
}

fn parse_year(raw: &str) -> Result<i32> {
    let year = raw
        .trim()
        .parse::<i32>()
        .map_err(|err| anyhow!("invalid year {raw:?}: {err}"))?;
    if !(1900..=9999).contains(&year) {
        return Err(anyhow!("year {year} out of range"));
    }
    Ok(year)
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
