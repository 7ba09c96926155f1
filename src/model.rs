use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const GOALKEEPER: &str = "Goalkeeper";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    pub id: u32,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Season {
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct League {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub city: String,
    pub founded_year: i32,
    pub league_id: u32,
    pub stadium_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stadium {
    pub id: String,
    pub name: String,
    pub capacity: u32,
    pub city: String,
    pub address: String,
}

/// Reference data, kept exactly as read from the positions table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "PositionId")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Category")]
    pub category: String,
}

impl Position {
    pub fn is_goalkeeper(&self) -> bool {
        self.name == GOALKEEPER
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub nationality: String,
    pub birth_date: NaiveDate,
    pub height_cm: u32,
    pub position_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coach {
    pub id: String,
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
    pub birth_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub nationality: String,
    pub email: String,
    pub phone_number: String,
    pub birth_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachAssignment {
    pub id: String,
    pub coach_id: String,
    pub team_id: u32,
    pub season_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerAssignment {
    pub id: String,
    pub player_id: u32,
    pub team_id: u32,
    pub season_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    HomeWin,
    AwayWin,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: String,
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub stadium_id: Option<String>,
    pub referee_id: Option<String>,
    pub date: NaiveDate,
    pub attendance: u32,
    pub season_id: u32,
    pub league_id: u32,
    /// `None` means the match was drawn.
    pub winner_team_id: Option<u32>,
}

impl Match {
    pub fn outcome(&self) -> MatchOutcome {
        match self.winner_team_id {
            Some(id) if id == self.home_team_id => MatchOutcome::HomeWin,
            Some(_) => MatchOutcome::AwayWin,
            None => MatchOutcome::Draw,
        }
    }

    pub fn loser_team_id(&self) -> Option<u32> {
        match self.outcome() {
            MatchOutcome::HomeWin => Some(self.away_team_id),
            MatchOutcome::AwayWin => Some(self.home_team_id),
            MatchOutcome::Draw => None,
        }
    }

    pub fn involves(&self, team_id: u32) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Goal {
    pub goal_id: u64,
    pub match_id: String,
    pub player_id: u32,
    pub team_id: u32,
    pub season_id: u32,
    pub league_id: u32,
}

/// Every collection the generator produces, in pipeline order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub seasons: Vec<Season>,
    pub leagues: Vec<League>,
    pub teams: Vec<Team>,
    pub stadiums: Vec<Stadium>,
    pub positions: Vec<Position>,
    pub players: Vec<Player>,
    pub coaches: Vec<Coach>,
    pub referees: Vec<Referee>,
    pub coach_assignments: Vec<CoachAssignment>,
    pub player_assignments: Vec<PlayerAssignment>,
    pub matches: Vec<Match>,
    pub goals: Vec<Goal>,
}
