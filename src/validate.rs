//! Post-generation integrity checks over a finished [`Dataset`].

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::config::AssignmentRules;
use crate::goals::roster_index;
use crate::model::{Dataset, MatchOutcome};
use crate::reference::has_reached_age;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    FixtureCount {
        season_id: u32,
        league_id: u32,
        expected: usize,
        found: usize,
    },
    DuplicateFixture {
        season_id: u32,
        home: u32,
        away: u32,
    },
    PlayerDoubleBooked {
        season_id: u32,
        player_id: u32,
    },
    CoachDoubleBooked {
        season_id: u32,
        coach_id: String,
    },
    PlayerTooYoung {
        season_id: u32,
        player_id: u32,
    },
    CoachTooYoung {
        season_id: u32,
        coach_id: String,
    },
    GoalKeyMismatch {
        goal_id: u64,
        match_id: String,
    },
    GoalsContradictOutcome {
        match_id: String,
        home: usize,
        away: usize,
    },
    MatchOutsideSeason {
        match_id: String,
    },
    DanglingReference {
        entity: &'static str,
        id: String,
        missing: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::FixtureCount {
                season_id,
                league_id,
                expected,
                found,
            } => write!(
                f,
                "season {season_id} league {league_id}: expected {expected} fixtures, found {found}"
            ),
            Violation::DuplicateFixture { season_id, home, away } => {
                write!(f, "season {season_id}: fixture {home} vs {away} scheduled twice")
            }
            Violation::PlayerDoubleBooked { season_id, player_id } => {
                write!(f, "season {season_id}: player {player_id} on more than one roster")
            }
            Violation::CoachDoubleBooked { season_id, coach_id } => {
                write!(f, "season {season_id}: coach {coach_id} assigned to more than one team")
            }
            Violation::PlayerTooYoung { season_id, player_id } => {
                write!(f, "season {season_id}: player {player_id} below minimum age")
            }
            Violation::CoachTooYoung { season_id, coach_id } => {
                write!(f, "season {season_id}: coach {coach_id} below minimum age")
            }
            Violation::GoalKeyMismatch { goal_id, match_id } => {
                write!(f, "goal {goal_id} does not match keys of match {match_id}")
            }
            Violation::GoalsContradictOutcome { match_id, home, away } => {
                write!(f, "match {match_id}: {home}-{away} contradicts recorded outcome")
            }
            Violation::MatchOutsideSeason { match_id } => {
                write!(f, "match {match_id} dated outside its season")
            }
            Violation::DanglingReference { entity, id, missing } => {
                write!(f, "{entity} {id} references missing {missing}")
            }
        }
    }
}

pub fn check_dataset(data: &Dataset, rules: &AssignmentRules) -> Vec<Violation> {
    let mut out = Vec::new();
    check_fixture_coverage(data, &mut out);
    check_assignments(data, rules, &mut out);
    check_goals(data, &mut out);
    check_references(data, &mut out);
    out
}

fn check_fixture_coverage(data: &Dataset, out: &mut Vec<Violation>) {
    let mut league_sizes: HashMap<u32, usize> = HashMap::new();
    for team in &data.teams {
        *league_sizes.entry(team.league_id).or_default() += 1;
    }

    let mut counts: HashMap<(u32, u32), usize> = HashMap::new();
    let mut pairs = HashSet::new();
    for m in &data.matches {
        *counts.entry((m.season_id, m.league_id)).or_default() += 1;
        if !pairs.insert((m.season_id, m.home_team_id, m.away_team_id)) {
            out.push(Violation::DuplicateFixture {
                season_id: m.season_id,
                home: m.home_team_id,
                away: m.away_team_id,
            });
        }
    }

    for season in &data.seasons {
        let mut leagues = league_sizes.iter().collect::<Vec<_>>();
        leagues.sort_unstable();
        for (league_id, n) in leagues {
            let expected = n * n.saturating_sub(1);
            let found = counts.get(&(season.id, *league_id)).copied().unwrap_or(0);
            if expected != found {
                out.push(Violation::FixtureCount {
                    season_id: season.id,
                    league_id: *league_id,
                    expected,
                    found,
                });
            }
        }
    }
}

fn check_assignments(data: &Dataset, rules: &AssignmentRules, out: &mut Vec<Violation>) {
    let seasons = data
        .seasons
        .iter()
        .map(|s| (s.id, s))
        .collect::<HashMap<_, _>>();
    let players = data
        .players
        .iter()
        .map(|p| (p.id, p))
        .collect::<HashMap<_, _>>();
    let coaches = data
        .coaches
        .iter()
        .map(|c| (c.id.as_str(), c))
        .collect::<HashMap<_, _>>();

    let mut booked_players = HashSet::new();
    for a in &data.player_assignments {
        if !booked_players.insert((a.season_id, a.player_id)) {
            out.push(Violation::PlayerDoubleBooked {
                season_id: a.season_id,
                player_id: a.player_id,
            });
        }
        if let (Some(season), Some(player)) =
            (seasons.get(&a.season_id), players.get(&a.player_id))
            && !has_reached_age(player.birth_date, rules.min_player_age, season.start_date)
        {
            out.push(Violation::PlayerTooYoung {
                season_id: a.season_id,
                player_id: a.player_id,
            });
        }
    }

    let mut booked_coaches = HashSet::new();
    for a in &data.coach_assignments {
        if !booked_coaches.insert((a.season_id, a.coach_id.as_str())) {
            out.push(Violation::CoachDoubleBooked {
                season_id: a.season_id,
                coach_id: a.coach_id.clone(),
            });
        }
        if let (Some(season), Some(coach)) =
            (seasons.get(&a.season_id), coaches.get(a.coach_id.as_str()))
            && !has_reached_age(coach.birth_date, rules.min_coach_age, season.start_date)
        {
            out.push(Violation::CoachTooYoung {
                season_id: a.season_id,
                coach_id: a.coach_id.clone(),
            });
        }
    }
}

fn check_goals(data: &Dataset, out: &mut Vec<Violation>) {
    let matches = data
        .matches
        .iter()
        .map(|m| (m.id.as_str(), m))
        .collect::<HashMap<_, _>>();
    let mut tallies: HashMap<&str, (usize, usize)> = HashMap::new();

    for goal in &data.goals {
        let Some(m) = matches.get(goal.match_id.as_str()) else {
            out.push(Violation::DanglingReference {
                entity: "goal",
                id: goal.goal_id.to_string(),
                missing: format!("match {}", goal.match_id),
            });
            continue;
        };
        if goal.season_id != m.season_id
            || goal.league_id != m.league_id
            || !m.involves(goal.team_id)
        {
            out.push(Violation::GoalKeyMismatch {
                goal_id: goal.goal_id,
                match_id: m.id.clone(),
            });
            continue;
        }
        let tally = tallies.entry(m.id.as_str()).or_default();
        if goal.team_id == m.home_team_id {
            tally.0 += 1;
        } else {
            tally.1 += 1;
        }
    }

    let rosters = roster_index(&data.player_assignments);
    for m in &data.matches {
        let staffed = |team_id| {
            rosters
                .get(&(m.season_id, team_id))
                .is_some_and(|players| !players.is_empty())
        };
        if !staffed(m.home_team_id) || !staffed(m.away_team_id) {
            continue;
        }
        let (home, away) = tallies.get(m.id.as_str()).copied().unwrap_or((0, 0));
        let consistent = match m.outcome() {
            MatchOutcome::HomeWin => home > away,
            MatchOutcome::AwayWin => away > home,
            MatchOutcome::Draw => home == away,
        };
        if !consistent {
            out.push(Violation::GoalsContradictOutcome {
                match_id: m.id.clone(),
                home,
                away,
            });
        }
    }
}

fn check_references(data: &Dataset, out: &mut Vec<Violation>) {
    let seasons = data
        .seasons
        .iter()
        .map(|s| (s.id, s))
        .collect::<HashMap<_, _>>();
    let leagues = data.leagues.iter().map(|l| l.id).collect::<HashSet<_>>();
    let teams = data.teams.iter().map(|t| t.id).collect::<HashSet<_>>();
    let stadiums = data
        .stadiums
        .iter()
        .map(|s| s.id.as_str())
        .collect::<HashSet<_>>();
    let referees = data
        .referees
        .iter()
        .map(|r| r.id.as_str())
        .collect::<HashSet<_>>();
    let positions = data
        .positions
        .iter()
        .map(|p| p.id.as_str())
        .collect::<HashSet<_>>();

    for team in &data.teams {
        if !leagues.contains(&team.league_id) {
            let missing = format!("league {}", team.league_id);
            out.push(dangling("team", &team.id.to_string(), missing));
        }
        if let Some(stadium_id) = team.stadium_id.as_deref()
            && !stadiums.contains(stadium_id)
        {
            out.push(dangling("team", &team.id.to_string(), format!("stadium {stadium_id}")));
        }
    }

    for player in &data.players {
        if !positions.contains(player.position_id.as_str()) {
            let missing = format!("position {}", player.position_id);
            out.push(dangling("player", &player.id.to_string(), missing));
        }
    }

    for m in &data.matches {
        for team_id in [m.home_team_id, m.away_team_id] {
            if !teams.contains(&team_id) {
                out.push(dangling("match", &m.id, format!("team {team_id}")));
            }
        }
        if !leagues.contains(&m.league_id) {
            out.push(dangling("match", &m.id, format!("league {}", m.league_id)));
        }
        if let Some(stadium_id) = m.stadium_id.as_deref()
            && !stadiums.contains(stadium_id)
        {
            out.push(dangling("match", &m.id, format!("stadium {stadium_id}")));
        }
        if let Some(referee_id) = m.referee_id.as_deref()
            && !referees.contains(referee_id)
        {
            out.push(dangling("match", &m.id, format!("referee {referee_id}")));
        }
        match seasons.get(&m.season_id) {
            Some(season) if !season.contains(m.date) => {
                out.push(Violation::MatchOutsideSeason {
                    match_id: m.id.clone(),
                });
            }
            Some(_) => {}
            None => out.push(dangling("match", &m.id, format!("season {}", m.season_id))),
        }
    }
}

fn dangling(entity: &'static str, id: &str, missing: String) -> Violation {
    Violation::DanglingReference {
        entity,
        id: id.to_string(),
        missing,
    }
}
