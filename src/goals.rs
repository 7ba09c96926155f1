//! Goal synthesis that agrees with the already decided match outcome.

use std::collections::HashMap;

use log::{info, warn};
use rand::Rng;

use crate::model::{Goal, Match, MatchOutcome, PlayerAssignment};

/// Players on each `(season_id, team_id)` roster, in assignment order.
pub type RosterIndex = HashMap<(u32, u32), Vec<u32>>;

#[derive(Debug, Clone, Default)]
pub struct GoalReport {
    pub goals: Vec<Goal>,
    /// Decisive matches whose winner had no roster, so no goals could back the result.
    pub unscorable: Vec<String>,
}

pub fn roster_index(assignments: &[PlayerAssignment]) -> RosterIndex {
    let mut index = RosterIndex::new();
    for a in assignments {
        index.entry((a.season_id, a.team_id)).or_default().push(a.player_id);
    }
    index
}

/// Owns the goal counter, so goal ids keep increasing across the whole run.
pub struct GoalGenerator {
    next_id: u64,
}

impl Default for GoalGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalGenerator {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        matches: &[Match],
        assignments: &[PlayerAssignment],
        rng: &mut R,
    ) -> GoalReport {
        let rosters = roster_index(assignments);
        let mut report = GoalReport::default();

        for m in matches {
            let home = roster_of(&rosters, m.season_id, m.home_team_id);
            let away = roster_of(&rosters, m.season_id, m.away_team_id);

            let (home_goals, away_goals) = match (m.outcome(), home.is_empty(), away.is_empty()) {
                (MatchOutcome::HomeWin, true, _) | (MatchOutcome::AwayWin, _, true) => {
                    report.unscorable.push(m.id.clone());
                    continue;
                }
                (MatchOutcome::Draw, true, _) | (MatchOutcome::Draw, _, true) => continue,
                (outcome, _, _) => goal_counts(outcome, home.len(), away.len(), rng),
            };

            self.score(m, m.home_team_id, home, home_goals, rng, &mut report.goals);
            self.score(m, m.away_team_id, away, away_goals, rng, &mut report.goals);
        }

        if !report.unscorable.is_empty() {
            warn!(
                "{} decisive matches have a winner without a roster; no goals generated for them",
                report.unscorable.len()
            );
        }
        info!("generated {} goals for {} matches", report.goals.len(), matches.len());
        report
    }

    fn score<R: Rng + ?Sized>(
        &mut self,
        m: &Match,
        team_id: u32,
        roster: &[u32],
        count: u32,
        rng: &mut R,
        out: &mut Vec<Goal>,
    ) {
        if roster.is_empty() {
            return;
        }
        for _ in 0..count {
            let scorer = roster[rng.gen_range(0..roster.len())];
            out.push(Goal {
                goal_id: self.next_id,
                match_id: m.id.clone(),
                player_id: scorer,
                team_id,
                season_id: m.season_id,
                league_id: m.league_id,
            });
            self.next_id += 1;
        }
    }
}

fn roster_of(rosters: &RosterIndex, season_id: u32, team_id: u32) -> &[u32] {
    rosters
        .get(&(season_id, team_id))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Uniform in `[1, roster / 2)`, or exactly 1 when that range is empty.
pub fn draw_goal_count<R: Rng + ?Sized>(roster: usize, rng: &mut R) -> u32 {
    let upper = (roster / 2).max(1) as u32;
    if upper <= 1 {
        return 1;
    }
    rng.gen_range(1..upper)
}

/// Returns `(home, away)` goal counts for the given outcome. A decisive winner always
/// ends at least one goal ahead, and a draw is level.
pub fn goal_counts<R: Rng + ?Sized>(
    outcome: MatchOutcome,
    home_roster: usize,
    away_roster: usize,
    rng: &mut R,
) -> (u32, u32) {
    match outcome {
        MatchOutcome::HomeWin => {
            let (winner, loser) = decisive_counts(home_roster, away_roster, rng);
            (winner, loser)
        }
        MatchOutcome::AwayWin => {
            let (winner, loser) = decisive_counts(away_roster, home_roster, rng);
            (loser, winner)
        }
        MatchOutcome::Draw => {
            let home = draw_goal_count(home_roster, rng);
            let away = draw_goal_count(away_roster, rng);
            let level = home.min(away);
            (level, level)
        }
    }
}

fn decisive_counts<R: Rng + ?Sized>(
    winner_roster: usize,
    loser_roster: usize,
    rng: &mut R,
) -> (u32, u32) {
    let winner = draw_goal_count(winner_roster, rng);
    let loser = draw_goal_count(loser_roster, rng)
        .min(winner - 1)
        .min((loser_roster / 2) as u32);
    (winner, loser)
}
