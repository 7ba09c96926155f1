//! Season-by-season coach and player assignment.
//!
//! Both passes walk seasons in the order the caller hands them in. Coach continuity
//! only makes sense when that order is chronological, see [`crate::reference::ordered_seasons`].

use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};
use rand::Rng;

use crate::config::AssignmentRules;
use crate::model::{Coach, CoachAssignment, Player, PlayerAssignment, Season, Team};
use crate::reference::has_reached_age;

/// Per-run coach bookkeeping: who coached each team last, and who is taken this season.
#[derive(Debug, Default)]
struct CoachLedger<'a> {
    last_coach_by_team: HashMap<u32, &'a str>,
    claimed: HashSet<&'a str>,
}

impl<'a> CoachLedger<'a> {
    fn start_season(&mut self) {
        self.claimed.clear();
    }

    fn claim(&mut self, team_id: u32, coach_id: &'a str) {
        self.claimed.insert(coach_id);
        self.last_coach_by_team.insert(team_id, coach_id);
    }
}

pub fn assign_coaches<R: Rng + ?Sized>(
    coaches: &[Coach],
    teams: &[Team],
    seasons: &[&Season],
    rules: &AssignmentRules,
    rng: &mut R,
) -> Vec<CoachAssignment> {
    let mut assignments = Vec::new();
    let mut ledger = CoachLedger::default();
    let retention = if rules.coach_retention.is_nan() {
        0.0
    } else {
        rules.coach_retention.clamp(0.0, 1.0)
    };

    for season in seasons {
        ledger.start_season();
        let eligible = coaches
            .iter()
            .filter(|c| has_reached_age(c.birth_date, rules.min_coach_age, season.start_date))
            .map(|c| c.id.as_str())
            .collect::<Vec<_>>();
        let mut retained = 0usize;
        let mut coachless = 0usize;

        for team in teams {
            let previous = ledger.last_coach_by_team.get(&team.id).copied();
            let kept = previous.filter(|coach_id| {
                rng.gen_bool(retention)
                    && !ledger.claimed.contains(coach_id)
                    && eligible.contains(coach_id)
            });

            let chosen = match kept {
                Some(coach_id) => {
                    retained += 1;
                    Some(coach_id)
                }
                None => {
                    let options = eligible
                        .iter()
                        .copied()
                        .filter(|coach_id| !ledger.claimed.contains(coach_id))
                        .collect::<Vec<_>>();
                    if options.is_empty() {
                        None
                    } else {
                        Some(options[rng.gen_range(0..options.len())])
                    }
                }
            };

            let Some(coach_id) = chosen else {
                coachless += 1;
                continue;
            };
            ledger.claim(team.id, coach_id);
            assignments.push(CoachAssignment {
                id: format!("ASGN{}", assignments.len() + 1),
                coach_id: coach_id.to_string(),
                team_id: team.id,
                season_id: season.id,
            });
        }

        if coachless > 0 {
            warn!(
                "season {}: {} teams left without a coach ({} eligible coaches)",
                season.name,
                coachless,
                eligible.len()
            );
        }
        debug!("season {}: {} coaches retained", season.name, retained);
    }

    info!("generated {} coach assignments", assignments.len());
    assignments
}

pub fn assign_players<R: Rng + ?Sized>(
    players: &[Player],
    teams: &[Team],
    seasons: &[&Season],
    rules: &AssignmentRules,
    rng: &mut R,
) -> Vec<PlayerAssignment> {
    let mut assignments = Vec::new();
    let roster_max = rules.roster_max.max(rules.roster_min);

    for season in seasons {
        let mut pool = players
            .iter()
            .filter(|p| has_reached_age(p.birth_date, rules.min_player_age, season.start_date))
            .collect::<Vec<_>>();
        let eligible = pool.len();
        let mut taken = HashSet::with_capacity(eligible);

        for team in teams {
            let target = rng.gen_range(rules.roster_min..=roster_max);
            let mut roster = 0usize;
            while roster < target && !pool.is_empty() {
                let player = pool.swap_remove(rng.gen_range(0..pool.len()));
                if !taken.insert(player.id) {
                    continue;
                }
                roster += 1;
                assignments.push(PlayerAssignment {
                    id: format!("PASGN{}", assignments.len() + 1),
                    player_id: player.id,
                    team_id: team.id,
                    season_id: season.id,
                });
            }
        }

        if pool.is_empty() && !teams.is_empty() {
            debug!(
                "season {}: eligible pool of {} players exhausted",
                season.name, eligible
            );
        }
    }

    info!("generated {} player assignments", assignments.len());
    assignments
}
