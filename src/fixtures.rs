use log::{info, warn};
use rand::Rng;

use crate::model::{Match, MatchOutcome, Referee, Season, Team};
use crate::reference::random_date_between;

/// Builds double round-robin schedules. Owns the match counter, so ids keep
/// increasing across every season and league of a run.
pub struct FixtureGenerator<'a> {
    referees: &'a [Referee],
    attendance_min: u32,
    attendance_max: u32,
    next_id: u64,
}

impl<'a> FixtureGenerator<'a> {
    pub fn new(referees: &'a [Referee], attendance_min: u32, attendance_max: u32) -> Self {
        Self {
            referees,
            attendance_min,
            attendance_max: attendance_max.max(attendance_min.saturating_add(1)),
            next_id: 1,
        }
    }

    pub fn issued(&self) -> u64 {
        self.next_id - 1
    }

    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        teams: &[Team],
        seasons: &[&Season],
        rng: &mut R,
    ) -> Vec<Match> {
        if self.referees.is_empty() {
            warn!("referee pool is empty; fixtures will have no referee");
        }
        let leagues = teams_by_league(teams);
        let mut matches = Vec::new();

        for season in seasons {
            for (league_id, members) in &leagues {
                if members.len() < 2 {
                    warn!(
                        "season {}: league {} has {} team(s), no fixtures",
                        season.name,
                        league_id,
                        members.len()
                    );
                    continue;
                }
                for i in 0..members.len() {
                    for j in (i + 1)..members.len() {
                        let first =
                            self.create_match(members[i], members[j], season, *league_id, rng);
                        matches.push(first);
                        let second =
                            self.create_match(members[j], members[i], season, *league_id, rng);
                        matches.push(second);
                    }
                }
            }
        }

        info!(
            "generated {} fixtures across {} leagues and {} seasons",
            matches.len(),
            leagues.len(),
            seasons.len()
        );
        matches
    }

    fn create_match<R: Rng + ?Sized>(
        &mut self,
        home: &Team,
        away: &Team,
        season: &Season,
        league_id: u32,
        rng: &mut R,
    ) -> Match {
        let id = format!("M{}", self.next_id);
        self.next_id += 1;

        let referee_id = if self.referees.is_empty() {
            None
        } else {
            Some(self.referees[rng.gen_range(0..self.referees.len())].id.clone())
        };
        let date = random_date_between(rng, season.start_date, season.end_date);
        let attendance = if self.attendance_min < self.attendance_max {
            rng.gen_range(self.attendance_min..self.attendance_max)
        } else {
            self.attendance_min
        };
        let winner_team_id = match decide_outcome(rng) {
            MatchOutcome::HomeWin => Some(home.id),
            MatchOutcome::AwayWin => Some(away.id),
            MatchOutcome::Draw => None,
        };

        Match {
            id,
            home_team_id: home.id,
            away_team_id: away.id,
            stadium_id: home.stadium_id.clone(),
            referee_id,
            date,
            attendance,
            season_id: season.id,
            league_id,
            winner_team_id,
        }
    }
}

/// Home win, away win and draw are equally likely.
pub fn decide_outcome<R: Rng + ?Sized>(rng: &mut R) -> MatchOutcome {
    match rng.gen_range(0..3) {
        0 => MatchOutcome::HomeWin,
        1 => MatchOutcome::AwayWin,
        _ => MatchOutcome::Draw,
    }
}

/// Groups teams by league, keeping leagues in order of first appearance.
pub fn teams_by_league(teams: &[Team]) -> Vec<(u32, Vec<&Team>)> {
    let mut out: Vec<(u32, Vec<&Team>)> = Vec::new();
    for team in teams {
        match out.iter_mut().find(|(league_id, _)| *league_id == team.league_id) {
            Some((_, members)) => members.push(team),
            None => out.push((team.league_id, vec![team])),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    use crate::config::SeasonOrder;
    use crate::reference::{generate_seasons, ordered_seasons};

    fn team(id: u32, league_id: u32) -> Team {
        Team {
            id,
            name: format!("Team {id}"),
            city: "City".to_string(),
            founded_year: 1900,
            league_id,
            stadium_id: Some(format!("S{id}1000")),
        }
    }

    fn referees(n: usize) -> Vec<Referee> {
        (1..=n)
            .map(|i| Referee {
                id: format!("REF{i:04}"),
                first_name: "R".to_string(),
                last_name: i.to_string(),
                nationality: "NL".to_string(),
                email: String::new(),
                phone_number: String::new(),
                birth_date: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            })
            .collect()
    }

    #[test]
    fn two_team_league_plays_twice() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let seasons = generate_seasons(2024, 1).unwrap();
        let ordered = ordered_seasons(&seasons, SeasonOrder::Chronological);
        let refs = referees(3);
        let mut generator = FixtureGenerator::new(&refs, 5_000, 50_000);
        let matches = generator.generate(&[team(1, 1), team(2, 1)], &ordered, &mut rng);

        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].home_team_id, matches[0].away_team_id), (1, 2));
        assert_eq!((matches[1].home_team_id, matches[1].away_team_id), (2, 1));
        assert_eq!(matches[0].stadium_id.as_deref(), Some("S11000"));
        assert_eq!(matches[1].stadium_id.as_deref(), Some("S21000"));
        assert_eq!(matches[0].id, "M1");
        assert_eq!(matches[1].id, "M2");
    }

    #[test]
    fn every_ordered_pair_once_per_league_season() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let seasons = generate_seasons(2025, 3).unwrap();
        let ordered = ordered_seasons(&seasons, SeasonOrder::Chronological);
        let teams = (1..=6)
            .map(|id| team(id, 1))
            .chain((7..=10).map(|id| team(id, 2)))
            .collect::<Vec<_>>();
        let refs = referees(4);
        let mut generator = FixtureGenerator::new(&refs, 5_000, 50_000);
        let matches = generator.generate(&teams, &ordered, &mut rng);

        assert_eq!(matches.len(), 3 * (6 * 5 + 4 * 3));
        assert_eq!(generator.issued(), matches.len() as u64);

        let mut pairs = HashSet::new();
        for m in &matches {
            assert!(pairs.insert((m.season_id, m.home_team_id, m.away_team_id)));
            assert_ne!(m.home_team_id, m.away_team_id);
            let season = seasons.iter().find(|s| s.id == m.season_id).unwrap();
            assert!(season.contains(m.date));
            assert!((5_000..50_000).contains(&m.attendance));
            assert!(m.referee_id.is_some());
            assert!(m.winner_team_id.is_none_or(|w| m.involves(w)));
        }
        let ids = matches.iter().map(|m| m.id.clone()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), matches.len());
    }

    #[test]
    fn lonely_league_and_missing_referees_degrade() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let seasons = generate_seasons(2025, 1).unwrap();
        let ordered = ordered_seasons(&seasons, SeasonOrder::Chronological);
        let mut generator = FixtureGenerator::new(&[], 5_000, 50_000);
        let matches = generator.generate(&[team(1, 1), team(2, 2), team(3, 2)], &ordered, &mut rng);
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.league_id == 2 && m.referee_id.is_none()));
    }

    #[test]
    fn attendance_bounds_at_the_type_limit() {
        let mut rng = ChaCha8Rng::seed_from_u64(25);
        let seasons = generate_seasons(2025, 1).unwrap();
        let ordered = ordered_seasons(&seasons, SeasonOrder::Chronological);
        let mut generator = FixtureGenerator::new(&[], u32::MAX, 0);
        let matches = generator.generate(&[team(1, 1), team(2, 1)], &ordered, &mut rng);
        assert!(matches.iter().all(|m| m.attendance == u32::MAX));
    }

    #[test]
    fn outcomes_are_roughly_uniform() {
        let mut rng = ChaCha8Rng::seed_from_u64(24);
        let mut counts = [0usize; 3];
        for _ in 0..3_000 {
            let idx = match decide_outcome(&mut rng) {
                MatchOutcome::HomeWin => 0,
                MatchOutcome::AwayWin => 1,
                MatchOutcome::Draw => 2,
            };
            counts[idx] += 1;
        }
        assert!(counts.iter().all(|c| (850..1150).contains(c)), "{counts:?}");
    }
}
