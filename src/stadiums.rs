use log::{info, warn};
use rand::Rng;

use crate::model::{Stadium, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StadiumAssignmentReport {
    /// Teams that received a stadium of their own.
    pub distinct: usize,
    /// Teams that share a stadium picked at random from the full pool.
    pub shared: usize,
    /// Pool stadiums nobody was assigned to.
    pub unused: usize,
}

pub fn generate_stadiums<R: Rng + ?Sized>(
    teams: &[Team],
    count: usize,
    rng: &mut R,
) -> Vec<Stadium> {
    (1..=count)
        .map(|i| {
            let city = if teams.is_empty() {
                String::new()
            } else {
                teams[rng.gen_range(0..teams.len())].city.clone()
            };
            Stadium {
                id: format!("S{i}{}", rng.gen_range(1000..10000)),
                name: format!("Stadium {i}"),
                capacity: rng.gen_range(5_000..50_000),
                address: format!("Address {i} in {city}"),
                city,
            }
        })
        .collect()
}

/// Hands out stadiums in pool order, one per team, moving each stadium to its team's city.
/// Teams beyond the pool get a random stadium from the whole pool.
pub fn assign_stadiums<R: Rng + ?Sized>(
    teams: &mut [Team],
    stadiums: &mut [Stadium],
    rng: &mut R,
) -> StadiumAssignmentReport {
    let mut report = StadiumAssignmentReport::default();
    if stadiums.is_empty() {
        if !teams.is_empty() {
            warn!("stadium pool is empty; {} teams left without a stadium", teams.len());
        }
        return report;
    }

    for (team, stadium) in teams.iter_mut().zip(stadiums.iter_mut()) {
        team.stadium_id = Some(stadium.id.clone());
        stadium.city = team.city.clone();
        report.distinct += 1;
    }

    for team in teams.iter_mut().skip(stadiums.len()) {
        let stadium = &stadiums[rng.gen_range(0..stadiums.len())];
        team.stadium_id = Some(stadium.id.clone());
        report.shared += 1;
    }

    report.unused = stadiums.len().saturating_sub(report.distinct);
    info!(
        "assigned stadiums: {} distinct, {} shared, {} unused",
        report.distinct, report.shared, report.unused
    );
    report
}
