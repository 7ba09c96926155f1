use anyhow::{Context, Result};
use chrono::{Days, Months, NaiveDate};
use rand::Rng;

use crate::config::SeasonOrder;
use crate::model::{League, Season};

/// Seasons for the `count` years before `current_year`, newest first.
/// Season 1 is `current_year - 1 / current_year`.
pub fn generate_seasons(current_year: i32, count: usize) -> Result<Vec<Season>> {
    let mut seasons = Vec::with_capacity(count);
    for i in 0..count {
        let start_year = current_year - i as i32 - 1;
        let end_year = start_year + 1;
        let start_date = NaiveDate::from_ymd_opt(start_year, 8, 1)
            .with_context(|| format!("invalid season start year {start_year}"))?;
        let end_date = NaiveDate::from_ymd_opt(end_year, 5, 31)
            .with_context(|| format!("invalid season end year {end_year}"))?;
        seasons.push(Season {
            id: i as u32 + 1,
            name: format!("{start_year}/{end_year}"),
            start_date,
            end_date,
        });
    }
    Ok(seasons)
}

pub fn generate_leagues(count: u32) -> Vec<League> {
    (1..=count)
        .map(|id| League {
            id,
            name: format!("League {id}"),
        })
        .collect()
}

pub fn ordered_seasons(seasons: &[Season], order: SeasonOrder) -> Vec<&Season> {
    let mut out = seasons.iter().collect::<Vec<_>>();
    if order == SeasonOrder::Chronological {
        out.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
    }
    out
}

/// Uniform in `[start, end)`; collapses to `start` for an empty range.
pub fn random_date_between<R: Rng + ?Sized>(
    rng: &mut R,
    start: NaiveDate,
    end: NaiveDate,
) -> NaiveDate {
    let days = (end - start).num_days();
    if days <= 0 {
        return start;
    }
    let offset = rng.gen_range(0..days) as u64;
    start.checked_add_days(Days::new(offset)).unwrap_or(start)
}

/// True once `birth_date + years` is on or before `on`.
pub fn has_reached_age(birth_date: NaiveDate, years: u32, on: NaiveDate) -> bool {
    match birth_date.checked_add_months(Months::new(years * 12)) {
        Some(anniversary) => anniversary <= on,
        None => false,
    }
}
