use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

use crate::models::{DailyBar, WeeklyBar};

/// The Friday that closes the calendar week containing `date`.
///
/// Saturday and Sunday belong to the following Friday's week.
pub fn week_ending_friday(date: NaiveDate) -> NaiveDate {
    const FRIDAY: i64 = 4; // days from Monday
    let weekday = date.weekday().num_days_from_monday() as i64;
    let offset = (FRIDAY - weekday).rem_euclid(7);
    date + Duration::days(offset)
}

/// Sort by date and drop duplicate dates, keeping the last record for each
fn sort_and_dedupe(bars: &[DailyBar]) -> Vec<DailyBar> {
    let mut by_date: BTreeMap<NaiveDate, DailyBar> = BTreeMap::new();
    for bar in bars {
        by_date.insert(bar.date, bar.clone());
    }
    by_date.into_values().collect()
}

/// Aggregate daily bars into weeks ending Friday.
///
/// open = first open, high = max high, low = min low, close = last close,
/// volume = summed. Weeks with no trading days produce no row.
pub fn resample_weekly(daily: &[DailyBar]) -> Vec<WeeklyBar> {
    let bars = sort_and_dedupe(daily);
    if bars.len() != daily.len() {
        tracing::debug!(
            "Dropped {} duplicate daily bars before resampling",
            daily.len() - bars.len()
        );
    }

    let mut weeks: Vec<WeeklyBar> = Vec::new();
    for bar in &bars {
        let friday = week_ending_friday(bar.date);
        match weeks.last_mut() {
            Some(week) if week.week_ending == friday => week.absorb(bar),
            _ => weeks.push(WeeklyBar::open_week(friday, bar)),
        }
    }

    weeks
}
