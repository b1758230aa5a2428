//! Multi-year comparison of cumulative GDD
//!
//! Past seasons are aligned on "days since planting" so the current season
//! can be compared with the spread of earlier years.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::gdd::{accumulate, compute_daily_gdd};
use crate::models::WeatherSeries;
use crate::types::DateRange;

/// Cumulative GDD of one past year on one day since planting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HistoricalRecord {
    /// Day since planting, starting at 1
    pub day: u32,
    pub cumulative_gdd: f64,
    pub year: i32,
}

/// Spread of past years' cumulative GDD on one day since planting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyEnvelope {
    pub day: u32,
    pub mean: f64,
    /// Sample standard deviation, `None` with fewer than two years
    pub std_dev: Option<f64>,
    pub years: usize,
}

/// Years to compare against: `earliest_year` up to, not including, `current_year`
pub fn comparison_years(earliest_year: i32, current_year: i32) -> std::ops::Range<i32> {
    earliest_year..current_year
}

/// Planting window moved into `year`
///
/// Returns `None` when the planting date does not exist in that year.
pub fn season_window(planting_date: NaiveDate, year: i32, window_days: u32) -> Option<DateRange> {
    planting_date
        .with_year(year)
        .map(|start| DateRange::starting_at(start, window_days))
}

/// Cumulative GDD per day for each past year with a complete window
///
/// Years with fewer than `window_days` observations are skipped.
pub fn historical_records<'a, I>(
    seasons: I,
    window_days: usize,
    t_base: f64,
    t_upper: f64,
) -> Vec<HistoricalRecord>
where
    I: IntoIterator<Item = (i32, &'a WeatherSeries)>,
{
    let mut records = Vec::new();

    for (year, series) in seasons {
        if series.len() < window_days {
            tracing::debug!(year, days = series.len(), window_days, "Skipping incomplete year");
            continue;
        }

        let mut observations = series.observations().to_vec();
        observations.sort_by_key(|obs| obs.date);

        let daily: Vec<f64> = observations
            .iter()
            .take(window_days)
            .map(|obs| compute_daily_gdd(obs.tmin, obs.tmax, t_base, t_upper))
            .collect();

        records.extend(
            accumulate(&daily)
                .into_iter()
                .zip(1u32..)
                .map(|(cumulative_gdd, day)| HistoricalRecord {
                    day,
                    cumulative_gdd,
                    year,
                }),
        );
    }

    records
}

/// Mean and standard deviation of cumulative GDD per day
pub fn daily_envelope(records: &[HistoricalRecord]) -> Vec<DailyEnvelope> {
    let mut by_day: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for record in records {
        by_day.entry(record.day).or_default().push(record.cumulative_gdd);
    }

    by_day
        .into_iter()
        .map(|(day, values)| {
            let n = values.len();
            let mean = values.iter().sum::<f64>() / n as f64;
            let std_dev = (n > 1).then(|| {
                let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
                (ss / (n - 1) as f64).sqrt()
            });
            DailyEnvelope {
                day,
                mean,
                std_dev,
                years: n,
            }
        })
        .collect()
}
