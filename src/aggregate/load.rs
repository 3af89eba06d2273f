//! Load (consumption) aggregations

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::grouping::{group_by, CountryKey};
use super::stats;
use super::window::{select_window, truncate_to_day, Trailing, Window};
use crate::domain::LoadRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyLoad {
    /// Midnight UTC
    pub day: DateTime<Utc>,
    pub total_load: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryLoadTotals {
    pub country_code: String,
    pub country_name: String,
    pub load_1d: f64,
    pub load_7d: f64,
    pub load_30d: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryAverageLoad {
    pub country_code: String,
    pub country_name: String,
    pub avg_load: f64,
}

/// Europe-wide load per day over the last 30 days, most recent day first
pub fn daily_total_load_30d(table: &[LoadRecord], now: DateTime<Utc>) -> Vec<DailyLoad> {
    let recent = select_window(table, Window::Month, now);
    let mut daily: Vec<DailyLoad> = group_by(recent, |r| truncate_to_day(r.datetime))
        .into_iter()
        .map(|(day, rows)| DailyLoad {
            day,
            total_load: stats::sum(rows.iter().map(|r| r.actual_load)),
        })
        .collect();
    daily.reverse();

    debug!(days = daily.len(), "computed daily load totals");
    daily
}

/// Per-country load sums over 1d / 7d / 30d
pub fn total_load_by_country(table: &[LoadRecord], now: DateTime<Utc>) -> Vec<CountryLoadTotals> {
    group_by(table, |r| CountryKey::new(&r.country_code, &r.country_name))
        .into_iter()
        .map(|(key, rows)| {
            let totals = Trailing::compute(&rows, now, |window| {
                stats::sum(window.iter().map(|r| r.actual_load))
            });
            CountryLoadTotals {
                country_code: key.code,
                country_name: key.name,
                load_1d: totals.last_1d,
                load_7d: totals.last_7d,
                load_30d: totals.last_30d,
            }
        })
        .collect()
}

/// Per-country mean load over the last 30 days
pub fn average_load_by_country(
    table: &[LoadRecord],
    now: DateTime<Utc>,
) -> Vec<CountryAverageLoad> {
    let recent = select_window(table, Window::Month, now);
    group_by(recent, |r| CountryKey::new(&r.country_code, &r.country_name))
        .into_iter()
        .filter_map(|(key, rows)| {
            let avg_load = stats::mean(rows.iter().map(|r| r.actual_load))?;
            Some(CountryAverageLoad {
                country_code: key.code,
                country_name: key.name,
                avg_load,
            })
        })
        .collect()
}
