//! Production-mix aggregations

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::debug;

use super::grouping::group_by;
use super::stats::{self, percentage};
use super::window::{select_window, Trailing, Window};
use crate::domain::{GenerationSource, ProductionRecord, Timestamped};

/// Running renewables / nuclear / other sums
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct MixSums {
    renewables: f64,
    nuclear: f64,
    other: f64,
}

impl MixSums {
    fn from_rows(rows: &[&ProductionRecord]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, r| {
            acc.renewables += r.renewables();
            acc.nuclear += r.nuclear_total();
            acc.other += r.other_total();
            acc
        })
    }

    fn total(&self) -> f64 {
        self.renewables + self.nuclear + self.other
    }
}

/// Production mix of one country over the last day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryMix {
    pub country_name: String,
    pub renewables: f64,
    pub nuclear: f64,
    pub other: f64,
    pub total: f64,
}

/// Europe-wide production mix of one UTC day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMix {
    pub date: NaiveDate,
    pub renewables: f64,
    pub nuclear: f64,
    pub other: f64,
    pub total: f64,
    pub pct_renewables: Option<f64>,
    pub pct_nuclear: Option<f64>,
    pub pct_other: Option<f64>,
}

/// Total generation of one country over the standard windows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryProductionTotals {
    pub country_name: String,
    pub total_1d: f64,
    pub total_7d: f64,
    pub total_30d: f64,
}

/// Europe-wide generation of one UTC day, per source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySourceProduction {
    pub date: NaiveDate,
    pub sources: BTreeMap<GenerationSource, f64>,
}

/// Source shares of a country's most recent record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySourceShares {
    pub country_name: String,
    pub datetime: DateTime<Utc>,
    pub shares_pct: BTreeMap<GenerationSource, Option<f64>>,
}

/// Per-country renewables / nuclear / other sums over the last day.
/// Countries without rows in the window are absent.
pub fn mix_breakdown_by_country(table: &[ProductionRecord], now: DateTime<Utc>) -> Vec<CountryMix> {
    let recent = select_window(table, Window::Day, now);
    let rows: Vec<CountryMix> = group_by(recent, |r| r.country_name.clone())
        .into_iter()
        .map(|(country_name, rows)| {
            let sums = MixSums::from_rows(&rows);
            CountryMix {
                country_name,
                renewables: sums.renewables,
                nuclear: sums.nuclear,
                other: sums.other,
                total: sums.total(),
            }
        })
        .collect();

    debug!(countries = rows.len(), "computed 1d mix breakdown");
    rows
}

/// Europe-wide mix per UTC day over the last 30 days, ascending by day
pub fn weighted_mix_daily(table: &[ProductionRecord], now: DateTime<Utc>) -> Vec<DailyMix> {
    let recent = select_window(table, Window::Month, now);
    group_by(recent, |r| r.day())
        .into_iter()
        .map(|(date, rows)| {
            let sums = MixSums::from_rows(&rows);
            let total = sums.total();
            DailyMix {
                date,
                renewables: sums.renewables,
                nuclear: sums.nuclear,
                other: sums.other,
                total,
                pct_renewables: percentage(sums.renewables, total),
                pct_nuclear: percentage(sums.nuclear, total),
                pct_other: percentage(sums.other, total),
            }
        })
        .collect()
}

/// Per-country sum of every source column over 1d / 7d / 30d
pub fn total_production_by_country(
    table: &[ProductionRecord],
    now: DateTime<Utc>,
) -> Vec<CountryProductionTotals> {
    group_by(table, |r| r.country_name.clone())
        .into_iter()
        .map(|(country_name, rows)| {
            let totals = Trailing::compute(&rows, now, |window| {
                stats::sum(window.iter().map(|r| r.total()))
            });
            CountryProductionTotals {
                country_name,
                total_1d: totals.last_1d,
                total_7d: totals.last_7d,
                total_30d: totals.last_30d,
            }
        })
        .collect()
}

/// Per-source sums across countries per UTC day over the last 30 days
pub fn daily_production_by_source(
    table: &[ProductionRecord],
    now: DateTime<Utc>,
) -> Vec<DailySourceProduction> {
    let recent = select_window(table, Window::Month, now);
    group_by(recent, |r| r.day())
        .into_iter()
        .map(|(date, rows)| {
            let sources = GenerationSource::iter()
                .map(|s| (s, stats::sum(rows.iter().map(|r| r.source(s)))))
                .collect();
            DailySourceProduction { date, sources }
        })
        .collect()
}

/// Share of each source in every country's latest record of the last 30 days
pub fn latest_source_shares_by_country(
    table: &[ProductionRecord],
    now: DateTime<Utc>,
) -> Vec<CountrySourceShares> {
    let recent = select_window(table, Window::Month, now);
    group_by(recent, |r| r.country_name.clone())
        .into_iter()
        .filter_map(|(country_name, rows)| {
            let latest = rows.into_iter().max_by_key(|r| r.datetime)?;
            let total = latest.total();
            let shares_pct = GenerationSource::iter()
                .map(|s| (s, percentage(latest.source(s), total)))
                .collect();
            Some(CountrySourceShares {
                country_name,
                datetime: latest.datetime,
                shares_pct,
            })
        })
        .collect()
}
