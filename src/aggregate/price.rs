//! Price aggregations: averages, volatility, percentile ranking and the
//! load-weighted Europe-wide price

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use super::grouping::{group_by, CountryKey};
use super::stats::{self, fractional_percentiles, percent_change, WeightedMean};
use super::window::{select_window, Trailing, Window};
use crate::domain::{LoadRecord, PriceRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryAveragePrice {
    pub country_code: String,
    pub country_name: String,
    pub avg_1d: Option<f64>,
    pub avg_7d: Option<f64>,
    pub avg_30d: Option<f64>,
}

/// Sample standard deviation of price per window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryPriceVolatility {
    pub country_code: String,
    pub country_name: String,
    pub std_1d: Option<f64>,
    pub std_7d: Option<f64>,
    pub std_30d: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryPricePercentile {
    pub country_code: String,
    pub country_name: String,
    pub avg_price: f64,
    pub price_percentile: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodWeightedPrice {
    pub period: Window,
    pub weighted_avg_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryLatestPrice {
    pub country_code: String,
    pub country_name: String,
    pub datetime: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryPriceComparison {
    pub country_code: String,
    pub country_name: String,
    pub today: Option<f64>,
    pub week_ago: Option<f64>,
    pub month_ago: Option<f64>,
    pub change_7d_pct: Option<f64>,
    pub change_30d_pct: Option<f64>,
}

fn by_country<'a, I>(rows: I) -> BTreeMap<CountryKey, Vec<&'a PriceRecord>>
where
    I: IntoIterator<Item = &'a PriceRecord>,
{
    group_by(rows, |r| CountryKey::new(&r.country_code, &r.country_name))
}

/// Mean price per country over 1d / 7d / 30d
pub fn avg_price_by_country(table: &[PriceRecord], now: DateTime<Utc>) -> Vec<CountryAveragePrice> {
    by_country(table)
        .into_iter()
        .map(|(key, rows)| {
            let avg = Trailing::compute(&rows, now, |w| stats::mean(w.iter().map(|r| r.price)));
            CountryAveragePrice {
                country_code: key.code,
                country_name: key.name,
                avg_1d: avg.last_1d,
                avg_7d: avg.last_7d,
                avg_30d: avg.last_30d,
            }
        })
        .collect()
}

/// Price standard deviation per country over 1d / 7d / 30d.
/// Windows with fewer than two observations are undefined.
pub fn price_volatility_by_country(
    table: &[PriceRecord],
    now: DateTime<Utc>,
) -> Vec<CountryPriceVolatility> {
    by_country(table)
        .into_iter()
        .map(|(key, rows)| {
            let std = Trailing::compute(&rows, now, |w| {
                stats::sample_std_dev(w.iter().map(|r| r.price))
            });
            CountryPriceVolatility {
                country_code: key.code,
                country_name: key.name,
                std_1d: std.last_1d,
                std_7d: std.last_7d,
                std_30d: std.last_30d,
            }
        })
        .collect()
}

/// Fractional percentile rank of each country's 7-day mean price
pub fn price_percentile_by_country(
    table: &[PriceRecord],
    now: DateTime<Utc>,
) -> Vec<CountryPricePercentile> {
    let recent = select_window(table, Window::Week, now);
    let means: Vec<(CountryKey, f64)> = group_by(recent, |r| {
        CountryKey::new(&r.country_code, &r.country_name)
    })
    .into_iter()
    .filter_map(|(key, rows)| Some((key, stats::mean(rows.iter().map(|r| r.price))?)))
    .collect();

    let values: Vec<f64> = means.iter().map(|(_, m)| *m).collect();
    let percentiles = fractional_percentiles(&values);

    means
        .into_iter()
        .zip(percentiles)
        .map(|((key, avg_price), price_percentile)| CountryPricePercentile {
            country_code: key.code,
            country_name: key.name,
            avg_price,
            price_percentile,
        })
        .collect()
}

/// Load-weighted average price across all countries.
///
/// Price and load rows are inner-joined on `(datetime, country_code)`; joined
/// rows from the last 30 days are split into the non-overlapping periods of
/// [`Window::partition`]. Periods without joined rows are absent.
pub fn weighted_avg_price_europe(
    prices: &[PriceRecord],
    loads: &[LoadRecord],
    now: DateTime<Utc>,
) -> Vec<PeriodWeightedPrice> {
    let loads_by_key: HashMap<(DateTime<Utc>, &str), Vec<f64>> = loads
        .iter()
        .map(|l| ((l.datetime, l.country_code.as_str()), l.actual_load))
        .into_group_map();

    let mut periods: BTreeMap<Window, WeightedMean> = BTreeMap::new();
    let mut joined = 0usize;
    for price in prices {
        let Some(matching) = loads_by_key.get(&(price.datetime, price.country_code.as_str())) else {
            continue;
        };
        let Some(period) = Window::partition(price.datetime, now) else {
            continue;
        };
        let acc = periods.entry(period).or_default();
        for &load in matching {
            acc.push(price.price, load);
            joined += 1;
        }
    }

    debug!(joined, periods = periods.len(), "computed load-weighted price");

    periods
        .into_iter()
        .map(|(period, acc)| PeriodWeightedPrice {
            period,
            weighted_avg_price: acc.value(),
        })
        .collect()
}

/// Most recent price per country within the last 30 days
pub fn latest_price_by_country(table: &[PriceRecord], now: DateTime<Utc>) -> Vec<CountryLatestPrice> {
    by_country(select_window(table, Window::Month, now))
        .into_iter()
        .filter_map(|(key, rows)| {
            let latest = rows.into_iter().max_by_key(|r| r.datetime)?;
            Some(CountryLatestPrice {
                country_code: key.code,
                country_name: key.name,
                datetime: latest.datetime,
                price: latest.price,
            })
        })
        .collect()
}

/// Prices at the latest instant of the last 30 days against 7 and 30 days
/// earlier.
///
/// Each comparison instant is the timestamp in the window closest to the
/// target, the earlier one on a tie.
pub fn price_comparison_by_country(
    table: &[PriceRecord],
    now: DateTime<Utc>,
) -> Vec<CountryPriceComparison> {
    let recent = select_window(table, Window::Month, now);
    let instants: Vec<DateTime<Utc>> = recent.iter().map(|r| r.datetime).sorted().dedup().collect();
    let Some(&latest) = instants.last() else {
        return Vec::new();
    };

    let closest = |target: DateTime<Utc>| {
        instants
            .iter()
            .copied()
            .min_by_key(|ts| (*ts - target).num_milliseconds().abs())
            .unwrap_or(latest)
    };
    let week_at = closest(latest - Duration::days(7));
    let month_at = closest(latest - Duration::days(30));

    let price_at = |rows: &[&PriceRecord], at: DateTime<Utc>| {
        rows.iter().find(|r| r.datetime == at).map(|r| r.price)
    };

    by_country(recent.iter().copied())
        .into_iter()
        .filter_map(|(key, rows)| {
            let today = price_at(&rows, latest);
            let week_ago = price_at(&rows, week_at);
            let month_ago = price_at(&rows, month_at);
            if today.is_none() && week_ago.is_none() && month_ago.is_none() {
                return None;
            }
            Some(CountryPriceComparison {
                country_code: key.code,
                country_name: key.name,
                today,
                week_ago,
                month_ago,
                change_7d_pct: percent_change(today, week_ago),
                change_30d_pct: percent_change(today, month_ago),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn price_at(ts: DateTime<Utc>, code: &str, price: f64) -> PriceRecord {
        PriceRecord {
            datetime: ts,
            country_code: code.to_string(),
            country_name: format!("Country {code}"),
            price,
        }
    }

    fn price(age: Duration, code: &str, price: f64) -> PriceRecord {
        price_at(now() - age, code, price)
    }

    fn load(age: Duration, code: &str, actual_load: f64) -> LoadRecord {
        LoadRecord {
            datetime: now() - age,
            country_code: code.to_string(),
            country_name: format!("Country {code}"),
            actual_load,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_avg_price_windows() {
        let table = vec![
            price(Duration::hours(1), "FR", 10.0),
            price(Duration::hours(2), "FR", 20.0),
            price(Duration::days(3), "FR", 60.0),
            price(Duration::days(10), "FR", 110.0),
            price(Duration::days(10), "DE", 50.0),
        ];
        let avg = avg_price_by_country(&table, now());

        assert_eq!(avg.len(), 2);
        assert_eq!(avg[0].country_code, "DE");
        assert_eq!(avg[0].avg_1d, None);
        assert_eq!(avg[0].avg_7d, None);
        assert_eq!(avg[0].avg_30d, Some(50.0));

        assert_eq!(avg[1].avg_1d, Some(15.0));
        assert_eq!(avg[1].avg_7d, Some(30.0));
        assert_eq!(avg[1].avg_30d, Some(50.0));
    }

    #[test]
    fn test_volatility_needs_two_observations() {
        let table = vec![
            price(Duration::hours(1), "FR", 10.0),
            price(Duration::days(2), "FR", 20.0),
            price(Duration::days(3), "FR", 30.0),
        ];
        let vol = price_volatility_by_country(&table, now());

        assert_eq!(vol.len(), 1);
        assert_eq!(vol[0].std_1d, None);
        assert!(approx(vol[0].std_7d.unwrap(), 10.0));
        assert!(approx(vol[0].std_30d.unwrap(), 10.0));
    }

    #[test]
    fn test_percentile_ranking() {
        let table = vec![
            price(Duration::days(1), "A", 10.0),
            price(Duration::days(2), "B", 20.0),
            price(Duration::days(3), "C", 30.0),
            price(Duration::days(9), "D", 1.0),
        ];
        let ranked = price_percentile_by_country(&table, now());

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].country_code, "A");
        assert!(approx(ranked[0].price_percentile, 100.0 / 3.0));
        assert!(approx(ranked[1].price_percentile, 200.0 / 3.0));
        assert!(approx(ranked[2].price_percentile, 100.0));
        assert_eq!(ranked[2].avg_price, 30.0);
    }

    #[test]
    fn test_percentile_ties() {
        let table = vec![
            price(Duration::hours(1), "A", 10.0),
            price(Duration::hours(1), "B", 10.0),
            price(Duration::hours(1), "C", 40.0),
        ];
        let ranked = price_percentile_by_country(&table, now());
        assert!(approx(ranked[0].price_percentile, 50.0));
        assert!(approx(ranked[1].price_percentile, 50.0));
        assert!(approx(ranked[2].price_percentile, 100.0));
    }

    #[test]
    fn test_weighted_price_single_period() {
        let t = Duration::hours(2);
        let prices = vec![price(t, "FR", 100.0), price(t, "DE", 200.0)];
        let loads = vec![load(t, "FR", 10.0), load(t, "DE", 30.0)];

        let weighted = weighted_avg_price_europe(&prices, &loads, now());
        assert_eq!(
            weighted,
            vec![PeriodWeightedPrice {
                period: Window::Day,
                weighted_avg_price: Some(175.0),
            }]
        );
    }

    #[test]
    fn test_weighted_price_partitions_periods() {
        let prices = vec![
            price(Duration::hours(2), "FR", 100.0),
            price(Duration::days(3), "FR", 50.0),
            price(Duration::days(3), "DE", 70.0),
            price(Duration::days(20), "FR", 40.0),
            price(Duration::days(45), "FR", 999.0),
            price(Duration::hours(5), "ES", 500.0),
        ];
        let loads = vec![
            load(Duration::hours(2), "FR", 1.0),
            load(Duration::days(3), "FR", 1.0),
            load(Duration::days(3), "DE", 3.0),
            load(Duration::days(20), "FR", 2.0),
            load(Duration::days(45), "FR", 1.0),
            load(Duration::hours(5), "IT", 1.0),
        ];

        let weighted = weighted_avg_price_europe(&prices, &loads, now());
        let periods: Vec<Window> = weighted.iter().map(|w| w.period).collect();
        assert_eq!(periods, vec![Window::Day, Window::Week, Window::Month]);
        assert_eq!(weighted[0].weighted_avg_price, Some(100.0));
        assert_eq!(weighted[1].weighted_avg_price, Some(65.0));
        assert_eq!(weighted[2].weighted_avg_price, Some(40.0));
    }

    #[test]
    fn test_weighted_price_zero_load_is_undefined() {
        let prices = vec![price(Duration::hours(1), "FR", 80.0)];
        let loads = vec![load(Duration::hours(1), "FR", 0.0)];
        let weighted = weighted_avg_price_europe(&prices, &loads, now());
        assert_eq!(weighted.len(), 1);
        assert_eq!(weighted[0].weighted_avg_price, None);
    }

    #[test]
    fn test_weighted_price_without_overlap_is_empty() {
        let prices = vec![price(Duration::hours(1), "FR", 80.0)];
        let loads = vec![load(Duration::hours(2), "FR", 10.0)];
        assert!(weighted_avg_price_europe(&prices, &loads, now()).is_empty());
    }

    #[test]
    fn test_latest_price() {
        let table = vec![
            price(Duration::hours(3), "FR", 10.0),
            price(Duration::hours(1), "FR", 12.0),
            price(Duration::hours(2), "FR", 11.0),
        ];
        let latest = latest_price_by_country(&table, now());
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].price, 12.0);
        assert_eq!(latest[0].datetime, now() - Duration::hours(1));
    }

    #[test]
    fn test_price_comparison() {
        let table = vec![
            price(Duration::zero(), "FR", 110.0),
            price(Duration::days(7), "FR", 100.0),
            price(Duration::days(29), "FR", 55.0),
            price(Duration::zero(), "DE", 90.0),
            price(Duration::days(7), "DE", 0.0),
        ];
        let cmp = price_comparison_by_country(&table, now());

        assert_eq!(cmp.len(), 2);
        let de = &cmp[0];
        assert_eq!(de.country_code, "DE");
        assert_eq!(de.week_ago, Some(0.0));
        assert_eq!(de.change_7d_pct, None);
        assert_eq!(de.month_ago, None);

        let fr = &cmp[1];
        assert_eq!(fr.today, Some(110.0));
        assert_eq!(fr.week_ago, Some(100.0));
        // closest instant to 30 days back is 29 days back
        assert_eq!(fr.month_ago, Some(55.0));
        assert!(approx(fr.change_7d_pct.unwrap(), 10.0));
        assert!(approx(fr.change_30d_pct.unwrap(), 100.0));
    }

    #[test]
    fn test_latest_price_ignores_stale_rows() {
        let table = vec![
            price(Duration::days(90), "FR", 10.0),
            price(Duration::days(31), "DE", 20.0),
            price(Duration::days(30), "DE", 30.0),
        ];
        let latest = latest_price_by_country(&table, now());
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].country_code, "DE");
        assert_eq!(latest[0].price, 30.0);

        let stale = vec![price(Duration::days(90), "FR", 10.0)];
        assert!(latest_price_by_country(&stale, now()).is_empty());
    }

    #[test]
    fn test_price_comparison_ignores_stale_rows() {
        let table = vec![
            price(Duration::zero(), "FR", 110.0),
            price(Duration::days(60), "FR", 10.0),
        ];
        let cmp = price_comparison_by_country(&table, now());

        assert_eq!(cmp.len(), 1);
        assert_eq!(cmp[0].today, Some(110.0));
        // only the current instant is left, so both targets resolve to it
        assert_eq!(cmp[0].month_ago, Some(110.0));
        assert_eq!(cmp[0].change_30d_pct, Some(0.0));

        let stale = vec![price(Duration::days(60), "FR", 10.0)];
        assert!(price_comparison_by_country(&stale, now()).is_empty());
    }

    #[test]
    fn test_empty_tables() {
        let prices: Vec<PriceRecord> = Vec::new();
        let loads: Vec<LoadRecord> = Vec::new();
        assert!(avg_price_by_country(&prices, now()).is_empty());
        assert!(price_volatility_by_country(&prices, now()).is_empty());
        assert!(price_percentile_by_country(&prices, now()).is_empty());
        assert!(weighted_avg_price_europe(&prices, &loads, now()).is_empty());
        assert!(latest_price_by_country(&prices, now()).is_empty());
        assert!(price_comparison_by_country(&prices, now()).is_empty());
    }
}
