//! Cross-border transfer aggregations

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::Serialize;
use tracing::debug;

use super::grouping::{group_by, CountryKey};
use super::stats::{self, ratio};
use super::window::{select_window, Window};
use crate::domain::{LoadRecord, TransferRecord};

/// Σ amount per (exporter, importer) pair
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TransferMatrix {
    /// Row labels, sorted
    pub exporters: Vec<String>,
    /// Column labels, sorted
    pub importers: Vec<String>,
    /// `amounts[i][j]` is the flow from `exporters[i]` to `importers[j]`
    pub amounts: Vec<Vec<f64>>,
}

impl TransferMatrix {
    pub fn is_empty(&self) -> bool {
        self.exporters.is_empty()
    }

    /// Flow between two countries, zero for pairs without transfers
    pub fn amount(&self, from: &str, to: &str) -> f64 {
        let row = self.exporters.iter().position(|c| c == from);
        let col = self.importers.iter().position(|c| c == to);
        match (row, col) {
            (Some(i), Some(j)) => self.amounts[i][j],
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryIndependence {
    pub country_code: String,
    pub country_name: String,
    pub consumption: f64,
    pub imports: f64,
    /// Share of consumption not covered by imports, clipped to [0, 100]
    pub independence_pct: Option<f64>,
}

pub fn transfer_matrix(transfers: &[TransferRecord]) -> TransferMatrix {
    let mut sums: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for t in transfers {
        *sums
            .entry((t.from_country.as_str(), t.to_country.as_str()))
            .or_insert(0.0) += t.amount;
    }

    let exporters: BTreeSet<&str> = sums.keys().map(|(from, _)| *from).collect();
    let importers: BTreeSet<&str> = sums.keys().map(|(_, to)| *to).collect();

    let amounts = exporters
        .iter()
        .map(|from| {
            importers
                .iter()
                .map(|to| sums.get(&(*from, *to)).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    TransferMatrix {
        exporters: exporters.into_iter().map(str::to_string).collect(),
        importers: importers.into_iter().map(str::to_string).collect(),
        amounts,
    }
}

/// Fraction of each country's last-30-day consumption not met by imports.
///
/// Imports are matched on `to_country == country_code`. Rows are sorted by
/// independence descending; undefined ratios (zero consumption) come last.
pub fn energy_independence(
    loads: &[LoadRecord],
    transfers: &[TransferRecord],
    now: DateTime<Utc>,
) -> Vec<CountryIndependence> {
    let mut imports: HashMap<&str, f64> = HashMap::new();
    for t in transfers {
        *imports.entry(t.to_country.as_str()).or_insert(0.0) += t.amount;
    }

    let recent = select_window(loads, Window::Month, now);
    let mut rows: Vec<CountryIndependence> =
        group_by(recent, |r| CountryKey::new(&r.country_code, &r.country_name))
            .into_iter()
            .map(|(key, rows)| {
                let consumption = stats::sum(rows.iter().map(|r| r.actual_load));
                let imports = imports.get(key.code.as_str()).copied().unwrap_or(0.0);
                let independence_pct =
                    ratio(imports, consumption).map(|r| ((1.0 - r) * 100.0).clamp(0.0, 100.0));
                CountryIndependence {
                    country_code: key.code,
                    country_name: key.name,
                    consumption,
                    imports,
                    independence_pct,
                }
            })
            .collect();

    // stable: ties keep country order
    rows.sort_by_key(|r| std::cmp::Reverse(r.independence_pct.map(OrderedFloat)));

    debug!(countries = rows.len(), "computed energy independence");
    rows
}
