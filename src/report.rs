//! One aggregation pass over a market snapshot

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::aggregate::{self, *};
use crate::domain::{LoadRecord, PriceRecord, ProductionRecord, TransferRecord};

/// The four tables of one refresh cycle
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    pub prices: Vec<PriceRecord>,
    pub loads: Vec<LoadRecord>,
    pub production: Vec<ProductionRecord>,
    pub transfers: Vec<TransferRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSection {
    pub europe_weighted: Vec<PeriodWeightedPrice>,
    pub average_by_country: Vec<CountryAveragePrice>,
    pub volatility_by_country: Vec<CountryPriceVolatility>,
    pub percentile_by_country: Vec<CountryPricePercentile>,
    pub latest_by_country: Vec<CountryLatestPrice>,
    pub comparison_by_country: Vec<CountryPriceComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadSection {
    pub daily_total_30d: Vec<DailyLoad>,
    pub total_by_country: Vec<CountryLoadTotals>,
    pub average_by_country: Vec<CountryAverageLoad>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionSection {
    pub mix_by_country: Vec<CountryMix>,
    pub daily_mix: Vec<DailyMix>,
    pub total_by_country: Vec<CountryProductionTotals>,
    pub daily_by_source: Vec<DailySourceProduction>,
    pub latest_shares_by_country: Vec<CountrySourceShares>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferSection {
    pub matrix: TransferMatrix,
    pub independence: Vec<CountryIndependence>,
}

/// Every summary the dashboard shows, computed against one `as_of` instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub as_of: DateTime<Utc>,
    pub price: PriceSection,
    pub load: LoadSection,
    pub production: ProductionSection,
    pub transfer: TransferSection,
}

impl DashboardReport {
    pub fn compute(snapshot: &MarketSnapshot, as_of: DateTime<Utc>) -> Self {
        info!(%as_of, "starting aggregation pass");
        let MarketSnapshot {
            prices,
            loads,
            production,
            transfers,
        } = snapshot;

        let report = Self {
            as_of,
            price: PriceSection {
                europe_weighted: aggregate::weighted_avg_price_europe(prices, loads, as_of),
                average_by_country: aggregate::avg_price_by_country(prices, as_of),
                volatility_by_country: aggregate::price_volatility_by_country(prices, as_of),
                percentile_by_country: aggregate::price_percentile_by_country(prices, as_of),
                latest_by_country: aggregate::latest_price_by_country(prices, as_of),
                comparison_by_country: aggregate::price_comparison_by_country(prices, as_of),
            },
            load: LoadSection {
                daily_total_30d: aggregate::daily_total_load_30d(loads, as_of),
                total_by_country: aggregate::total_load_by_country(loads, as_of),
                average_by_country: aggregate::average_load_by_country(loads, as_of),
            },
            production: ProductionSection {
                mix_by_country: aggregate::mix_breakdown_by_country(production, as_of),
                daily_mix: aggregate::weighted_mix_daily(production, as_of),
                total_by_country: aggregate::total_production_by_country(production, as_of),
                daily_by_source: aggregate::daily_production_by_source(production, as_of),
                latest_shares_by_country: aggregate::latest_source_shares_by_country(production, as_of),
            },
            transfer: TransferSection {
                matrix: aggregate::transfer_matrix(transfers),
                independence: aggregate::energy_independence(loads, transfers, as_of),
            },
        };

        info!("aggregation pass finished");
        report
    }
}
