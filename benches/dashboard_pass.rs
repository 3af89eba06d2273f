//! Benchmarks for a full aggregation pass

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use energy_market_analytics::domain::{
    GenerationSource, LoadRecord, PriceRecord, ProductionRecord, TransferRecord,
};
use energy_market_analytics::{DashboardReport, MarketSnapshot};
use strum::IntoEnumIterator;

const COUNTRIES: [(&str, &str); 8] = [
    ("AT", "Austria"),
    ("BE", "Belgium"),
    ("CZ", "Czechia"),
    ("DE", "Germany"),
    ("ES", "Spain"),
    ("FR", "France"),
    ("NL", "Netherlands"),
    ("PL", "Poland"),
];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

/// Hourly rows for every country over `days` days
fn synthetic_snapshot(days: i64) -> MarketSnapshot {
    let mut snapshot = MarketSnapshot::default();

    for hour in 0..days * 24 {
        let datetime = now() - Duration::hours(hour);
        let phase = (hour % 24) as f64;
        for (i, (code, name)) in COUNTRIES.iter().enumerate() {
            let scale = (i + 1) as f64;
            snapshot.prices.push(PriceRecord {
                datetime,
                country_code: code.to_string(),
                country_name: name.to_string(),
                price: 40.0 + scale * 5.0 + phase,
            });
            snapshot.loads.push(LoadRecord {
                datetime,
                country_code: code.to_string(),
                country_name: name.to_string(),
                actual_load: 1_000.0 * scale + phase * 10.0,
            });
            let production = GenerationSource::iter()
                .enumerate()
                .fold(ProductionRecord::new(datetime, name), |rec, (j, source)| {
                    rec.with_source(source, scale * (j + 1) as f64 + phase)
                });
            snapshot.production.push(production);
        }
    }

    for (i, (from, _)) in COUNTRIES.iter().enumerate() {
        let (to, _) = COUNTRIES[(i + 1) % COUNTRIES.len()];
        snapshot.transfers.push(TransferRecord {
            from_country: from.to_string(),
            to_country: to.to_string(),
            amount: 250.0 * (i + 1) as f64,
        });
    }

    snapshot
}

fn benchmark_dashboard_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashboard_pass");

    for days in [7, 30, 60] {
        let snapshot = synthetic_snapshot(days);
        let rows = snapshot.prices.len() + snapshot.loads.len() + snapshot.production.len();
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &snapshot, |b, snapshot| {
            b.iter(|| DashboardReport::compute(black_box(snapshot), black_box(now())));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_dashboard_pass);
criterion_main!(benches);
