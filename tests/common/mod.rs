#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use energy_market_analytics::domain::{
    GenerationSource, LoadRecord, PriceRecord, ProductionRecord,
};

pub const COUNTRIES: [(&str, &str); 5] = [
    ("AT", "Austria"),
    ("BE", "Belgium"),
    ("DE", "Germany"),
    ("ES", "Spain"),
    ("FR", "France"),
];

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn country(idx: usize) -> (&'static str, &'static str) {
    COUNTRIES[idx % COUNTRIES.len()]
}

pub fn price(age: Duration, idx: usize, value: f64) -> PriceRecord {
    let (code, name) = country(idx);
    PriceRecord {
        datetime: now() - age,
        country_code: code.to_string(),
        country_name: name.to_string(),
        price: value,
    }
}

pub fn load(age: Duration, idx: usize, value: f64) -> LoadRecord {
    let (code, name) = country(idx);
    LoadRecord {
        datetime: now() - age,
        country_code: code.to_string(),
        country_name: name.to_string(),
        actual_load: value,
    }
}

pub fn production(age: Duration, idx: usize, renewables: f64, nuclear: f64, other: f64) -> ProductionRecord {
    ProductionRecord::new(now() - age, country(idx).1)
        .with_source(GenerationSource::WindOnshore, renewables)
        .with_source(GenerationSource::Nuclear, nuclear)
        .with_source(GenerationSource::FossilGas, other)
}

pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}
