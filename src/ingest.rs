//! Snapshot ingestion
//!
//! Turns the JSON arrays produced by the retrieval job into typed tables.
//! Schema problems fail fast here so the aggregation engine can assume
//! well-formed input.

use std::hash::Hash;
use std::io::ErrorKind;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};
use validator::{Validate, ValidationErrors};

use crate::config::DataConfig;
use crate::domain::{LoadRecord, PriceRecord, ProductionRecord, TransferRecord};
use crate::report::MarketSnapshot;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("schema mismatch: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("row {index} failed validation: {source}")]
    Invalid {
        index: usize,
        source: ValidationErrors,
    },

    #[error("{path}: {source}")]
    File {
        path: String,
        source: Box<IngestError>,
    },
}

/// Identity of a row for deduplication
pub trait NaturalKey {
    type Key: Eq + Hash + Clone;

    fn natural_key(&self) -> Self::Key;
}

impl NaturalKey for PriceRecord {
    type Key = (DateTime<Utc>, String);

    fn natural_key(&self) -> Self::Key {
        (self.datetime, self.country_code.clone())
    }
}

impl NaturalKey for LoadRecord {
    type Key = (DateTime<Utc>, String);

    fn natural_key(&self) -> Self::Key {
        (self.datetime, self.country_code.clone())
    }
}

impl NaturalKey for ProductionRecord {
    type Key = (DateTime<Utc>, String);

    fn natural_key(&self) -> Self::Key {
        (self.datetime, self.country_name.clone())
    }
}

/// Parses and validates one table. Unknown fields are ignored.
pub fn parse_table<T>(json: &str) -> Result<Vec<T>, IngestError>
where
    T: DeserializeOwned + Validate,
{
    let rows: Vec<T> = serde_json::from_str(json)?;
    for (index, row) in rows.iter().enumerate() {
        row.validate()
            .map_err(|source| IngestError::Invalid { index, source })?;
    }
    Ok(rows)
}

/// Keeps the first row for every natural key
pub fn dedup_by_natural_key<T: NaturalKey>(rows: Vec<T>) -> Vec<T> {
    let before = rows.len();
    let kept: Vec<T> = rows.into_iter().unique_by(|r| r.natural_key()).collect();
    if kept.len() < before {
        debug!(dropped = before - kept.len(), "dropped duplicate rows");
    }
    kept
}

pub fn parse_prices(json: &str) -> Result<Vec<PriceRecord>, IngestError> {
    Ok(dedup_by_natural_key(parse_table(json)?))
}

pub fn parse_loads(json: &str) -> Result<Vec<LoadRecord>, IngestError> {
    Ok(dedup_by_natural_key(parse_table(json)?))
}

pub fn parse_production(json: &str) -> Result<Vec<ProductionRecord>, IngestError> {
    Ok(dedup_by_natural_key(parse_table(json)?))
}

pub fn parse_transfers(json: &str) -> Result<Vec<TransferRecord>, IngestError> {
    parse_table(json)
}

/// Reads a table file. A missing file is an empty table.
async fn read_table(path: &str) -> Result<Option<String>, IngestError> {
    match tokio::fs::read_to_string(path).await {
        Ok(body) => Ok(Some(body)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path, "snapshot file missing, treating table as empty");
            Ok(None)
        }
        Err(source) => Err(IngestError::Io {
            path: path.to_string(),
            source,
        }),
    }
}

async fn load_table<T, F>(path: &str, parse: F) -> Result<Vec<T>, IngestError>
where
    F: Fn(&str) -> Result<Vec<T>, IngestError>,
{
    let Some(body) = read_table(path).await? else {
        return Ok(Vec::new());
    };
    parse(&body).map_err(|e| IngestError::File {
        path: path.to_string(),
        source: Box::new(e),
    })
}

/// Loads all four tables named in the data config
pub async fn load_snapshot(cfg: &DataConfig) -> Result<MarketSnapshot, IngestError> {
    let snapshot = MarketSnapshot {
        prices: load_table(&cfg.prices, parse_prices).await?,
        loads: load_table(&cfg.loads, parse_loads).await?,
        production: load_table(&cfg.production, parse_production).await?,
        transfers: load_table(&cfg.transfers, parse_transfers).await?,
    };

    info!(
        prices = snapshot.prices.len(),
        loads = snapshot.loads.len(),
        production = snapshot.production.len(),
        transfers = snapshot.transfers.len(),
        "loaded market snapshot"
    );
    Ok(snapshot)
}
