pub mod aggregate;
pub mod config;
pub mod domain;
pub mod ingest;
pub mod report;
pub mod telemetry;

pub use report::{DashboardReport, MarketSnapshot};
