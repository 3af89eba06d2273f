use anyhow::{Context, Result};
use chrono::Utc;
use energy_market_analytics::config::Config;
use energy_market_analytics::telemetry::init_tracing;
use energy_market_analytics::{ingest, DashboardReport};
use tokio::io::AsyncWriteExt;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::load()?;
    init_tracing(&cfg.logging);

    let snapshot = ingest::load_snapshot(&cfg.data)
        .await
        .context("failed to load market snapshot")?;

    // one reference instant for the whole pass
    let as_of = cfg.report.as_of.unwrap_or_else(Utc::now);
    let report = DashboardReport::compute(&snapshot, as_of);

    let mut body = if cfg.report.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    body.push('\n');

    match &cfg.report.output {
        Some(path) => {
            tokio::fs::write(path, body)
                .await
                .with_context(|| format!("failed to write report to {path}"))?;
            info!(path = %path, "report written");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(body.as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}
