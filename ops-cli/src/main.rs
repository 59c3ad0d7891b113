//! `billing`: command-line front end for the hospital billing engine
//!
//! ```bash
//! billing catalog --category Diagnostics
//! billing bill --item "Consultation:General Consultation:2" --item "Diagnostics:ECG:1:0:100"
//! billing coverage --total 1000 --plan CGHS
//! billing pay --due 1000 --form '{"method":"installment","months":3}'
//! billing settle --item "Diagnostics:CT Scan" --plan CGHS --form '{"method":"cash","tendered":"500"}'
//! ```
//!
//! Policy overrides come from `--config` and `BILLING__*` variables, logging
//! from `BILLING_LOG__*` variables (`BILLING_LOG__JSON=true`).

mod cli;
mod commands;

use anyhow::{Context, Result};
use billing_service::{BillingPolicy, BillingService, Catalog, CatalogEntry, RecordingPaymentGateway};
use clap::Parser;
use cli::{Cli, Command};
use commands::Output;
use config_engine::ConfigEngine;
use logger_redacted::{init_logging, LoggerConfig};
use std::path::Path;
use std::sync::Arc;

const LOG_ENV_PREFIX: &str = "BILLING_LOG";

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::standard());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let entries: Vec<CatalogEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    Ok(Catalog::from_entries(entries)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config: LoggerConfig = ConfigEngine::new()
        .with_defaults(&LoggerConfig::default())?
        .with_env_prefix(LOG_ENV_PREFIX)
        .load()?;
    if cli.verbose {
        log_config.log_level = "debug".to_string();
    }
    let _guard = init_logging(&log_config)?;

    let policy = BillingPolicy::load(cli.config.as_deref()).context("loading billing policy")?;
    let out = Output {
        json: cli.json,
        currency: policy.currency_symbol.clone(),
    };
    let catalog = load_catalog(cli.catalog.as_deref())?;
    let service = BillingService::new(catalog, policy, Arc::new(RecordingPaymentGateway::new()));
    tracing::debug!(?cli.command, "Running command");

    match cli.command {
        Command::Catalog { category } => commands::catalog(&service, &out, category.as_deref()),
        Command::Bill { items, report } => commands::bill(&service, &out, &items, report),
        Command::Coverage { total, plan } => commands::coverage(&service, &out, total, plan.as_deref()),
        Command::Pay { due, form } => commands::pay(&service, &out, due, &form),
        Command::Settle { items, plan, form } => {
            commands::settle(&service, &out, &items, plan.as_deref(), &form).await
        }
        Command::Claims { status } => commands::claims(&out, status.map(Into::into)).await,
        Command::Providers => commands::providers(&out).await,
    }
}
