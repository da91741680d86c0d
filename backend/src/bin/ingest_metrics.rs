//! Ingest a JSON batch of monthly metrics into backend storage.
//!
//! Reads a batch file of `{"records": [...]}` rows keyed by district code,
//! appends them through the domain ingestion service, and records the run in
//! the sync log. Duplicate months and unknown districts are skipped and
//! tallied, never overwritten.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use darpan_backend::domain::{MetricsBatch, MetricsIngestionService};
use darpan_backend::outbound::persistence::{
    DbPool, DieselDistrictRepository, DieselMetricsRepository, DieselSyncLogRepository,
    PoolConfig,
};

/// `ingest-metrics` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ingest-metrics",
    about = "Append a batch of monthly employment metrics with sync log auditing",
    version
)]
struct CliArgs {
    /// Path to the JSON batch file.
    #[arg(long = "input", value_name = "path")]
    input: PathBuf,
    /// Job name recorded in the sync log.
    #[arg(long = "job-name", value_name = "name", default_value = "manual-ingest")]
    job_name: String,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = CliArgs::try_parse()?;

    let raw = std::fs::read_to_string(&args.input)
        .wrap_err_with(|| format!("read batch file {}", args.input.display()))?;
    let batch: MetricsBatch = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("parse batch file {}", args.input.display()))?;

    let database_url = args
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .ok_or_else(|| eyre!("no database URL: pass --database-url or set DATABASE_URL"))?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|err| eyre!("create database pool: {err}"))?;

    let service = MetricsIngestionService::new(
        Arc::new(DieselDistrictRepository::new(pool.clone())),
        Arc::new(DieselMetricsRepository::new(pool.clone())),
        Arc::new(DieselSyncLogRepository::new(pool)),
        Arc::new(DefaultClock),
    );

    let outcome = service
        .ingest(&args.job_name, batch)
        .await
        .map_err(|err| eyre!("ingestion failed: {err}"))?;

    info!(
        inserted = outcome.inserted,
        duplicates = outcome.duplicates,
        unknown_districts = outcome.unknown_districts,
        invalid = outcome.invalid,
        job = %args.job_name,
        "ingestion run finished"
    );
    Ok(())
}
