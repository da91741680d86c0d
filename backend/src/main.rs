//! Backend entry-point: configuration, tracing, and server bootstrap.

use std::io;

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use darpan_backend::server::{ServerConfig, run};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env()
        .map_err(|err| io::Error::other(format!("configuration error: {err}")))?;
    run(config).await
}
