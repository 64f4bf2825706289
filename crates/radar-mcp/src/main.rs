//! Tool-protocol façade: the same three flows as the HTTP API, exposed as
//! tools over newline-delimited JSON-RPC 2.0 on stdin/stdout.

mod rpc;
mod tools;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use radar_analysis::AnalysisService;
use radar_db::PgReportStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = radar_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout is the protocol channel; every diagnostic goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = radar_db::PoolConfig::from_app_config(&config);
    let pool = radar_db::connect_pool(&config.database_url, pool_config).await?;
    radar_db::run_migrations(&pool).await?;

    let providers = radar_llm::providers_from_config(&config)?;
    let store = Arc::new(PgReportStore::new(pool));
    let service = AnalysisService::new(providers, store);

    tracing::info!(env = %config.env, "radar-mcp serving on stdio");
    rpc::serve_stdio(&service).await?;
    tracing::info!("stdin closed, shutting down");
    Ok(())
}
