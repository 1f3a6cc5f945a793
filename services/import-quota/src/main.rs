use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use event_aggregator_import_quota::{
    create_router, Aggregator, ApiState, Clock, ImportQuotaConfig, SqliteTransientStore,
    SystemClock, TransientStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ImportQuotaConfig::from_env()?;
    init_tracing(&config.log_level)?;

    let addr = config.listen_addr();
    info!(
        addr = %addr,
        data_dir = %config.data_dir.display(),
        default_daily_limit = config.default_daily_limit,
        "starting import-quota service"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store: Arc<dyn TransientStore> = Arc::new(
        SqliteTransientStore::new(config.data_dir.clone(), Arc::clone(&clock))
            .context("failed to open transient store")?,
    );
    let aggregator = Arc::new(Aggregator::new(&config, store, clock));

    match aggregator.purge_expired() {
        Ok(purged) => info!(purged, "purged expired transients at startup"),
        Err(err) => error!(error = %err, "failed to purge expired transients at startup"),
    }
    let _maintenance_task =
        aggregator.start_maintenance_task(Duration::from_secs(config.purge_interval_secs));

    let state = Arc::new(ApiState::new(Arc::clone(&aggregator), config));
    let router = create_router(state);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("import-quota service shutting down");
    Ok(())
}

fn init_tracing(default_level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
