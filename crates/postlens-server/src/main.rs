mod api;
mod middleware;

use std::sync::Arc;

use anyhow::Context;
use postlens_analytics::BucketWidth;
use postlens_core::Palette;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, ServerDefaults};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = postlens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let bucket_width: BucketWidth = config
        .rolling_period
        .parse()
        .context("invalid POSTLENS_ROLLING_PERIOD")?;

    let (dataset, report) = postlens_core::load_dataset(&config.dataset_path)
        .with_context(|| format!("failed to load dataset {}", config.dataset_path.display()))?;
    let palette = match &config.palette_path {
        Some(path) => postlens_core::load_palette(path)
            .with_context(|| format!("failed to load palette {}", path.display()))?,
        None => Palette::default(),
    };

    tracing::info!(
        env = %config.env,
        posts = report.accepted,
        skipped = report.skipped_total(),
        rolling = %bucket_width,
        "postlens-server starting"
    );

    let state = AppState {
        dataset: Arc::new(dataset),
        palette: Arc::new(palette),
        defaults: ServerDefaults {
            bucket_width,
            rank_limit: config.rank_cap(),
        },
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
