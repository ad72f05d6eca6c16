use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use quake_map::config::Config;
use quake_map::feed::{FeedSource, FileFeed, HttpFeed};
use quake_map::metrics::{self, Metrics};
use quake_map::render::render_svg;
use quake_map::server::{self, AppState};
use quake_map::snapshot;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut config = Config::parse();

    match config.feed_file.take() {
        Some(path) => run(FileFeed::new(path), config).await,
        None => {
            let source = HttpFeed::with_timeout(&config.feed_url, config.timeout())?;
            run(source, config).await
        }
    }
}

async fn run<S: FeedSource>(source: S, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::default());

    if let Some(path) = &config.output {
        let t0 = Instant::now();
        let snapshot = snapshot::load(&source, &metrics).await?;
        let svg = render_svg(&config.view(), &config.tile_layer(), &snapshot.markers, &snapshot.legend);
        tokio::fs::write(path, svg).await?;
        info!(
            path = %path.display(),
            markers = snapshot.markers.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "map written"
        );
        return Ok(());
    }

    info!(
        source = %source.describe(),
        port = config.port,
        metrics_port = config.metrics_port,
        "starting quake map server"
    );

    // Bind eagerly: fail fast if the port is taken, before spawning anything.
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(addr = %listener.local_addr()?, "map server listening");

    let cancel = CancellationToken::new();

    let http_handle = {
        let cancel = cancel.clone();
        let metrics = metrics.clone();
        let port = config.metrics_port;
        tokio::spawn(async move {
            metrics::serve_http(port, metrics, cancel).await;
        })
    };

    // Shutdown signal handler (SIGINT + SIGTERM).
    let shutdown_cancel = cancel.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {},
                        _ = sigterm.recv() => {},
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for ctrl+c");
                    let _ = tokio::signal::ctrl_c().await;
                }
            }
        }
        #[cfg(not(unix))]
        let _ = tokio::signal::ctrl_c().await;
        info!("received shutdown signal, draining");
        shutdown_cancel.cancel();
    });

    let state = Arc::new(AppState::new(source, config.view(), config.tile_layer(), metrics));
    let server_cancel = cancel.clone();
    axum::serve(listener, server::router(state))
        .with_graceful_shutdown(async move { server_cancel.cancelled().await })
        .await?;

    let _ = http_handle.await;

    info!("shutdown complete");
    Ok(())
}
