use anyhow::Result;
use gatewatch::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let client = Arc::new(client::DeviceClient::new(
        &app_config.device.base_url,
        Duration::from_millis(app_config.device.request_timeout_ms),
    )?);
    let visibility = visibility::Visibility::new(app_config.polling.pause_when_hidden);
    let refresh = Arc::new(Notify::new());
    let (state_tx, state_rx) = watch::channel(models::RenderedState::default());
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    tracing::info!(
        device = client.base_url(),
        interval_ms = app_config.polling.interval_ms,
        pause_when_hidden = app_config.polling.pause_when_hidden,
        "Starting status poller"
    );
    let poller_handle = poller::spawn(
        poller::PollerDeps {
            source: client.clone(),
            state_tx,
            visibility: visibility.clone(),
            refresh: refresh.clone(),
            shutdown_rx,
        },
        poller::PollerConfig {
            interval_ms: app_config.polling.interval_ms,
            stats_log_interval_secs: app_config.polling.stats_log_interval_secs,
        },
    );

    let app = routes::app(state_rx, client, visibility, refresh, app_config.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = poller_handle.await;
        }
    }

    Ok(())
}
