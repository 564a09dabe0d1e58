//! Remote viewport client — entry point.
//!
//! Creates a browser session on the remote automation backend, keeps frames
//! flowing (push when healthy, polling when not), and logs frame arrivals
//! and connectivity changes until interrupted.  A host UI embeds the
//! library crates instead of running this binary; it exists for driving a
//! backend from a terminal and for soak-testing the streaming fallback.
//!
//! # Usage
//!
//! ```text
//! viewport-client [OPTIONS]
//!
//! Options:
//!   --backend-url <URL>        Backend base URL [default: http://127.0.0.1:8001/api]
//!   --config <PATH>            TOML config file; CLI flags override it
//!   --open <URL>               Navigate to this URL once the session is live
//!   --poll-interval-ms <MS>    Pull cadence while push delivery is down
//! ```
//!
//! Environment variable fallbacks: `VIEWPORT_BACKEND_URL`,
//! `VIEWPORT_CONFIG`, `VIEWPORT_POLL_INTERVAL_MS`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use viewport_client::application::{
    ConnectionManager, ConnectionTuning, FrameStore, ViewportDispatcher,
};
use viewport_client::domain::ClientConfig;
use viewport_client::infrastructure::{BackendApi, WsPushChannel};
use viewport_core::StreamEvent;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote viewport client.
#[derive(Debug, Parser)]
#[command(
    name = "viewport-client",
    about = "Drive a remotely-rendered browser session from the terminal",
    version
)]
struct Cli {
    /// Base URL of the remote automation backend, including the API prefix.
    #[arg(long, env = "VIEWPORT_BACKEND_URL")]
    backend_url: Option<String>,

    /// TOML config file; CLI flags override its values.
    #[arg(long, env = "VIEWPORT_CONFIG")]
    config: Option<PathBuf>,

    /// URL to navigate to once the session is live.
    #[arg(long)]
    open: Option<String>,

    /// Milliseconds between frame pulls while push delivery is down.
    #[arg(long, env = "VIEWPORT_POLL_INTERVAL_MS")]
    poll_interval_ms: Option<u64>,
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(url) = &cli.backend_url {
        config.backend_url = url.clone();
    }
    if let Some(ms) = cli.poll_interval_ms {
        config.poll_interval_ms = ms;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Local identity for correlating this viewer's log lines; sessions and
    // tabs are identified by the backend, never by us.
    let viewer_id = Uuid::new_v4();
    info!(%viewer_id, backend = %config.backend_url, "starting viewport client");

    let api = BackendApi::new(&config.backend_url);
    let session = api
        .create_session()
        .await
        .context("failed to create browser session")?;
    let session_id = session.session_id.clone();
    info!(session = %session_id, "session created");

    let tuning = ConnectionTuning {
        poll_interval: config.poll_interval(),
        backoff_floor: config.reconnect_floor(),
        backoff_ceiling: config.reconnect_ceiling(),
    };
    let push = WsPushChannel::new(&config.ws_base());
    let (manager, handle, mut frames) =
        ConnectionManager::new(session_id.clone(), push, api.clone(), tuning);
    let run_task = tokio::spawn(manager.run());

    let dispatcher = ViewportDispatcher::new(session_id.clone(), Arc::new(api.clone()));
    if let Some(url) = &cli.open {
        match dispatcher.navigate(url).await {
            None => info!("navigating to {url}"),
            Some(rejection) => warn!("navigation to {url} rejected: {rejection}"),
        }
    }

    let mut store = FrameStore::new();
    let mut state_rx = handle.state_receiver();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received; shutting down");
                break;
            }
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *state_rx.borrow();
                info!(?state, "connection state changed");
                store.set_connection_state(state);
            }
            event = frames.recv() => {
                let Some(event) = event else { break };
                if let StreamEvent::Frame(frame) = &event {
                    debug!(tab = %frame.tab_id, bytes = frame.data.len(), "frame received");
                }
                let closed = matches!(event, StreamEvent::SessionClosed { .. });
                store.apply_event(event);
                if closed {
                    info!("session closed by backend");
                    break;
                }
            }
        }
    }

    // Teardown: stop the manager (cancelling any reconnect timers), then
    // close the session on the backend.
    handle.shutdown();
    let _ = run_task.await;
    if let Err(e) = api.close_session(&session_id).await {
        warn!(session = %session_id, "session close failed: {e}");
    } else {
        info!(session = %session_id, frames_seen = store.tab_count(), "session closed");
    }
    Ok(())
}
