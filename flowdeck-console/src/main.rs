//! Flowdeck Console
//!
//! Operator console for a job-flow engine with an attached backup/snapshot
//! service.
//!
//! Architecture:
//! - Configuration: engine URL and tick interval from the environment
//! - Client: typed engine API access with normalized failures
//! - Scheduler: one shared timer multiplexing all periodic feeds
//! - State: feed snapshots the dashboard views read
//!
//! The console registers one poll job per dashboard feed on the shared
//! timer; each job refreshes its feed through the engine client and records
//! success or the normalized failure message.

mod config;
mod jobs;
mod scheduler;
mod state;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::scheduler::PollHub;
use crate::state::DashboardState;
use flowdeck_client::EngineClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowdeck_console=info,flowdeck_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Flowdeck Console");

    // Load configuration
    let config = Config::from_env();
    config.validate()?;
    info!(
        "Loaded configuration: engine_url={}, tick_interval={:?}",
        config.engine_url, config.tick_interval
    );

    // Initialize engine client with the fixed per-request deadline
    let client = Arc::new(
        EngineClient::with_timeout(config.engine_url.clone(), config.request_timeout)
            .context("Failed to build engine client")?,
    );

    let state = DashboardState::new();
    let hub = Arc::new(PollHub::new(config.tick_interval));

    // Register the dashboard feeds; each runs once immediately and then on
    // every tick of the shared timer.
    hub.register_job(
        jobs::FLOW_OVERVIEW_JOB,
        jobs::flow_overview_action(Arc::clone(&client), Arc::clone(&state)),
    );
    hub.register_job(
        jobs::SNAPSHOT_OVERVIEW_JOB,
        jobs::snapshot_overview_action(Arc::clone(&client), Arc::clone(&state)),
    );

    info!(
        "Dashboard feeds registered ({} subscriber(s), timer active: {})",
        hub.subscriber_count(),
        hub.timer_active()
    );

    // Poll until interrupted
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutdown requested");

    hub.unregister_job(jobs::FLOW_OVERVIEW_JOB);
    hub.unregister_job(jobs::SNAPSHOT_OVERVIEW_JOB);

    let flows = state.flow_feed();
    let snapshots = state.snapshot_feed();
    info!(
        "Final state: {} flow(s) over {} refresh(es), {} snapshot(s) over {} refresh(es)",
        flows.items.len(),
        flows.refresh_count,
        snapshots.items.len(),
        snapshots.refresh_count
    );

    Ok(())
}
