//! Dashboard poll jobs
//!
//! Each constructor binds the engine client and shared view state into a
//! poll action suitable for [`PollHub::register_job`]. Failures are
//! recorded on the feed (for the view) and propagated (for the hub's
//! diagnostic log); they are never fatal.
//!
//! [`PollHub::register_job`]: crate::scheduler::PollHub::register_job

use crate::state::DashboardState;
use anyhow::Result;
use flowdeck_client::EngineClient;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Registration id for the flow overview feed
pub const FLOW_OVERVIEW_JOB: &str = "flow-overview";

/// Registration id for the snapshot overview feed
pub const SNAPSHOT_OVERVIEW_JOB: &str = "snapshot-overview";

/// Poll action that refreshes the flow overview feed
pub fn flow_overview_action(
    client: Arc<EngineClient>,
    state: Arc<DashboardState>,
) -> impl Fn() -> BoxFuture<'static, Result<()>> + Send + Sync + 'static {
    move || {
        let client = Arc::clone(&client);
        let state = Arc::clone(&state);
        Box::pin(async move {
            match client.get_all_flow_info().await {
                Ok(flows) => {
                    state.record_flows(flows);
                    Ok(())
                }
                Err(e) => {
                    state.record_flow_error(e.to_string());
                    Err(e.into())
                }
            }
        })
    }
}

/// Poll action that refreshes the snapshot overview feed
pub fn snapshot_overview_action(
    client: Arc<EngineClient>,
    state: Arc<DashboardState>,
) -> impl Fn() -> BoxFuture<'static, Result<()>> + Send + Sync + 'static {
    move || {
        let client = Arc::clone(&client);
        let state = Arc::clone(&state);
        Box::pin(async move {
            match client.get_all_snapshots().await {
                Ok(snapshots) => {
                    state.record_snapshots(snapshots);
                    Ok(())
                }
                Err(e) => {
                    state.record_snapshot_error(e.to_string());
                    Err(e.into())
                }
            }
        })
    }
}
