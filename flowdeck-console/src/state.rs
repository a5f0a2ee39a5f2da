//! Shared dashboard view state
//!
//! Poll jobs write here; whatever renders the dashboard reads cloned
//! feed snapshots. Each feed keeps its latest payload together with a
//! refresh counter and the last normalized error message, so a broken
//! backend shows up as stale-data-plus-message rather than a blank view.

use flowdeck_core::dto::flow::FlowInfo;
use flowdeck_core::dto::snapshot::SnapshotMeta;
use std::sync::{Arc, Mutex};

/// Latest state of one periodically refreshed feed
#[derive(Debug, Clone, Default)]
pub struct Feed<T> {
    pub items: T,
    /// Completed refresh attempts, successful or not
    pub refresh_count: u64,
    /// Message from the most recent failed refresh; cleared on success
    pub last_error: Option<String>,
}

impl<T> Feed<T> {
    fn record(&mut self, items: T) {
        self.items = items;
        self.refresh_count += 1;
        self.last_error = None;
    }

    fn record_error(&mut self, message: String) {
        self.refresh_count += 1;
        self.last_error = Some(message);
    }
}

/// View state shared between poll jobs and the dashboard
pub struct DashboardState {
    flows: Mutex<Feed<Vec<FlowInfo>>>,
    snapshots: Mutex<Feed<Vec<SnapshotMeta>>>,
}

impl DashboardState {
    /// Creates empty state, shared by `Arc`
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            flows: Mutex::new(Feed::default()),
            snapshots: Mutex::new(Feed::default()),
        })
    }

    /// Stores a fresh flow listing
    pub fn record_flows(&self, flows: Vec<FlowInfo>) {
        self.flows.lock().unwrap().record(flows);
    }

    /// Records a failed flow refresh, keeping the previous listing
    pub fn record_flow_error(&self, message: String) {
        self.flows.lock().unwrap().record_error(message);
    }

    /// Stores a fresh snapshot listing
    pub fn record_snapshots(&self, snapshots: Vec<SnapshotMeta>) {
        self.snapshots.lock().unwrap().record(snapshots);
    }

    /// Records a failed snapshot refresh, keeping the previous listing
    pub fn record_snapshot_error(&self, message: String) {
        self.snapshots.lock().unwrap().record_error(message);
    }

    /// Current flow feed, cloned out of the lock
    pub fn flow_feed(&self) -> Feed<Vec<FlowInfo>> {
        self.flows.lock().unwrap().clone()
    }

    /// Current snapshot feed, cloned out of the lock
    pub fn snapshot_feed(&self) -> Feed<Vec<SnapshotMeta>> {
        self.snapshots.lock().unwrap().clone()
    }
}
