//! Snapshot DTOs for the backup/restic engine API

use serde::{Deserialize, Serialize};

/// Metadata for one stored backup snapshot
///
/// Counts, sizes and timestamps are strings on the wire (the engine
/// serializes them from its own 64-bit and time types, with no pinned
/// timestamp format); they are kept as-is and parsed only where needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub snapshot_meta_id: String,
    pub source_directory: String,
    pub backup_repository: String,
    pub created_at: String,
    pub snapshot_id: String,
    pub file_count: String,
    pub dir_count: String,
    pub snapshot_size_bytes: String,
    pub hostname: String,
    pub username: String,
}

/// Kind of entry inside a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotEntryKind {
    File,
    Dir,
}

/// One file or directory entry inside a snapshot listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SnapshotEntryKind,
    pub path: String,
    pub size: u64,
    pub ctime: String,
}

/// Request to restore a selection of entries from one snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreRequest {
    pub snapshot_meta_entity: SnapshotMeta,
    #[serde(rename = "snapshotItemDTOList")]
    pub items: Vec<SnapshotItem>,
}
