//! Flowdeck Core
//!
//! Shared types for the Flowdeck operator console.
//!
//! This crate contains:
//! - The REST envelope every non-blob engine endpoint wraps its payload in
//! - Flow DTOs: flow definitions, nodes, field schemas, execution summaries
//! - Snapshot DTOs: backup snapshot metadata, entries, restore requests

pub mod dto;
