//! Flow DTOs for the job-flow engine API

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Status of a flow's most recent execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecStatus {
    Running,
    Success,
    Failed,
    Pending,
}

/// Summary row for one registered flow, as shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowInfo {
    pub flow_definition_id: String,
    pub flow_name: String,
    pub cron_config: String,
    pub last_execution_exec_status: ExecStatus,
    pub last_execution_duration: String,
    /// 1 = enabled, 0 = disabled (integer on the wire)
    pub enabled: u8,
}

/// One node of a flow graph, with edges to its successors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub node_id: String,
    pub name: String,
    pub next_node_ids: Vec<String>,
}

/// Where a field's value comes from when the flow runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldSource {
    Manual,
    NodeOutput,
}

/// Schema for a single configurable node field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub source_type: FieldSource,
    pub type_reference: String,
    pub description: String,
    pub group: String,
    pub value: serde_json::Value,
}

/// Field schemas for one node, keyed by field name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchemaSet {
    pub node_id: String,
    pub node_name: String,
    pub field_schema_map: HashMap<String, FieldSchema>,
}

/// Request to create a new flow definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlowRequest {
    pub flow_name: String,
    pub cron: String,
    pub description: String,
    pub node_list: Vec<FlowNode>,
    #[serde(rename = "fieldSchemaDTOList")]
    pub field_schemas: Vec<FieldSchemaSet>,
}

/// Graph body of a stored flow definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowGraph {
    pub name: String,
    pub nodes: Vec<FlowNode>,
}

/// Persisted flow definition returned by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDefinition {
    pub flow_definition_id: String,
    pub name: String,
    pub description: String,
    pub definition: FlowGraph,
    pub cron_config: String,
    pub enabled: u8,
}

/// Catalog entry describing a node type available to flows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    pub name: String,
    pub description: String,
    pub group: String,
    pub input_params: Vec<String>,
    pub output_params: Vec<String>,
}
