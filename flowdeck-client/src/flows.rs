//! Flow-related API endpoints

use crate::EngineClient;
use crate::error::Result;
use flowdeck_core::dto::flow::{
    CreateFlowRequest, FieldSchemaSet, FlowDefinition, FlowInfo, FlowNode, NodeDescriptor,
};
use tracing::debug;

impl EngineClient {
    // =============================================================================
    // Flow Editor
    // =============================================================================

    /// Validate a flow graph's node wiring
    ///
    /// Succeeds silently; graph problems come back as a server error whose
    /// message describes the offending node.
    pub async fn valid_nodes(&self, nodes: &[FlowNode]) -> Result<()> {
        let url = format!("{}/flow-editor/valid-nodes", self.base_url);
        let response = self.client.post(&url).json(nodes).send().await?;

        self.handle_empty(response).await
    }

    /// Resolve the field schemas for a flow graph
    ///
    /// # Returns
    /// One schema set per node, keyed by field name
    pub async fn get_field_schema(&self, nodes: &[FlowNode]) -> Result<Vec<FieldSchemaSet>> {
        let url = format!("{}/flow-editor/get-field-schema", self.base_url);
        let response = self.client.post(&url).json(nodes).send().await?;

        self.handle_envelope(response).await
    }

    /// Validate filled-in field schemas before flow creation
    pub async fn valid_field_schema(&self, schemas: &[FieldSchemaSet]) -> Result<()> {
        let url = format!("{}/flow-editor/valid-field-schema", self.base_url);
        let response = self.client.post(&url).json(schemas).send().await?;

        self.handle_empty(response).await
    }

    /// Create a new flow definition
    ///
    /// # Returns
    /// The persisted flow definition
    ///
    /// # Example
    /// ```no_run
    /// # use flowdeck_client::EngineClient;
    /// # use flowdeck_core::dto::flow::CreateFlowRequest;
    /// # async fn example() -> Result<(), flowdeck_client::ClientError> {
    /// let client = EngineClient::new("http://localhost:8080");
    /// let flow = client.create_flow(&CreateFlowRequest {
    ///     flow_name: "nightly-sync".to_string(),
    ///     cron: "0 2 * * *".to_string(),
    ///     description: "Sync warehouse tables".to_string(),
    ///     node_list: vec![],
    ///     field_schemas: vec![],
    /// }).await?;
    /// println!("Created flow: {}", flow.flow_definition_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_flow(&self, req: &CreateFlowRequest) -> Result<FlowDefinition> {
        let url = format!("{}/flow-editor/create-flow", self.base_url);
        debug!("Creating flow {}", req.flow_name);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_envelope(response).await
    }

    /// List the node types available to flows
    pub async fn get_all_nodes(&self) -> Result<Vec<NodeDescriptor>> {
        let url = format!("{}/flow-editor/get-all-nodes", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_envelope(response).await
    }

    // =============================================================================
    // Flow Info
    // =============================================================================

    /// List every registered flow with its last-execution summary
    ///
    /// This is the dashboard's primary poll target.
    pub async fn get_all_flow_info(&self) -> Result<Vec<FlowInfo>> {
        let url = format!("{}/flow-info/get-all-flow-info", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_envelope(response).await
    }

    /// Enable scheduled execution of a flow
    pub async fn enable_flow(&self, flow: &FlowInfo) -> Result<()> {
        let url = format!("{}/flow-info/enable-flow", self.base_url);
        let response = self.client.post(&url).json(flow).send().await?;

        self.handle_empty(response).await
    }

    /// Disable scheduled execution of a flow
    pub async fn disable_flow(&self, flow: &FlowInfo) -> Result<()> {
        let url = format!("{}/flow-info/disable-flow", self.base_url);
        let response = self.client.post(&url).json(flow).send().await?;

        self.handle_empty(response).await
    }

    /// Delete a flow definition
    pub async fn delete_flow(&self, flow: &FlowInfo) -> Result<()> {
        let url = format!("{}/flow-info/delete-flow", self.base_url);
        let response = self.client.post(&url).json(flow).send().await?;

        self.handle_empty(response).await
    }
}
