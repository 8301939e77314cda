//! MCP tool handlers implementation

use std::sync::Arc;

use atlas_core::{
    params as core, ContinueResponse, FinalizeResponse, Orchestrator, StartResponse,
    StatusResponse,
};
use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::errors::to_mcp_error;

/// Transparent MCP wrapper for core parameter types.
///
/// Gives the core types the `Deserialize` + `JsonSchema` shape rmcp expects
/// without tying `atlas-core` to the MCP framework.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type StartPlan = McpParams<core::StartPlan>;
pub type ContinuePlan = McpParams<core::ContinuePlan>;
pub type PlanRef = McpParams<core::PlanRef>;

pub type McpResult = Result<CallToolResult, ErrorData>;

/// Serializes a response body as the tool's single text content.
fn json_result<T: Serialize>(body: &T) -> McpResult {
    let text = serde_json::to_string_pretty(body)
        .map_err(|e| ErrorData::internal_error(format!("Failed to encode response: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    orchestrator: Arc<Orchestrator>,
}

impl McpHandlers {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn start_plan(&self, Parameters(params): Parameters<StartPlan>) -> McpResult {
        debug!("start_plan: {params:?}");

        let plan = self
            .orchestrator
            .start(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to start plan", &e))?;
        json_result(&StartResponse::from_plan(&plan))
    }

    pub async fn continue_plan(&self, Parameters(params): Parameters<ContinuePlan>) -> McpResult {
        debug!("continue_plan: {params:?}");

        let plan = self
            .orchestrator
            .continue_plan(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to continue plan", &e))?;
        json_result(&ContinueResponse::from_plan(&plan))
    }

    pub async fn plan_status(&self, Parameters(params): Parameters<PlanRef>) -> McpResult {
        debug!("plan_status: {params:?}");

        let plan = self
            .orchestrator
            .status(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to read plan", &e))?;
        json_result(&StatusResponse::from_plan(plan))
    }

    pub async fn finalize_plan(&self, Parameters(params): Parameters<PlanRef>) -> McpResult {
        debug!("finalize_plan: {params:?}");

        let plan = self
            .orchestrator
            .finalize(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to finalize plan", &e))?;
        json_result(&FinalizeResponse::from_plan(plan))
    }
}
