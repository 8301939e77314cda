//! MCP server implementation for Atlas
//!
//! Exposes the four plan operations as MCP tools over stdio. Every tool
//! returns the same JSON body as `atlas --json`.

use std::sync::Arc;

use anyhow::Result;
use atlas_core::Orchestrator;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};

pub mod errors;
pub mod handlers;

pub use handlers::{ContinuePlan, McpResult, PlanRef, StartPlan};

/// MCP server for Atlas
#[derive(Clone)]
pub struct AtlasMcpServer {
    orchestrator: Arc<Orchestrator>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl AtlasMcpServer {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.orchestrator.clone())
    }

    #[tool(
        name = "start_plan",
        description = "Start a new trip plan from a free-form goal such as \"5-day Paris trip, $3000 budget\". Requires goal and user_id. Flight, hotel, activity and destination research run in parallel, followed by budget and itinerary. Returns {plan_id, status, message}; status is 'awaiting_user_input' when the planner needs an answer (the message holds the question)."
    )]
    async fn start_plan(&self, params: Parameters<StartPlan>) -> McpResult {
        self.handlers().start_plan(params).await
    }

    #[tool(
        name = "continue_plan",
        description = "Add a user request to an existing plan, e.g. \"prefer boutique hotels\" or \"make it 4 days\". Only the specialists the request affects are re-run, plus budget and itinerary. Returns {plan_id, status, contributions}. Fails for completed or failed plans."
    )]
    async fn continue_plan(&self, params: Parameters<ContinuePlan>) -> McpResult {
        self.handlers().continue_plan(params).await
    }

    #[tool(
        name = "plan_status",
        description = "Read a plan without changing it. Returns {plan_id, status, plan} with every contribution, the turn history, warnings from specialists that failed, and any open question."
    )]
    async fn plan_status(&self, params: Parameters<PlanRef>) -> McpResult {
        self.handlers().plan_status(params).await
    }

    #[tool(
        name = "finalize_plan",
        description = "Reconcile the budget and itinerary one last time and mark the plan completed. Requires flights, hotels, budget and itinerary to be present. Fails without completing the plan if the budget cannot be met. Returns {plan_id, status: 'completed', plan}."
    )]
    async fn finalize_plan(&self, params: Parameters<PlanRef>) -> McpResult {
        self.handlers().finalize_plan(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for AtlasMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "atlas".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(r#"Atlas plans trips over several turns.

## Workflow
1. `start_plan` with the traveller's goal. Keep the returned plan_id.
2. If status is `awaiting_user_input`, ask the user the question in `message` and pass the answer to `continue_plan`.
3. Pass any refinement ("nonstop flights", "more museums", "make it 4 days") to `continue_plan`.
4. `plan_status` shows the full plan at any time.
5. `finalize_plan` once the user is happy; the plan is then read-only.

## Notes
- Specialist failures are recorded as warnings and do not abort a turn.
- A plan fails only when neither flights nor hotels can be researched.
- Errors flagged `retryable` can be repeated as-is."#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: AtlasMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Atlas MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
