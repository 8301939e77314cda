//! Error handling utilities for MCP server

use atlas_core::AtlasError;
use rmcp::ErrorData;
use serde_json::json;

/// Maps an orchestrator error onto an MCP error.
///
/// Client errors become `invalid_params`; everything else is an internal
/// error, flagged retryable when repeating the call may succeed.
pub fn to_mcp_error(message: &str, error: &AtlasError) -> ErrorData {
    let text = format!("{message}: {error}");
    if error.is_client_error() {
        ErrorData::invalid_params(text, None)
    } else {
        ErrorData::internal_error(text, Some(json!({ "retryable": error.is_transient() })))
    }
}
