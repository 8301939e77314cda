//! Request and response shapes shared by every interface.
//!
//! Requests are plain serde structs; the MCP server derives JSON Schema for
//! them through the `schema` feature, and the CLI converts its clap arguments
//! into them. Responses mirror the JSON bodies the gateway returns.
//!
//! ```text
//! start    {goal, user_id}         -> {plan_id, status, message}
//! continue {plan_id, user_input}   -> {plan_id, status, contributions?}
//! status   {plan_id}               -> {plan_id, status, plan?}
//! finalize {plan_id}               -> {plan_id, status: "completed", plan}
//! ```

use std::collections::BTreeMap;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};
use crate::models::{Contribution, Plan, PlanId, PlanStatus, SpecialistKind};

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AtlasError::validation(field).with_reason("must not be empty"));
    }
    Ok(())
}

/// Parameters for starting a new plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StartPlan {
    /// What the user wants planned, e.g. "5-day Paris trip, $3000 budget"
    pub goal: String,
    /// Opaque identifier of the requesting user
    pub user_id: String,
}

impl StartPlan {
    /// Rejects empty or whitespace-only fields.
    pub fn validate(&self) -> Result<()> {
        require("goal", &self.goal)?;
        require("user_id", &self.user_id)
    }
}

/// Parameters for adding a turn to an existing plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ContinuePlan {
    /// ID returned by start
    pub plan_id: String,
    /// New input from the user, e.g. "prefer boutique hotels"
    pub user_input: String,
}

impl ContinuePlan {
    pub fn validate(&self) -> Result<()> {
        require("plan_id", &self.plan_id)?;
        require("user_input", &self.user_input)
    }
}

/// Parameters for operations that only need a plan ID (status, finalize).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct PlanRef {
    /// ID returned by start
    pub plan_id: String,
}

impl PlanRef {
    pub fn validate(&self) -> Result<()> {
        require("plan_id", &self.plan_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartResponse {
    pub plan_id: PlanId,
    pub status: PlanStatus,
    pub message: String,
}

impl StartResponse {
    pub fn from_plan(plan: &Plan) -> Self {
        let message = match plan.status {
            PlanStatus::Failed => plan
                .error
                .as_ref()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "Planning failed".to_string()),
            PlanStatus::AwaitingUserInput => plan
                .clarification
                .clone()
                .unwrap_or_else(|| "More information needed".to_string()),
            _ => format!(
                "Plan started with {} of 6 contributions",
                plan.contributions.len()
            ),
        };
        Self {
            plan_id: plan.plan_id.clone(),
            status: plan.status,
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContinueResponse {
    pub plan_id: PlanId,
    pub status: PlanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributions: Option<BTreeMap<SpecialistKind, Contribution>>,
}

impl ContinueResponse {
    pub fn from_plan(plan: &Plan) -> Self {
        Self {
            plan_id: plan.plan_id.clone(),
            status: plan.status,
            contributions: (!plan.contributions.is_empty()).then(|| plan.contributions.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub plan_id: PlanId,
    pub status: PlanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
}

impl StatusResponse {
    pub fn from_plan(plan: Plan) -> Self {
        Self {
            plan_id: plan.plan_id.clone(),
            status: plan.status,
            plan: Some(plan),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalizeResponse {
    pub plan_id: PlanId,
    pub status: PlanStatus,
    pub plan: Plan,
}

impl FinalizeResponse {
    pub fn from_plan(plan: Plan) -> Self {
        Self {
            plan_id: plan.plan_id.clone(),
            status: plan.status,
            plan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_validation() {
        let ok = StartPlan {
            goal: "Weekend in Rome".to_string(),
            user_id: "user-1".to_string(),
        };
        assert!(ok.validate().is_ok());

        let blank = StartPlan {
            goal: "   ".to_string(),
            user_id: "user-1".to_string(),
        };
        match blank.validate() {
            Err(AtlasError::Validation { field, .. }) => assert_eq!(field, "goal"),
            other => panic!("expected validation error, got {other:?}"),
        }

        let no_user = StartPlan {
            goal: "Weekend in Rome".to_string(),
            user_id: String::new(),
        };
        assert!(no_user.validate().is_err());
    }

    #[test]
    fn test_continue_validation() {
        let empty = ContinuePlan {
            plan_id: "abc".to_string(),
            user_input: "\n".to_string(),
        };
        assert!(empty.validate().is_err());
        assert!(PlanRef::default().validate().is_err());
    }

    #[test]
    fn test_continue_response_omits_empty_contributions() {
        let plan = Plan::new("u", "g");
        let json = serde_json::to_value(ContinueResponse::from_plan(&plan)).unwrap();
        assert!(json.get("contributions").is_none());
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_status_response_carries_plan() {
        let plan = Plan::new("u", "g");
        let json = serde_json::to_value(StatusResponse::from_plan(plan.clone())).unwrap();
        assert_eq!(json["plan_id"], plan.plan_id.as_str());
        assert_eq!(json["plan"]["goal"], "g");
    }
}
