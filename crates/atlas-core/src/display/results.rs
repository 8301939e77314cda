//! Headline wrappers for the plan-advancing operations.

use std::fmt;

use crate::models::{Plan, PlanStatus};

/// Result of `start`.
pub struct StartResult {
    pub plan: Plan,
}

impl StartResult {
    pub fn new(plan: Plan) -> Self {
        Self { plan }
    }
}

impl fmt::Display for StartResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.plan.status == PlanStatus::Failed {
            writeln!(f, "Plan {} could not be started", self.plan.plan_id)?;
        } else {
            writeln!(f, "Started plan with ID: {}", self.plan.plan_id)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.plan)
    }
}

/// Result of `continue`.
pub struct TurnResult {
    pub plan: Plan,
}

impl TurnResult {
    pub fn new(plan: Plan) -> Self {
        Self { plan }
    }
}

impl fmt::Display for TurnResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Recorded turn {} for plan {}",
            self.plan.turn, self.plan.plan_id
        )?;
        writeln!(f)?;
        write!(f, "{}", self.plan)
    }
}

/// Result of `finalize`.
pub struct FinalizeResult {
    pub plan: Plan,
}

impl FinalizeResult {
    pub fn new(plan: Plan) -> Self {
        Self { plan }
    }
}

impl fmt::Display for FinalizeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Finalized plan {}", self.plan.plan_id)?;
        if let Some(total) = self.plan.budget().map(|b| b.total_cost) {
            writeln!(f)?;
            writeln!(f, "Estimated total: ${total}")?;
        }
        writeln!(f)?;
        write!(f, "{}", self.plan)
    }
}
