//! Plan status enumeration and the legal transitions between statuses.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of plan statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Created, no specialist has run yet
    #[default]
    Pending,

    /// Specialists have contributed; the plan can be refined or finalized
    InProgress,

    /// A specialist needs the user to clarify something
    AwaitingUserInput,

    /// Finalized; terminal
    Completed,

    /// Unrecoverable failure; terminal
    Failed,
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PlanStatus::Pending),
            "in_progress" | "inprogress" => Ok(PlanStatus::InProgress),
            "awaiting_user_input" => Ok(PlanStatus::AwaitingUserInput),
            "completed" => Ok(PlanStatus::Completed),
            "failed" => Ok(PlanStatus::Failed),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

impl PlanStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Pending => "pending",
            PlanStatus::InProgress => "in_progress",
            PlanStatus::AwaitingUserInput => "awaiting_user_input",
            PlanStatus::Completed => "completed",
            PlanStatus::Failed => "failed",
        }
    }

    /// `completed` and `failed` accept no further requests.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlanStatus::Completed | PlanStatus::Failed)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    ///
    /// Staying in the same non-terminal status is allowed so that a turn
    /// which changes nothing about the phase can still be persisted.
    pub fn can_transition_to(&self, next: PlanStatus) -> bool {
        use PlanStatus::*;

        match (self, next) {
            (Completed | Failed, _) => false,
            (Pending, InProgress | AwaitingUserInput | Failed) => true,
            (InProgress, InProgress | AwaitingUserInput | Completed | Failed) => true,
            (AwaitingUserInput, AwaitingUserInput | InProgress | Completed | Failed) => true,
            _ => false,
        }
    }

    /// Get status with a consistent icon for display.
    pub fn with_icon(&self) -> &'static str {
        match self {
            PlanStatus::Pending => "○ Pending",
            PlanStatus::InProgress => "➤ In Progress",
            PlanStatus::AwaitingUserInput => "? Awaiting Input",
            PlanStatus::Completed => "✓ Completed",
            PlanStatus::Failed => "✗ Failed",
        }
    }
}
