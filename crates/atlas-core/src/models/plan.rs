//! Plan model definition and the merge rules that guard it.

use std::collections::BTreeMap;
use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    BudgetSummary, Contribution, FlightPlan, HotelPlan, Itinerary, Payload, PlanStatus,
    SpecialistKind,
};
use crate::error::{AtlasError, Result};

/// Opaque, immutable plan identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(String);

impl PlanId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlanId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PlanId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One user input received through `continue`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub number: u64,
    pub input: String,
    pub received_at: Timestamp,
}

/// An absorbed specialist failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Warning {
    pub turn: u64,
    pub kind: SpecialistKind,
    pub message: String,
    pub retryable: bool,
    pub recorded_at: Timestamp,
}

/// Why a plan ended up `failed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    /// Neither transportation nor lodging could be researched
    SpecialistsUnavailable,
    /// Fault in merge or persistence
    Internal,
}

/// Terminal failure descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanError {
    pub cause: FailureCause,
    pub message: String,
    pub occurred_at: Timestamp,
}

impl PlanError {
    pub fn new(cause: FailureCause, message: impl Into<String>) -> Self {
        Self {
            cause,
            message: message.into(),
            occurred_at: Timestamp::now(),
        }
    }
}

/// Outcome of offering a contribution to a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Accepted,
    /// Computed for a turn older than what the plan already holds
    Stale { turn: u64, floor: u64 },
    /// Computed for a turn the plan has not reached
    Ahead { turn: u64, current: u64 },
}

impl MergeOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MergeOutcome::Accepted)
    }
}

/// The persisted record of one user's trip-planning session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier, assigned at creation
    pub plan_id: PlanId,

    /// Owner of the plan
    pub user_id: String,

    /// Current state-machine status
    #[serde(default)]
    pub status: PlanStatus,

    /// Free-form intent captured at creation
    pub goal: String,

    /// Current turn counter; the goal is turn 0
    pub turn: u64,

    /// User inputs received through `continue`, oldest first
    #[serde(default)]
    pub turns: Vec<Turn>,

    /// Latest accepted output per specialist kind
    #[serde(default)]
    pub contributions: BTreeMap<SpecialistKind, Contribution>,

    /// Absorbed specialist failures, oldest first
    #[serde(default)]
    pub warnings: Vec<Warning>,

    /// Question for the user while awaiting input
    pub clarification: Option<String>,

    /// Set when the plan failed
    pub error: Option<PlanError>,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was last modified (UTC)
    pub updated_at: Timestamp,

    /// Timestamp when the plan was finalized (UTC)
    pub completed_at: Option<Timestamp>,

    /// Cumulative wall time spent running specialists
    #[serde(default)]
    pub processing_ms: u64,
}

impl Plan {
    /// Creates a fresh `pending` plan at turn 0.
    pub fn new(user_id: impl Into<String>, goal: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            plan_id: PlanId::generate(),
            user_id: user_id.into(),
            status: PlanStatus::Pending,
            goal: goal.into(),
            turn: 0,
            turns: Vec::new(),
            contributions: BTreeMap::new(),
            warnings: Vec::new(),
            clarification: None,
            error: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
            processing_ms: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Moves the plan to `next`, rejecting moves the state machine forbids.
    pub fn transition(&mut self, next: PlanStatus, operation: &str) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(AtlasError::invalid_state(
                &self.plan_id,
                self.status,
                operation,
                format!("cannot move to '{}'", next.as_str()),
            ));
        }
        if next == PlanStatus::Completed {
            self.completed_at = Some(Timestamp::now());
        }
        self.status = next;
        Ok(())
    }

    /// Fails fast when the plan no longer accepts requests.
    pub fn ensure_open(&self, operation: &str) -> Result<()> {
        if self.is_terminal() {
            return Err(AtlasError::invalid_state(
                &self.plan_id,
                self.status,
                operation,
                "plan is terminal",
            ));
        }
        Ok(())
    }

    /// Appends a user input as the next turn and returns its number.
    pub fn append_turn(&mut self, input: impl Into<String>) -> u64 {
        self.turn += 1;
        self.turns.push(Turn {
            number: self.turn,
            input: input.into(),
            received_at: Timestamp::now(),
        });
        self.turn
    }

    /// Offers a contribution. It replaces the current one for its kind only
    /// when computed for the plan's current turn and not older than the
    /// recorded contribution.
    pub fn accept(&mut self, contribution: Contribution) -> MergeOutcome {
        let kind = contribution.kind();
        if contribution.turn > self.turn {
            return MergeOutcome::Ahead {
                turn: contribution.turn,
                current: self.turn,
            };
        }

        let recorded = self.contributions.get(&kind).map_or(0, |c| c.turn);
        let floor = recorded.max(self.turn);
        if contribution.turn < floor {
            return MergeOutcome::Stale {
                turn: contribution.turn,
                floor,
            };
        }

        self.contributions.insert(kind, contribution);
        MergeOutcome::Accepted
    }

    pub fn record_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// Marks the plan failed with a descriptor. No-op on terminal plans.
    pub fn fail(&mut self, error: PlanError) {
        if self.is_terminal() {
            return;
        }
        self.status = PlanStatus::Failed;
        self.error = Some(error);
    }

    /// Stamps `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    pub fn contribution(&self, kind: SpecialistKind) -> Option<&Contribution> {
        self.contributions.get(&kind)
    }

    /// Required kinds that have no accepted contribution yet.
    pub fn missing_required(&self) -> Vec<SpecialistKind> {
        SpecialistKind::REQUIRED_FOR_FINALIZE
            .into_iter()
            .filter(|kind| !self.contributions.contains_key(kind))
            .collect()
    }

    pub fn flights(&self) -> Option<&FlightPlan> {
        match self.contribution(SpecialistKind::Flight).map(|c| &c.payload) {
            Some(Payload::Flights(plan)) => Some(plan),
            _ => None,
        }
    }

    pub fn hotels(&self) -> Option<&HotelPlan> {
        match self.contribution(SpecialistKind::Hotel).map(|c| &c.payload) {
            Some(Payload::Hotels(plan)) => Some(plan),
            _ => None,
        }
    }

    pub fn budget(&self) -> Option<&BudgetSummary> {
        match self.contribution(SpecialistKind::Budget).map(|c| &c.payload) {
            Some(Payload::Budget(summary)) => Some(summary),
            _ => None,
        }
    }

    pub fn itinerary(&self) -> Option<&Itinerary> {
        match self.contribution(SpecialistKind::Itinerary).map(|c| &c.payload) {
            Some(Payload::Itinerary(itinerary)) => Some(itinerary),
            _ => None,
        }
    }
}
