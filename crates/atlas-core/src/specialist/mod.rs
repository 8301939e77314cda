//! Specialist agents and the contract they satisfy.
//!
//! A specialist receives a [`PlanContext`], a read-only snapshot of the plan,
//! and returns either a [`Contribution`] tagged with the context's turn or a
//! [`Failure`]. Specialists never touch the store; the orchestrator merges
//! what they return.
//!
//! [`SpecialistAgent`] is a closed union of the six variants. The reasoning
//! inside each variant is a reference heuristic over the collaborator traits
//! in [`collaborators`]; swapping in real travel and knowledge services does
//! not change the orchestration contract.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::models::{
    ActivityPlan, BudgetSummary, Contribution, DestinationNotes, FlightPlan, HotelPlan, Payload,
    Plan, PlanId, SpecialistKind,
};

pub mod activities;
pub mod brief;
pub mod budget;
pub mod catalog;
pub mod collaborators;
pub mod destination;
pub mod flight;
pub mod hotel;
pub mod itinerary;


pub use activities::ActivitiesAgent;
pub use brief::TripBrief;
pub use budget::BudgetAgent;
pub use catalog::SampleCatalog;
pub use collaborators::{
    ActivityQuery, CollaboratorError, FlightQuery, HotelQuery, KnowledgeBase, TravelData,
};
pub use destination::DestinationAgent;
pub use flight::FlightAgent;
pub use hotel::HotelAgent;
pub use itinerary::ItineraryAgent;

/// A specialist could not produce its contribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: SpecialistKind,
    pub message: String,
    /// Whether running the specialist again may succeed
    pub retryable: bool,
}

impl Failure {
    pub fn permanent(kind: SpecialistKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn retryable(kind: SpecialistKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: true,
        }
    }

    /// Wraps a collaborator error, keeping its retry classification.
    pub fn from_collaborator(kind: SpecialistKind, error: CollaboratorError) -> Self {
        Self {
            kind,
            message: error.message,
            retryable: error.retryable,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} specialist failed{}: {}",
            self.kind.as_str(),
            if self.retryable { " (retryable)" } else { "" },
            self.message
        )
    }
}

/// Read-only projection of a plan handed to specialists.
#[derive(Debug, Clone)]
pub struct PlanContext {
    pub plan_id: PlanId,
    pub goal: String,
    /// Turn the resulting contributions are tagged with
    pub turn: u64,
    pub turns: Vec<String>,
    pub contributions: BTreeMap<SpecialistKind, Contribution>,
}

impl PlanContext {
    pub fn from_plan(plan: &Plan) -> Self {
        Self {
            plan_id: plan.plan_id.clone(),
            goal: plan.goal.clone(),
            turn: plan.turn,
            turns: plan.turns.iter().map(|t| t.input.clone()).collect(),
            contributions: plan.contributions.clone(),
        }
    }

    /// Parses the goal and turns into trip parameters.
    pub fn brief(&self) -> TripBrief {
        TripBrief::parse(&self.goal, self.turns.iter().map(String::as_str))
    }

    fn payload(&self, kind: SpecialistKind) -> Option<&Payload> {
        self.contributions.get(&kind).map(|c| &c.payload)
    }

    pub fn flights(&self) -> Option<&FlightPlan> {
        match self.payload(SpecialistKind::Flight) {
            Some(Payload::Flights(plan)) => Some(plan),
            _ => None,
        }
    }

    pub fn hotels(&self) -> Option<&HotelPlan> {
        match self.payload(SpecialistKind::Hotel) {
            Some(Payload::Hotels(plan)) => Some(plan),
            _ => None,
        }
    }

    pub fn activities(&self) -> Option<&ActivityPlan> {
        match self.payload(SpecialistKind::Activities) {
            Some(Payload::Activities(plan)) => Some(plan),
            _ => None,
        }
    }

    pub fn destination(&self) -> Option<&DestinationNotes> {
        match self.payload(SpecialistKind::Destination) {
            Some(Payload::Destination(notes)) => Some(notes),
            _ => None,
        }
    }

    pub fn budget(&self) -> Option<&BudgetSummary> {
        match self.payload(SpecialistKind::Budget) {
            Some(Payload::Budget(summary)) => Some(summary),
            _ => None,
        }
    }

    fn contribute(&self, payload: Payload) -> Contribution {
        Contribution::new(self.turn, payload)
    }
}

/// One of the six specialist capabilities.
#[derive(Clone)]
pub enum SpecialistAgent {
    Flight(FlightAgent),
    Hotel(HotelAgent),
    Activities(ActivitiesAgent),
    Destination(DestinationAgent),
    Budget(BudgetAgent),
    Itinerary(ItineraryAgent),
}

impl SpecialistAgent {
    pub fn kind(&self) -> SpecialistKind {
        match self {
            SpecialistAgent::Flight(_) => SpecialistKind::Flight,
            SpecialistAgent::Hotel(_) => SpecialistKind::Hotel,
            SpecialistAgent::Activities(_) => SpecialistKind::Activities,
            SpecialistAgent::Destination(_) => SpecialistKind::Destination,
            SpecialistAgent::Budget(_) => SpecialistKind::Budget,
            SpecialistAgent::Itinerary(_) => SpecialistKind::Itinerary,
        }
    }

    pub async fn run(&self, context: &PlanContext) -> Result<Contribution, Failure> {
        match self {
            SpecialistAgent::Flight(agent) => agent.run(context).await,
            SpecialistAgent::Hotel(agent) => agent.run(context).await,
            SpecialistAgent::Activities(agent) => agent.run(context).await,
            SpecialistAgent::Destination(agent) => agent.run(context).await,
            SpecialistAgent::Budget(agent) => agent.run(context),
            SpecialistAgent::Itinerary(agent) => agent.run(context),
        }
    }
}

/// The full set of agents an orchestrator dispatches to.
#[derive(Clone)]
pub struct Specialists {
    agents: Vec<SpecialistAgent>,
}

impl Specialists {
    /// Wires the reference agents to their collaborators.
    pub fn new(travel: Arc<dyn TravelData>, knowledge: Arc<dyn KnowledgeBase>) -> Self {
        Self {
            agents: vec![
                SpecialistAgent::Flight(FlightAgent::new(travel.clone())),
                SpecialistAgent::Hotel(HotelAgent::new(travel.clone())),
                SpecialistAgent::Activities(ActivitiesAgent::new(travel)),
                SpecialistAgent::Destination(DestinationAgent::new(knowledge)),
                SpecialistAgent::Budget(BudgetAgent),
                SpecialistAgent::Itinerary(ItineraryAgent),
            ],
        }
    }

    pub fn get(&self, kind: SpecialistKind) -> Option<&SpecialistAgent> {
        self.agents.iter().find(|agent| agent.kind() == kind)
    }
}

impl Default for Specialists {
    fn default() -> Self {
        let catalog = Arc::new(SampleCatalog::new());
        Self::new(catalog.clone(), catalog)
    }
}
