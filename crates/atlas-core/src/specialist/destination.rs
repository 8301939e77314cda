//! Destination specialist.

use std::sync::Arc;

use super::{Failure, KnowledgeBase, PlanContext};
use crate::models::{Contribution, DestinationNotes, Payload, SpecialistKind};

const KIND: SpecialistKind = SpecialistKind::Destination;

#[derive(Clone)]
pub struct DestinationAgent {
    knowledge: Arc<dyn KnowledgeBase>,
}

impl DestinationAgent {
    pub fn new(knowledge: Arc<dyn KnowledgeBase>) -> Self {
        Self { knowledge }
    }

    pub async fn run(&self, context: &PlanContext) -> Result<Contribution, Failure> {
        let city = context
            .brief()
            .destination
            .ok_or_else(|| Failure::permanent(KIND, "no destination found in the request"))?;

        let facts = self
            .knowledge
            .lookup(&city)
            .await
            .map_err(|e| Failure::from_collaborator(KIND, e))?;

        let Some(summary) = facts.first().cloned() else {
            return Err(Failure::permanent(KIND, format!("nothing known about {city}")));
        };

        Ok(context.contribute(Payload::Destination(DestinationNotes {
            city,
            summary,
            facts,
        })))
    }
}
