//! Flight specialist.

use std::sync::Arc;

use super::{collaborators::FlightQuery, Failure, PlanContext, TravelData};
use crate::models::{Contribution, FlightPlan, Payload, SpecialistKind};

const KIND: SpecialistKind = SpecialistKind::Flight;

/// Picks the cheapest fare, or the cheapest nonstop fare when the user asked
/// for direct flights.
#[derive(Clone)]
pub struct FlightAgent {
    travel: Arc<dyn TravelData>,
}

impl FlightAgent {
    pub fn new(travel: Arc<dyn TravelData>) -> Self {
        Self { travel }
    }

    pub async fn run(&self, context: &PlanContext) -> Result<Contribution, Failure> {
        let brief = context.brief();
        let destination = brief
            .destination
            .clone()
            .ok_or_else(|| Failure::permanent(KIND, "no destination found in the request"))?;

        let mut options = self
            .travel
            .search_flights(&FlightQuery {
                origin: brief.origin.clone(),
                destination,
                days: brief.days,
            })
            .await
            .map_err(|e| Failure::from_collaborator(KIND, e))?;

        if options.is_empty() {
            return Err(Failure::permanent(KIND, "no flights available"));
        }
        options.sort_by_key(|f| (f.price, f.stops));

        let selected = brief
            .nonstop
            .then(|| options.iter().position(|f| f.stops == 0))
            .flatten()
            .or(Some(0));

        Ok(context.contribute(Payload::Flights(FlightPlan { options, selected })))
    }
}
