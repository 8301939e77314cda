//! Activities specialist.

use std::sync::Arc;

use super::{collaborators::ActivityQuery, Failure, PlanContext, TravelData};
use crate::models::{ActivityPlan, Contribution, Payload, SpecialistKind};

const KIND: SpecialistKind = SpecialistKind::Activities;

const PER_DAY: usize = 2;

/// Keeps up to two activities per day, matching stated interests first and
/// cheaper ones next.
#[derive(Clone)]
pub struct ActivitiesAgent {
    travel: Arc<dyn TravelData>,
}

impl ActivitiesAgent {
    pub fn new(travel: Arc<dyn TravelData>) -> Self {
        Self { travel }
    }

    pub async fn run(&self, context: &PlanContext) -> Result<Contribution, Failure> {
        let brief = context.brief();
        let city = brief
            .destination
            .clone()
            .ok_or_else(|| Failure::permanent(KIND, "no destination found in the request"))?;

        let mut activities = self
            .travel
            .search_activities(&ActivityQuery {
                city,
                days: brief.days,
                interests: brief.interests.clone(),
            })
            .await
            .map_err(|e| Failure::from_collaborator(KIND, e))?;

        if activities.is_empty() {
            return Err(Failure::permanent(KIND, "no activities found"));
        }

        activities.sort_by_key(|a| (!brief.interests.contains(&a.category), a.cost));
        activities.truncate(brief.days as usize * PER_DAY);

        Ok(context.contribute(Payload::Activities(ActivityPlan { activities })))
    }
}
