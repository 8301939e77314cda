//! Hotel specialist.

use std::sync::Arc;

use super::{collaborators::HotelQuery, Failure, PlanContext, TravelData};
use crate::models::{Contribution, HotelOption, HotelPlan, Payload, SpecialistKind};

const KIND: SpecialistKind = SpecialistKind::Hotel;

/// Rating points per 100 currency units of nightly rate.
fn value_score(hotel: &HotelOption) -> u32 {
    u32::from(hotel.rating) * 100 / hotel.nightly_rate.max(1)
}

/// Chooses the cheapest hotel in the requested style, otherwise the best
/// rating for the money.
#[derive(Clone)]
pub struct HotelAgent {
    travel: Arc<dyn TravelData>,
}

impl HotelAgent {
    pub fn new(travel: Arc<dyn TravelData>) -> Self {
        Self { travel }
    }

    pub async fn run(&self, context: &PlanContext) -> Result<Contribution, Failure> {
        let brief = context.brief();
        let city = brief
            .destination
            .clone()
            .ok_or_else(|| Failure::permanent(KIND, "no destination found in the request"))?;
        let nights = brief.nights();

        let mut options = self
            .travel
            .search_hotels(&HotelQuery { city, nights })
            .await
            .map_err(|e| Failure::from_collaborator(KIND, e))?;

        if options.is_empty() {
            return Err(Failure::permanent(KIND, "no hotels available"));
        }
        options.sort_by_key(|h| h.nightly_rate);

        let preferred = brief
            .hotel_style
            .as_deref()
            .and_then(|style| options.iter().position(|h| h.style == style));
        let selected = preferred.or_else(|| {
            options
                .iter()
                .enumerate()
                .max_by_key(|(i, h)| (value_score(h), std::cmp::Reverse(*i)))
                .map(|(i, _)| i)
        });

        Ok(context.contribute(Payload::Hotels(HotelPlan {
            options,
            selected,
            nights,
        })))
    }
}
