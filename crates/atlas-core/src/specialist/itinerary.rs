//! Itinerary specialist.

use super::{Failure, PlanContext};
use crate::models::{Activity, Contribution, Itinerary, ItineraryDay, Payload, SpecialistKind};

const KIND: SpecialistKind = SpecialistKind::Itinerary;

/// Lays out one entry per trip day: arrival, activities spread across the
/// middle, departure on the last day.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItineraryAgent;

impl ItineraryAgent {
    pub fn run(&self, context: &PlanContext) -> Result<Contribution, Failure> {
        // Skip what the last budget pass cut to stay within the limit.
        let dropped: &[String] = context
            .budget()
            .map(|b| b.dropped_activities.as_slice())
            .unwrap_or(&[]);
        let activities: Vec<&Activity> = context
            .activities()
            .map(|a| a.activities.iter().filter(|a| !dropped.contains(&a.name)).collect())
            .unwrap_or_default();
        let notes = context.destination();

        if activities.is_empty() && notes.is_none() {
            return Err(Failure::permanent(
                KIND,
                "neither activities nor destination notes to build days from",
            ));
        }

        let brief = context.brief();
        let city = brief
            .destination
            .clone()
            .or_else(|| notes.map(|n| n.city.clone()))
            .unwrap_or_else(|| "your destination".to_string());
        let day_count = brief.days.max(1);

        let mut days: Vec<ItineraryDay> = (1..=day_count)
            .map(|day| ItineraryDay {
                day,
                title: format!("Day {day} in {city}"),
                items: Vec::new(),
            })
            .collect();

        days[0].title = format!("Arrive in {city}");
        let mut arrival = Vec::new();
        if let Some(flight) = context.flights().and_then(|f| f.selected()) {
            arrival.push(format!("Fly with {} to {}", flight.carrier, flight.destination));
        }
        if let Some(hotel) = context.hotels().and_then(|h| h.selected()) {
            arrival.push(format!("Check in at {}", hotel.name));
        }
        if let Some(notes) = notes {
            arrival.push(format!("Tip: {}", notes.summary));
        }
        days[0].items = arrival;

        // Activities fill the middle days first, then wrap around so short
        // trips still see everything that was researched.
        let middle: Vec<usize> = if day_count > 2 {
            (1..day_count as usize - 1).collect()
        } else {
            (0..day_count as usize).collect()
        };
        for (i, activity) in activities.iter().enumerate() {
            let day = middle[i % middle.len()];
            days[day].items.push(format!(
                "{} ({}h, ${})",
                activity.name, activity.duration_hours, activity.cost
            ));
        }

        if day_count > 1 {
            let last = days.len() - 1;
            days[last].title = format!("Depart {city}");
            days[last].items.push("Check out and head to the airport".to_string());
        }

        Ok(context.contribute(Payload::Itinerary(Itinerary { days })))
    }
}
