//! Typed specialist outputs.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::SpecialistKind;

/// A specialist's output, tagged with the turn it was computed for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contribution {
    /// Turn the output was produced for
    pub turn: u64,

    /// When the specialist returned it (UTC)
    pub produced_at: Timestamp,

    /// The typed payload
    pub payload: Payload,
}

impl Contribution {
    pub fn new(turn: u64, payload: Payload) -> Self {
        Self {
            turn,
            produced_at: Timestamp::now(),
            payload,
        }
    }

    pub fn kind(&self) -> SpecialistKind {
        self.payload.kind()
    }
}

/// One variant per specialist kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    Flights(FlightPlan),
    Hotels(HotelPlan),
    Activities(ActivityPlan),
    Destination(DestinationNotes),
    Budget(BudgetSummary),
    Itinerary(Itinerary),
}

impl Payload {
    pub fn kind(&self) -> SpecialistKind {
        match self {
            Payload::Flights(_) => SpecialistKind::Flight,
            Payload::Hotels(_) => SpecialistKind::Hotel,
            Payload::Activities(_) => SpecialistKind::Activities,
            Payload::Destination(_) => SpecialistKind::Destination,
            Payload::Budget(_) => SpecialistKind::Budget,
            Payload::Itinerary(_) => SpecialistKind::Itinerary,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightOption {
    pub carrier: String,
    pub origin: String,
    pub destination: String,
    /// Round-trip fare per traveller
    pub price: u32,
    pub stops: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightPlan {
    pub options: Vec<FlightOption>,
    /// Index into `options`
    pub selected: Option<usize>,
}

impl FlightPlan {
    pub fn selected(&self) -> Option<&FlightOption> {
        self.selected.and_then(|i| self.options.get(i))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HotelOption {
    pub name: String,
    /// Free-form style tag such as "boutique", "chain", "hostel"
    pub style: String,
    pub nightly_rate: u32,
    /// Guest rating out of 50 (4.3 stars is 43)
    pub rating: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HotelPlan {
    pub options: Vec<HotelOption>,
    pub selected: Option<usize>,
    pub nights: u32,
}

impl HotelPlan {
    pub fn selected(&self) -> Option<&HotelOption> {
        self.selected.and_then(|i| self.options.get(i))
    }

    /// Total lodging cost for the selected option.
    pub fn stay_cost(&self) -> Option<u32> {
        self.selected()
            .map(|h| h.nightly_rate.saturating_mul(self.nights))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Activity {
    pub name: String,
    pub category: String,
    pub cost: u32,
    pub duration_hours: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityPlan {
    pub activities: Vec<Activity>,
}

impl ActivityPlan {
    pub fn total_cost(&self) -> u32 {
        self.activities.iter().map(|a| a.cost).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DestinationNotes {
    pub city: String,
    pub summary: String,
    pub facts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BudgetSummary {
    /// Stated limit, if the user gave one
    pub limit: Option<u32>,
    pub flight_cost: u32,
    pub lodging_cost: u32,
    pub activity_cost: u32,
    pub total_cost: u32,
    /// `limit - total_cost` when a limit exists
    pub remaining: Option<u32>,
    /// Activities dropped to fit under the limit
    #[serde(default)]
    pub dropped_activities: Vec<String>,
    /// Question for the user when the budget cannot be resolved alone
    pub clarification: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Itinerary {
    pub days: Vec<ItineraryDay>,
}
