//! Specialist kinds and the dispatch waves they belong to.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The six facets a specialist can contribute to a plan.
///
/// The serialized names double as the keys of `Plan::contributions`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub enum SpecialistKind {
    #[serde(rename = "flights")]
    Flight,
    #[serde(rename = "hotels")]
    Hotel,
    #[serde(rename = "activities")]
    Activities,
    #[serde(rename = "destination")]
    Destination,
    #[serde(rename = "budget")]
    Budget,
    #[serde(rename = "itinerary")]
    Itinerary,
}

impl SpecialistKind {
    /// All kinds in dispatch order.
    pub const ALL: [SpecialistKind; 6] = [
        SpecialistKind::Flight,
        SpecialistKind::Hotel,
        SpecialistKind::Activities,
        SpecialistKind::Destination,
        SpecialistKind::Budget,
        SpecialistKind::Itinerary,
    ];

    /// Research kinds that only depend on the goal and turns.
    pub const RESEARCH: [SpecialistKind; 4] = [
        SpecialistKind::Flight,
        SpecialistKind::Hotel,
        SpecialistKind::Activities,
        SpecialistKind::Destination,
    ];

    /// Aggregating kinds that consume the research kinds' output.
    pub const AGGREGATE: [SpecialistKind; 2] = [SpecialistKind::Budget, SpecialistKind::Itinerary];

    /// Contributions a plan must carry before it can be finalized.
    pub const REQUIRED_FOR_FINALIZE: [SpecialistKind; 4] = [
        SpecialistKind::Flight,
        SpecialistKind::Hotel,
        SpecialistKind::Budget,
        SpecialistKind::Itinerary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialistKind::Flight => "flights",
            SpecialistKind::Hotel => "hotels",
            SpecialistKind::Activities => "activities",
            SpecialistKind::Destination => "destination",
            SpecialistKind::Budget => "budget",
            SpecialistKind::Itinerary => "itinerary",
        }
    }

    /// Whether this kind runs in the first (research) wave.
    pub fn is_research(&self) -> bool {
        Self::RESEARCH.contains(self)
    }
}

impl FromStr for SpecialistKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flight" | "flights" => Ok(SpecialistKind::Flight),
            "hotel" | "hotels" => Ok(SpecialistKind::Hotel),
            "activity" | "activities" => Ok(SpecialistKind::Activities),
            "destination" => Ok(SpecialistKind::Destination),
            "budget" => Ok(SpecialistKind::Budget),
            "itinerary" => Ok(SpecialistKind::Itinerary),
            _ => Err(format!("Invalid specialist kind: {s}")),
        }
    }
}
