//! Data models for plans and specialist contributions.
//!
//! Display implementations for these models live in
//! [`crate::display::models`] so that data structures stay separate from
//! presentation.
//!
//! # Examples
//!
//! ```rust
//! use atlas_core::models::{Contribution, MergeOutcome, Payload, Plan, DestinationNotes};
//!
//! let mut plan = Plan::new("user-1", "4 days in Lisbon");
//! let notes = Payload::Destination(DestinationNotes {
//!     city: "Lisbon".to_string(),
//!     summary: "Hilly, sunny, tiled.".to_string(),
//!     facts: vec![],
//! });
//!
//! assert_eq!(plan.accept(Contribution::new(0, notes)), MergeOutcome::Accepted);
//! ```

pub mod contribution;
pub mod kind;
pub mod plan;
pub mod status;


pub use contribution::{
    Activity, ActivityPlan, BudgetSummary, Contribution, DestinationNotes, FlightOption,
    FlightPlan, HotelOption, HotelPlan, Itinerary, ItineraryDay, Payload,
};
pub use kind::SpecialistKind;
pub use plan::{FailureCause, MergeOutcome, Plan, PlanError, PlanId, Turn, Warning};
pub use status::PlanStatus;
