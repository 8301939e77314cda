//! Core library for the Atlas trip-planning orchestrator.
//!
//! A user states a goal, six specialists research flights, hotels,
//! activities, destination facts, budget and an itinerary, and the
//! [`Orchestrator`] merges their contributions into one plan that survives
//! across independent `start`, `continue`, `status` and `finalize` requests.
//!
//! - [`models`]: the plan record, contributions and status machine
//! - [`specialist`]: the specialist contract and reference agents
//! - [`registry`] / [`classifier`]: which specialists run, and when
//! - [`store`]: compare-and-swap persistence (SQLite or in memory)
//! - [`orchestrator`]: dispatch, merge and the four operations
//! - [`display`]: markdown rendering for terminals and MCP clients
//!
//! # Quick Start
//!
//! ```rust
//! use atlas_core::{
//!     params::{ContinuePlan, PlanRef, StartPlan},
//!     OrchestratorBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = OrchestratorBuilder::new()
//!     .with_database_path(Some("atlas.db"))
//!     .build()
//!     .await?;
//!
//! let plan = orchestrator
//!     .start(&StartPlan {
//!         goal: "5-day Paris trip, $3000 budget".to_string(),
//!         user_id: "user-1".to_string(),
//!     })
//!     .await?;
//!
//! orchestrator
//!     .continue_plan(&ContinuePlan {
//!         plan_id: plan.plan_id.to_string(),
//!         user_input: "prefer boutique hotels".to_string(),
//!     })
//!     .await?;
//!
//! let done = orchestrator
//!     .finalize(&PlanRef {
//!         plan_id: plan.plan_id.to_string(),
//!     })
//!     .await?;
//! println!("{done}");
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod params;
pub mod registry;
pub mod specialist;
pub mod store;

// Re-export commonly used types
pub use classifier::{Classifier, KeywordClassifier};
pub use config::OrchestratorConfig;
pub use display::{FinalizeResult, LocalDateTime, OperationStatus, StartResult, TurnResult};
pub use error::{AtlasError, Result};
pub use models::{Contribution, Plan, PlanId, PlanStatus, SpecialistKind};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use params::{
    ContinuePlan, ContinueResponse, FinalizeResponse, PlanRef, StartPlan, StartResponse,
    StatusResponse,
};
pub use store::{MemoryStore, PlanStore, SqliteStore};
