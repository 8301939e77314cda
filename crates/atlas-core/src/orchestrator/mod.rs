//! The plan state machine.
//!
//! An [`Orchestrator`] handles one request at a time per call and keeps no
//! state between calls beyond configuration: every operation loads the plan
//! from the [`PlanStore`], dispatches specialists against a read-only
//! snapshot, and writes the merged result back with compare-and-swap on the
//! plan's turn.
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  plan_ops    │──▶│   registry   │──▶│   dispatch   │──▶│    merge     │
//! │ (start, ...) │   │ (waves)      │   │ (join, time) │   │ (accept, CAS)│
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use atlas_core::{params::StartPlan, store::MemoryStore, OrchestratorBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = OrchestratorBuilder::new()
//!     .with_store(Arc::new(MemoryStore::new()))
//!     .build()
//!     .await?;
//!
//! let plan = orchestrator
//!     .start(&StartPlan {
//!         goal: "5-day Paris trip, $3000 budget".to_string(),
//!         user_id: "user-1".to_string(),
//!     })
//!     .await?;
//! assert!(!plan.is_terminal());
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::classifier::Classifier;
use crate::config::OrchestratorConfig;
use crate::specialist::Specialists;
use crate::store::PlanStore;

pub mod builder;
mod dispatch;
mod merge;
mod plan_ops;


pub use builder::OrchestratorBuilder;
use dispatch::Dispatch;

/// Coordinates specialists and persistence for plan requests.
pub struct Orchestrator {
    store: Arc<dyn PlanStore>,
    specialists: Specialists,
    classifier: Arc<dyn Classifier>,
    config: OrchestratorConfig,
    dispatches: AtomicUsize,
}

impl Orchestrator {
    pub(crate) fn new(
        store: Arc<dyn PlanStore>,
        specialists: Specialists,
        classifier: Arc<dyn Classifier>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            store,
            specialists,
            classifier,
            config,
            dispatches: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Number of specialist runs started by this orchestrator, retries
    /// included.
    pub fn dispatch_count(&self) -> usize {
        self.dispatches.load(Ordering::SeqCst)
    }
}
