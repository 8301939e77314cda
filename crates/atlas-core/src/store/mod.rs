//! Durable plan persistence behind one async interface.
//!
//! The orchestrator only needs three operations: create a plan once, read a
//! plan, and update it with compare-and-swap on its turn counter. Two
//! implementations ship: [`SqliteStore`] for real use and [`MemoryStore`]
//! for tests and throwaway runs.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Plan, PlanId};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Change applied to the freshly loaded record inside the store's critical
/// section. Returning an error aborts the write.
pub type PlanMutator = Box<dyn FnOnce(&mut Plan) -> Result<()> + Send + 'static>;

/// Keyed persistence for plan records.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Persists a new plan. Fails with `Conflict` if its ID exists.
    async fn create(&self, plan: &Plan) -> Result<()>;

    /// Loads a plan. Fails with `NotFound` if absent.
    async fn get(&self, plan_id: &PlanId) -> Result<Plan>;

    /// Applies `mutator` if the stored turn still equals `expected_turn` and
    /// returns the written plan, with `updated_at` stamped.
    ///
    /// Fails with `ConcurrentModification` if another update moved the turn
    /// on, `NotFound` if the plan is absent, or with the mutator's own error.
    async fn update(
        &self,
        plan_id: &PlanId,
        expected_turn: u64,
        mutator: PlanMutator,
    ) -> Result<Plan>;
}
