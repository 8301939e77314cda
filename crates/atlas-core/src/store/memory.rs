//! In-process plan store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{PlanMutator, PlanStore};
use crate::error::{AtlasError, Result};
use crate::models::{Plan, PlanId};

/// Plans held in a map behind an async lock. Contents vanish with the
/// process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    plans: RwLock<HashMap<PlanId, Plan>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanStore for MemoryStore {
    async fn create(&self, plan: &Plan) -> Result<()> {
        let mut plans = self.plans.write().await;
        if plans.contains_key(&plan.plan_id) {
            return Err(AtlasError::Conflict {
                plan_id: plan.plan_id.clone(),
            });
        }
        plans.insert(plan.plan_id.clone(), plan.clone());
        Ok(())
    }

    async fn get(&self, plan_id: &PlanId) -> Result<Plan> {
        self.plans
            .read()
            .await
            .get(plan_id)
            .cloned()
            .ok_or_else(|| AtlasError::NotFound {
                plan_id: plan_id.clone(),
            })
    }

    async fn update(
        &self,
        plan_id: &PlanId,
        expected_turn: u64,
        mutator: PlanMutator,
    ) -> Result<Plan> {
        let mut plans = self.plans.write().await;
        let stored = plans.get_mut(plan_id).ok_or_else(|| AtlasError::NotFound {
            plan_id: plan_id.clone(),
        })?;

        if stored.turn != expected_turn {
            return Err(AtlasError::ConcurrentModification {
                plan_id: plan_id.clone(),
                expected_turn,
                actual_turn: stored.turn,
            });
        }

        // Mutate a copy so a failing mutator leaves the record untouched
        let mut next = stored.clone();
        mutator(&mut next)?;
        next.touch();
        *stored = next.clone();
        Ok(next)
    }
}
