#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use atlas_core::{
    models::{Activity, FlightOption, HotelOption, Plan, PlanId, PlanStatus, SpecialistKind},
    specialist::{
        ActivityQuery, CollaboratorError, FlightQuery, HotelQuery, SampleCatalog, TravelData,
    },
    store::{MemoryStore, PlanMutator, PlanStore},
    AtlasError, Orchestrator, OrchestratorBuilder, OrchestratorConfig, Result,
};
use tempfile::TempDir;

#[derive(Default)]
struct Script {
    error: Option<CollaboratorError>,
    /// `None` fails every call, `Some(n)` only the next n
    remaining_failures: Option<usize>,
    delay: Duration,
    calls: usize,
}

/// Travel data backed by the sample catalog with per-kind failure and
/// latency injection.
#[derive(Default)]
pub struct ScriptedTravelData {
    catalog: SampleCatalog,
    scripts: Mutex<HashMap<SpecialistKind, Script>>,
}

impl ScriptedTravelData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call for `kind` fails with `error`.
    pub fn failing(self, kind: SpecialistKind, error: CollaboratorError) -> Self {
        self.script(kind, |s| {
            s.error = Some(error);
            s.remaining_failures = None;
        })
    }

    /// The next `times` calls for `kind` fail with `error`.
    pub fn failing_times(self, kind: SpecialistKind, times: usize, error: CollaboratorError) -> Self {
        self.script(kind, |s| {
            s.error = Some(error);
            s.remaining_failures = Some(times);
        })
    }

    /// Every call for `kind` sleeps first.
    pub fn with_delay(self, kind: SpecialistKind, delay: Duration) -> Self {
        self.script(kind, |s| s.delay = delay)
    }

    pub fn calls(&self, kind: SpecialistKind) -> usize {
        self.scripts
            .lock()
            .unwrap()
            .get(&kind)
            .map_or(0, |s| s.calls)
    }

    fn script(self, kind: SpecialistKind, edit: impl FnOnce(&mut Script)) -> Self {
        edit(self.scripts.lock().unwrap().entry(kind).or_default());
        self
    }

    async fn gate(&self, kind: SpecialistKind) -> std::result::Result<(), CollaboratorError> {
        let (delay, failure) = {
            let mut scripts = self.scripts.lock().unwrap();
            let script = scripts.entry(kind).or_default();
            script.calls += 1;
            let failure = match (&script.error, script.remaining_failures) {
                (Some(error), None) => Some(error.clone()),
                (Some(error), Some(n)) if n > 0 => {
                    script.remaining_failures = Some(n - 1);
                    Some(error.clone())
                }
                _ => None,
            };
            (script.delay, failure)
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TravelData for ScriptedTravelData {
    async fn search_flights(
        &self,
        query: &FlightQuery,
    ) -> std::result::Result<Vec<FlightOption>, CollaboratorError> {
        self.gate(SpecialistKind::Flight).await?;
        self.catalog.search_flights(query).await
    }

    async fn search_hotels(
        &self,
        query: &HotelQuery,
    ) -> std::result::Result<Vec<HotelOption>, CollaboratorError> {
        self.gate(SpecialistKind::Hotel).await?;
        self.catalog.search_hotels(query).await
    }

    async fn search_activities(
        &self,
        query: &ActivityQuery,
    ) -> std::result::Result<Vec<Activity>, CollaboratorError> {
        self.gate(SpecialistKind::Activities).await?;
        self.catalog.search_activities(query).await
    }
}

/// Memory store that fails chosen updates (1-based) with an internal error
/// and records the status change of every update that went through.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_on: Vec<usize>,
    updates: AtomicUsize,
    created: Mutex<Vec<PlanId>>,
    transitions: Mutex<Vec<(PlanStatus, PlanStatus)>>,
}

impl FlakyStore {
    /// A store where every update succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_update(fail_on: usize) -> Self {
        Self::failing_updates(&[fail_on])
    }

    pub fn failing_updates(fail_on: &[usize]) -> Self {
        Self {
            fail_on: fail_on.to_vec(),
            ..Self::default()
        }
    }

    /// IDs of every plan created so far, oldest first.
    pub fn created(&self) -> Vec<PlanId> {
        self.created.lock().unwrap().clone()
    }

    /// `(before, after)` status of each successful update, in order.
    pub fn transitions(&self) -> Vec<(PlanStatus, PlanStatus)> {
        self.transitions.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlanStore for FlakyStore {
    async fn create(&self, plan: &Plan) -> Result<()> {
        self.inner.create(plan).await?;
        self.created.lock().unwrap().push(plan.plan_id.clone());
        Ok(())
    }

    async fn get(&self, plan_id: &PlanId) -> Result<Plan> {
        self.inner.get(plan_id).await
    }

    async fn update(
        &self,
        plan_id: &PlanId,
        expected_turn: u64,
        mutator: PlanMutator,
    ) -> Result<Plan> {
        let n = self.updates.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on.contains(&n) {
            return Err(AtlasError::internal("disk full"));
        }
        let before = self.inner.get(plan_id).await?.status;
        let plan = self.inner.update(plan_id, expected_turn, mutator).await?;
        self.transitions.lock().unwrap().push((before, plan.status));
        Ok(plan)
    }
}

/// Orchestrator over an in-memory store and the given travel data.
pub async fn memory_orchestrator(
    travel: Arc<ScriptedTravelData>,
    config: OrchestratorConfig,
) -> (Arc<MemoryStore>, Orchestrator) {
    let store = Arc::new(MemoryStore::new());
    let orchestrator = OrchestratorBuilder::new()
        .with_store(store.clone())
        .with_travel_data(travel)
        .with_config(config)
        .build()
        .await
        .expect("Failed to create orchestrator");
    (store, orchestrator)
}

/// Orchestrator over a SQLite file in a temporary directory.
pub async fn sqlite_orchestrator(
    travel: Arc<ScriptedTravelData>,
    config: OrchestratorConfig,
) -> (TempDir, Orchestrator) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let orchestrator = OrchestratorBuilder::new()
        .with_database_path(Some(&db_path))
        .with_travel_data(travel)
        .with_config(config)
        .build()
        .await
        .expect("Failed to create orchestrator");
    (temp_dir, orchestrator)
}
