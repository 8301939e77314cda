//! Parallel specialist execution, one wave at a time.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use log::{debug, info, warn};

use super::Orchestrator;
use crate::models::{Contribution, Plan, SpecialistKind};
use crate::registry::Wave;
use crate::specialist::{Failure, PlanContext};

/// Everything one request's specialist runs produced, ready to merge.
#[derive(Debug, Clone, Default)]
pub(crate) struct Dispatch {
    pub contributions: Vec<Contribution>,
    pub failures: Vec<Failure>,
    /// Wall time across all waves
    pub elapsed: Duration,
}

impl Dispatch {
    /// The failure recorded for `kind`, if it failed.
    pub fn failure(&self, kind: SpecialistKind) -> Option<&Failure> {
        self.failures.iter().find(|f| f.kind == kind)
    }

    pub fn failed(&self, kind: SpecialistKind) -> bool {
        self.failure(kind).is_some()
    }
}

impl Orchestrator {
    /// Runs `waves` in order against a snapshot of `plan`.
    ///
    /// Contributions of one wave are visible to the next through the
    /// context. Specialists never see the store.
    pub(crate) async fn dispatch(&self, plan: &Plan, waves: &[Wave]) -> Dispatch {
        let mut context = PlanContext::from_plan(plan);
        let mut dispatch = Dispatch::default();
        let mut previous_successes: Option<usize> = None;

        for wave in waves.iter().filter(|wave| !wave.is_empty()) {
            if let Some(successes) = previous_successes {
                if !wave.should_run(successes) {
                    warn!(
                        "Plan {}: skipping wave {} because the previous wave produced nothing",
                        plan.plan_id, wave.number
                    );
                    continue;
                }
            }

            info!(
                "Plan {} turn {}: dispatching wave {} ({})",
                plan.plan_id,
                context.turn,
                wave.number,
                wave.kinds
                    .iter()
                    .map(SpecialistKind::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            let started = Instant::now();
            let shared = Arc::new(context.clone());
            let results = join_all(
                wave.kinds
                    .iter()
                    .map(|kind| self.run_specialist(*kind, Arc::clone(&shared))),
            )
            .await;
            dispatch.elapsed += started.elapsed();

            let mut successes = 0;
            for result in results {
                match result {
                    Ok(contribution) => {
                        successes += 1;
                        context
                            .contributions
                            .insert(contribution.kind(), contribution.clone());
                        dispatch.contributions.push(contribution);
                    }
                    Err(failure) => {
                        warn!("Plan {}: {failure}", plan.plan_id);
                        dispatch.failures.push(failure);
                    }
                }
            }
            previous_successes = Some(successes);
        }

        dispatch
    }

    /// Runs one specialist, retrying retryable failures up to the configured
    /// number of attempts.
    ///
    /// Each attempt runs on its own task under the kind's timeout, so a
    /// panicking or hung specialist becomes a `Failure` instead of taking the
    /// request down.
    async fn run_specialist(
        &self,
        kind: SpecialistKind,
        context: Arc<PlanContext>,
    ) -> Result<Contribution, Failure> {
        let Some(agent) = self.specialists.get(kind).cloned() else {
            return Err(Failure::permanent(kind, "no specialist registered"));
        };
        let timeout = self.config.timeout_for(kind);
        let attempts = self.config.specialist_attempts.max(1);

        let mut attempt = 1;
        loop {
            self.dispatches.fetch_add(1, Ordering::SeqCst);

            let agent = agent.clone();
            let context = Arc::clone(&context);
            let handle = tokio::spawn(async move {
                tokio::time::timeout(timeout, agent.run(&context)).await
            });

            let result = match handle.await {
                Ok(Ok(result)) => result,
                Ok(Err(_elapsed)) => Err(Failure::retryable(
                    kind,
                    format!("timed out after {}ms", timeout.as_millis()),
                )),
                Err(e) => Err(Failure::permanent(kind, format!("specialist task failed: {e}"))),
            };

            match result {
                Err(failure) if failure.retryable && attempt < attempts => {
                    debug!(
                        "{} attempt {attempt}/{attempts} failed, retrying: {}",
                        kind.as_str(),
                        failure.message
                    );
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
