//! The four plan operations and their persistence cycle.

use std::collections::BTreeSet;

use log::{debug, error, info, warn};

use super::{merge::settle, Dispatch, Orchestrator};
use crate::{
    error::{AtlasError, Result},
    models::{FailureCause, Plan, PlanError, PlanId, PlanStatus, SpecialistKind},
    params::{ContinuePlan, PlanRef, StartPlan},
    registry::{self, Phase},
    store::PlanMutator,
};

/// Fails unless `plan` may be finalized right now.
pub(super) fn ensure_finalizable(plan: &Plan) -> Result<()> {
    plan.ensure_open("finalize")?;
    if !matches!(
        plan.status,
        PlanStatus::InProgress | PlanStatus::AwaitingUserInput
    ) {
        return Err(AtlasError::invalid_state(
            &plan.plan_id,
            plan.status,
            "finalize",
            "no specialist has run yet",
        ));
    }

    let missing = plan.missing_required();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(SpecialistKind::as_str).collect();
        return Err(AtlasError::invalid_state(
            &plan.plan_id,
            plan.status,
            "finalize",
            format!("missing required contributions: {}", names.join(", ")),
        ));
    }
    Ok(())
}

impl Orchestrator {
    /// Creates a plan and runs the initial two waves.
    ///
    /// The plan ends up `failed` only when both flight and hotel research
    /// failed; any other specialist failure is recorded as a warning.
    ///
    /// # Errors
    ///
    /// Returns `AtlasError::Validation` if the goal or user ID is empty.
    pub async fn start(&self, params: &StartPlan) -> Result<Plan> {
        params.validate()?;

        let plan = Plan::new(params.user_id.trim(), params.goal.trim());
        let plan_id = plan.plan_id.clone();
        self.store.create(&plan).await?;
        info!("Created plan {plan_id} for user {}", plan.user_id);

        let waves = registry::select(plan.status, plan.turn, &BTreeSet::new());
        let begun = self
            .store
            .update(
                &plan_id,
                plan.turn,
                Box::new(|plan: &mut Plan| plan.transition(PlanStatus::InProgress, "start")),
            )
            .await;
        let plan = self.record_fault(&plan_id, begun, None).await?;

        let dispatch = self.dispatch(&plan, &waves).await;
        let result = self.merge_start(&plan, &dispatch).await;
        let salvage = Salvage {
            dispatch: &dispatch,
            turn: None,
        };
        self.record_fault(&plan_id, result, Some(salvage)).await
    }

    async fn merge_start(&self, plan: &Plan, dispatch: &Dispatch) -> Result<Plan> {
        let fatal =
            dispatch.failed(SpecialistKind::Flight) && dispatch.failed(SpecialistKind::Hotel);

        let plan = self
            .write(&plan.plan_id, plan.turn, "start", || -> PlanMutator {
                let dispatch = dispatch.clone();
                Box::new(move |plan: &mut Plan| {
                    plan.ensure_open("start")?;
                    dispatch.apply(plan);
                    if fatal {
                        plan.fail(PlanError::new(
                            FailureCause::SpecialistsUnavailable,
                            "neither flights nor hotels could be researched",
                        ));
                        Ok(())
                    } else {
                        settle(plan, "start")
                    }
                })
            })
            .await?;

        if fatal {
            error!("Plan {} failed: flight and hotel research both failed", plan.plan_id);
        } else {
            info!(
                "Plan {} started: {} contributions, {} warnings, status {}",
                plan.plan_id,
                plan.contributions.len(),
                plan.warnings.len(),
                plan.status
            );
        }
        Ok(plan)
    }

    /// Adds a user turn and re-runs the specialists it makes stale, plus
    /// budget and itinerary.
    ///
    /// # Errors
    ///
    /// Returns `AtlasError::Validation` for empty input,
    /// `AtlasError::NotFound` for unknown plans, `AtlasError::InvalidState`
    /// for terminal plans (without dispatching anything) and
    /// `AtlasError::ConcurrentModification` if the write kept losing races.
    pub async fn continue_plan(&self, params: &ContinuePlan) -> Result<Plan> {
        params.validate()?;
        let plan_id = PlanId::from(params.plan_id.trim());

        let plan = self.store.get(&plan_id).await?;
        plan.ensure_open("continue")?;

        let input = params.user_input.trim();
        let changed = self.classifier.classify(input);
        debug!(
            "Plan {plan_id}: input affects {:?}",
            changed.iter().map(SpecialistKind::as_str).collect::<Vec<_>>()
        );

        let expected_turn = plan.turn;
        let mut snapshot = plan;
        let snapshot_turn = snapshot.append_turn(input);
        let waves = registry::select(snapshot.status, snapshot.turn, &changed);
        let dispatch = self.dispatch(&snapshot, &waves).await;

        let result = self
            .write(&plan_id, expected_turn, "continue", || -> PlanMutator {
                let mut dispatch = dispatch.clone();
                let input = input.to_string();
                Box::new(move |plan: &mut Plan| {
                    plan.ensure_open("continue")?;
                    land_turn(plan, &mut dispatch, input, snapshot_turn);
                    settle(plan, "continue")
                })
            })
            .await;
        let salvage = Salvage {
            dispatch: &dispatch,
            turn: Some((input, snapshot_turn)),
        };
        let plan = self.record_fault(&plan_id, result, Some(salvage)).await?;

        info!(
            "Plan {} advanced to turn {}: re-ran {} specialists, status {}",
            plan.plan_id,
            plan.turn,
            dispatch.contributions.len() + dispatch.failures.len(),
            plan.status
        );
        Ok(plan)
    }

    /// Returns the current plan without changing it.
    pub async fn status(&self, params: &PlanRef) -> Result<Plan> {
        params.validate()?;
        self.store.get(&PlanId::from(params.plan_id.trim())).await
    }

    /// Runs a last budget and itinerary pass and completes the plan.
    ///
    /// # Errors
    ///
    /// Returns `AtlasError::InvalidState` if the plan is not in progress or
    /// awaiting input, lacks a required contribution, or the budget pass
    /// failed. In the last case the warning is still persisted.
    pub async fn finalize(&self, params: &PlanRef) -> Result<Plan> {
        params.validate()?;
        let plan_id = PlanId::from(params.plan_id.trim());

        let plan = self.store.get(&plan_id).await?;
        ensure_finalizable(&plan)?;

        let waves = registry::select_phase(Phase::Reconcile, &BTreeSet::new());
        let dispatch = self.dispatch(&plan, &waves).await;

        let result = self.merge_finalize(&plan, &dispatch).await;
        let salvage = Salvage {
            dispatch: &dispatch,
            turn: None,
        };
        self.record_fault(&plan_id, result, Some(salvage)).await
    }

    async fn merge_finalize(&self, plan: &Plan, dispatch: &Dispatch) -> Result<Plan> {
        if let Some(failure) = dispatch.failure(SpecialistKind::Budget).cloned() {
            let saved = self
                .write(&plan.plan_id, plan.turn, "finalize", || -> PlanMutator {
                    let dispatch = dispatch.clone();
                    Box::new(move |plan: &mut Plan| {
                        plan.ensure_open("finalize")?;
                        dispatch.apply(plan);
                        Ok(())
                    })
                })
                .await?;
            return Err(AtlasError::invalid_state(
                &saved.plan_id,
                saved.status,
                "finalize",
                format!("budget reconciliation failed: {}", failure.message),
            ));
        }

        let plan = self
            .write(&plan.plan_id, plan.turn, "finalize", || -> PlanMutator {
                let dispatch = dispatch.clone();
                Box::new(move |plan: &mut Plan| {
                    ensure_finalizable(plan)?;
                    dispatch.apply(plan);
                    plan.clarification = None;
                    plan.transition(PlanStatus::Completed, "finalize")
                })
            })
            .await?;

        info!("Plan {} completed at turn {}", plan.plan_id, plan.turn);
        Ok(plan)
    }

    /// Compare-and-swap write with bounded retry.
    ///
    /// `mutator` builds a fresh mutation per attempt; after a lost race the
    /// plan is re-read and only the mutation is re-applied.
    async fn write<F>(
        &self,
        plan_id: &PlanId,
        expected_turn: u64,
        operation: &str,
        mutator: F,
    ) -> Result<Plan>
    where
        F: Fn() -> PlanMutator,
    {
        let attempts = self.config.write_attempts.max(1);
        let mut expected_turn = expected_turn;
        let mut attempt = 1;

        loop {
            match self.store.update(plan_id, expected_turn, mutator()).await {
                Err(AtlasError::ConcurrentModification { actual_turn, .. })
                    if attempt < attempts =>
                {
                    debug!(
                        "{operation} on plan {plan_id}: turn moved from {expected_turn} to \
                         {actual_turn}, retrying write ({attempt}/{attempts})"
                    );
                    expected_turn = self.store.get(plan_id).await?.turn;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Marks the plan failed when `result` carries an internal fault, so no
    /// plan is left half-written in `in_progress`. Client and transient
    /// errors pass through untouched.
    ///
    /// With `salvage`, the failed record keeps what the request computed:
    /// its turn, contributions and warnings. If that write fails too, the
    /// plan is failed without them.
    async fn record_fault(
        &self,
        plan_id: &PlanId,
        result: Result<Plan>,
        salvage: Option<Salvage<'_>>,
    ) -> Result<Plan> {
        let Err(err) = &result else {
            return result;
        };
        if err.is_client_error() || err.is_transient() {
            return result;
        }

        error!("Plan {plan_id}: internal fault: {err}");
        let message = err.to_string();

        if let Some(salvage) = salvage {
            let mut dispatch = salvage.dispatch.clone();
            let turn = salvage
                .turn
                .map(|(input, snapshot_turn)| (input.to_string(), snapshot_turn));
            let message = message.clone();
            let kept = self
                .fail_plan(
                    plan_id,
                    Box::new(move |plan: &mut Plan| {
                        plan.ensure_open("record fault")?;
                        match turn {
                            Some((input, snapshot_turn)) => {
                                land_turn(plan, &mut dispatch, input, snapshot_turn);
                            }
                            None => {
                                dispatch.apply(plan);
                            }
                        }
                        plan.fail(PlanError::new(FailureCause::Internal, message));
                        Ok(())
                    }),
                )
                .await;
            match kept {
                Ok(plan) => {
                    debug!(
                        "Plan {plan_id}: kept {} contributions on the failed record",
                        plan.contributions.len()
                    );
                    return result;
                }
                Err(e) => warn!("Plan {plan_id}: could not keep request results: {e}"),
            }
        }

        let bare = self
            .fail_plan(
                plan_id,
                Box::new(move |plan: &mut Plan| {
                    plan.fail(PlanError::new(FailureCause::Internal, message));
                    Ok(())
                }),
            )
            .await;
        if let Err(e) = bare {
            error!("Plan {plan_id}: could not record failure: {e}");
        }
        result
    }

    async fn fail_plan(&self, plan_id: &PlanId, mutator: PlanMutator) -> Result<Plan> {
        let current = self.store.get(plan_id).await?;
        self.store.update(plan_id, current.turn, mutator).await
    }
}

/// What a request computed before it faulted.
struct Salvage<'a> {
    dispatch: &'a Dispatch,
    /// `continue` input and the turn it was dispatched for
    turn: Option<(&'a str, u64)>,
}

/// Appends a `continue` input to `plan` and merges the request's results
/// under the new turn.
///
/// When the record moved on since the snapshot, budget and itinerary are
/// recomputed against it instead of reusing the snapshot's.
fn land_turn(plan: &mut Plan, dispatch: &mut Dispatch, input: String, snapshot_turn: u64) {
    let turn = plan.append_turn(input);
    dispatch.retag(turn);
    if turn == snapshot_turn {
        dispatch.apply(plan);
    } else {
        dispatch.apply_reaggregated(plan);
    }
}
