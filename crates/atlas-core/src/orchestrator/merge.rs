//! Folding dispatched results into a plan record.

use jiff::Timestamp;
use log::{debug, warn};

use super::Dispatch;
use crate::error::Result;
use crate::models::{MergeOutcome, Plan, PlanStatus, SpecialistKind, Warning};
use crate::specialist::{BudgetAgent, ItineraryAgent, PlanContext};

impl Dispatch {
    /// Points every result at `turn`.
    ///
    /// Used when a `continue` lost its compare-and-swap race: its input lands
    /// on the next turn of the fresh record, and so do its contributions.
    pub(crate) fn retag(&mut self, turn: u64) {
        for contribution in &mut self.contributions {
            contribution.turn = turn;
        }
    }

    /// Offers every contribution to `plan`, records failures as warnings,
    /// and adds the wall time to the plan's processing total.
    ///
    /// Returns how many contributions were accepted.
    pub(crate) fn apply(&self, plan: &mut Plan) -> usize {
        let mut accepted = 0;
        for contribution in &self.contributions {
            let kind = contribution.kind();
            match plan.accept(contribution.clone()) {
                MergeOutcome::Accepted => accepted += 1,
                MergeOutcome::Stale { turn, floor } => debug!(
                    "Plan {}: dropped {} contribution for turn {turn}, plan is at {floor}",
                    plan.plan_id,
                    kind.as_str()
                ),
                MergeOutcome::Ahead { turn, current } => warn!(
                    "Plan {}: dropped {} contribution for future turn {turn}, plan is at {current}",
                    plan.plan_id,
                    kind.as_str()
                ),
            }
        }

        let recorded_at = Timestamp::now();
        for failure in &self.failures {
            plan.record_warning(Warning {
                turn: plan.turn,
                kind: failure.kind,
                message: failure.message.clone(),
                retryable: failure.retryable,
                recorded_at,
            });
        }

        plan.processing_ms = plan
            .processing_ms
            .saturating_add(self.elapsed.as_millis() as u64);
        accepted
    }

    /// Like [`Dispatch::apply`], but first recomputes budget and itinerary
    /// against `plan` with this request's research folded in.
    ///
    /// Used when `plan` is a fresher record than the snapshot the dispatch
    /// ran against: aggregates from the old snapshot would price selections
    /// another request has since replaced. Both agents are pure, so nothing
    /// is re-dispatched.
    pub(crate) fn apply_reaggregated(&mut self, plan: &mut Plan) -> usize {
        let rerun: Vec<SpecialistKind> = [SpecialistKind::Budget, SpecialistKind::Itinerary]
            .into_iter()
            .filter(|kind| {
                self.contributions.iter().any(|c| c.kind() == *kind) || self.failed(*kind)
            })
            .collect();

        if !rerun.is_empty() {
            self.contributions.retain(|c| !rerun.contains(&c.kind()));
            self.failures.retain(|f| !rerun.contains(&f.kind));

            let mut merged = plan.clone();
            for contribution in &self.contributions {
                merged.accept(contribution.clone());
            }
            // Both see the same record, as they would within one wave
            let context = PlanContext::from_plan(&merged);
            for kind in rerun {
                let result = match kind {
                    SpecialistKind::Budget => BudgetAgent.run(&context),
                    _ => ItineraryAgent.run(&context),
                };
                debug!(
                    "Plan {}: recomputed {} for turn {}",
                    plan.plan_id,
                    kind.as_str(),
                    context.turn
                );
                match result {
                    Ok(contribution) => self.contributions.push(contribution),
                    Err(failure) => self.failures.push(failure),
                }
            }
        }

        self.apply(plan)
    }
}

/// Moves an open plan to `in_progress`, or to `awaiting_user_input` when the
/// budget specialist left a question for the user.
pub(crate) fn settle(plan: &mut Plan, operation: &str) -> Result<()> {
    let clarification = plan.budget().and_then(|b| b.clarification.clone());
    let next = if clarification.is_some() {
        PlanStatus::AwaitingUserInput
    } else {
        PlanStatus::InProgress
    };
    plan.clarification = clarification;
    plan.transition(next, operation)
}
