//! Which specialists run next, and in what order.
//!
//! Selection is a pure function of the plan's phase and the aspects the
//! latest input changed. Research kinds always precede the aggregating kinds
//! so budget and itinerary see the same wave's flights, hotels and
//! activities.

use std::collections::BTreeSet;

use crate::models::{PlanStatus, SpecialistKind};

/// When a wave is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Always,
    /// Only if the previous wave produced at least one contribution
    AfterAnySuccess,
}

/// A batch of specialists dispatched in parallel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wave {
    /// 1-based position in the dispatch order
    pub number: u8,
    pub kinds: Vec<SpecialistKind>,
    pub gate: Gate,
}

impl Wave {
    fn new(number: u8, kinds: impl IntoIterator<Item = SpecialistKind>, gate: Gate) -> Self {
        Self {
            number,
            kinds: kinds.into_iter().collect(),
            gate,
        }
    }

    /// Whether this wave runs given how many contributions the previous wave
    /// produced.
    pub fn should_run(&self, previous_successes: usize) -> bool {
        match self.gate {
            Gate::Always => true,
            Gate::AfterAnySuccess => previous_successes > 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Phase of a plan as far as dispatch is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// First dispatch after creation
    Start,
    /// A new turn arrived
    Continue,
    /// Final pass before completion
    Reconcile,
    /// Terminal plans get nothing
    Closed,
}

impl Phase {
    /// Derives the dispatch phase from a plan's status and turn.
    pub fn of(status: PlanStatus, turn: u64) -> Self {
        match status {
            PlanStatus::Pending => Phase::Start,
            PlanStatus::InProgress | PlanStatus::AwaitingUserInput if turn == 0 => Phase::Start,
            PlanStatus::InProgress | PlanStatus::AwaitingUserInput => Phase::Continue,
            PlanStatus::Completed | PlanStatus::Failed => Phase::Closed,
        }
    }
}

/// Returns the waves to dispatch for a plan, in order.
///
/// `changed` lists the aspects the latest input affected; it only matters for
/// [`Phase::Continue`], where research kinds outside it keep their earlier
/// output. Budget and itinerary always run outside [`Phase::Closed`].
pub fn select(status: PlanStatus, turn: u64, changed: &BTreeSet<SpecialistKind>) -> Vec<Wave> {
    select_phase(Phase::of(status, turn), changed)
}

/// Like [`select`] for an explicit phase.
pub fn select_phase(phase: Phase, changed: &BTreeSet<SpecialistKind>) -> Vec<Wave> {
    match phase {
        Phase::Start => vec![
            Wave::new(1, SpecialistKind::RESEARCH, Gate::Always),
            Wave::new(2, SpecialistKind::AGGREGATE, Gate::AfterAnySuccess),
        ],
        Phase::Continue => vec![
            Wave::new(
                1,
                SpecialistKind::RESEARCH
                    .into_iter()
                    .filter(|kind| changed.contains(kind)),
                Gate::Always,
            ),
            Wave::new(2, SpecialistKind::AGGREGATE, Gate::Always),
        ],
        Phase::Reconcile => vec![Wave::new(2, SpecialistKind::AGGREGATE, Gate::Always)],
        Phase::Closed => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(wave: &Wave) -> Vec<SpecialistKind> {
        wave.kinds.clone()
    }

    #[test]
    fn test_start_runs_everything_in_two_waves() {
        let waves = select(PlanStatus::Pending, 0, &BTreeSet::new());
        assert_eq!(waves.len(), 2);
        assert_eq!(kinds(&waves[0]), SpecialistKind::RESEARCH.to_vec());
        assert_eq!(kinds(&waves[1]), SpecialistKind::AGGREGATE.to_vec());
        assert!(!waves[1].should_run(0));
        assert!(waves[1].should_run(1));
    }

    #[test]
    fn test_continue_reruns_changed_research_and_aggregates() {
        let changed = BTreeSet::from([SpecialistKind::Hotel, SpecialistKind::Budget]);
        let waves = select(PlanStatus::AwaitingUserInput, 2, &changed);
        assert_eq!(kinds(&waves[0]), vec![SpecialistKind::Hotel]);
        assert_eq!(kinds(&waves[1]), SpecialistKind::AGGREGATE.to_vec());
        assert!(waves[1].should_run(0));
    }

    #[test]
    fn test_continue_with_nothing_changed_still_aggregates() {
        let waves = select(PlanStatus::InProgress, 1, &BTreeSet::new());
        assert!(waves[0].is_empty());
        assert_eq!(kinds(&waves[1]), SpecialistKind::AGGREGATE.to_vec());
    }

    #[test]
    fn test_reconcile_and_closed() {
        let waves = select_phase(Phase::Reconcile, &BTreeSet::new());
        assert_eq!(waves.len(), 1);
        assert_eq!(kinds(&waves[0]), SpecialistKind::AGGREGATE.to_vec());

        assert!(select(PlanStatus::Completed, 3, &BTreeSet::new()).is_empty());
        assert!(select(PlanStatus::Failed, 0, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_phase_of() {
        assert_eq!(Phase::of(PlanStatus::Pending, 0), Phase::Start);
        assert_eq!(Phase::of(PlanStatus::InProgress, 0), Phase::Start);
        assert_eq!(Phase::of(PlanStatus::InProgress, 1), Phase::Continue);
        assert_eq!(Phase::of(PlanStatus::Completed, 1), Phase::Closed);
    }
}
