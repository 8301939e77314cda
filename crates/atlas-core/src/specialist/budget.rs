//! Budget specialist.
//!
//! Totals the selected fare, lodging and activities. Over-limit plans are
//! trimmed by dropping the most expensive activities; if transportation and
//! lodging alone exceed the limit the specialist fails.

use super::{Failure, PlanContext};
use crate::models::{BudgetSummary, Contribution, Payload, SpecialistKind};

const KIND: SpecialistKind = SpecialistKind::Budget;

pub const ASK_FOR_BUDGET: &str =
    "What total budget should this trip stay within? (for example \"$2500 budget\")";

#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetAgent;

impl BudgetAgent {
    pub fn run(&self, context: &PlanContext) -> Result<Contribution, Failure> {
        let flight_cost = context
            .flights()
            .and_then(|f| f.selected())
            .map(|f| f.price);
        let lodging_cost = context.hotels().and_then(|h| h.stay_cost());

        if flight_cost.is_none() && lodging_cost.is_none() {
            return Err(Failure::permanent(
                KIND,
                "no flight or hotel pricing to budget against",
            ));
        }
        let flight_cost = flight_cost.unwrap_or(0);
        let lodging_cost = lodging_cost.unwrap_or(0);
        let fixed = flight_cost.saturating_add(lodging_cost);

        let mut activities: Vec<(String, u32)> = context
            .activities()
            .map(|plan| {
                plan.activities
                    .iter()
                    .map(|a| (a.name.clone(), a.cost))
                    .collect()
            })
            .unwrap_or_default();

        let limit = context.brief().budget;
        let mut dropped = Vec::new();

        if let Some(limit) = limit {
            if fixed > limit {
                return Err(Failure::permanent(
                    KIND,
                    format!("estimated cost ${fixed} for flights and lodging exceeds the ${limit} budget"),
                ));
            }
            activities.sort_by_key(|(_, cost)| *cost);
            while fixed + activities.iter().map(|(_, c)| c).sum::<u32>() > limit {
                match activities.pop() {
                    Some((name, _)) => dropped.push(name),
                    None => break,
                }
            }
        }

        let activity_cost: u32 = activities.iter().map(|(_, c)| c).sum();
        let total_cost = fixed + activity_cost;

        Ok(context.contribute(Payload::Budget(BudgetSummary {
            limit,
            flight_cost,
            lodging_cost,
            activity_cost,
            total_cost,
            remaining: limit.map(|l| l.saturating_sub(total_cost)),
            dropped_activities: dropped,
            clarification: limit.is_none().then(|| ASK_FOR_BUDGET.to_string()),
        })))
    }
}
