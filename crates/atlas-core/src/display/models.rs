//! Display implementations for domain models.
//!
//! Plans render as a markdown document: metadata list, goal, pending
//! question, one section per contribution, then warnings and errors.

use std::fmt;

use super::datetime::{LocalDateTime, Millis};
use crate::models::{
    ActivityPlan, BudgetSummary, DestinationNotes, FlightPlan, HotelPlan, Itinerary, Payload,
    Plan, PlanStatus, SpecialistKind,
};

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for SpecialistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Plan {}", self.plan_id)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status.with_icon())?;
        writeln!(f, "- User: {}", self.user_id)?;
        writeln!(f, "- Turn: {}", self.turn)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;
        if let Some(completed) = &self.completed_at {
            writeln!(f, "- Completed: {}", LocalDateTime(completed))?;
        }
        writeln!(f, "- Specialist time: {}", Millis(self.processing_ms))?;

        writeln!(f)?;
        writeln!(f, "> {}", self.goal)?;
        for turn in &self.turns {
            writeln!(f, ">")?;
            writeln!(f, "> {}. {}", turn.number, turn.input)?;
        }

        if let Some(question) = &self.clarification {
            writeln!(f)?;
            writeln!(f, "**Question:** {question}")?;
        }

        for contribution in self.contributions.values() {
            writeln!(f)?;
            write!(f, "{}", contribution.payload)?;
        }

        if !self.warnings.is_empty() {
            writeln!(f, "\n## Warnings")?;
            writeln!(f)?;
            for warning in &self.warnings {
                writeln!(
                    f,
                    "- turn {}, {}: {}{}",
                    warning.turn,
                    warning.kind,
                    warning.message,
                    if warning.retryable { " (retryable)" } else { "" }
                )?;
            }
        }

        if let Some(error) = &self.error {
            writeln!(f, "\n## Error")?;
            writeln!(f)?;
            writeln!(f, "{}", error.message)?;
        }

        Ok(())
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Flights(plan) => write!(f, "{plan}"),
            Payload::Hotels(plan) => write!(f, "{plan}"),
            Payload::Activities(plan) => write!(f, "{plan}"),
            Payload::Destination(notes) => write!(f, "{notes}"),
            Payload::Budget(summary) => write!(f, "{summary}"),
            Payload::Itinerary(itinerary) => write!(f, "{itinerary}"),
        }
    }
}

/// Marks the selected option in a list.
fn marker(selected: Option<usize>, index: usize) -> &'static str {
    if selected == Some(index) {
        "**→**"
    } else {
        "-"
    }
}

impl fmt::Display for FlightPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Flights")?;
        writeln!(f)?;
        for (i, option) in self.options.iter().enumerate() {
            let stops = match option.stops {
                0 => "nonstop".to_string(),
                1 => "1 stop".to_string(),
                n => format!("{n} stops"),
            };
            writeln!(
                f,
                "{} {} {} → {}, ${} ({stops})",
                marker(self.selected, i),
                option.carrier,
                option.origin,
                option.destination,
                option.price
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for HotelPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Hotels ({} nights)", self.nights)?;
        writeln!(f)?;
        for (i, option) in self.options.iter().enumerate() {
            writeln!(
                f,
                "{} {} ({}), ${}/night, rated {}.{}",
                marker(self.selected, i),
                option.name,
                option.style,
                option.nightly_rate,
                option.rating / 10,
                option.rating % 10
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for ActivityPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Activities")?;
        writeln!(f)?;
        for activity in &self.activities {
            writeln!(
                f,
                "- {} ({}, {}h, ${})",
                activity.name, activity.category, activity.duration_hours, activity.cost
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for DestinationNotes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## About {}", self.city)?;
        writeln!(f)?;
        for fact in &self.facts {
            writeln!(f, "- {fact}")?;
        }
        Ok(())
    }
}

impl fmt::Display for BudgetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Budget")?;
        writeln!(f)?;
        writeln!(f, "| Item | Cost |")?;
        writeln!(f, "|:-|-:|")?;
        writeln!(f, "| Flights | ${} |", self.flight_cost)?;
        writeln!(f, "| Lodging | ${} |", self.lodging_cost)?;
        writeln!(f, "| Activities | ${} |", self.activity_cost)?;
        writeln!(f, "| **Total** | **${}** |", self.total_cost)?;
        if let (Some(limit), Some(remaining)) = (self.limit, self.remaining) {
            writeln!(f, "| Limit | ${limit} |")?;
            writeln!(f, "| Remaining | ${remaining} |")?;
        }
        if !self.dropped_activities.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "Dropped to fit the budget: {}",
                self.dropped_activities.join(", ")
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Itinerary")?;
        for day in &self.days {
            writeln!(f)?;
            writeln!(f, "### Day {}: {}", day.day, day.title)?;
            writeln!(f)?;
            for item in &day.items {
                writeln!(f, "- {item}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contribution, FailureCause, FlightOption, PlanError};

    fn flights() -> FlightPlan {
        FlightPlan {
            options: vec![
                FlightOption {
                    carrier: "Aurora Air".to_string(),
                    origin: "Home".to_string(),
                    destination: "Paris".to_string(),
                    price: 420,
                    stops: 1,
                },
                FlightOption {
                    carrier: "Meridian".to_string(),
                    origin: "Home".to_string(),
                    destination: "Paris".to_string(),
                    price: 560,
                    stops: 0,
                },
            ],
            selected: Some(1),
        }
    }

    #[test]
    fn test_flight_plan_marks_selection() {
        let output = flights().to_string();
        assert!(output.contains("## Flights"));
        assert!(output.contains("**→** Meridian Home → Paris, $560 (nonstop)"));
        assert!(output.contains("- Aurora Air Home → Paris, $420 (1 stop)"));
    }

    #[test]
    fn test_plan_sections() {
        let mut plan = Plan::new("user-1", "5-day Paris trip");
        plan.append_turn("prefer boutique hotels");
        plan.accept(Contribution::new(1, Payload::Flights(flights())));
        plan.clarification = Some("What budget?".to_string());

        let output = plan.to_string();
        assert!(output.starts_with(&format!("# Plan {}", plan.plan_id)));
        assert!(output.contains("> 5-day Paris trip"));
        assert!(output.contains("> 1. prefer boutique hotels"));
        assert!(output.contains("**Question:** What budget?"));
        assert!(output.contains("## Flights"));
        assert!(!output.contains("## Error"));
    }

    #[test]
    fn test_failed_plan_shows_error() {
        let mut plan = Plan::new("user-1", "somewhere");
        plan.fail(PlanError::new(
            FailureCause::SpecialistsUnavailable,
            "neither flights nor hotels could be researched",
        ));
        let output = plan.to_string();
        assert!(output.contains("## Error"));
        assert!(output.contains("neither flights nor hotels"));
    }

    #[test]
    fn test_budget_table() {
        let summary = BudgetSummary {
            limit: Some(3000),
            flight_cost: 500,
            lodging_cost: 800,
            activity_cost: 120,
            total_cost: 1420,
            remaining: Some(1580),
            dropped_activities: vec!["Cooking class".to_string()],
            clarification: None,
        };
        let output = summary.to_string();
        assert!(output.contains("| **Total** | **$1420** |"));
        assert!(output.contains("| Remaining | $1580 |"));
        assert!(output.contains("Dropped to fit the budget: Cooking class"));
    }
}
