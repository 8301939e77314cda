//! Command-line argument definitions.
//!
//! Each subcommand has a clap struct that converts into the matching core
//! parameter type, so `atlas-core` stays free of clap attributes:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Orchestrator
//! ```

use std::path::PathBuf;

use atlas_core::params::{ContinuePlan, PlanRef, StartPlan};
use clap::{Args as ClapArgs, Parser, Subcommand};

/// Multi-turn trip planner
///
/// Atlas researches flights, hotels, activities, destination facts, a budget
/// and a day-by-day itinerary for a stated travel goal, and keeps refining the
/// plan as you add requests. Run `atlas serve` to expose the same operations
/// over MCP.
#[derive(Parser)]
#[command(version, about, name = "atlas")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/atlas/atlas.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Path to a YAML orchestrator config. Defaults to
    /// $XDG_CONFIG_HOME/atlas/config.yaml when that file exists
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep plans in memory only; nothing survives the process
    #[arg(long, global = true, conflicts_with = "database_file")]
    pub ephemeral: bool,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print the JSON response body instead of markdown
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a new plan from a travel goal
    Start(StartArgs),
    /// Add a request to an existing plan
    #[command(name = "continue", alias = "c")]
    Continue(ContinueArgs),
    /// Show a plan without changing it
    #[command(alias = "s")]
    Status(PlanArgs),
    /// Reconcile the budget and itinerary and complete a plan
    Finalize(PlanArgs),
    /// Start the MCP server on stdio
    Serve,
}

#[derive(ClapArgs)]
pub struct StartArgs {
    /// What to plan, e.g. "5-day Paris trip, $3000 budget"
    pub goal: String,
    /// Identifier of the requesting user
    #[arg(short, long, default_value = "local")]
    pub user: String,
}

impl From<StartArgs> for StartPlan {
    fn from(val: StartArgs) -> Self {
        StartPlan {
            goal: val.goal,
            user_id: val.user,
        }
    }
}

#[derive(ClapArgs)]
pub struct ContinueArgs {
    /// ID printed by `atlas start`
    pub plan_id: String,
    /// The new request, e.g. "prefer boutique hotels"
    pub input: String,
}

impl From<ContinueArgs> for ContinuePlan {
    fn from(val: ContinueArgs) -> Self {
        ContinuePlan {
            plan_id: val.plan_id,
            user_input: val.input,
        }
    }
}

#[derive(ClapArgs)]
pub struct PlanArgs {
    /// ID printed by `atlas start`
    pub plan_id: String,
}

impl From<PlanArgs> for PlanRef {
    fn from(val: PlanArgs) -> Self {
        PlanRef {
            plan_id: val.plan_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start() {
        let args = Args::try_parse_from([
            "atlas",
            "start",
            "5-day Paris trip",
            "--user",
            "user-1",
            "--json",
        ])
        .unwrap();
        assert!(args.json);
        match args.command {
            Commands::Start(start) => {
                let params = StartPlan::from(start);
                assert_eq!(params.goal, "5-day Paris trip");
                assert_eq!(params.user_id, "user-1");
            }
            _ => panic!("expected start"),
        }
    }

    #[test]
    fn test_parse_continue() {
        let args =
            Args::try_parse_from(["atlas", "continue", "abc", "prefer boutique hotels"]).unwrap();
        match args.command {
            Commands::Continue(cont) => {
                let params = ContinuePlan::from(cont);
                assert_eq!(params.plan_id, "abc");
                assert_eq!(params.user_input, "prefer boutique hotels");
            }
            _ => panic!("expected continue"),
        }
    }

    #[test]
    fn test_ephemeral_conflicts_with_database_file() {
        let result = Args::try_parse_from([
            "atlas",
            "--ephemeral",
            "--database-file",
            "x.db",
            "status",
            "abc",
        ]);
        assert!(result.is_err());
    }
}
