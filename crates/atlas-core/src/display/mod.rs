//! Markdown rendering of plans and operation results.
//!
//! Domain models implement `Display` directly (see [`models`]); the wrappers
//! in [`results`] add a one-line headline for each operation; [`status`]
//! formats bare confirmations and errors. Everything renders as markdown so
//! the CLI can pass it through a terminal skin and MCP clients can show it
//! as is.
//!
//! ```rust
//! use atlas_core::{display::StartResult, models::Plan};
//!
//! let plan = Plan::new("user-1", "Weekend in Rome");
//! let output = StartResult::new(plan.clone()).to_string();
//! assert!(output.contains(plan.plan_id.as_str()));
//! assert!(output.contains("Weekend in Rome"));
//! ```

pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use datetime::LocalDateTime;
pub use results::{FinalizeResult, StartResult, TurnResult};
pub use status::OperationStatus;
