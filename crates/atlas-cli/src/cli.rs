//! Command handlers for the `atlas` binary.
//!
//! Each handler converts its clap arguments into core parameters, calls the
//! orchestrator and renders either the markdown result or the JSON response
//! body.

use anyhow::Result;
use atlas_core::{
    params::{ContinuePlan, PlanRef, StartPlan},
    ContinueResponse, FinalizeResponse, FinalizeResult, Orchestrator, StartResponse, StartResult,
    StatusResponse, TurnResult,
};
use log::debug;

use crate::{
    args::{ContinueArgs, PlanArgs, StartArgs},
    renderer::TerminalRenderer,
};

pub struct Cli {
    orchestrator: Orchestrator,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(orchestrator: Orchestrator, renderer: TerminalRenderer) -> Self {
        Self {
            orchestrator,
            renderer,
        }
    }

    pub async fn start(&self, args: StartArgs) -> Result<()> {
        let params = StartPlan::from(args);
        debug!("start: {params:?}");
        let plan = self.orchestrator.start(&params).await?;

        if self.renderer.is_json() {
            return self.renderer.render_json(&StartResponse::from_plan(&plan));
        }
        self.renderer.render(&StartResult::new(plan).to_string());
        Ok(())
    }

    pub async fn continue_plan(&self, args: ContinueArgs) -> Result<()> {
        let params = ContinuePlan::from(args);
        debug!("continue: {params:?}");
        let plan = self.orchestrator.continue_plan(&params).await?;

        if self.renderer.is_json() {
            return self.renderer.render_json(&ContinueResponse::from_plan(&plan));
        }
        self.renderer.render(&TurnResult::new(plan).to_string());
        Ok(())
    }

    pub async fn status(&self, args: PlanArgs) -> Result<()> {
        let params = PlanRef::from(args);
        let plan = self.orchestrator.status(&params).await?;

        if self.renderer.is_json() {
            return self.renderer.render_json(&StatusResponse::from_plan(plan));
        }
        self.renderer.render(&plan.to_string());
        Ok(())
    }

    pub async fn finalize(&self, args: PlanArgs) -> Result<()> {
        let params = PlanRef::from(args);
        let plan = self.orchestrator.finalize(&params).await?;

        if self.renderer.is_json() {
            return self.renderer.render_json(&FinalizeResponse::from_plan(plan));
        }
        self.renderer.render(&FinalizeResult::new(plan).to_string());
        Ok(())
    }
}
