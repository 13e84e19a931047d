use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::heading::Heading;
use crate::simulation::{RunOutcome, Simulation};
use crate::error::Result;

/// Final state of a run, written next to the image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub width: i32,
    pub height: i32,
    pub palette_size: usize,
    /// Rule letters, e.g. "RLLR"
    pub rules: String,
    pub start_x: i32,
    pub start_y: i32,
    pub initial_heading: Heading,
    pub outcome: RunOutcome,
    /// Last position of the ant (outside the grid when it exited)
    pub final_x: i32,
    pub final_y: i32,
    pub final_heading: Heading,
    pub elapsed_ms: u64,
}

impl RunSummary {
    /// Create a summary from a finished simulation
    pub fn from_simulation(
        sim: &Simulation<'_>,
        start: (i32, i32),
        initial_heading: Heading,
        outcome: RunOutcome,
        elapsed_ms: u64,
    ) -> Self {
        let ant = sim.ant();
        RunSummary {
            width: sim.grid().width,
            height: sim.grid().height,
            palette_size: sim.palette().len(),
            rules: sim.palette().rule_string(),
            start_x: start.0,
            start_y: start.1,
            initial_heading,
            outcome,
            final_x: ant.x,
            final_y: ant.y,
            final_heading: ant.heading,
            elapsed_ms,
        }
    }

    pub fn iterations(&self) -> u64 {
        self.outcome.iterations()
    }

    /// Save to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
