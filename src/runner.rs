use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::ant::Ant;
use crate::config::Config;
use crate::error::Result;
use crate::grid::Grid;
use crate::palette::Palette;
use crate::render;
use crate::simulation::{RunOutcome, Simulation};
use crate::summary::RunSummary;

/// Build the palette and grid from `config`, run to completion, and write outputs
///
/// Relative output paths are resolved against `out_dir`.
pub fn run(config: &Config, out_dir: &Path) -> Result<RunSummary> {
    config.validate()?;

    let palette = Palette::new(config.palette.size)?;
    let grid = Grid::new(config.grid.width, config.grid.height)?;
    let start = config.start_position();
    let heading = config.ant.heading;

    let mut sim = Simulation::new(grid, &palette, Ant::new(start.0, start.1, heading))?
        .with_progress_interval(config.logging.progress_interval);

    info!(
        width = config.grid.width,
        height = config.grid.height,
        palette_size = palette.len(),
        rules = %palette.rule_string(),
        x = start.0,
        y = start.1,
        heading = ?heading,
        "Starting"
    );

    let started = Instant::now();
    let outcome = match config.run.max_iterations {
        Some(max_iterations) => sim.run_with_limit(max_iterations)?,
        None => RunOutcome::Exited { iterations: sim.run()? },
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;

    info!(iterations = outcome.iterations(), outcome = ?outcome, elapsed_ms, "Iterations");

    let summary = RunSummary::from_simulation(&sim, start, heading, outcome, elapsed_ms);
    let grid = sim.into_grid();

    render::write_png(&grid, &palette, &out_dir.join(&config.output.image_path))?;

    if let Some(path) = config.output.summary_path() {
        let path = out_dir.join(path);
        summary.save_to_file(&path)?;
        info!(path = %path.display(), "Wrote run summary");
    }

    Ok(summary)
}
