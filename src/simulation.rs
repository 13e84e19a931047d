use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ant::Ant;
use crate::error::{Result, TurmiteError};
use crate::grid::Grid;
use crate::heading::Heading;
use crate::palette::{ColorIndex, Palette};

/// What happened during one step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepRecord {
    /// Iteration count after this step
    pub iteration: u64,
    /// Cell the ant stood on
    pub x: i32,
    pub y: i32,
    /// Index read before the cell advanced
    pub read_index: ColorIndex,
    /// Index written back
    pub written_index: ColorIndex,
    /// Heading after applying the rule
    pub heading: Heading,
}

/// How a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The ant left the grid
    Exited { iterations: u64 },
    /// A host-imposed iteration cap stopped the run while the ant was still inside
    LimitReached { iterations: u64 },
}

impl RunOutcome {
    pub fn iterations(&self) -> u64 {
        match *self {
            RunOutcome::Exited { iterations } | RunOutcome::LimitReached { iterations } => iterations,
        }
    }
}

/// Turmite simulation: one ant, one grid, one palette
///
/// The grid is owned for the duration of the run; the palette is borrowed read-only.
pub struct Simulation<'a> {
    grid: Grid,
    ant: Ant,
    palette: &'a Palette,
    iterations: u64,
    progress_interval: u64,
}

impl<'a> Simulation<'a> {
    /// Create a simulation with the ant at `start`
    pub fn new(grid: Grid, palette: &'a Palette, start: Ant) -> Result<Self> {
        if !grid.contains(start.x, start.y) {
            return Err(TurmiteError::StartOutOfBounds { x: start.x, y: start.y });
        }
        if let Some(id) = grid.cells().iter().position(|&c| c as usize >= palette.len()) {
            let (x, y) = grid.get_coords(id);
            return Err(TurmiteError::CellOutOfPalette {
                x,
                y,
                index: grid.cells()[id],
                palette_size: palette.len(),
            });
        }

        Ok(Simulation {
            grid,
            ant: start,
            palette,
            iterations: 0,
            progress_interval: 0,
        })
    }

    /// Fresh zeroed grid with the ant at the center
    pub fn centered(width: i32, height: i32, palette: &'a Palette, heading: Heading) -> Result<Self> {
        let grid = Grid::new(width, height)?;
        let (x, y) = grid.center();
        Self::new(grid, palette, Ant::new(x, y, heading))
    }

    /// Emit a debug event every `interval` iterations (0 disables)
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// True while the ant is inside the grid
    pub fn is_running(&self) -> bool {
        self.grid.contains(self.ant.x, self.ant.y)
    }

    /// Perform one step
    ///
    /// The rule is selected by the index read before the cell advances.
    /// Fails with OutOfBounds if the ant has already left the grid.
    pub fn step(&mut self) -> Result<StepRecord> {
        let (x, y) = self.ant.position();
        let read_index = self.grid.get(x, y)?;
        let written_index = self.palette.next(read_index);
        self.grid.set(x, y, written_index)?;

        self.ant.heading = self.palette.rule(read_index).apply(self.ant.heading);
        self.ant.advance();
        self.iterations += 1;

        if self.progress_interval > 0 && self.iterations % self.progress_interval == 0 {
            debug!(
                iterations = self.iterations,
                x = self.ant.x,
                y = self.ant.y,
                "Simulation progress"
            );
        }

        Ok(StepRecord {
            iteration: self.iterations,
            x,
            y,
            read_index,
            written_index,
            heading: self.ant.heading,
        })
    }

    /// Step until the ant leaves the grid. No iteration cap.
    pub fn run(&mut self) -> Result<u64> {
        while self.is_running() {
            self.step()?;
        }
        Ok(self.iterations)
    }

    /// Step until the ant leaves the grid or `max_iterations` total steps have run
    pub fn run_with_limit(&mut self, max_iterations: u64) -> Result<RunOutcome> {
        while self.is_running() {
            if self.iterations >= max_iterations {
                return Ok(RunOutcome::LimitReached { iterations: self.iterations });
            }
            self.step()?;
        }
        Ok(RunOutcome::Exited { iterations: self.iterations })
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn ant(&self) -> &Ant {
        &self.ant
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn palette(&self) -> &Palette {
        self.palette
    }

    /// Hand the final grid to the renderer
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step_uses_pre_increment_rule() {
        let palette = Palette::new(4).unwrap();
        let mut sim = Simulation::centered(5, 5, &palette, Heading::Left).unwrap();

        let record = sim.step().unwrap();
        // index 0 -> TurnRight, Left turns to Up
        assert_eq!(record.read_index, 0);
        assert_eq!(record.written_index, 1);
        assert_eq!(record.heading, Heading::Up);
        assert_eq!((record.x, record.y), (2, 2));
        assert_eq!(sim.ant().position(), (2, 1));
        assert_eq!(sim.grid().get(2, 2).unwrap(), 1);
        assert_eq!(sim.iterations(), 1);
    }

    #[test]
    fn test_start_outside_grid_is_rejected() {
        let palette = Palette::new(4).unwrap();
        let grid = Grid::new(5, 5).unwrap();
        let result = Simulation::new(grid, &palette, Ant::new(5, 0, Heading::Left));
        assert!(matches!(result, Err(TurmiteError::StartOutOfBounds { x: 5, y: 0 })));
    }

    #[test]
    fn test_cells_beyond_palette_are_rejected() {
        let palette = Palette::new(2).unwrap();
        let grid = Grid::from_cells(2, 1, vec![0, 3]).unwrap();
        let result = Simulation::new(grid, &palette, Ant::new(0, 0, Heading::Up));
        assert!(matches!(result, Err(TurmiteError::CellOutOfPalette { x: 1, y: 0, index: 3, .. })));
    }

    #[test]
    fn test_step_after_exit_fails() {
        let palette = Palette::new(4).unwrap();
        let mut sim = Simulation::centered(1, 1, &palette, Heading::Left).unwrap();
        assert_eq!(sim.run().unwrap(), 1);
        assert!(!sim.is_running());
        assert!(matches!(sim.step(), Err(TurmiteError::OutOfBounds { .. })));
    }

    #[test]
    fn test_limit_stops_inside_grid() {
        let palette = Palette::new(4).unwrap();
        let mut sim = Simulation::centered(5, 5, &palette, Heading::Left).unwrap();
        assert_eq!(sim.run_with_limit(10).unwrap(), RunOutcome::LimitReached { iterations: 10 });
        assert!(sim.is_running());
        assert_eq!(sim.run_with_limit(1_000).unwrap(), RunOutcome::Exited { iterations: 57 });
    }
}
