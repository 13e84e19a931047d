pub mod ant;
pub mod config;
pub mod error;
pub mod grid;
pub mod heading;
pub mod palette;
pub mod render;
pub mod rule;
pub mod runner;
pub mod simulation;
pub mod summary;

pub use ant::Ant;
pub use config::Config;
pub use error::{Result, TurmiteError};
pub use grid::Grid;
pub use heading::Heading;
pub use palette::{ColorIndex, Palette};
pub use rule::TurnRule;
pub use simulation::{RunOutcome, Simulation, StepRecord};
pub use summary::RunSummary;
