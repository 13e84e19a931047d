use turmite::{Heading, Palette, Simulation, StepRecord};

/// Run a centered simulation to completion, recording every step
pub fn trace_run(palette: &Palette, width: i32, height: i32, heading: Heading) -> (Simulation<'_>, Vec<StepRecord>) {
    let mut sim = Simulation::centered(width, height, palette, heading).unwrap();
    let mut records = Vec::new();
    while sim.is_running() {
        records.push(sim.step().unwrap());
        assert!(records.len() < 10_000_000, "run did not terminate");
    }
    (sim, records)
}

/// Render a grid as rows of index digits, for readable assertion failures
#[allow(dead_code)]
pub fn format_grid(sim: &Simulation<'_>) -> String {
    let grid = sim.grid();
    let mut result = String::new();
    for y in 0..grid.height {
        for x in 0..grid.width {
            result.push_str(&grid.get(x, y).unwrap().to_string());
        }
        result.push('\n');
    }
    result
}
