use crate::heading::Heading;

/// The single agent walking the grid
///
/// Position may leave the grid; the simulation stops as soon as it does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ant {
    pub x: i32,
    pub y: i32,
    pub heading: Heading,
}

impl Ant {
    pub fn new(x: i32, y: i32, heading: Heading) -> Self {
        Ant { x, y, heading }
    }

    /// Move one cell in the current heading, without clamping
    pub fn advance(&mut self) {
        let (dx, dy) = self.heading.offset();
        self.x += dx;
        self.y += dy;
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}
