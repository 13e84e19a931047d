use crate::error::{Result, TurmiteError};
use crate::palette::ColorIndex;

/// Largest cell count a grid may hold; cell IDs must fit in i32 coordinates
pub const MAX_CELLS: usize = i32::MAX as usize;

/// Grid of color indices over [0, width) x [0, height)
/// All cells start at index 0; size never changes after creation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    cells: Vec<ColorIndex>,
}

impl Grid {
    /// Create a new grid with every cell set to index 0
    pub fn new(width: i32, height: i32) -> Result<Self> {
        Self::check_size(width, height)?;
        Ok(Grid {
            width,
            height,
            cells: vec![0; (width as usize) * (height as usize)],
        })
    }

    /// Build a grid from row-major cell data
    pub fn from_cells(width: i32, height: i32, cells: Vec<ColorIndex>) -> Result<Self> {
        Self::check_size(width, height)?;
        if cells.len() != (width as usize) * (height as usize) {
            return Err(TurmiteError::InvalidGridSize { width, height });
        }
        Ok(Grid { width, height, cells })
    }

    /// Reject empty grids and grids with more than MAX_CELLS cells
    pub fn check_size(width: i32, height: i32) -> Result<()> {
        let cells = (width as usize).checked_mul(height as usize);
        if width <= 0 || height <= 0 || cells.map_or(true, |n| n > MAX_CELLS) {
            return Err(TurmiteError::InvalidGridSize { width, height });
        }
        Ok(())
    }

    /// Check if (x, y) lies inside the grid
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Center cell (width/2, height/2)
    pub fn center(&self) -> (i32, i32) {
        (self.width / 2, self.height / 2)
    }

    /// Convert (x, y) coordinates to cell ID
    pub fn get_id(&self, x: i32, y: i32) -> usize {
        x as usize + y as usize * self.width as usize
    }

    /// Convert cell ID to (x, y) coordinates
    pub fn get_coords(&self, id: usize) -> (i32, i32) {
        let width = self.width as usize;
        ((id % width) as i32, (id / width) as i32)
    }

    /// Get cell value at (x, y)
    pub fn get(&self, x: i32, y: i32) -> Result<ColorIndex> {
        if !self.contains(x, y) {
            return Err(TurmiteError::OutOfBounds { x, y });
        }
        Ok(self.cells[self.get_id(x, y)])
    }

    /// Set cell value at (x, y)
    pub fn set(&mut self, x: i32, y: i32, value: ColorIndex) -> Result<()> {
        if !self.contains(x, y) {
            return Err(TurmiteError::OutOfBounds { x, y });
        }
        let id = self.get_id(x, y);
        self.cells[id] = value;
        Ok(())
    }

    /// Row-major cell data
    pub fn cells(&self) -> &[ColorIndex] {
        &self.cells
    }

    /// Number of cells holding each color index, for a palette of `palette_size` colors
    pub fn histogram(&self, palette_size: usize) -> Vec<u64> {
        let mut counts = vec![0u64; palette_size];
        for &cell in &self.cells {
            if let Some(count) = counts.get_mut(cell as usize) {
                *count += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_zeroed() {
        let grid = Grid::new(4, 3).unwrap();
        assert_eq!(grid.cells().len(), 12);
        assert!(grid.cells().iter().all(|&c| c == 0));
        assert_eq!(grid.center(), (2, 1));
    }

    #[test]
    fn test_contains_edges() {
        let grid = Grid::new(5, 5).unwrap();
        assert!(grid.contains(0, 0));
        assert!(grid.contains(4, 4));
        assert!(!grid.contains(-1, 0));
        assert!(!grid.contains(0, -1));
        assert!(!grid.contains(5, 0));
        assert!(!grid.contains(0, 5));
    }

    #[test]
    fn test_get_set_and_bounds_errors() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set(3, 1, 7).unwrap();
        assert_eq!(grid.get(3, 1).unwrap(), 7);
        assert_eq!(grid.cells()[grid.get_id(3, 1)], 7);
        assert_eq!(grid.get_coords(grid.get_id(3, 1)), (3, 1));

        assert!(matches!(grid.get(5, 1), Err(TurmiteError::OutOfBounds { x: 5, y: 1 })));
        assert!(matches!(grid.set(-1, 0, 1), Err(TurmiteError::OutOfBounds { x: -1, y: 0 })));
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(Grid::new(0, 5).is_err());
        assert!(Grid::new(5, -1).is_err());
        assert!(Grid::from_cells(2, 2, vec![0; 3]).is_err());
    }

    #[test]
    fn test_too_many_cells_rejected_before_allocation() {
        assert!(matches!(
            Grid::new(50_000, 50_000),
            Err(TurmiteError::InvalidGridSize { width: 50_000, height: 50_000 })
        ));
        assert!(matches!(
            Grid::new(i32::MAX, 2),
            Err(TurmiteError::InvalidGridSize { .. })
        ));
        assert!(Grid::check_size(46_340, 46_340).is_ok());
    }

    #[test]
    fn test_ids_use_unsigned_arithmetic() {
        let grid = Grid::new(1_000, 3).unwrap();
        assert_eq!(grid.get_id(999, 2), 2_999);
        assert_eq!(grid.get_coords(2_999), (999, 2));
    }

    #[test]
    fn test_histogram() {
        let grid = Grid::from_cells(2, 2, vec![0, 1, 1, 3]).unwrap();
        assert_eq!(grid.histogram(4), vec![1, 2, 0, 1]);
    }
}
