//! Row-major cell grid geometry.

use serde::{Deserialize, Serialize};

/// Number of cells per row.
pub const DEFAULT_COLUMNS: usize = 15;

/// A cell position in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Navigation direction within the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

/// Items packed into rows of a fixed column count. The last row may be partial.
#[derive(Debug, Clone)]
pub struct CellGrid<P> {
    items: Vec<P>,
    columns: usize,
}

impl<P> CellGrid<P> {
    /// Pack `items` into rows of `columns` cells.
    pub fn new(items: Vec<P>, columns: usize) -> Self {
        Self {
            items,
            columns: columns.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row_count(&self) -> usize {
        self.items.len().div_ceil(self.columns)
    }

    /// Number of cells in `row` (0 past the last row).
    pub fn row_len(&self, row: usize) -> usize {
        let start = row * self.columns;
        self.items.len().saturating_sub(start).min(self.columns)
    }

    pub fn items(&self) -> &[P] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&P> {
        self.items.get(index)
    }

    pub fn position(&self, index: usize) -> Option<CellPos> {
        (index < self.items.len()).then(|| CellPos::new(index / self.columns, index % self.columns))
    }

    /// Index of the cell at `pos`, if one exists there.
    pub fn index_at(&self, pos: CellPos) -> Option<usize> {
        if pos.col >= self.columns {
            return None;
        }
        let index = pos.row * self.columns + pos.col;
        (index < self.items.len()).then_some(index)
    }

    /// Rows as slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[P]> {
        self.items.chunks(self.columns)
    }

    /// The cell reached by moving one step from `index`.
    ///
    /// Horizontal moves never wrap to an adjacent row. Vertical moves only
    /// land on a cell that actually exists at the same column, so a ragged
    /// last row yields `None` for columns past its end.
    pub fn neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        let pos = self.position(index)?;
        let target = match direction {
            Direction::Left => CellPos::new(pos.row, pos.col.checked_sub(1)?),
            Direction::Right => CellPos::new(pos.row, pos.col + 1),
            Direction::Up => CellPos::new(pos.row.checked_sub(1)?, pos.col),
            Direction::Down => CellPos::new(pos.row + 1, pos.col),
        };
        self.index_at(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> CellGrid<usize> {
        CellGrid::new((0..n).collect(), DEFAULT_COLUMNS)
    }

    #[test]
    fn test_packing() {
        let g = grid(16);
        assert_eq!(g.row_count(), 2);
        assert_eq!(g.row_len(0), 15);
        assert_eq!(g.row_len(1), 1);
        assert_eq!(g.row_len(2), 0);
        assert_eq!(g.position(15), Some(CellPos::new(1, 0)));
        assert_eq!(g.position(16), None);
        assert_eq!(g.rows().map(<[usize]>::len).collect::<Vec<_>>(), vec![15, 1]);
    }

    #[test]
    fn test_empty_grid() {
        let g = grid(0);
        assert!(g.is_empty());
        assert_eq!(g.row_count(), 0);
        assert_eq!(g.neighbor(0, Direction::Right), None);
    }

    #[test]
    fn test_zero_columns_clamped() {
        let g = CellGrid::new(vec![1, 2, 3], 0);
        assert_eq!(g.columns(), 1);
        assert_eq!(g.row_count(), 3);
    }

    #[test]
    fn test_horizontal_no_wrap() {
        let g = grid(30);
        assert_eq!(g.neighbor(15, Direction::Left), None);
        assert_eq!(g.neighbor(14, Direction::Right), None);
        assert_eq!(g.neighbor(16, Direction::Left), Some(15));
        assert_eq!(g.neighbor(3, Direction::Right), Some(4));
    }

    #[test]
    fn test_vertical_edges() {
        let g = grid(30);
        assert_eq!(g.neighbor(4, Direction::Up), None);
        assert_eq!(g.neighbor(19, Direction::Down), None);
        assert_eq!(g.neighbor(19, Direction::Up), Some(4));
        assert_eq!(g.neighbor(4, Direction::Down), Some(19));
    }

    #[test]
    fn test_ragged_last_row() {
        let g = grid(16);
        assert_eq!(g.neighbor(5, Direction::Down), None);
        assert_eq!(g.neighbor(0, Direction::Down), Some(15));
        assert_eq!(g.neighbor(15, Direction::Right), None);
        assert_eq!(g.neighbor(15, Direction::Up), Some(0));
    }
}
