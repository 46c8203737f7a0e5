/// Board: the row-major grid of cells plus entity placement.
///
/// Placement rules:
///   - A placement only ever writes a cell that is Empty right before it.
///   - The player is not a cell; callers pass the player's position as
///     `avoid` so nothing is placed under them.
///   - Random placement uses rejection sampling, capped. Past the cap it
///     picks uniformly among the remaining free cells, so it terminates
///     whenever any free cell exists and fails with `BoardFull` otherwise.

use rand::seq::IteratorRandom;
use rand::Rng;

use super::cell::{Cell, Position};
use crate::error::GameError;

/// Rejection-sampling draws before falling back to an explicit scan.
const MAX_PLACEMENT_ATTEMPTS: usize = 4096;

/// Board size for a level: 10x5 at level 1, +5 columns and +3 rows per level.
pub fn dimensions_for_level(level: u32) -> (usize, usize) {
    let step = level.saturating_sub(1) as usize;
    (10 + 5 * step, 5 + 3 * step)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Board {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    pub fn for_level(level: u32) -> Self {
        let (w, h) = dimensions_for_level(level);
        Board::new(w, h)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Cell at `pos`, or None off-board.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if self.in_bounds(pos) {
            Some(self.cells[pos.y * self.width + pos.x])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if self.in_bounds(pos) {
            self.cells[pos.y * self.width + pos.x] = cell;
        }
    }

    #[inline]
    pub fn clear(&mut self, pos: Position) {
        self.set(pos, Cell::Empty);
    }

    /// Clear every cell holding `cell`.
    pub fn clear_all(&mut self, cell: Cell) {
        for c in self.cells.iter_mut().filter(|c| **c == cell) {
            *c = Cell::Empty;
        }
    }

    /// Positions holding `cell`, row-major.
    pub fn positions_of(&self, cell: Cell) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(move |&p| self.get(p) == Some(cell))
    }

    /// Free = Empty and not `avoid`.
    #[inline]
    pub fn is_free(&self, pos: Position, avoid: Position) -> bool {
        pos != avoid && self.get(pos).is_some_and(Cell::is_empty)
    }

    pub fn free_cells(&self, avoid: Position) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(move |&p| self.is_free(p, avoid))
    }

    pub fn free_count(&self, avoid: Position) -> usize {
        self.free_cells(avoid).count()
    }

    /// Tag a uniformly random free cell with `cell`.
    pub fn place_random<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        cell: Cell,
        avoid: Position,
    ) -> Result<Position, GameError> {
        if self.width == 0 || self.height == 0 {
            return Err(self.full_error(cell));
        }

        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let pos = Position::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height));
            if self.is_free(pos, avoid) {
                self.set(pos, cell);
                return Ok(pos);
            }
        }

        // Nearly full board: pick among what is left
        let pos = self
            .free_cells(avoid)
            .choose(rng)
            .ok_or_else(|| self.full_error(cell))?;
        self.set(pos, cell);
        Ok(pos)
    }

    /// Tag the first free cell in row-major order with `cell`.
    pub fn place_first_empty(&mut self, cell: Cell, avoid: Position) -> Result<Position, GameError> {
        let pos = self
            .free_cells(avoid)
            .next()
            .ok_or_else(|| self.full_error(cell))?;
        self.set(pos, cell);
        Ok(pos)
    }

    fn positions(&self) -> impl Iterator<Item = Position> {
        let w = self.width;
        (0..self.height).flat_map(move |y| (0..w).map(move |x| Position::new(x, y)))
    }

    fn full_error(&self, cell: Cell) -> GameError {
        GameError::BoardFull {
            what: cell.name(),
            width: self.width,
            height: self.height,
        }
    }

    /// Build a board from a diagram.
    /// Legend: 'F'=Hazard 'C'=Coin 'H'=Item, anything else Empty.
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut board = Board::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                board.set(Position::new(x, y), Cell::from_symbol(ch));
            }
        }
        board
    }
}
