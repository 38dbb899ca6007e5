//! Board state for the link-up puzzle.
//!
//! This module defines the game's fundamental components:
//! - `Cell`: a board position, either empty or holding a symbol id.
//! - `Board`: the rectangular grid and its mutation primitives (populate,
//!   pair removal, reshuffle, occupied-cell enumeration).
//!
//! The board knows nothing about path search; the `search` module only ever
//! reads cell state through `Board`'s accessors.
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use thiserror::Error;

/// A (row, column) position on the board, 0-indexed.
pub type Coord = (usize, usize);

/// The state of a single board position.
///
/// Symbols are small integer ids; the symbol alphabet size is chosen at
/// `populate` time and every id appears an even number of times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// No tile at this position.
    Empty,
    /// A tile holding the given symbol id.
    Symbol(u8),
}

impl Cell {
    /// Character form used by `Display` and the string-array parser:
    /// `.` for empty, the decimal digit for ids 0-9, `?` beyond that.
    pub fn to_char(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Symbol(id) if *id < 10 => (b'0' + id) as char,
            Cell::Symbol(_) => '?',
        }
    }
}

/// Errors raised by `Board` mutation primitives.
///
/// All variants are fatal to the call that raised them; the board is never
/// left partially mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A coordinate argument fell outside the board.
    #[error("coordinate ({0}, {1}) is outside a {2}x{3} board")]
    OutOfBounds(usize, usize, usize, usize),
    /// `populate` was asked to fill an odd number of cells with pairs.
    #[error("board with {0} cells cannot be tiled with symbol pairs")]
    InvalidSize(usize),
    /// `populate` was given a zero-sized symbol alphabet.
    #[error("symbol alphabet must not be empty")]
    EmptyAlphabet,
}

/// The rectangular grid of cells, stored row-major.
///
/// The board is exclusively owned by the driving code; the search engine
/// holds a shared read-only handle so it always observes the latest state.
/// Cells only ever transition `Symbol -> Empty` through `clear_pair`, and
/// `reshuffle_remaining` permutes values without changing their count, so
/// every symbol present keeps an even multiplicity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an all-empty board of the given dimensions.
    ///
    /// # Panics
    /// Panics if either dimension is zero.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "board dimensions must be positive");
        Board {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Builds a board directly from a cell vector, used by the parser.
    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Board { rows, cols, cells }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    fn idx(&self, r: usize, c: usize) -> usize {
        r * self.cols + c
    }

    /// Whether `coord` lies inside the board.
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.rows && coord.1 < self.cols
    }

    /// Returns the cell at `(r, c)`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    pub fn cell(&self, r: usize, c: usize) -> Cell {
        assert!(r < self.rows && c < self.cols, "cell({r}, {c}) out of bounds");
        self.cells[self.idx(r, c)]
    }

    /// Returns the symbol id at `coord`, or `None` for an empty cell.
    pub fn symbol_at(&self, coord: Coord) -> Option<u8> {
        match self.cell(coord.0, coord.1) {
            Cell::Empty => None,
            Cell::Symbol(id) => Some(id),
        }
    }

    fn check_bounds(&self, coord: Coord) -> Result<(), BoardError> {
        if self.in_bounds(coord) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds(coord.0, coord.1, self.rows, self.cols))
        }
    }

    /// Fills the whole board with shuffled symbol pairs.
    ///
    /// Symbol ids cycle through `0..alphabet_size`, so every id appears an
    /// even number of times. Uses an entropy-seeded RNG; see
    /// [`Board::populate_with_seed`] for reproducible boards.
    ///
    /// # Errors
    /// `BoardError::InvalidSize` if the board holds an odd number of cells,
    /// `BoardError::EmptyAlphabet` if `alphabet_size` is zero. The board is
    /// left untouched on error.
    pub fn populate(&mut self, alphabet_size: u8) -> Result<(), BoardError> {
        let mut rng = SmallRng::from_entropy();
        self.populate_with_rng(alphabet_size, &mut rng)
    }

    /// Deterministic variant of [`Board::populate`] for tests and replays.
    pub fn populate_with_seed(&mut self, alphabet_size: u8, seed: u64) -> Result<(), BoardError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.populate_with_rng(alphabet_size, &mut rng)
    }

    fn populate_with_rng(&mut self, alphabet_size: u8, rng: &mut impl Rng) -> Result<(), BoardError> {
        let total = self.rows * self.cols;
        if total % 2 != 0 {
            return Err(BoardError::InvalidSize(total));
        }
        if alphabet_size == 0 {
            return Err(BoardError::EmptyAlphabet);
        }

        let half: Vec<Cell> = (0..total / 2)
            .map(|i| Cell::Symbol((i % alphabet_size as usize) as u8))
            .collect();
        let mut values = half.clone();
        values.extend(half);
        values.shuffle(rng);
        self.cells = values;
        Ok(())
    }

    /// Clears a matched pair of cells.
    ///
    /// Both cells are set to `Cell::Empty` unconditionally; validating that
    /// the symbols match and a legal path connects them is the caller's job.
    ///
    /// # Errors
    /// `BoardError::OutOfBounds` if either coordinate is outside the board;
    /// neither cell is mutated in that case.
    pub fn clear_pair(&mut self, a: Coord, b: Coord) -> Result<(), BoardError> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;
        let ia = self.idx(a.0, a.1);
        let ib = self.idx(b.0, b.1);
        self.cells[ia] = Cell::Empty;
        self.cells[ib] = Cell::Empty;
        Ok(())
    }

    /// Returns all occupied positions in row-major order.
    ///
    /// An empty result means the board is fully cleared.
    pub fn occupied_cells(&self) -> Vec<Coord> {
        let mut coords = Vec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.cell(r, c) != Cell::Empty {
                    coords.push((r, c));
                }
            }
        }
        coords
    }

    /// Reshuffles the values of the occupied cells among themselves.
    ///
    /// Positions stay fixed; only the value list is permuted, so the symbol
    /// multiset (and its pair parity) is unchanged. No-op on a cleared board.
    pub fn reshuffle_remaining(&mut self) {
        let mut rng = SmallRng::from_entropy();
        self.reshuffle_remaining_with_rng(&mut rng);
    }

    /// Deterministic variant of [`Board::reshuffle_remaining`].
    pub fn reshuffle_remaining_with_seed(&mut self, seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.reshuffle_remaining_with_rng(&mut rng);
    }

    fn reshuffle_remaining_with_rng(&mut self, rng: &mut impl Rng) {
        let positions = self.occupied_cells();
        if positions.is_empty() {
            return;
        }
        let mut values: Vec<Cell> = positions
            .iter()
            .map(|&(r, c)| self.cell(r, c))
            .collect();
        values.shuffle(rng);
        for (&(r, c), value) in positions.iter().zip(values) {
            let i = self.idx(r, c);
            self.cells[i] = value;
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.cols {
                write!(f, "{}", self.cell(r, c).to_char())?;
            }
            if r < self.rows - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::board_from_str_array;
    use std::collections::HashMap;

    fn symbol_counts(board: &Board) -> HashMap<u8, usize> {
        let mut counts = HashMap::new();
        for (r, c) in board.occupied_cells() {
            if let Some(id) = board.symbol_at((r, c)) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        counts
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(4, 6);
        assert_eq!(board.rows(), 4);
        assert_eq!(board.cols(), 6);
        assert!(board.occupied_cells().is_empty());
    }

    #[test]
    fn test_populate_fills_every_cell() {
        let mut board = Board::new(4, 6);
        board.populate_with_seed(5, 42).unwrap();
        assert_eq!(board.occupied_cells().len(), 24);
    }

    #[test]
    fn test_populate_parity_invariant() {
        let mut board = Board::new(6, 8);
        board.populate_with_seed(7, 99).unwrap();
        for (id, count) in symbol_counts(&board) {
            assert_eq!(count % 2, 0, "symbol {} appears {} times", id, count);
        }
    }

    #[test]
    fn test_populate_odd_cell_count_rejected() {
        let mut board = Board::new(3, 3);
        board.cells[0] = Cell::Symbol(4);
        let before = board.clone();
        let err = board.populate_with_seed(5, 1).unwrap_err();
        assert_eq!(err, BoardError::InvalidSize(9));
        assert_eq!(board, before, "failed populate must leave the board unchanged");
    }

    #[test]
    fn test_populate_empty_alphabet_rejected() {
        let mut board = Board::new(2, 2);
        assert_eq!(board.populate_with_seed(0, 1), Err(BoardError::EmptyAlphabet));
    }

    #[test]
    fn test_populate_with_seed_is_deterministic() {
        let mut a = Board::new(4, 4);
        let mut b = Board::new(4, 4);
        a.populate_with_seed(5, 123).unwrap();
        b.populate_with_seed(5, 123).unwrap();
        assert_eq!(a, b);

        let mut c = Board::new(4, 4);
        c.populate_with_seed(5, 124).unwrap();
        assert_ne!(a, c, "different seeds should produce different boards");
    }

    #[test]
    fn test_populate_cycles_alphabet() {
        // 2x2 board with a 1-symbol alphabet: all four cells hold symbol 0.
        let mut board = Board::new(2, 2);
        board.populate_with_seed(1, 7).unwrap();
        for (r, c) in board.occupied_cells() {
            assert_eq!(board.symbol_at((r, c)), Some(0));
        }
    }

    #[test]
    fn test_clear_pair() {
        let mut board = board_from_str_array(&["01", "10"]).unwrap();
        board.clear_pair((0, 0), (1, 1)).unwrap();
        assert_eq!(board.cell(0, 0), Cell::Empty);
        assert_eq!(board.cell(1, 1), Cell::Empty);
        assert_eq!(board.cell(0, 1), Cell::Symbol(1));
        assert_eq!(board.occupied_cells(), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_clear_pair_out_of_bounds_is_atomic() {
        let mut board = board_from_str_array(&["01", "10"]).unwrap();
        let before = board.clone();
        let err = board.clear_pair((0, 0), (2, 0)).unwrap_err();
        assert_eq!(err, BoardError::OutOfBounds(2, 0, 2, 2));
        assert_eq!(board, before, "no cell may be cleared on a bounds failure");
    }

    #[test]
    fn test_occupied_cells_row_major_and_idempotent() {
        let board = board_from_str_array(&[".1.", "0.0", "..1"]).unwrap();
        let expected = vec![(0, 1), (1, 0), (1, 2), (2, 2)];
        assert_eq!(board.occupied_cells(), expected);
        assert_eq!(board.occupied_cells(), expected);
    }

    #[test]
    fn test_reshuffle_preserves_multiset_and_positions() {
        let mut board = Board::new(4, 6);
        board.populate_with_seed(4, 5).unwrap();
        board.clear_pair((0, 0), (0, 1)).unwrap();

        let positions = board.occupied_cells();
        let counts = symbol_counts(&board);
        board.reshuffle_remaining_with_seed(17);

        assert_eq!(board.occupied_cells(), positions);
        assert_eq!(symbol_counts(&board), counts);
        for (id, count) in symbol_counts(&board) {
            assert_eq!(count % 2, 0, "symbol {} lost parity", id);
        }
    }

    #[test]
    fn test_reshuffle_empty_board_is_noop() {
        let mut board = Board::new(2, 2);
        board.reshuffle_remaining_with_seed(3);
        assert!(board.occupied_cells().is_empty());
    }

    #[test]
    fn test_display_uses_digits_and_dots() {
        let board = board_from_str_array(&["0.", ".1"]).unwrap();
        assert_eq!(format!("{}", board), "0.\n.1");
    }
}
