// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rectangular solid/empty occupancy grid
//!
//! Row index runs along the Z axis, column index along the X axis.
//! Cell `(0, 0)` sits at the origin.

use crate::error::{Error, Result};

/// State of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "u8", from = "u8"))]
pub enum CellState {
    #[default]
    Empty,
    Solid,
}

impl CellState {
    /// Map a stored bit to a cell state (any non-zero value is solid)
    #[inline]
    pub fn from_bit(bit: u8) -> Self {
        if bit != 0 {
            CellState::Solid
        } else {
            CellState::Empty
        }
    }

    #[inline]
    pub fn to_bit(self) -> u8 {
        match self {
            CellState::Solid => 1,
            CellState::Empty => 0,
        }
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self == CellState::Solid
    }
}

impl From<u8> for CellState {
    fn from(bit: u8) -> Self {
        CellState::from_bit(bit)
    }
}

impl From<CellState> for u8 {
    fn from(state: CellState) -> Self {
        state.to_bit()
    }
}

impl From<bool> for CellState {
    fn from(solid: bool) -> Self {
        if solid {
            CellState::Solid
        } else {
            CellState::Empty
        }
    }
}

/// Immutable rows x cols grid, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Create a grid from row-major cell data
    pub fn new(rows: usize, cols: usize, cells: Vec<CellState>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidGrid(format!(
                "grid must have at least one row and one column, got {}x{}",
                rows, cols
            )));
        }
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            Error::InvalidGrid(format!("grid dimensions {}x{} overflow", rows, cols))
        })?;
        if cells.len() != expected {
            return Err(Error::InvalidGrid(format!(
                "expected {} cells for a {}x{} grid, got {}",
                expected,
                rows,
                cols,
                cells.len()
            )));
        }
        Ok(Self { rows, cols, cells })
    }

    /// Create a grid from nested rows, rejecting empty and ragged input
    pub fn from_rows(rows: Vec<Vec<CellState>>) -> Result<Self> {
        let cols = match rows.first() {
            Some(first) => first.len(),
            None => return Err(Error::InvalidGrid("grid has no rows".to_string())),
        };
        if cols == 0 {
            return Err(Error::InvalidGrid("grid rows are empty".to_string()));
        }

        let row_count = rows.len();
        let mut cells = Vec::with_capacity(row_count * cols);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(Error::InvalidGrid(format!(
                    "row {} has {} cells, expected {}",
                    index,
                    row.len(),
                    cols
                )));
            }
            cells.extend(row);
        }

        Self::new(row_count, cols, cells)
    }

    /// Create a grid with every cell set to `state`
    pub fn filled(rows: usize, cols: usize, state: CellState) -> Result<Self> {
        Self::new(rows, cols, vec![state; rows.saturating_mul(cols)])
    }

    /// Create a grid from 0/1 rows (non-zero is solid)
    pub fn from_bits(rows: Vec<Vec<u8>>) -> Result<Self> {
        Self::from_rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(CellState::from_bit).collect())
                .collect(),
        )
    }

    /// Export the grid as 0/1 rows
    pub fn to_bits(&self) -> Vec<Vec<u8>> {
        self.iter_rows()
            .map(|row| row.iter().map(|cell| cell.to_bit()).collect())
            .collect()
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at `(row, col)`, or `None` when out of bounds
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<CellState> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    #[inline]
    pub fn is_solid(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some_and(CellState::is_solid)
    }

    /// Cell at `(row + dr, col + dc)`, or `None` when that falls outside the grid
    #[inline]
    pub fn neighbor(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<CellState> {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        self.get(r, c)
    }

    /// Number of solid cells
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_solid()).count()
    }

    /// Row-major view of all cells
    #[inline]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Iterate over rows as slices
    pub fn iter_rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.cells.chunks_exact(self.cols)
    }
}
