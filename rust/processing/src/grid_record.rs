// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON record of the input grid
//!
//! ```json
//! {"rows": 2, "cols": 3, "grid": [[1, 0, 0], [0, 1, 1]]}
//! ```
//!
//! `1` is always solid and `0` always empty, whatever polarity the grid was
//! thresholded with. Records holding only the `grid` key are accepted and
//! their dimensions are taken from the data. Files from tools that store
//! white (empty) pixels as `1` load with solid and empty swapped.

use crate::error::{ProcessingError, Result};
use mapmesh_core::{CellState, Grid};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Serialized form of a [`Grid`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<usize>,
    pub grid: Vec<Vec<CellState>>,
}

impl GridRecord {
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            rows: Some(grid.rows()),
            cols: Some(grid.cols()),
            grid: grid.iter_rows().map(|row| row.to_vec()).collect(),
        }
    }

    /// Rebuild the grid, checking the stored dimensions against the data
    pub fn into_grid(self) -> Result<Grid> {
        let grid = Grid::from_rows(self.grid)?;

        if let Some(rows) = self.rows {
            if rows != grid.rows() {
                return Err(mismatch("rows", rows, grid.rows()));
            }
        }
        if let Some(cols) = self.cols {
            if cols != grid.cols() {
                return Err(mismatch("cols", cols, grid.cols()));
            }
        }

        Ok(grid)
    }
}

fn mismatch(field: &str, stored: usize, actual: usize) -> ProcessingError {
    ProcessingError::Grid(mapmesh_core::Error::InvalidGrid(format!(
        "record says {} = {} but the data has {}",
        field, stored, actual
    )))
}

/// Serialize `grid` as a JSON record into `writer`
pub fn write_grid_json<W: Write>(writer: W, grid: &Grid) -> Result<()> {
    serde_json::to_writer(writer, &GridRecord::from_grid(grid))?;
    Ok(())
}

/// Write `grid` as a JSON record at `path`
pub fn write_grid_record(path: &Path, grid: &Grid) -> Result<()> {
    let file = fs::File::create(path).map_err(|e| ProcessingError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_grid_json(&mut writer, grid)?;
    writer.flush().map_err(|e| ProcessingError::io(path, e))?;
    Ok(())
}

/// Read a JSON grid record from `path`
pub fn read_grid_record(path: &Path) -> Result<Grid> {
    let file = fs::File::open(path).map_err(|e| ProcessingError::io(path, e))?;
    let record: GridRecord = serde_json::from_reader(BufReader::new(file))?;
    record.into_grid()
}
