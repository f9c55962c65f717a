// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # mapmesh Core
//!
//! Occupancy grid model shared by the mapmesh crates.
//!
//! A [`Grid`] is a rectangular map of [`CellState::Solid`] and
//! [`CellState::Empty`] cells. Construction validates the shape, so every
//! `Grid` value is non-empty and rectangular.
//!
//! ## Quick Start
//!
//! ```rust
//! use mapmesh_core::{CellState, Grid};
//!
//! let grid = Grid::from_bits(vec![vec![1, 1], vec![0, 1]]).unwrap();
//! assert_eq!(grid.solid_count(), 3);
//! assert_eq!(grid.get(1, 0), Some(CellState::Empty));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for [`CellState`]

pub mod error;
pub mod grid;

pub use error::{Error, Result};
pub use grid::{CellState, Grid};
