// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Occupancy grid extraction from map bitmaps
//!
//! This crate turns a single-channel bitmap (a drawn or scanned floor plan,
//! a robot map) into a [`Grid`](mapmesh_core::Grid):
//! 1. Load the image and convert it to 8-bit grayscale
//! 2. Classify every pixel as dark or light ([`ThresholdMode`])
//! 3. Map dark/light to solid/empty ([`Polarity`], black is solid by default)
//! 4. Optionally remove isolated specks with a morphological opening
//!
//! # Usage
//!
//! ```rust,ignore
//! use mapmesh_vision::{load_grid, GridSourceConfig};
//!
//! let grid = load_grid("map.png", &GridSourceConfig::default())?;
//! println!("{}x{} grid, {} solid cells", grid.rows(), grid.cols(), grid.solid_count());
//! ```

pub mod error;
pub mod grid_source;
pub mod image_ops;

pub use error::{Result, VisionError};
pub use grid_source::{
    grid_from_image, load_grayscale, load_grid, solid_mask, GridSourceConfig, Polarity,
    ThresholdMode,
};
pub use image_ops::rgba_to_grayscale;

use image::GrayImage;

/// Convert raw RGBA pixel data into a grid
///
/// Convenience function that converts RGBA to grayscale and thresholds it.
pub fn grid_from_rgba(
    rgba_data: &[u8],
    width: u32,
    height: u32,
    config: &GridSourceConfig,
) -> Result<mapmesh_core::Grid> {
    let grayscale: GrayImage = rgba_to_grayscale(rgba_data, width, height);
    grid_from_image(&grayscale, config)
}
