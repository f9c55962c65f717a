// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Occupancy grids from grayscale bitmaps
//!
//! Each pixel becomes one cell: image row `y` is grid row `y`, image column
//! `x` is grid column `x`. A pixel is first classified as dark or light by
//! the [`ThresholdMode`], then mapped to a cell state by the [`Polarity`].

use crate::error::{Result, VisionError};
use crate::image_ops::{dark_mask, morphological_open, otsu_level, SOLID};
use image::GrayImage;
use mapmesh_core::{CellState, Grid};
use std::path::Path;
use std::str::FromStr;

/// How a pixel intensity is classified as dark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdMode {
    /// Dark only when the intensity is exactly 0
    #[default]
    Zero,
    /// Dark when the intensity is below the level
    Level(u8),
    /// Dark when the intensity is at or below Otsu's level for the image
    Otsu,
}

impl FromStr for ThresholdMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(ThresholdMode::Zero),
            "otsu" => Ok(ThresholdMode::Otsu),
            other => other
                .parse::<u8>()
                .map(ThresholdMode::Level)
                .map_err(|_| format!("expected 'zero', 'otsu' or a level 0-255, got '{}'", s)),
        }
    }
}

/// Which pixel class becomes a solid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// Black pixels are solid tiles
    #[default]
    DarkIsSolid,
    LightIsSolid,
}

/// Grid extraction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridSourceConfig {
    pub threshold: ThresholdMode,
    pub polarity: Polarity,
    /// Radius of a morphological opening applied to the solid mask
    pub despeckle_radius: Option<u8>,
}

/// Convert a grayscale bitmap into an occupancy grid
pub fn grid_from_image(image: &GrayImage, config: &GridSourceConfig) -> Result<Grid> {
    if image.width() == 0 || image.height() == 0 {
        return Err(VisionError::EmptyImage);
    }

    let mask = solid_mask(image, config);
    let cols = mask.width() as usize;
    let rows = mask.height() as usize;

    let cells = mask
        .pixels()
        .map(|pixel| CellState::from(pixel.0[0] == SOLID))
        .collect();

    Ok(Grid::new(rows, cols, cells)?)
}

/// Binary mask with 255 for solid cells, after thresholding, polarity and despeckling
pub fn solid_mask(image: &GrayImage, config: &GridSourceConfig) -> GrayImage {
    let is_dark: Box<dyn Fn(u8) -> bool> = match config.threshold {
        ThresholdMode::Zero => Box::new(|v| v == 0),
        ThresholdMode::Level(level) => Box::new(move |v| v < level),
        ThresholdMode::Otsu => {
            let level = otsu_level(image);
            Box::new(move |v| v <= level)
        }
    };

    let mask = match config.polarity {
        Polarity::DarkIsSolid => dark_mask(image, is_dark),
        Polarity::LightIsSolid => dark_mask(image, |v| !is_dark(v)),
    };

    match config.despeckle_radius {
        Some(radius) if radius > 0 => morphological_open(&mask, radius),
        _ => mask,
    }
}

/// Load an image file and convert it to 8-bit grayscale
pub fn load_grayscale(path: impl AsRef<Path>) -> Result<GrayImage> {
    let image = image::open(path.as_ref())?;
    Ok(image.to_luma8())
}

/// Load an image file and convert it straight to a grid
pub fn load_grid(path: impl AsRef<Path>, config: &GridSourceConfig) -> Result<Grid> {
    let grayscale = load_grayscale(path)?;
    grid_from_image(&grayscale, config)
}
