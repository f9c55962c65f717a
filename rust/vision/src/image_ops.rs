// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Image processing operations for map thresholding
//!
//! Masks produced here are binary: 255 marks a solid cell, 0 an empty one.

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;

pub const SOLID: u8 = 255;
pub const EMPTY: u8 = 0;

/// Morphological dilation - expands white regions
pub fn dilate(image: &GrayImage, radius: u8) -> GrayImage {
    imageproc::morphology::dilate(image, Norm::L1, radius)
}

/// Morphological erosion - shrinks white regions
pub fn erode(image: &GrayImage, radius: u8) -> GrayImage {
    imageproc::morphology::erode(image, Norm::L1, radius)
}

/// Morphological opening (erode then dilate) - removes small noise
pub fn morphological_open(image: &GrayImage, radius: u8) -> GrayImage {
    let eroded = erode(image, radius);
    dilate(&eroded, radius)
}

/// Convert RGBA bytes to grayscale image
///
/// Pixels missing from a short buffer stay black.
pub fn rgba_to_grayscale(rgba: &[u8], width: u32, height: u32) -> GrayImage {
    let mut gray = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let i = ((y * width + x) * 4) as usize;
            if i + 2 < rgba.len() {
                let r = rgba[i] as f32;
                let g = rgba[i + 1] as f32;
                let b = rgba[i + 2] as f32;
                // Standard luminance formula (ITU-R BT.601)
                let luma = (0.299 * r + 0.587 * g + 0.114 * b).round() as u8;
                gray.put_pixel(x, y, Luma([luma]));
            }
        }
    }

    gray
}

/// Binary mask of pixels for which `is_dark` holds
pub fn dark_mask<F>(image: &GrayImage, is_dark: F) -> GrayImage
where
    F: Fn(u8) -> bool,
{
    let mut result = GrayImage::new(image.width(), image.height());

    for (x, y, pixel) in image.enumerate_pixels() {
        let value = if is_dark(pixel.0[0]) { SOLID } else { EMPTY };
        result.put_pixel(x, y, Luma([value]));
    }

    result
}

/// Otsu's optimal threshold level; pixels at or below it form the dark class
pub fn otsu_level(image: &GrayImage) -> u8 {
    imageproc::contrast::otsu_level(image)
}
