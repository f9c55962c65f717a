// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Loading maps from PNG files on disk
use image::{GrayImage, Luma, Rgba, RgbaImage};
use mapmesh_vision::{load_grid, GridSourceConfig, Polarity, VisionError};

#[test]
fn test_load_grayscale_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.png");

    let mut img = GrayImage::from_pixel(4, 3, Luma([255]));
    img.put_pixel(0, 0, Luma([0]));
    img.put_pixel(3, 2, Luma([0]));
    img.save(&path).unwrap();

    let grid = load_grid(&path, &GridSourceConfig::default()).unwrap();
    assert_eq!(grid.rows(), 3);
    assert_eq!(grid.cols(), 4);
    assert_eq!(grid.solid_count(), 2);
    assert!(grid.is_solid(0, 0));
    assert!(grid.is_solid(2, 3));
}

#[test]
fn test_load_rgba_png_with_inverted_polarity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.png");

    let mut img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
    img.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
    img.save(&path).unwrap();

    let config = GridSourceConfig {
        polarity: Polarity::LightIsSolid,
        ..Default::default()
    };
    let grid = load_grid(&path, &config).unwrap();
    assert_eq!(grid.to_bits(), vec![vec![0, 0], vec![0, 1]]);
}

#[test]
fn test_missing_file_is_an_image_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_grid(dir.path().join("missing.png"), &GridSourceConfig::default());
    assert!(matches!(result, Err(VisionError::Image(_))));
}
