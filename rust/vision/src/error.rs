// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for grid extraction
pub type Result<T> = std::result::Result<T, VisionError>;

/// Errors that can occur while turning a bitmap into a grid
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image has no pixels")]
    EmptyImage,

    #[error(transparent)]
    Grid(#[from] mapmesh_core::Error),
}
