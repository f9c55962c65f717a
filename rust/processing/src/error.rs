// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the export pipeline.

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Pipeline error types.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Grid record error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Vision(#[from] mapmesh_vision::VisionError),

    #[error(transparent)]
    Grid(#[from] mapmesh_core::Error),

    #[error("Geometry error: {0}")]
    Geometry(String),
}

impl ProcessingError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        ProcessingError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl From<mapmesh_geometry::Error> for ProcessingError {
    fn from(err: mapmesh_geometry::Error) -> Self {
        match err {
            mapmesh_geometry::Error::InvalidParameter(msg) => ProcessingError::InvalidParameter(msg),
            other => ProcessingError::Geometry(other.to_string()),
        }
    }
}
