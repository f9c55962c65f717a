// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export configuration loaded from environment variables.

use crate::error::{ProcessingError, Result};
use crate::obj::AxisOrder;
use mapmesh_geometry::{MeshOptions, MeshParams};
use std::path::{Path, PathBuf};

pub const DEFAULT_CELL_SIZE: f64 = 0.1;
pub const DEFAULT_HEIGHT: f64 = 0.5;
pub const DEFAULT_OBJ_FILENAME: &str = "model.obj";
pub const DEFAULT_GRID_FILENAME: &str = "grid.json";

/// Mesh and output settings for one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Edge length of one grid cell.
    pub cell_size: f64,
    /// Extrusion height of solid cells.
    pub height: f64,
    /// Directory the OBJ and grid files are written to.
    pub output_dir: PathBuf,
    /// File name of the OBJ model (must end in `.obj`).
    pub obj_filename: String,
    /// File name of the grid record (must end in `.json`).
    pub grid_filename: String,
    /// Add a double-sided ground quad under the whole grid.
    pub ground_plane: bool,
    /// Component order used when writing positions and normals.
    pub axis_order: AxisOrder,
    /// Mesh rows in parallel.
    pub parallel: bool,
}

impl ExportConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to the defaults; a variable that is set but
    /// does not parse is an `InvalidParameter` error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            cell_size: parse_var(&lookup, "MAPMESH_CELL_SIZE", |v| v.parse().ok())?
                .unwrap_or(defaults.cell_size),
            height: parse_var(&lookup, "MAPMESH_HEIGHT", |v| v.parse().ok())?
                .unwrap_or(defaults.height),
            output_dir: lookup("MAPMESH_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            obj_filename: lookup("MAPMESH_OBJ_FILENAME").unwrap_or(defaults.obj_filename),
            grid_filename: lookup("MAPMESH_GRID_FILENAME").unwrap_or(defaults.grid_filename),
            ground_plane: parse_var(&lookup, "MAPMESH_GROUND_PLANE", parse_flag)?
                .unwrap_or(defaults.ground_plane),
            axis_order: parse_var(&lookup, "MAPMESH_AXIS_ORDER", |v| v.parse().ok())?
                .unwrap_or(defaults.axis_order),
            parallel: parse_var(&lookup, "MAPMESH_PARALLEL", parse_flag)?
                .unwrap_or(defaults.parallel),
        })
    }

    /// Reject values that must never reach the mesh builder or the filesystem.
    pub fn validate(&self) -> Result<()> {
        self.mesh_params()?;
        check_extension(&self.obj_filename, "obj")?;
        check_extension(&self.grid_filename, "json")?;

        if !self.output_dir.is_dir() {
            return Err(ProcessingError::InvalidParameter(format!(
                "output directory '{}' does not exist",
                self.output_dir.display()
            )));
        }

        Ok(())
    }

    /// Validated cell size and height.
    pub fn mesh_params(&self) -> Result<MeshParams> {
        Ok(MeshParams::new(self.cell_size, self.height)?)
    }

    pub fn mesh_options(&self) -> MeshOptions {
        MeshOptions {
            ground_plane: self.ground_plane,
        }
    }

    pub fn obj_path(&self) -> PathBuf {
        self.output_dir.join(&self.obj_filename)
    }

    pub fn grid_path(&self) -> PathBuf {
        self.output_dir.join(&self.grid_filename)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            height: DEFAULT_HEIGHT,
            output_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            obj_filename: DEFAULT_OBJ_FILENAME.to_string(),
            grid_filename: DEFAULT_GRID_FILENAME.to_string(),
            ground_plane: false,
            axis_order: AxisOrder::default(),
            parallel: false,
        }
    }
}

/// `Ok(None)` when `key` is unset, an error when it is set but `parse` rejects it
fn parse_var<F, T, P>(lookup: &F, key: &str, parse: P) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => parse(raw.trim()).map(Some).ok_or_else(|| {
            ProcessingError::InvalidParameter(format!("{} has an invalid value '{}'", key, raw))
        }),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn check_extension(filename: &str, expected: &str) -> Result<()> {
    let matches = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == expected);

    if matches {
        Ok(())
    } else {
        Err(ProcessingError::InvalidParameter(format!(
            "file name '{}' must have the .{} extension",
            filename, expected
        )))
    }
}
