// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line arguments.
//!
//! Positional arguments are
//! `<image> [save_dir] [cell_size] [height] [obj_filename] [grid_filename]`;
//! anything left out falls back to the environment and then the defaults.

use clap::{Args, Parser, Subcommand};
use mapmesh_processing::{AxisOrder, ExportConfig};
use mapmesh_vision::{GridSourceConfig, Polarity, ThresholdMode};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mapmesh")]
#[command(about = "Turn a black-and-white map image into an extruded 3D OBJ model", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a map image into an OBJ model and a grid record
    Convert {
        /// Map image (PNG or JPEG); black pixels become solid cells
        image: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        /// Grid record file name (must end in .json)
        grid_filename: Option<String>,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        mesh: MeshArgs,
    },
    /// Regenerate the OBJ model from a saved grid record
    Rebuild {
        /// Grid record written by `convert`
        record: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        mesh: MeshArgs,
    },
    /// Print grid and mesh statistics for a grid record
    Info {
        /// Grid record written by `convert`
        record: PathBuf,

        /// Edge length of one cell
        #[arg(long, allow_negative_numbers = true)]
        cell_size: Option<f64>,

        /// Extrusion height of solid cells
        #[arg(long, allow_negative_numbers = true)]
        height: Option<f64>,

        #[command(flatten)]
        mesh: MeshArgs,
    },
}

/// Positional output settings shared by `convert` and `rebuild`
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Directory the files are written to (default: current directory)
    pub save_dir: Option<PathBuf>,

    /// Edge length of one cell
    #[arg(allow_negative_numbers = true)]
    pub cell_size: Option<f64>,

    /// Extrusion height of solid cells
    #[arg(allow_negative_numbers = true)]
    pub height: Option<f64>,

    /// OBJ model file name (must end in .obj)
    pub obj_filename: Option<String>,
}

/// Thresholding options
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Treat light pixels as solid instead of dark ones
    #[arg(long)]
    pub invert: bool,

    /// Dark pixel rule: `zero`, `otsu`, or a level 0-255 (dark below it)
    #[arg(long, default_value = "zero")]
    pub threshold: ThresholdMode,

    /// Remove solid specks up to this radius before meshing
    #[arg(long, value_name = "RADIUS")]
    pub despeckle: Option<u8>,
}

/// Mesh and serializer options
#[derive(Debug, Args)]
pub struct MeshArgs {
    /// Add a double-sided ground quad under the whole map
    #[arg(long)]
    pub ground_plane: bool,

    /// Component order for written positions and normals: `xyz` or `zyx`
    #[arg(long, value_name = "ORDER")]
    pub axis_order: Option<AxisOrder>,

    /// Mesh grid rows in parallel
    #[arg(long)]
    pub parallel: bool,
}

impl SourceArgs {
    pub fn to_config(&self) -> GridSourceConfig {
        GridSourceConfig {
            threshold: self.threshold,
            polarity: if self.invert {
                Polarity::LightIsSolid
            } else {
                Polarity::DarkIsSolid
            },
            despeckle_radius: self.despeckle,
        }
    }
}

impl MeshArgs {
    /// Layer these flags over `config`; unset flags keep the configured value
    pub fn apply(&self, config: &mut ExportConfig) {
        config.ground_plane |= self.ground_plane;
        config.parallel |= self.parallel;
        if let Some(order) = self.axis_order {
            config.axis_order = order;
        }
    }
}

impl OutputArgs {
    pub fn apply(&self, config: &mut ExportConfig) {
        if let Some(dir) = &self.save_dir {
            config.output_dir = dir.clone();
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(name) = &self.obj_filename {
            config.obj_filename = name.clone();
        }
    }
}
