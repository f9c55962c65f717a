// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Map-to-mesh export pipeline.
//!
//! Every entry point validates its configuration and loads its grid before
//! touching the output directory. Output files are written to temporary
//! files in that directory and only renamed into place once all of them
//! were written, so a failed run leaves no partial export behind.

use crate::config::ExportConfig;
use crate::error::{ProcessingError, Result};
use crate::grid_record::{read_grid_record, write_grid_json};
use crate::obj::{write_obj, ObjOptions};
use mapmesh_core::Grid;
use mapmesh_geometry::{Mesh, MeshBuilder};
use mapmesh_vision::{load_grid, GridSourceConfig};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// What an export produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub rows: usize,
    pub cols: usize,
    pub solid_cells: usize,
    pub vertices: usize,
    pub normals: usize,
    pub faces: usize,
    pub obj_path: PathBuf,
    /// `None` when the grid record was not (re)written.
    pub grid_path: Option<PathBuf>,
}

impl ExportSummary {
    fn new(grid: &Grid, mesh: &Mesh, obj_path: PathBuf, grid_path: Option<PathBuf>) -> Self {
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            solid_cells: grid.solid_count(),
            vertices: mesh.vertex_count(),
            normals: mesh.normal_count(),
            faces: mesh.triangle_count(),
            obj_path,
            grid_path,
        }
    }
}

/// Build the mesh for `grid` with the configured parameters.
pub fn mesh_for_config(grid: &Grid, config: &ExportConfig) -> Result<Mesh> {
    let builder = MeshBuilder::new(config.mesh_params()?).with_options(config.mesh_options());

    let start = Instant::now();
    let mesh = if config.parallel {
        builder.build_parallel(grid)?
    } else {
        builder.build(grid)?
    };

    tracing::info!(
        rows = grid.rows(),
        cols = grid.cols(),
        solid_cells = grid.solid_count(),
        vertices = mesh.vertex_count(),
        faces = mesh.triangle_count(),
        parallel = config.parallel,
        mesh_time_ms = start.elapsed().as_millis() as u64,
        "Mesh generated"
    );

    Ok(mesh)
}

/// Threshold an image into a grid, then write the OBJ model and the grid record.
pub fn convert_image(
    image_path: &Path,
    source: &GridSourceConfig,
    config: &ExportConfig,
) -> Result<ExportSummary> {
    config.validate()?;

    tracing::info!(image = %image_path.display(), ?source, "Loading map image");
    let grid = load_grid(image_path, source)?;
    tracing::info!(
        rows = grid.rows(),
        cols = grid.cols(),
        solid_cells = grid.solid_count(),
        "Generated grid from image"
    );

    let mesh = mesh_for_config(&grid, config)?;

    let obj_path = config.obj_path();
    let grid_path = config.grid_path();
    let staged_obj = stage_model(&mesh, config)?;
    let staged_grid = stage(config, &grid_path, |writer| write_grid_json(writer, &grid))?;

    commit(staged_grid, &grid_path)?;
    if let Err(err) = commit(staged_obj, &obj_path) {
        if let Err(cleanup) = fs::remove_file(&grid_path) {
            tracing::warn!(path = %grid_path.display(), error = %cleanup, "Could not remove grid file");
        }
        return Err(err);
    }
    tracing::info!(path = %obj_path.display(), axis_order = ?config.axis_order, "OBJ file saved");
    tracing::info!(path = %grid_path.display(), "Grid file saved");

    Ok(ExportSummary::new(&grid, &mesh, obj_path, Some(grid_path)))
}

/// Regenerate the OBJ model from a saved grid record.
pub fn rebuild_from_record(record_path: &Path, config: &ExportConfig) -> Result<ExportSummary> {
    config.validate()?;

    let grid = read_grid_record(record_path)?;
    tracing::info!(
        record = %record_path.display(),
        rows = grid.rows(),
        cols = grid.cols(),
        "Loaded grid record"
    );

    let mesh = mesh_for_config(&grid, config)?;
    let obj_path = config.obj_path();
    commit(stage_model(&mesh, config)?, &obj_path)?;
    tracing::info!(path = %obj_path.display(), axis_order = ?config.axis_order, "OBJ file saved");

    Ok(ExportSummary::new(&grid, &mesh, obj_path, None))
}

fn stage_model(mesh: &Mesh, config: &ExportConfig) -> Result<NamedTempFile> {
    let obj_path = config.obj_path();
    let options = ObjOptions {
        axis_order: config.axis_order,
        object_name: Path::new(&config.obj_filename)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string),
    };

    stage(config, &obj_path, |writer| {
        write_obj(writer, mesh, &options).map_err(|e| ProcessingError::io(&obj_path, e))
    })
}

/// Write one output into a temporary file next to its final `target`
fn stage<F>(config: &ExportConfig, target: &Path, write: F) -> Result<NamedTempFile>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let mut staged = tempfile::Builder::new()
        .prefix(".mapmesh-")
        .suffix(".partial")
        .tempfile_in(&config.output_dir)
        .map_err(|e| ProcessingError::io(&config.output_dir, e))?;

    let mut writer = BufWriter::new(staged.as_file_mut());
    write(&mut writer)?;
    writer.flush().map_err(|e| ProcessingError::io(target, e))?;
    drop(writer);

    Ok(staged)
}

/// Rename a staged file onto `target`; on failure the staged file is deleted
fn commit(staged: NamedTempFile, target: &Path) -> Result<()> {
    staged
        .persist(target)
        .map_err(|e| ProcessingError::io(target, e.error))?;
    Ok(())
}
