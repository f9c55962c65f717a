// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grid extrusion - converting an occupancy grid to a box mesh
//!
//! Every solid cell becomes an axis-aligned box of `cell_size` x `height` x
//! `cell_size`. Top and bottom quads are always emitted; a side quad is only
//! emitted when the neighbouring cell is empty or outside the grid, so walls
//! shared by two solid cells never appear in the output.

use crate::error::{Error, Result};
use crate::mesh::{Mesh, MAX_VERTICES};
use mapmesh_core::{CellState, Grid};
use nalgebra::Point3;
use rayon::prelude::*;

/// Side directions as `(row delta, col delta, edge start corner, edge end corner)`,
/// in north, east, south, west order.
///
/// Base corners, counter-clockwise seen from +Y:
/// `0 = (x, z)`, `1 = (x, z + s)`, `2 = (x + s, z + s)`, `3 = (x + s, z)`.
const SIDES: [(isize, isize, usize, usize); 4] = [
    (-1, 0, 3, 0),
    (0, 1, 2, 3),
    (1, 0, 1, 2),
    (0, -1, 0, 1),
];

/// Validated cell size and extrusion height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshParams {
    cell_size: f64,
    height: f64,
}

impl MeshParams {
    /// Both values must be finite and strictly positive
    pub fn new(cell_size: f64, height: f64) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "cell size must be a positive number, got {}",
                cell_size
            )));
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "height must be a positive number, got {}",
                height
            )));
        }
        Ok(Self { cell_size, height })
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Extra geometry added on top of the per-cell boxes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshOptions {
    /// Add a double-sided quad covering the whole grid footprint at y = 0
    pub ground_plane: bool,
}

/// Builds box meshes from occupancy grids
#[derive(Debug, Clone, Copy)]
pub struct MeshBuilder {
    params: MeshParams,
    options: MeshOptions,
}

impl MeshBuilder {
    pub fn new(params: MeshParams) -> Self {
        Self {
            params,
            options: MeshOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MeshOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_ground_plane(mut self, enabled: bool) -> Self {
        self.options.ground_plane = enabled;
        self
    }

    #[inline]
    pub fn params(&self) -> MeshParams {
        self.params
    }

    #[inline]
    pub fn options(&self) -> MeshOptions {
        self.options
    }

    /// Build the mesh, visiting cells in row-major order
    ///
    /// Fails when the grid could produce more vertices than face indices can address.
    pub fn build(&self, grid: &Grid) -> Result<Mesh> {
        let mut mesh = Mesh::with_capacity(quad_budget(grid.solid_count())?);
        for row in 0..grid.rows() {
            self.emit_row(grid, row, &mut mesh)?;
        }
        self.finish(grid, mesh)
    }

    /// Build the mesh with one buffer per row, meshed in parallel
    ///
    /// Row buffers are concatenated in row order, so the result is identical
    /// to [`MeshBuilder::build`].
    pub fn build_parallel(&self, grid: &Grid) -> Result<Mesh> {
        let quads = quad_budget(grid.solid_count())?;

        let row_meshes = (0..grid.rows())
            .into_par_iter()
            .map(|row| {
                let mut mesh = Mesh::new();
                self.emit_row(grid, row, &mut mesh)?;
                Ok(mesh)
            })
            .collect::<Result<Vec<Mesh>>>()?;

        let mut mesh = Mesh::with_capacity(quads);
        mesh.merge_all(&row_meshes)?;
        self.finish(grid, mesh)
    }

    fn emit_row(&self, grid: &Grid, row: usize, mesh: &mut Mesh) -> Result<()> {
        for col in 0..grid.cols() {
            if grid.is_solid(row, col) {
                self.emit_cell(grid, row, col, mesh)?;
            }
        }
        Ok(())
    }

    /// Emit top, bottom, and every exposed side of one solid cell
    fn emit_cell(&self, grid: &Grid, row: usize, col: usize, mesh: &mut Mesh) -> Result<()> {
        let s = self.params.cell_size;
        let h = self.params.height;
        let x = col as f64 * s;
        let z = row as f64 * s;

        let base = [(x, z), (x, z + s), (x + s, z + s), (x + s, z)];
        let bottom = base.map(|(px, pz)| Point3::new(px, 0.0, pz));
        let top = base.map(|(px, pz)| Point3::new(px, h, pz));

        mesh.add_quad(top)?;
        mesh.add_quad([bottom[3], bottom[2], bottom[1], bottom[0]])?;

        for &(dr, dc, a, b) in &SIDES {
            let exposed = match grid.neighbor(row, col, dr, dc) {
                None | Some(CellState::Empty) => true,
                Some(CellState::Solid) => false,
            };
            if exposed {
                mesh.add_quad([bottom[a], bottom[b], top[b], top[a]])?;
            }
        }
        Ok(())
    }

    fn finish(&self, grid: &Grid, mut mesh: Mesh) -> Result<Mesh> {
        if self.options.ground_plane {
            add_ground_plane(grid, self.params.cell_size, &mut mesh)?;
        }

        tracing::debug!(
            rows = grid.rows(),
            cols = grid.cols(),
            solid_cells = grid.solid_count(),
            quads = mesh.quad_count(),
            vertices = mesh.vertex_count(),
            ground_plane = self.options.ground_plane,
            "Built grid mesh"
        );

        Ok(mesh)
    }
}

/// Append the footprint quad at y = 0, facing up, then the same quad facing down
fn add_ground_plane(grid: &Grid, cell_size: f64, mesh: &mut Mesh) -> Result<()> {
    let width = grid.cols() as f64 * cell_size;
    let depth = grid.rows() as f64 * cell_size;

    let front = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, depth),
        Point3::new(width, 0.0, depth),
        Point3::new(width, 0.0, 0.0),
    ];
    let back = [front[3], front[2], front[1], front[0]];

    mesh.add_quad(front)?;
    mesh.add_quad(back)
}

/// Upper bound on quads (6 per solid cell plus the ground plane), checked
/// against the index limit
fn quad_budget(solid_cells: usize) -> Result<usize> {
    let quads = solid_cells
        .checked_mul(6)
        .and_then(|q| q.checked_add(2))
        .filter(|q| q.checked_mul(4).is_some_and(|v| v <= MAX_VERTICES));

    quads.ok_or_else(|| {
        Error::InvalidMesh(format!(
            "{} solid cells could need more than {} vertices",
            solid_cells, MAX_VERTICES
        ))
    })
}

/// Build a box mesh for `grid` without a ground plane
pub fn build_mesh(grid: &Grid, cell_size: f64, height: f64) -> Result<Mesh> {
    let params = MeshParams::new(cell_size, height)?;
    MeshBuilder::new(params).build(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mapmesh_core::CellState::{Empty, Solid};
    use nalgebra::Vector3;

    fn builder(cell_size: f64, height: f64) -> MeshBuilder {
        MeshBuilder::new(MeshParams::new(cell_size, height).unwrap())
    }

    #[test]
    fn test_rejects_non_positive_params() {
        assert!(matches!(
            MeshParams::new(0.0, 1.0),
            Err(Error::InvalidParameter(_))
        ));
        assert!(MeshParams::new(1.0, -2.0).is_err());
        assert!(MeshParams::new(f64::NAN, 1.0).is_err());
        assert!(MeshParams::new(1.0, f64::INFINITY).is_err());
        assert!(build_mesh(&Grid::filled(1, 1, Solid).unwrap(), -1.0, 1.0).is_err());
    }

    #[test]
    fn test_single_cell_cube() {
        let grid = Grid::filled(1, 1, Solid).unwrap();
        let mesh = build_mesh(&grid, 1.0, 1.0).unwrap();

        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.normal_count(), 6);
        assert!(mesh.check_indices().is_ok());
    }

    #[test]
    fn test_single_cell_normals_point_outward() {
        let grid = Grid::filled(1, 1, Solid).unwrap();
        let mesh = build_mesh(&grid, 1.0, 1.0).unwrap();

        // top, bottom, north, east, south, west
        let expected = [
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(-1.0, 0.0, 0.0),
        ];
        for (normal, want) in mesh.normals.iter().zip(expected.iter()) {
            assert_relative_eq!(*normal, *want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_side_quads_lie_on_cell_boundary() {
        let grid = Grid::filled(1, 1, Solid).unwrap();
        let mesh = builder(2.0, 3.0).build(&grid).unwrap();

        // East quad (index 3) sits on x = 2.0, north quad (index 2) on z = 0.0
        let east = &mesh.vertices[12..16];
        assert!(east.iter().all(|p| p.x == 2.0));
        let north = &mesh.vertices[8..12];
        assert!(north.iter().all(|p| p.z == 0.0));

        let (min, max) = mesh.bounds();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(2.0, 3.0, 2.0));
    }

    #[test]
    fn test_adjacent_cells_cull_shared_wall() {
        let grid = Grid::from_rows(vec![vec![Solid, Solid]]).unwrap();
        let mesh = build_mesh(&grid, 1.0, 1.0).unwrap();

        assert_eq!(mesh.quad_count(), 10);
        assert_eq!(mesh.triangle_count(), 20);

        // No quad may lie entirely on the shared plane x = 1
        for quad in mesh.vertices.chunks_exact(4) {
            assert!(!quad.iter().all(|p| p.x == 1.0));
        }
    }

    #[test]
    fn test_vertical_neighbors_cull_shared_wall() {
        let grid = Grid::from_rows(vec![vec![Solid], vec![Solid]]).unwrap();
        let mesh = build_mesh(&grid, 1.0, 1.0).unwrap();
        assert_eq!(mesh.quad_count(), 10);
        for quad in mesh.vertices.chunks_exact(4) {
            assert!(!quad.iter().all(|p| p.z == 1.0));
        }
    }

    #[test]
    fn test_empty_grid_has_no_faces() {
        let grid = Grid::filled(3, 4, Empty).unwrap();
        let mesh = builder(0.5, 1.0).build(&grid).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_empty_grid_with_ground_plane() {
        let grid = Grid::filled(3, 4, Empty).unwrap();
        let mesh = builder(0.5, 1.0).with_ground_plane(true).build(&grid).unwrap();

        assert_eq!(mesh.quad_count(), 2);
        assert_eq!(mesh.triangle_count(), 4);
        assert_relative_eq!(mesh.normals[0], Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(mesh.normals[1], -Vector3::y(), epsilon = 1e-12);

        let (min, max) = mesh.bounds();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(2.0, 0.0, 1.5));
    }

    #[test]
    fn test_ground_plane_is_appended_last() {
        let grid = Grid::filled(1, 1, Solid).unwrap();
        let mesh = builder(1.0, 1.0).with_ground_plane(true).build(&grid).unwrap();

        assert_eq!(mesh.quad_count(), 8);
        let ground = &mesh.vertices[24..28];
        let back = &mesh.vertices[28..32];
        assert!(ground.iter().all(|p| p.y == 0.0));
        assert_eq!(back, &[ground[3], ground[2], ground[1], ground[0]]);
    }

    #[test]
    fn test_hole_exposes_inner_walls() {
        // 3x3 ring: the centre cell is empty
        let grid = Grid::from_bits(vec![vec![1, 1, 1], vec![1, 0, 1], vec![1, 1, 1]]).unwrap();
        let mesh = build_mesh(&grid, 1.0, 1.0).unwrap();

        // 8 cells x (top + bottom) + 12 outer walls + 4 inner walls
        assert_eq!(mesh.quad_count(), 8 * 2 + 12 + 4);
        assert!(mesh.check_indices().is_ok());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let grid = Grid::from_bits(vec![
            vec![1, 0, 1, 1],
            vec![1, 1, 0, 0],
            vec![0, 1, 1, 1],
        ])
        .unwrap();
        let builder = builder(0.25, 2.0).with_ground_plane(true);
        assert_eq!(
            builder.build(&grid).unwrap(),
            builder.build_parallel(&grid).unwrap()
        );
    }

    #[test]
    fn test_quad_budget_respects_index_limit() {
        assert_eq!(quad_budget(0).unwrap(), 2);
        assert_eq!(quad_budget(10).unwrap(), 62);

        let max_cells = (MAX_VERTICES / 4 - 2) / 6;
        assert!(quad_budget(max_cells).is_ok());
        assert!(matches!(
            quad_budget(max_cells + 1),
            Err(Error::InvalidMesh(_))
        ));
        assert!(quad_budget(usize::MAX).is_err());
    }
}
