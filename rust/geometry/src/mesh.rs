// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures
//!
//! Axis convention: `x` follows grid columns, `y` is up, `z` follows grid rows.
//! Vertex and normal indices stored in faces are 1-based.

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};

/// One corner of a triangle: a vertex index and a normal index (both 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceCorner {
    pub vertex: u32,
    pub normal: u32,
}

impl FaceCorner {
    #[inline]
    pub fn new(vertex: u32, normal: u32) -> Self {
        Self { vertex, normal }
    }
}

/// Triangle referencing three vertex/normal pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    pub corners: [FaceCorner; 3],
}

impl Face {
    #[inline]
    pub fn new(a: FaceCorner, b: FaceCorner, c: FaceCorner) -> Self {
        Self { corners: [a, b, c] }
    }

    /// Vertex indices of the three corners
    #[inline]
    pub fn vertex_indices(&self) -> [u32; 3] {
        [
            self.corners[0].vertex,
            self.corners[1].vertex,
            self.corners[2].vertex,
        ]
    }

    /// Same triangle with opposite winding
    #[inline]
    pub fn reversed(&self) -> Self {
        Self {
            corners: [self.corners[0], self.corners[2], self.corners[1]],
        }
    }
}

/// Most vertices (or normals) a mesh may hold: face indices are 1-based `u32`
pub const MAX_VERTICES: usize = u32::MAX as usize;

/// 1-based index of the entry at `len - 1`, rejecting counts past [`MAX_VERTICES`]
fn to_index(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        Error::InvalidMesh(format!(
            "{} entries exceed the u32 index limit of {}",
            len, MAX_VERTICES
        ))
    })
}

/// Flat-shaded triangle mesh built from quads
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// Vertex positions, 4 per quad, never shared between quads
    pub vertices: Vec<Point3<f64>>,
    /// One normal per quad
    pub normals: Vec<Vector3<f64>>,
    /// Two triangles per quad
    pub faces: Vec<Face>,
}

/// Normalized `(p1 - p0) x (p2 - p0)`, or the zero vector when the points are degenerate
#[inline]
pub fn face_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    let edge1 = p1 - p0;
    let edge2 = p2 - p0;
    let cross = edge1.cross(&edge2);
    let length = cross.norm();

    if length < f64::EPSILON {
        tracing::debug!(?p0, ?p1, ?p2, "degenerate quad, using zero normal");
        return Vector3::zeros();
    }

    cross / length
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with room for `quad_count` quads
    pub fn with_capacity(quad_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quad_count * 4),
            normals: Vec::with_capacity(quad_count),
            faces: Vec::with_capacity(quad_count * 2),
        }
    }

    /// Append a quad given as 4 ordered corners
    ///
    /// All four corners are appended as new vertices, one flat normal is
    /// computed from the first three, and the quad is fan-triangulated from
    /// its first corner into `(v0, v1, v2)` and `(v0, v2, v3)`.
    ///
    /// Fails without touching the mesh when the new indices would not fit in `u32`.
    #[inline]
    pub fn add_quad(&mut self, corners: [Point3<f64>; 4]) -> Result<()> {
        let v_last = to_index(self.vertices.len() + 4)?;
        let n = to_index(self.normals.len() + 1)?;
        let v0 = v_last - 3;

        let normal = face_normal(&corners[0], &corners[1], &corners[2]);
        self.vertices.extend_from_slice(&corners);
        self.normals.push(normal);

        let corner = |offset: u32| FaceCorner::new(v0 + offset, n);
        self.faces.push(Face::new(corner(0), corner(1), corner(2)));
        self.faces.push(Face::new(corner(0), corner(2), corner(3)));
        Ok(())
    }

    /// Merge another mesh into this one, offsetting its indices
    #[inline]
    pub fn merge(&mut self, other: &Mesh) -> Result<()> {
        if other.is_empty() {
            return Ok(());
        }

        to_index(self.vertices.len() + other.vertices.len())?;
        to_index(self.normals.len() + other.normals.len())?;
        let vertex_offset = to_index(self.vertices.len())?;
        let normal_offset = to_index(self.normals.len())?;

        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.faces.extend(other.faces.iter().map(|face| Face {
            corners: face.corners.map(|c| {
                FaceCorner::new(c.vertex + vertex_offset, c.normal + normal_offset)
            }),
        }));
        Ok(())
    }

    /// Merge several meshes in order
    pub fn merge_all(&mut self, meshes: &[Mesh]) -> Result<()> {
        let total_vertices: usize = meshes.iter().map(|m| m.vertices.len()).sum();
        let total_normals: usize = meshes.iter().map(|m| m.normals.len()).sum();
        let total_faces: usize = meshes.iter().map(|m| m.faces.len()).sum();

        self.vertices.reserve(total_vertices);
        self.normals.reserve(total_normals);
        self.faces.reserve(total_faces);

        for mesh in meshes {
            self.merge(mesh)?;
        }
        Ok(())
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.faces.len() / 2
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Axis-aligned bounds (min, max); origin for an empty mesh
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);

        for p in &self.vertices {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        (min, max)
    }

    /// Check that every face references distinct, in-range vertices and an in-range normal
    pub fn check_indices(&self) -> Result<()> {
        let vertex_count = to_index(self.vertices.len())?;
        let normal_count = to_index(self.normals.len())?;

        for (i, face) in self.faces.iter().enumerate() {
            let [a, b, c] = face.vertex_indices();
            if a == b || b == c || a == c {
                return Err(Error::InvalidMesh(format!(
                    "face {} repeats a vertex index",
                    i
                )));
            }
            for corner in &face.corners {
                if corner.vertex == 0 || corner.vertex > vertex_count {
                    return Err(Error::InvalidMesh(format!(
                        "face {} vertex index {} outside 1..={}",
                        i, corner.vertex, vertex_count
                    )));
                }
                if corner.normal == 0 || corner.normal > normal_count {
                    return Err(Error::InvalidMesh(format!(
                        "face {} normal index {} outside 1..={}",
                        i, corner.normal, normal_count
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> [Point3<f64>; 4] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.check_indices().is_ok());
    }

    #[test]
    fn test_add_quad() {
        let mut mesh = Mesh::new();
        mesh.add_quad(unit_square()).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.normal_count(), 1);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.faces[0].vertex_indices(), [1, 2, 3]);
        assert_eq!(mesh.faces[1].vertex_indices(), [1, 3, 4]);
        assert!(mesh.faces.iter().all(|f| f.corners.iter().all(|c| c.normal == 1)));
        assert_relative_eq!(mesh.normals[0], Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_second_quad_indices() {
        let mut mesh = Mesh::new();
        mesh.add_quad(unit_square()).unwrap();
        mesh.add_quad(unit_square()).unwrap();

        assert_eq!(mesh.faces[2].vertex_indices(), [5, 6, 7]);
        assert_eq!(mesh.faces[3].vertex_indices(), [5, 7, 8]);
        assert_eq!(mesh.faces[3].corners[0].normal, 2);
    }

    #[test]
    fn test_degenerate_normal_is_zero() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(face_normal(&p, &p, &p), Vector3::zeros());

        let collinear = face_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(2.0, 0.0, 0.0),
        );
        assert_eq!(collinear, Vector3::zeros());

        let mut mesh = Mesh::new();
        mesh.add_quad([p, p, p, p]).unwrap();
        assert_eq!(mesh.normals[0], Vector3::zeros());
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = Mesh::new();
        a.add_quad(unit_square()).unwrap();

        let mut b = Mesh::new();
        b.add_quad(unit_square()).unwrap();

        a.merge(&b).unwrap();
        assert_eq!(a.vertex_count(), 8);
        assert_eq!(a.normal_count(), 2);
        assert_eq!(a.faces[2].vertex_indices(), [5, 6, 7]);
        assert_eq!(a.faces[2].corners[0].normal, 2);
        assert!(a.check_indices().is_ok());
    }

    #[test]
    fn test_merge_all_matches_sequential_quads() {
        let mut sequential = Mesh::new();
        let mut parts = Vec::new();
        for i in 0..3 {
            let offset = i as f64;
            let quad = unit_square().map(|p| p + Vector3::new(offset, 0.0, 0.0));
            sequential.add_quad(quad).unwrap();
            let mut part = Mesh::new();
            part.add_quad(quad).unwrap();
            parts.push(part);
        }

        let mut merged = Mesh::new();
        merged.merge_all(&parts).unwrap();
        assert_eq!(merged, sequential);
    }

    #[test]
    fn test_bounds() {
        let mut mesh = Mesh::new();
        mesh.add_quad(unit_square()).unwrap();
        let (min, max) = mesh.bounds();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_check_indices_rejects_out_of_range() {
        let mut mesh = Mesh::new();
        mesh.add_quad(unit_square()).unwrap();
        mesh.faces[0].corners[2].vertex = 9;
        assert!(matches!(mesh.check_indices(), Err(Error::InvalidMesh(_))));

        let mut mesh = Mesh::new();
        mesh.add_quad(unit_square()).unwrap();
        mesh.faces[1].corners[0].normal = 0;
        assert!(mesh.check_indices().is_err());
    }

    #[test]
    fn test_index_limit() {
        assert_eq!(to_index(MAX_VERTICES).unwrap(), u32::MAX);
        assert!(matches!(
            to_index(MAX_VERTICES + 1),
            Err(Error::InvalidMesh(_))
        ));
    }

    #[test]
    fn test_reversed_face() {
        let face = Face::new(
            FaceCorner::new(1, 1),
            FaceCorner::new(2, 1),
            FaceCorner::new(3, 1),
        );
        assert_eq!(face.reversed().vertex_indices(), [1, 3, 2]);
    }
}
