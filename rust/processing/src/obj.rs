// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ writer
//!
//! Meshes are built with `x` along grid columns, `y` up and `z` along grid
//! rows. Any reordering of those components happens here and nowhere else.

use mapmesh_geometry::{Mesh, Point3, Vector3};
use std::io::{self, Write};
use std::str::FromStr;

/// Component order of written positions and normals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisOrder {
    /// `x y z` as built
    #[default]
    Xyz,
    /// `z y x`, swapping the column and row axes
    Zyx,
}

impl AxisOrder {
    /// Whether this order mirrors the model, which flips triangle winding
    #[inline]
    pub fn is_mirrored(self) -> bool {
        matches!(self, AxisOrder::Zyx)
    }

    #[inline]
    fn apply(self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        match self {
            AxisOrder::Xyz => (x, y, z),
            AxisOrder::Zyx => (z, y, x),
        }
    }
}

impl FromStr for AxisOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xyz" => Ok(AxisOrder::Xyz),
            "zyx" => Ok(AxisOrder::Zyx),
            other => Err(format!("unknown axis order '{}', expected xyz or zyx", other)),
        }
    }
}

/// OBJ output options
#[derive(Debug, Clone, Default)]
pub struct ObjOptions {
    pub axis_order: AxisOrder,
    /// Object name written as an `o` line
    pub object_name: Option<String>,
}

/// Write `mesh` as OBJ text: positions, normals, then `v//vn` faces (1-based)
pub fn write_obj<W: Write>(writer: &mut W, mesh: &Mesh, options: &ObjOptions) -> io::Result<()> {
    debug_assert!(mesh.check_indices().is_ok());

    writeln!(writer, "# Generated by mapmesh")?;
    writeln!(
        writer,
        "# {} vertices, {} normals, {} faces",
        mesh.vertex_count(),
        mesh.normal_count(),
        mesh.triangle_count()
    )?;
    writeln!(writer, "# Coordinate system: Y-up, axis order {:?}", options.axis_order)?;
    if let Some(name) = &options.object_name {
        writeln!(writer, "o {}", name)?;
    }

    for p in &mesh.vertices {
        write_position(writer, options.axis_order, p)?;
    }

    for n in &mesh.normals {
        write_normal(writer, options.axis_order, n)?;
    }

    for face in &mesh.faces {
        // Swapping two axes mirrors the model; reverse winding to keep faces outward
        let face = if options.axis_order.is_mirrored() {
            face.reversed()
        } else {
            *face
        };
        let [a, b, c] = face.corners;
        writeln!(
            writer,
            "f {}//{} {}//{} {}//{}",
            a.vertex, a.normal, b.vertex, b.normal, c.vertex, c.normal
        )?;
    }

    Ok(())
}

fn write_position<W: Write>(writer: &mut W, order: AxisOrder, p: &Point3<f64>) -> io::Result<()> {
    let (x, y, z) = order.apply(p.x, p.y, p.z);
    writeln!(writer, "v {:.6} {:.6} {:.6}", x, y, z)
}

fn write_normal<W: Write>(writer: &mut W, order: AxisOrder, n: &Vector3<f64>) -> io::Result<()> {
    let (x, y, z) = order.apply(n.x, n.y, n.z);
    writeln!(writer, "vn {:.6} {:.6} {:.6}", x, y, z)
}
