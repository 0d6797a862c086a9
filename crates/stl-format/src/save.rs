//! STL encoding. Facet normals are always recomputed from vertex winding.

use mesh_types::{Mesh, Triangle};

use crate::{HEADER_SIZE, TRIANGLE_SIZE};

/// Serialize a mesh as binary STL.
///
/// Layout:
/// - 80-byte header (`name`, zero padded)
/// - u32 triangle count (little-endian)
/// - per triangle: 3×f32 normal + 3×(3×f32 vertex) + u16 attribute = 50 bytes
pub fn to_binary_stl(mesh: &Mesh, name: &str) -> Vec<u8> {
    let tri_count = mesh.triangle_count();
    let mut buf = Vec::with_capacity(HEADER_SIZE + 4 + tri_count * TRIANGLE_SIZE);

    let header = format!("binary STL: {name}");
    let header_bytes = header.as_bytes();
    buf.extend_from_slice(&header_bytes[..header_bytes.len().min(HEADER_SIZE)]);
    buf.resize(HEADER_SIZE, 0u8);

    buf.extend_from_slice(&(tri_count as u32).to_le_bytes());

    for (tri, raw) in mesh
        .triangles()
        .zip(mesh.vertices().chunks_exact(9))
    {
        for n in facet_normal(&tri) {
            buf.extend_from_slice(&n.to_le_bytes());
        }
        // Vertices are written from the stored f32 values, not the widened copy.
        for v in raw {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    buf
}

/// Serialize a mesh as ASCII STL.
pub fn to_ascii_stl(mesh: &Mesh, name: &str) -> String {
    let mut out = String::with_capacity(mesh.triangle_count() * 256);
    out.push_str(&format!("solid {name}\n"));

    for (tri, raw) in mesh
        .triangles()
        .zip(mesh.vertices().chunks_exact(9))
    {
        let [nx, ny, nz] = facet_normal(&tri);
        out.push_str(&format!("  facet normal {nx:e} {ny:e} {nz:e}\n"));
        out.push_str("    outer loop\n");
        for v in raw.chunks_exact(3) {
            out.push_str(&format!("      vertex {:e} {:e} {:e}\n", v[0], v[1], v[2]));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    out.push_str(&format!("endsolid {name}\n"));
    out
}

fn facet_normal(tri: &Triangle) -> [f32; 3] {
    let n = tri.normal();
    [n[0] as f32, n[1] as f32, n[2] as f32]
}
