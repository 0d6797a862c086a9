use serde::{Deserialize, Serialize};

/// A single facet with its own three vertex copies.
///
/// Coordinates are widened to `f64` so that accumulated sums over large
/// meshes do not lose precision; storage inside [`Mesh`](crate::Mesh)
/// stays `f32` as in the STL wire format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [[f64; 3]; 3],
}

impl Triangle {
    pub fn new(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3]) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Build from nine consecutive `f32` components (x0 y0 z0 x1 ...).
    pub fn from_f32_chunk(chunk: &[f32]) -> Self {
        let p = |i: usize| {
            [
                chunk[i * 3] as f64,
                chunk[i * 3 + 1] as f64,
                chunk[i * 3 + 2] as f64,
            ]
        };
        Self::new(p(0), p(1), p(2))
    }

    /// Unnormalized face normal `(v1 - v0) x (v2 - v0)`.
    pub fn cross(&self) -> [f64; 3] {
        let [v0, v1, v2] = self.vertices;
        cross(sub(v1, v0), sub(v2, v0))
    }

    /// Area as half the cross-product magnitude.
    pub fn area(&self) -> f64 {
        norm(self.cross()) / 2.0
    }

    /// Unit normal from vertex winding, or the zero vector for a
    /// zero-area facet.
    pub fn normal(&self) -> [f64; 3] {
        let n = self.cross();
        let len = norm(n);
        if len > 1e-12 {
            [n[0] / len, n[1] / len, n[2] / len]
        } else {
            [0.0; 3]
        }
    }

    /// Edge lengths `|v1-v0|`, `|v2-v1|`, `|v0-v2|`.
    pub fn edge_lengths(&self) -> [f64; 3] {
        let [v0, v1, v2] = self.vertices;
        [norm(sub(v1, v0)), norm(sub(v2, v1)), norm(sub(v0, v2))]
    }

    /// Signed volume of the tetrahedron spanned by the facet and the origin.
    pub fn signed_volume(&self) -> f64 {
        let [v0, v1, v2] = self.vertices;
        dot(v0, cross(v1, v2)) / 6.0
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}
