use crate::error::MeshError;
use crate::transform::{ScaleFactor, Translation};
use crate::triangle::Triangle;

/// Components per triangle: 3 vertices x 3 coordinates.
pub const FLOATS_PER_TRIANGLE: usize = 9;

/// An ordered triangle soup stored as a flat `f32` buffer
/// `[x0, y0, z0, x1, y1, z1, x2, y2, z2, ...]`, nine floats per triangle.
///
/// Every mutation bumps [`Mesh::version`], which is what derived-property
/// caches key on.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<f32>,
    version: u64,
}

impl Mesh {
    /// Wrap a flat vertex buffer. The buffer must hold at least one
    /// triangle, a whole number of triangles, and finite values only.
    pub fn from_vertices(vertices: Vec<f32>) -> Result<Self, MeshError> {
        if vertices.is_empty() {
            return Err(MeshError::MalformedBuffer {
                reason: "mesh has no triangles".to_string(),
            });
        }
        if vertices.len() % FLOATS_PER_TRIANGLE != 0 {
            return Err(MeshError::MalformedBuffer {
                reason: format!(
                    "{} floats is not a multiple of {}",
                    vertices.len(),
                    FLOATS_PER_TRIANGLE
                ),
            });
        }
        if let Some(i) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(MeshError::MalformedBuffer {
                reason: format!(
                    "non-finite coordinate in triangle {}",
                    i / FLOATS_PER_TRIANGLE
                ),
            });
        }
        Ok(Self {
            vertices,
            version: 0,
        })
    }

    /// Build from per-triangle vertex triples.
    pub fn from_triangles<I>(triangles: I) -> Result<Self, MeshError>
    where
        I: IntoIterator<Item = [[f32; 3]; 3]>,
    {
        let vertices = triangles
            .into_iter()
            .flat_map(|tri| tri.into_iter().flatten())
            .collect();
        Self::from_vertices(vertices)
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_TRIANGLE
    }

    /// Always `3 * triangle_count()`: vertices are not shared.
    pub fn vertex_count(&self) -> usize {
        self.triangle_count() * 3
    }

    /// The raw flat buffer.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// Monotonic mutation counter, starting at 0.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        let start = index.checked_mul(FLOATS_PER_TRIANGLE)?;
        self.vertices
            .get(start..start + FLOATS_PER_TRIANGLE)
            .map(Triangle::from_f32_chunk)
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.vertices
            .chunks_exact(FLOATS_PER_TRIANGLE)
            .map(Triangle::from_f32_chunk)
    }

    /// Every vertex in storage order, widened to `f64`.
    pub fn points(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|p| [p[0] as f64, p[1] as f64, p[2] as f64])
    }

    /// Multiply every vertex component-wise by `factor`.
    pub fn scale(&mut self, factor: &ScaleFactor) -> Result<(), MeshError> {
        let axes = factor.axes();
        self.apply(|axis, v| v * axes[axis])
    }

    /// Add `offset` to every vertex.
    pub fn translate(&mut self, offset: &Translation) -> Result<(), MeshError> {
        let d = offset.0;
        self.apply(|axis, v| v + d[axis])
    }

    // The new buffer is built aside and swapped in only when every
    // coordinate is still representable, so a failed call leaves the
    // mesh untouched.
    fn apply(&mut self, f: impl Fn(usize, f64) -> f64) -> Result<(), MeshError> {
        let mut next = Vec::with_capacity(self.vertices.len());
        for (i, &v) in self.vertices.iter().enumerate() {
            let out = f(i % 3, v as f64) as f32;
            if !out.is_finite() {
                return Err(MeshError::InvalidArgument {
                    reason: format!(
                        "transform overflows f32 at triangle {}",
                        i / FLOATS_PER_TRIANGLE
                    ),
                });
            }
            next.push(out);
        }
        self.vertices = next;
        self.version += 1;
        Ok(())
    }
}
