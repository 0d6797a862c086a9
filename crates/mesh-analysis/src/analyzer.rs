use std::path::Path;

use mesh_types::{Mesh, ScaleFactor, Translation};
use tracing::{debug, info, instrument};

use crate::error::AnalysisError;
use crate::properties::*;
use crate::report::{render_statistics, ExportFormat};
use crate::tolerance::AnalysisTolerance;

/// Derived values memoized for one mesh version.
#[derive(Debug, Clone, Default)]
struct PropertyCache {
    version: u64,
    surface_area: Option<f64>,
    volume: Option<f64>,
    bounding_box: Option<BoundingBox>,
    center_of_mass: Option<[f64; 3]>,
    triangle_areas: Option<DistributionStats>,
    edge_lengths: Option<DistributionStats>,
    degenerate: Option<Vec<usize>>,
}

/// A mesh plus its lazily computed, memoized properties.
///
/// Volume and validity assume a closed, consistently wound surface but
/// never check it: open meshes produce whatever the formulas yield.
#[derive(Debug, Clone)]
pub struct MeshAnalyzer {
    mesh: Mesh,
    source: Option<String>,
    tolerance: AnalysisTolerance,
    cache: PropertyCache,
}

impl MeshAnalyzer {
    pub fn new(mesh: Mesh, source: Option<String>) -> Self {
        Self::with_tolerance(mesh, source, AnalysisTolerance::default())
    }

    pub fn with_tolerance(
        mesh: Mesh,
        source: Option<String>,
        tolerance: AnalysisTolerance,
    ) -> Self {
        let cache = PropertyCache {
            version: mesh.version(),
            ..Default::default()
        };
        Self {
            mesh,
            source,
            tolerance,
            cache,
        }
    }

    /// Parse STL bytes and wrap the result.
    pub fn from_stl_bytes(bytes: &[u8], source: Option<String>) -> Result<Self, AnalysisError> {
        let mesh = stl_format::parse_stl(bytes)?;
        Ok(Self::new(mesh, source))
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Label of where the mesh came from (usually a file path).
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn tolerance(&self) -> &AnalysisTolerance {
        &self.tolerance
    }

    /// Swap in a freshly loaded mesh, discarding every cached property.
    pub fn replace_mesh(&mut self, mesh: Mesh) {
        self.cache = PropertyCache {
            version: mesh.version(),
            ..Default::default()
        };
        self.mesh = mesh;
    }

    fn cache(&mut self) -> &mut PropertyCache {
        let version = self.mesh.version();
        if self.cache.version != version {
            debug!(
                from = self.cache.version,
                to = version,
                "mesh changed, dropping cached properties"
            );
            self.cache = PropertyCache {
                version,
                ..Default::default()
            };
        }
        &mut self.cache
    }

    // ── Scalar properties ───────────────────────────────────────────────

    /// Sum of triangle areas.
    pub fn surface_area(&mut self) -> f64 {
        if let Some(v) = self.cache().surface_area {
            return v;
        }
        let v = self.mesh.triangles().map(|t| t.area()).sum();
        self.cache.surface_area = Some(v);
        v
    }

    /// Enclosed volume by the divergence theorem. Absolute value, since
    /// winding is not guaranteed consistent.
    pub fn volume(&mut self) -> f64 {
        if let Some(v) = self.cache().volume {
            return v;
        }
        let signed: f64 = self.mesh.triangles().map(|t| t.signed_volume()).sum();
        let v = signed.abs();
        self.cache.volume = Some(v);
        v
    }

    pub fn bounding_box(&mut self) -> BoundingBox {
        if let Some(b) = self.cache().bounding_box {
            return b;
        }
        // A Mesh always holds at least one triangle.
        let b = BoundingBox::from_points(self.mesh.points()).unwrap_or(BoundingBox {
            min: [0.0; 3],
            max: [0.0; 3],
            dimensions: [0.0; 3],
        });
        self.cache.bounding_box = Some(b);
        b
    }

    /// Arithmetic mean of all vertices (vertex weighted, not a solid centroid).
    pub fn center_of_mass(&mut self) -> [f64; 3] {
        if let Some(c) = self.cache().center_of_mass {
            return c;
        }
        let mut sum = [0.0f64; 3];
        for p in self.mesh.points() {
            for i in 0..3 {
                sum[i] += p[i];
            }
        }
        let n = self.mesh.vertex_count().max(1) as f64;
        let c = [sum[0] / n, sum[1] / n, sum[2] / n];
        self.cache.center_of_mass = Some(c);
        c
    }

    // ── Distributions ───────────────────────────────────────────────────

    pub fn triangle_area_stats(&mut self) -> DistributionStats {
        if let Some(s) = self.cache().triangle_areas {
            return s;
        }
        let areas: Vec<f64> = self.mesh.triangles().map(|t| t.area()).collect();
        let s = DistributionStats::from_samples(&areas).unwrap_or(ZERO_STATS);
        self.cache.triangle_areas = Some(s);
        s
    }

    /// Over all three edges of every triangle.
    pub fn edge_length_stats(&mut self) -> DistributionStats {
        if let Some(s) = self.cache().edge_lengths {
            return s;
        }
        let edges: Vec<f64> = self.mesh.triangles().flat_map(|t| t.edge_lengths()).collect();
        let s = DistributionStats::from_samples(&edges).unwrap_or(ZERO_STATS);
        self.cache.edge_lengths = Some(s);
        s
    }

    // ── Ratios ──────────────────────────────────────────────────────────

    /// Longest over shortest bounding-box extent.
    pub fn aspect_ratio(&mut self) -> Option<f64> {
        let [small, _, large] = self.bounding_box().sorted_dimensions();
        (small > self.tolerance.ratio_epsilon).then(|| large / small)
    }

    pub fn surface_area_to_volume_ratio(&mut self) -> Option<f64> {
        let volume = self.volume();
        if volume > self.tolerance.ratio_epsilon {
            Some(self.surface_area() / volume)
        } else {
            None
        }
    }

    // ── Validation ──────────────────────────────────────────────────────

    /// Indices of triangles whose area is below the degenerate threshold.
    pub fn degenerate_triangles(&mut self) -> Vec<usize> {
        if let Some(d) = &self.cache().degenerate {
            return d.clone();
        }
        let threshold = self.tolerance.degenerate_area;
        let d: Vec<usize> = self
            .mesh
            .triangles()
            .enumerate()
            .filter(|(_, t)| t.area() < threshold)
            .map(|(i, _)| i)
            .collect();
        self.cache.degenerate = Some(d.clone());
        d
    }

    /// Degenerate triangles are issues; flat or empty-volume meshes only
    /// warn. Manifoldness and self-intersection are not checked.
    #[instrument(skip(self), fields(source = ?self.source))]
    pub fn validate(&mut self) -> ValidationReport {
        let degenerate = self.degenerate_triangles();
        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        if !degenerate.is_empty() {
            issues.push(format!("Found {} degenerate triangles", degenerate.len()));
        }

        let bounds = self.bounding_box();
        if bounds
            .dimensions
            .iter()
            .any(|&d| d < self.tolerance.small_dimension)
        {
            warnings.push("Mesh has very small dimensions in one or more axes".to_string());
        }

        if self.volume() < self.tolerance.zero_volume {
            warnings.push("Mesh has very small or zero volume".to_string());
        }

        info!(
            degenerate = degenerate.len(),
            warnings = warnings.len(),
            "validated mesh"
        );

        ValidationReport {
            is_valid: issues.is_empty(),
            issues,
            warnings,
            degenerate_triangles: degenerate,
        }
    }

    // ── Snapshots ───────────────────────────────────────────────────────

    #[instrument(skip(self), fields(triangles = self.mesh.triangle_count()))]
    pub fn statistics(&mut self) -> MeshStatistics {
        MeshStatistics {
            triangle_count: self.mesh.triangle_count(),
            vertex_count: self.mesh.vertex_count(),
            surface_area: self.surface_area(),
            volume: self.volume(),
            center_of_mass: self.center_of_mass(),
            bounding_box: self.bounding_box(),
            triangle_areas: self.triangle_area_stats(),
            edge_lengths: self.edge_length_stats(),
            aspect_ratio: self.aspect_ratio(),
            surface_area_to_volume_ratio: self.surface_area_to_volume_ratio(),
        }
    }

    pub fn info(&mut self) -> MeshInfo {
        MeshInfo {
            source: self.source.clone(),
            triangle_count: self.mesh.triangle_count(),
            bounding_box: self.bounding_box(),
            center_of_mass: self.center_of_mass(),
            surface_area: self.surface_area(),
            volume: self.volume(),
        }
    }

    /// Render the statistics snapshot in `format`.
    pub fn export_statistics(&mut self, format: ExportFormat) -> Result<String, AnalysisError> {
        let stats = self.statistics();
        render_statistics(&stats, self.source.as_deref(), format)
    }

    /// Render the statistics snapshot and write it to `path`.
    pub fn export_statistics_to(
        &mut self,
        path: &Path,
        format: ExportFormat,
    ) -> Result<(), AnalysisError> {
        let rendered = self.export_statistics(format)?;
        std::fs::write(path, rendered).map_err(|e| AnalysisError::Write {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    // ── Mutation ────────────────────────────────────────────────────────

    /// Scale by one uniform factor or three per-axis factors.
    pub fn scale(&mut self, components: &[f64]) -> Result<(), AnalysisError> {
        let factor = ScaleFactor::from_components(components)?;
        self.mesh.scale(&factor)?;
        info!(?factor, version = self.mesh.version(), "scaled mesh");
        Ok(())
    }

    /// Translate by exactly three components.
    pub fn translate(&mut self, components: &[f64]) -> Result<(), AnalysisError> {
        let offset = Translation::from_components(components)?;
        self.mesh.translate(&offset)?;
        info!(?offset, version = self.mesh.version(), "translated mesh");
        Ok(())
    }

    /// Current (possibly mutated) mesh as binary STL.
    pub fn to_stl_bytes(&self) -> Vec<u8> {
        let name = self
            .source
            .as_deref()
            .and_then(|s| Path::new(s).file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("mesh");
        stl_format::to_binary_stl(&self.mesh, name)
    }
}

const ZERO_STATS: DistributionStats = DistributionStats {
    min: 0.0,
    max: 0.0,
    mean: 0.0,
    std: 0.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_square() -> MeshAnalyzer {
        let mesh = Mesh::from_triangles([
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
            [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        ])
        .unwrap();
        MeshAnalyzer::new(mesh, None)
    }

    #[test]
    fn flat_mesh_ratios_are_undefined() {
        let mut a = flat_square();
        assert_eq!(a.aspect_ratio(), None);
        assert_eq!(a.surface_area_to_volume_ratio(), None);
        assert_eq!(a.volume(), 0.0);
    }

    #[test]
    fn flat_mesh_warns_but_is_valid() {
        let mut a = flat_square();
        let report = a.validate();
        assert!(report.is_valid);
        assert!(report.issues.is_empty());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn replace_mesh_drops_cache() {
        let mut a = flat_square();
        let before = a.surface_area();
        let bigger = Mesh::from_triangles([[[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]]])
            .unwrap();
        a.replace_mesh(bigger);
        assert_eq!(before, 1.0);
        assert_eq!(a.surface_area(), 8.0);
    }

    #[test]
    fn bad_arity_leaves_mesh_alone() {
        let mut a = flat_square();
        assert!(a.scale(&[1.0, 2.0]).is_err());
        assert!(a.translate(&[1.0]).is_err());
        assert_eq!(a.mesh().version(), 0);
    }

    #[test]
    fn stl_name_from_source_stem() {
        let mut a = flat_square();
        a.source = Some("/tmp/uploads/part.stl".to_string());
        assert!(a.to_stl_bytes().starts_with(b"binary STL: part"));
    }
}
