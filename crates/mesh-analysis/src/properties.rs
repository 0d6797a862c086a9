use serde::{Deserialize, Serialize};

/// Axis-aligned bounds of every vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
    /// `max - min` per axis.
    pub dimensions: [f64; 3],
}

impl BoundingBox {
    /// Fold a point set into its bounds. `None` for an empty set.
    pub fn from_points(points: impl IntoIterator<Item = [f64; 3]>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut min, mut max) = (first, first);
        for p in points {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some(Self {
            min,
            max,
            dimensions: [max[0] - min[0], max[1] - min[1], max[2] - min[2]],
        })
    }

    /// Dimensions in ascending order.
    pub fn sorted_dimensions(&self) -> [f64; 3] {
        let mut d = self.dimensions;
        d.sort_by(f64::total_cmp);
        d
    }
}

/// min / max / mean / population standard deviation of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

impl DistributionStats {
    /// `None` for an empty sample.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &s in samples {
            min = min.min(s);
            max = max.max(s);
            sum += s;
        }
        let mean = sum / n;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            min,
            max,
            mean,
            std: var.sqrt(),
        })
    }

    /// `std / mean`, or 0 when the mean is not positive.
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean > 0.0 {
            self.std / self.mean
        } else {
            0.0
        }
    }
}

/// Full snapshot of every derived property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshStatistics {
    pub triangle_count: usize,
    pub vertex_count: usize,
    pub surface_area: f64,
    pub volume: f64,
    pub center_of_mass: [f64; 3],
    pub bounding_box: BoundingBox,
    pub triangle_areas: DistributionStats,
    pub edge_lengths: DistributionStats,
    /// Longest over shortest bounding-box extent; `None` when flat.
    pub aspect_ratio: Option<f64>,
    /// `None` when the volume is (near) zero.
    pub surface_area_to_volume_ratio: Option<f64>,
}

/// Outcome of mesh validation. Issues make a mesh invalid; warnings do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub degenerate_triangles: Vec<usize>,
}

/// Short summary for listing and inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshInfo {
    pub source: Option<String>,
    pub triangle_count: usize,
    pub bounding_box: BoundingBox,
    pub center_of_mass: [f64; 3],
    pub surface_area: f64,
    pub volume: f64,
}
