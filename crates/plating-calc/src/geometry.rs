use mesh_analysis::{MeshAnalyzer, MeshStatistics};
use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, CalcError};

/// The geometric inputs the calculators read. Lengths are in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatingGeometry {
    pub surface_area_mm2: f64,
    pub volume_mm3: f64,
    /// `None` for flat meshes.
    pub aspect_ratio: Option<f64>,
    /// `None` for zero-volume meshes.
    pub surface_area_to_volume_ratio: Option<f64>,
    /// Coefficient of variation of triangle areas.
    pub triangle_area_cv: f64,
}

impl PlatingGeometry {
    pub fn from_statistics(stats: &MeshStatistics) -> Self {
        Self {
            surface_area_mm2: stats.surface_area,
            volume_mm3: stats.volume,
            aspect_ratio: stats.aspect_ratio,
            surface_area_to_volume_ratio: stats.surface_area_to_volume_ratio,
            triangle_area_cv: stats.triangle_areas.coefficient_of_variation(),
        }
    }

    /// Reads (and memoizes) only the properties the calculators need.
    pub fn from_analyzer(analyzer: &mut MeshAnalyzer) -> Self {
        Self {
            surface_area_mm2: analyzer.surface_area(),
            volume_mm3: analyzer.volume(),
            aspect_ratio: analyzer.aspect_ratio(),
            surface_area_to_volume_ratio: analyzer.surface_area_to_volume_ratio(),
            triangle_area_cv: analyzer.triangle_area_stats().coefficient_of_variation(),
        }
    }

    /// Geometry known only by its area, as when the caller supplies it directly.
    pub fn from_surface_area(surface_area_mm2: f64) -> Self {
        Self {
            surface_area_mm2,
            volume_mm3: 0.0,
            aspect_ratio: None,
            surface_area_to_volume_ratio: None,
            triangle_area_cv: 0.0,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), CalcError> {
        require_non_negative("surface_area_mm2", self.surface_area_mm2)?;
        require_non_negative("volume_mm3", self.volume_mm3)?;
        require_non_negative("triangle_area_cv", self.triangle_area_cv)
    }

    /// `1 + 0.5 * cv`, capped at 1.5. 1.0 means uniformly sized facets.
    pub fn surface_roughness_factor(&self) -> f64 {
        (1.0 + 0.5 * self.triangle_area_cv).min(1.5)
    }

    /// Heuristic share of the surface that plates evenly, in `[0.7, 1.0)`.
    ///
    /// An undefined aspect ratio counts as 1.0, an undefined SA/V ratio as 0.
    pub fn coverage_efficiency(&self) -> f64 {
        let aspect = self.aspect_ratio.unwrap_or(1.0);
        let sa_v = self.surface_area_to_volume_ratio.unwrap_or(0.0);
        let aspect_factor = (aspect / 10.0).min(1.0);
        let sa_v_factor = (sa_v / 10.0).min(1.0);
        (1.0 - 0.15 * aspect_factor - 0.15 * sa_v_factor).max(0.7)
    }
}
