/// Thresholds separating "tiny" from "zero" in validation and ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisTolerance {
    /// Triangles with area below this are degenerate.
    pub degenerate_area: f64,
    /// Bounding-box extents below this raise a warning.
    pub small_dimension: f64,
    /// Volumes below this raise a warning.
    pub zero_volume: f64,
    /// Divisors at or below this make a ratio undefined.
    pub ratio_epsilon: f64,
}

impl Default for AnalysisTolerance {
    fn default() -> Self {
        Self {
            degenerate_area: 1e-10,
            small_dimension: 1e-6,
            zero_volume: 1e-10,
            ratio_epsilon: 1e-12,
        }
    }
}
