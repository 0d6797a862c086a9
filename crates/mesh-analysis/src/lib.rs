//! Geometric property engine over a triangle-soup [`Mesh`](mesh_types::Mesh).
//!
//! [`MeshAnalyzer`] owns one mesh and memoizes every derived property
//! against the mesh version. Any mutation discards the whole cache.

pub mod analyzer;
pub mod error;
pub mod properties;
pub mod report;
pub mod tolerance;

pub use analyzer::MeshAnalyzer;
pub use error::AnalysisError;
pub use properties::*;
pub use report::{render_statistics, ExportFormat};
pub use tolerance::AnalysisTolerance;
