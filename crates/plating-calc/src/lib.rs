//! Domain calculators layered on mesh geometry: 3D-print resin cost and
//! electroplating process parameters, plus a table of plating-metal presets.
//!
//! Every calculator is a pure function of a [`PlatingGeometry`] (or a bare
//! volume) and a typed parameter struct.

pub mod electroplating;
pub mod error;
pub mod geometry;
pub mod metals;
pub mod resin;

pub use electroplating::*;
pub use error::CalcError;
pub use geometry::PlatingGeometry;
pub use metals::{recommend_for_metal, Metal, MetalPreset, MetalRecommendation};
pub use resin::{estimate_resin_cost, ResinCostEstimate, ResinParams, VolumeUnit};
