use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{require_non_negative, require_positive, CalcError};

/// Unit the mesh coordinates were authored in, cubed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeUnit {
    #[default]
    Mm3,
    Cm3,
}

impl FromStr for VolumeUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mm3" => Ok(Self::Mm3),
            "cm3" => Ok(Self::Cm3),
            _ => Err(CalcError::UnsupportedValue {
                kind: "volume unit",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mm3 => f.write_str("mm3"),
            Self::Cm3 => f.write_str("cm3"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResinParams {
    pub density_g_cm3: f64,
    pub price_per_kg: f64,
    #[serde(default)]
    pub volume_unit: VolumeUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResinCostEstimate {
    pub volume_mm3: f64,
    pub volume_cm3: f64,
    pub mass_g: f64,
    pub mass_kg: f64,
    pub cost: f64,
}

/// Resin mass and cost for printing a solid of `volume` (in `params.volume_unit`).
///
/// `volume_mm3` echoes the input volume unconverted.
pub fn estimate_resin_cost(
    volume: f64,
    params: &ResinParams,
) -> Result<ResinCostEstimate, CalcError> {
    require_non_negative("volume", volume)?;
    require_positive("density_g_cm3", params.density_g_cm3)?;
    require_positive("price_per_kg", params.price_per_kg)?;

    let volume_cm3 = match params.volume_unit {
        VolumeUnit::Mm3 => volume / 1000.0,
        VolumeUnit::Cm3 => volume,
    };
    let mass_g = volume_cm3 * params.density_g_cm3;
    let mass_kg = mass_g / 1000.0;
    let cost = mass_kg * params.price_per_kg;

    debug!(volume_cm3, mass_g, cost, "estimated resin cost");

    Ok(ResinCostEstimate {
        volume_mm3: volume,
        volume_cm3,
        mass_g,
        mass_kg,
        cost,
    })
}
