//! Electroplating process estimate: current, time, metal, power, cost.
//!
//! Current density is in A/in², thickness in µm, areas from the mesh in mm².

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{require_non_negative, require_positive, CalcError};
use crate::geometry::PlatingGeometry;

// ── Unit conversions ────────────────────────────────────────────────────────

pub const MM2_PER_IN2: f64 = 645.16;
pub const MM2_PER_CM2: f64 = 100.0;
pub const MICRONS_PER_INCH: f64 = 25_400.0;
pub const MICRONS_PER_CM: f64 = 10_000.0;

// ── Parameters ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectroplatingParams {
    pub current_density_min: f64,
    pub current_density_max: f64,
    pub thickness_microns: f64,
    pub metal_density_g_cm3: f64,
    /// Fraction of current that deposits metal, in (0, 1].
    pub current_efficiency: f64,
    pub voltage: f64,
    pub electricity_cost_per_kwh: f64,
    pub solution_cost_per_g: f64,
}

impl Default for ElectroplatingParams {
    /// Copper on a standard bath.
    fn default() -> Self {
        Self {
            current_density_min: 0.07,
            current_density_max: 0.1,
            thickness_microns: 20.0,
            metal_density_g_cm3: 8.96,
            current_efficiency: 0.95,
            voltage: 3.0,
            electricity_cost_per_kwh: 0.12,
            solution_cost_per_g: 0.05,
        }
    }
}

impl ElectroplatingParams {
    pub fn validate(&self) -> Result<(), CalcError> {
        require_positive("current_density_min", self.current_density_min)?;
        require_positive("current_density_max", self.current_density_max)?;
        if self.current_density_min > self.current_density_max {
            return Err(CalcError::invalid(
                "current_density_min",
                format!(
                    "{} exceeds current_density_max {}",
                    self.current_density_min, self.current_density_max
                ),
            ));
        }
        require_positive("thickness_microns", self.thickness_microns)?;
        require_positive("metal_density_g_cm3", self.metal_density_g_cm3)?;
        require_positive("current_efficiency", self.current_efficiency)?;
        if self.current_efficiency > 1.0 {
            return Err(CalcError::invalid(
                "current_efficiency",
                format!("must be <= 1, got {}", self.current_efficiency),
            ));
        }
        require_positive("voltage", self.voltage)?;
        require_non_negative("electricity_cost_per_kwh", self.electricity_cost_per_kwh)?;
        require_non_negative("solution_cost_per_g", self.solution_cost_per_g)
    }
}

// ── Result records ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceAreaBreakdown {
    pub mm2: f64,
    pub cm2: f64,
    pub in2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentDensityRange {
    pub min: f64,
    pub max: f64,
    pub recommended: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentRequirements {
    pub min_amps: f64,
    pub max_amps: f64,
    pub recommended_amps: f64,
    pub current_density_range: CurrentDensityRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatingParameters {
    pub thickness_microns: f64,
    pub thickness_inches: f64,
    pub plating_time_minutes: f64,
    pub plating_time_hours: f64,
    pub plating_rate_inches_per_min: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequirements {
    /// Already divided by the coverage efficiency.
    pub metal_mass_g: f64,
    pub metal_mass_kg: f64,
    pub metal_volume_cm3: f64,
    pub metal_density_g_cm3: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerRequirements {
    pub voltage: f64,
    pub power_watts: f64,
    pub energy_wh: f64,
    pub energy_kwh: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimates {
    pub electricity_cost: f64,
    pub solution_cost: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityFactors {
    pub surface_roughness_factor: f64,
    pub coverage_efficiency: f64,
    pub current_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub current_setting: String,
    pub voltage_setting: String,
    pub time_setting: String,
    pub surface_preparation: String,
    pub solution_temperature: String,
    pub agitation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectroplatingEstimate {
    pub surface_area: SurfaceAreaBreakdown,
    pub current_requirements: CurrentRequirements,
    pub plating_parameters: PlatingParameters,
    pub material_requirements: MaterialRequirements,
    pub power_requirements: PowerRequirements,
    pub cost_estimates: CostEstimates,
    pub quality_factors: QualityFactors,
    pub recommendations: Recommendations,
}

// ── Calculation ─────────────────────────────────────────────────────────────

/// Empirical deposition rate in µm/min at 100% current efficiency.
pub fn base_plating_rate_microns_per_min(current_density: f64) -> f64 {
    if current_density <= 0.05 {
        0.15 + current_density * 2.0
    } else if current_density <= 0.1 {
        0.25 + current_density * 1.5
    } else {
        0.4 + current_density * 1.0
    }
}

#[instrument(skip(geometry), fields(area_mm2 = geometry.surface_area_mm2))]
pub fn calculate_electroplating(
    geometry: &PlatingGeometry,
    params: &ElectroplatingParams,
) -> Result<ElectroplatingEstimate, CalcError> {
    geometry.validate()?;
    params.validate()?;

    let area_mm2 = geometry.surface_area_mm2;
    let area_in2 = area_mm2 / MM2_PER_IN2;
    let area_cm2 = area_mm2 / MM2_PER_CM2;

    let min_amps = area_in2 * params.current_density_min;
    let max_amps = area_in2 * params.current_density_max;
    let recommended_amps = (min_amps + max_amps) / 2.0;
    let density_avg = (params.current_density_min + params.current_density_max) / 2.0;

    let thickness_in = params.thickness_microns / MICRONS_PER_INCH;
    let rate_microns = base_plating_rate_microns_per_min(density_avg) * params.current_efficiency;
    let rate_in = rate_microns / MICRONS_PER_INCH;
    let minutes = thickness_in / rate_in;
    let hours = minutes / 60.0;

    let thickness_cm = params.thickness_microns / MICRONS_PER_CM;
    let metal_volume_cm3 = area_cm2 * thickness_cm;
    let metal_mass_g = metal_volume_cm3 * params.metal_density_g_cm3;

    let power_watts = recommended_amps * params.voltage;
    let energy_wh = power_watts * hours;
    let energy_kwh = energy_wh / 1000.0;

    let electricity_cost = energy_kwh * params.electricity_cost_per_kwh;
    // Solution is charged on the ideal deposit, before the coverage allowance.
    let solution_cost = metal_mass_g * params.solution_cost_per_g;

    let roughness = geometry.surface_roughness_factor();
    let coverage = geometry.coverage_efficiency();
    let adjusted_mass_g = metal_mass_g / coverage;

    debug!(recommended_amps, minutes, adjusted_mass_g, "computed electroplating estimate");

    Ok(ElectroplatingEstimate {
        surface_area: SurfaceAreaBreakdown {
            mm2: area_mm2,
            cm2: area_cm2,
            in2: area_in2,
        },
        current_requirements: CurrentRequirements {
            min_amps,
            max_amps,
            recommended_amps,
            current_density_range: CurrentDensityRange {
                min: params.current_density_min,
                max: params.current_density_max,
                recommended: density_avg,
            },
        },
        plating_parameters: PlatingParameters {
            thickness_microns: params.thickness_microns,
            thickness_inches: thickness_in,
            plating_time_minutes: minutes,
            plating_time_hours: hours,
            plating_rate_inches_per_min: rate_in,
        },
        material_requirements: MaterialRequirements {
            metal_mass_g: adjusted_mass_g,
            metal_mass_kg: adjusted_mass_g / 1000.0,
            metal_volume_cm3,
            metal_density_g_cm3: params.metal_density_g_cm3,
        },
        power_requirements: PowerRequirements {
            voltage: params.voltage,
            power_watts,
            energy_wh,
            energy_kwh,
        },
        cost_estimates: CostEstimates {
            electricity_cost,
            solution_cost,
            total_cost: electricity_cost + solution_cost,
        },
        quality_factors: QualityFactors {
            surface_roughness_factor: roughness,
            coverage_efficiency: coverage,
            current_efficiency: params.current_efficiency,
        },
        recommendations: Recommendations {
            current_setting: format!("{recommended_amps:.2} A"),
            voltage_setting: format!("{:.1} V", params.voltage),
            time_setting: format!("{minutes:.0} minutes ({hours:.0} hours)"),
            surface_preparation: "Sand to 400-600 grit for best adhesion".to_string(),
            solution_temperature: "45-55°C for optimal plating rate".to_string(),
            agitation: "Moderate agitation recommended for uniform coverage".to_string(),
        },
    })
}
