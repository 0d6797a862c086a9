//! Plating-metal presets and metal-specific recommendations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::electroplating::{calculate_electroplating, ElectroplatingEstimate, ElectroplatingParams};
use crate::error::CalcError;
use crate::geometry::PlatingGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metal {
    Nickel,
    Copper,
    Chrome,
    Gold,
    Silver,
}

impl Metal {
    pub const ALL: [Metal; 5] = [
        Metal::Nickel,
        Metal::Copper,
        Metal::Chrome,
        Metal::Gold,
        Metal::Silver,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metal::Nickel => "nickel",
            Metal::Copper => "copper",
            Metal::Chrome => "chrome",
            Metal::Gold => "gold",
            Metal::Silver => "silver",
        }
    }

    pub fn preset(&self) -> MetalPreset {
        match self {
            Metal::Nickel => MetalPreset {
                density_g_cm3: 8.9,
                current_density_min: 0.07,
                current_density_max: 0.1,
                voltage: 6.0,
                plating_rate_microns_per_min: 0.4,
                solution_cost_per_kg: 50.0,
                color: "Silver-gray",
                hardness: "Hard",
                corrosion_resistance: "Excellent",
                typical_thickness_microns: 25.0,
            },
            Metal::Copper => MetalPreset {
                density_g_cm3: 8.96,
                current_density_min: 0.07,
                current_density_max: 0.1,
                voltage: 3.0,
                plating_rate_microns_per_min: 0.45,
                solution_cost_per_kg: 30.0,
                color: "Reddish-brown",
                hardness: "Soft",
                corrosion_resistance: "Good",
                typical_thickness_microns: 20.0,
            },
            Metal::Chrome => MetalPreset {
                density_g_cm3: 7.19,
                current_density_min: 0.1,
                current_density_max: 0.15,
                voltage: 12.0,
                plating_rate_microns_per_min: 0.25,
                solution_cost_per_kg: 80.0,
                color: "Bright silver",
                hardness: "Very hard",
                corrosion_resistance: "Excellent",
                typical_thickness_microns: 15.0,
            },
            Metal::Gold => MetalPreset {
                density_g_cm3: 19.32,
                current_density_min: 0.02,
                current_density_max: 0.05,
                voltage: 3.0,
                plating_rate_microns_per_min: 0.15,
                solution_cost_per_kg: 2000.0,
                color: "Yellow",
                hardness: "Soft",
                corrosion_resistance: "Excellent",
                typical_thickness_microns: 5.0,
            },
            Metal::Silver => MetalPreset {
                density_g_cm3: 10.49,
                current_density_min: 0.03,
                current_density_max: 0.06,
                voltage: 2.0,
                plating_rate_microns_per_min: 0.2,
                solution_cost_per_kg: 500.0,
                color: "Bright silver",
                hardness: "Soft",
                corrosion_resistance: "Good",
                typical_thickness_microns: 10.0,
            },
        }
    }

    pub fn tips(&self) -> [&'static str; 5] {
        let specific = match self {
            Metal::Nickel => [
                "Use bright nickel for decorative finish",
                "Consider semi-bright nickel for better adhesion",
                "Maintain pH between 3.5-4.5",
                "Temperature: 45-55°C",
            ],
            Metal::Copper => [
                "Excellent base layer for other metals",
                "Use cyanide-free solutions for safety",
                "Maintain pH between 8.5-9.5",
                "Temperature: 25-35°C",
            ],
            Metal::Chrome => [
                "Requires bright nickel underlayer",
                "Use hexavalent chrome for decorative finish",
                "Maintain temperature: 45-55°C",
                "High current efficiency required",
            ],
            Metal::Gold => [
                "Use bright gold for decorative finish",
                "Consider flash gold for cost savings",
                "Maintain pH between 4.0-5.0",
                "Temperature: 25-35°C",
            ],
            Metal::Silver => [
                "Excellent conductivity",
                "Use bright silver for decorative finish",
                "Maintain pH between 8.0-9.0",
                "Temperature: 25-35°C",
            ],
        };
        [
            specific[0],
            specific[1],
            specific[2],
            specific[3],
            "Plating time calculated based on thickness and current density",
        ]
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metal {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Metal::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| CalcError::UnsupportedValue {
                kind: "metal type",
                value: s.to_string(),
            })
    }
}

/// Physical and process properties of one plating metal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetalPreset {
    pub density_g_cm3: f64,
    pub current_density_min: f64,
    pub current_density_max: f64,
    pub voltage: f64,
    pub plating_rate_microns_per_min: f64,
    pub solution_cost_per_kg: f64,
    pub color: &'static str,
    pub hardness: &'static str,
    pub corrosion_resistance: &'static str,
    pub typical_thickness_microns: f64,
}

impl MetalPreset {
    /// Calculator parameters pre-filled from this preset. Efficiency and
    /// electricity price keep their defaults.
    pub fn params(&self) -> ElectroplatingParams {
        ElectroplatingParams {
            current_density_min: self.current_density_min,
            current_density_max: self.current_density_max,
            thickness_microns: self.typical_thickness_microns,
            metal_density_g_cm3: self.density_g_cm3,
            voltage: self.voltage,
            solution_cost_per_g: self.solution_cost_per_kg / 1000.0,
            ..ElectroplatingParams::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetalRecommendation {
    pub metal: Metal,
    pub metal_properties: MetalPreset,
    pub calculated_parameters: ElectroplatingEstimate,
    pub tips: Vec<String>,
}

/// Run the electroplating calculator with the named metal's preset.
pub fn recommend_for_metal(
    geometry: &PlatingGeometry,
    metal_name: &str,
) -> Result<MetalRecommendation, CalcError> {
    let metal: Metal = metal_name.parse()?;
    let preset = metal.preset();
    let calculated_parameters = calculate_electroplating(geometry, &preset.params())?;

    info!(
        %metal,
        amps = calculated_parameters.current_requirements.recommended_amps,
        "built plating recommendation"
    );

    Ok(MetalRecommendation {
        metal,
        metal_properties: preset,
        calculated_parameters,
        tips: metal.tips().iter().map(|t| t.to_string()).collect(),
    })
}
