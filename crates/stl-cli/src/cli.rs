use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "stl-tools")]
#[command(about = "Analyze STL meshes and estimate print and plating costs", long_about = None)]
pub struct Cli {
    /// Print machine-readable JSON instead of text where both exist
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the full statistics block for an STL file
    Analyze {
        file: PathBuf,
    },
    /// Check a mesh for degenerate triangles and suspicious dimensions
    Validate {
        file: PathBuf,
    },
    /// Print a short summary of an STL file
    Info {
        file: PathBuf,
    },
    /// Export statistics as JSON or text
    Export {
        file: PathBuf,
        /// "json" or "txt"
        #[arg(short, long, default_value = "json")]
        format: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Scale a mesh about the origin by one uniform or three per-axis factors
    Scale {
        file: PathBuf,
        #[arg(required = true, num_args = 1..=3, allow_negative_numbers = true)]
        factors: Vec<f64>,
        #[command(flatten)]
        save: SaveArgs,
    },
    /// Move a mesh by an offset
    Translate {
        file: PathBuf,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
        #[command(flatten)]
        save: SaveArgs,
    },
    /// Estimate resin mass and cost for printing the mesh solid
    Cost {
        file: PathBuf,
        /// Resin density in g/cm³
        #[arg(long)]
        density: f64,
        /// Resin price per kilogram
        #[arg(long)]
        price: f64,
        /// Unit of the mesh volume, "mm3" or "cm3"
        #[arg(long, default_value = "mm3")]
        unit: String,
    },
    /// Estimate electroplating current, time, material and cost
    Plate {
        file: PathBuf,
        /// Use a metal preset (nickel, copper, chrome, gold, silver)
        #[arg(long, conflicts_with_all = PlateOverrides::FIELDS)]
        metal: Option<String>,
        #[command(flatten)]
        overrides: PlateOverrides,
    },
    /// List the plating metal presets
    Metals,
    /// Load files into a session store and report cache statistics
    Sessions {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// TOML store configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SaveArgs {
    /// Write the transformed mesh to this STL file
    #[arg(long)]
    pub save: Option<PathBuf>,
    /// Write ASCII STL instead of binary
    #[arg(long, requires = "save")]
    pub ascii: bool,
}

/// Explicit electroplating parameters. Unset values keep the copper defaults.
#[derive(Debug, Clone, Default, Args)]
pub struct PlateOverrides {
    /// Minimum current density in A/in²
    #[arg(long)]
    pub density_min: Option<f64>,
    /// Maximum current density in A/in²
    #[arg(long)]
    pub density_max: Option<f64>,
    /// Target thickness in µm
    #[arg(long)]
    pub thickness: Option<f64>,
    /// Plated metal density in g/cm³
    #[arg(long)]
    pub metal_density: Option<f64>,
    /// Current efficiency in (0, 1]
    #[arg(long)]
    pub efficiency: Option<f64>,
    #[arg(long)]
    pub voltage: Option<f64>,
    /// Electricity price per kWh
    #[arg(long)]
    pub electricity_cost: Option<f64>,
    /// Solution cost per gram of deposited metal
    #[arg(long)]
    pub solution_cost: Option<f64>,
}

impl PlateOverrides {
    pub const FIELDS: [&'static str; 8] = [
        "density_min",
        "density_max",
        "thickness",
        "metal_density",
        "efficiency",
        "voltage",
        "electricity_cost",
        "solution_cost",
    ];
}
