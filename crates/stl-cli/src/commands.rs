use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mesh_analysis::{ExportFormat, MeshAnalyzer, MeshInfo};
use plating_calc::{
    calculate_electroplating, estimate_resin_cost, recommend_for_metal, ElectroplatingParams,
    Metal, PlatingGeometry, ResinParams, VolumeUnit,
};
use serde::Serialize;
use session_store::{spawn_sweeper, SessionStore, StoreConfig};
use tracing::{info, instrument, warn};

use crate::cli::{Cli, Command, PlateOverrides, SaveArgs};
use crate::error::CliError;

/// Execute one parsed command, writing its report to `out`.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<(), CliError> {
    let json = cli.json;
    match cli.command {
        Command::Analyze { file } => {
            let mut analyzer = load(&file)?;
            let format = if json { ExportFormat::Json } else { ExportFormat::Text };
            let report = analyzer.export_statistics(format)?;
            writeln!(out, "{report}").map_err(CliError::stdout)
        }
        Command::Validate { file } => validate(&file, json, out),
        Command::Info { file } => {
            let info = load(&file)?.info();
            if json {
                print_json(out, &info)
            } else {
                print_info(out, &info)
            }
        }
        Command::Export {
            file,
            format,
            output,
        } => {
            let format: ExportFormat = format.parse()?;
            let mut analyzer = load(&file)?;
            match output {
                Some(path) => {
                    analyzer.export_statistics_to(&path, format)?;
                    writeln!(out, "Exported statistics to {}", path.display())
                        .map_err(CliError::stdout)
                }
                None => {
                    let report = analyzer.export_statistics(format)?;
                    writeln!(out, "{report}").map_err(CliError::stdout)
                }
            }
        }
        Command::Scale {
            file,
            factors,
            save,
        } => {
            let mut analyzer = load(&file)?;
            analyzer.scale(&factors)?;
            finish_mutation(analyzer, &save, json, out)
        }
        Command::Translate { file, x, y, z, save } => {
            let mut analyzer = load(&file)?;
            analyzer.translate(&[x, y, z])?;
            finish_mutation(analyzer, &save, json, out)
        }
        Command::Cost {
            file,
            density,
            price,
            unit,
        } => {
            let volume_unit: VolumeUnit = unit.parse()?;
            let volume = load(&file)?.volume();
            let params = ResinParams {
                density_g_cm3: density,
                price_per_kg: price,
                volume_unit,
            };
            print_json(out, &estimate_resin_cost(volume, &params)?)
        }
        Command::Plate {
            file,
            metal,
            overrides,
        } => {
            let mut analyzer = load(&file)?;
            let geometry = PlatingGeometry::from_analyzer(&mut analyzer);
            match metal {
                Some(name) => print_json(out, &recommend_for_metal(&geometry, &name)?),
                None => {
                    let params = overrides.apply(ElectroplatingParams::default());
                    print_json(out, &calculate_electroplating(&geometry, &params)?)
                }
            }
        }
        Command::Metals => metals(json, out),
        Command::Sessions { files, config } => sessions(files, config.as_deref(), out),
    }
}

// ── Single-file commands ─────────────────────────────────────────────────

#[instrument]
fn load(path: &Path) -> Result<MeshAnalyzer, CliError> {
    let bytes = fs::read(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let analyzer = MeshAnalyzer::from_stl_bytes(&bytes, Some(path.display().to_string()))?;
    info!(
        triangle_count = analyzer.mesh().triangle_count(),
        "loaded mesh"
    );
    Ok(analyzer)
}

fn validate(file: &Path, json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let report = load(file)?.validate();
    if json {
        return print_json(out, &report);
    }
    let verdict = if report.is_valid { "valid" } else { "invalid" };
    writeln!(out, "Mesh is {verdict}").map_err(CliError::stdout)?;
    for issue in &report.issues {
        writeln!(out, "issue: {issue}").map_err(CliError::stdout)?;
    }
    for warning in &report.warnings {
        writeln!(out, "warning: {warning}").map_err(CliError::stdout)?;
    }
    Ok(())
}

fn finish_mutation(
    mut analyzer: MeshAnalyzer,
    save: &SaveArgs,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if let Some(path) = &save.save {
        let bytes = if save.ascii {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("mesh");
            stl_format::to_ascii_stl(analyzer.mesh(), name).into_bytes()
        } else {
            analyzer.to_stl_bytes()
        };
        fs::write(path, bytes).map_err(|source| CliError::Write {
            target: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "saved transformed mesh");
    }
    let info = analyzer.info();
    if json {
        print_json(out, &info)
    } else {
        print_info(out, &info)
    }
}

fn metals(json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    if json {
        let presets: Vec<_> = Metal::ALL
            .iter()
            .map(|m| {
                serde_json::json!({ "metal": m, "properties": m.preset(), "tips": m.tips() })
            })
            .collect();
        return print_json(out, &presets);
    }
    for metal in Metal::ALL {
        let p = metal.preset();
        writeln!(
            out,
            "{:<7} {:>6.2} g/cm³  {:.2}-{:.2} A/in²  {:>4.1} V  {:>4.0} µm  {}",
            metal.name(),
            p.density_g_cm3,
            p.current_density_min,
            p.current_density_max,
            p.voltage,
            p.typical_thickness_microns,
            p.color,
        )
        .map_err(CliError::stdout)?;
    }
    Ok(())
}

impl PlateOverrides {
    fn apply(&self, mut params: ElectroplatingParams) -> ElectroplatingParams {
        let fields = [
            (self.density_min, &mut params.current_density_min),
            (self.density_max, &mut params.current_density_max),
            (self.thickness, &mut params.thickness_microns),
            (self.metal_density, &mut params.metal_density_g_cm3),
            (self.efficiency, &mut params.current_efficiency),
            (self.voltage, &mut params.voltage),
            (self.electricity_cost, &mut params.electricity_cost_per_kwh),
            (self.solution_cost, &mut params.solution_cost_per_g),
        ];
        for (value, slot) in fields {
            if let Some(v) = value {
                *slot = v;
            }
        }
        params
    }
}

// ── Session store ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct LoadedSession {
    file: String,
    session_id: Option<String>,
    info: Option<MeshInfo>,
    error: Option<String>,
}

/// Push every file through a session store the way a long-running server
/// would: create, materialize, report, tear down.
fn sessions(
    files: Vec<PathBuf>,
    config: Option<&Path>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let config = match config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime {
            reason: e.to_string(),
        })?;

    runtime.block_on(serve_sessions(config, files, out))
}

async fn serve_sessions(
    config: StoreConfig,
    files: Vec<PathBuf>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let store = Arc::new(SessionStore::new(config)?);
    let sweeper = spawn_sweeper(Arc::clone(&store), store.config().sweep_interval());

    let worker = Arc::clone(&store);
    let loaded = tokio::task::spawn_blocking(move || load_sessions(&worker, &files))
        .await
        .map_err(|e| CliError::Runtime {
            reason: e.to_string(),
        })?;

    sweeper.shutdown().await;
    let stats = store.stats();
    let cleared = store.clear();
    info!(cleared, "session store torn down");

    print_json(
        out,
        &serde_json::json!({ "sessions": loaded, "stats": stats }),
    )
}

fn load_sessions(store: &SessionStore, files: &[PathBuf]) -> Vec<LoadedSession> {
    files
        .iter()
        .map(|path| {
            let file = path.display().to_string();
            match load_session(store, path) {
                Ok((id, info)) => LoadedSession {
                    file,
                    session_id: Some(id),
                    info: Some(info),
                    error: None,
                },
                Err(e) => {
                    warn!(file = %file, error = %e, "session load failed");
                    LoadedSession {
                        file,
                        session_id: None,
                        info: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect()
}

fn load_session(store: &SessionStore, path: &Path) -> Result<(String, MeshInfo), CliError> {
    let bytes = fs::read(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.stl");
    let id = store.create(&bytes, filename)?;
    let info = match store.materialize(id) {
        Ok(handle) => handle.with(|a| a.info()),
        Err(e) => {
            store.delete(id);
            return Err(e.into());
        }
    };
    // A second lookup is served from the cache.
    store.materialize(id)?;
    Ok((id.to_string(), info))
}

// ── Output ───────────────────────────────────────────────────────────────

fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)?;
    writeln!(out, "{text}").map_err(CliError::stdout)
}

fn print_info(out: &mut dyn Write, info: &MeshInfo) -> Result<(), CliError> {
    let b = &info.bounding_box;
    let c = info.center_of_mass;
    let text = format!(
        "File: {}\nTriangles: {}\nBounds: [{:.3}, {:.3}, {:.3}] to [{:.3}, {:.3}, {:.3}]\n\
         Dimensions: {:.3} x {:.3} x {:.3}\nCenter of Mass: [{:.6}, {:.6}, {:.6}]\n\
         Surface Area: {:.6}\nVolume: {:.6}",
        info.source.as_deref().unwrap_or("unknown"),
        info.triangle_count,
        b.min[0],
        b.min[1],
        b.min[2],
        b.max[0],
        b.max[1],
        b.max[2],
        b.dimensions[0],
        b.dimensions[1],
        b.dimensions[2],
        c[0],
        c[1],
        c[2],
        info.surface_area,
        info.volume,
    );
    writeln!(out, "{text}").map_err(CliError::stdout)
}
