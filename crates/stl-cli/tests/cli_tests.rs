use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use clap::Parser;
use mesh_types::Mesh;
use stl_cli::{run, Cli, CliError, Command};
use tempfile::TempDir;

// ── Helper Functions ─────────────────────────────────────────────────────

fn cube(side: f32) -> Mesh {
    let p = |x: f32, y: f32, z: f32| [x * side, y * side, z * side];
    let (a, b, c, d) = (p(0., 0., 0.), p(1., 0., 0.), p(1., 1., 0.), p(0., 1., 0.));
    let (e, f, g, h) = (p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.));
    Mesh::from_triangles([
        [a, c, b],
        [a, d, c],
        [e, f, g],
        [e, g, h],
        [a, b, f],
        [a, f, e],
        [c, d, h],
        [c, h, g],
        [a, e, h],
        [a, h, d],
        [b, c, g],
        [b, g, f],
    ])
    .unwrap()
}

fn write_cube(dir: &Path, name: &str, side: f32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, stl_format::to_binary_stl(&cube(side), "cube")).unwrap();
    path
}

fn exec(args: &[&str]) -> Result<String, CliError> {
    let cli = Cli::try_parse_from(std::iter::once("stl-tools").chain(args.iter().copied()))
        .expect("arguments should parse");
    let mut out = Vec::new();
    run(cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn json(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}

// ── Argument parsing ─────────────────────────────────────────────────────

#[test]
fn scale_accepts_one_or_three_factors() {
    let cli = Cli::try_parse_from(["stl-tools", "scale", "a.stl", "2"]).unwrap();
    assert!(matches!(cli.command, Command::Scale { ref factors, .. } if factors == &[2.0]));

    let cli = Cli::try_parse_from(["stl-tools", "scale", "a.stl", "1", "2", "-3"]).unwrap();
    assert!(matches!(cli.command, Command::Scale { ref factors, .. } if factors.len() == 3));

    assert!(Cli::try_parse_from(["stl-tools", "scale", "a.stl"]).is_err());
}

#[test]
fn translate_accepts_negative_offsets() {
    let cli = Cli::try_parse_from(["stl-tools", "translate", "a.stl", "-1", "0", "-2.5"]).unwrap();
    match cli.command {
        Command::Translate { x, y, z, .. } => assert_eq!([x, y, z], [-1.0, 0.0, -2.5]),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn metal_preset_conflicts_with_explicit_parameters() {
    let args = ["stl-tools", "plate", "a.stl", "--metal", "gold", "--voltage", "4"];
    assert!(Cli::try_parse_from(args).is_err());
    assert!(Cli::try_parse_from(["stl-tools", "plate", "a.stl", "--voltage", "4"]).is_ok());
}

#[test]
fn ascii_requires_save_path() {
    assert!(Cli::try_parse_from(["stl-tools", "scale", "a.stl", "2", "--ascii"]).is_err());
}

// ── Analysis commands ────────────────────────────────────────────────────

#[test]
fn analyze_prints_statistics_block() {
    let dir = TempDir::new().unwrap();
    let file = write_cube(dir.path(), "cube.stl", 1.0);
    let text = exec(&["analyze", file.to_str().unwrap()]).unwrap();
    assert!(text.starts_with("STL Mesh Statistics\n"));
    assert!(text.contains("Triangle Count: 12"));
    assert!(text.contains("Volume: 1.000000"));
}

#[test]
fn info_json_has_summary_fields() {
    let dir = TempDir::new().unwrap();
    let file = write_cube(dir.path(), "cube.stl", 2.0);
    let v = json(&exec(&["info", "--json", file.to_str().unwrap()]).unwrap());
    assert_eq!(v["triangle_count"], 12);
    assert_relative_eq!(v["volume"].as_f64().unwrap(), 8.0, epsilon = 1e-9);
}

#[test]
fn validate_reports_clean_cube() {
    let dir = TempDir::new().unwrap();
    let file = write_cube(dir.path(), "cube.stl", 1.0);
    let text = exec(&["validate", file.to_str().unwrap()]).unwrap();
    assert_eq!(text, "Mesh is valid\n");
}

#[test]
fn export_writes_text_file() {
    let dir = TempDir::new().unwrap();
    let file = write_cube(dir.path(), "cube.stl", 1.0);
    let target = dir.path().join("stats.txt");
    exec(&[
        "export",
        file.to_str().unwrap(),
        "--format",
        "txt",
        "--output",
        target.to_str().unwrap(),
    ])
    .unwrap();
    let written = std::fs::read_to_string(target).unwrap();
    assert!(written.contains("Surface Area: 6.000000"));
}

#[test]
fn export_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    let file = write_cube(dir.path(), "cube.stl", 1.0);
    let err = exec(&["export", file.to_str().unwrap(), "--format", "xml"]).unwrap_err();
    assert!(matches!(err, CliError::Analysis(_)));
}

#[test]
fn missing_file_is_a_read_error() {
    let err = exec(&["info", "/definitely/not/here.stl"]).unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
}

// ── Mutations ────────────────────────────────────────────────────────────

#[test]
fn scale_saves_transformed_mesh() {
    let dir = TempDir::new().unwrap();
    let file = write_cube(dir.path(), "cube.stl", 1.0);
    let saved = dir.path().join("big.stl");
    exec(&["scale", file.to_str().unwrap(), "2", "--save", saved.to_str().unwrap()]).unwrap();

    let mesh = stl_format::parse_stl(&std::fs::read(&saved).unwrap()).unwrap();
    let mut analyzer = mesh_analysis::MeshAnalyzer::new(mesh, None);
    assert_relative_eq!(analyzer.volume(), 8.0, epsilon = 1e-9);
}

#[test]
fn translate_saves_ascii() {
    let dir = TempDir::new().unwrap();
    let file = write_cube(dir.path(), "cube.stl", 1.0);
    let saved = dir.path().join("moved.stl");
    exec(&[
        "translate",
        file.to_str().unwrap(),
        "1",
        "2",
        "3",
        "--save",
        saved.to_str().unwrap(),
        "--ascii",
    ])
    .unwrap();
    let text = std::fs::read_to_string(&saved).unwrap();
    assert!(text.starts_with("solid moved"));
    let mesh = stl_format::parse_stl(text.as_bytes()).unwrap();
    let com = mesh_analysis::MeshAnalyzer::new(mesh, None).center_of_mass();
    assert_relative_eq!(com[2], 3.5, epsilon = 1e-6);
}

#[test]
fn two_scale_factors_are_rejected() {
    let dir = TempDir::new().unwrap();
    let file = write_cube(dir.path(), "cube.stl", 1.0);
    let err = exec(&["scale", file.to_str().unwrap(), "1", "2"]).unwrap_err();
    assert!(matches!(err, CliError::Analysis(_)));
}

// ── Calculators ──────────────────────────────────────────────────────────

#[test]
fn cost_of_ten_mm_cube() {
    let dir = TempDir::new().unwrap();
    let file = write_cube(dir.path(), "cube.stl", 10.0);
    let v = json(
        &exec(&["cost", file.to_str().unwrap(), "--density", "1.1", "--price", "50"]).unwrap(),
    );
    assert_relative_eq!(v["cost"].as_f64().unwrap(), 0.055, epsilon = 1e-9);
}

#[test]
fn cost_rejects_unknown_unit() {
    let dir = TempDir::new().unwrap();
    let file = write_cube(dir.path(), "cube.stl", 10.0);
    let err = exec(&[
        "cost",
        file.to_str().unwrap(),
        "--density",
        "1.1",
        "--price",
        "50",
        "--unit",
        "in3",
    ])
    .unwrap_err();
    assert!(matches!(err, CliError::Calc(_)));
}

#[test]
fn plate_with_overrides_and_presets() {
    let dir = TempDir::new().unwrap();
    let file = write_cube(dir.path(), "cube.stl", 10.0);
    let path = file.to_str().unwrap();

    let v = json(&exec(&["plate", path, "--voltage", "4.5"]).unwrap());
    assert_eq!(v["power_requirements"]["voltage"], 4.5);
    assert_eq!(v["recommendations"]["voltage_setting"], "4.5 V");

    let v = json(&exec(&["plate", path, "--metal", "Nickel"]).unwrap());
    assert_eq!(v["metal"], "nickel");
    assert_eq!(v["tips"].as_array().unwrap().len(), 5);

    let err = exec(&["plate", path, "--metal", "lead"]).unwrap_err();
    assert!(matches!(err, CliError::Calc(_)));
}

#[test]
fn metals_lists_every_preset() {
    let text = exec(&["metals"]).unwrap();
    assert_eq!(text.lines().count(), 5);
    assert!(text.lines().any(|l| l.starts_with("gold")));

    let v = json(&exec(&["metals", "--json"]).unwrap());
    assert_eq!(v.as_array().unwrap().len(), 5);
}

// ── Session store ────────────────────────────────────────────────────────

#[test]
fn sessions_load_through_the_cache() {
    let dir = TempDir::new().unwrap();
    let a = write_cube(dir.path(), "a.stl", 1.0);
    let b = write_cube(dir.path(), "b.stl", 2.0);
    let junk = dir.path().join("junk.stl");
    std::fs::write(&junk, b"not an stl file at all").unwrap();

    let v = json(
        &exec(&[
            "sessions",
            a.to_str().unwrap(),
            b.to_str().unwrap(),
            junk.to_str().unwrap(),
        ])
        .unwrap(),
    );

    let sessions = v["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 3);
    assert_relative_eq!(
        sessions[1]["info"]["volume"].as_f64().unwrap(),
        8.0,
        epsilon = 1e-9
    );
    assert!(sessions[2]["error"].is_string());

    let stats = &v["stats"];
    assert_eq!(stats["total_sessions"], 2);
    assert_eq!(stats["cached_instances"], 2);
    assert_eq!(stats["cache_hits"], 2);
}

#[test]
fn sessions_honor_config_file() {
    let dir = TempDir::new().unwrap();
    let a = write_cube(dir.path(), "a.stl", 1.0);
    let b = write_cube(dir.path(), "b.stl", 1.0);
    let config = dir.path().join("store.toml");
    std::fs::write(&config, "max_sessions = 1\n").unwrap();

    let v = json(
        &exec(&[
            "sessions",
            a.to_str().unwrap(),
            b.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .unwrap(),
    );
    assert!(v["sessions"][0]["error"].is_null());
    assert!(v["sessions"][1]["error"]
        .as_str()
        .unwrap()
        .contains("maximum number of sessions"));
}
