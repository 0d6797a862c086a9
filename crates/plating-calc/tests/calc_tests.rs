use approx::assert_relative_eq;
use mesh_analysis::MeshAnalyzer;
use mesh_types::Mesh;
use plating_calc::*;

// ── Helper Functions ─────────────────────────────────────────────────────

fn cube(side: f32) -> MeshAnalyzer {
    let p = |x: f32, y: f32, z: f32| [x * side, y * side, z * side];
    let (a, b, c, d) = (p(0., 0., 0.), p(1., 0., 0.), p(1., 1., 0.), p(0., 1., 0.));
    let (e, f, g, h) = (p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.));
    let mesh = Mesh::from_triangles([
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
    .unwrap();
    MeshAnalyzer::new(mesh, None)
}

// ── Resin ────────────────────────────────────────────────────────────────

#[test]
fn resin_cost_for_ten_mm_cube() {
    let mut a = cube(10.0);
    let params = ResinParams {
        density_g_cm3: 1.1,
        price_per_kg: 50.0,
        volume_unit: VolumeUnit::Mm3,
    };
    let est = estimate_resin_cost(a.volume(), &params).unwrap();
    assert_relative_eq!(est.volume_mm3, 1000.0, epsilon = 1e-6);
    assert_relative_eq!(est.volume_cm3, 1.0, epsilon = 1e-9);
    assert_relative_eq!(est.mass_g, 1.1, epsilon = 1e-9);
    assert_relative_eq!(est.cost, 0.055, epsilon = 1e-9);
}

#[test]
fn resin_params_deserialize_with_default_unit() {
    let params: ResinParams =
        serde_json::from_str(r#"{"density_g_cm3": 1.2, "price_per_kg": 35.0}"#).unwrap();
    assert_eq!(params.volume_unit, VolumeUnit::Mm3);
}

// ── Electroplating ───────────────────────────────────────────────────────

#[test]
fn electroplating_current_for_5000_mm2() {
    let geometry = PlatingGeometry::from_surface_area(5000.0);
    let est = calculate_electroplating(&geometry, &ElectroplatingParams::default()).unwrap();

    assert_relative_eq!(est.surface_area.in2, 7.75002, epsilon = 1e-5);
    assert_relative_eq!(est.surface_area.cm2, 50.0);
    assert_relative_eq!(est.current_requirements.min_amps, 0.5425, epsilon = 1e-4);
    assert_relative_eq!(est.current_requirements.max_amps, 0.775, epsilon = 1e-4);
    assert_relative_eq!(est.current_requirements.recommended_amps, 0.659, epsilon = 1e-3);
    assert_eq!(est.recommendations.current_setting, "0.66 A");
    assert_eq!(est.recommendations.voltage_setting, "3.0 V");
}

#[test]
fn electroplating_time_mass_and_cost() {
    let geometry = PlatingGeometry::from_surface_area(5000.0);
    let params = ElectroplatingParams::default();
    let est = calculate_electroplating(&geometry, &params).unwrap();

    // 0.085 A/in² sits in the middle band: (0.25 + 0.1275) * 0.95 µm/min.
    let rate_um = 0.3775 * 0.95;
    assert_relative_eq!(
        est.plating_parameters.plating_time_minutes,
        20.0 / rate_um,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        est.plating_parameters.plating_rate_inches_per_min,
        rate_um / 25_400.0,
        epsilon = 1e-12
    );

    // 50 cm² x 0.002 cm = 0.1 cm³ of copper.
    assert_relative_eq!(est.material_requirements.metal_volume_cm3, 0.1, epsilon = 1e-12);
    let ideal_mass = 0.1 * 8.96;
    let coverage = est.quality_factors.coverage_efficiency;
    assert_relative_eq!(coverage, 0.985, epsilon = 1e-12);
    assert_relative_eq!(
        est.material_requirements.metal_mass_g,
        ideal_mass / coverage,
        epsilon = 1e-12
    );
    assert_relative_eq!(est.cost_estimates.solution_cost, ideal_mass * 0.05, epsilon = 1e-12);

    let power = est.current_requirements.recommended_amps * 3.0;
    assert_relative_eq!(est.power_requirements.power_watts, power, epsilon = 1e-12);
    let energy_wh = power * est.plating_parameters.plating_time_hours;
    assert_relative_eq!(est.power_requirements.energy_wh, energy_wh, epsilon = 1e-12);
    assert_relative_eq!(
        est.cost_estimates.electricity_cost,
        energy_wh / 1000.0 * 0.12,
        epsilon = 1e-12
    );
    assert_relative_eq!(
        est.cost_estimates.total_cost,
        est.cost_estimates.electricity_cost + est.cost_estimates.solution_cost
    );
}

#[test]
fn cube_quality_factors() {
    let mut a = cube(10.0);
    let geometry = PlatingGeometry::from_analyzer(&mut a);
    let est = calculate_electroplating(&geometry, &ElectroplatingParams::default()).unwrap();
    // Equal facets: no roughness. aspect 1, SA/V 0.6.
    assert_relative_eq!(est.quality_factors.surface_roughness_factor, 1.0, epsilon = 1e-9);
    assert_relative_eq!(
        est.quality_factors.coverage_efficiency,
        1.0 - 0.015 - 0.009,
        epsilon = 1e-9
    );
}

#[test]
fn geometry_from_statistics_matches_analyzer() {
    let mut a = cube(2.0);
    let from_stats = PlatingGeometry::from_statistics(&a.statistics());
    let direct = PlatingGeometry::from_analyzer(&mut a);
    assert_eq!(from_stats, direct);
}

#[test]
fn invalid_params_are_rejected_before_calculating() {
    let geometry = PlatingGeometry::from_surface_area(100.0);
    let params = ElectroplatingParams {
        voltage: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        calculate_electroplating(&geometry, &params),
        Err(CalcError::InvalidArgument { name: "voltage", .. })
    ));
    assert!(calculate_electroplating(
        &PlatingGeometry::from_surface_area(-1.0),
        &ElectroplatingParams::default()
    )
    .is_err());
}

// ── Metal presets ────────────────────────────────────────────────────────

#[test]
fn nickel_recommendation_uses_preset() {
    let geometry = PlatingGeometry::from_surface_area(5000.0);
    let rec = recommend_for_metal(&geometry, "Nickel").unwrap();
    assert_eq!(rec.metal, Metal::Nickel);
    assert_eq!(rec.metal_properties.color, "Silver-gray");
    let p = &rec.calculated_parameters;
    assert_eq!(p.plating_parameters.thickness_microns, 25.0);
    assert_eq!(p.power_requirements.voltage, 6.0);
    assert_eq!(p.material_requirements.metal_density_g_cm3, 8.9);
    assert_eq!(rec.tips.len(), 5);
    assert_eq!(rec.tips[2], "Maintain pH between 3.5-4.5");
    assert_eq!(
        rec.tips[4],
        "Plating time calculated based on thickness and current density"
    );
}

#[test]
fn gold_uses_low_current_band() {
    let geometry = PlatingGeometry::from_surface_area(645.16);
    let rec = recommend_for_metal(&geometry, "gold").unwrap();
    let cr = &rec.calculated_parameters.current_requirements;
    assert_relative_eq!(cr.min_amps, 0.02, epsilon = 1e-12);
    assert_relative_eq!(cr.max_amps, 0.05, epsilon = 1e-12);
    // 0.035 A/in² -> (0.15 + 0.07) * 0.95 µm/min, 5 µm target.
    assert_relative_eq!(
        rec.calculated_parameters.plating_parameters.plating_time_minutes,
        5.0 / (0.22 * 0.95),
        epsilon = 1e-9
    );
}

#[test]
fn unknown_metal_fails() {
    let geometry = PlatingGeometry::from_surface_area(100.0);
    assert!(matches!(
        recommend_for_metal(&geometry, "unobtainium"),
        Err(CalcError::UnsupportedValue { .. })
    ));
}

#[test]
fn recommendation_serializes_as_nested_record() {
    let geometry = PlatingGeometry::from_surface_area(1000.0);
    let rec = recommend_for_metal(&geometry, "copper").unwrap();
    let v = serde_json::to_value(&rec).unwrap();
    assert_eq!(v["metal"], "copper");
    assert!(v["calculated_parameters"]["cost_estimates"]["total_cost"].is_number());
    assert_eq!(v["metal_properties"]["hardness"], "Soft");
}
