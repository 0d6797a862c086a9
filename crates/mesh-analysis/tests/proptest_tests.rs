//! Property-based tests for the round-trip laws of scale and translate.

use mesh_analysis::MeshAnalyzer;
use mesh_types::Mesh;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Axis-aligned box from origin and positive extents, as 12 outward-wound
/// triangles.
fn box_mesh(origin: [f32; 3], size: [f32; 3]) -> Mesh {
    let p = |x: f32, y: f32, z: f32| {
        [
            origin[0] + x * size[0],
            origin[1] + y * size[1],
            origin[2] + z * size[2],
        ]
    };
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

fn arb_box() -> impl Strategy<Value = Mesh> {
    (
        prop::array::uniform3(-100.0f32..100.0),
        prop::array::uniform3(0.5f32..50.0),
    )
        .prop_map(|(o, s)| box_mesh(o, s))
}

fn arb_scale() -> impl Strategy<Value = f64> {
    prop_oneof![0.1f64..0.9, 1.1f64..10.0]
}

/// Relative tolerance for f32 storage.
const REL_TOL: f64 = 1e-3;

// ---------------------------------------------------------------------------
// 1. scale(s) then scale(1/s) restores the volume
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn scale_round_trip_restores_volume(mesh in arb_box(), s in arb_scale()) {
        let mut a = MeshAnalyzer::new(mesh, None);
        let original = a.volume();

        a.scale(&[s]).unwrap();
        let scaled = a.volume();
        prop_assert!(((scaled - original * s.powi(3)) / scaled).abs() < REL_TOL);

        a.scale(&[1.0 / s]).unwrap();
        let restored = a.volume();
        prop_assert!(((restored - original) / original).abs() < REL_TOL,
            "original={} restored={}", original, restored);
    }
}

// ---------------------------------------------------------------------------
// 2. translate(v) then translate(-v) restores the center of mass
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn translate_round_trip_restores_center(
        mesh in arb_box(),
        v in prop::array::uniform3(-100.0f64..100.0),
    ) {
        let mut a = MeshAnalyzer::new(mesh, None);
        let original = a.center_of_mass();

        a.translate(&v).unwrap();
        a.translate(&[-v[0], -v[1], -v[2]]).unwrap();
        let restored = a.center_of_mass();
        for i in 0..3 {
            prop_assert!((restored[i] - original[i]).abs() < 1e-3,
                "axis {}: {} vs {}", i, original[i], restored[i]);
        }
    }
}

// ---------------------------------------------------------------------------
// 3. A single scale never reverts on its own
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn single_scale_changes_area(mesh in arb_box(), s in arb_scale()) {
        let mut a = MeshAnalyzer::new(mesh, None);
        let before = a.surface_area();
        a.scale(&[s]).unwrap();
        let after = a.surface_area();
        prop_assert!((after - before).abs() > before * 1e-3);
        prop_assert_eq!(a.mesh().vertex_count(), 3 * a.mesh().triangle_count());
    }
}
