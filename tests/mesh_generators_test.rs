use flow_orrery::{
    data_structures::mesh::{MeshData, Primitive},
    resources::mesh::{
        DEFAULT_GUIDE_SEGMENTS, ORBIT_GUIDE_COLOR, PLANETARY_RING_COLOR, StarTint, flat_ring,
        planetary_ring, sphere, sphere_vertex_count, starfield,
    },
};

use crate::common::test_utils::{EPS, approx_eq};

mod common;

fn radius_xz(p: &[f32; 4]) -> f32 {
    (p[0] * p[0] + p[2] * p[2]).sqrt()
}

#[test]
fn sphere_vertex_count_grows_by_four_per_level() {
    for n in 0..5 {
        let mesh = sphere(n);
        assert_eq!(mesh.len(), 12 * 4usize.pow(n));
        assert_eq!(mesh.len(), sphere_vertex_count(n));
        assert_eq!(mesh.colors.len(), mesh.len());
        assert_eq!(mesh.tex_coords.len(), mesh.len());
        assert_eq!(mesh.primitive, Primitive::Triangles);
    }
}

#[test]
fn sphere_vertices_lie_on_unit_sphere() {
    let mesh = sphere(3);
    for p in &mesh.positions {
        let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
        assert!(approx_eq(r, 1.0, EPS), "vertex {:?} has radius {}", p, r);
        assert_eq!(p[3], 1.0);
    }
    for uv in &mesh.tex_coords {
        assert!((0.0..=1.0).contains(&uv[0]) && (0.0..=1.0).contains(&uv[1]));
    }
    assert!(mesh.colors.iter().all(|c| *c == [1.0, 1.0, 1.0, 1.0]));
}

#[test]
fn flat_ring_is_thin_closed_and_flat() {
    let radius = 2.6;
    let thickness = 0.01;
    let mesh = flat_ring(radius, thickness, DEFAULT_GUIDE_SEGMENTS);

    assert_eq!(mesh.len(), DEFAULT_GUIDE_SEGMENTS as usize * 6);
    assert_eq!(mesh.colors.len(), mesh.len());
    assert!(!mesh.has_tex_coords());
    assert!(mesh.colors.iter().all(|c| *c == ORBIT_GUIDE_COLOR));

    for p in &mesh.positions {
        assert_eq!(p[1], 0.0);
        let r = radius_xz(p);
        assert!(r >= radius - thickness - EPS && r <= radius + thickness + EPS);
    }

    // The closing segment ends exactly where the first one starts.
    let n = mesh.len();
    assert_eq!(mesh.positions[n - 1], mesh.positions[0]);
    assert_eq!(mesh.positions[n - 2], mesh.positions[1]);
}

#[test]
fn planetary_ring_spans_inner_to_outer_radius() {
    let mesh = planetary_ring(0.18, 0.3, 100);
    assert_eq!(mesh.len(), 600);
    assert!(mesh.colors.iter().all(|c| *c == PLANETARY_RING_COLOR));

    let radii: Vec<f32> = mesh.positions.iter().map(radius_xz).collect();
    let min = radii.iter().copied().fold(f32::INFINITY, f32::min);
    let max = radii.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    assert!(approx_eq(min, 0.18, EPS));
    assert!(approx_eq(max, 0.3, EPS));
}

#[test]
fn starfield_stays_inside_its_cube() {
    let mesh = starfield(18_000, 22.0, 7);
    assert_eq!(mesh.len(), 18_000);
    assert_eq!(mesh.colors.len(), 18_000);
    assert_eq!(mesh.primitive, Primitive::Points);
    assert!(!mesh.has_tex_coords());

    for p in &mesh.positions {
        assert!(p[..3].iter().all(|c| (-22.0..=22.0).contains(c)), "star {:?} escaped", p);
        assert_eq!(p[3], 1.0);
    }
    for c in &mesh.colors {
        // the brightest channel of every tint is the brightness itself
        let b = c[0].max(c[1]).max(c[2]);
        assert!((0.4..=0.7).contains(&b), "brightness {} out of range", b);
        assert_eq!(c[3], 1.0);
    }
}

#[test]
fn starfield_is_deterministic_per_seed() {
    assert_eq!(starfield(200, 22.0, 1), starfield(200, 22.0, 1));
    assert_ne!(starfield(200, 22.0, 1), starfield(200, 22.0, 2));
}

#[test]
fn star_tints_follow_sample_thresholds() {
    assert_eq!(StarTint::from_sample(0.0), StarTint::Neutral);
    assert_eq!(StarTint::from_sample(0.69), StarTint::Neutral);
    assert_eq!(StarTint::from_sample(0.7), StarTint::BlueWhite);
    assert_eq!(StarTint::from_sample(0.849), StarTint::BlueWhite);
    assert_eq!(StarTint::from_sample(0.85), StarTint::Warm);

    assert_eq!(StarTint::BlueWhite.color(0.5), [0.4, 0.45, 0.5, 1.0]);
    assert_eq!(StarTint::Warm.color(0.5), [0.5, 0.4, 0.3, 1.0]);
}

#[test]
fn empty_counts_give_empty_meshes() {
    assert!(starfield(0, 22.0, 0).is_empty());
    assert!(flat_ring(1.0, 0.01, 0).is_empty());
}

#[test]
fn mesh_helpers_transform_every_vertex() {
    let mesh = sphere(1)
        .scale_uniform(0.5)
        .translate(1.0, -0.1, 0.0)
        .with_color([0.1, 0.2, 0.3, 1.0]);

    for p in &mesh.positions {
        let (x, y, z) = (p[0] - 1.0, p[1] + 0.1, p[2]);
        assert!(approx_eq((x * x + y * y + z * z).sqrt(), 0.5, EPS));
        assert_eq!(p[3], 1.0);
    }
    assert!(mesh.colors.iter().all(|c| *c == [0.1, 0.2, 0.3, 1.0]));

    let empty = MeshData::new(Primitive::Triangles).translate(1.0, 1.0, 1.0);
    assert!(empty.is_empty());
}
