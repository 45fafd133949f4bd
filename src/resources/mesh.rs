//! Procedural mesh generators.
//!
//! Every generator is a pure function of its arguments (the starfield takes an
//! explicit seed) and returns a [`MeshData`] whose attribute arrays have equal
//! length.

use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Vector3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::data_structures::mesh::{MeshData, Primitive};

/// Color of the thin orbit-path guides.
pub const ORBIT_GUIDE_COLOR: [f32; 4] = [0.6, 0.6, 0.8, 0.3];
/// Color of a physical ring system such as Saturn's.
pub const PLANETARY_RING_COLOR: [f32; 4] = [0.8, 0.7, 0.5, 0.6];

pub const DEFAULT_GUIDE_THICKNESS: f32 = 0.01;
pub const DEFAULT_GUIDE_SEGMENTS: u32 = 120;
pub const DEFAULT_RING_SEGMENTS: u32 = 100;

const SPHERE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

// Regular tetrahedron inscribed in the unit sphere.
const TETRAHEDRON: [[f32; 3]; 4] = [
    [0.0, 0.0, -1.0],
    [0.0, 0.942809, 0.333333],
    [-0.816497, -0.471405, 0.333333],
    [0.816497, -0.471405, 0.333333],
];

/// Number of vertices [`sphere`] produces for the given subdivision level.
pub fn sphere_vertex_count(subdivisions: u32) -> usize {
    12 * 4usize.pow(subdivisions)
}

/// A closed unit sphere built by recursively subdividing a tetrahedron.
///
/// Each level splits every triangle into four and pushes the new corners back
/// onto the sphere, so `subdivisions` works as a level-of-detail knob.
pub fn sphere(subdivisions: u32) -> MeshData {
    let count = sphere_vertex_count(subdivisions);
    let mut mesh = MeshData::with_capacity(Primitive::Triangles, count);
    mesh.tex_coords = Vec::with_capacity(count);

    let [a, b, c, d] = TETRAHEDRON.map(|v| Vector3::from(v).normalize());
    for (x, y, z) in [(a, b, c), (d, c, b), (a, d, b), (a, c, d)] {
        divide_triangle(&mut mesh, x, y, z, subdivisions);
    }
    mesh
}

fn divide_triangle(
    mesh: &mut MeshData,
    a: Vector3<f32>,
    b: Vector3<f32>,
    c: Vector3<f32>,
    count: u32,
) {
    if count == 0 {
        for v in [a, b, c] {
            push_sphere_vertex(mesh, v);
        }
        return;
    }
    let ab = (a + b).normalize();
    let ac = (a + c).normalize();
    let bc = (b + c).normalize();

    divide_triangle(mesh, a, ab, ac, count - 1);
    divide_triangle(mesh, ab, b, bc, count - 1);
    divide_triangle(mesh, bc, c, ac, count - 1);
    divide_triangle(mesh, ab, bc, ac, count - 1);
}

fn push_sphere_vertex(mesh: &mut MeshData, v: Vector3<f32>) {
    mesh.positions.push([v.x, v.y, v.z, 1.0]);
    mesh.colors.push(SPHERE_COLOR);
    // equirectangular mapping, v = 0 at the north pole
    let u = 0.5 + v.z.atan2(v.x) / TAU;
    let t = 0.5 - v.y.clamp(-1.0, 1.0).asin() / PI;
    mesh.tex_coords.push([u, t]);
}

/// A thin flat annulus of width `2 * thickness` centred on `radius`, used as an
/// orbit-path guide.
pub fn flat_ring(radius: f32, thickness: f32, segments: u32) -> MeshData {
    annulus(
        radius - thickness,
        radius + thickness,
        segments,
        ORBIT_GUIDE_COLOR,
    )
}

/// A wide translucent annulus between `inner_radius` and `outer_radius`.
pub fn planetary_ring(inner_radius: f32, outer_radius: f32, segments: u32) -> MeshData {
    annulus(inner_radius, outer_radius, segments, PLANETARY_RING_COLOR)
}

/// Triangulated quads in the `y = 0` plane. The last segment reuses the exact
/// corner coordinates of segment 0 so the loop closes without a seam.
fn annulus(inner: f32, outer: f32, segments: u32, color: [f32; 4]) -> MeshData {
    let mut mesh = MeshData::with_capacity(Primitive::Triangles, segments as usize * 6);
    let corner = |i: u32, r: f32| {
        let a = (i % segments) as f32 / segments as f32 * TAU;
        [a.cos() * r, 0.0, a.sin() * r, 1.0]
    };
    for i in 0..segments {
        let (inner1, outer1) = (corner(i, inner), corner(i, outer));
        let (inner2, outer2) = (corner(i + 1, inner), corner(i + 1, outer));
        mesh.positions
            .extend_from_slice(&[inner1, outer1, inner2, outer1, outer2, inner2]);
    }
    mesh.colors = vec![color; mesh.positions.len()];
    mesh
}

/// Category a star's tint is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StarTint {
    Neutral,
    BlueWhite,
    Warm,
}

impl StarTint {
    /// Maps a uniform sample in `[0, 1)` onto the weighted categories
    /// (70% neutral, 15% blue-white, 15% warm).
    pub fn from_sample(sample: f32) -> Self {
        if sample < 0.7 {
            StarTint::Neutral
        } else if sample < 0.85 {
            StarTint::BlueWhite
        } else {
            StarTint::Warm
        }
    }

    pub fn color(self, brightness: f32) -> [f32; 4] {
        let b = brightness;
        match self {
            StarTint::Neutral => [b, b, b, 1.0],
            StarTint::BlueWhite => [b * 0.8, b * 0.9, b, 1.0],
            StarTint::Warm => [b, b * 0.8, b * 0.6, 1.0],
        }
    }
}

/// `count` points sampled uniformly in the cube `[-max_distance, max_distance]³`.
///
/// Deterministic for a given `seed`.
pub fn starfield(count: usize, max_distance: f32, seed: u64) -> MeshData {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut mesh = MeshData::with_capacity(Primitive::Points, count);

    for _ in 0..count {
        let mut coord = || (rng.random::<f32>() - 0.5) * max_distance * 2.0;
        let (x, y, z) = (coord(), coord(), coord());
        mesh.positions.push([x, y, z, 1.0]);

        let brightness = 0.4 + rng.random::<f32>() * 0.3;
        let tint = StarTint::from_sample(rng.random());
        mesh.colors.push(tint.color(brightness));
    }
    mesh
}
