//! The default orrery: a sun, eight planets, three moons and Saturn's rings.
//!
//! All sub-meshes are pushed into a single [`SceneLayout`] in one fixed order
//! (stars, sun, planets, orbit guides, ring system, moons) and the bodies keep
//! the [`RegionId`]s that order hands out.

use std::collections::BTreeSet;

use anyhow::Context as _;
use cgmath::Deg;

use crate::{
    data_structures::{
        scene_buffer::{DrawTable, RegionId, SceneBuffer, SceneLayout, TextureRef, pack},
        scene_graph::{OrbitingBody, RingSystem, SolarSystem, Sun},
    },
    resources::mesh::{
        DEFAULT_GUIDE_SEGMENTS, DEFAULT_GUIDE_THICKNESS, DEFAULT_RING_SEGMENTS, flat_ring,
        planetary_ring, sphere, starfield,
    },
    settings::Settings,
};

pub const SUN_SIZE: f32 = 0.4;
/// Height of the plane the sun, planets and orbit guides sit in.
pub const ORBIT_PLANE_Y: f32 = -0.1;
pub const RING_SYSTEM_TILT: Deg<f32> = Deg(15.0);

struct PlanetSpec {
    name: &'static str,
    /// Relative to the sun.
    size: f32,
    radius: f32,
    speed: f32,
    color: [f32; 4],
    texture: &'static str,
}

#[rustfmt::skip]
const PLANETS: [PlanetSpec; 8] = [
    PlanetSpec { name: "mercury", size: 0.08, radius: 1.2, speed: 2.4,  color: [0.7, 0.7, 0.7, 1.0], texture: "mercury.jpg" },
    PlanetSpec { name: "venus",   size: 0.18, radius: 1.6, speed: 1.8,  color: [1.0, 0.8, 0.4, 1.0], texture: "venus.jpg" },
    PlanetSpec { name: "earth",   size: 0.20, radius: 2.0, speed: 1.0,  color: [0.0, 0.4, 1.0, 1.0], texture: "earth.jpg" },
    PlanetSpec { name: "mars",    size: 0.15, radius: 2.6, speed: 0.5,  color: [0.8, 0.3, 0.2, 1.0], texture: "mars.jpg" },
    PlanetSpec { name: "jupiter", size: 0.35, radius: 4.2, speed: 0.25, color: [0.9, 0.6, 0.3, 1.0], texture: "jupiter.jpg" },
    PlanetSpec { name: "saturn",  size: 0.30, radius: 5.8, speed: 0.15, color: [0.9, 0.8, 0.5, 1.0], texture: "saturn.jpg" },
    PlanetSpec { name: "uranus",  size: 0.22, radius: 7.2, speed: 0.08, color: [0.3, 0.8, 0.8, 1.0], texture: "uranus.jpg" },
    PlanetSpec { name: "neptune", size: 0.21, radius: 8.5, speed: 0.05, color: [0.2, 0.3, 0.9, 1.0], texture: "neptune.jpg" },
];

struct MoonSpec {
    name: &'static str,
    parent: &'static str,
    size: f32,
    radius: f32,
    speed: f32,
    color: [f32; 4],
    subdivisions: u32,
}

#[rustfmt::skip]
const MOONS: [MoonSpec; 3] = [
    MoonSpec { name: "moon",   parent: "earth", size: 0.05, radius: 0.3,  speed: 8.0,  color: [0.7, 0.7, 0.7, 1.0], subdivisions: 4 },
    MoonSpec { name: "phobos", parent: "mars",  size: 0.03, radius: 0.2,  speed: 12.0, color: [0.6, 0.5, 0.4, 1.0], subdivisions: 3 },
    MoonSpec { name: "deimos", parent: "mars",  size: 0.03, radius: 0.35, speed: 6.0,  color: [0.5, 0.4, 0.3, 1.0], subdivisions: 3 },
];

const RINGED_PLANET: &str = "saturn";
const SUN_TEXTURE: &str = "sun.jpg";

/// Packed geometry plus the orbital hierarchy that draws from it.
#[derive(Clone, Debug)]
pub struct Scene {
    pub buffer: SceneBuffer,
    pub table: DrawTable,
    pub system: SolarSystem,
    pub stars: RegionId,
    /// One guide per planet, in increasing orbital radius.
    pub orbit_guides: Vec<RegionId>,
}

impl Scene {
    pub fn build(settings: &Settings) -> anyhow::Result<Self> {
        let mut layout = SceneLayout::new();

        let stars = layout.push(
            "stars",
            starfield(settings.star_count, settings.star_distance, settings.star_seed),
            None,
        );

        let sun_mesh = sphere(settings.planet_subdivisions)
            .scale_uniform(SUN_SIZE)
            .translate(0.0, ORBIT_PLANE_Y, 0.0);
        let sun = Sun {
            name: "sun".to_string(),
            region: layout.push("sun", sun_mesh, Some(TextureRef::new(SUN_TEXTURE))),
            texture: Some(TextureRef::new(SUN_TEXTURE)),
        };

        let planet_regions: Vec<RegionId> = PLANETS
            .iter()
            .map(|planet| {
                let mesh = sphere(settings.planet_subdivisions)
                    .scale_uniform(SUN_SIZE * planet.size)
                    .with_color(planet.color);
                layout.push(planet.name, mesh, Some(TextureRef::new(planet.texture)))
            })
            .collect();

        let orbit_guides: Vec<RegionId> = PLANETS
            .iter()
            .map(|planet| {
                let mesh = flat_ring(planet.radius, DEFAULT_GUIDE_THICKNESS, DEFAULT_GUIDE_SEGMENTS)
                    .translate(0.0, ORBIT_PLANE_Y, 0.0);
                layout.push(format!("{}-orbit", planet.name), mesh, None)
            })
            .collect();

        let ringed = PLANETS
            .iter()
            .find(|planet| planet.name == RINGED_PLANET)
            .context("ringed planet is not part of the planet table")?;
        let ringed_size = SUN_SIZE * ringed.size;
        let ring_region = layout.push(
            format!("{}-rings", RINGED_PLANET),
            planetary_ring(ringed_size * 1.5, ringed_size * 2.5, DEFAULT_RING_SEGMENTS),
            None,
        );

        let moon_regions: Vec<RegionId> = MOONS
            .iter()
            .map(|moon| {
                let mesh = sphere(moon.subdivisions)
                    .scale_uniform(SUN_SIZE * moon.size)
                    .with_color(moon.color)
                    // moons are never textured
                    .without_tex_coords();
                layout.push(moon.name, mesh, None)
            })
            .collect();

        let mut system = SolarSystem::new(sun);
        for (planet, region) in PLANETS.iter().zip(planet_regions) {
            system.add_body(OrbitingBody {
                name: planet.name.to_string(),
                orbit_radius: planet.radius,
                base_speed: planet.speed,
                angle: 0.0,
                scale: SUN_SIZE * planet.size,
                plane_offset: ORBIT_PLANE_Y,
                parent: None,
                region,
                texture: Some(TextureRef::new(planet.texture)),
            })?;
        }
        for (moon, region) in MOONS.iter().zip(moon_regions) {
            let parent = system
                .find(moon.parent)
                .with_context(|| format!("moon {} orbits unknown body {}", moon.name, moon.parent))?;
            system.add_body(OrbitingBody {
                name: moon.name.to_string(),
                orbit_radius: moon.radius,
                base_speed: moon.speed,
                angle: 0.0,
                scale: SUN_SIZE * moon.size,
                plane_offset: 0.0,
                parent: Some(parent),
                region,
                texture: None,
            })?;
        }
        let ring_parent = system
            .find(RINGED_PLANET)
            .context("ringed planet was not added")?;
        system.add_ring_system(RingSystem {
            name: format!("{}-rings", RINGED_PLANET),
            region: ring_region,
            parent: ring_parent,
            tilt: RING_SYSTEM_TILT,
        })?;

        let (buffer, table) = pack(layout)?;
        log::info!(
            "scene built: {} regions, {} vertices, {} bodies",
            table.len(),
            buffer.len(),
            system.bodies().len()
        );

        Ok(Self {
            buffer,
            table,
            system,
            stars,
            orbit_guides,
        })
    }

    /// Every texture referenced by a region, without duplicates.
    pub fn textures(&self) -> Vec<TextureRef> {
        self.table
            .iter()
            .filter_map(|(_, region)| region.texture.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
