//! Start-up configuration.

use std::path::PathBuf;

use crate::{animation::ClockMode, camera::CameraState};

/// Everything that can be tuned before the scene is built.
///
/// Only `speed_factor` and `show_orbit_guides` keep changing afterwards; they
/// are copied into the [`SceneState`](crate::render::SceneState) and mutated
/// there.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub speed_factor: f32,
    pub show_orbit_guides: bool,
    pub clock_mode: ClockMode,
    pub star_count: usize,
    /// Half-width of the cube the stars are scattered in.
    pub star_distance: f32,
    pub star_seed: u64,
    /// Tessellation level of the sun and the planets.
    pub planet_subdivisions: u32,
    pub camera: CameraState,
    /// Where texture files are looked up.
    pub asset_dir: PathBuf,
    pub clear_colour: [f64; 4],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed_factor: 1.0,
            show_orbit_guides: true,
            clock_mode: ClockMode::default(),
            star_count: 18_000,
            star_distance: 22.0,
            star_seed: 0x0_5eed,
            planet_subdivisions: 6,
            camera: CameraState::default(),
            asset_dir: PathBuf::from("assets"),
            clear_colour: [0.0, 0.0, 0.0, 1.0],
        }
    }
}
