#![allow(dead_code)]

use flow_orrery::{
    Matrix4, Point3,
    data_structures::scene_buffer::{DrawTable, SceneBuffer},
    render::{DrawCall, DrawLayer, DrawTarget},
    settings::Settings,
};

pub const EPS: f32 = 1e-4;

/// Routes `log` output through the test harness. Set `RUST_LOG` to see it.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

/// Shortest distance between two angles in degrees, ignoring full turns.
pub fn angle_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

pub fn distance(a: Point3<f32>, b: Point3<f32>) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2) + (a.z - b.z).powi(2)).sqrt()
}

/// Where a model-view matrix puts the local origin.
pub fn origin_of(m: &Matrix4<f32>) -> Point3<f32> {
    Point3::new(m.w.x, m.w.y, m.w.z)
}

/// A scene that is quick to build: coarse spheres and few stars.
pub fn small_settings() -> Settings {
    Settings {
        star_count: 500,
        planet_subdivisions: 2,
        ..Settings::default()
    }
}

/// Positions belonging to one region of a packed buffer.
pub fn region_positions<'a>(
    buffer: &'a SceneBuffer,
    table: &DrawTable,
    name: &str,
) -> &'a [[f32; 4]] {
    let (_, region) = table.by_name(name).expect("region exists");
    &buffer.positions()[region.offset as usize..(region.offset + region.count) as usize]
}

/// Collects everything a frame hands to its target.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub frames_begun: u32,
    pub frames_ended: u32,
    pub projection: Option<Matrix4<f32>>,
    pub calls: Vec<DrawCall>,
}

impl RecordingTarget {
    pub fn layers(&self) -> Vec<DrawLayer> {
        self.calls.iter().map(|call| call.layer).collect()
    }
}

impl DrawTarget for RecordingTarget {
    fn begin_frame(&mut self, projection: &Matrix4<f32>) {
        self.frames_begun += 1;
        self.projection = Some(*projection);
        self.calls.clear();
    }

    fn draw(&mut self, call: &DrawCall) {
        self.calls.push(call.clone());
    }

    fn end_frame(&mut self) {
        self.frames_ended += 1;
    }
}
