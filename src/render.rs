//! Per-frame orchestration.
//!
//! [`FrameRenderer`] owns the packed scene and the mutable [`SceneState`]. Each
//! frame it advances the animation clock, rebuilds the view matrix from the
//! latest camera state and emits [`DrawCall`]s in a fixed order:
//!
//! 1. the starfield
//! 2. orbit guides, if enabled
//! 3. the sun
//! 4. planets by increasing orbital radius
//! 5. ring systems
//! 6. satellites, parents before children
//!
//! The calls are handed to a [`DrawTarget`], which is where an actual graphics
//! backend plugs in.

use cgmath::Matrix4;
use instant::Duration;

use crate::{
    animation::AnimationClock,
    camera::{CameraState, Projection, Zoom},
    data_structures::{
        mesh::Primitive,
        scene_buffer::{DrawTable, RegionId, SceneBuffer, TextureRef},
        scene_graph::SolarSystem,
    },
    scene::Scene,
    settings::Settings,
};

/// What a draw call renders. Mirrors the draw order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DrawLayer {
    Stars,
    OrbitGuide,
    Sun,
    Planet,
    RingSystem,
    Satellite,
}

/// Everything needed to issue one draw of a region.
///
/// The texture travels with the call, so reordering draws can never leave a
/// previous draw's texture bound.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub layer: DrawLayer,
    pub region: RegionId,
    pub primitive: Primitive,
    pub offset: u32,
    pub count: u32,
    pub model_view: Matrix4<f32>,
    pub texture: Option<TextureRef>,
}

impl DrawCall {
    pub fn use_texture(&self) -> bool {
        self.texture.is_some()
    }
}

/// Receives the draws of one frame in order.
pub trait DrawTarget {
    fn begin_frame(&mut self, projection: &Matrix4<f32>);

    fn draw(&mut self, call: &DrawCall);

    fn end_frame(&mut self) {}
}

/// The draws of one frame plus the projection they share.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub projection: Matrix4<f32>,
    pub calls: Vec<DrawCall>,
}

/// Mutable state read once per frame and changed by input in between.
#[derive(Clone, Debug)]
pub struct SceneState {
    pub system: SolarSystem,
    pub camera: CameraState,
    pub clock: AnimationClock,
    pub show_orbit_guides: bool,
}

impl SceneState {
    pub fn new(system: SolarSystem, settings: &Settings) -> Self {
        Self {
            system,
            camera: settings.camera,
            clock: AnimationClock::new(settings.speed_factor, settings.clock_mode),
            show_orbit_guides: settings.show_orbit_guides,
        }
    }

    pub fn set_speed_factor(&mut self, speed_factor: f32) {
        if speed_factor.is_finite() {
            self.clock.speed_factor = speed_factor;
        } else {
            log::warn!("rejecting non-finite speed factor {}", speed_factor);
        }
    }

    /// Nudges the speed factor by `delta`, never below zero.
    pub fn adjust_speed_factor(&mut self, delta: f32) {
        self.set_speed_factor((self.clock.speed_factor + delta).max(0.0));
    }

    pub fn set_show_orbit_guides(&mut self, show: bool) {
        self.show_orbit_guides = show;
    }

    pub fn toggle_orbit_guides(&mut self) {
        self.show_orbit_guides = !self.show_orbit_guides;
    }

    pub fn on_drag_delta(&mut self, dx: f32, dy: f32) {
        self.camera.on_drag_delta(dx, dy);
    }

    pub fn on_scroll(&mut self, zoom: Zoom) {
        self.camera.on_scroll(zoom);
    }
}

pub struct FrameRenderer {
    buffer: SceneBuffer,
    table: DrawTable,
    stars: RegionId,
    orbit_guides: Vec<RegionId>,
    state: SceneState,
    projection: Projection,
}

impl FrameRenderer {
    pub fn new(scene: Scene, settings: &Settings) -> Self {
        let Scene {
            buffer,
            table,
            system,
            stars,
            orbit_guides,
        } = scene;
        Self {
            buffer,
            table,
            stars,
            orbit_guides,
            state: SceneState::new(system, settings),
            projection: Projection::default(),
        }
    }

    pub fn buffer(&self) -> &SceneBuffer {
        &self.buffer
    }

    pub fn table(&self) -> &DrawTable {
        &self.table
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SceneState {
        &mut self.state
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Only the projection depends on the surface size; geometry is untouched.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    /// Advances the clock by `dt` and returns the frame's draws.
    pub fn plan_frame(&mut self, dt: Duration) -> Frame {
        let clock = self.state.clock;
        clock.step(self.state.system.phases_mut(), dt);

        let base = self.state.camera.view_matrix();
        let system = &self.state.system;
        let mut calls = Vec::with_capacity(self.table.len());

        self.push(&mut calls, DrawLayer::Stars, self.stars, base, None);

        if self.state.show_orbit_guides {
            for &guide in &self.orbit_guides {
                self.push(&mut calls, DrawLayer::OrbitGuide, guide, base, None);
            }
        }

        self.push(
            &mut calls,
            DrawLayer::Sun,
            system.sun.region,
            base,
            system.sun.texture.clone(),
        );

        let model_views = system.model_views(&base);
        for id in system.planets() {
            let body = &system.bodies()[id.index()];
            let Some(model_view) = model_views[id.index()] else {
                log::warn!("skipping {:?}, its parent transform is unavailable", body.name);
                continue;
            };
            self.push(
                &mut calls,
                DrawLayer::Planet,
                body.region,
                model_view,
                body.texture.clone(),
            );
        }

        for ring in system.ring_systems() {
            let Some(model_view) = system.ring_system_model_view(&base, ring) else {
                log::warn!("ring system {:?} has no parent transform", ring.name);
                continue;
            };
            self.push(&mut calls, DrawLayer::RingSystem, ring.region, model_view, None);
        }

        for id in system.satellites() {
            let body = &system.bodies()[id.index()];
            let Some(model_view) = model_views[id.index()] else {
                log::warn!("skipping {:?}, its parent transform is unavailable", body.name);
                continue;
            };
            self.push(
                &mut calls,
                DrawLayer::Satellite,
                body.region,
                model_view,
                body.texture.clone(),
            );
        }

        Frame {
            projection: self.projection.calc_matrix(),
            calls,
        }
    }

    /// Plans the frame and replays it into `target`.
    pub fn render_frame<T: DrawTarget + ?Sized>(&mut self, dt: Duration, target: &mut T) -> Frame {
        let frame = self.plan_frame(dt);
        target.begin_frame(&frame.projection);
        frame.calls.iter().for_each(|call| target.draw(call));
        target.end_frame();
        frame
    }

    fn push(
        &self,
        calls: &mut Vec<DrawCall>,
        layer: DrawLayer,
        region: RegionId,
        model_view: Matrix4<f32>,
        texture: Option<TextureRef>,
    ) {
        let Some(entry) = self.table.get(region) else {
            log::warn!("skipping {:?} draw of unknown region #{}", layer, region.index());
            return;
        };
        if entry.count == 0 {
            log::warn!("you attempted to draw the empty region {:?}", entry.name);
            return;
        }
        calls.push(DrawCall {
            layer,
            region,
            primitive: entry.primitive,
            offset: entry.offset,
            count: entry.count,
            model_view,
            texture,
        });
    }
}
