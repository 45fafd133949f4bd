//! Tumble/dolly camera and the shared perspective projection.
//!
//! The camera never moves through the scene on its own. Pointer drags
//! accumulate a two-axis tumble, wheel steps scale a bounded zoom factor, and
//! [`CameraState::view_matrix`] turns both into the base transform every body's
//! model-view matrix starts from.

use cgmath::{Deg, Matrix4, Rad, perspective};

/// Degrees of tumble per device pixel of drag.
pub const DRAG_SENSITIVITY: f32 = 0.8;
/// Multiplicative zoom change per wheel step.
pub const ZOOM_STEP: f32 = 1.1;
pub const MIN_ZOOM: f32 = 0.2;
pub const MAX_ZOOM: f32 = 5.0;
/// Camera distance from the sun at zoom 1.
pub const BASE_DISTANCE: f32 = 12.0;

// cgmath produces OpenGL clip space (z in [-1, 1]); wgpu expects z in [0, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Direction of a single wheel step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zoom {
    In,
    Out,
}

impl Zoom {
    /// Interprets a web-style wheel delta: positive values scroll towards the
    /// user and zoom out. Only the sign matters; zero is not a step.
    pub fn from_wheel_delta(delta: f64) -> Option<Self> {
        if delta > 0.0 {
            Some(Zoom::Out)
        } else if delta < 0.0 {
            Some(Zoom::In)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// Rotation about the X axis in degrees. Unbounded.
    pub tumble_x: f32,
    /// Rotation about the Y axis in degrees. Unbounded.
    pub tumble_y: f32,
    zoom_scale: f32,
}

impl CameraState {
    pub fn new(tumble_x: f32, tumble_y: f32, zoom_scale: f32) -> Self {
        Self {
            tumble_x,
            tumble_y,
            zoom_scale: clamp_zoom(zoom_scale),
        }
    }

    pub fn zoom_scale(&self) -> f32 {
        self.zoom_scale
    }

    pub fn on_drag_delta(&mut self, dx: f32, dy: f32) {
        self.tumble_y += dx * DRAG_SENSITIVITY;
        self.tumble_x -= dy * DRAG_SENSITIVITY;
    }

    pub fn on_scroll(&mut self, zoom: Zoom) {
        let factor = match zoom {
            Zoom::In => ZOOM_STEP,
            Zoom::Out => 1.0 / ZOOM_STEP,
        };
        self.zoom_scale = clamp_zoom(self.zoom_scale * factor);
    }

    /// Distance of the eye from the sun. Shrinks as the zoom grows.
    pub fn distance(&self) -> f32 {
        BASE_DISTANCE / self.zoom_scale
    }

    /// `translate(0, 0, -distance) · rotateX(tumble_x) · rotateY(tumble_y)`
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation((0.0, 0.0, -self.distance()).into())
            * Matrix4::from_angle_x(Deg(self.tumble_x))
            * Matrix4::from_angle_y(Deg(self.tumble_y))
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(-30.0, 20.0, 1.0)
    }
}

fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Perspective projection shared by every draw of a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: aspect_ratio(width, height),
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Surface sizes of zero (minimised windows) keep the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = aspect_ratio(width, height);
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(1, 1, Deg(45.0), 0.1, 100.0)
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_saturates_at_both_bounds() {
        let mut camera = CameraState::default();
        (0..100).for_each(|_| camera.on_scroll(Zoom::In));
        assert_eq!(camera.zoom_scale(), MAX_ZOOM);
        (0..100).for_each(|_| camera.on_scroll(Zoom::Out));
        assert_eq!(camera.zoom_scale(), MIN_ZOOM);
    }

    #[test]
    fn zero_sized_resize_keeps_aspect() {
        let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        projection.resize(0, 600);
        assert!((projection.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }
}
