use cgmath::{Deg, Point3, Transform, Vector4};
use flow_orrery::camera::{
    BASE_DISTANCE, CameraState, MAX_ZOOM, MIN_ZOOM, Projection, ZOOM_STEP, Zoom,
};

use crate::common::test_utils::{EPS, approx_eq};

mod common;

#[test]
fn starts_tilted_at_unit_zoom() {
    let camera = CameraState::default();
    assert_eq!(camera.tumble_x, -30.0);
    assert_eq!(camera.tumble_y, 20.0);
    assert_eq!(camera.zoom_scale(), 1.0);
    assert_eq!(camera.distance(), BASE_DISTANCE);
}

#[test]
fn horizontal_drag_spins_about_y() {
    let mut camera = CameraState::default();
    camera.on_drag_delta(100.0, 0.0);
    assert!(approx_eq(camera.tumble_y, 100.0, EPS));
    assert_eq!(camera.tumble_x, -30.0);
}

#[test]
fn vertical_drag_tilts_about_x() {
    let mut camera = CameraState::default();
    camera.on_drag_delta(0.0, 10.0);
    assert!(approx_eq(camera.tumble_x, -38.0, EPS));
    assert_eq!(camera.tumble_y, 20.0);

    // tumble is not clamped
    (0..100).for_each(|_| camera.on_drag_delta(0.0, -100.0));
    assert!(camera.tumble_x > 360.0);
}

#[test]
fn zoom_never_leaves_its_bounds() {
    let mut camera = CameraState::default();
    for i in 0..500u32 {
        // long runs in both directions, with some back and forth
        let step = if (i / 40) % 2 == 0 || i % 3 == 0 { Zoom::In } else { Zoom::Out };
        camera.on_scroll(step);
        let zoom = camera.zoom_scale();
        assert!((MIN_ZOOM..=MAX_ZOOM).contains(&zoom), "zoom {zoom} escaped after {i} steps");
    }

    (0..200).for_each(|_| camera.on_scroll(Zoom::In));
    assert_eq!(camera.zoom_scale(), MAX_ZOOM);
    (0..200).for_each(|_| camera.on_scroll(Zoom::Out));
    assert_eq!(camera.zoom_scale(), MIN_ZOOM);
}

#[test]
fn one_wheel_step_scales_by_the_zoom_step() {
    let mut camera = CameraState::default();
    camera.on_scroll(Zoom::In);
    assert!(approx_eq(camera.zoom_scale(), ZOOM_STEP, EPS));
    camera.on_scroll(Zoom::Out);
    camera.on_scroll(Zoom::Out);
    assert!(approx_eq(camera.zoom_scale(), 1.0 / ZOOM_STEP, EPS));
}

#[test]
fn out_of_range_initial_zoom_is_clamped() {
    assert_eq!(CameraState::new(0.0, 0.0, 50.0).zoom_scale(), MAX_ZOOM);
    assert_eq!(CameraState::new(0.0, 0.0, 0.0).zoom_scale(), MIN_ZOOM);
    assert_eq!(CameraState::new(0.0, 0.0, f32::NAN).zoom_scale(), 1.0);
}

#[test]
fn wheel_delta_sign_picks_the_direction() {
    assert_eq!(Zoom::from_wheel_delta(120.0), Some(Zoom::Out));
    assert_eq!(Zoom::from_wheel_delta(-3.0), Some(Zoom::In));
    assert_eq!(Zoom::from_wheel_delta(0.0), None);
}

#[test]
fn view_places_the_sun_in_front_of_the_eye() {
    let mut camera = CameraState::default();
    let sun = camera.view_matrix().transform_point(Point3::new(0.0, 0.0, 0.0));
    assert!(approx_eq(sun.x, 0.0, EPS) && approx_eq(sun.y, 0.0, EPS));
    assert!(approx_eq(sun.z, -BASE_DISTANCE, EPS));

    camera.on_scroll(Zoom::In);
    let closer = camera.view_matrix().transform_point(Point3::new(0.0, 0.0, 0.0));
    assert!(approx_eq(closer.z, -BASE_DISTANCE / ZOOM_STEP, EPS));
}

#[test]
fn projection_follows_surface_aspect() {
    let mut projection = Projection::default();
    assert_eq!(projection.aspect(), 1.0);
    projection.resize(1600, 900);
    assert!(approx_eq(projection.aspect(), 16.0 / 9.0, EPS));
    projection.resize(0, 0);
    assert!(approx_eq(projection.aspect(), 16.0 / 9.0, EPS));
}

#[test]
fn projection_maps_depth_into_zero_to_one() {
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let m = projection.calc_matrix();
    let near = m * Vector4::new(0.0, 0.0, -0.1, 1.0);
    let far = m * Vector4::new(0.0, 0.0, -100.0, 1.0);
    assert!(approx_eq(near.z / near.w, 0.0, 1e-3));
    assert!(approx_eq(far.z / far.w, 1.0, 1e-3));
}
