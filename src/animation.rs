//! Orbital animation clock.
//!
//! Bodies move by a base angular speed expressed in degrees per reference
//! frame. [`AnimationClock::tick`] applies exactly one such step per rendered
//! frame, which ties motion to the achieved frame rate. [`AnimationClock::advance`]
//! scales the step by elapsed wall-clock time instead, so a slow frame moves
//! bodies further and speed no longer depends on the refresh rate.

use instant::Duration;

use crate::data_structures::scene_graph::OrbitPhase;

/// The frame length base speeds are expressed against.
pub const REFERENCE_FRAME: Duration = Duration::from_nanos(16_666_667);

/// Which of the two stepping rules the renderer applies each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClockMode {
    /// One fixed step per rendered frame.
    PerFrame,
    /// Steps proportional to the elapsed time since the last frame.
    #[default]
    Elapsed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationClock {
    /// Global multiplier on every body's base speed. `0.0` freezes all motion.
    pub speed_factor: f32,
    pub mode: ClockMode,
}

impl AnimationClock {
    pub fn new(speed_factor: f32, mode: ClockMode) -> Self {
        Self { speed_factor, mode }
    }

    /// Steps all bodies according to [`Self::mode`].
    pub fn step<'a>(&self, bodies: impl IntoIterator<Item = OrbitPhase<'a>>, dt: Duration) {
        match self.mode {
            ClockMode::PerFrame => self.tick(bodies),
            ClockMode::Elapsed => self.advance(bodies, dt),
        }
    }

    /// Advances every body by one reference frame.
    pub fn tick<'a>(&self, bodies: impl IntoIterator<Item = OrbitPhase<'a>>) {
        self.apply(bodies, 1.0);
    }

    /// Advances every body by `dt` worth of reference frames.
    pub fn advance<'a>(&self, bodies: impl IntoIterator<Item = OrbitPhase<'a>>, dt: Duration) {
        let frames = dt.as_secs_f64() / REFERENCE_FRAME.as_secs_f64();
        self.apply(bodies, frames as f32);
    }

    fn apply<'a>(&self, bodies: impl IntoIterator<Item = OrbitPhase<'a>>, frames: f32) {
        if !self.speed_factor.is_finite() {
            log::warn!("ignoring non-finite speed factor {}", self.speed_factor);
            return;
        }
        for body in bodies {
            *body.angle = wrap_degrees(*body.angle + body.base_speed * self.speed_factor * frames);
        }
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(1.0, ClockMode::default())
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
