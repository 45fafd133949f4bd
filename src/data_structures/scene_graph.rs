//! Orbital hierarchy and hierarchical transform evaluation.
//!
//! Bodies live in an arena where a parent is always inserted before its
//! children. A body's model-view matrix is its parent's model-view matrix
//! (or the camera's view matrix for top-level bodies) multiplied on the right by
//! the body's own local orbit:
//!
//! ```text
//! view · rotY(parent.angle) · translate(parent.radius) · rotY(angle) · translate(radius)
//! ```
//!
//! Because the parent's factors stay on the left, a satellite follows its
//! parent's orbit without any bookkeeping of its own.

use anyhow::ensure;
use cgmath::{Deg, EuclideanSpace, Matrix4, Point3, SquareMatrix, Transform, Vector3};

use crate::data_structures::scene_buffer::{RegionId, TextureRef};

/// Index of a body inside its [`SolarSystem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub(crate) usize);

impl BodyId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A body on a circular orbit around the sun or around another body.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitingBody {
    pub name: String,
    pub orbit_radius: f32,
    /// Degrees per reference frame at speed factor 1.
    pub base_speed: f32,
    /// Current orbital angle in degrees, kept in `[0, 360)` by the clock.
    pub angle: f32,
    /// Size relative to the unit sphere; baked into the mesh at build time.
    pub scale: f32,
    /// Vertical offset of the orbit plane relative to the parent.
    pub plane_offset: f32,
    pub parent: Option<BodyId>,
    pub region: RegionId,
    pub texture: Option<TextureRef>,
}

impl OrbitingBody {
    pub fn phase_mut(&mut self) -> OrbitPhase<'_> {
        OrbitPhase {
            base_speed: self.base_speed,
            angle: &mut self.angle,
        }
    }

    /// `rotY(angle) · translate(orbit_radius, plane_offset, 0)`
    pub fn local_transform(&self) -> Matrix4<f32> {
        Matrix4::from_angle_y(Deg(self.angle))
            * Matrix4::from_translation(Vector3::new(self.orbit_radius, self.plane_offset, 0.0))
    }
}

/// The only part of a body that changes once it is in a [`SolarSystem`].
#[derive(Debug)]
pub struct OrbitPhase<'a> {
    /// Degrees per reference frame at speed factor 1.
    pub base_speed: f32,
    pub angle: &'a mut f32,
}

/// The fixed body at the centre. Drawn with the bare view transform.
#[derive(Clone, Debug, PartialEq)]
pub struct Sun {
    pub name: String,
    pub region: RegionId,
    pub texture: Option<TextureRef>,
}

/// A physical ring system riding on a body with a fixed axial tilt.
#[derive(Clone, Debug, PartialEq)]
pub struct RingSystem {
    pub name: String,
    pub region: RegionId,
    pub parent: BodyId,
    /// Rotation about the X axis applied after moving to the parent.
    pub tilt: Deg<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolarSystem {
    pub sun: Sun,
    bodies: Vec<OrbitingBody>,
    ring_systems: Vec<RingSystem>,
}

impl SolarSystem {
    pub fn new(sun: Sun) -> Self {
        Self {
            sun,
            bodies: Vec::new(),
            ring_systems: Vec::new(),
        }
    }

    /// Inserts a body. Its parent, if any, must already be present.
    pub fn add_body(&mut self, body: OrbitingBody) -> anyhow::Result<BodyId> {
        if let Some(parent) = body.parent {
            ensure!(
                parent.0 < self.bodies.len(),
                "body {:?} refers to parent #{} but only {} bodies exist",
                body.name,
                parent.0,
                self.bodies.len()
            );
        }
        self.bodies.push(body);
        Ok(BodyId(self.bodies.len() - 1))
    }

    pub fn add_ring_system(&mut self, ring: RingSystem) -> anyhow::Result<()> {
        ensure!(
            ring.parent.0 < self.bodies.len(),
            "ring system {:?} refers to unknown body #{}",
            ring.name,
            ring.parent.0
        );
        self.ring_systems.push(ring);
        Ok(())
    }

    pub fn body(&self, id: BodyId) -> Option<&OrbitingBody> {
        self.bodies.get(id.0)
    }

    pub fn bodies(&self) -> &[OrbitingBody] {
        &self.bodies
    }

    /// Orbital phases of all bodies in arena order. The hierarchy itself is
    /// fixed once a body is added.
    pub fn phases_mut(&mut self) -> impl Iterator<Item = OrbitPhase<'_>> {
        self.bodies.iter_mut().map(OrbitingBody::phase_mut)
    }

    /// Returns `false` if `id` is not part of this system.
    pub fn set_angle(&mut self, id: BodyId, angle: f32) -> bool {
        match self.bodies.get_mut(id.0) {
            Some(body) => {
                body.angle = angle;
                true
            }
            None => false,
        }
    }

    pub fn ring_systems(&self) -> &[RingSystem] {
        &self.ring_systems
    }

    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.bodies
            .iter()
            .position(|body| body.name == name)
            .map(BodyId)
    }

    /// Top-level bodies in increasing orbital radius.
    pub fn planets(&self) -> Vec<BodyId> {
        let mut planets: Vec<BodyId> = self
            .bodies
            .iter()
            .enumerate()
            .filter(|(_, body)| body.parent.is_none())
            .map(|(idx, _)| BodyId(idx))
            .collect();
        planets.sort_by(|a, b| {
            self.bodies[a.0]
                .orbit_radius
                .total_cmp(&self.bodies[b.0].orbit_radius)
        });
        planets
    }

    /// Bodies that orbit another body, every parent ahead of its children.
    pub fn satellites(&self) -> Vec<BodyId> {
        self.bodies
            .iter()
            .enumerate()
            .filter(|(_, body)| body.parent.is_some())
            .map(|(idx, _)| BodyId(idx))
            .collect()
    }

    /// Model-view matrix of one body, composed from `base` down its parent chain.
    ///
    /// `None` for unknown ids and for bodies whose parent does not precede them.
    pub fn model_view(&self, base: &Matrix4<f32>, id: BodyId) -> Option<Matrix4<f32>> {
        let body = self.bodies.get(id.0)?;
        let parent = match body.parent {
            // parents precede children, which also rules out cycles
            Some(parent) if parent.0 < id.0 => self.model_view(base, parent)?,
            Some(_) => return None,
            None => *base,
        };
        Some(parent * body.local_transform())
    }

    /// Model-view matrices of all bodies in arena order, computed in one pass.
    ///
    /// A body whose parent chain cannot be evaluated gets `None`.
    pub fn model_views(&self, base: &Matrix4<f32>) -> Vec<Option<Matrix4<f32>>> {
        let mut out: Vec<Option<Matrix4<f32>>> = Vec::with_capacity(self.bodies.len());
        for body in &self.bodies {
            let parent = match body.parent {
                // only already evaluated entries are visible here
                Some(parent) => out.get(parent.0).copied().flatten(),
                None => Some(*base),
            };
            if parent.is_none() {
                log::warn!("body {:?} has no evaluable parent #{:?}", body.name, body.parent);
            }
            out.push(parent.map(|parent| parent * body.local_transform()));
        }
        out
    }

    /// `parent model-view · rotX(tilt)`. The ring has no orbital angle of its own.
    pub fn ring_system_model_view(
        &self,
        base: &Matrix4<f32>,
        ring: &RingSystem,
    ) -> Option<Matrix4<f32>> {
        self.model_view(base, ring.parent)
            .map(|parent| parent * Matrix4::from_angle_x(ring.tilt))
    }

    /// Position of a body's centre in sun-centred world space.
    pub fn world_position(&self, id: BodyId) -> Option<Point3<f32>> {
        self.model_view(&Matrix4::identity(), id)
            .map(|m| m.transform_point(Point3::origin()))
    }
}
