//! flow-orrery
//!
//! A procedural, camera-navigable orrery. The crate builds every piece of
//! geometry procedurally, packs it into one vertex buffer with a table of named
//! draw regions, and re-evaluates nested orbital transforms every frame. A
//! windowed wgpu viewer is available behind the `viewer` feature; everything
//! else is backend-agnostic and runs without a GPU.
//!
//! High-level modules
//! - `animation`: the clock that advances orbital angles
//! - `camera`: tumble/zoom camera state and the shared projection
//! - `data_structures`: meshes, the packed scene buffer and the orbital hierarchy
//! - `resources`: procedural mesh generators (and texture loading for the viewer)
//! - `render`: frame orchestration and the draw-call stream
//! - `scene`: the default sun, planets, moons and ring system
//! - `settings`: start-up configuration
//! - `context`, `flow`, `pipelines` (feature `viewer`): GPU context, event loop
//!   and render pipelines
//!

pub mod animation;
pub mod camera;
pub mod data_structures;
pub mod render;
pub mod resources;
pub mod scene;
pub mod settings;

#[cfg(feature = "viewer")]
pub mod context;
#[cfg(feature = "viewer")]
pub mod flow;
#[cfg(feature = "viewer")]
pub mod pipelines;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Deg, Matrix4, Point3};
pub use instant::Duration;
