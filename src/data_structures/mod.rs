//! Engine data structures: meshes, the packed scene buffer and the orbital hierarchy.
//!
//! - `mesh` holds CPU-side vertex attributes of one generated sub-mesh
//! - `scene_buffer` packs sub-meshes into one buffer and a table of draw regions
//! - `scene_graph` holds orbiting bodies and evaluates their nested transforms
//! - `instance` describes the GPU vertex and per-draw layouts (feature `viewer`)
//! - `texture` wraps GPU textures (feature `viewer`)

#[cfg(feature = "viewer")]
pub mod instance;
pub mod mesh;
pub mod scene_buffer;
pub mod scene_graph;
#[cfg(feature = "viewer")]
pub mod texture;
