//! Resource creation: procedural meshes, and texture loading for the viewer.

pub mod mesh;
#[cfg(feature = "viewer")]
pub mod texture;
