//! CPU-side mesh data produced by the procedural generators.
//!
//! A [`MeshData`] keeps its vertex attributes as parallel arrays so that many
//! sub-meshes can be concatenated attribute by attribute into one
//! [`SceneBuffer`](crate::data_structures::scene_buffer::SceneBuffer).

/// How a run of vertices is assembled when it is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Every three consecutive vertices form one triangle.
    Triangles,
    /// Every vertex is drawn as a single point.
    Points,
}

/// Ordered vertices of one sub-mesh.
///
/// `positions` are homogeneous (`w == 1.0`), `colors` are RGBA. `tex_coords` is
/// either empty (the mesh has no meaningful UVs) or exactly as long as
/// `positions`.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 4]>,
    pub colors: Vec<[f32; 4]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub primitive: Primitive,
}

impl MeshData {
    pub fn new(primitive: Primitive) -> Self {
        Self {
            positions: Vec::new(),
            colors: Vec::new(),
            tex_coords: Vec::new(),
            primitive,
        }
    }

    pub fn with_capacity(primitive: Primitive, capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
            tex_coords: Vec::new(),
            primitive,
        }
    }

    /// Number of vertices, which is also the draw count of this mesh.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn has_tex_coords(&self) -> bool {
        !self.tex_coords.is_empty()
    }

    /// Scales every position around the origin.
    pub fn scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.positions.iter_mut().for_each(|p| {
            p[0] *= x;
            p[1] *= y;
            p[2] *= z;
        });
        self
    }

    pub fn scale_uniform(self, s: f32) -> Self {
        self.scale(s, s, s)
    }

    pub fn translate(mut self, x: f32, y: f32, z: f32) -> Self {
        self.positions.iter_mut().for_each(|p| {
            p[0] += x;
            p[1] += y;
            p[2] += z;
        });
        self
    }

    /// Drops the UVs, the packed buffer then fills in `(0, 0)`.
    pub fn without_tex_coords(mut self) -> Self {
        self.tex_coords.clear();
        self
    }

    /// Replaces the color of every vertex.
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.colors.iter_mut().for_each(|c| *c = color);
        self
    }
}
