//! Packing of many sub-meshes into one addressable vertex buffer.
//!
//! A [`SceneLayout`] is the one ordered list of named sub-meshes. [`pack`] walks
//! it exactly once: every sub-mesh is appended to the [`SceneBuffer`] and its
//! [`DrawRegion`] is recorded in the same step, so the offsets can never drift
//! away from the concatenation order.

use anyhow::ensure;

use crate::data_structures::mesh::{MeshData, Primitive};

/// Reference to a texture by file name. Decoding happens elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureRef(pub String);

impl TextureRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Index of a region inside its [`DrawTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub(crate) usize);

impl RegionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A contiguous slice of the combined buffer plus what is needed to draw it.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawRegion {
    pub name: String,
    pub offset: u32,
    pub count: u32,
    pub primitive: Primitive,
    pub texture: Option<TextureRef>,
}

impl DrawRegion {
    pub fn range(&self) -> std::ops::Range<u32> {
        self.offset..self.offset + self.count
    }
}

struct SubMesh {
    name: String,
    mesh: MeshData,
    texture: Option<TextureRef>,
}

/// Ordered list of named sub-meshes waiting to be packed.
#[derive(Default)]
pub struct SceneLayout {
    entries: Vec<SubMesh>,
}

impl SceneLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sub-mesh and returns the id its region will have after [`pack`].
    pub fn push(
        &mut self,
        name: impl Into<String>,
        mesh: MeshData,
        texture: Option<TextureRef>,
    ) -> RegionId {
        self.entries.push(SubMesh {
            name: name.into(),
            mesh,
            texture,
        });
        RegionId(self.entries.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.entries.iter().map(|e| e.mesh.len()).sum()
    }
}

/// Three parallel attribute arrays of equal length, built once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneBuffer {
    positions: Vec<[f32; 4]>,
    colors: Vec<[f32; 4]>,
    tex_coords: Vec<[f32; 2]>,
}

impl SceneBuffer {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 4]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    pub fn tex_coords(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    /// Interleaves the attributes into one vertex per index, ready for upload.
    pub fn interleaved(&self) -> Vec<SceneVertex> {
        self.positions
            .iter()
            .zip(&self.colors)
            .zip(&self.tex_coords)
            .map(|((position, color), tex_coords)| SceneVertex {
                position: *position,
                color: *color,
                tex_coords: *tex_coords,
            })
            .collect()
    }
}

/// One interleaved vertex of the combined buffer as it is stored on the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneVertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
    pub tex_coords: [f32; 2],
}

/// Regions in construction order. Immutable once packed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawTable {
    regions: Vec<DrawRegion>,
}

impl DrawTable {
    pub fn get(&self, id: RegionId) -> Option<&DrawRegion> {
        self.regions.get(id.0)
    }

    pub fn by_name(&self, name: &str) -> Option<(RegionId, &DrawRegion)> {
        self.regions
            .iter()
            .enumerate()
            .find(|(_, region)| region.name == name)
            .map(|(idx, region)| (RegionId(idx), region))
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &DrawRegion)> {
        self.regions
            .iter()
            .enumerate()
            .map(|(idx, region)| (RegionId(idx), region))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Sum of all region counts.
    pub fn vertex_count(&self) -> u32 {
        self.regions.iter().map(|r| r.count).sum()
    }
}

/// Concatenates every sub-mesh of `layout` into one buffer and records its region.
///
/// Sub-meshes without UVs get `(0, 0)` placeholders so all attribute arrays stay
/// equally long. Fails if a sub-mesh's own arrays disagree in length.
pub fn pack(layout: SceneLayout) -> anyhow::Result<(SceneBuffer, DrawTable)> {
    let total = layout.vertex_count();
    ensure!(
        u32::try_from(total).is_ok(),
        "scene holds {} vertices, which does not fit a u32 draw range",
        total
    );
    let mut buffer = SceneBuffer {
        positions: Vec::with_capacity(total),
        colors: Vec::with_capacity(total),
        tex_coords: Vec::with_capacity(total),
    };
    let mut regions = Vec::with_capacity(layout.len());

    for SubMesh {
        name,
        mesh,
        texture,
    } in layout.entries
    {
        let count = mesh.len();
        ensure!(
            mesh.colors.len() == count,
            "sub-mesh {:?} has {} positions but {} colors",
            name,
            count,
            mesh.colors.len()
        );
        ensure!(
            !mesh.has_tex_coords() || mesh.tex_coords.len() == count,
            "sub-mesh {:?} has {} positions but {} texture coordinates",
            name,
            count,
            mesh.tex_coords.len()
        );

        let offset = buffer.positions.len() as u32;
        buffer.positions.extend_from_slice(&mesh.positions);
        buffer.colors.extend_from_slice(&mesh.colors);
        if mesh.has_tex_coords() {
            buffer.tex_coords.extend_from_slice(&mesh.tex_coords);
        } else {
            buffer.tex_coords.resize(buffer.positions.len(), [0.0, 0.0]);
        }

        log::debug!("packed {:?}: offset {}, count {}", name, offset, count);
        regions.push(DrawRegion {
            name,
            offset,
            count: count as u32,
            primitive: mesh.primitive,
            texture,
        });
    }

    Ok((buffer, DrawTable { regions }))
}
