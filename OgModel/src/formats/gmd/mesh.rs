//! Mesh table
//!
//! Every mesh in a GMD file is skinned: each vertex carries its own list of
//! bone weights, and the length of that list is stored in front of it. The
//! format has no field saying which kind of mesh follows, so the decoder
//! always produces [`Mesh::Animated`] and the encoder refuses
//! [`Mesh::Static`].

use std::io::{Read, Write};

use glam::{Vec2, Vec3};

use super::primitives::{GmdReadExt, GmdWriteExt, PREALLOC_LIMIT, wire_count};
use crate::error::{Error, Result};

/// One bone's contribution to a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWeight {
    /// Index into the model's bone table.
    pub bone_id: i32,
    /// Position in the bone's space.
    pub origin: Vec3,
    /// Normal in the bone's space.
    pub normal: Vec3,
    pub influence: f32,
}

impl VertexWeight {
    pub fn new(bone_id: i32, origin: Vec3, normal: Vec3, influence: f32) -> Self {
        Self {
            bone_id,
            origin,
            normal,
            influence,
        }
    }

    fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            bone_id: reader.read_gmd_i32()?,
            origin: reader.read_gmd_vec3()?,
            normal: reader.read_gmd_vec3()?,
            influence: reader.read_gmd_f32()?,
        })
    }

    fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_gmd_i32(self.bone_id)?;
        writer.write_gmd_vec3(self.origin)?;
        writer.write_gmd_vec3(self.normal)?;
        writer.write_gmd_f32(self.influence)
    }
}

/// A skinned vertex. A vertex with no weights is valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertex {
    pub weights: Vec<VertexWeight>,
}

impl Vertex {
    #[must_use]
    pub fn new(weights: Vec<VertexWeight>) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn num_weights(&self) -> usize {
        self.weights.len()
    }

    /// Sum of all weight influences.
    #[must_use]
    pub fn total_influence(&self) -> f32 {
        self.weights.iter().map(|w| w.influence).sum()
    }
}

/// A skinned mesh.
///
/// `tex_coords` holds one entry per vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimatedMesh {
    pub name: String,
    pub material: String,
    /// Opaque to the codec.
    pub flags: i32,
    /// Opaque to the codec.
    pub detail_level: i32,
    pub indices: Vec<i32>,
    pub tex_coords: Vec<Vec2>,
    pub vertices: Vec<Vertex>,
}

impl AnimatedMesh {
    pub fn new(name: impl Into<String>, material: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: material.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn num_verts(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn num_indices(&self) -> usize {
        self.indices.len()
    }

    /// Append a vertex and its texture coordinate, returning its index.
    pub fn add_vertex(&mut self, tex_coord: Vec2, weights: Vec<VertexWeight>) -> usize {
        self.tex_coords.push(tex_coord);
        self.vertices.push(Vertex::new(weights));
        self.vertices.len() - 1
    }

    fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let name = reader.read_gmd_string()?;
        let material = reader.read_gmd_string()?;
        let flags = reader.read_gmd_i32()?;
        let detail_level = reader.read_gmd_i32()?;

        let num_verts = reader.read_gmd_u32()? as usize;
        let num_indices = reader.read_gmd_u32()? as usize;

        let indices = reader.read_gmd_i32_vec(num_indices)?;

        let mut tex_coords = Vec::with_capacity(num_verts.min(PREALLOC_LIMIT));
        for _ in 0..num_verts {
            tex_coords.push(reader.read_gmd_vec2()?);
        }

        let mut vertices = Vec::with_capacity(num_verts.min(PREALLOC_LIMIT));
        for _ in 0..num_verts {
            let num_weights = reader.read_gmd_u32()? as usize;
            let mut weights = Vec::with_capacity(num_weights.min(PREALLOC_LIMIT));
            for _ in 0..num_weights {
                weights.push(VertexWeight::read(reader)?);
            }
            vertices.push(Vertex { weights });
        }

        Ok(Self {
            name,
            material,
            flags,
            detail_level,
            indices,
            tex_coords,
            vertices,
        })
    }

    fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        if self.tex_coords.len() != self.vertices.len() {
            return Err(Error::MeshLayoutMismatch {
                mesh: self.name.clone(),
                vertices: self.vertices.len(),
                tex_coords: self.tex_coords.len(),
            });
        }

        writer.write_gmd_string(&self.name)?;
        writer.write_gmd_string(&self.material)?;
        writer.write_gmd_i32(self.flags)?;
        writer.write_gmd_i32(self.detail_level)?;
        writer.write_gmd_u32(wire_count("vertices", self.vertices.len())?)?;
        writer.write_gmd_u32(wire_count("indices", self.indices.len())?)?;

        writer.write_gmd_i32_slice(&self.indices)?;
        for uv in &self.tex_coords {
            writer.write_gmd_vec2(*uv)?;
        }

        for vertex in &self.vertices {
            writer.write_gmd_u32(wire_count("vertex weights", vertex.weights.len())?)?;
            for weight in &vertex.weights {
                weight.write(writer)?;
            }
        }
        Ok(())
    }
}

/// An unskinned mesh. GMD files cannot store these.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticMesh {
    pub name: String,
    pub material: String,
    pub flags: i32,
    pub detail_level: i32,
    pub indices: Vec<i32>,
    pub tex_coords: Vec<Vec2>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
}

/// A mesh of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Mesh {
    Static(StaticMesh),
    Animated(AnimatedMesh),
}

impl Mesh {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Mesh::Static(m) => &m.name,
            Mesh::Animated(m) => &m.name,
        }
    }

    #[must_use]
    pub fn material(&self) -> &str {
        match self {
            Mesh::Static(m) => &m.material,
            Mesh::Animated(m) => &m.material,
        }
    }

    #[must_use]
    pub fn indices(&self) -> &[i32] {
        match self {
            Mesh::Static(m) => &m.indices,
            Mesh::Animated(m) => &m.indices,
        }
    }

    #[must_use]
    pub fn num_verts(&self) -> usize {
        match self {
            Mesh::Static(m) => m.positions.len(),
            Mesh::Animated(m) => m.vertices.len(),
        }
    }

    #[must_use]
    pub fn is_animated(&self) -> bool {
        matches!(self, Mesh::Animated(_))
    }

    #[must_use]
    pub fn as_animated(&self) -> Option<&AnimatedMesh> {
        match self {
            Mesh::Animated(m) => Some(m),
            Mesh::Static(_) => None,
        }
    }

    pub fn as_animated_mut(&mut self) -> Option<&mut AnimatedMesh> {
        match self {
            Mesh::Animated(m) => Some(m),
            Mesh::Static(_) => None,
        }
    }
}

impl From<AnimatedMesh> for Mesh {
    fn from(mesh: AnimatedMesh) -> Self {
        Mesh::Animated(mesh)
    }
}

impl From<StaticMesh> for Mesh {
    fn from(mesh: StaticMesh) -> Self {
        Mesh::Static(mesh)
    }
}

/// Decode `entries` meshes from a `Meshes` chunk payload.
pub fn read_meshes<R: Read + ?Sized>(reader: &mut R, entries: u32, meshes: &mut Vec<Mesh>) -> Result<()> {
    for _ in 0..entries {
        meshes.push(Mesh::Animated(AnimatedMesh::read(reader)?));
    }
    Ok(())
}

/// Encode every mesh in order.
pub fn write_meshes<W: Write + ?Sized>(writer: &mut W, meshes: &[Mesh]) -> Result<()> {
    for mesh in meshes {
        match mesh {
            Mesh::Animated(m) => m.write(writer)?,
            Mesh::Static(m) => {
                return Err(Error::UnsupportedMeshKind {
                    mesh: m.name.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn weight(bone_id: i32, influence: f32) -> VertexWeight {
        VertexWeight::new(bone_id, Vec3::new(0.5, 1.0, -0.5), Vec3::Y, influence)
    }

    fn decode(buf: Vec<u8>, entries: u32) -> Result<Vec<Mesh>> {
        let mut meshes = Vec::new();
        read_meshes(&mut Cursor::new(buf), entries, &mut meshes)?;
        Ok(meshes)
    }

    #[test]
    fn test_weight_lists_keep_length_and_order() {
        let mut mesh = AnimatedMesh::new("Body", "skin");
        mesh.flags = 0x10;
        mesh.detail_level = 2;
        mesh.add_vertex(Vec2::new(0.0, 0.0), Vec::new());
        mesh.add_vertex(Vec2::new(1.0, 0.0), vec![weight(3, 0.2), weight(1, 0.3), weight(2, 0.5)]);
        mesh.indices = vec![0, 1, 1];

        let mut buf: Vec<u8> = Vec::new();
        write_meshes(&mut buf, &[mesh.clone().into()]).unwrap();

        let meshes = decode(buf, 1).unwrap();
        assert_eq!(meshes, vec![Mesh::Animated(mesh)]);
        let decoded = meshes[0].as_animated().unwrap();
        let ids: Vec<i32> = decoded.vertices[1].weights.iter().map(|w| w.bone_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(decoded.vertices[0].num_weights(), 0);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = AnimatedMesh::new("Empty", "");
        let mut buf: Vec<u8> = Vec::new();
        write_meshes(&mut buf, &[mesh.clone().into()]).unwrap();

        // name (4 + 5) | material (4) | flags | detail | numVerts | numIndices
        assert_eq!(buf.len(), 9 + 4 + 16);
        assert_eq!(decode(buf, 1).unwrap(), vec![Mesh::Animated(mesh)]);
    }

    #[test]
    fn test_indices_are_not_range_checked() {
        let mut mesh = AnimatedMesh::new("Loose", "m");
        mesh.add_vertex(Vec2::ZERO, Vec::new());
        mesh.indices = vec![0, 42, -1];

        let mut buf: Vec<u8> = Vec::new();
        write_meshes(&mut buf, &[mesh.clone().into()]).unwrap();
        assert_eq!(decode(buf, 1).unwrap(), vec![Mesh::Animated(mesh)]);
    }

    #[test]
    fn test_texcoord_mismatch_rejected() {
        let mut mesh = AnimatedMesh::new("Bad", "m");
        mesh.vertices.push(Vertex::default());

        let err = write_meshes(&mut Vec::<u8>::new(), &[mesh.into()]).unwrap_err();
        assert!(matches!(
            err,
            Error::MeshLayoutMismatch { vertices: 1, tex_coords: 0, .. }
        ));
    }

    #[test]
    fn test_static_mesh_rejected() {
        let mesh = StaticMesh {
            name: "Rock".to_string(),
            ..StaticMesh::default()
        };
        let err = write_meshes(&mut Vec::<u8>::new(), &[mesh.into()]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedMeshKind { mesh } if mesh == "Rock"));
    }

    #[test]
    fn test_huge_weight_count_fails_cleanly() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_gmd_string("M").unwrap();
        buf.write_gmd_string("").unwrap();
        buf.write_gmd_i32(0).unwrap();
        buf.write_gmd_i32(0).unwrap();
        buf.write_gmd_u32(1).unwrap(); // numVerts
        buf.write_gmd_u32(0).unwrap(); // numIndices
        buf.write_gmd_floats(&[0.0, 0.0]).unwrap();
        buf.write_gmd_u32(u32::MAX).unwrap(); // numWeights

        let err = decode(buf, 1).unwrap_err();
        assert!(err.is_unexpected_eof());
    }
}
