//! In-memory model document

use std::path::Path;

use super::bone::Bone;
use super::mesh::{AnimatedMesh, Mesh};
use super::{DEFAULT_APP_NAME, DEFAULT_AUTHOR};

/// Metadata strings stored in a GMD file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GmdHeader {
    pub name: String,
    pub author: String,
    pub app_name: String,
}

impl Default for GmdHeader {
    fn default() -> Self {
        Self {
            name: String::new(),
            author: DEFAULT_AUTHOR.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }
}

impl GmdHeader {
    /// Header for saving to `path`: the model name is the file name without
    /// directory or extension.
    pub fn for_path(path: impl AsRef<Path>) -> Self {
        let name = path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            ..Self::default()
        }
    }
}

/// A skinned model: a bone table and a list of meshes.
///
/// A bone's index is its position in `bones`; vertex weights refer to bones
/// by that index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    /// Model name from the file header.
    pub name: String,
    /// Author from the file header.
    pub author: String,
    /// Name of the application that wrote the file.
    pub app_name: String,
    pub bones: Vec<Bone>,
    pub meshes: Vec<Mesh>,
}

impl Model {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The header metadata this model was loaded with.
    #[must_use]
    pub fn header(&self) -> GmdHeader {
        GmdHeader {
            name: self.name.clone(),
            author: self.author.clone(),
            app_name: self.app_name.clone(),
        }
    }

    #[must_use]
    pub fn num_bones(&self) -> usize {
        self.bones.len()
    }

    #[must_use]
    pub fn num_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Append a bone, returning its index.
    pub fn add_bone(&mut self, bone: Bone) -> usize {
        self.bones.push(bone);
        self.bones.len() - 1
    }

    /// Append a mesh, returning its index.
    pub fn add_mesh(&mut self, mesh: impl Into<Mesh>) -> usize {
        self.meshes.push(mesh.into());
        self.meshes.len() - 1
    }

    /// Find a bone index by name (exact match).
    #[must_use]
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    /// Iterate over the skinned meshes.
    pub fn animated_meshes(&self) -> impl Iterator<Item = &AnimatedMesh> {
        self.meshes.iter().filter_map(Mesh::as_animated)
    }

    /// Total vertex count over all meshes.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(Mesh::num_verts).sum()
    }
}
