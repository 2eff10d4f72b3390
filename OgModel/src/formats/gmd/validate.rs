//! Semantic model validation
//!
//! The codec accepts any structurally sound file. These checks cover the
//! invariants it leaves to the caller:
//! - parents come before their children (which rules out cycles)
//! - vertex weights reference existing bones
//! - index buffers stay within the vertex count
//! - one texture coordinate per vertex
//!
//! Influence sums that stray from 1.0 are reported as warnings only.

use std::fmt;

use super::document::Model;
use super::mesh::Mesh;

/// Allowed distance of a vertex's influence sum from 1.0.
pub const INFLUENCE_TOLERANCE: f32 = 0.01;

/// A problem found in a model.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    /// Parent index is past the end of the bone table.
    ParentOutOfRange { bone: usize, parent: i32 },
    /// Parent does not precede the bone (self-reference or forward reference).
    ParentNotBefore { bone: usize, parent: i32 },
    /// A vertex weight names a bone that does not exist.
    BoneIdOutOfRange {
        mesh: usize,
        vertex: usize,
        bone_id: i32,
    },
    /// An index does not address a vertex.
    IndexOutOfRange {
        mesh: usize,
        position: usize,
        index: i32,
        num_verts: usize,
    },
    /// Texture coordinate and vertex counts differ.
    TexCoordCountMismatch {
        mesh: usize,
        vertices: usize,
        tex_coords: usize,
    },
    /// A skinned vertex's influences do not sum to 1.0.
    InfluenceSum { mesh: usize, vertex: usize, total: f32 },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParentOutOfRange { bone, parent } => {
                write!(f, "bone {bone}: parent index {parent} is out of range")
            }
            Self::ParentNotBefore { bone, parent } => {
                write!(f, "bone {bone}: parent index {parent} does not precede it")
            }
            Self::BoneIdOutOfRange {
                mesh,
                vertex,
                bone_id,
            } => write!(f, "mesh {mesh}, vertex {vertex}: bone id {bone_id} is out of range"),
            Self::IndexOutOfRange {
                mesh,
                position,
                index,
                num_verts,
            } => write!(
                f,
                "mesh {mesh}: index {index} at position {position} exceeds vertex count {num_verts}"
            ),
            Self::TexCoordCountMismatch {
                mesh,
                vertices,
                tex_coords,
            } => write!(
                f,
                "mesh {mesh}: {vertices} vertices but {tex_coords} texture coordinates"
            ),
            Self::InfluenceSum {
                mesh,
                vertex,
                total,
            } => write!(f, "mesh {mesh}, vertex {vertex}: influences sum to {total}"),
        }
    }
}

/// Result of model validation
#[derive(Clone, Debug, Default)]
pub struct ModelValidationResult {
    /// Whether no errors were found (warnings do not count)
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ModelValidationResult {
    /// Error descriptions, for reporting.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

fn index_in_range(index: i32, len: usize) -> bool {
    usize::try_from(index).is_ok_and(|i| i < len)
}

impl Model {
    /// Check the invariants the codec does not enforce.
    #[must_use]
    pub fn validate(&self) -> ModelValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let num_bones = self.bones.len();

        for (bone, b) in self.bones.iter().enumerate() {
            let parent = b.parent_index;
            if parent < 0 {
                continue;
            }
            if !index_in_range(parent, num_bones) {
                errors.push(ValidationIssue::ParentOutOfRange { bone, parent });
            } else if !index_in_range(parent, bone) {
                errors.push(ValidationIssue::ParentNotBefore { bone, parent });
            }
        }

        for (mesh, m) in self.meshes.iter().enumerate() {
            let num_verts = m.num_verts();
            for (position, &index) in m.indices().iter().enumerate() {
                if !index_in_range(index, num_verts) {
                    errors.push(ValidationIssue::IndexOutOfRange {
                        mesh,
                        position,
                        index,
                        num_verts,
                    });
                }
            }

            let tex_coords = match m {
                Mesh::Animated(a) => a.tex_coords.len(),
                Mesh::Static(s) => s.tex_coords.len(),
            };
            if tex_coords != num_verts {
                errors.push(ValidationIssue::TexCoordCountMismatch {
                    mesh,
                    vertices: num_verts,
                    tex_coords,
                });
            }

            let Mesh::Animated(animated) = m else {
                continue;
            };
            for (vertex, v) in animated.vertices.iter().enumerate() {
                for w in &v.weights {
                    if !index_in_range(w.bone_id, num_bones) {
                        errors.push(ValidationIssue::BoneIdOutOfRange {
                            mesh,
                            vertex,
                            bone_id: w.bone_id,
                        });
                    }
                }

                if !v.weights.is_empty() {
                    let total = v.total_influence();
                    if (total - 1.0).abs() > INFLUENCE_TOLERANCE {
                        warnings.push(ValidationIssue::InfluenceSum {
                            mesh,
                            vertex,
                            total,
                        });
                    }
                }
            }
        }

        ModelValidationResult {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::gmd::{AnimatedMesh, Bone, StaticMesh, VertexWeight};
    use glam::{Quat, Vec2, Vec3};

    fn bone(parent: i32) -> Bone {
        Bone::new("b", parent, Vec3::ZERO, Quat::IDENTITY)
    }

    fn skinned(bone_id: i32, influence: f32) -> VertexWeight {
        VertexWeight::new(bone_id, Vec3::ZERO, Vec3::Z, influence)
    }

    #[test]
    fn test_valid_model() {
        let mut model = Model::new();
        model.add_bone(bone(-1));
        model.add_bone(bone(0));
        let mut mesh = AnimatedMesh::new("m", "mat");
        mesh.add_vertex(Vec2::ZERO, vec![skinned(1, 1.0)]);
        mesh.add_vertex(Vec2::ONE, Vec::new());
        mesh.indices = vec![0, 1];
        model.add_mesh(mesh);

        let result = model.validate();
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_cycle_and_range() {
        let mut model = Model::new();
        model.add_bone(bone(1)); // forward reference
        model.add_bone(bone(0));
        model.add_bone(bone(2)); // self reference
        model.add_bone(bone(9)); // out of range

        let result = model.validate();
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                ValidationIssue::ParentNotBefore { bone: 0, parent: 1 },
                ValidationIssue::ParentNotBefore { bone: 2, parent: 2 },
                ValidationIssue::ParentOutOfRange { bone: 3, parent: 9 },
            ]
        );
    }

    #[test]
    fn test_dangling_references() {
        let mut model = Model::new();
        model.add_bone(bone(-1));
        let mut mesh = AnimatedMesh::new("m", "mat");
        mesh.add_vertex(Vec2::ZERO, vec![skinned(4, 1.0)]);
        mesh.indices = vec![0, 3, -2];
        model.add_mesh(mesh);

        let result = model.validate();
        assert_eq!(result.errors.len(), 3);
        assert!(result.errors.contains(&ValidationIssue::BoneIdOutOfRange {
            mesh: 0,
            vertex: 0,
            bone_id: 4
        }));
        assert!(result.error_messages()[0].contains("index 3"));
    }

    #[test]
    fn test_influence_sum_is_warning() {
        let mut model = Model::new();
        model.add_bone(bone(-1));
        let mut mesh = AnimatedMesh::new("m", "mat");
        mesh.add_vertex(Vec2::ZERO, vec![skinned(0, 0.6), skinned(0, 0.6)]);
        model.add_mesh(mesh);

        let result = model.validate();
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_static_mesh_indices() {
        let mut model = Model::new();
        model.add_mesh(StaticMesh {
            name: "s".to_string(),
            indices: vec![0, 1],
            positions: vec![Vec3::ZERO],
            tex_coords: vec![Vec2::ZERO],
            ..StaticMesh::default()
        });

        let result = model.validate();
        assert_eq!(result.errors.len(), 1);
    }
}
