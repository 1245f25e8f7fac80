//! Base mesh assets and the merged output buffers they are baked into.

use crate::error::{AssetError, MeshAttribute};
use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// One triangle of a base mesh, as written by the asset loader.
///
/// Both triples are 1-based, matching the wavefront convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub positions: [u32; 3],
    pub normals: [u32; 3],
}

impl Face {
    pub fn new(positions: [u32; 3], normals: [u32; 3]) -> Self {
        Self { positions, normals }
    }
}

/// A pre-parsed, validated mesh that gets instanced many times.
///
/// Read-only once built; every face index is known to resolve.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BaseMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    faces: Vec<Face>,
}

impl BaseMesh {
    /// Validates the loader output and wraps it.
    ///
    /// An index of 0 or one past its array is an [`AssetError::IndexOutOfRange`].
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        faces: Vec<Face>,
    ) -> Result<Self, AssetError> {
        for (face_idx, face) in faces.iter().enumerate() {
            check_indices(face_idx, MeshAttribute::Position, &face.positions, positions.len())?;
            check_indices(face_idx, MeshAttribute::Normal, &face.normals, normals.len())?;
        }
        Ok(Self {
            positions,
            normals,
            faces,
        })
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Iterates `(position, normal)` for every face corner, three per face.
    pub fn corners(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.faces.iter().flat_map(move |face| {
            (0..3).map(move |j| {
                (
                    self.positions[face.positions[j] as usize - 1],
                    self.normals[face.normals[j] as usize - 1],
                )
            })
        })
    }
}

fn check_indices(
    face: usize,
    attribute: MeshAttribute,
    indices: &[u32; 3],
    len: usize,
) -> Result<(), AssetError> {
    match indices.iter().find(|&&i| i == 0 || i as usize > len) {
        Some(&index) => Err(AssetError::IndexOutOfRange {
            face,
            attribute,
            index,
            len,
        }),
        None => Ok(()),
    }
}

/// Merged, GPU-ready geometry.
///
/// Positions are `x, y, z, 1` and normals `x, y, z, 0` per vertex. Every index is
/// below [`vertex_count`](Self::vertex_count).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffers {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bakes `base` once with no transform.
    pub fn from_base(base: &BaseMesh) -> Self {
        let mut buffers = Self::default();
        buffers.append_instance(base, |p| p, |n| n);
        buffers
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 4
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.indices.clear();
    }

    /// Appends one copy of `base`, mapping each corner through the given
    /// position and normal transforms.
    ///
    /// Faces are expanded to three fresh vertices each, and the new indices are
    /// offset by the vertex count already stored so instances never alias.
    pub fn append_instance(
        &mut self,
        base: &BaseMesh,
        position: impl Fn(Vec3) -> Vec3,
        normal: impl Fn(Vec3) -> Vec3,
    ) {
        let offset = self.vertex_count() as u32;
        let corners = base.face_count() * 3;
        self.positions.reserve(corners * 4);
        self.normals.reserve(corners * 4);
        self.indices.reserve(corners);

        for (i, (p, n)) in base.corners().enumerate() {
            self.positions.extend_from_slice(&position(p).extend(1.0).to_array());
            self.normals.extend_from_slice(&normal(n).extend(0.0).to_array());
            self.indices.push(offset + i as u32);
        }
    }

    /// Appends `base` rotated by `rotation`, with positions scaled per axis by
    /// `scale` beforehand and translated by `translation` afterwards.
    pub(crate) fn append_transformed(
        &mut self,
        base: &BaseMesh,
        scale: Vec3,
        rotation: Mat3,
        translation: Vec3,
    ) {
        self.append_instance(
            base,
            |p| rotation * (p * scale) + translation,
            |n| rotation * n,
        );
    }
}
