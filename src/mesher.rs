//! Instancing of base meshes along a [`Skeleton`](crate::skeleton::Skeleton).
//!
//! [`BranchMeshBuilder`] stretches a cylinder along every branch and tapers it
//! with height. [`MarkerMeshBuilder`] scatters a flower model over a random subset
//! of the markers. Both append into one [`MeshBuffers`] per call.

use crate::interpreter::FLOWER_TAG;
use crate::mesh::{BaseMesh, MeshBuffers};
use crate::skeleton::{Branch, GeometryMarker};
use glam::{Mat3, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use tracing::{debug, trace};

/// Below this, `cross(world_up, forward)` is treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-4;

/// Upper bound on the taper. Branches never get thinner than 4% of the base mesh.
pub const MAX_SHRINK: f32 = 0.96;

/// Height-based taper of branch cross-sections.
///
/// `factor = 1 - clamp(rate * (height - base_height) / step, 0, 0.96)`, where
/// `height` is the branch start projected on `height_axis`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShrinkPolicy {
    /// How much thinner per `step` of height.
    pub rate: f32,
    /// Height interval over which `rate` applies.
    pub step: f32,
    /// Height at which tapering starts.
    pub base_height: f32,
    /// Direction height is measured along; the turtle grows along +Z.
    pub height_axis: Vec3,
}

impl Default for ShrinkPolicy {
    fn default() -> Self {
        Self {
            rate: 0.08,
            step: 4.5,
            base_height: 0.0,
            height_axis: Vec3::Z,
        }
    }
}

impl ShrinkPolicy {
    /// Lateral scale for a branch starting at `height`, always in `[0.04, 1]`.
    pub fn factor(&self, height: f32) -> f32 {
        let taper = self.rate * (height - self.base_height) / self.step;
        if taper.is_nan() {
            return 1.0;
        }
        1.0 - taper.clamp(0.0, MAX_SHRINK)
    }

    /// Factor for `branch`, measured at its start.
    pub fn factor_for(&self, branch: &Branch) -> f32 {
        self.factor(branch.start.dot(self.height_axis))
    }
}

/// Rotation taking the base mesh's local frame (left = X, up = Y, forward = Z)
/// onto `forward`.
///
/// Falls back to a Z-based construction when `forward` is (anti)parallel to
/// world up.
pub fn branch_basis(forward: Vec3) -> Mat3 {
    let left = Vec3::Y.cross(forward);
    let (left, up) = if left.length() < PARALLEL_EPSILON {
        let up = forward.cross(Vec3::Z).normalize();
        (up.cross(forward), up)
    } else {
        (left, forward.cross(left))
    };
    Mat3::from_cols(left.normalize(), up.normalize(), forward)
}

/// Bakes a cylinder-like base mesh along every branch.
#[derive(Clone, Debug, Default)]
pub struct BranchMeshBuilder {
    shrink: ShrinkPolicy,
}

impl BranchMeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shrink(mut self, shrink: ShrinkPolicy) -> Self {
        self.shrink = shrink;
        self
    }

    pub fn shrink(&self) -> &ShrinkPolicy {
        &self.shrink
    }

    /// Returns the merged buffers for all non-degenerate branches.
    ///
    /// The base mesh's local Z is stretched to the branch length, X and Y are
    /// scaled by the shrink factor. Zero-length branches are skipped.
    pub fn build(&self, branches: &[Branch], base: &BaseMesh) -> MeshBuffers {
        let mut buffers = MeshBuffers::new();
        let mut skipped = 0usize;

        for branch in branches {
            let Some(forward) = branch.direction() else {
                trace!(start = ?branch.start, "skipping zero-length branch");
                skipped += 1;
                continue;
            };
            let shrink = self.shrink.factor_for(branch);
            let scale = Vec3::new(shrink, shrink, branch.length());
            buffers.append_transformed(base, scale, branch_basis(forward), branch.start);
        }

        debug!(
            branches = branches.len(),
            skipped,
            vertices = buffers.vertex_count(),
            "branch mesh baked"
        );
        buffers
    }
}

/// Bakes a flower/leaf base mesh at a random subset of the markers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerMeshBuilder {
    /// Only markers with this tag are instanced.
    pub instance_tag: char,
    /// Chance, in percent, that an eligible marker produces geometry.
    pub keep_percent: u8,
}

impl Default for MarkerMeshBuilder {
    fn default() -> Self {
        Self {
            instance_tag: FLOWER_TAG,
            keep_percent: 8,
        }
    }
}

impl MarkerMeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: char) -> Self {
        self.instance_tag = tag;
        self
    }

    /// Values above 100 behave like 100.
    pub fn with_keep_percent(mut self, percent: u8) -> Self {
        self.keep_percent = percent.min(100);
        self
    }

    /// Returns the merged buffers for the kept markers.
    ///
    /// Each kept instance is rotated by `Rx(a) * Ry(b)` with `a, b` drawn from
    /// `[0, π)` and then moved to the marker. All randomness comes from `rng`.
    pub fn build<R: Rng>(
        &self,
        markers: &[GeometryMarker],
        base: &BaseMesh,
        rng: &mut R,
    ) -> MeshBuffers {
        let mut buffers = MeshBuffers::new();
        let mut eligible = 0usize;
        let mut kept = 0usize;

        for marker in markers.iter().filter(|m| m.tag == self.instance_tag) {
            eligible += 1;
            if rng.random_range(0..100u8) >= self.keep_percent {
                continue;
            }
            kept += 1;

            let rotation = Mat3::from_rotation_x(rng.random::<f32>() * PI)
                * Mat3::from_rotation_y(rng.random::<f32>() * PI);
            buffers.append_transformed(base, Vec3::ONE, rotation, marker.position);
        }

        debug!(
            tag = %self.instance_tag,
            eligible,
            kept,
            vertices = buffers.vertex_count(),
            "marker mesh baked"
        );
        buffers
    }
}
