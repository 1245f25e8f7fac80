use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Below this length a branch has no usable direction.
pub const MIN_BRANCH_LENGTH: f32 = 1e-6;

/// A straight segment of the plant skeleton, later instanced with a cylinder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub start: Vec3,
    pub end: Vec3,
}

impl Branch {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Unit direction from start to end, or `None` for a degenerate branch.
    pub fn direction(&self) -> Option<Vec3> {
        let delta = self.end - self.start;
        if delta.length() < MIN_BRANCH_LENGTH {
            return None;
        }
        delta.try_normalize()
    }
}

/// A tagged point (leaf, flower, ...) dropped by the turtle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryMarker {
    pub tag: char,
    pub position: Vec3,
}

/// Everything one interpretation pass produces, in symbol order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub branches: Vec<Branch>,
    pub markers: Vec<GeometryMarker>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_branch(&mut self, branch: Branch) {
        self.branches.push(branch);
    }

    pub fn add_marker(&mut self, marker: GeometryMarker) {
        self.markers.push(marker);
    }

    /// Markers carrying `tag`, in emission order.
    pub fn markers_tagged(&self, tag: char) -> impl Iterator<Item = &GeometryMarker> {
        self.markers.iter().filter(move |m| m.tag == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty() && self.markers.is_empty()
    }
}
