//! Turtle pose and the operations the interpreter dispatches on.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of the drawing cursor.
///
/// The canonical frame is forward = +Z, up = +Y, left = +X, which is also the
/// local frame the branch base mesh is authored in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtlePose {
    /// Current world-space position of the cursor.
    pub position: Vec3,

    /// Current world-space orientation. Kept unit length after every rotation.
    pub rotation: Quat,
}

impl Default for TurtlePose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl TurtlePose {
    /// Returns the turtle's local forward direction (Z-axis) in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Returns the turtle's local up direction (Y-axis) in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Returns the turtle's local left direction (X-axis) in world space.
    pub fn left(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Turns around the local up axis by `angle` radians.
    pub fn yaw(&mut self, angle: f32) {
        self.rotate_local(Vec3::Y, angle);
    }

    /// Pitches around the local left axis by `angle` radians.
    pub fn pitch(&mut self, angle: f32) {
        self.rotate_local(Vec3::X, angle);
    }

    /// Rolls around the local forward axis by `angle` radians.
    pub fn roll(&mut self, angle: f32) {
        self.rotate_local(Vec3::Z, angle);
    }

    /// Moves the cursor `distance` along its forward direction.
    pub fn advance(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }

    fn rotate_local(&mut self, axis: Vec3, angle: f32) {
        // Post-multiplying applies the turn in the turtle's own frame. Renormalizing
        // stops drift from skewing the frame over long strings.
        self.rotation = (self.rotation * Quat::from_axis_angle(axis, angle)).normalize();
    }
}

/// Operations that can be performed by the plant turtle.
///
/// Rotation variants carry a sign multiplier applied to the interpreter's
/// angle; `Marker` carries the tag written into the emitted marker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurtleOp {
    /// Move forward and emit a branch (`F`).
    Draw,
    /// Move forward without emitting a branch (`f`).
    Move,
    /// Rotate around up (`+`/`-`).
    Yaw(f32),
    /// Rotate around left (`&`/`^`).
    Pitch(f32),
    /// Rotate around forward (`\` / `/`).
    Roll(f32),
    /// Turn 180 degrees around up (`|`).
    TurnAround,
    /// Save the pose onto the stack (`[`).
    Push,
    /// Restore the most recently pushed pose (`]`).
    Pop,
    /// Drop a geometry marker at the current position.
    Marker(char),
    /// No-op: symbol only matters to the grammar.
    Ignore,
}
