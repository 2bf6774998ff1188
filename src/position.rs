//! World positions and distance math used by objective range checks.

use serde::{Deserialize, Serialize};

/// A point in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Straight-line distance to another point
    pub fn distance(&self, other: &Vec3) -> f32 {
        distance(*self, *other)
    }

    /// Move toward `target` by at most `step` units, snapping when close enough
    pub fn step_toward(&self, target: &Vec3, step: f32) -> Vec3 {
        let remaining = self.distance(target);
        if remaining <= step || remaining == 0.0 {
            return *target;
        }
        let t = step / remaining;
        Vec3 {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
            z: self.z + (target.z - self.z) * t,
        }
    }
}

/// Euclidean 3D distance between two points
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}
