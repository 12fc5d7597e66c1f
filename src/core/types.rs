use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rigid transform: position and orientation of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Applies `other` (expressed in this frame) on top of this pose.
    pub fn compose(&self, other: &Pose) -> Pose {
        Pose {
            position: self.position + self.rotation * other.position,
            rotation: (self.rotation * other.rotation).normalize(),
        }
    }

    pub fn inverse(&self) -> Pose {
        let rotation = self.rotation.inverse();
        Pose {
            position: rotation * -self.position,
            rotation,
        }
    }

    /// Maps a point from this frame into the parent frame.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }

    /// Maps a point from the parent frame into this frame.
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.position)
    }

    /// Rotates a free vector from this frame into the parent frame.
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }

    /// Rotates a free vector from the parent frame into this frame.
    pub fn inverse_transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation.inverse() * vector
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}

/// Linear and angular velocity of a rigid body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

impl Velocity {
    pub fn new(linear: Vec3, angular: Vec3) -> Self {
        Self { linear, angular }
    }
}

/// Linear and angular acceleration of a rigid body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Acceleration {
    pub linear: Vec3,
    pub angular: Vec3,
}

/// Force and torque pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Wrench {
    pub force: Vec3,
    pub torque: Vec3,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        Self::new(center - Vec3::splat(radius), center + Vec3::splat(radius))
    }

    pub fn merge(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Helper methods for inertia calculations.
pub trait InertiaTensorExt {
    fn for_solid_box(half_extents: Vec3, mass: f32) -> Mat3;
    fn for_solid_sphere(radius: f32, mass: f32) -> Mat3;
    /// Re-expresses a tensor given in a rotated frame in the parent axes.
    fn rotated(&self, rotation: Quat) -> Mat3;
}

impl InertiaTensorExt for Mat3 {
    fn for_solid_box(half_extents: Vec3, mass: f32) -> Mat3 {
        let lx = half_extents.x * 2.0;
        let ly = half_extents.y * 2.0;
        let lz = half_extents.z * 2.0;
        let factor = mass / 12.0;
        Mat3::from_diagonal(Vec3::new(
            factor * (ly * ly + lz * lz),
            factor * (lx * lx + lz * lz),
            factor * (lx * lx + ly * ly),
        ))
    }

    fn for_solid_sphere(radius: f32, mass: f32) -> Mat3 {
        let value = 0.4 * mass * radius * radius;
        Mat3::from_diagonal(Vec3::splat(value))
    }

    fn rotated(&self, rotation: Quat) -> Mat3 {
        let r = Mat3::from_quat(rotation);
        r * *self * r.transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_inverse_round_trips_points() {
        let pose = Pose::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        );
        let point = Vec3::new(0.5, -1.0, 2.0);
        let world = pose.transform_point(point);
        let back = pose.inverse_transform_point(world);
        assert!((back - point).length() < 1e-5);

        let via_inverse = pose.inverse().transform_point(world);
        assert!((via_inverse - point).length() < 1e-5);
    }

    #[test]
    fn compose_applies_child_in_parent_frame() {
        let parent = Pose::new(Vec3::X, Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let child = Pose::from_position(Vec3::X);
        let composed = parent.compose(&child);
        assert!((composed.position - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn rotated_tensor_swaps_principal_axes() {
        let tensor = Mat3::from_diagonal(Vec3::new(1.0, 2.0, 3.0));
        let rotated = tensor.rotated(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        assert!((rotated.x_axis.x - 2.0).abs() < 1e-5);
        assert!((rotated.y_axis.y - 1.0).abs() < 1e-5);
        assert!((rotated.z_axis.z - 3.0).abs() < 1e-5);
    }
}
