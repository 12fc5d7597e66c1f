use glam::Vec3;

use crate::core::types::{Acceleration, Pose, Wrench};

/// Force, torque, and acceleration applied to a link during one step.
///
/// Everything is stored in the link frame; world-frame values are derived
/// from the pose passed to each accessor. Additive operations accumulate
/// until [`flush`](Self::flush) is called by whoever consumes the values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForceAccumulator {
    force: Vec3,
    torque: Vec3,
    linear_accel: Vec3,
    angular_accel: Vec3,
}

impl ForceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relative_force(&self) -> Vec3 {
        self.force
    }

    pub fn relative_torque(&self) -> Vec3 {
        self.torque
    }

    pub fn relative_linear_accel(&self) -> Vec3 {
        self.linear_accel
    }

    pub fn relative_angular_accel(&self) -> Vec3 {
        self.angular_accel
    }

    pub fn world_force(&self, pose: &Pose) -> Vec3 {
        pose.transform_vector(self.force)
    }

    pub fn world_torque(&self, pose: &Pose) -> Vec3 {
        pose.transform_vector(self.torque)
    }

    pub fn world_linear_accel(&self, pose: &Pose) -> Vec3 {
        pose.transform_vector(self.linear_accel)
    }

    pub fn world_angular_accel(&self, pose: &Pose) -> Vec3 {
        pose.transform_vector(self.angular_accel)
    }

    pub fn world_wrench(&self, pose: &Pose) -> Wrench {
        Wrench {
            force: self.world_force(pose),
            torque: self.world_torque(pose),
        }
    }

    pub fn world_acceleration(&self, pose: &Pose) -> Acceleration {
        Acceleration {
            linear: self.world_linear_accel(pose),
            angular: self.world_angular_accel(pose),
        }
    }

    pub fn set_force(&mut self, world_force: Vec3, pose: &Pose) {
        self.force = pose.inverse_transform_vector(world_force);
    }

    pub fn set_torque(&mut self, world_torque: Vec3, pose: &Pose) {
        self.torque = pose.inverse_transform_vector(world_torque);
    }

    pub fn set_relative_force(&mut self, force: Vec3) {
        self.force = force;
    }

    pub fn set_relative_torque(&mut self, torque: Vec3) {
        self.torque = torque;
    }

    pub fn set_linear_accel(&mut self, accel: Vec3) {
        self.linear_accel = accel;
    }

    pub fn set_angular_accel(&mut self, accel: Vec3) {
        self.angular_accel = accel;
    }

    /// Adds a world-frame force through the center of mass.
    pub fn add_force(&mut self, world_force: Vec3, pose: &Pose) {
        self.force += pose.inverse_transform_vector(world_force);
    }

    /// Adds a link-frame force through the center of mass.
    pub fn add_relative_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Adds a world-frame force applied at a world-frame point.
    pub fn add_force_at_world_position(
        &mut self,
        world_force: Vec3,
        world_point: Vec3,
        pose: &Pose,
        center_of_mass: Vec3,
    ) {
        let force = pose.inverse_transform_vector(world_force);
        let point = pose.inverse_transform_point(world_point);
        self.add_force_at_relative_position(force, point, center_of_mass);
    }

    /// Adds a link-frame force applied at a link-frame point.
    ///
    /// Splits into the same force through the center of mass plus the
    /// lever-arm torque `(point - com) × force`.
    pub fn add_force_at_relative_position(&mut self, force: Vec3, point: Vec3, center_of_mass: Vec3) {
        self.force += force;
        self.torque += (point - center_of_mass).cross(force);
    }

    pub fn add_torque(&mut self, world_torque: Vec3, pose: &Pose) {
        self.torque += pose.inverse_transform_vector(world_torque);
    }

    pub fn add_relative_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    /// Zeroes force, torque, and both accelerations.
    pub fn flush(&mut self) {
        *self = Self::default();
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}
