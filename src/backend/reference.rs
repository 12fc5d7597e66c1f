use glam::{Mat3, Vec3};

use super::{BodyFrame, LinkBackend};
use crate::{
    config::{DEFAULT_ANGULAR_DAMPING, DEFAULT_GRAVITY, DEFAULT_LINEAR_DAMPING},
    core::{inertial::Inertial, types::{InertiaTensorExt, Pose, Wrench}},
    error::Result,
    utils::math::angular_velocity_to_quat,
};

/// Semi-implicit Euler backend with no contact handling.
///
/// Useful for demos and for exercising the link contract without a real
/// engine. Bodies with zero mass do not move.
#[derive(Debug, Clone)]
pub struct ReferenceBackend {
    pub gravity: Vec3,
    enabled: bool,
    gravity_mode: bool,
    self_collide: bool,
    auto_disable: bool,
    kinematic: bool,
    linear_damping: f32,
    angular_damping: f32,
    native_wrench: Wrench,
    initialized: bool,
}

impl Default for ReferenceBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceBackend {
    pub fn new() -> Self {
        Self {
            gravity: Vec3::from_slice(&DEFAULT_GRAVITY),
            enabled: true,
            gravity_mode: true,
            self_collide: false,
            auto_disable: true,
            kinematic: false,
            linear_damping: DEFAULT_LINEAR_DAMPING,
            angular_damping: DEFAULT_ANGULAR_DAMPING,
            native_wrench: Wrench::default(),
            initialized: false,
        }
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Wrench most recently pushed by the link.
    pub fn native_wrench(&self) -> Wrench {
        self.native_wrench
    }

    pub fn self_collide(&self) -> bool {
        self.self_collide
    }

    pub fn auto_disable(&self) -> bool {
        self.auto_disable
    }

    pub fn damping(&self) -> (f32, f32) {
        (self.linear_damping, self.angular_damping)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn integrate_velocity(&self, frame: &mut BodyFrame<'_>) {
        let inverse_mass = frame.inertial.inverse_mass();
        if inverse_mass == 0.0 && !self.kinematic {
            return;
        }

        if !self.kinematic {
            let wrench = frame.accumulator.world_wrench(frame.pose);
            let mut linear = wrench.force * inverse_mass + frame.accumulator.world_linear_accel(frame.pose);
            if self.gravity_mode {
                linear += self.gravity;
            }

            let world_inertia = frame.inertial.inertia.rotated(frame.pose.rotation);
            let inverse_inertia = if world_inertia.determinant().abs() < f32::EPSILON {
                Mat3::ZERO
            } else {
                world_inertia.inverse()
            };
            let angular = inverse_inertia * wrench.torque + frame.accumulator.world_angular_accel(frame.pose);

            frame.velocity.linear += linear * frame.dt;
            frame.velocity.angular += angular * frame.dt;
        }

        frame.velocity.linear *= (1.0 - self.linear_damping * frame.dt).max(0.0);
        frame.velocity.angular *= (1.0 - self.angular_damping * frame.dt).max(0.0);
    }

    fn integrate_position(&self, frame: &mut BodyFrame<'_>) {
        frame.pose.position += frame.velocity.linear * frame.dt;
        let delta = angular_velocity_to_quat(frame.velocity.angular, frame.dt);
        frame.pose.rotation = (delta * frame.pose.rotation).normalize();
    }
}

impl LinkBackend for ReferenceBackend {
    fn name(&self) -> &str {
        "reference-euler"
    }

    fn init(&mut self, _pose: &Pose, _inertial: &Inertial) {
        self.initialized = true;
    }

    fn update(&mut self, mut frame: BodyFrame<'_>) {
        if self.enabled {
            self.integrate_velocity(&mut frame);
            self.integrate_position(&mut frame);
        }
        frame.accumulator.flush();
        self.native_wrench = Wrench::default();
    }

    fn fini(&mut self) {
        self.initialized = false;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_gravity_mode(&mut self, mode: bool) {
        self.gravity_mode = mode;
    }

    fn gravity_mode(&self) -> bool {
        self.gravity_mode
    }

    fn set_self_collide(&mut self, collide: bool) {
        self.self_collide = collide;
    }

    fn set_auto_disable(&mut self, auto_disable: bool) {
        self.auto_disable = auto_disable;
    }

    // Velocities live in the link state; nothing native to mirror.
    fn set_linear_vel(&mut self, _velocity: Vec3) {}

    fn set_angular_vel(&mut self, _velocity: Vec3) {}

    fn set_force(&mut self, force: Vec3) {
        self.native_wrench.force = force;
    }

    fn set_torque(&mut self, torque: Vec3) {
        self.native_wrench.torque = torque;
    }

    fn set_linear_damping(&mut self, damping: f32) {
        self.linear_damping = damping;
    }

    fn set_angular_damping(&mut self, damping: f32) {
        self.angular_damping = damping;
    }

    fn set_kinematic(&mut self, kinematic: bool) -> Result<()> {
        self.kinematic = kinematic;
        Ok(())
    }

    fn kinematic(&self) -> bool {
        self.kinematic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Velocity;
    use crate::dynamics::ForceAccumulator;

    #[test]
    fn free_fall_moves_down_and_flushes() {
        let mut backend = ReferenceBackend::new();
        let mut pose = Pose::default();
        let mut velocity = Velocity::default();
        let mut accumulator = ForceAccumulator::new();
        accumulator.add_relative_force(Vec3::X);
        let inertial = Inertial::default();

        backend.update(BodyFrame {
            dt: 0.1,
            pose: &mut pose,
            velocity: &mut velocity,
            accumulator: &mut accumulator,
            inertial: &inertial,
        });

        assert!(pose.position.y < 0.0);
        assert!(pose.position.x > 0.0);
        assert!(accumulator.is_zero());
    }

    #[test]
    fn disabled_body_does_not_move() {
        let mut backend = ReferenceBackend::new();
        backend.set_enabled(false);
        let mut pose = Pose::default();
        let mut velocity = Velocity::new(Vec3::X, Vec3::ZERO);
        let mut accumulator = ForceAccumulator::new();
        let inertial = Inertial::default();

        backend.update(BodyFrame {
            dt: 0.1,
            pose: &mut pose,
            velocity: &mut velocity,
            accumulator: &mut accumulator,
            inertial: &inertial,
        });

        assert_eq!(pose, Pose::default());
    }
}
