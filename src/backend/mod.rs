//! Capability contract between a [`Link`](crate::link::Link) and the physics
//! engine that integrates it.

pub mod reference;
pub use reference::ReferenceBackend;

use glam::Vec3;

use crate::{
    core::{
        inertial::Inertial,
        registry::CollisionRegistry,
        types::{Pose, Velocity},
    },
    dynamics::ForceAccumulator,
    error::{LinkError, Result},
};

/// Mutable view over one link handed to [`LinkBackend::update`].
///
/// The backend consumes the accumulated wrench, writes back the integrated
/// pose and velocity, and decides when to flush the accumulator.
pub struct BodyFrame<'a> {
    pub dt: f32,
    pub pose: &'a mut Pose,
    pub velocity: &'a mut Velocity,
    pub accumulator: &'a mut ForceAccumulator,
    pub inertial: &'a Inertial,
}

/// Trait implemented by physics engines that drive a link.
///
/// Methods without a default body form the capability set every engine
/// must provide: enable, gravity, self-collision, auto-disable, velocity,
/// force, and damping control. Velocities, forces, and torques are passed in
/// the world frame.
pub trait LinkBackend: Send {
    fn name(&self) -> &str;

    /// Called once from [`Link::init`](crate::link::Link::init).
    fn init(&mut self, _pose: &Pose, _inertial: &Inertial) {}

    /// Advances the body by `frame.dt`.
    fn update(&mut self, frame: BodyFrame<'_>);

    /// Releases native resources.
    fn fini(&mut self) {}

    fn set_enabled(&mut self, enabled: bool);
    fn enabled(&self) -> bool;

    fn set_gravity_mode(&mut self, mode: bool);
    fn gravity_mode(&self) -> bool;

    fn set_self_collide(&mut self, collide: bool);

    fn set_auto_disable(&mut self, auto_disable: bool);

    fn set_linear_vel(&mut self, velocity: Vec3);
    fn set_angular_vel(&mut self, velocity: Vec3);

    /// Receives the accumulated world force after every change.
    fn set_force(&mut self, force: Vec3);
    /// Receives the accumulated world torque after every change.
    fn set_torque(&mut self, torque: Vec3);

    fn set_linear_damping(&mut self, damping: f32);
    fn set_angular_damping(&mut self, damping: f32);

    /// Kinematic bodies follow their velocity and ignore forces.
    fn set_kinematic(&mut self, _kinematic: bool) -> Result<()> {
        Err(LinkError::Unsupported("kinematic"))
    }

    fn kinematic(&self) -> bool {
        false
    }

    /// The link pose was changed from outside the step (teleport, state restore).
    fn on_pose_change(&mut self, _pose: &Pose) {}

    /// The link's inertial descriptor was replaced.
    fn update_mass(&mut self, _inertial: &Inertial) {}

    /// Collide mode or laser retro changed on the link's collisions.
    fn update_surface(&mut self, _collisions: &CollisionRegistry) {}
}
