#![allow(dead_code)]

use rigid_link::{
    backend::{BodyFrame, LinkBackend},
    core::registry::CollisionRegistry,
    CollisionDescription, CollisionShape, Inertial, Link, LinkDescription, Pose, Vec3,
};

/// Backend that records every capability call and never moves the body.
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub calls: Vec<&'static str>,
    pub enabled: bool,
    pub gravity: bool,
    pub self_collide: bool,
    pub auto_disable: bool,
    pub linear_vel: Vec3,
    pub angular_vel: Vec3,
    pub force: Vec3,
    pub torque: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub last_mass: Option<Inertial>,
    pub surface_updates: usize,
    pub pose_changes: usize,
    pub steps: usize,
    /// When false the next `update` leaves the accumulator untouched.
    pub flush_on_update: bool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            flush_on_update: true,
            ..Self::default()
        }
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl LinkBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn init(&mut self, _pose: &Pose, _inertial: &Inertial) {
        self.calls.push("init");
    }

    fn update(&mut self, frame: BodyFrame<'_>) {
        self.calls.push("update");
        self.steps += 1;
        if self.flush_on_update {
            frame.accumulator.flush();
        }
    }

    fn fini(&mut self) {
        self.calls.push("fini");
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.calls.push("set_enabled");
        self.enabled = enabled;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_gravity_mode(&mut self, mode: bool) {
        self.calls.push("set_gravity_mode");
        self.gravity = mode;
    }

    fn gravity_mode(&self) -> bool {
        self.gravity
    }

    fn set_self_collide(&mut self, collide: bool) {
        self.calls.push("set_self_collide");
        self.self_collide = collide;
    }

    fn set_auto_disable(&mut self, auto_disable: bool) {
        self.calls.push("set_auto_disable");
        self.auto_disable = auto_disable;
    }

    fn set_linear_vel(&mut self, velocity: Vec3) {
        self.linear_vel = velocity;
    }

    fn set_angular_vel(&mut self, velocity: Vec3) {
        self.angular_vel = velocity;
    }

    fn set_force(&mut self, force: Vec3) {
        self.force = force;
    }

    fn set_torque(&mut self, torque: Vec3) {
        self.torque = torque;
    }

    fn set_linear_damping(&mut self, damping: f32) {
        self.linear_damping = damping;
    }

    fn set_angular_damping(&mut self, damping: f32) {
        self.angular_damping = damping;
    }

    fn on_pose_change(&mut self, _pose: &Pose) {
        self.pose_changes += 1;
    }

    fn update_mass(&mut self, inertial: &Inertial) {
        self.last_mass = Some(*inertial);
    }

    fn update_surface(&mut self, _collisions: &CollisionRegistry) {
        self.surface_updates += 1;
    }
}

pub fn sphere(name: &str, radius: f32) -> CollisionDescription {
    CollisionDescription::new(name, CollisionShape::Sphere { radius })
}

pub fn unit_mass_sphere_at(name: &str, position: Vec3) -> CollisionDescription {
    sphere(name, 0.1)
        .with_mass(1.0)
        .with_pose(Pose::from_position(position))
}

pub fn loaded_link(desc: &LinkDescription) -> Link<FakeBackend> {
    let mut link = Link::new(Default::default(), FakeBackend::new());
    link.load(desc).expect("description should load");
    link
}

pub fn initialized_link(desc: &LinkDescription) -> Link<FakeBackend> {
    let link = loaded_link(desc);
    link.init();
    link
}

pub fn assert_vec3_near(actual: Vec3, expected: Vec3) {
    for axis in 0..3 {
        approx::assert_abs_diff_eq!(actual[axis], expected[axis], epsilon = 1e-4);
    }
}
