mod common;

use std::f32::consts::FRAC_PI_2;

use common::{assert_vec3_near, initialized_link, loaded_link, FakeBackend};
use rigid_link::{Inertial, Link, LinkDescription, Mat3, Pose, Quat, Vec3};

fn rotated_link() -> Link<FakeBackend> {
    let pose = Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_z(FRAC_PI_2));
    loaded_link(&LinkDescription::new("rotor").with_pose(pose))
}

#[test]
fn force_at_relative_position_produces_lever_arm_torque() {
    let link = loaded_link(&LinkDescription::new("lever"));
    let force = Vec3::new(0.0, 10.0, 0.0);
    let point = Vec3::new(2.0, 0.0, 0.0);

    link.add_force_at_relative_position(force, point);

    assert_vec3_near(link.relative_force(), force);
    assert_vec3_near(link.relative_torque(), point.cross(force));
    assert_vec3_near(link.relative_torque(), Vec3::new(0.0, 0.0, 20.0));
}

#[test]
fn lever_arm_is_measured_from_center_of_mass() {
    let link = loaded_link(
        &LinkDescription::new("offset")
            .with_inertial(Inertial::new(1.0, Vec3::new(1.0, 0.0, 0.0), Mat3::IDENTITY)),
    );

    link.add_force_at_relative_position(Vec3::Y, Vec3::new(1.0, 0.0, 0.0));
    assert_vec3_near(link.relative_torque(), Vec3::ZERO);
}

#[test]
fn world_and_relative_force_stay_consistent() {
    let link = rotated_link();
    let pose = link.world_pose();
    let relative = Vec3::new(1.0, 0.0, 0.0);

    link.add_relative_force(relative);

    assert_vec3_near(link.world_force(), pose.transform_vector(relative));
    assert_vec3_near(link.world_force(), Vec3::new(0.0, 1.0, 0.0));
    assert_vec3_near(link.relative_force(), relative);
}

#[test]
fn force_at_world_position_matches_relative_equivalent() {
    let world = rotated_link();
    let relative = rotated_link();
    let pose = world.world_pose();

    let world_force = Vec3::new(0.0, 0.0, 5.0);
    let world_point = pose.transform_point(Vec3::new(0.0, 1.0, 0.0));
    world.add_force_at_world_position(world_force, world_point);
    relative.add_force_at_relative_position(
        pose.inverse_transform_vector(world_force),
        Vec3::new(0.0, 1.0, 0.0),
    );

    assert_vec3_near(world.relative_force(), relative.relative_force());
    assert_vec3_near(world.relative_torque(), relative.relative_torque());
}

#[test]
fn additions_accumulate_and_setters_replace() {
    let link = rotated_link();
    link.add_force(Vec3::X);
    link.add_force(Vec3::X);
    assert_vec3_near(link.world_force(), Vec3::new(2.0, 0.0, 0.0));

    link.set_force(Vec3::Z);
    assert_vec3_near(link.world_force(), Vec3::Z);

    link.add_torque(Vec3::Y);
    link.add_relative_torque(Vec3::Z);
    assert_vec3_near(link.relative_torque(), link.world_pose().inverse_transform_vector(Vec3::Y) + Vec3::Z);

    link.set_torque(Vec3::ZERO);
    assert_vec3_near(link.world_torque(), Vec3::ZERO);
}

#[test]
fn backend_receives_accumulated_world_wrench() {
    let link = rotated_link();
    link.add_relative_force(Vec3::X);
    link.add_relative_torque(Vec3::X);

    let (force, torque) = link.with_backend(|b| (b.force, b.torque));
    assert_vec3_near(force, link.world_force());
    assert_vec3_near(torque, link.world_torque());
}

#[test]
fn accelerations_are_stored_relative_and_derived_in_world() {
    let link = rotated_link();
    link.set_linear_accel(Vec3::X);
    link.set_angular_accel(Vec3::Y);

    assert_vec3_near(link.relative_linear_accel(), Vec3::X);
    assert_vec3_near(link.world_linear_accel(), Vec3::Y);
    assert_vec3_near(link.relative_angular_accel(), Vec3::Y);
    assert_vec3_near(link.world_angular_accel(), Vec3::new(-1.0, 0.0, 0.0));
}

#[test]
fn backend_flushes_after_consuming_the_step() {
    let link = initialized_link(&LinkDescription::new("body"));
    link.add_force(Vec3::ONE);
    link.update(0.01);
    assert_vec3_near(link.relative_force(), Vec3::ZERO);

    link.with_backend(|b| b.flush_on_update = false);
    link.add_force(Vec3::ONE);
    link.update(0.01);
    assert_vec3_near(link.world_force(), Vec3::ONE);
}

#[test]
fn velocities_report_in_both_frames() {
    let link = rotated_link();
    link.set_linear_vel(Vec3::Y);
    link.set_angular_vel(Vec3::Z);

    assert_vec3_near(link.world_linear_vel(), Vec3::Y);
    assert_vec3_near(link.relative_linear_vel(), Vec3::X);
    assert_vec3_near(link.relative_angular_vel(), Vec3::Z);
    assert_vec3_near(link.with_backend(|b| b.linear_vel), Vec3::Y);
}
