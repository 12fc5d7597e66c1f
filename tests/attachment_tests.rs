mod common;

use common::{assert_vec3_near, initialized_link, loaded_link};
use rigid_link::{LinkDescription, Pose, Quat, StaticModelHandle, Vec3};

#[test]
fn attach_then_detach_leaves_table_empty() {
    let link = loaded_link(&LinkDescription::new("base"));
    link.attach_static_model(StaticModelHandle::new("m1"), Pose::from_position(Vec3::X));
    assert_eq!(link.attached_model_names(), vec!["m1".to_string()]);

    assert!(link.detach_static_model("m1"));
    assert_eq!(link.attached_model_count(), 0);
}

#[test]
fn detaching_a_missing_model_changes_nothing() {
    let link = loaded_link(&LinkDescription::new("base"));
    link.attach_static_model(StaticModelHandle::new("m1"), Pose::IDENTITY);

    assert!(!link.detach_static_model("missing"));
    assert_eq!(link.attached_model_names(), vec!["m1".to_string()]);
}

#[test]
fn duplicate_names_detach_one_at_a_time() {
    let link = loaded_link(&LinkDescription::new("base"));
    link.attach_static_model(StaticModelHandle::new("crate"), Pose::IDENTITY);
    link.attach_static_model(StaticModelHandle::new("crate"), Pose::from_position(Vec3::Y));

    assert!(link.detach_static_model("crate"));
    assert_eq!(link.attached_model_count(), 1);
    assert!(link.detach_static_model("crate"));
    assert!(!link.detach_static_model("crate"));
}

#[test]
fn attached_model_is_placed_at_link_pose_times_offset() {
    let link = loaded_link(
        &LinkDescription::new("turret")
            .with_pose(Pose::new(Vec3::new(0.0, 0.0, 1.0), Quat::from_rotation_z(std::f32::consts::FRAC_PI_2))),
    );
    let barrel = StaticModelHandle::new("barrel");
    link.attach_static_model(barrel.clone(), Pose::from_position(Vec3::X));

    assert_vec3_near(barrel.world_pose().position, Vec3::new(0.0, 1.0, 1.0));
}

#[test]
fn attached_model_rides_along_with_the_step() {
    let link = initialized_link(&LinkDescription::new("cart"));
    let payload = StaticModelHandle::new("payload");
    link.attach_static_model(payload.clone(), Pose::from_position(Vec3::Y));

    link.set_world_pose(Pose::from_position(Vec3::new(3.0, 0.0, 0.0)));
    link.update(0.01);
    assert_vec3_near(payload.world_pose().position, Vec3::new(3.0, 1.0, 0.0));
}

#[test]
fn fini_detaches_every_model() {
    let link = initialized_link(&LinkDescription::new("base"));
    link.attach_static_model(StaticModelHandle::new("a"), Pose::IDENTITY);
    link.attach_static_model(StaticModelHandle::new("b"), Pose::IDENTITY);

    link.fini();
    assert_eq!(link.attached_model_count(), 0);
}
