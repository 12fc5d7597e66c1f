mod common;

use common::{initialized_link, sphere};
use rigid_link::{
    CollideMode, CollisionMsg, EntityId, Inertial, LinkDescription, LinkError, LinkMsg, Pose,
    Vec3,
};

fn described() -> LinkDescription {
    LinkDescription::new("gripper")
        .with_pose(Pose::from_position(Vec3::new(0.0, 0.5, 0.0)))
        .with_collision(sphere("palm", 0.1))
        .with_collision(sphere("finger", 0.02))
        .with_sensor("touch", "contact")
}

#[test]
fn fill_msg_captures_visible_configuration() {
    let link = initialized_link(&described());
    link.set_enabled(true);

    let mut msg = LinkMsg::new();
    link.fill_msg(&mut msg);

    assert_eq!(msg.name.as_deref(), Some("gripper"));
    assert_eq!(msg.id, Some(link.id()));
    assert_eq!(msg.pose, Some(link.world_pose()));
    assert_eq!(msg.inertial, Some(link.inertial()));
    assert_eq!(msg.enabled, Some(true));
    assert_eq!(msg.collisions.len(), 2);
    assert_eq!(msg.collisions[1].name.as_deref(), Some("finger"));
    assert_eq!(msg.sensors, vec!["touch".to_string()]);
}

#[test]
#[allow(deprecated)]
fn deprecated_alias_matches_fill_msg() {
    let link = initialized_link(&described());
    let mut current = LinkMsg::new();
    let mut legacy = LinkMsg::new();
    link.fill_msg(&mut current);
    link.fill_link_msg(&mut legacy);
    assert_eq!(current, legacy);
}

#[test]
fn process_msg_leaves_absent_fields_untouched() {
    let link = initialized_link(&described());
    let pose_before = link.world_pose();
    let inertial_before = link.inertial();

    let msg = LinkMsg {
        name: Some("claw".into()),
        gravity: Some(false),
        ..LinkMsg::default()
    };
    link.process_msg(&msg).expect("partial update applies");

    assert_eq!(link.name(), "claw");
    assert!(!link.gravity_mode());
    assert_eq!(link.world_pose(), pose_before);
    assert_eq!(link.inertial(), inertial_before);
    assert_eq!(link.collision_count(), 2);
}

#[test]
fn process_msg_updates_collisions_by_id() {
    let link = initialized_link(&described());
    let finger = link.collision_by_name("finger").expect("finger");

    let msg = LinkMsg {
        collisions: vec![CollisionMsg {
            id: finger.id(),
            laser_retro: Some(0.5),
            collide_mode: Some(CollideMode::Sensors),
            ..CollisionMsg::default()
        }],
        ..LinkMsg::default()
    };
    link.process_msg(&msg).expect("collision update applies");

    let finger = link.collision_by_name("finger").expect("finger");
    assert_eq!(finger.laser_retro(), 0.5);
    assert_eq!(finger.collide_mode(), CollideMode::Sensors);
    let palm = link.collision_by_name("palm").expect("palm");
    assert_eq!(palm.collide_mode(), CollideMode::All);
}

#[test]
fn process_msg_applies_inertial_and_pose() {
    let link = initialized_link(&described());
    let inertial = Inertial::point_mass(4.0, Vec3::Z);
    let pose = Pose::from_position(Vec3::splat(2.0));

    link.process_msg(&LinkMsg {
        inertial: Some(inertial),
        pose: Some(pose),
        enabled: Some(true),
        ..LinkMsg::default()
    })
    .expect("update applies");

    assert_eq!(link.inertial(), inertial);
    assert_eq!(link.world_pose(), pose);
    assert!(link.enabled());
}

#[test]
fn message_for_another_link_is_rejected() {
    let link = initialized_link(&described());
    let msg = LinkMsg {
        id: Some(EntityId::from_index(99)),
        name: Some("intruder".into()),
        ..LinkMsg::default()
    };

    assert!(matches!(link.process_msg(&msg), Err(LinkError::IdMismatch { .. })));
    assert_eq!(link.name(), "gripper");
}

#[test]
fn encoded_snapshot_round_trips_through_json() {
    let link = initialized_link(&described());
    let mut msg = LinkMsg::new();
    link.fill_msg(&mut msg);

    let bytes = msg.encode().expect("encode");
    let decoded = LinkMsg::decode(&bytes).expect("decode");
    assert_eq!(decoded, msg);

    let other = initialized_link(&LinkDescription::new("blank"));
    let mut applied = decoded.clone();
    applied.id = None;
    other.process_msg(&applied).expect("apply");
    assert_eq!(other.name(), "gripper");
    assert_eq!(other.world_pose(), link.world_pose());
}
