use rigid_link::*;

fn main() {
    let mut model = Model::new(EntityId::from_index(0), "pendulum", 1.0 / 60.0);
    model.set_parallel_enabled(true);

    let base = model
        .load_link(
            &LinkDescription::new("base").with_inertial(Inertial::ZERO),
            ReferenceBackend::new(),
        )
        .expect("base loads");

    let bob_desc = LinkDescription::new("bob")
        .with_pose(Pose::from_position(Vec3::new(1.0, 0.0, 0.0)))
        .with_collision(
            CollisionDescription::new("ball", CollisionShape::Sphere { radius: 0.1 })
                .with_mass(1.0),
        );
    let bob = model
        .load_link(&bob_desc, ReferenceBackend::new())
        .expect("bob loads");
    model
        .connect("hinge", Some(base), Some(bob))
        .expect("hinge connects");

    let lamp = StaticModelHandle::new("lamp");
    if let Some(link) = model.link(bob) {
        link.attach_static_model(lamp.clone(), Pose::from_position(Vec3::Y * 0.2));
        link.connect_enabled(|enabled| println!("bob enabled: {enabled}"));
        link.set_enabled(true);
    }

    model.init();
    for step in 0..60 {
        if let Some(link) = model.link(bob) {
            // Crude spring pulling the bob toward the hinge.
            let offset = link.world_pose().position;
            link.add_force(-offset * 20.0);
        }
        model.update();
        if step % 15 == 0 {
            if let Some(link) = model.link(bob) {
                println!(
                    "step {step:>2}: bob at {:?}, lamp at {:?}",
                    link.world_pose().position,
                    lamp.world_pose().position
                );
            }
        }
    }

    if let Some(link) = model.link(bob) {
        let mut msg = LinkMsg::new();
        link.fill_msg(&mut msg);
        match msg.encode() {
            Ok(bytes) => println!("{}", String::from_utf8_lossy(&bytes)),
            Err(err) => eprintln!("encode failed: {err}"),
        }
    }
    model.fini();
}
