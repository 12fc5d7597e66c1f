//! The engine-agnostic rigid-body link.
//!
//! A [`Link`] composes the inertial descriptor, collision registry, joint
//! membership, force accumulator, and attachment table of one rigid body,
//! and delegates engine-specific behavior to a [`LinkBackend`].
//!
//! Every method takes `&self` so a link can be shared between the stepping
//! thread and an interaction thread. Internally the structure sits behind a
//! reader-writer lock and the dynamic state and backend behind mutexes,
//! always acquired in that order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::Vec3;
use log::{debug, warn};
use parking_lot::{Mutex, RwLock};

use crate::{
    backend::{BodyFrame, LinkBackend},
    config::{DEFAULT_ANGULAR_DAMPING, DEFAULT_LINEAR_DAMPING, LINK_MSG_VERSION},
    core::{
        attachments::{AttachmentTable, StaticModel},
        collision::{CollideMode, Collision, CollisionId},
        description::{CollisionDescription, LinkDescription},
        event::{Signal, SubscriberId},
        inertial::Inertial,
        joints::{JointMembership, JointRef},
        registry::CollisionRegistry,
        state::LinkState,
        types::{Aabb, Pose, Velocity},
    },
    dynamics::ForceAccumulator,
    error::{LinkError, Result},
    msgs::{CollisionMsg, LinkMsg},
    utils::{allocator::EntityId, logging::ScopedTimer},
};

/// Where a link is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkLifecycle {
    Constructed,
    Loaded,
    Initialized,
    Finalized,
}

/// Runtime flags taken from the description and pushed to the backend on init.
#[derive(Debug, Clone, Copy)]
struct RuntimeParams {
    gravity: bool,
    kinematic: bool,
    auto_disable: bool,
}

#[derive(Debug)]
struct LinkStructure {
    name: String,
    lifecycle: LinkLifecycle,
    inertial: Inertial,
    explicit_inertial: bool,
    collisions: CollisionRegistry,
    joints: JointMembership,
    attachments: AttachmentTable,
    sensors: Vec<String>,
    self_collide: bool,
    linear_damping: f32,
    angular_damping: f32,
    params: RuntimeParams,
}

#[derive(Debug, Default)]
struct BodyState {
    pose: Pose,
    velocity: Velocity,
    accumulator: ForceAccumulator,
}

/// One rigid body of an articulated model.
pub struct Link<B: LinkBackend> {
    id: EntityId,
    parent: EntityId,
    structure: RwLock<LinkStructure>,
    state: Mutex<BodyState>,
    backend: Mutex<B>,
    /// Last enabled value announced through `enabled_signal`.
    announced_enabled: AtomicBool,
    enabled_signal: Signal<bool>,
}

impl<B: LinkBackend> Link<B> {
    /// Creates an empty link owned by the entity `parent` (usually a model).
    pub fn new(parent: EntityId, backend: B) -> Self {
        Self {
            id: EntityId::default(),
            parent,
            structure: RwLock::new(LinkStructure {
                name: String::new(),
                lifecycle: LinkLifecycle::Constructed,
                inertial: Inertial::default(),
                explicit_inertial: false,
                collisions: CollisionRegistry::new(),
                joints: JointMembership::new(),
                attachments: AttachmentTable::new(),
                sensors: Vec::new(),
                self_collide: false,
                linear_damping: DEFAULT_LINEAR_DAMPING,
                angular_damping: DEFAULT_ANGULAR_DAMPING,
                params: RuntimeParams {
                    gravity: true,
                    kinematic: false,
                    auto_disable: true,
                },
            }),
            state: Mutex::new(BodyState::default()),
            backend: Mutex::new(backend),
            announced_enabled: AtomicBool::new(false),
            enabled_signal: Signal::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub fn parent(&self) -> EntityId {
        self.parent
    }

    pub fn name(&self) -> String {
        self.structure.read().name.clone()
    }

    pub fn lifecycle(&self) -> LinkLifecycle {
        self.structure.read().lifecycle
    }

    /// Runs `f` with exclusive access to the backend.
    pub fn with_backend<R>(&self, f: impl FnOnce(&mut B) -> R) -> R {
        f(&mut self.backend.lock())
    }

    // ---------------------------------------------------------------------
    // Lifecycle

    /// Populates the link from a description. Allowed once.
    ///
    /// Loading is all-or-nothing: if any collision is malformed or
    /// duplicated the link keeps its empty, constructed structure.
    pub fn load(&mut self, desc: &LinkDescription) -> Result<()> {
        let structure = self.structure.get_mut();
        if structure.lifecycle != LinkLifecycle::Constructed {
            return Err(LinkError::AlreadyLoaded(structure.name.clone()));
        }
        desc.validate()?;

        let mut collisions = CollisionRegistry::new();
        for collision in &desc.collisions {
            collisions.load_collision(collision).map_err(|err| {
                warn!("link '{}': failed to load collision: {err}", desc.name);
                err
            })?;
        }

        structure.name = desc.name.clone();
        structure.explicit_inertial = desc.inertial.is_some();
        structure.inertial = desc
            .inertial
            .unwrap_or_else(|| collisions.aggregate_inertial());
        structure.collisions = collisions;
        structure.sensors = desc.sensors.iter().map(|s| s.name.clone()).collect();
        structure.self_collide = desc.self_collide;
        structure.linear_damping = desc.linear_damping;
        structure.angular_damping = desc.angular_damping;
        structure.params = RuntimeParams {
            gravity: desc.gravity,
            kinematic: desc.kinematic,
            auto_disable: desc.auto_disable,
        };
        structure.lifecycle = LinkLifecycle::Loaded;

        self.state.get_mut().pose = desc.pose;

        debug!(
            "loaded link '{}' ({} collisions, {} sensors, mass {:.3})",
            structure.name,
            structure.collisions.len(),
            structure.sensors.len(),
            structure.inertial.mass
        );
        Ok(())
    }

    /// Activates the backend and pushes the loaded configuration into it.
    pub fn init(&self) {
        let mut structure = self.structure.write();
        if structure.lifecycle != LinkLifecycle::Loaded {
            warn!(
                "link '{}': init called in state {:?}",
                structure.name, structure.lifecycle
            );
            debug_assert!(false, "Link::init requires a loaded link");
            return;
        }

        let state = self.state.lock();
        let mut backend = self.backend.lock();
        backend.init(&state.pose, &structure.inertial);
        backend.set_gravity_mode(structure.params.gravity);
        backend.set_self_collide(structure.self_collide);
        backend.set_auto_disable(structure.params.auto_disable);
        backend.set_linear_damping(structure.linear_damping);
        backend.set_angular_damping(structure.angular_damping);
        backend.update_mass(&structure.inertial);
        backend.update_surface(&structure.collisions);
        if structure.params.kinematic {
            if let Err(err) = backend.set_kinematic(true) {
                warn!("link '{}': {err}", structure.name);
            }
        }
        drop(backend);
        drop(state);

        structure.lifecycle = LinkLifecycle::Initialized;
        structure.attachments.follow(&self.state.lock().pose);
        debug!("initialized link '{}'", structure.name);
    }

    /// Advances the link by one step through the backend.
    pub fn update(&self, dt: f32) {
        let structure = self.structure.read();
        if structure.lifecycle != LinkLifecycle::Initialized {
            warn!(
                "link '{}': update called in state {:?}",
                structure.name, structure.lifecycle
            );
            debug_assert!(false, "Link::update requires an initialized link");
            return;
        }

        let _timer = ScopedTimer::new("link::update");
        let mut state = self.state.lock();
        let state = &mut *state;
        self.backend.lock().update(BodyFrame {
            dt,
            pose: &mut state.pose,
            velocity: &mut state.velocity,
            accumulator: &mut state.accumulator,
            inertial: &structure.inertial,
        });
        structure.attachments.follow(&state.pose);
    }

    /// Detaches every joint and static model and releases the backend.
    ///
    /// Returns the joints that were detached so the owner can drop the
    /// reverse references held by the neighboring links.
    pub fn fini(&self) -> Vec<JointRef> {
        let mut structure = self.structure.write();
        let released = structure.joints.clear();
        structure.attachments.detach_all();
        self.backend.lock().fini();
        structure.lifecycle = LinkLifecycle::Finalized;
        debug!(
            "finalized link '{}' ({} joints released)",
            structure.name,
            released.len()
        );
        released
    }

    /// Clears accumulated force, torque, and acceleration.
    pub fn reset(&self) {
        self.mutate_accumulator(|acc, _, _| acc.flush());
    }

    /// Re-applies runtime flags from `desc` without touching collisions,
    /// joints, attachments, or the inertial.
    ///
    /// The kinematic change is attempted first; if the backend rejects it
    /// nothing else is applied.
    pub fn update_parameters(&self, desc: &LinkDescription) -> Result<()> {
        desc.validate()?;
        let mut structure = self.structure.write();
        let mut backend = self.backend.lock();
        if desc.kinematic != backend.kinematic() {
            backend.set_kinematic(desc.kinematic)?;
        }

        structure.self_collide = desc.self_collide;
        structure.linear_damping = desc.linear_damping;
        structure.angular_damping = desc.angular_damping;
        structure.params = RuntimeParams {
            gravity: desc.gravity,
            kinematic: desc.kinematic,
            auto_disable: desc.auto_disable,
        };

        backend.set_gravity_mode(desc.gravity);
        backend.set_self_collide(desc.self_collide);
        backend.set_auto_disable(desc.auto_disable);
        backend.set_linear_damping(desc.linear_damping);
        backend.set_angular_damping(desc.angular_damping);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Enabled state

    /// Enables or disables the body in the backend.
    ///
    /// Subscribers are notified once per observed transition; repeating the
    /// current value is silent. Notification happens on the calling thread
    /// with no link lock held.
    ///
    /// The transition is detected under the backend lock, so the announced
    /// value always matches the backend once concurrent callers return.
    /// Delivery order between two racing callers is not defined.
    pub fn set_enabled(&self, enabled: bool) {
        let transition = {
            let mut backend = self.backend.lock();
            backend.set_enabled(enabled);
            let now = backend.enabled();
            (self.announced_enabled.swap(now, Ordering::AcqRel) != now).then_some(now)
        };
        if let Some(now) = transition {
            self.enabled_signal.emit(now);
        }
    }

    pub fn enabled(&self) -> bool {
        self.backend.lock().enabled()
    }

    pub fn connect_enabled<F>(&self, callback: F) -> SubscriberId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.enabled_signal.connect(callback)
    }

    pub fn disconnect_enabled(&self, id: SubscriberId) -> bool {
        self.enabled_signal.disconnect(id)
    }

    // ---------------------------------------------------------------------
    // Backend flags

    pub fn set_gravity_mode(&self, mode: bool) {
        self.structure.write().params.gravity = mode;
        self.backend.lock().set_gravity_mode(mode);
    }

    pub fn gravity_mode(&self) -> bool {
        self.backend.lock().gravity_mode()
    }

    pub fn set_self_collide(&self, collide: bool) {
        self.structure.write().self_collide = collide;
        self.backend.lock().set_self_collide(collide);
    }

    /// Whether this link collides with other links of its own model.
    pub fn self_collide(&self) -> bool {
        self.structure.read().self_collide
    }

    pub fn set_auto_disable(&self, auto_disable: bool) {
        self.structure.write().params.auto_disable = auto_disable;
        self.backend.lock().set_auto_disable(auto_disable);
    }

    pub fn set_kinematic(&self, kinematic: bool) -> Result<()> {
        self.backend.lock().set_kinematic(kinematic)?;
        self.structure.write().params.kinematic = kinematic;
        Ok(())
    }

    pub fn kinematic(&self) -> bool {
        self.backend.lock().kinematic()
    }

    pub fn set_linear_damping(&self, damping: f32) {
        self.structure.write().linear_damping = damping;
        self.backend.lock().set_linear_damping(damping);
    }

    pub fn set_angular_damping(&self, damping: f32) {
        self.structure.write().angular_damping = damping;
        self.backend.lock().set_angular_damping(damping);
    }

    pub fn linear_damping(&self) -> f32 {
        self.structure.read().linear_damping
    }

    pub fn angular_damping(&self) -> f32 {
        self.structure.read().angular_damping
    }

    // ---------------------------------------------------------------------
    // Pose and velocity

    pub fn world_pose(&self) -> Pose {
        self.state.lock().pose
    }

    /// Moves the link from outside the step and lets the backend resync.
    pub fn set_world_pose(&self, pose: Pose) {
        let structure = self.structure.read();
        self.state.lock().pose = pose;
        self.backend.lock().on_pose_change(&pose);
        structure.attachments.follow(&pose);
    }

    pub fn set_linear_vel(&self, velocity: Vec3) {
        self.state.lock().velocity.linear = velocity;
        self.backend.lock().set_linear_vel(velocity);
    }

    pub fn set_angular_vel(&self, velocity: Vec3) {
        self.state.lock().velocity.angular = velocity;
        self.backend.lock().set_angular_vel(velocity);
    }

    pub fn world_linear_vel(&self) -> Vec3 {
        self.state.lock().velocity.linear
    }

    pub fn world_angular_vel(&self) -> Vec3 {
        self.state.lock().velocity.angular
    }

    pub fn relative_linear_vel(&self) -> Vec3 {
        let state = self.state.lock();
        state.pose.inverse_transform_vector(state.velocity.linear)
    }

    pub fn relative_angular_vel(&self) -> Vec3 {
        let state = self.state.lock();
        state.pose.inverse_transform_vector(state.velocity.angular)
    }

    // ---------------------------------------------------------------------
    // Forces, torques, accelerations

    /// Applies `f` to the accumulator under the state lock, then mirrors the
    /// new world wrench into the backend.
    fn mutate_accumulator(&self, f: impl FnOnce(&mut ForceAccumulator, &Pose, Vec3)) {
        let center_of_mass = self.structure.read().inertial.center_of_mass;
        let mut state = self.state.lock();
        let state = &mut *state;
        f(&mut state.accumulator, &state.pose, center_of_mass);
        let wrench = state.accumulator.world_wrench(&state.pose);

        let mut backend = self.backend.lock();
        backend.set_force(wrench.force);
        backend.set_torque(wrench.torque);
    }

    fn read_accumulator<R>(&self, f: impl FnOnce(&ForceAccumulator, &Pose) -> R) -> R {
        let state = self.state.lock();
        f(&state.accumulator, &state.pose)
    }

    /// Replaces the accumulated force with a world-frame force.
    pub fn set_force(&self, force: Vec3) {
        self.mutate_accumulator(|acc, pose, _| acc.set_force(force, pose));
    }

    /// Replaces the accumulated torque with a world-frame torque.
    pub fn set_torque(&self, torque: Vec3) {
        self.mutate_accumulator(|acc, pose, _| acc.set_torque(torque, pose));
    }

    pub fn add_force(&self, force: Vec3) {
        self.mutate_accumulator(|acc, pose, _| acc.add_force(force, pose));
    }

    pub fn add_relative_force(&self, force: Vec3) {
        self.mutate_accumulator(|acc, _, _| acc.add_relative_force(force));
    }

    pub fn add_force_at_world_position(&self, force: Vec3, position: Vec3) {
        self.mutate_accumulator(|acc, pose, com| {
            acc.add_force_at_world_position(force, position, pose, com)
        });
    }

    pub fn add_force_at_relative_position(&self, force: Vec3, position: Vec3) {
        self.mutate_accumulator(|acc, _, com| {
            acc.add_force_at_relative_position(force, position, com)
        });
    }

    pub fn add_torque(&self, torque: Vec3) {
        self.mutate_accumulator(|acc, pose, _| acc.add_torque(torque, pose));
    }

    pub fn add_relative_torque(&self, torque: Vec3) {
        self.mutate_accumulator(|acc, _, _| acc.add_relative_torque(torque));
    }

    /// Sets the link-frame linear acceleration.
    pub fn set_linear_accel(&self, accel: Vec3) {
        self.state.lock().accumulator.set_linear_accel(accel);
    }

    /// Sets the link-frame angular acceleration.
    pub fn set_angular_accel(&self, accel: Vec3) {
        self.state.lock().accumulator.set_angular_accel(accel);
    }

    pub fn relative_force(&self) -> Vec3 {
        self.read_accumulator(|acc, _| acc.relative_force())
    }

    pub fn world_force(&self) -> Vec3 {
        self.read_accumulator(|acc, pose| acc.world_force(pose))
    }

    pub fn relative_torque(&self) -> Vec3 {
        self.read_accumulator(|acc, _| acc.relative_torque())
    }

    pub fn world_torque(&self) -> Vec3 {
        self.read_accumulator(|acc, pose| acc.world_torque(pose))
    }

    pub fn relative_linear_accel(&self) -> Vec3 {
        self.read_accumulator(|acc, _| acc.relative_linear_accel())
    }

    pub fn world_linear_accel(&self) -> Vec3 {
        self.read_accumulator(|acc, pose| acc.world_linear_accel(pose))
    }

    pub fn relative_angular_accel(&self) -> Vec3 {
        self.read_accumulator(|acc, _| acc.relative_angular_accel())
    }

    pub fn world_angular_accel(&self) -> Vec3 {
        self.read_accumulator(|acc, pose| acc.world_angular_accel(pose))
    }

    // ---------------------------------------------------------------------
    // Inertial

    pub fn inertial(&self) -> Inertial {
        self.structure.read().inertial
    }

    /// Replaces the inertial descriptor as a whole.
    ///
    /// The new descriptor counts as explicitly configured, so later calls to
    /// [`set_inertial_from_collisions`](Self::set_inertial_from_collisions)
    /// leave it alone.
    pub fn set_inertial(&self, inertial: Inertial) {
        let mut structure = self.structure.write();
        structure.inertial = inertial;
        structure.explicit_inertial = true;
        self.backend.lock().update_mass(&structure.inertial);
    }

    /// Derives the inertial from the collisions unless one was configured.
    ///
    /// Returns `true` when the descriptor was recomputed.
    pub fn set_inertial_from_collisions(&self) -> bool {
        let mut structure = self.structure.write();
        if structure.explicit_inertial {
            return false;
        }
        structure.inertial = structure.collisions.aggregate_inertial();
        self.backend.lock().update_mass(&structure.inertial);
        true
    }

    // ---------------------------------------------------------------------
    // Collisions

    /// Registers one more collision after load.
    pub fn load_collision(&self, desc: &CollisionDescription) -> Result<CollisionId> {
        self.structure.write().collisions.load_collision(desc)
    }

    /// Snapshot of every collision, in load order.
    pub fn collisions(&self) -> Vec<Collision> {
        self.structure.read().collisions.iter().cloned().collect()
    }

    /// Runs `f` over the registry without cloning.
    ///
    /// The structure lock is held while `f` runs; calling any method of
    /// this link from inside `f` may deadlock.
    pub fn with_collisions<R>(&self, f: impl FnOnce(&CollisionRegistry) -> R) -> R {
        f(&self.structure.read().collisions)
    }

    pub fn collision_by_name(&self, name: &str) -> Option<Collision> {
        self.structure.read().collisions.by_name(name).cloned()
    }

    pub fn collision(&self, index: usize) -> Option<Collision> {
        self.structure.read().collisions.by_index(index).cloned()
    }

    pub fn collision_by_id(&self, id: CollisionId) -> Option<Collision> {
        self.structure.read().collisions.by_id(id).cloned()
    }

    pub fn collision_count(&self) -> usize {
        self.structure.read().collisions.len()
    }

    pub fn set_collide_mode(&self, mode: CollideMode) {
        let mut structure = self.structure.write();
        structure.collisions.set_collide_mode(mode);
        self.backend.lock().update_surface(&structure.collisions);
    }

    pub fn set_laser_retro(&self, retro: f32) {
        let mut structure = self.structure.write();
        structure.collisions.set_laser_retro(retro);
        self.backend.lock().update_surface(&structure.collisions);
    }

    /// World-frame bounds of every collision, or `None` without collisions.
    pub fn bounding_box(&self) -> Option<Aabb> {
        let structure = self.structure.read();
        let pose = self.state.lock().pose;
        let mut bounds = Aabb::empty();
        for collision in &structure.collisions {
            let center = collision.world_pose(&pose).position;
            bounds.merge(&Aabb::from_sphere(center, collision.shape.bounding_radius()));
        }
        (!bounds.is_empty()).then_some(bounds)
    }

    // ---------------------------------------------------------------------
    // Joints

    /// Records a joint for which this link is the child.
    pub fn add_parent_joint(&self, joint: JointRef) {
        if self.structure.write().joints.add_parent_joint(joint) {
            debug!("link {}: parent joint {} added", self.id, joint.id);
        }
    }

    /// Records a joint for which this link is the parent.
    pub fn add_child_joint(&self, joint: JointRef) {
        if self.structure.write().joints.add_child_joint(joint) {
            debug!("link {}: child joint {} added", self.id, joint.id);
        }
    }

    pub fn remove_parent_joint(&self, joint: EntityId) {
        if self.structure.write().joints.remove_parent_joint(joint) {
            debug!("link {}: parent joint {joint} removed", self.id);
        }
    }

    pub fn remove_child_joint(&self, joint: EntityId) {
        if self.structure.write().joints.remove_child_joint(joint) {
            debug!("link {}: child joint {joint} removed", self.id);
        }
    }

    pub fn parent_joints(&self) -> Vec<JointRef> {
        self.structure.read().joints.parent_joints().copied().collect()
    }

    pub fn child_joints(&self) -> Vec<JointRef> {
        self.structure.read().joints.child_joints().copied().collect()
    }

    /// Distinct links connected through joints where this link is the parent.
    pub fn child_joints_links(&self) -> Vec<EntityId> {
        self.structure.read().joints.child_links()
    }

    /// Distinct links connected through joints where this link is the child.
    pub fn parent_joints_links(&self) -> Vec<EntityId> {
        self.structure.read().joints.parent_links()
    }

    // ---------------------------------------------------------------------
    // Attached static models

    /// Attaches `model` at `offset` from this link and moves it there.
    pub fn attach_static_model(&self, model: Arc<dyn StaticModel>, offset: Pose) {
        let mut structure = self.structure.write();
        let pose = self.state.lock().pose;
        model.set_world_pose(pose.compose(&offset));
        debug!("link '{}': attached '{}'", structure.name, model.name());
        structure.attachments.attach(model, offset);
    }

    /// Detaches the first model named `name`; no-op if none matches.
    pub fn detach_static_model(&self, name: &str) -> bool {
        self.structure.write().attachments.detach(name).is_some()
    }

    pub fn detach_all_static_models(&self) {
        self.structure.write().attachments.detach_all();
    }

    pub fn attached_model_count(&self) -> usize {
        self.structure.read().attachments.len()
    }

    pub fn attached_model_names(&self) -> Vec<String> {
        self.structure.read().attachments.names()
    }

    // ---------------------------------------------------------------------
    // Sensors

    /// Appends a sensor name to the catalogue.
    pub fn register_sensor(&self, name: impl Into<String>) {
        self.structure.write().sensors.push(name.into());
    }

    pub fn sensor_count(&self) -> usize {
        self.structure.read().sensors.len()
    }

    pub fn sensor_name(&self, index: usize) -> Option<String> {
        self.structure.read().sensors.get(index).cloned()
    }

    // ---------------------------------------------------------------------
    // Snapshot and messages

    pub fn state(&self) -> LinkState {
        let name = self.name();
        let state = self.state.lock();
        LinkState {
            name,
            pose: state.pose,
            velocity: state.velocity,
            acceleration: state.accumulator.world_acceleration(&state.pose),
            wrench: state.accumulator.world_wrench(&state.pose),
        }
    }

    /// Restores a snapshot taken with [`state`](Self::state).
    pub fn set_state(&self, snapshot: &LinkState) {
        let structure = self.structure.read();
        let mut state = self.state.lock();
        let state = &mut *state;
        state.pose = snapshot.pose;
        state.velocity = snapshot.velocity;

        let pose = state.pose;
        let acc = &mut state.accumulator;
        acc.set_linear_accel(pose.inverse_transform_vector(snapshot.acceleration.linear));
        acc.set_angular_accel(pose.inverse_transform_vector(snapshot.acceleration.angular));
        acc.set_force(snapshot.wrench.force, &pose);
        acc.set_torque(snapshot.wrench.torque, &pose);

        let mut backend = self.backend.lock();
        backend.on_pose_change(&pose);
        backend.set_linear_vel(snapshot.velocity.linear);
        backend.set_angular_vel(snapshot.velocity.angular);
        backend.set_force(snapshot.wrench.force);
        backend.set_torque(snapshot.wrench.torque);
        drop(backend);

        structure.attachments.follow(&pose);
    }

    /// Writes every field this link owns into `msg`.
    pub fn fill_msg(&self, msg: &mut LinkMsg) {
        let structure = self.structure.read();
        let pose = self.state.lock().pose;
        let backend = self.backend.lock();

        msg.version = LINK_MSG_VERSION;
        msg.id = Some(self.id);
        msg.name = Some(structure.name.clone());
        msg.pose = Some(pose);
        msg.inertial = Some(structure.inertial);
        msg.enabled = Some(backend.enabled());
        msg.gravity = Some(backend.gravity_mode());
        msg.self_collide = Some(structure.self_collide);
        msg.kinematic = Some(backend.kinematic());
        msg.linear_damping = Some(structure.linear_damping);
        msg.angular_damping = Some(structure.angular_damping);
        msg.collisions = structure.collisions.iter().map(CollisionMsg::from).collect();
        msg.sensors = structure.sensors.clone();
    }

    #[deprecated(note = "use `fill_msg`")]
    pub fn fill_link_msg(&self, msg: &mut LinkMsg) {
        self.fill_msg(msg);
    }

    /// Applies the fields present in `msg`, leaving the rest untouched.
    ///
    /// Per-collision entries only update laser retro and collide mode.
    pub fn process_msg(&self, msg: &LinkMsg) -> Result<()> {
        if msg.version > LINK_MSG_VERSION {
            return Err(LinkError::UnsupportedVersion(msg.version));
        }
        if let Some(id) = msg.id {
            if id != self.id {
                return Err(LinkError::IdMismatch {
                    expected: self.id.to_string(),
                    found: id.to_string(),
                });
            }
        }

        if let Some(name) = &msg.name {
            self.structure.write().name = name.clone();
        }
        if let Some(pose) = msg.pose {
            self.set_world_pose(pose);
        }
        if let Some(inertial) = msg.inertial {
            self.set_inertial(inertial);
        }
        if let Some(gravity) = msg.gravity {
            self.set_gravity_mode(gravity);
        }
        if let Some(self_collide) = msg.self_collide {
            self.set_self_collide(self_collide);
        }
        if let Some(kinematic) = msg.kinematic {
            if let Err(err) = self.set_kinematic(kinematic) {
                warn!("link {}: ignoring kinematic={kinematic}: {err}", self.id);
            }
        }
        if let Some(damping) = msg.linear_damping {
            self.set_linear_damping(damping);
        }
        if let Some(damping) = msg.angular_damping {
            self.set_angular_damping(damping);
        }
        if !msg.collisions.is_empty() {
            self.apply_collision_msgs(&msg.collisions);
        }
        if let Some(enabled) = msg.enabled {
            self.set_enabled(enabled);
        }
        Ok(())
    }

    fn apply_collision_msgs(&self, msgs: &[CollisionMsg]) {
        let mut structure = self.structure.write();
        for entry in msgs {
            let Some(collision) = structure.collisions.by_id_mut(entry.id) else {
                warn!("link {}: no collision with id {}", self.id, entry.id);
                continue;
            };
            if let Some(retro) = entry.laser_retro {
                collision.set_laser_retro(retro);
            }
            if let Some(mode) = entry.collide_mode {
                collision.set_collide_mode(mode);
            }
        }
        self.backend.lock().update_surface(&structure.collisions);
    }
}

impl<B: LinkBackend> std::fmt::Debug for Link<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let structure = self.structure.read();
        f.debug_struct("Link")
            .field("id", &self.id)
            .field("name", &structure.name)
            .field("lifecycle", &structure.lifecycle)
            .field("collisions", &structure.collisions.len())
            .field("joints", &structure.joints.len())
            .field("attachments", &structure.attachments.len())
            .finish()
    }
}
