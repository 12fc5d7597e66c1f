use std::collections::{HashSet, VecDeque};

use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    backend::LinkBackend,
    config::{DEFAULT_STEP_BUDGET_MS, DEFAULT_TIME_STEP},
    core::{description::LinkDescription, joints::JointRef},
    error::{LinkError, Result},
    link::{Link, LinkLifecycle},
    utils::{
        allocator::{Arena, EntityId},
        logging::{warn_if_step_budget_exceeded, ScopedTimer},
    },
};

/// Constraint between two links of a model.
///
/// Endpoints are plain ids; a joint never keeps a link alive. `None` stands
/// for the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: String,
    pub parent: Option<EntityId>,
    pub child: Option<EntityId>,
}

/// Owner of a set of links and the joints between them.
///
/// Joint creation and removal keep both endpoint links' membership in sync.
/// Structural edits take `&mut self` and therefore happen between steps;
/// [`update`](Self::update) and per-link setters only need `&self`.
pub struct Model<B: LinkBackend> {
    pub id: EntityId,
    name: String,
    links: Arena<Link<B>>,
    joints: Arena<Joint>,
    time_step: f32,
    parallel_enabled: bool,
    step_budget_ms: f32,
}

impl<B: LinkBackend> Model<B> {
    pub fn new(id: EntityId, name: impl Into<String>, time_step: f32) -> Self {
        let ts = if time_step <= 0.0 {
            DEFAULT_TIME_STEP
        } else {
            time_step
        };

        Self {
            id,
            name: name.into(),
            links: Arena::new(),
            joints: Arena::new(),
            time_step: ts,
            parallel_enabled: false,
            step_budget_ms: DEFAULT_STEP_BUDGET_MS,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.parallel_enabled = enabled;
    }

    pub fn parallel_enabled(&self) -> bool {
        self.parallel_enabled
    }

    pub fn set_step_budget_ms(&mut self, budget_ms: f32) {
        self.step_budget_ms = budget_ms;
    }

    /// Creates a link owned by this model and loads it from `desc`.
    pub fn load_link(&mut self, desc: &LinkDescription, backend: B) -> Result<EntityId> {
        let mut link = Link::new(self.id, backend);
        link.load(desc)?;
        Ok(self.add_link(link))
    }

    pub fn add_link(&mut self, link: Link<B>) -> EntityId {
        let id = self.links.insert(link);
        if let Some(stored) = self.links.get_mut(id) {
            stored.set_id(id);
        }
        id
    }

    pub fn link(&self, id: EntityId) -> Option<&Link<B>> {
        self.links.get(id)
    }

    pub fn link_by_name(&self, name: &str) -> Option<(EntityId, &Link<B>)> {
        self.links.iter().find(|(_, link)| link.name() == name)
    }

    pub fn links(&self) -> impl Iterator<Item = (EntityId, &Link<B>)> + '_ {
        self.links.iter()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Finalizes and removes a link, dropping every joint that touches it.
    pub fn remove_link(&mut self, id: EntityId) -> Option<Link<B>> {
        let touching: Vec<EntityId> = self
            .joints
            .iter()
            .filter(|(_, joint)| joint.parent == Some(id) || joint.child == Some(id))
            .map(|(joint_id, _)| joint_id)
            .collect();
        for joint in touching {
            self.disconnect(joint);
        }

        let link = self.links.remove(id)?;
        link.fini();
        Some(link)
    }

    /// Creates a joint and registers it with both endpoint links.
    pub fn connect(
        &mut self,
        name: impl Into<String>,
        parent: Option<EntityId>,
        child: Option<EntityId>,
    ) -> Result<EntityId> {
        let name = name.into();
        for endpoint in [parent, child].into_iter().flatten() {
            if self.links.get(endpoint).is_none() {
                return Err(LinkError::MalformedDescription(format!(
                    "joint '{name}' references unknown link {endpoint}"
                )));
            }
        }
        if parent.is_some() && parent == child {
            return Err(LinkError::MalformedDescription(format!(
                "joint '{name}' connects a link to itself"
            )));
        }

        let id = self.joints.insert(Joint {
            name,
            parent,
            child,
        });
        let joint = JointRef::new(id, parent, child);
        if let Some(link) = parent.and_then(|p| self.links.get(p)) {
            link.add_child_joint(joint);
        }
        if let Some(link) = child.and_then(|c| self.links.get(c)) {
            link.add_parent_joint(joint);
        }
        debug!("model '{}': joint {id} connected", self.name);
        Ok(id)
    }

    /// Removes a joint from the model and from both endpoint links.
    ///
    /// Returns `false` if the joint does not exist.
    pub fn disconnect(&mut self, joint_id: EntityId) -> bool {
        let Some(joint) = self.joints.remove(joint_id) else {
            return false;
        };
        if let Some(link) = joint.parent.and_then(|p| self.links.get(p)) {
            link.remove_child_joint(joint_id);
        }
        if let Some(link) = joint.child.and_then(|c| self.links.get(c)) {
            link.remove_parent_joint(joint_id);
        }
        debug!("model '{}': joint '{}' disconnected", self.name, joint.name);
        true
    }

    pub fn joint(&self, id: EntityId) -> Option<&Joint> {
        self.joints.get(id)
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Links reachable from `root` by following child joints, breadth first.
    ///
    /// `root` comes first; cycles are visited once.
    pub fn kinematic_chain(&self, root: EntityId) -> Vec<EntityId> {
        if self.links.get(root).is_none() {
            return Vec::new();
        }

        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            order.push(id);
            if let Some(link) = self.links.get(id) {
                queue.extend(link.child_joints_links());
            }
        }
        order
    }

    /// Whether contacts between links `a` and `b` should be generated.
    ///
    /// Links joined directly by a joint never collide unless one of them has
    /// self-collision enabled.
    pub fn should_collide(&self, a: EntityId, b: EntityId) -> bool {
        if a == b {
            return false;
        }
        let (Some(link_a), Some(link_b)) = (self.links.get(a), self.links.get(b)) else {
            return false;
        };
        if link_a.self_collide() || link_b.self_collide() {
            return true;
        }
        let jointed = link_a.child_joints_links().contains(&b)
            || link_a.parent_joints_links().contains(&b);
        !jointed
    }

    /// Initializes every loaded link.
    pub fn init(&self) {
        for (_, link) in self.links.iter() {
            if link.lifecycle() == LinkLifecycle::Loaded {
                link.init();
            }
        }
    }

    /// Steps every initialized link once.
    pub fn update(&self) {
        let timer = ScopedTimer::new("model::update");
        let dt = self.time_step;

        #[cfg(feature = "parallel")]
        {
            if self.parallel_enabled {
                self.links
                    .par_values()
                    .filter(|link| link.lifecycle() == LinkLifecycle::Initialized)
                    .for_each(|link| link.update(dt));
                warn_if_step_budget_exceeded(timer.elapsed(), self.step_budget_ms);
                return;
            }
        }

        for (_, link) in self.links.iter() {
            if link.lifecycle() == LinkLifecycle::Initialized {
                link.update(dt);
            }
        }
        warn_if_step_budget_exceeded(timer.elapsed(), self.step_budget_ms);
    }

    /// Clears accumulated forces on every link.
    pub fn reset(&self) {
        for (_, link) in self.links.iter() {
            link.reset();
        }
    }

    /// Removes every joint and finalizes every link.
    pub fn fini(&mut self) {
        let joint_ids: Vec<EntityId> = self.joints.ids().collect();
        for joint in joint_ids {
            self.disconnect(joint);
        }
        for (_, link) in self.links.iter() {
            link.fini();
        }
        debug!("model '{}' finalized", self.name);
    }
}
