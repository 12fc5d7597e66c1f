use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::utils::allocator::EntityId;

/// Non-owning reference to a joint and its two endpoints.
///
/// An endpoint of `None` means the joint attaches to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointRef {
    pub id: EntityId,
    pub parent: Option<EntityId>,
    pub child: Option<EntityId>,
}

impl JointRef {
    pub fn new(id: EntityId, parent: Option<EntityId>, child: Option<EntityId>) -> Self {
        Self { id, parent, child }
    }
}

/// Joints touching one link, split by the role the link plays.
///
/// `child_joints` are the joints for which this link is the parent (they
/// lead to child links); `parent_joints` are the joints for which this link
/// is the child.
#[derive(Debug, Clone, Default)]
pub struct JointMembership {
    parent_joints: BTreeMap<EntityId, JointRef>,
    child_joints: BTreeMap<EntityId, JointRef>,
}

impl JointMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the joint was already present.
    pub fn add_parent_joint(&mut self, joint: JointRef) -> bool {
        Self::insert(&mut self.parent_joints, joint)
    }

    /// Returns `false` if the joint was already present.
    pub fn add_child_joint(&mut self, joint: JointRef) -> bool {
        Self::insert(&mut self.child_joints, joint)
    }

    /// Returns `false` if the joint was absent.
    pub fn remove_parent_joint(&mut self, joint: EntityId) -> bool {
        self.parent_joints.remove(&joint).is_some()
    }

    /// Returns `false` if the joint was absent.
    pub fn remove_child_joint(&mut self, joint: EntityId) -> bool {
        self.child_joints.remove(&joint).is_some()
    }

    pub fn parent_joints(&self) -> impl Iterator<Item = &JointRef> + '_ {
        self.parent_joints.values()
    }

    pub fn child_joints(&self) -> impl Iterator<Item = &JointRef> + '_ {
        self.child_joints.values()
    }

    pub fn contains(&self, joint: EntityId) -> bool {
        self.parent_joints.contains_key(&joint) || self.child_joints.contains_key(&joint)
    }

    /// Distinct links reached through the child joints.
    pub fn child_links(&self) -> Vec<EntityId> {
        Self::distinct(self.child_joints.values().filter_map(|j| j.child))
    }

    /// Distinct links reached through the parent joints.
    pub fn parent_links(&self) -> Vec<EntityId> {
        Self::distinct(self.parent_joints.values().filter_map(|j| j.parent))
    }

    pub fn clear(&mut self) -> Vec<JointRef> {
        let mut released: Vec<JointRef> = std::mem::take(&mut self.parent_joints).into_values().collect();
        released.extend(std::mem::take(&mut self.child_joints).into_values());
        released
    }

    pub fn len(&self) -> usize {
        self.parent_joints.len() + self.child_joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(set: &mut BTreeMap<EntityId, JointRef>, joint: JointRef) -> bool {
        if set.contains_key(&joint.id) {
            return false;
        }
        set.insert(joint.id, joint);
        true
    }

    fn distinct(links: impl Iterator<Item = EntityId>) -> Vec<EntityId> {
        links.collect::<BTreeSet<_>>().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_links_are_deduplicated() {
        let me = EntityId::from_index(0);
        let other = EntityId::from_index(1);
        let mut membership = JointMembership::new();
        membership.add_child_joint(JointRef::new(EntityId::from_index(10), Some(me), Some(other)));
        membership.add_child_joint(JointRef::new(EntityId::from_index(11), Some(me), Some(other)));

        assert_eq!(membership.child_links(), vec![other]);
        assert!(membership.parent_links().is_empty());
    }

    #[test]
    fn world_joints_have_no_neighbor() {
        let me = EntityId::from_index(0);
        let mut membership = JointMembership::new();
        membership.add_parent_joint(JointRef::new(EntityId::from_index(3), None, Some(me)));
        assert!(membership.parent_links().is_empty());
        assert_eq!(membership.len(), 1);
    }
}
