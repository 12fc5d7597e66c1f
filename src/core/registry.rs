use std::collections::HashMap;

use super::{
    collision::{CollideMode, Collision, CollisionId},
    description::CollisionDescription,
    inertial::Inertial,
};
use crate::error::{LinkError, Result};

/// Ordered collection of the collisions owned by one link.
///
/// Lookups by name, ordinal index, and id all return `None` on a miss.
#[derive(Debug, Clone, Default)]
pub struct CollisionRegistry {
    collisions: Vec<Collision>,
    by_name: HashMap<String, usize>,
    next_id: u32,
}

impl CollisionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers one collision, assigning it the next id.
    ///
    /// On error the registry is left unchanged.
    pub fn load_collision(&mut self, desc: &CollisionDescription) -> Result<CollisionId> {
        desc.validate()?;
        if self.by_name.contains_key(&desc.name) {
            return Err(LinkError::DuplicateCollisionName(desc.name.clone()));
        }

        let id = CollisionId(self.next_id);
        self.next_id += 1;
        self.by_name.insert(desc.name.clone(), self.collisions.len());
        self.collisions.push(Collision::from_description(id, desc));
        Ok(id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Collision> {
        self.by_name.get(name).and_then(|&index| self.collisions.get(index))
    }

    pub fn by_index(&self, index: usize) -> Option<&Collision> {
        self.collisions.get(index)
    }

    pub fn by_id(&self, id: CollisionId) -> Option<&Collision> {
        // Ids are dense and never reused, so the ordinal usually matches.
        match self.collisions.get(id.0 as usize) {
            Some(collision) if collision.id() == id => Some(collision),
            _ => self.collisions.iter().find(|c| c.id() == id),
        }
    }

    pub(crate) fn by_id_mut(&mut self, id: CollisionId) -> Option<&mut Collision> {
        self.collisions.iter_mut().find(|c| c.id() == id)
    }

    pub fn len(&self) -> usize {
        self.collisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collisions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Collision> {
        self.collisions.iter()
    }

    pub fn set_collide_mode(&mut self, mode: CollideMode) {
        for collision in &mut self.collisions {
            collision.set_collide_mode(mode);
        }
    }

    pub fn set_laser_retro(&mut self, retro: f32) {
        for collision in &mut self.collisions {
            collision.set_laser_retro(retro);
        }
    }

    /// Aggregate mass properties of every collision, in the link frame.
    ///
    /// Recomputed from scratch on each call.
    pub fn aggregate_inertial(&self) -> Inertial {
        self.collisions.iter().map(Collision::inertial).sum()
    }
}

impl<'a> IntoIterator for &'a CollisionRegistry {
    type Item = &'a Collision;
    type IntoIter = std::slice::Iter<'a, Collision>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
