use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Unique identifier with generation tracking to prevent stale references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct GenerationalId {
    pub index: usize,
    pub generation: u32,
}

impl GenerationalId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Identifier shared by links, joints, and models.
///
/// Holding an `EntityId` never keeps the entity alive; lookups through an
/// [`Arena`] fail once the slot has been recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EntityId(pub GenerationalId);

impl EntityId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self(GenerationalId::new(index, generation))
    }

    pub fn from_index(index: u32) -> Self {
        Self::new(index as usize, 0)
    }

    pub fn index(&self) -> usize {
        self.0.index
    }

    pub fn generation(&self) -> u32 {
        self.0.generation
    }

    pub fn is_null(&self) -> bool {
        self.0.index == usize::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self(GenerationalId::new(usize::MAX, 0))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "{}v{}", self.index(), self.generation())
        }
    }
}

/// Generational arena that hands out stable IDs while preventing use-after-free.
pub struct Arena<T> {
    items: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: VecDeque<usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            generations: Vec::new(),
            free_list: VecDeque::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> EntityId {
        if let Some(index) = self.free_list.pop_front() {
            let generation = self.generations[index];
            self.items[index] = Some(item);
            return EntityId::new(index, generation);
        }

        let index = self.items.len();
        self.items.push(Some(item));
        self.generations.push(0);
        EntityId::new(index, 0)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        if self.is_valid(id) {
            self.items.get(id.index()).and_then(|slot| slot.as_ref())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        if self.is_valid(id) {
            self.items.get_mut(id.index()).and_then(|slot| slot.as_mut())
        } else {
            None
        }
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        if !self.is_valid(id) {
            return None;
        }
        let slot = self.items.get_mut(id.index())?;
        if slot.is_some() {
            self.generations[id.index()] = self.generations[id.index()].wrapping_add(1);
            self.free_list.push_back(id.index());
        }
        slot.take()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        self.items.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|item| (EntityId::new(index, self.generations[index]), item))
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.items.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_valid(&self, id: EntityId) -> bool {
        self.generations
            .get(id.index())
            .copied()
            .map(|gen| gen == id.generation())
            .unwrap_or(false)
    }
}

#[cfg(feature = "parallel")]
impl<T: Sync> Arena<T> {
    /// Parallel iteration over live entries.
    pub fn par_values(&self) -> impl rayon::iter::ParallelIterator<Item = &T> + '_ {
        use rayon::prelude::*;
        self.items.par_iter().filter_map(|slot| slot.as_ref())
    }
}
