use colony_core::{EntityHandle, EntityKind, Property};
use glam::Vec2;
use thiserror::Error;

use crate::Entity;

/// Default number of slots in the entity pool.
pub const MAX_ENTITIES: usize = 1024;

/// Errors reported by the entity pool.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// Every slot is occupied.
    #[error("entity pool exhausted: all {capacity} slots are in use")]
    Exhausted {
        /// Number of slots in the pool.
        capacity: usize,
    },
}

/// Fixed-capacity slot array holding every entity in the simulation.
#[derive(Clone, Debug)]
pub struct EntityPool {
    slots: Vec<Entity>,
    generations: Vec<u32>,
    live: usize,
}

impl EntityPool {
    /// Creates a pool with [`MAX_ENTITIES`] slots.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTITIES)
    }

    /// Creates a pool with exactly `capacity` slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Entity::default(); capacity],
            generations: vec![0; capacity],
            live: 0,
        }
    }

    /// Claims the first free slot in index order.
    pub fn try_acquire(&mut self) -> Result<EntityHandle, PoolError> {
        let Some(slot) = self.slots.iter().position(|entity| !entity.valid) else {
            return Err(PoolError::Exhausted {
                capacity: self.slots.len(),
            });
        };

        let generation = self.generations[slot].wrapping_add(1).max(1);
        self.generations[slot] = generation;
        let index = u32::try_from(slot).unwrap_or(u32::MAX);
        let handle = EntityHandle::new(index, generation);

        let entity = &mut self.slots[slot];
        entity.handle = handle;
        entity.valid = true;
        self.live += 1;
        log::trace!("acquired slot {slot} (generation {generation})");
        Ok(handle)
    }

    /// Claims the first free slot.
    ///
    /// # Panics
    ///
    /// Panics when every slot is occupied. The capacity is a fixed balance
    /// constant, so running out is a configuration bug.
    pub fn acquire(&mut self) -> EntityHandle {
        match self.try_acquire() {
            Ok(handle) => handle,
            Err(error) => panic!("{error}"),
        }
    }

    /// Claims a slot and positions the new entity.
    ///
    /// # Panics
    ///
    /// Panics when the pool is exhausted, see [`EntityPool::acquire`].
    pub fn spawn(&mut self, position: Vec2, size: Vec2) -> EntityHandle {
        let handle = self.acquire();
        self.slots[handle.slot()].setup(position, size);
        handle
    }

    /// Zero-fills the slot referenced by `handle`.
    ///
    /// Returns `false` without touching the pool when the handle is stale.
    pub fn release(&mut self, handle: EntityHandle) -> bool {
        if !self.is_alive(handle) {
            log::warn!(
                "ignoring release of stale handle {}:{}",
                handle.index(),
                handle.generation()
            );
            return false;
        }

        self.slots[handle.slot()] = Entity::default();
        self.live -= 1;
        log::trace!("released slot {}", handle.index());
        true
    }

    /// Reports whether `handle` still refers to the entity it was issued for.
    #[must_use]
    pub fn is_alive(&self, handle: EntityHandle) -> bool {
        self.slots
            .get(handle.slot())
            .map_or(false, |entity| entity.valid)
            && self.generations.get(handle.slot()).copied() == Some(handle.generation())
    }

    /// Resolves `handle`, rejecting stale handles.
    #[must_use]
    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        if self.is_alive(handle) {
            self.slots.get(handle.slot())
        } else {
            None
        }
    }

    /// Resolves `handle` mutably, rejecting stale handles.
    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        if self.is_alive(handle) {
            self.slots.get_mut(handle.slot())
        } else {
            None
        }
    }

    /// Raw slot contents, valid or not.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&Entity> {
        self.slots.get(index)
    }

    /// Handle of the entity in slot `index`, if the slot is occupied.
    #[must_use]
    pub fn handle_at(&self, index: usize) -> Option<EntityHandle> {
        self.slots
            .get(index)
            .filter(|entity| entity.valid)
            .map(|entity| entity.handle)
    }

    /// Iterator over occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().filter(|entity| entity.valid)
    }

    /// Mutable iterator over occupied slots in index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.slots.iter_mut().filter(|entity| entity.valid)
    }

    /// Clears `out` and fills it with the handles of occupied slots in index order.
    pub fn handles_into(&self, out: &mut Vec<EntityHandle>) {
        out.clear();
        out.extend(self.iter().map(|entity| entity.handle));
    }

    /// Handles of occupied slots in index order.
    #[must_use]
    pub fn handles(&self) -> Vec<EntityHandle> {
        let mut handles = Vec::with_capacity(self.live);
        self.handles_into(&mut handles);
        handles
    }

    /// Clears `out` and fills it with copies of every valid entity matching `predicate`.
    pub fn query_into<P>(&self, predicate: P, out: &mut Vec<Entity>)
    where
        P: Fn(&Entity) -> bool,
    {
        out.clear();
        out.extend(self.iter().filter(|entity| predicate(entity)).cloned());
    }

    /// Snapshot of every valid entity carrying `property`.
    pub fn with_property_into(&self, property: Property, out: &mut Vec<Entity>) {
        self.query_into(|entity| entity.has_property(property), out);
    }

    /// Snapshot of every valid entity of `kind`.
    pub fn of_kind_into(&self, kind: EntityKind, out: &mut Vec<Entity>) {
        self.query_into(|entity| entity.kind == kind, out);
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Reports whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Total number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Releases every slot. Generations are kept so older handles stay stale.
    pub fn clear(&mut self) {
        self.slots.fill(Entity::default());
        self.live = 0;
    }
}

impl Default for EntityPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_scans_for_first_free_slot() {
        let mut pool = EntityPool::with_capacity(4);
        let first = pool.acquire();
        let second = pool.acquire();
        let third = pool.acquire();
        assert_eq!((first.index(), second.index(), third.index()), (0, 1, 2));

        assert!(pool.release(second));
        let reused = pool.acquire();
        assert_eq!(reused.index(), 1);
        assert_ne!(reused, second);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn released_slot_reads_as_zero_value() {
        let mut pool = EntityPool::with_capacity(2);
        let handle = pool.spawn(Vec2::new(5.0, 6.0), Vec2::splat(16.0));
        {
            let entity = pool.get_mut(handle).expect("live entity");
            entity.velocity = Vec2::new(1.0, 2.0);
            entity.kind = EntityKind::Worker;
            entity.trigger = true;
            entity.health = 3;
            entity.add_properties(&[Property::Collidable]);
        }

        assert!(pool.release(handle));

        assert_eq!(pool.slot(handle.slot()), Some(&Entity::default()));
        assert!(pool.get(handle).is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn stale_handle_does_not_alias_new_occupant() {
        let mut pool = EntityPool::with_capacity(1);
        let old = pool.spawn(Vec2::ZERO, Vec2::ONE);
        assert!(pool.release(old));
        let new = pool.spawn(Vec2::new(9.0, 9.0), Vec2::ONE);

        assert_eq!(old.index(), new.index());
        assert!(pool.get(old).is_none());
        assert!(!pool.release(old));
        assert_eq!(pool.get(new).map(|entity| entity.position), Some(Vec2::new(9.0, 9.0)));
    }

    #[test]
    fn try_acquire_reports_exhaustion() {
        let mut pool = EntityPool::with_capacity(2);
        let _ = pool.acquire();
        let _ = pool.acquire();

        assert_eq!(
            pool.try_acquire(),
            Err(PoolError::Exhausted { capacity: 2 })
        );
    }

    #[test]
    #[should_panic(expected = "entity pool exhausted")]
    fn acquire_panics_when_exhausted() {
        let mut pool = EntityPool::with_capacity(1);
        let _ = pool.acquire();
        let _ = pool.acquire();
    }

    #[test]
    fn query_returns_copies_in_slot_order() {
        let mut pool = EntityPool::with_capacity(8);
        let wall = pool.spawn(Vec2::new(0.0, 0.0), Vec2::splat(16.0));
        let _flower = pool.spawn(Vec2::new(32.0, 0.0), Vec2::splat(16.0));
        let floor = pool.spawn(Vec2::new(0.0, 32.0), Vec2::splat(16.0));
        for handle in [wall, floor] {
            pool.get_mut(handle)
                .expect("live entity")
                .add_properties(&[Property::Collidable]);
        }

        let mut snapshot = Vec::new();
        pool.with_property_into(Property::Collidable, &mut snapshot);
        let handles: Vec<_> = snapshot.iter().map(|entity| entity.handle).collect();
        assert_eq!(handles, vec![wall, floor]);

        snapshot[0].position = Vec2::new(100.0, 100.0);
        assert_eq!(pool.get(wall).map(|entity| entity.position), Some(Vec2::ZERO));
    }
}
