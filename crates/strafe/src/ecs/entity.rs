//! # Entity — Opaque Handles and the Live Set
//!
//! An [`Entity`] is just a number. It owns no data; the
//! [`World`](super::world::World) maps entities to their components.
//!
//! ## Design: Monotonic IDs, Never Reused
//!
//! Generational indices exist to make recycled slots safe. A shooter that
//! spawns a few bullets per second will never exhaust a `u32`, so this
//! registry skips recycling entirely: every id is issued once and only once
//! for the lifetime of the process.
//!
//! ```text
//! allocate() → Entity(1)
//! allocate() → Entity(2)
//! deallocate(Entity(1))
//! allocate() → Entity(3)      ← never Entity(1) again
//! ```
//!
//! A stale handle therefore can't alias a newer entity. Lookups on it simply
//! miss. Id `0` is reserved as [`Entity::NONE`].
//!
//! ## Ordering
//!
//! The live set keeps insertion order so that iteration (queries, rendering,
//! [`EntityAllocator::alive`]) is stable from frame to frame. Removal is a
//! linear scan of the ordered list. Entity counts here stay in the hundreds.

use std::collections::HashSet;
use std::fmt;

/// A lightweight handle to an entity in the [`World`](super::world::World).
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(pub(crate) u32);

impl Entity {
    /// The reserved "no entity" handle. Never issued by the allocator.
    pub const NONE: Entity = Entity(0);

    /// Returns the raw id. Useful for diagnostics and logging.
    pub fn id(self) -> u32 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues entity ids and owns the ordered live set.
pub(crate) struct EntityAllocator {
    /// Next id to hand out. Starts at 1.
    next: u32,
    /// Live entities in creation order.
    order: Vec<Entity>,
    /// Membership index over `order`.
    alive: HashSet<Entity>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            next: 1,
            order: Vec::new(),
            alive: HashSet::new(),
        }
    }

    /// Allocate a fresh [`Entity`] and register it as live.
    pub fn allocate(&mut self) -> Entity {
        let entity = Entity(self.next);
        self.next += 1;
        self.order.push(entity);
        self.alive.insert(entity);
        entity
    }

    /// Remove an entity from the live set. Returns `false` if it was already
    /// dead or never issued.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.alive.remove(&entity) {
            return false;
        }
        if let Some(pos) = self.order.iter().position(|&e| e == entity) {
            self.order.remove(pos);
        }
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    pub fn alive_count(&self) -> usize {
        self.order.len()
    }

    /// Live entities in creation order.
    pub fn alive(&self) -> &[Entity] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_id_is_one() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.allocate();
        assert_eq!(e.id(), 1);
        assert!(!e.is_none());
        assert!(Entity::default().is_none());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut alloc = EntityAllocator::new();
        let e1 = alloc.allocate();
        let e2 = alloc.allocate();
        assert!(alloc.deallocate(e1));
        let e3 = alloc.allocate();
        assert_ne!(e3, e1);
        assert_ne!(e3, e2);
        assert_eq!(e3.id(), 3);
        assert!(!alloc.is_alive(e1));
    }

    #[test]
    fn deallocate_is_idempotent() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.allocate();
        assert!(alloc.deallocate(e));
        assert!(!alloc.deallocate(e));
        assert!(!alloc.deallocate(Entity(42)));
        assert_eq!(alloc.alive_count(), 0);
    }

    #[test]
    fn alive_preserves_creation_order() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        let c = alloc.allocate();
        alloc.deallocate(b);
        let d = alloc.allocate();
        assert_eq!(alloc.alive(), &[a, c, d]);
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Entity(7)), "Entity(7)");
        assert_eq!(format!("{}", Entity(7)), "7");
    }
}
