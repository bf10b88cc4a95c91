//! # Component — Per-Kind Sparse Storage
//!
//! Components are plain data: a `Position`, a `Velocity`, a `Shooter`. The
//! [`World`](super::world::World) keeps one [`ComponentStorage<T>`] per
//! component kind, and each storage maps an [`Entity`] to at most one `T`.
//!
//! ```text
//! storages: HashMap<TypeId, Box<dyn AnyStorage>>
//!   TypeId(Position) ──► ComponentStorage<Position> { 1 → (10,20), 4 → (0,0) }
//!   TypeId(Velocity) ──► ComponentStorage<Velocity> { 1 → (0,0) }
//!   TypeId(Bullet)   ──► ComponentStorage<Bullet>   { 4 → .. }
//! ```
//!
//! ## Why Not Archetypes?
//!
//! Bullets are created and destroyed every few frames, and entities gain
//! components one at a time while the entity definition file is loaded. A
//! sparse map per kind makes insert and removal O(1) with no table moves.
//! Iteration order comes from the entity list, not from the map.
//!
//! ## Type Erasure
//!
//! The world needs to purge an entity from *every* storage without knowing the
//! concrete types. [`AnyStorage`] exposes just that, plus `Any` access so the
//! typed API can downcast back. A failed downcast means a storage was filed
//! under the wrong `TypeId`, which is a framework bug, so it panics.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::entity::Entity;

/// Type-erased view over a [`ComponentStorage<T>`].
///
/// Named in the column type of [`QueryParam`](super::query::QueryParam).
#[doc(hidden)]
pub trait AnyStorage {
    /// Drop this entity's component, if any.
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn contains(&self, entity: Entity) -> bool;
    fn len(&self) -> usize;
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// All components of one kind, keyed by owning entity.
pub(crate) struct ComponentStorage<T> {
    data: HashMap<Entity, T>,
}

impl<T: 'static> ComponentStorage<T> {
    pub fn new() -> Self {
        Self { data: HashMap::new() }
    }

    /// Insert or overwrite. Returns the previous value when one existed.
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        self.data.insert(entity, value)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.data.get(&entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.data.get_mut(&entity)
    }

    pub fn take(&mut self, entity: Entity) -> Option<T> {
        self.data.remove(&entity)
    }
}

impl<T: 'static> AnyStorage for ComponentStorage<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.data.remove(&entity).is_some()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.data.contains_key(&entity)
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Returns the `TypeId` a storage for `T` is filed under.
pub(crate) fn storage_id<T: 'static>() -> TypeId {
    TypeId::of::<T>()
}

/// Downcast a boxed storage to its concrete kind.
///
/// # Panics
///
/// Panics if the storage holds a different kind.
pub(crate) fn downcast_ref<T: 'static>(storage: &dyn AnyStorage) -> &ComponentStorage<T> {
    let found = storage.type_name();
    storage
        .as_any()
        .downcast_ref::<ComponentStorage<T>>()
        .unwrap_or_else(|| {
            panic!(
                "Component type mismatch: expected `{}`, storage holds `{}`",
                std::any::type_name::<T>(),
                found
            )
        })
}

/// Mutable variant of [`downcast_ref`].
///
/// # Panics
///
/// Panics if the storage holds a different kind.
pub(crate) fn downcast_mut<T: 'static>(storage: &mut dyn AnyStorage) -> &mut ComponentStorage<T> {
    let found = storage.type_name();
    storage
        .as_any_mut()
        .downcast_mut::<ComponentStorage<T>>()
        .unwrap_or_else(|| {
            panic!(
                "Component type mismatch: expected `{}`, storage holds `{}`",
                std::any::type_name::<T>(),
                found
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(u32);

    #[test]
    fn insert_overwrites() {
        let mut storage = ComponentStorage::new();
        assert!(storage.insert(Entity(1), Health(10)).is_none());
        assert_eq!(storage.insert(Entity(1), Health(20)), Some(Health(10)));
        assert_eq!(storage.get(Entity(1)), Some(&Health(20)));
        assert_eq!(AnyStorage::len(&storage), 1);
    }

    #[test]
    fn erased_removal() {
        let mut storage: Box<dyn AnyStorage> = Box::new(ComponentStorage::<Health>::new());
        downcast_mut::<Health>(storage.as_mut()).insert(Entity(3), Health(1));
        assert!(storage.contains(Entity(3)));
        assert!(storage.remove_entity(Entity(3)));
        assert!(!storage.remove_entity(Entity(3)));
        assert!(downcast_ref::<Health>(storage.as_ref()).get(Entity(3)).is_none());
    }

    #[test]
    #[should_panic(expected = "Component type mismatch")]
    fn wrong_kind_panics() {
        let storage: Box<dyn AnyStorage> = Box::new(ComponentStorage::<Health>::new());
        let _ = downcast_ref::<u8>(storage.as_ref());
    }
}
