//! # World — Entity Registry and Component Store
//!
//! The [`World`] owns every entity and every component instance. Systems never
//! keep component references across frames; they borrow through the world and
//! the borrow ends before the next mutation.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │ World                                               │
//! │                                                     │
//! │  EntityAllocator: monotonic ids + ordered live set  │
//! │                                                     │
//! │  storages: HashMap<TypeId, Box<dyn AnyStorage>>     │
//! │    one ComponentStorage<T> per component kind       │
//! │                                                     │
//! │  names: HashMap<String, Entity>                     │
//! │    optional unique names from the definition file   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//!
//! [`World::despawn`] is immediate: the entity leaves the live set and is
//! purged from every storage and the name table in the same call. Calling it
//! again, or on an id that was never issued, is a no-op.
//!
//! ## Absence Is Not an Error
//!
//! [`World::get`] returns `None` for a dead entity or a missing kind. Systems
//! treat that as "this entity doesn't take part this frame" and move on.

use std::collections::HashMap;

use super::component::{AnyStorage, ComponentStorage, downcast_mut, downcast_ref, storage_id};
use super::entity::{Entity, EntityAllocator};
use super::query::{QueryParam, StorageMap};

/// The central container for all game state.
pub struct World {
    allocator: EntityAllocator,
    /// One storage per component kind, keyed by TypeId.
    storages: StorageMap,
    /// Named entity lookup: name → entity.
    names: HashMap<String, Entity>,
    /// Reverse lookup: entity → name.
    names_reverse: HashMap<Entity, String>,
}

impl World {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            storages: HashMap::new(),
            names: HashMap::new(),
            names_reverse: HashMap::new(),
        }
    }

    // ── Named Entities ─────────────────────────────────────────────

    /// Look up an entity by name. Returns `None` if no live entity has it.
    pub fn named(&self, name: &str) -> Option<Entity> {
        self.names.get(name).copied()
    }

    /// The name assigned to `entity`, if any.
    pub fn name_of(&self, entity: Entity) -> Option<&str> {
        self.names_reverse.get(&entity).map(String::as_str)
    }

    /// Assign a unique name to a live entity.
    ///
    /// Returns `false` (and changes nothing) if the entity is dead or the name
    /// is already taken.
    pub fn name_entity(&mut self, entity: Entity, name: &str) -> bool {
        if !self.is_alive(entity) || self.names.contains_key(name) {
            return false;
        }
        if let Some(old) = self.names_reverse.insert(entity, name.to_string()) {
            self.names.remove(&old);
        }
        self.names.insert(name.to_string(), entity);
        true
    }

    // ── Entity Management ────────────────────────────────────────────

    /// Returns the number of live entities.
    pub fn entity_count(&self) -> usize {
        self.allocator.alive_count()
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Snapshot of the live entities in creation order.
    pub fn all_entities(&self) -> Vec<Entity> {
        self.allocator.alive().to_vec()
    }

    /// Live entities that have a component of kind `T`, in creation order.
    pub fn entities_with<T: 'static>(&self) -> Vec<Entity> {
        let Some(storage) = self.storages.get(&storage_id::<T>()) else {
            return Vec::new();
        };
        self.allocator
            .alive()
            .iter()
            .copied()
            .filter(|&e| storage.contains(e))
            .collect()
    }

    // ── Spawn / Despawn ──────────────────────────────────────────────

    /// Create an entity with no components.
    pub fn spawn_empty(&mut self) -> Entity {
        self.allocator.allocate()
    }

    /// Create an entity with a bundle of components (tuple).
    ///
    /// ```ignore
    /// let e = world.spawn((Position { x: 0.0, y: 0.0 }, Velocity::default()));
    /// ```
    pub fn spawn<B: SpawnBundle>(&mut self, bundle: B) -> Entity {
        let entity = self.spawn_empty();
        bundle.insert_into(self, entity);
        entity
    }

    /// Destroy an entity and purge every component it owns.
    ///
    /// Returns `false` if the entity was already dead or never existed.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.allocator.deallocate(entity) {
            return false;
        }
        self.remove_components_of(entity);
        if let Some(name) = self.names_reverse.remove(&entity) {
            self.names.remove(&name);
        }
        true
    }

    /// Drop every component of every kind that `entity` owns.
    pub fn remove_components_of(&mut self, entity: Entity) {
        for storage in self.storages.values_mut() {
            storage.remove_entity(entity);
        }
    }

    // ── Per-Entity Component Access ──────────────────────────────────

    /// Get a shared reference to a component. `None` if the entity is dead or
    /// doesn't have one.
    pub fn get<T: 'static>(&self, entity: Entity) -> Option<&T> {
        let storage = self.storages.get(&storage_id::<T>())?;
        downcast_ref::<T>(storage.as_ref()).get(entity)
    }

    /// Get a mutable reference to a component.
    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> Option<&mut T> {
        let storage = self.storages.get_mut(&storage_id::<T>())?;
        downcast_mut::<T>(storage.as_mut()).get_mut(entity)
    }

    pub fn has<T: 'static>(&self, entity: Entity) -> bool {
        self.storages
            .get(&storage_id::<T>())
            .is_some_and(|s| s.contains(entity))
    }

    // ── Component Add/Remove ─────────────────────────────────────────

    /// Add a component to a live entity, replacing any existing one of the
    /// same kind. Inserting onto a dead entity is ignored and returns `false`.
    pub fn insert<T: 'static>(&mut self, entity: Entity, component: T) -> bool {
        if !self.is_alive(entity) {
            log::trace!(
                "Ignoring insert of `{}` on dead entity {:?}",
                std::any::type_name::<T>(),
                entity
            );
            return false;
        }
        let storage = self
            .storages
            .entry(storage_id::<T>())
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()));
        downcast_mut::<T>(storage.as_mut()).insert(entity, component);
        true
    }

    /// Remove and return one component of kind `T`.
    pub fn remove<T: 'static>(&mut self, entity: Entity) -> Option<T> {
        let storage = self.storages.get_mut(&storage_id::<T>())?;
        downcast_mut::<T>(storage.as_mut()).take(entity)
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Visit every live entity that has all the requested component kinds, in
    /// creation order.
    ///
    /// ```
    /// use strafe::components::{Position, Velocity};
    /// use strafe::ecs::World;
    ///
    /// let mut world = World::new();
    /// let e = world.spawn((Position { x: 0.0, y: 0.0 }, Velocity { x: 2.0, y: 1.0 }));
    /// world.query::<(&mut Position, &Velocity)>(|_, (pos, vel)| {
    ///     pos.x += vel.x;
    ///     pos.y += vel.y;
    /// });
    /// assert_eq!(world.get::<Position>(e), Some(&Position { x: 2.0, y: 1.0 }));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the same kind is requested twice, e.g. `(&A, &mut A)`.
    pub fn query<Q: QueryParam>(&mut self, mut f: impl FnMut(Entity, Q::Item<'_>)) {
        let ids = Q::type_ids();
        for (i, id) in ids.iter().enumerate() {
            if ids[..i].contains(id) {
                panic!(
                    "Query `{}` requests the same component kind more than once",
                    std::any::type_name::<Q>()
                );
            }
        }

        let Some(mut cols) = Q::extract(&mut self.storages) else {
            return;
        };
        for &entity in self.allocator.alive() {
            if let Some(item) = Q::fetch(&mut cols, entity) {
                f(entity, item);
            }
        }
        Q::restore(cols, &mut self.storages);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

// ── Spawn Trait (tuple support) ──────────────────────────────────────────

/// Component bundles that can be spawned into the world in one call.
///
/// Implemented for tuples of up to eight components.
pub trait SpawnBundle {
    fn insert_into(self, world: &mut World, entity: Entity);
}

macro_rules! impl_spawn_bundle {
    ($($T:ident),+) => {
        impl<$($T: 'static),+> SpawnBundle for ($($T,)+) {
            #[allow(non_snake_case)]
            fn insert_into(self, world: &mut World, entity: Entity) {
                let ($($T,)+) = self;
                $(world.insert(entity, $T);)+
            }
        }
    };
}

impl_spawn_bundle!(A);
impl_spawn_bundle!(A, B);
impl_spawn_bundle!(A, B, C);
impl_spawn_bundle!(A, B, C, D);
impl_spawn_bundle!(A, B, C, D, E);
impl_spawn_bundle!(A, B, C, D, E, F);
impl_spawn_bundle!(A, B, C, D, E, F, G);
impl_spawn_bundle!(A, B, C, D, E, F, G, H);
