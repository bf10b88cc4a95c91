//! # Query — Iterating Over Entities by Component Kind
//!
//! ```text
//! world.query::<(&Position, &mut Velocity)>(|entity, (pos, vel)| {
//!     // use pos and vel
//! });
//!
//! 1. Extract the Position and Velocity storages out of the world's map
//! 2. Walk the live entities in creation order
//!    - fetch from every extracted storage; skip the entity if any misses
//! 3. Restore the storages
//! ```
//!
//! ## Extract / Restore
//!
//! Handing out `&Position` and `&mut Velocity` at the same time would need two
//! borrows of the same `HashMap`. Instead each storage is temporarily *removed*
//! from the map, giving the query owned access to every storage it needs. The
//! borrow checker can then see that independent storages don't alias. If any
//! storage is missing (no entity ever had that kind) the query matches
//! nothing and whatever was already extracted goes back untouched.
//!
//! The closure receives the items, never the world, so a query can't spawn or
//! despawn mid-iteration. Systems collect entity ids first and mutate after.

use std::any::TypeId;
use std::collections::HashMap;

use super::component::{AnyStorage, downcast_mut, downcast_ref, storage_id};
use super::entity::Entity;

pub(crate) type StorageMap = HashMap<TypeId, Box<dyn AnyStorage>>;

/// Something a query can fetch per entity.
///
/// Implemented for `&T` (shared read) and `&mut T` (exclusive write), and for
/// tuples of those, so `(&A, &mut B, &C)` just works.
pub trait QueryParam {
    /// The item yielded per entity.
    type Item<'w>;

    /// Owned storage(s) pulled out of the world for the query's duration.
    #[doc(hidden)]
    type Column;

    /// The component kinds this parameter touches.
    fn type_ids() -> Vec<TypeId>;

    #[doc(hidden)]
    fn extract(storages: &mut StorageMap) -> Option<Self::Column>;

    #[doc(hidden)]
    fn restore(col: Self::Column, storages: &mut StorageMap);

    /// Fetch the item for `entity`, or `None` if it lacks the component.
    #[doc(hidden)]
    fn fetch(col: &mut Self::Column, entity: Entity) -> Option<Self::Item<'_>>;
}

impl<T: 'static> QueryParam for &T {
    type Item<'w> = &'w T;
    type Column = (TypeId, Box<dyn AnyStorage>);

    fn type_ids() -> Vec<TypeId> {
        vec![storage_id::<T>()]
    }

    fn extract(storages: &mut StorageMap) -> Option<Self::Column> {
        let tid = storage_id::<T>();
        storages.remove(&tid).map(|storage| (tid, storage))
    }

    fn restore(col: Self::Column, storages: &mut StorageMap) {
        storages.insert(col.0, col.1);
    }

    fn fetch(col: &mut Self::Column, entity: Entity) -> Option<Self::Item<'_>> {
        downcast_ref::<T>(col.1.as_ref()).get(entity)
    }
}

impl<T: 'static> QueryParam for &mut T {
    type Item<'w> = &'w mut T;
    type Column = (TypeId, Box<dyn AnyStorage>);

    fn type_ids() -> Vec<TypeId> {
        vec![storage_id::<T>()]
    }

    fn extract(storages: &mut StorageMap) -> Option<Self::Column> {
        let tid = storage_id::<T>();
        storages.remove(&tid).map(|storage| (tid, storage))
    }

    fn restore(col: Self::Column, storages: &mut StorageMap) {
        storages.insert(col.0, col.1);
    }

    fn fetch(col: &mut Self::Column, entity: Entity) -> Option<Self::Item<'_>> {
        downcast_mut::<T>(col.1.as_mut()).get_mut(entity)
    }
}

macro_rules! impl_query_param_tuple {
    ($($P:ident),+) => {
        impl<$($P: QueryParam),+> QueryParam for ($($P,)+) {
            type Item<'w> = ($($P::Item<'w>,)+);
            type Column = ($($P::Column,)+);

            fn type_ids() -> Vec<TypeId> {
                let mut ids = Vec::new();
                $(ids.extend($P::type_ids());)+
                ids
            }

            #[allow(non_snake_case)]
            fn extract(storages: &mut StorageMap) -> Option<Self::Column> {
                $(let $P = $P::extract(storages);)+
                match ($($P,)+) {
                    ($(Some($P),)+) => Some(($($P,)+)),
                    ($($P,)+) => {
                        $(if let Some(col) = $P {
                            $P::restore(col, storages);
                        })+
                        None
                    }
                }
            }

            #[allow(non_snake_case)]
            fn restore(col: Self::Column, storages: &mut StorageMap) {
                let ($($P,)+) = col;
                $($P::restore($P, storages);)+
            }

            #[allow(non_snake_case)]
            fn fetch(col: &mut Self::Column, entity: Entity) -> Option<Self::Item<'_>> {
                let ($($P,)+) = col;
                Some(($($P::fetch($P, entity)?,)+))
            }
        }
    };
}

impl_query_param_tuple!(A);
impl_query_param_tuple!(A, B);
impl_query_param_tuple!(A, B, C);
impl_query_param_tuple!(A, B, C, D);
impl_query_param_tuple!(A, B, C, D, E);
impl_query_param_tuple!(A, B, C, D, E, F);
