//! # Custom ECS
//!
//! A small Entity Component System plus the blackboard the
//! gameplay systems use to talk to each other.
//!
//! ## Module Overview
//!
//! - [`entity`] — Monotonic entity IDs and the ordered live set
//! - [`component`] — Type-erased per-kind storage
//! - [`query`] — Closure-based iteration with extract/restore
//! - [`world`] — Entity registry + component store
//! - [`blackboard`] — Keyed values and typed one-shot message queues
//! - [`system`] — The common system contract

pub mod blackboard;
pub(crate) mod component;
pub mod entity;
pub mod query;
pub mod system;
pub mod world;

pub use blackboard::{Blackboard, BlackboardError, Value};
pub use entity::Entity;
pub use system::System;
pub use world::World;
