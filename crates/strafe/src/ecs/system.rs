//! # System — Per-Frame Logic Over the World
//!
//! Every gameplay system implements [`System`]: a name for logs, the list of
//! entities it currently cares about, and an `update` that receives the whole
//! [`Context`] (world, blackboard, time, config).
//!
//! ## No Registration Order
//!
//! There is no `Schedule` that runs systems in the order they
//! were added. The [`Driver`](crate::driver::Driver) names each system as a
//! field and calls them in a fixed sequence written out in one function, so
//! the data dependencies between them (input → movement → shooting →
//! physics → map → hud) are visible in a single place.
//!
//! ## Entities of Interest
//!
//! Systems don't keep private entity lists that could drift out of sync with
//! the world. [`System::entities`] derives the set from component
//! signatures at call time, so a bullet despawned by the physics system is
//! simply absent the next time the shooting system looks.

use super::entity::Entity;
use super::world::World;
use crate::context::Context;

/// Common contract for every gameplay system.
pub trait System {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Entities this system would act on right now, in creation order.
    fn entities(&self, world: &World) -> Vec<Entity>;

    /// Advance one frame. `ctx.time.delta_secs()` is this frame's dt.
    fn update(&mut self, ctx: &mut Context);
}

/// Strip the module path from a type name (`strafe::systems::MovementSystem`
/// → `MovementSystem`).
pub(crate) fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}
