//! Common imports.
//!
//! ```ignore
//! use strafe::prelude::*;
//! ```

pub use crate::color::Color;
pub use crate::components::{
    Bullet, Direction, Input, PhysicsBody, Position, Renderable, Shooter, Velocity,
};
pub use crate::config::GameConfig;
pub use crate::context::Context;
pub use crate::driver::{ControlFlow, Driver};
pub use crate::ecs::{Blackboard, BlackboardError, Entity, System, Value, World};
pub use crate::error::{GameError, Result};
pub use crate::game::Game;
pub use crate::input::{ElementState, KeyCode};
pub use crate::messages::{
    CollisionEvent, CollisionKind, ImpulseRequest, MovementRequest, NewBodyRequest, ShootRequest,
};
pub use crate::time::Time;
