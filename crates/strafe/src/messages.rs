//! One-shot messages exchanged through the [`Blackboard`](crate::ecs::Blackboard).
//!
//! Each type has exactly one producer side and one consumer that drains it:
//!
//! ```text
//! MovementRequest  Input     ──► Movement
//! ShootRequest     Input     ──► Shooting
//! NewBodyRequest   Shooting,
//!                  Map       ──► Physics
//! ImpulseRequest   Map       ──► Physics
//! CollisionEvent   Physics   ──► Map
//! ```

use crate::ecs::Entity;

/// Overwrite the target's velocity with `(x, y)` px/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementRequest {
    pub entity: Entity,
    pub x: f32,
    pub y: f32,
}

/// Fire from `entity`, stamped with game time in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShootRequest {
    pub entity: Entity,
    pub time: f32,
}

/// Give `entity` a rigid body matching its components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewBodyRequest {
    pub entity: Entity,
}

/// Add `(x, y)` px/s to the target's velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseRequest {
    pub entity: Entity,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// `a` = bullet (already despawned), `b` = obstacle.
    BulletObstacle,
    /// `a` = player, `b` = obstacle.
    PlayerObstacle,
    /// `a` = obstacle, `b` = [`Entity::NONE`].
    Boundary,
}

/// Posted by the physics system after discrete collision resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub kind: CollisionKind,
    pub a: Entity,
    pub b: Entity,
}
