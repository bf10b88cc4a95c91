//! Velocity requests, friction, and the play-field clamp.
//!
//! Per frame:
//!
//! 1. Drain [`MovementRequest`]s. Each overwrites its target's `Velocity`;
//!    when one entity has several pending, the last one wins.
//! 2. For every non-bullet entity with `Position` and `Velocity`:
//!    - multiply velocity by [`FRICTION`], snapping components below
//!      [`VELOCITY_EPSILON`] to zero;
//!    - integrate `position += velocity * dt` unless a physics body owns the
//!      entity's position;
//!    - clamp controllable entities to `[0, W - w] × [0, H - h]` and zero the
//!      velocity component that points out of the field.
//!
//! Bullets are left alone: the shooting system owns them.

use crate::components::{Bullet, Input, PhysicsBody, Position, Renderable, Velocity};
use crate::context::Context;
use crate::ecs::system::short_type_name;
use crate::ecs::{Entity, System, World};
use crate::messages::MovementRequest;

/// Per-frame velocity multiplier.
pub const FRICTION: f32 = 0.95;
/// Velocity components smaller than this snap to zero.
pub const VELOCITY_EPSILON: f32 = 0.1;

#[derive(Debug, Default)]
pub struct MovementSystem;

impl MovementSystem {
    pub fn new() -> Self {
        Self
    }

    fn apply_requests(ctx: &mut Context) {
        for request in ctx.blackboard.drain::<MovementRequest>() {
            match ctx.world.get_mut::<Velocity>(request.entity) {
                Some(velocity) => {
                    velocity.x = request.x;
                    velocity.y = request.y;
                }
                None => log::debug!("Movement request for {:?} without Velocity", request.entity),
            }
        }
    }
}

fn damp(v: f32) -> f32 {
    let v = v * FRICTION;
    if v.abs() < VELOCITY_EPSILON { 0.0 } else { v }
}

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    fn entities(&self, world: &World) -> Vec<Entity> {
        world
            .entities_with::<Velocity>()
            .into_iter()
            .filter(|&e| world.has::<Position>(e) && !world.has::<Bullet>(e))
            .collect()
    }

    fn update(&mut self, ctx: &mut Context) {
        Self::apply_requests(ctx);

        let dt = ctx.dt();
        let field_w = ctx.config.field_width();
        let field_h = ctx.config.field_height();
        let footprint = ctx.config.default_footprint;

        for entity in self.entities(&ctx.world) {
            let world = &mut ctx.world;
            let (Some(mut pos), Some(mut vel)) = (
                world.get::<Position>(entity).copied(),
                world.get::<Velocity>(entity).copied(),
            ) else {
                continue;
            };

            vel.x = damp(vel.x);
            vel.y = damp(vel.y);

            if !world.has::<PhysicsBody>(entity) {
                pos.x += vel.x * dt;
                pos.y += vel.y * dt;
            }

            if world.get::<Input>(entity).is_some_and(|i| i.controllable) {
                let (w, h) = world
                    .get::<Renderable>(entity)
                    .map_or((footprint, footprint), |r| (r.width, r.height));
                let max_x = (field_w - w).max(0.0);
                let max_y = (field_h - h).max(0.0);

                if pos.x <= 0.0 {
                    pos.x = 0.0;
                    vel.x = vel.x.max(0.0);
                } else if pos.x >= max_x {
                    pos.x = max_x;
                    vel.x = vel.x.min(0.0);
                }
                if pos.y <= 0.0 {
                    pos.y = 0.0;
                    vel.y = vel.y.max(0.0);
                } else if pos.y >= max_y {
                    pos.y = max_y;
                    vel.y = vel.y.min(0.0);
                }
            }

            world.insert(entity, pos);
            world.insert(entity, vel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::config::GameConfig;
    use std::time::Duration;

    fn ctx() -> Context {
        let mut ctx = Context::new(GameConfig::default());
        ctx.time.advance(Duration::from_millis(20));
        ctx
    }

    fn player(ctx: &mut Context, x: f32, y: f32) -> Entity {
        ctx.world.spawn((
            Input { controllable: true },
            Position { x, y },
            Velocity::default(),
            Renderable::new(Color::BLUE, 32.0, 32.0),
        ))
    }

    #[test]
    fn request_sets_velocity_then_friction_applies() {
        let mut ctx = ctx();
        let e = player(&mut ctx, 100.0, 100.0);
        ctx.blackboard.post(MovementRequest { entity: e, x: 200.0, y: 0.0 });

        MovementSystem::new().update(&mut ctx);

        let vel = *ctx.world.get::<Velocity>(e).unwrap();
        assert!((vel.x - 190.0).abs() < 1e-4);
        let pos = ctx.world.get::<Position>(e).unwrap();
        assert!((pos.x - (100.0 + 190.0 * 0.02)).abs() < 1e-3);
        assert_eq!(ctx.blackboard.pending::<MovementRequest>(), 0);
    }

    #[test]
    fn last_request_per_entity_wins() {
        let mut ctx = ctx();
        let e = player(&mut ctx, 100.0, 100.0);
        ctx.blackboard.post(MovementRequest { entity: e, x: 200.0, y: 0.0 });
        ctx.blackboard.post(MovementRequest { entity: e, x: 0.0, y: -200.0 });

        MovementSystem::new().update(&mut ctx);

        let vel = *ctx.world.get::<Velocity>(e).unwrap();
        assert_eq!(vel.x, 0.0);
        assert!((vel.y + 190.0).abs() < 1e-4);
    }

    #[test]
    fn small_velocities_snap_to_zero() {
        let mut ctx = ctx();
        let e = ctx.world.spawn((Position::default(), Velocity { x: 0.1, y: -0.05 }));
        MovementSystem::new().update(&mut ctx);
        assert_eq!(*ctx.world.get::<Velocity>(e).unwrap(), Velocity::default());
    }

    #[test]
    fn clamp_keeps_player_in_field() {
        let mut ctx = ctx();
        let e = player(&mut ctx, -5.0, 300.0);
        ctx.world.insert(e, Velocity { x: -50.0, y: 0.0 });
        let mut movement = MovementSystem::new();

        for _ in 0..10 {
            movement.update(&mut ctx);
            let pos = *ctx.world.get::<Position>(e).unwrap();
            assert!((0.0..=768.0).contains(&pos.x), "x = {}", pos.x);
            assert!((0.0..=568.0).contains(&pos.y), "y = {}", pos.y);
        }
        assert_eq!(ctx.world.get::<Position>(e).unwrap().x, 0.0);
        assert_eq!(ctx.world.get::<Velocity>(e).unwrap().x, 0.0);
    }

    #[test]
    fn clamp_far_edge_uses_footprint() {
        let mut ctx = ctx();
        let e = player(&mut ctx, 790.0, 590.0);
        ctx.world.insert(e, Velocity { x: 100.0, y: 100.0 });

        MovementSystem::new().update(&mut ctx);

        assert_eq!(*ctx.world.get::<Position>(e).unwrap(), Position { x: 768.0, y: 568.0 });
        assert_eq!(*ctx.world.get::<Velocity>(e).unwrap(), Velocity::default());
    }

    #[test]
    fn uncontrollable_entities_are_not_clamped() {
        let mut ctx = ctx();
        let e = ctx.world.spawn((Position { x: -20.0, y: 0.0 }, Velocity::default()));
        MovementSystem::new().update(&mut ctx);
        assert_eq!(ctx.world.get::<Position>(e).unwrap().x, -20.0);
    }

    #[test]
    fn bullets_and_physics_bodies_are_not_integrated() {
        let mut ctx = ctx();
        let bullet = ctx.world.spawn((
            Position::default(),
            Velocity { x: 400.0, y: 0.0 },
            Bullet::default(),
        ));
        let body = ctx.world.spawn((
            Position::default(),
            Velocity { x: 100.0, y: 0.0 },
            PhysicsBody,
        ));

        MovementSystem::new().update(&mut ctx);

        assert_eq!(*ctx.world.get::<Velocity>(bullet).unwrap(), Velocity { x: 400.0, y: 0.0 });
        assert_eq!(ctx.world.get::<Position>(bullet).unwrap().x, 0.0);
        assert_eq!(ctx.world.get::<Position>(body).unwrap().x, 0.0);
        assert!((ctx.world.get::<Velocity>(body).unwrap().x - 95.0).abs() < 1e-4);
    }

    #[test]
    fn missing_components_are_skipped() {
        let mut ctx = ctx();
        let lonely = ctx.world.spawn((Position::default(),));
        ctx.blackboard.post(MovementRequest { entity: lonely, x: 1.0, y: 1.0 });
        ctx.blackboard.post(MovementRequest { entity: Entity::NONE, x: 1.0, y: 1.0 });

        MovementSystem::new().update(&mut ctx);

        assert!(ctx.world.get::<Velocity>(lonely).is_none());
    }
}
