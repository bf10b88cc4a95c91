//! Shoot requests, bullet flight, and bullet reaping.
//!
//! ```text
//! drain ShootRequest ─► gate (components, canShoot, fire rate) ─► spawn bullet
//!                                                                  │
//! advance every bullet (position += v·dt, timeAlive += dt)  ◄──────┘
//!        │
//!        ├─► despawn bullets outside the field plus margin
//!        └─► despawn bullets with timeAlive ≥ lifetime
//! ```
//!
//! A bullet is advanced in the frame it is spawned. Removals are collected
//! first and applied after iteration.

use crate::color::Color;
use crate::components::{Bullet, Direction, Position, Renderable, Shooter, Velocity};
use crate::context::Context;
use crate::ecs::system::short_type_name;
use crate::ecs::{Entity, System, World};
use crate::messages::{NewBodyRequest, ShootRequest};

/// Muzzle speed in px/s.
pub const BULLET_SPEED: f32 = 400.0;
/// Seconds a bullet lives.
pub const BULLET_LIFETIME: f32 = 3.0;
/// Spawn offset from the shooter's top-left corner to its centre.
pub const MUZZLE_OFFSET: f32 = 16.0;
pub const BULLET_SIZE: f32 = 4.0;
/// Bullets may travel this far past the field edge before they are reaped.
pub const OUT_OF_BOUNDS_MARGIN: f32 = 10.0;

#[derive(Debug, Default)]
pub struct ShootingSystem {
    fired: u64,
}

impl ShootingSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bullets spawned since creation.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Try to fire from `request.entity`. Returns the bullet on success.
    fn handle_shoot(&mut self, ctx: &mut Context, request: ShootRequest) -> Option<Entity> {
        let world = &mut ctx.world;
        let shooter = request.entity;
        let (Some(pos), Some(dir), Some(weapon)) = (
            world.get::<Position>(shooter).copied(),
            world.get::<Direction>(shooter).copied(),
            world.get::<Shooter>(shooter).copied(),
        ) else {
            log::debug!("{:?} cannot shoot: missing Position, Direction or Shooter", shooter);
            return None;
        };

        if !weapon.can_shoot {
            log::trace!("{:?} has shooting disabled", shooter);
            return None;
        }
        if request.time - weapon.last_shot_time < 1.0 / weapon.fire_rate {
            log::trace!("{:?} shot rejected by fire rate", shooter);
            return None;
        }

        let aim = dir.unit() * BULLET_SPEED;
        let bullet = world.spawn((
            Position {
                x: pos.x + MUZZLE_OFFSET,
                y: pos.y + MUZZLE_OFFSET,
            },
            Velocity { x: aim.x, y: aim.y },
            Bullet {
                speed: BULLET_SPEED,
                lifetime: BULLET_LIFETIME,
                time_alive: 0.0,
            },
            Renderable::new(Color::YELLOW, BULLET_SIZE, BULLET_SIZE),
        ));
        if let Some(weapon) = world.get_mut::<Shooter>(shooter) {
            weapon.last_shot_time = request.time;
        }
        ctx.blackboard.post(NewBodyRequest { entity: bullet });
        self.fired += 1;
        log::debug!("{:?} fired {:?} at {:.1}°", shooter, bullet, dir.angle);
        Some(bullet)
    }
}

impl System for ShootingSystem {
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Live bullets.
    fn entities(&self, world: &World) -> Vec<Entity> {
        world.entities_with::<Bullet>()
    }

    fn update(&mut self, ctx: &mut Context) {
        for request in ctx.blackboard.drain::<ShootRequest>() {
            self.handle_shoot(ctx, request);
        }

        let dt = ctx.dt();
        let min_x = -OUT_OF_BOUNDS_MARGIN;
        let min_y = -OUT_OF_BOUNDS_MARGIN;
        let max_x = ctx.config.field_width() + OUT_OF_BOUNDS_MARGIN;
        let max_y = ctx.config.field_height() + OUT_OF_BOUNDS_MARGIN;

        let mut out_of_bounds = Vec::new();
        let mut expired = Vec::new();
        ctx.world
            .query::<(&mut Position, &Velocity, &mut Bullet)>(|entity, (pos, vel, bullet)| {
                pos.x += vel.x * dt;
                pos.y += vel.y * dt;
                bullet.time_alive += dt;

                if pos.x < min_x || pos.x > max_x || pos.y < min_y || pos.y > max_y {
                    out_of_bounds.push(entity);
                } else if bullet.time_alive >= bullet.lifetime {
                    expired.push(entity);
                }
            });

        for entity in out_of_bounds.into_iter().chain(expired) {
            ctx.world.despawn(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use std::time::Duration;

    fn shooter(ctx: &mut Context, fire_rate: f32) -> Entity {
        ctx.world.spawn((
            Position { x: 100.0, y: 100.0 },
            Direction { angle: 0.0 },
            Shooter {
                fire_rate,
                last_shot_time: 0.0,
                can_shoot: true,
            },
        ))
    }

    fn step(system: &mut ShootingSystem, ctx: &mut Context, secs: f32) {
        ctx.time.advance(Duration::from_secs_f32(secs));
        system.update(ctx);
    }

    fn bullet_at(ctx: &mut Context, x: f32, y: f32) -> Entity {
        ctx.world.spawn((Position { x, y }, Velocity::default(), Bullet::default()))
    }

    #[test]
    fn accepted_shot_spawns_bullet_from_centre() {
        let mut ctx = Context::new(GameConfig::default());
        let e = shooter(&mut ctx, 2.0);
        let mut shooting = ShootingSystem::new();

        ctx.blackboard.post(ShootRequest { entity: e, time: 1.0 });
        step(&mut shooting, &mut ctx, 0.0);

        let bullets = shooting.entities(&ctx.world);
        assert_eq!(bullets.len(), 1);
        let b = bullets[0];
        assert_eq!(*ctx.world.get::<Position>(b).unwrap(), Position { x: 116.0, y: 116.0 });
        assert_eq!(*ctx.world.get::<Velocity>(b).unwrap(), Velocity { x: 400.0, y: 0.0 });
        assert_eq!(ctx.world.get::<Renderable>(b).unwrap().color, Color::YELLOW);
        assert_eq!(ctx.world.get::<Shooter>(e).unwrap().last_shot_time, 1.0);
        assert_eq!(ctx.blackboard.drain::<NewBodyRequest>(), vec![NewBodyRequest { entity: b }]);
    }

    #[test]
    fn fire_rate_gate() {
        let mut ctx = Context::new(GameConfig::default());
        let e = shooter(&mut ctx, 2.0);
        let mut shooting = ShootingSystem::new();

        ctx.blackboard.post(ShootRequest { entity: e, time: 1.0 });
        step(&mut shooting, &mut ctx, 0.0);
        ctx.blackboard.post(ShootRequest { entity: e, time: 1.3 });
        step(&mut shooting, &mut ctx, 0.0);
        assert_eq!(shooting.fired(), 1);

        ctx.blackboard.post(ShootRequest { entity: e, time: 1.5 });
        step(&mut shooting, &mut ctx, 0.0);
        assert_eq!(shooting.fired(), 2);
    }

    #[test]
    fn disabled_or_incomplete_shooters_never_fire() {
        let mut ctx = Context::new(GameConfig::default());
        let disabled = shooter(&mut ctx, 2.0);
        ctx.world.get_mut::<Shooter>(disabled).unwrap().can_shoot = false;
        let no_direction = ctx.world.spawn((Position::default(), Shooter::default()));
        let no_shooter = ctx.world.spawn((Position::default(), Direction::default()));
        let no_position = ctx.world.spawn((Direction::default(), Shooter::default()));
        let mut shooting = ShootingSystem::new();

        for entity in [disabled, no_direction, no_shooter, no_position, Entity::NONE] {
            ctx.blackboard.post(ShootRequest { entity, time: 10.0 });
        }
        step(&mut shooting, &mut ctx, 0.016);

        assert_eq!(shooting.fired(), 0);
        assert!(shooting.entities(&ctx.world).is_empty());
    }

    #[test]
    fn bullets_advance_in_their_spawn_frame() {
        let mut ctx = Context::new(GameConfig::default());
        let e = shooter(&mut ctx, 2.0);
        let mut shooting = ShootingSystem::new();

        ctx.blackboard.post(ShootRequest { entity: e, time: 1.0 });
        step(&mut shooting, &mut ctx, 0.25);

        let b = shooting.entities(&ctx.world)[0];
        assert_eq!(ctx.world.get::<Position>(b).unwrap().x, 216.0);
        assert_eq!(ctx.world.get::<Bullet>(b).unwrap().time_alive, 0.25);
    }

    #[test]
    fn lifetime_expires_on_the_reaching_update() {
        let mut ctx = Context::new(GameConfig::default());
        let b = bullet_at(&mut ctx, 400.0, 300.0);
        let mut shooting = ShootingSystem::new();

        for _ in 0..11 {
            step(&mut shooting, &mut ctx, 0.25);
            assert!(ctx.world.is_alive(b));
        }
        assert_eq!(ctx.world.get::<Bullet>(b).unwrap().time_alive, 2.75);
        step(&mut shooting, &mut ctx, 0.25);
        assert!(!ctx.world.is_alive(b));
        assert!(ctx.world.get::<Bullet>(b).is_none());
    }

    #[test]
    fn out_of_bounds_margin() {
        let mut ctx = Context::new(GameConfig::default());
        let outside = bullet_at(&mut ctx, 815.0, 300.0);
        let inside = bullet_at(&mut ctx, 805.0, 300.0);
        let edge = bullet_at(&mut ctx, -10.0, 610.0);
        let mut shooting = ShootingSystem::new();

        step(&mut shooting, &mut ctx, 0.0);

        assert!(!ctx.world.is_alive(outside));
        assert!(ctx.world.is_alive(inside));
        assert!(ctx.world.is_alive(edge));
    }

    #[test]
    fn margin_follows_configured_field() {
        let mut config = GameConfig::default();
        config.width = 200;
        let mut ctx = Context::new(config);
        let b = bullet_at(&mut ctx, 215.0, 100.0);

        ShootingSystem::new().update(&mut ctx);
        assert!(!ctx.world.is_alive(b));
    }
}
