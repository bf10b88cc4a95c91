//! 2D rigid-body physics via Rapier.
//!
//! The simulation owns the position of every entity it has a body for. The
//! ECS stays the source of truth between frames: each frame the system
//! pushes ECS state into Rapier, steps, and pulls the result back.
//!
//! ## Frame
//!
//! ```text
//! 1. drop bodies whose entities are gone
//! 2. NewBodyRequest  → classify entity, create body + collider
//! 3. ImpulseRequest  → add to ECS velocity (px/s)
//! 4. push            ECS position/velocity → Rapier (px → units)
//! 5. step            SUBSTEPS × dt/SUBSTEPS, zero gravity
//! 6. pull            Rapier → ECS for dynamic bodies (units → px)
//! 7. resolve         bullet/obstacle, player/obstacle, obstacle/boundary
//!                    → CollisionEvent
//! ```
//!
//! ## Coordinates
//!
//! ECS positions are the top-left corner of the footprint in pixels. Body
//! translations are the footprint centre in simulation units, with
//! [`PIXELS_PER_UNIT`] pixels to the unit. Velocities use the same scale.
//!
//! ## Body Kinds
//!
//! | Entity                       | Body                  | Collider            |
//! |------------------------------|-----------------------|---------------------|
//! | controllable `Input`         | dynamic               | ball, half footprint|
//! | `Bullet`                     | kinematic, CCD        | sensor ball         |
//! | other `Position + Renderable`| dynamic               | cuboid              |
//!
//! Bullets are moved by the shooting system; their bodies follow the ECS
//! position and are never pulled back. Player bodies carry no damping:
//! friction is applied once, by the movement system.

use std::collections::HashMap;

use rapier2d::prelude::*;

use crate::components::{Bullet, Input, PhysicsBody, Position, Renderable, Velocity};
use crate::context::Context;
use crate::ecs::system::short_type_name;
use crate::ecs::{Entity, System, World};
use crate::messages::{CollisionEvent, CollisionKind, ImpulseRequest, NewBodyRequest};
use crate::systems::shooting::BULLET_SIZE;

pub const PIXELS_PER_UNIT: f32 = 32.0;
/// Rapier steps per frame.
pub const SUBSTEPS: u32 = 4;
/// Velocity an obstacle gains from a bullet hit, px/s.
pub const BULLET_IMPULSE: f32 = 100.0;
/// Player/obstacle knockback, px/s each way.
pub const KNOCKBACK: f32 = 60.0;
/// Speed kept by an obstacle bouncing off the field edge.
pub const BOUNDARY_DAMPING: f32 = 0.8;

const OBSTACLE_DENSITY: f32 = 1.0;
const OBSTACLE_FRICTION: f32 = 0.5;
const OBSTACLE_RESTITUTION: f32 = 0.2;

// ── Conversion helpers ──────────────────────────────────────────────────

fn to_units(x: f32, y: f32) -> Vec2 {
    Vec2::new(x / PIXELS_PER_UNIT, y / PIXELS_PER_UNIT)
}

fn centre_units(pos: Position, half: (f32, f32)) -> Vec2 {
    to_units(pos.x + half.0, pos.y + half.1)
}

// ── Bodies ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Player,
    Bullet,
    Obstacle,
}

#[derive(Debug, Clone, Copy)]
struct Tracked {
    handle: RigidBodyHandle,
    kind: BodyKind,
    /// Half footprint in pixels.
    half: (f32, f32),
}

/// Decide what kind of body an entity gets and its footprint in pixels.
fn classify(world: &World, entity: Entity, footprint: f32) -> Option<(BodyKind, f32, f32)> {
    let size = world.get::<Renderable>(entity).map(|r| (r.width, r.height));
    if world.has::<Bullet>(entity) {
        let (w, h) = size.unwrap_or((BULLET_SIZE, BULLET_SIZE));
        Some((BodyKind::Bullet, w, h))
    } else if world.get::<Input>(entity).is_some_and(|i| i.controllable) {
        let (w, h) = size.unwrap_or((footprint, footprint));
        Some((BodyKind::Player, w, h))
    } else {
        size.map(|(w, h)| (BodyKind::Obstacle, w, h))
    }
}

/// Rapier world plus the entity ↔ body mapping.
pub struct PhysicsSystem {
    gravity: Vec2,
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    tracked: HashMap<Entity, Tracked>,
}

impl std::fmt::Debug for PhysicsSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsSystem")
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .finish()
    }
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsSystem {
    pub fn new() -> Self {
        Self {
            gravity: Vec2::ZERO,
            pipeline: PhysicsPipeline::new(),
            params: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            tracked: HashMap::new(),
        }
    }

    pub fn body_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn body_kind(&self, entity: Entity) -> Option<BodyKind> {
        self.tracked.get(&entity).map(|t| t.kind)
    }

    fn add_body(&mut self, world: &mut World, entity: Entity, footprint: f32) {
        if self.tracked.contains_key(&entity) {
            return;
        }
        let Some(pos) = world.get::<Position>(entity).copied() else {
            log::debug!("No body for {:?}: missing Position", entity);
            return;
        };
        let Some((kind, w, h)) = classify(world, entity, footprint) else {
            log::debug!("No body for {:?}: nothing to collide with", entity);
            return;
        };
        let vel = world.get::<Velocity>(entity).copied().unwrap_or_default();
        let half = (w / 2.0, h / 2.0);
        let centre = centre_units(pos, half);
        let linvel = to_units(vel.x, vel.y);

        let (body, collider) = match kind {
            BodyKind::Player => (
                RigidBodyBuilder::new(RigidBodyType::Dynamic)
                    .translation(centre)
                    .linvel(linvel)
                    .lock_rotations()
                    .build(),
                ColliderBuilder::ball(half.0.min(half.1) / PIXELS_PER_UNIT).build(),
            ),
            BodyKind::Bullet => (
                RigidBodyBuilder::new(RigidBodyType::KinematicPositionBased)
                    .translation(centre)
                    .ccd_enabled(true)
                    .build(),
                ColliderBuilder::ball(half.0.max(half.1) / PIXELS_PER_UNIT)
                    .sensor(true)
                    .build(),
            ),
            BodyKind::Obstacle => (
                RigidBodyBuilder::new(RigidBodyType::Dynamic)
                    .translation(centre)
                    .linvel(linvel)
                    .lock_rotations()
                    .build(),
                ColliderBuilder::cuboid(half.0 / PIXELS_PER_UNIT, half.1 / PIXELS_PER_UNIT)
                    .density(OBSTACLE_DENSITY)
                    .friction(OBSTACLE_FRICTION)
                    .restitution(OBSTACLE_RESTITUTION)
                    .build(),
            ),
        };

        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        self.tracked.insert(entity, Tracked { handle, kind, half });
        if kind != BodyKind::Bullet {
            world.insert(entity, PhysicsBody);
        }
        log::debug!("Created {:?} body for {:?}", kind, entity);
    }

    fn remove_body(&mut self, world: &mut World, entity: Entity) {
        let Some(tracked) = self.tracked.remove(&entity) else {
            return;
        };
        self.bodies.remove(
            tracked.handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        world.remove::<PhysicsBody>(entity);
    }

    fn drop_dead(&mut self, world: &mut World) {
        let dead: Vec<Entity> = self
            .tracked
            .keys()
            .copied()
            .filter(|&e| !world.is_alive(e))
            .collect();
        for entity in dead {
            self.remove_body(world, entity);
        }
    }

    /// ECS → Rapier.
    fn push(&mut self, world: &World) {
        for (&entity, tracked) in &self.tracked {
            let Some(pos) = world.get::<Position>(entity).copied() else {
                continue;
            };
            let Some(body) = self.bodies.get_mut(tracked.handle) else {
                continue;
            };
            let centre = centre_units(pos, tracked.half);
            match tracked.kind {
                BodyKind::Bullet => body.set_next_kinematic_position(Pose::new(centre, 0.0)),
                BodyKind::Player | BodyKind::Obstacle => {
                    let vel = world.get::<Velocity>(entity).copied().unwrap_or_default();
                    body.set_translation(centre, true);
                    body.set_linvel(to_units(vel.x, vel.y), true);
                }
            }
        }
    }

    fn step(&mut self, dt: f32) {
        self.params.dt = dt / SUBSTEPS as f32;
        for _ in 0..SUBSTEPS {
            self.pipeline.step(
                self.gravity,
                &self.params,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                &(),
                &(),
            );
        }
    }

    /// Rapier → ECS, dynamic bodies only.
    fn pull(&self, world: &mut World) {
        for (&entity, tracked) in &self.tracked {
            if tracked.kind == BodyKind::Bullet {
                continue;
            }
            let Some(body) = self.bodies.get(tracked.handle) else {
                continue;
            };
            let t = body.translation();
            let v = body.linvel();
            if let Some(pos) = world.get_mut::<Position>(entity) {
                pos.x = t.x * PIXELS_PER_UNIT - tracked.half.0;
                pos.y = t.y * PIXELS_PER_UNIT - tracked.half.1;
            }
            if let Some(vel) = world.get_mut::<Velocity>(entity) {
                vel.x = v.x * PIXELS_PER_UNIT;
                vel.y = v.y * PIXELS_PER_UNIT;
            }
        }
    }
}

impl System for PhysicsSystem {
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Entities that currently own a body, in creation order.
    fn entities(&self, world: &World) -> Vec<Entity> {
        world
            .all_entities()
            .into_iter()
            .filter(|e| self.tracked.contains_key(e))
            .collect()
    }

    fn update(&mut self, ctx: &mut Context) {
        self.drop_dead(&mut ctx.world);

        let footprint = ctx.config.default_footprint;
        for request in ctx.blackboard.drain::<NewBodyRequest>() {
            self.add_body(&mut ctx.world, request.entity, footprint);
        }

        for request in ctx.blackboard.drain::<ImpulseRequest>() {
            if !add_velocity(&mut ctx.world, request.entity, request.x, request.y) {
                log::debug!("Impulse for {:?} without Velocity", request.entity);
            }
        }

        let dt = ctx.dt();
        if dt > 0.0 {
            self.push(&ctx.world);
            self.step(dt);
            self.pull(&mut ctx.world);
        }

        for bullet in resolve_collisions(ctx) {
            self.remove_body(&mut ctx.world, bullet);
        }
    }
}

// ── Discrete collision resolution ───────────────────────────────────────

/// Axis-aligned footprint in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Rect {
    /// Edges inclusive.
    fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    /// Touching edges do not count.
    fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    fn centre(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Where along `from → to` (0..=1) the segment first touches the rect,
    /// edges inclusive. A zero-length segment degenerates to [`Rect::contains`].
    fn segment_entry(&self, from: (f32, f32), to: (f32, f32)) -> Option<f32> {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        if dx == 0.0 && dy == 0.0 {
            return self.contains(from.0, from.1).then_some(0.0);
        }
        let mut enter = 0.0_f32;
        let mut exit = 1.0_f32;
        // Liang-Barsky clipping against the four edges.
        for (p, q) in [
            (-dx, from.0 - self.x),
            (dx, self.x + self.w - from.0),
            (-dy, from.1 - self.y),
            (dy, self.y + self.h - from.1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                enter = enter.max(t);
            } else {
                exit = exit.min(t);
            }
            if enter > exit {
                return None;
            }
        }
        Some(enter)
    }
}

fn add_velocity(world: &mut World, entity: Entity, dx: f32, dy: f32) -> bool {
    match world.get_mut::<Velocity>(entity) {
        Some(vel) => {
            vel.x += dx;
            vel.y += dy;
            true
        }
        None => false,
    }
}

/// Unit vector, or `fallback` for a zero vector.
fn normalize_or(x: f32, y: f32, fallback: (f32, f32)) -> (f32, f32) {
    let len = (x * x + y * y).sqrt();
    if len > f32::EPSILON {
        (x / len, y / len)
    } else {
        fallback
    }
}

/// Resolve contacts the simulation does not answer on its own and post a
/// [`CollisionEvent`] for each. Returns the bullets it despawned.
fn resolve_collisions(ctx: &mut Context) -> Vec<Entity> {
    let footprint = ctx.config.default_footprint;
    let dt = ctx.dt();
    let field_w = ctx.config.field_width();
    let field_h = ctx.config.field_height();

    let mut bullets = Vec::new();
    let mut players = Vec::new();
    let mut obstacles = Vec::new();
    {
        let world = &ctx.world;
        for entity in world.all_entities() {
            let Some(pos) = world.get::<Position>(entity).copied() else {
                continue;
            };
            let size = world.get::<Renderable>(entity).map(|r| (r.width, r.height));
            if world.has::<Bullet>(entity) {
                let vel = world.get::<Velocity>(entity).copied().unwrap_or_default();
                bullets.push((entity, pos, vel));
            } else if world.get::<Input>(entity).is_some_and(|i| i.controllable) {
                let (w, h) = size.unwrap_or((footprint, footprint));
                players.push((entity, Rect { x: pos.x, y: pos.y, w, h }));
            } else if let Some((w, h)) = size {
                obstacles.push((entity, Rect { x: pos.x, y: pos.y, w, h }));
            }
        }
    }

    let world = &mut ctx.world;
    let blackboard = &mut ctx.blackboard;
    let mut removed = Vec::new();

    // Bullet vs obstacle: sweep the path flown this frame so thin obstacles
    // cannot be skipped. The bullet is gone the moment it lands.
    for (bullet, pos, vel) in bullets {
        let from = (pos.x - vel.x * dt, pos.y - vel.y * dt);
        let to = (pos.x, pos.y);
        let Some(obstacle) = obstacles
            .iter()
            .filter_map(|&(e, r)| r.segment_entry(from, to).map(|t| (e, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(e, _)| e)
        else {
            continue;
        };
        let (nx, ny) = normalize_or(vel.x, vel.y, (0.0, 0.0));
        add_velocity(world, obstacle, nx * BULLET_IMPULSE, ny * BULLET_IMPULSE);
        world.despawn(bullet);
        removed.push(bullet);
        blackboard.post(CollisionEvent {
            kind: CollisionKind::BulletObstacle,
            a: bullet,
            b: obstacle,
        });
    }

    // Player vs obstacle: push apart along the centre line.
    for &(player, player_rect) in &players {
        for &(obstacle, obstacle_rect) in &obstacles {
            if !player_rect.overlaps(&obstacle_rect) {
                continue;
            }
            let (px, py) = player_rect.centre();
            let (ox, oy) = obstacle_rect.centre();
            let (nx, ny) = normalize_or(ox - px, oy - py, (1.0, 0.0));
            add_velocity(world, player, -nx * KNOCKBACK, -ny * KNOCKBACK);
            add_velocity(world, obstacle, nx * KNOCKBACK, ny * KNOCKBACK);
            blackboard.post(CollisionEvent {
                kind: CollisionKind::PlayerObstacle,
                a: player,
                b: obstacle,
            });
        }
    }

    // Obstacle vs field edge.
    for &(obstacle, rect) in &obstacles {
        let (Some(mut pos), Some(mut vel)) = (
            world.get::<Position>(obstacle).copied(),
            world.get::<Velocity>(obstacle).copied(),
        ) else {
            continue;
        };
        let max_x = (field_w - rect.w).max(0.0);
        let max_y = (field_h - rect.h).max(0.0);
        let mut hit = false;

        if pos.x < 0.0 {
            pos.x = 0.0;
            vel.x = vel.x.abs() * BOUNDARY_DAMPING;
            hit = true;
        } else if pos.x > max_x {
            pos.x = max_x;
            vel.x = -vel.x.abs() * BOUNDARY_DAMPING;
            hit = true;
        }
        if pos.y < 0.0 {
            pos.y = 0.0;
            vel.y = vel.y.abs() * BOUNDARY_DAMPING;
            hit = true;
        } else if pos.y > max_y {
            pos.y = max_y;
            vel.y = -vel.y.abs() * BOUNDARY_DAMPING;
            hit = true;
        }

        if hit {
            world.insert(obstacle, pos);
            world.insert(obstacle, vel);
            blackboard.post(CollisionEvent {
                kind: CollisionKind::Boundary,
                a: obstacle,
                b: Entity::NONE,
            });
        }
    }

    removed
}
