//! Static obstacle map.
//!
//! The map file is read once at startup into [`MapData`]; it is never
//! mutated afterwards. [`MapSystem::spawn_obstacles`] materializes one entity
//! per obstacle and asks the physics system for a body. At runtime the map
//! only reacts to collision events, answering each bullet hit with an
//! [`ImpulseRequest`]. It never touches physics state itself.
//!
//! ```json
//! {
//!   "width": 800, "height": 600,
//!   "obstacles": [
//!     { "x": 200, "y": 150, "width": 64, "height": 64,
//!       "color": { "r": 139, "g": 69, "b": 19 } }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::color::Color;
use crate::components::{Bullet, Input, Position, Renderable, Velocity};
use crate::context::Context;
use crate::ecs::system::short_type_name;
use crate::ecs::{Entity, System, World};
use crate::error::{Result, read_json};
use crate::messages::{CollisionEvent, CollisionKind, ImpulseRequest, NewBodyRequest};

/// Follow-up impulse for a bullet hit, in px/s.
pub const HIT_IMPULSE: (f32, f32) = (100.0, 0.0);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapObstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapData {
    pub width: i32,
    pub height: i32,
    pub obstacles: Vec<MapObstacle>,
}

/// Read a map file.
pub fn load_map(path: &Path) -> Result<MapData> {
    let map: MapData = read_json(path)?;
    log::info!(
        "Loaded map {} ({}x{}, {} obstacles)",
        path.display(),
        map.width,
        map.height,
        map.obstacles.len()
    );
    Ok(map)
}

pub struct MapSystem {
    map: MapData,
    hits: u64,
}

impl MapSystem {
    pub fn new(map: MapData) -> Self {
        Self { map, hits: 0 }
    }

    pub fn map(&self) -> &MapData {
        &self.map
    }

    /// Bullet hits answered so far.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Create one entity per obstacle and request a body for each.
    pub fn spawn_obstacles(&mut self, ctx: &mut Context) -> Vec<Entity> {
        let spawned: Vec<Entity> = self
            .map
            .obstacles
            .iter()
            .map(|o| {
                ctx.world.spawn((
                    Position { x: o.x, y: o.y },
                    Renderable::new(o.color, o.width, o.height),
                    Velocity::default(),
                ))
            })
            .collect();
        for &entity in &spawned {
            ctx.blackboard.post(NewBodyRequest { entity });
        }
        spawned
    }
}

impl System for MapSystem {
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Obstacles: rendered, non-bullet, non-player entities.
    fn entities(&self, world: &World) -> Vec<Entity> {
        world
            .entities_with::<Renderable>()
            .into_iter()
            .filter(|&e| {
                world.has::<Position>(e)
                    && !world.has::<Bullet>(e)
                    && !world.get::<Input>(e).is_some_and(|i| i.controllable)
            })
            .collect()
    }

    fn update(&mut self, ctx: &mut Context) {
        for event in ctx.blackboard.drain::<CollisionEvent>() {
            match event.kind {
                CollisionKind::BulletObstacle => {
                    self.hits += 1;
                    ctx.blackboard.post(ImpulseRequest {
                        entity: event.b,
                        x: HIT_IMPULSE.0,
                        y: HIT_IMPULSE.1,
                    });
                }
                CollisionKind::PlayerObstacle => {
                    log::debug!("{:?} bumped obstacle {:?}", event.a, event.b);
                }
                CollisionKind::Boundary => {
                    log::trace!("Obstacle {:?} hit the field edge", event.a);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::error::GameError;

    const MAP: &str = r#"{
        "width": 800, "height": 600,
        "obstacles": [
            { "x": 100, "y": 100, "width": 32, "height": 32, "color": { "r": 139, "g": 69, "b": 19 } },
            { "x": 400.5, "y": 300, "width": 64, "height": 16, "color": { "r": 0, "g": 255, "b": 0 } }
        ]
    }"#;

    fn map() -> MapData {
        serde_json::from_str(MAP).unwrap()
    }

    #[test]
    fn parses_geometry_and_colours() {
        let map = map();
        assert_eq!((map.width, map.height), (800, 600));
        assert_eq!(map.obstacles.len(), 2);
        assert_eq!(map.obstacles[0].color, Color::BROWN);
        assert_eq!(map.obstacles[1].x, 400.5);
    }

    #[test]
    fn obstacle_missing_a_field_is_rejected() {
        let bad = r#"{ "width": 800, "height": 600, "obstacles": [ { "x": 1, "y": 2 } ] }"#;
        assert!(serde_json::from_str::<MapData>(bad).is_err());
    }

    #[test]
    fn load_reports_the_path() {
        let path = std::env::temp_dir().join(format!("strafe-map-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_map(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, GameError::Parse { .. }));
        assert!(err.to_string().contains("strafe-map-"));
    }

    #[test]
    fn spawn_creates_bodies_for_every_obstacle() {
        let mut ctx = Context::new(GameConfig::default());
        let mut system = MapSystem::new(map());

        let spawned = system.spawn_obstacles(&mut ctx);

        assert_eq!(spawned.len(), 2);
        assert_eq!(system.entities(&ctx.world), spawned);
        let first = spawned[0];
        assert_eq!(*ctx.world.get::<Position>(first).unwrap(), Position { x: 100.0, y: 100.0 });
        assert_eq!(*ctx.world.get::<Velocity>(first).unwrap(), Velocity::default());
        let r = ctx.world.get::<Renderable>(first).unwrap();
        assert_eq!((r.width, r.height, r.show_direction), (32.0, 32.0, false));
        assert_eq!(ctx.blackboard.pending::<NewBodyRequest>(), 2);
    }

    #[test]
    fn bullet_hits_become_impulse_requests() {
        let mut ctx = Context::new(GameConfig::default());
        let mut system = MapSystem::new(map());
        let obstacle = system.spawn_obstacles(&mut ctx)[0];

        ctx.blackboard.post(CollisionEvent {
            kind: CollisionKind::BulletObstacle,
            a: Entity::NONE,
            b: obstacle,
        });
        ctx.blackboard.post(CollisionEvent {
            kind: CollisionKind::Boundary,
            a: obstacle,
            b: Entity::NONE,
        });
        system.update(&mut ctx);

        assert_eq!(
            ctx.blackboard.drain::<ImpulseRequest>(),
            vec![ImpulseRequest { entity: obstacle, x: 100.0, y: 0.0 }]
        );
        assert_eq!(ctx.blackboard.pending::<CollisionEvent>(), 0);
        assert_eq!(system.hits(), 1);
    }
}
