//! # Entity Definitions — Spawning the World From JSON
//!
//! The entity definition file lists named entities and, for each, a map of
//! component kind → fields:
//!
//! ```json
//! {
//!   "entities": [
//!     {
//!       "name": "player",
//!       "components": {
//!         "Position":   { "x": 400, "y": 300 },
//!         "Input":      { "controllable": true },
//!         "Renderable": { "color": "blue", "width": 32, "height": 32, "showDirection": true },
//!         "Direction":  { "angle": 0 },
//!         "Shooter":    { "fireRate": 2, "lastShotTime": 0, "canShoot": true }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! ## Component Registry
//!
//! [`ComponentRegistry`] maps a kind name to a function that deserializes
//! the fields and inserts the component. Unknown kinds are skipped with a
//! debug log. A known kind with missing or mistyped fields fails the whole
//! load with [`GameError::Component`].

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::components::{Direction, Input, Position, Renderable, Shooter, Velocity};
use crate::ecs::{Entity, World};
use crate::error::{GameError, Result, read_json};

// ── Wire format ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct EntityFile {
    pub entities: Vec<EntityDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityDef {
    pub name: String,
    #[serde(default)]
    pub components: serde_json::Map<String, serde_json::Value>,
}

// ── ComponentRegistry ────────────────────────────────────────────────────

type InsertFn = fn(&mut World, Entity, serde_json::Value) -> std::result::Result<(), serde_json::Error>;

/// Maps component kind names to deserialize-and-insert functions.
pub struct ComponentRegistry {
    by_name: HashMap<String, InsertFn>,
}

impl ComponentRegistry {
    /// A registry with no kinds.
    pub fn empty() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    /// Register `T` under `name`.
    pub fn register<T: DeserializeOwned + 'static>(&mut self, name: &str) {
        let insert: InsertFn = |world, entity, json| {
            let component: T = serde_json::from_value(json)?;
            world.insert(entity, component);
            Ok(())
        };
        self.by_name.insert(name.to_string(), insert);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Spawn every entity in `file`. On error, entities created so far by this
    /// call are despawned again.
    pub fn spawn_all(&self, world: &mut World, file: &EntityFile) -> Result<Vec<Entity>> {
        let mut spawned = Vec::with_capacity(file.entities.len());
        for def in &file.entities {
            match self.spawn_one(world, def) {
                Ok(entity) => spawned.push(entity),
                Err(err) => {
                    for entity in spawned {
                        world.despawn(entity);
                    }
                    return Err(err);
                }
            }
        }
        Ok(spawned)
    }

    fn spawn_one(&self, world: &mut World, def: &EntityDef) -> Result<Entity> {
        let entity = world.spawn_empty();
        for (kind, fields) in &def.components {
            let Some(insert) = self.by_name.get(kind) else {
                log::debug!("Entity \"{}\": skipping unknown component {}", def.name, kind);
                continue;
            };
            if let Err(source) = insert(world, entity, fields.clone()) {
                world.despawn(entity);
                return Err(GameError::Component {
                    entity: def.name.clone(),
                    kind: kind.clone(),
                    source,
                });
            }
        }

        // Controllable entities need somewhere for movement requests to land.
        if world.has::<Input>(entity) && world.has::<Position>(entity) && !world.has::<Velocity>(entity) {
            world.insert(entity, Velocity::default());
        }

        if !def.name.is_empty() && !world.name_entity(entity, &def.name) {
            log::warn!("Duplicate entity name \"{}\", keeping the first", def.name);
        }
        Ok(entity)
    }
}

impl Default for ComponentRegistry {
    /// Every kind the game understands.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register::<Position>("Position");
        registry.register::<Velocity>("Velocity");
        registry.register::<Input>("Input");
        registry.register::<Renderable>("Renderable");
        registry.register::<Direction>("Direction");
        registry.register::<Shooter>("Shooter");
        registry
    }
}

// ── Load functions ───────────────────────────────────────────────────────

/// Spawn entities from an already-parsed file with the default registry.
pub fn load_entities(world: &mut World, file: &EntityFile) -> Result<Vec<Entity>> {
    ComponentRegistry::default().spawn_all(world, file)
}

/// Read an entity definition file and spawn its entities.
pub fn load_entities_from_file(world: &mut World, path: &Path) -> Result<Vec<Entity>> {
    let file: EntityFile = read_json(path)?;
    let entities = load_entities(world, &file)?;
    log::info!("Loaded {} entities from {}", entities.len(), path.display());
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn parse(json: &str) -> EntityFile {
        serde_json::from_str(json).unwrap()
    }

    const PLAYER: &str = r#"{
        "entities": [{
            "name": "player",
            "components": {
                "Position": { "x": 400, "y": 300 },
                "Input": { "controllable": true },
                "Renderable": { "color": "blue", "width": 32, "height": 32, "showDirection": true },
                "Direction": { "angle": 0 },
                "Shooter": { "fireRate": 2, "lastShotTime": 0, "canShoot": true },
                "Sparkles": { "amount": 11 }
            }
        }]
    }"#;

    #[test]
    fn loads_known_components_and_skips_unknown() {
        let mut world = World::new();
        let spawned = load_entities(&mut world, &parse(PLAYER)).unwrap();

        assert_eq!(spawned.len(), 1);
        let player = world.named("player").unwrap();
        assert_eq!(player, spawned[0]);
        assert_eq!(*world.get::<Position>(player).unwrap(), Position { x: 400.0, y: 300.0 });
        assert_eq!(world.get::<Renderable>(player).unwrap().color, Color::BLUE);
        assert!(world.get::<Renderable>(player).unwrap().show_direction);
        assert_eq!(world.get::<Shooter>(player).unwrap().fire_rate, 2.0);
    }

    #[test]
    fn controllable_entities_get_a_velocity() {
        let mut world = World::new();
        load_entities(&mut world, &parse(PLAYER)).unwrap();
        let player = world.named("player").unwrap();
        assert_eq!(*world.get::<Velocity>(player).unwrap(), Velocity::default());
    }

    #[test]
    fn missing_field_names_entity_and_kind() {
        let mut world = World::new();
        let file = parse(
            r#"{ "entities": [
                { "name": "ok", "components": { "Position": { "x": 1, "y": 2 } } },
                { "name": "broken", "components": { "Shooter": { "fireRate": 2 } } }
            ] }"#,
        );

        let err = load_entities(&mut world, &file).unwrap_err();
        match &err {
            GameError::Component { entity, kind, .. } => {
                assert_eq!(entity, "broken");
                assert_eq!(kind, "Shooter");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(world.entity_count(), 0);
        assert!(world.named("ok").is_none());
    }

    #[test]
    fn duplicate_names_still_spawn() {
        let mut world = World::new();
        let file = parse(
            r#"{ "entities": [
                { "name": "rock", "components": {} },
                { "name": "rock" }
            ] }"#,
        );
        let spawned = load_entities(&mut world, &file).unwrap();
        assert_eq!(spawned.len(), 2);
        assert_eq!(world.named("rock"), Some(spawned[0]));
    }

    #[test]
    fn custom_registry() {
        let mut registry = ComponentRegistry::empty();
        registry.register::<Position>("Pos");
        assert!(registry.contains("Pos"));
        assert!(!registry.contains("Position"));

        let mut world = World::new();
        let file = parse(r#"{ "entities": [ { "name": "a", "components": { "Pos": { "x": 5, "y": 6 } } } ] }"#);
        let spawned = registry.spawn_all(&mut world, &file).unwrap();
        assert_eq!(world.get::<Position>(spawned[0]).unwrap().x, 5.0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut world = World::new();
        let err = load_entities_from_file(&mut world, Path::new("/nonexistent/gamedata.json")).unwrap_err();
        assert!(matches!(err, GameError::Io { .. }));
    }
}
