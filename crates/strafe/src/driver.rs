//! # Frame Driver — Fixed-Order System Pipeline
//!
//! The [`Driver`] owns one instance of every gameplay system and runs them in
//! a single, written-out order each frame:
//!
//! ```text
//! exit flag? ─► advance Time ─► Input ─► Movement ─► Shooting ─► Physics ─► Map ─► HUD
//! ```
//!
//! The driver knows nothing about windows or GPUs. The winit host calls
//! [`Driver::handle_key`] for key events and [`Driver::frame`] once per
//! redraw, then renders. Tests call `frame` directly with a fixed delta.

use std::time::Duration;

use crate::components::Position;
use crate::context::Context;
use crate::ecs::System;
use crate::ecs::blackboard::EXIT_GAME_REQUEST;
use crate::error::Result;
use crate::input::{ElementState, KeyCode};
use crate::loader::load_entities_from_file;
use crate::messages::{ImpulseRequest, NewBodyRequest};
use crate::systems::{
    HudSystem, InputSystem, MapSystem, MovementSystem, ShootingSystem, load_map,
};

#[cfg(feature = "physics2d")]
use crate::systems::PhysicsSystem;

/// What the host should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Exit,
}

/// The closed set of gameplay systems.
pub struct Driver {
    input: InputSystem,
    movement: MovementSystem,
    shooting: ShootingSystem,
    #[cfg(feature = "physics2d")]
    physics: Option<PhysicsSystem>,
    map: MapSystem,
    hud: HudSystem,
}

impl Driver {
    /// Build the systems around an already-loaded map. Nothing is spawned.
    pub fn new(map: MapSystem, physics: bool) -> Self {
        #[cfg(not(feature = "physics2d"))]
        if physics {
            log::warn!("Physics requested but the physics2d feature is disabled");
        }
        Self {
            input: InputSystem::new(),
            movement: MovementSystem::new(),
            shooting: ShootingSystem::new(),
            #[cfg(feature = "physics2d")]
            physics: physics.then(PhysicsSystem::new),
            map,
            hud: HudSystem::new(),
        }
    }

    /// Load the entity definitions and the map named in `ctx.config`, spawn
    /// everything, and queue a body for each positioned entity.
    pub fn load(ctx: &mut Context) -> Result<Self> {
        let loaded = load_entities_from_file(&mut ctx.world, &ctx.config.game_data)?;
        let map = load_map(&ctx.config.map)?;

        let mut driver = Self::new(MapSystem::new(map), ctx.config.physics);
        for entity in loaded {
            if ctx.world.has::<Position>(entity) {
                ctx.blackboard.post(NewBodyRequest { entity });
            }
        }
        let obstacles = driver.map.spawn_obstacles(ctx);
        log::info!(
            "World ready: {} entities ({} obstacles), physics {}",
            ctx.world.entity_count(),
            obstacles.len(),
            if driver.physics_enabled() { "on" } else { "off" }
        );
        Ok(driver)
    }

    #[cfg(feature = "physics2d")]
    pub fn physics_enabled(&self) -> bool {
        self.physics.is_some()
    }

    #[cfg(not(feature = "physics2d"))]
    pub fn physics_enabled(&self) -> bool {
        false
    }

    pub fn hud(&self) -> &HudSystem {
        &self.hud
    }

    pub fn shooting(&self) -> &ShootingSystem {
        &self.shooting
    }

    pub fn map(&self) -> &MapSystem {
        &self.map
    }

    /// Forward a physical key event.
    pub fn handle_key(&mut self, ctx: &mut Context, key: KeyCode, state: ElementState) {
        self.input.handle_key(key, state, &mut ctx.blackboard);
    }

    /// Run one frame of `dt`. Returns [`ControlFlow::Exit`] without touching
    /// the world once an exit has been requested.
    pub fn frame(&mut self, ctx: &mut Context, dt: Duration) -> ControlFlow {
        if exit_requested(ctx) {
            return ControlFlow::Exit;
        }

        ctx.time.advance(dt);

        self.input.update(ctx);
        self.movement.update(ctx);
        self.shooting.update(ctx);
        #[cfg(feature = "physics2d")]
        match self.physics.as_mut() {
            Some(physics) => physics.update(ctx),
            None => discard_body_requests(ctx),
        }
        #[cfg(not(feature = "physics2d"))]
        discard_body_requests(ctx);
        self.map.update(ctx);
        self.hud.update(ctx);

        if exit_requested(ctx) {
            ControlFlow::Exit
        } else {
            ControlFlow::Continue
        }
    }
}

fn exit_requested(ctx: &Context) -> bool {
    ctx.blackboard.value_or_default::<bool>(EXIT_GAME_REQUEST)
}

/// Without a physics system nothing consumes body and impulse requests.
fn discard_body_requests(ctx: &mut Context) {
    let bodies = ctx.blackboard.drain::<NewBodyRequest>().len();
    let impulses = ctx.blackboard.drain::<ImpulseRequest>().len();
    if bodies + impulses > 0 {
        log::trace!("Physics off: dropped {} body and {} impulse requests", bodies, impulses);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::components::{Bullet, Direction, Input, Renderable, Shooter, Velocity};
    use crate::config::GameConfig;
    use crate::systems::map::MapData;

    const FRAME: Duration = Duration::from_millis(16);

    fn empty_map() -> MapSystem {
        MapSystem::new(MapData {
            width: 800,
            height: 600,
            obstacles: Vec::new(),
        })
    }

    fn player(ctx: &mut Context) -> crate::ecs::Entity {
        ctx.world.spawn((
            Input { controllable: true },
            Position { x: 400.0, y: 300.0 },
            Velocity::default(),
            Renderable::new(Color::BLUE, 32.0, 32.0),
            Direction { angle: 0.0 },
            Shooter {
                fire_rate: 2.0,
                last_shot_time: 0.0,
                can_shoot: true,
            },
        ))
    }

    #[test]
    fn held_key_moves_the_player() {
        let mut ctx = Context::new(GameConfig::default());
        let p = player(&mut ctx);
        let mut driver = Driver::new(empty_map(), false);

        driver.handle_key(&mut ctx, KeyCode::KeyD, ElementState::Pressed);
        for _ in 0..10 {
            assert_eq!(driver.frame(&mut ctx, FRAME), ControlFlow::Continue);
        }

        assert!(ctx.world.get::<Position>(p).unwrap().x > 420.0);
        assert_eq!(ctx.world.get::<Direction>(p).unwrap().angle, 0.0);
        assert_eq!(ctx.time.frame_count(), 10);
    }

    #[test]
    fn holding_space_respects_fire_rate() {
        let mut ctx = Context::new(GameConfig::default());
        player(&mut ctx);
        let mut driver = Driver::new(empty_map(), false);

        // Let game time pass one fire interval first.
        for _ in 0..40 {
            driver.frame(&mut ctx, FRAME);
        }
        driver.handle_key(&mut ctx, KeyCode::Space, ElementState::Pressed);
        for _ in 0..10 {
            driver.frame(&mut ctx, FRAME);
        }

        assert_eq!(driver.shooting().fired(), 1);
        assert_eq!(ctx.world.entities_with::<Bullet>().len(), 1);
    }

    #[test]
    fn physics_requests_do_not_pile_up_without_physics() {
        let mut ctx = Context::new(GameConfig::default());
        let p = player(&mut ctx);
        ctx.blackboard.post(NewBodyRequest { entity: p });
        let mut driver = Driver::new(empty_map(), false);
        assert!(!driver.physics_enabled());

        driver.handle_key(&mut ctx, KeyCode::Space, ElementState::Pressed);
        for _ in 0..100 {
            driver.frame(&mut ctx, FRAME);
        }

        assert!(driver.shooting().fired() > 1);
        assert_eq!(ctx.blackboard.pending::<NewBodyRequest>(), 0);
        assert_eq!(ctx.blackboard.pending::<ImpulseRequest>(), 0);
    }

    #[test]
    fn escape_stops_the_next_frame() {
        let mut ctx = Context::new(GameConfig::default());
        let p = player(&mut ctx);
        let mut driver = Driver::new(empty_map(), false);

        driver.handle_key(&mut ctx, KeyCode::KeyD, ElementState::Pressed);
        driver.handle_key(&mut ctx, KeyCode::Escape, ElementState::Pressed);
        assert_eq!(driver.frame(&mut ctx, FRAME), ControlFlow::Exit);
        assert_eq!(ctx.world.get::<Position>(p).unwrap().x, 400.0);
        assert_eq!(ctx.time.frame_count(), 0);
    }

    #[test]
    fn hud_toggle_reaches_the_hud() {
        let mut ctx = Context::new(GameConfig::default());
        let mut driver = Driver::new(empty_map(), false);
        assert!(driver.hud().visible());

        driver.handle_key(&mut ctx, KeyCode::KeyH, ElementState::Pressed);
        driver.frame(&mut ctx, FRAME);
        assert!(!driver.hud().visible());
    }

    #[test]
    fn load_fails_on_missing_files() {
        let config = GameConfig::default().with_asset_dir("/nonexistent");
        let mut ctx = Context::new(config);
        assert!(Driver::load(&mut ctx).is_err());
    }

    #[test]
    fn load_spawns_bundled_assets() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");
        let mut ctx = Context::new(GameConfig::default().with_asset_dir(dir));
        let mut driver = Driver::load(&mut ctx).unwrap();

        let player = ctx.world.named("player").unwrap();
        assert!(ctx.world.has::<Shooter>(player));
        assert!(!driver.map().map().obstacles.is_empty());

        for _ in 0..5 {
            assert_eq!(driver.frame(&mut ctx, FRAME), ControlFlow::Continue);
        }
        assert!(ctx.world.is_alive(player));
    }

    #[cfg(feature = "physics2d")]
    #[test]
    fn physics_runs_when_enabled() {
        let mut ctx = Context::new(GameConfig::default());
        let p = player(&mut ctx);
        ctx.blackboard.post(NewBodyRequest { entity: p });
        let mut driver = Driver::new(empty_map(), true);
        assert!(driver.physics_enabled());

        driver.handle_key(&mut ctx, KeyCode::KeyS, ElementState::Pressed);
        for _ in 0..10 {
            driver.frame(&mut ctx, FRAME);
        }

        assert!(ctx.world.has::<crate::components::PhysicsBody>(p));
        assert!(ctx.world.get::<Position>(p).unwrap().y > 310.0);
    }
}
