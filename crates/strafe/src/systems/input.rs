//! Keyboard → requests.
//!
//! The window forwards every physical key event to [`InputSystem::handle_key`],
//! which latches held state and raises the two global flags (H, Escape) on
//! the key-down edge. Once per frame [`InputSystem`]'s `update` turns the
//! latched W/A/S/D/Space state into a [`MovementRequest`], a facing change,
//! and a [`ShootRequest`] for each controllable entity.
//!
//! Fire-rate limiting is not done here: Space posts a request every frame it
//! is held and the shooting system decides.

use crate::components::{Direction, Input as Controllable, Position};
use crate::context::Context;
use crate::ecs::blackboard::{EXIT_GAME_REQUEST, HUD_TOGGLE_REQUEST};
use crate::ecs::system::short_type_name;
use crate::ecs::{Blackboard, Entity, System, World};
use crate::input::{ElementState, Input, KeyCode};
use crate::messages::{MovementRequest, ShootRequest};

/// Player speed in px/s along each axis.
pub const PLAYER_SPEED: f32 = 200.0;

#[derive(Default)]
pub struct InputSystem {
    keys: Input<KeyCode>,
}

impl InputSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key event. H and Escape set their blackboard flags on the
    /// key-down edge only, so auto-repeat does not toggle the HUD twice.
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState, blackboard: &mut Blackboard) {
        let changed = self.keys.apply(key, state);
        if changed && state == ElementState::Pressed {
            match key {
                KeyCode::KeyH => blackboard.set(HUD_TOGGLE_REQUEST, true),
                KeyCode::Escape => {
                    log::info!("Escape pressed, requesting exit");
                    blackboard.set(EXIT_GAME_REQUEST, true);
                }
                _ => {}
            }
        }
    }

    /// Axis steps in {-1, 0, 1}. S overrides W, D overrides A.
    fn axes(&self) -> (f32, f32) {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if self.keys.pressed(KeyCode::KeyW) {
            dy = -1.0;
        }
        if self.keys.pressed(KeyCode::KeyS) {
            dy = 1.0;
        }
        if self.keys.pressed(KeyCode::KeyA) {
            dx = -1.0;
        }
        if self.keys.pressed(KeyCode::KeyD) {
            dx = 1.0;
        }
        (dx, dy)
    }
}

/// 8-way facing in degrees for an axis step in {-1, 0, 1}, `None` when not
/// moving.
pub fn facing(dx: f32, dy: f32) -> Option<f32> {
    let angle = match (dx as i32, dy as i32) {
        (1, 0) => 0.0,
        (1, 1) => 45.0,
        (0, 1) => 90.0,
        (-1, 1) => 135.0,
        (-1, 0) => 180.0,
        (-1, -1) => 225.0,
        (0, -1) => 270.0,
        (1, -1) => 315.0,
        _ => return None,
    };
    Some(angle)
}

impl System for InputSystem {
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    fn entities(&self, world: &World) -> Vec<Entity> {
        world
            .entities_with::<Controllable>()
            .into_iter()
            .filter(|&e| world.get::<Controllable>(e).is_some_and(|i| i.controllable))
            .filter(|&e| world.has::<Position>(e))
            .collect()
    }

    fn update(&mut self, ctx: &mut Context) {
        let (dx, dy) = self.axes();
        let shooting = self.keys.pressed(KeyCode::Space);
        let now = ctx.time.elapsed_secs();

        for entity in self.entities(&ctx.world) {
            if let Some(angle) = facing(dx, dy) {
                ctx.blackboard.post(MovementRequest {
                    entity,
                    x: dx * PLAYER_SPEED,
                    y: dy * PLAYER_SPEED,
                });
                match ctx.world.get_mut::<Direction>(entity) {
                    Some(direction) => direction.angle = angle,
                    None => log::trace!("{:?} has no Direction, facing unchanged", entity),
                }
            }
            if shooting {
                ctx.blackboard.post(ShootRequest { entity, time: now });
            }
        }
    }
}
