//! Frame-rate readout and key help.
//!
//! FPS is averaged over [`FPS_WINDOW`] of game time so the number is
//! readable. Visibility flips whenever the input system raised
//! `hud_toggle_request`.

use crate::context::Context;
use crate::ecs::blackboard::HUD_TOGGLE_REQUEST;
use crate::ecs::system::short_type_name;
use crate::ecs::{Entity, System, World};

/// Averaging window for the FPS counter, in seconds.
pub const FPS_WINDOW: f32 = 0.25;

#[derive(Debug)]
pub struct HudSystem {
    visible: bool,
    fps: f32,
    accumulator: f32,
    frames: u32,
}

impl Default for HudSystem {
    fn default() -> Self {
        Self {
            visible: true,
            fps: 0.0,
            accumulator: 0.0,
            frames: 0,
        }
    }
}

impl HudSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Last averaged frame rate.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn lines(&self) -> [String; 3] {
        [
            format!("FPS: {:.1}", self.fps),
            "H: Toggle HUD".to_string(),
            "ESC: Exit Game".to_string(),
        ]
    }

    /// HUD lines joined for a single-line surface, `None` while hidden.
    pub fn overlay_text(&self) -> Option<String> {
        self.visible.then(|| self.lines().join(" | "))
    }
}

impl System for HudSystem {
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    fn entities(&self, _world: &World) -> Vec<Entity> {
        Vec::new()
    }

    fn update(&mut self, ctx: &mut Context) {
        if ctx.blackboard.take_flag(HUD_TOGGLE_REQUEST) {
            self.visible = !self.visible;
            log::info!("HUD {}", if self.visible { "shown" } else { "hidden" });
        }

        self.accumulator += ctx.dt();
        self.frames += 1;
        if self.accumulator >= FPS_WINDOW {
            self.fps = self.frames as f32 / self.accumulator;
            self.accumulator = 0.0;
            self.frames = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use std::time::Duration;

    #[test]
    fn fps_is_averaged_per_window() {
        let mut ctx = Context::new(GameConfig::default());
        let mut hud = HudSystem::new();

        for _ in 0..3 {
            ctx.time.advance(Duration::from_micros(62_500));
            hud.update(&mut ctx);
        }
        assert_eq!(hud.fps(), 0.0);

        ctx.time.advance(Duration::from_micros(62_500));
        hud.update(&mut ctx);
        assert_eq!(hud.fps(), 16.0);
        assert_eq!(hud.lines()[0], "FPS: 16.0");
    }

    #[test]
    fn toggle_flag_is_consumed() {
        let mut ctx = Context::new(GameConfig::default());
        let mut hud = HudSystem::new();
        assert!(hud.overlay_text().is_some());

        ctx.blackboard.set(HUD_TOGGLE_REQUEST, true);
        hud.update(&mut ctx);
        assert!(!hud.visible());
        assert!(hud.overlay_text().is_none());
        assert!(!ctx.blackboard.has(HUD_TOGGLE_REQUEST));

        hud.update(&mut ctx);
        assert!(!hud.visible());
    }

    #[test]
    fn overlay_lists_the_keys() {
        let text = HudSystem::new().overlay_text().unwrap();
        assert_eq!(text, "FPS: 0.0 | H: Toggle HUD | ESC: Exit Game");
    }
}
