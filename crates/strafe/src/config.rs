//! Game configuration.
//!
//! [`GameConfig`] carries everything that used to be a literal in the game
//! loop: window title and size, data file paths, the frame cap, and whether
//! the physics system runs. The play field is the window: systems read its
//! bounds from here rather than hard-coding 800×600.
//!
//! Built through [`Game`](crate::game::Game)'s builder methods.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration shared by the driver and every system.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub title: String,
    /// Window and play-field width in pixels.
    pub width: u32,
    /// Window and play-field height in pixels.
    pub height: u32,
    /// Entity definition file.
    pub game_data: PathBuf,
    /// Map file with obstacle geometry.
    pub map: PathBuf,
    /// Minimum wall-clock time per frame.
    pub frame_cap: Duration,
    /// Run the rigid-body physics system (requires the `physics2d` feature).
    pub physics: bool,
    /// Footprint assumed for a controllable entity with no `Renderable`.
    pub default_footprint: f32,
}

impl GameConfig {
    /// Play-field width as `f32`.
    pub fn field_width(&self) -> f32 {
        self.width as f32
    }

    /// Play-field height as `f32`.
    pub fn field_height(&self) -> f32 {
        self.height as f32
    }

    /// Point both data files into `dir` (keeping their file names).
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.game_data = dir.join("gamedata.json");
        self.map = dir.join("map1.json");
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "2D Shooter Prototype".to_string(),
            width: 800,
            height: 600,
            game_data: PathBuf::from("assets/gamedata.json"),
            map: PathBuf::from("assets/map1.json"),
            frame_cap: Duration::from_millis(16),
            physics: cfg!(feature = "physics2d"),
            default_footprint: 32.0,
        }
    }
}
