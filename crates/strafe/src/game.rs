//! Game builder.
//!
//! [`Game`] collects configuration, then [`run`](Game::run) loads the data
//! files, opens the window, and drives frames until exit.
//!
//! ```ignore
//! use strafe::prelude::*;
//!
//! fn main() -> std::process::ExitCode {
//!     env_logger::init();
//!     match Game::new("2D Shooter Prototype").asset_dir("assets").run() {
//!         Ok(()) => std::process::ExitCode::SUCCESS,
//!         Err(_) => std::process::ExitCode::FAILURE,
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use crate::config::GameConfig;
use crate::context::Context;
use crate::driver::Driver;
use crate::error::{GameError, Result};

pub struct Game {
    config: GameConfig,
}

impl Game {
    pub fn new(title: &str) -> Self {
        Self {
            config: GameConfig {
                title: title.to_string(),
                ..GameConfig::default()
            },
        }
    }

    /// Window and play-field size in pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Directory holding `gamedata.json` and `map1.json`.
    pub fn asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config = self.config.with_asset_dir(dir);
        self
    }

    /// Run the rigid-body physics system (needs the `physics2d` feature).
    pub fn physics(mut self, enabled: bool) -> Self {
        self.config.physics = enabled;
        self
    }

    /// Minimum wall-clock time per frame.
    pub fn frame_cap(mut self, cap: Duration) -> Self {
        self.config.frame_cap = cap;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Load data, open the window, and run until exit. Returns the first
    /// initialization error; a clean exit is `Ok(())`.
    pub fn run(self) -> Result<()> {
        let mut ctx = Context::new(self.config);
        let driver = Driver::load(&mut ctx)?;

        let event_loop = winit::event_loop::EventLoop::new()
            .map_err(|e| GameError::EventLoop(e.to_string()))?;
        let mut app = crate::window::WinitApp::new(ctx, driver);
        event_loop
            .run_app(&mut app)
            .map_err(|e| GameError::EventLoop(e.to_string()))?;

        match app.take_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
