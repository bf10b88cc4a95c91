//! The state every system is handed each frame.
//!
//! [`Context`] bundles the ECS [`World`], the [`Blackboard`], frame
//! [`Time`], and the [`GameConfig`]. Systems receive `&mut Context`, so the
//! blackboard handle is the same object for everyone and there is no global
//! state: a test can build as many contexts as it likes.

use crate::config::GameConfig;
use crate::ecs::{Blackboard, World};
use crate::time::Time;

/// World, blackboard, timing, and configuration for one game instance.
pub struct Context {
    pub world: World,
    pub blackboard: Blackboard,
    pub time: Time,
    pub config: GameConfig,
}

impl Context {
    pub fn new(config: GameConfig) -> Self {
        Self {
            world: World::new(),
            blackboard: Blackboard::new(),
            time: Time::new(),
            config,
        }
    }

    /// Frame delta in seconds.
    pub fn dt(&self) -> f32 {
        self.time.delta_secs()
    }
}
