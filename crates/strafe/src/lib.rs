//! # strafe — A Top-Down 2D Shooter on a Small ECS
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Game::run                                                    │
//! │   load gamedata.json + map1.json ─► Context { World,         │
//! │                                     Blackboard, Time, Config}│
//! │   winit loop ─► Driver::frame                                │
//! │                  Input ► Movement ► Shooting ► Physics ►     │
//! │                  Map ► HUD                                   │
//! │               ─► DrawList::collect ─► wgpu                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Systems talk through the [`Blackboard`](ecs::Blackboard): one-shot typed
//! message queues for requests and events, plus two keyed flags for HUD
//! toggling and exit.

pub mod color;
pub mod components;
pub mod config;
pub mod context;
pub mod driver;
pub mod ecs;
pub mod error;
pub mod game;
pub mod input;
pub mod loader;
pub mod messages;
pub mod prelude;
pub mod render;
pub mod systems;
pub mod time;
mod window;
