//! Gameplay systems, in the order the [`Driver`](crate::driver::Driver)
//! runs them.
//!
//! ```text
//! InputSystem ──MovementRequest──► MovementSystem
//!     │
//!     └──────ShootRequest──────► ShootingSystem ──NewBodyRequest──┐
//!                                                                 ▼
//! MapSystem ◄──CollisionEvent── PhysicsSystem ◄──ImpulseRequest── MapSystem
//!                                                   (next frame)
//! HudSystem ◄── hud_toggle_request
//! ```

pub mod hud;
pub mod input;
pub mod map;
pub mod movement;
#[cfg(feature = "physics2d")]
pub mod physics;
pub mod shooting;

pub use hud::HudSystem;
pub use input::InputSystem;
pub use map::{MapData, MapObstacle, MapSystem, load_map};
pub use movement::MovementSystem;
#[cfg(feature = "physics2d")]
pub use physics::PhysicsSystem;
pub use shooting::ShootingSystem;
