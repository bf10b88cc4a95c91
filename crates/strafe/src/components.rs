//! Component records.
//!
//! Plain data, no behaviour. Every kind that can appear in the entity
//! definition file derives `Deserialize` with the file's camelCase field
//! names; a missing field is a load error, not a silent zero.
//!
//! Coordinates are pixels with the origin at the top-left of the play field
//! and y pointing down. Angles are degrees, 0 = right, increasing clockwise.

use serde::Deserialize;

use crate::color::Color;

/// Top-left corner of the entity's footprint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Pixels per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

/// Marks an entity as driven by the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Input {
    pub controllable: bool,
}

/// A filled rectangle, optionally with a facing indicator.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Renderable {
    pub color: Color,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub show_direction: bool,
}

impl Renderable {
    pub fn new(color: Color, width: f32, height: f32) -> Self {
        Self {
            color,
            width,
            height,
            show_direction: false,
        }
    }
}

/// Facing angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Direction {
    pub angle: f32,
}

impl Direction {
    /// Unit vector for the facing angle.
    pub fn unit(&self) -> glam::Vec2 {
        let radians = self.angle.to_radians();
        glam::Vec2::new(radians.cos(), radians.sin())
    }
}

/// Fire-rate limited weapon.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shooter {
    /// Shots per second.
    pub fire_rate: f32,
    /// Game time of the last accepted shot, in seconds.
    pub last_shot_time: f32,
    pub can_shoot: bool,
}

impl Default for Shooter {
    fn default() -> Self {
        Self {
            fire_rate: 0.5,
            last_shot_time: 0.0,
            can_shoot: true,
        }
    }
}

/// A projectile owned by the shooting system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub speed: f32,
    /// Seconds before the bullet expires.
    pub lifetime: f32,
    pub time_alive: f32,
}

impl Default for Bullet {
    fn default() -> Self {
        Self {
            speed: 400.0,
            lifetime: 3.0,
            time_alive: 0.0,
        }
    }
}

/// Marks an entity whose position is integrated by the physics step.
///
/// Inserted and removed by the physics system alone. Movement leaves these
/// entities' positions to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody;
