//! Keyboard state latching.
//!
//! [`Input`] tracks which keys are currently held. The window feeds it
//! physical key events; the input system reads it once per frame.

use std::collections::HashSet;
use std::hash::Hash;

pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

/// The set of inputs (keys by physical scancode) currently held down.
pub struct Input<T: Eq + Hash + Copy> {
    pressed: HashSet<T>,
}

impl<T: Eq + Hash + Copy> Input<T> {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
        }
    }

    /// Returns `true` if the input is currently held down.
    pub fn pressed(&self, input: T) -> bool {
        self.pressed.contains(&input)
    }

    /// Latch a key-down. Returns `true` on the down edge; auto-repeat presses
    /// of a held key return `false`.
    pub fn press(&mut self, input: T) -> bool {
        self.pressed.insert(input)
    }

    /// Latch a key-up. Returns `true` if the key was held.
    pub fn release(&mut self, input: T) -> bool {
        self.pressed.remove(&input)
    }

    /// Apply a winit key state. Returns `true` when the held state changed.
    pub fn apply(&mut self, input: T, state: ElementState) -> bool {
        match state {
            ElementState::Pressed => self.press(input),
            ElementState::Released => self.release(input),
        }
    }
}

impl<T: Eq + Hash + Copy> Default for Input<T> {
    fn default() -> Self {
        Self::new()
    }
}
