//! Rendering: a read-only snapshot of the world, drawn with wgpu.
//!
//! [`DrawList::collect`] borrows the world immutably and turns it into plain
//! draw commands. Everything past that point (`vertex`, `pipeline`, `draw`)
//! sees only the commands, never the world.

pub mod draw;
pub mod gpu;
pub mod pipeline;
pub mod snapshot;
pub mod vertex;

pub use gpu::GpuContext;
pub use pipeline::ShapeRenderer;
pub use snapshot::{DrawCommand, DrawList};
