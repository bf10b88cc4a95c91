//! Per-frame draw snapshot.
//!
//! One filled rect per entity with `Position` and `Renderable`, in creation
//! order. Entities that set `show_direction` and carry a `Direction` also get
//! a white facing line from the rect centre.

use crate::color::Color;
use crate::components::{Direction, Position, Renderable};
use crate::ecs::World;

/// Length of the facing indicator in pixels.
pub const DIRECTION_LINE_LENGTH: f32 = 20.0;
pub const DIRECTION_LINE_THICKNESS: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Filled axis-aligned rect, top-left at `(x, y)`.
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        thickness: f32,
        color: Color,
    },
}

/// Draw commands for one frame, in paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn collect(world: &World) -> Self {
        let mut commands = Vec::new();
        for entity in world.all_entities() {
            let (Some(pos), Some(r)) = (world.get::<Position>(entity), world.get::<Renderable>(entity))
            else {
                continue;
            };
            commands.push(DrawCommand::Rect {
                x: pos.x,
                y: pos.y,
                w: r.width,
                h: r.height,
                color: r.color,
            });

            if !r.show_direction {
                continue;
            }
            if let Some(dir) = world.get::<Direction>(entity) {
                let from = (pos.x + r.width / 2.0, pos.y + r.height / 2.0);
                let tip = dir.unit() * DIRECTION_LINE_LENGTH;
                commands.push(DrawCommand::Line {
                    from,
                    to: (from.0 + tip.x, from.1 + tip.y),
                    thickness: DIRECTION_LINE_THICKNESS,
                    color: Color::WHITE,
                });
            }
        }
        Self { commands }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Velocity;

    #[test]
    fn rects_in_creation_order() {
        let mut world = World::new();
        world.spawn((Position { x: 1.0, y: 2.0 }, Renderable::new(Color::RED, 10.0, 5.0)));
        world.spawn((Position::default(), Velocity::default()));
        world.spawn((Position { x: 50.0, y: 60.0 }, Renderable::new(Color::GREEN, 4.0, 4.0)));

        let list = DrawList::collect(&world);
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.commands()[0],
            DrawCommand::Rect { x: 1.0, y: 2.0, w: 10.0, h: 5.0, color: Color::RED }
        );
        assert!(matches!(list.commands()[1], DrawCommand::Rect { color, .. } if color == Color::GREEN));
    }

    #[test]
    fn facing_line_from_centre() {
        let mut world = World::new();
        let mut r = Renderable::new(Color::BLUE, 32.0, 32.0);
        r.show_direction = true;
        world.spawn((Position { x: 100.0, y: 100.0 }, r, Direction { angle: 0.0 }));

        let list = DrawList::collect(&world);
        let DrawCommand::Line { from, to, color, .. } = list.commands()[1] else {
            panic!("expected a facing line");
        };
        assert_eq!(from, (116.0, 116.0));
        assert!((to.0 - 136.0).abs() < 1e-4 && (to.1 - 116.0).abs() < 1e-4);
        assert_eq!(color, Color::WHITE);
    }

    #[test]
    fn no_line_without_direction_or_flag() {
        let mut world = World::new();
        let mut r = Renderable::new(Color::BLUE, 32.0, 32.0);
        r.show_direction = true;
        world.spawn((Position::default(), r));
        world.spawn((
            Position::default(),
            Renderable::new(Color::BLUE, 32.0, 32.0),
            Direction { angle: 90.0 },
        ));

        assert_eq!(DrawList::collect(&world).len(), 2);
    }
}
