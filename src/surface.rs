//! Render surface contract
//!
//! The simulation only ever needs two primitives: clear to a color and fill a
//! circle with an opacity. Anything that can do both can host the display.

use crate::color::hsl_to_rgb;
use crate::math::Vec2;

/// Drawing target for the simulation
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Fill the whole surface with an opaque color
    fn clear(&mut self, color: (u8, u8, u8));

    /// Fill a circle with alpha blending. `alpha` is in [0, 1].
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: (u8, u8, u8), alpha: f32);
}

/// Draw an HSL-colored circle, skipping anything invisible
///
/// Non-positive (or NaN) radius and alpha are dropped here so no surface ever
/// sees them; alpha above 1 is clamped.
pub fn paint(
    surface: &mut dyn Surface,
    center: Vec2,
    radius: f32,
    hsl: (f32, f32, f32),
    alpha: f32,
) {
    if radius.is_nan() || alpha.is_nan() || radius <= 0.0 || alpha <= 0.0 {
        return;
    }
    let color = hsl_to_rgb(hsl.0, hsl.1, hsl.2);
    surface.fill_circle(center, radius, color, alpha.min(1.0));
}

/// A single recorded drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear((u8, u8, u8)),
    Circle {
        center: Vec2,
        radius: f32,
        color: (u8, u8, u8),
        alpha: f32,
    },
}

/// Surface that records commands instead of rasterizing them
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Number of circles drawn since creation or the last `take`
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    /// Drain all recorded commands
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: (u8, u8, u8)) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: (u8, u8, u8), alpha: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_skips_invisible() {
        let mut surface = RecordingSurface::new(10, 10);
        paint(&mut surface, Vec2::ZERO, 0.0, (0.0, 100.0, 50.0), 1.0);
        paint(&mut surface, Vec2::ZERO, -2.0, (0.0, 100.0, 50.0), 1.0);
        paint(&mut surface, Vec2::ZERO, 2.0, (0.0, 100.0, 50.0), 0.0);
        paint(&mut surface, Vec2::ZERO, 2.0, (0.0, 100.0, 50.0), -0.5);
        paint(&mut surface, Vec2::ZERO, f32::NAN, (0.0, 100.0, 50.0), 1.0);
        assert!(surface.commands.is_empty());
    }

    #[test]
    fn test_paint_clamps_alpha() {
        let mut surface = RecordingSurface::new(10, 10);
        paint(&mut surface, Vec2::new(1.0, 2.0), 3.0, (0.0, 100.0, 50.0), 1.7);
        assert_eq!(
            surface.commands,
            vec![DrawCommand::Circle {
                center: Vec2::new(1.0, 2.0),
                radius: 3.0,
                color: (255, 0, 0),
                alpha: 1.0,
            }]
        );
    }
}
