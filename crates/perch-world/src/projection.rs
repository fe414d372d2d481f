//! World-to-screen projection for presentation collaborators.
//!
//! Screen space has `y = 0` at the top, so projection flips the
//! vertical axis and scales by `height / world_height`.

use crate::entity::{Obstacle, PrimaryState};

/// An axis-aligned rectangle in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// Maps world coordinates onto a fixed-size screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Screen width in pixels. Default: 800.
    pub width: f32,
    /// Screen height in pixels. Default: 600.
    pub height: f32,
    /// World height mapped onto `height`. Default: 20.
    pub world_height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            world_height: 20.0,
        }
    }
}

impl Viewport {
    /// Pixels per world unit.
    pub fn scale(&self) -> f32 {
        self.height / self.world_height
    }

    /// Screen `y` for a world `y`.
    pub fn to_screen_y(&self, world_y: f32) -> f32 {
        self.height - world_y * self.scale()
    }

    /// Square of `size` pixels centred on the primary entity.
    pub fn primary_rect(&self, primary: &PrimaryState, size: f32) -> ScreenRect {
        ScreenRect {
            x: primary.x * self.scale() - size / 2.0,
            y: self.to_screen_y(primary.y) - size / 2.0,
            width: size,
            height: size,
        }
    }

    /// Top and bottom segments of an obstacle, `[top, bottom]`.
    pub fn obstacle_rects(&self, obstacle: &Obstacle, obstacle_width: f32) -> [ScreenRect; 2] {
        let scale = self.scale();
        let x = obstacle.x * scale;
        let width = obstacle_width * scale;

        let top_height = self.world_height - obstacle.gap_top();
        let top = ScreenRect {
            x,
            y: 0.0,
            width,
            height: top_height * scale,
        };

        let bottom_height = obstacle.gap_bottom();
        let bottom = ScreenRect {
            x,
            y: self.to_screen_y(bottom_height),
            width,
            height: bottom_height * scale,
        };

        [top, bottom]
    }

    /// Whether any part of `rect` lies on screen.
    pub fn is_visible(&self, rect: &ScreenRect) -> bool {
        rect.x + rect.width > 0.0 && rect.x < self.width
    }
}
