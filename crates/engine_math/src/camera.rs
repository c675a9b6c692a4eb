//! 2D camera.
//!
//! A [`Camera`] selects an in-world rectangle to be drawn onto an on-screen
//! rectangle of [`Screen`] size. Zooming scales the world rectangle about its
//! centre; focusing moves the centre without changing the size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::rect::Rect;

/// Size of the output surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Screen {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Screen {
    /// Create a screen of the given pixel size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Maps an in-world rectangle onto the screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// The visible region of the world.
    pub world: Rect,
    /// The surface the world region is drawn to.
    pub screen: Screen,
}

impl Camera {
    /// A camera showing the world one unit per pixel, with the world origin
    /// at the top-left of the screen.
    #[must_use]
    pub fn pixel_perfect(screen: Screen) -> Self {
        Self {
            world: Rect::new(0.0, 0.0, screen.width as f32, screen.height as f32),
            screen,
        }
    }

    /// Relative zoom. `rel_zoom > 1` shrinks the world rectangle (zooming
    /// in), `rel_zoom < 1` grows it. The centre stays fixed.
    ///
    /// Non-positive or non-finite factors are ignored.
    pub fn zoom(&mut self, rel_zoom: f32) {
        if !(rel_zoom.is_finite() && rel_zoom > 0.0) {
            return;
        }
        let old = self.world.size();
        self.world.width /= rel_zoom;
        self.world.height /= rel_zoom;
        self.world.x -= (self.world.width - old.x) / 2.0;
        self.world.y -= (self.world.height - old.y) / 2.0;
    }

    /// The centre of the in-world rectangle.
    #[must_use]
    pub fn focus(&self) -> Vec2 {
        self.world.center()
    }

    /// Move the in-world rectangle so that its centre is `focus`.
    pub fn set_focus(&mut self, focus: Vec2) {
        self.world.x = focus.x - self.world.width / 2.0;
        self.world.y = focus.y - self.world.height / 2.0;
    }

    /// Screen pixels per world unit along each axis.
    #[must_use]
    pub fn scale(&self) -> Vec2 {
        Vec2::new(
            self.screen.width as f32 / self.world.width,
            self.screen.height as f32 / self.world.height,
        )
    }

    /// Convert a world-space point to screen pixels.
    #[must_use]
    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        (point - self.world.origin()) * self.scale()
    }

    /// Convert a world-space rectangle to a screen-space rectangle.
    #[must_use]
    pub fn rect_to_screen(&self, rect: &Rect) -> Rect {
        Rect::from_origin_size(
            self.world_to_screen(rect.origin()),
            rect.size() * self.scale(),
        )
    }

    /// Returns `true` if any part of `rect` is within the camera's view.
    #[must_use]
    pub fn sees(&self, rect: &Rect) -> bool {
        self.world.intersects(rect)
    }
}
