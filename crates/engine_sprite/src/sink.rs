//! Draw submission.
//!
//! The sprite subsystem does not render anything itself. Each draw pass it
//! hands one [`SpriteQuad`] per visible sprite to a [`SpriteSink`], which is
//! expected to forward them to a real renderer.

use std::sync::{Arc, Mutex};

use engine_entity::EntityId;
use engine_math::Rect;
use tracing::{debug, trace};

/// One sprite ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteQuad {
    /// The entity the sprite belongs to.
    pub entity: EntityId,
    /// Name of the sheet texture.
    pub texture: String,
    /// Sheet frame index.
    pub frame: u32,
    /// Normalised texture coordinates within the sheet.
    pub tex_rect: Rect,
    /// Bounds in world space.
    pub world_rect: Rect,
    /// Bounds in screen pixels, when drawing through a camera.
    pub screen_rect: Option<Rect>,
}

/// Receives the quads produced by a draw pass.
pub trait SpriteSink: Send {
    /// Called before the first quad of a pass.
    fn begin_frame(&mut self) {}

    /// Accept one quad.
    fn submit(&mut self, quad: SpriteQuad);

    /// Called after the last quad of a pass with the number submitted.
    fn end_frame(&mut self, submitted: usize) {
        let _ = submitted;
    }
}

/// Keeps the quads of the most recent pass.
impl SpriteSink for Vec<SpriteQuad> {
    fn begin_frame(&mut self) {
        self.clear();
    }

    fn submit(&mut self, quad: SpriteQuad) {
        self.push(quad);
    }
}

/// Shares a sink with code outside the runtime. A poisoned lock drops quads.
impl<S: SpriteSink> SpriteSink for Arc<Mutex<S>> {
    fn begin_frame(&mut self) {
        if let Ok(mut sink) = self.lock() {
            sink.begin_frame();
        }
    }

    fn submit(&mut self, quad: SpriteQuad) {
        if let Ok(mut sink) = self.lock() {
            sink.submit(quad);
        }
    }

    fn end_frame(&mut self, submitted: usize) {
        if let Ok(mut sink) = self.lock() {
            sink.end_frame(submitted);
        }
    }
}

/// Logs quads instead of drawing them. Used when no renderer is attached.
#[derive(Debug, Default)]
pub struct LogSink {
    frames: u64,
}

impl LogSink {
    /// Create a sink that has seen no frames.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed draw passes.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl SpriteSink for LogSink {
    fn submit(&mut self, quad: SpriteQuad) {
        trace!(
            entity = %quad.entity,
            texture = %quad.texture,
            frame = quad.frame,
            x = quad.world_rect.x,
            y = quad.world_rect.y,
            "sprite"
        );
    }

    fn end_frame(&mut self, submitted: usize) {
        self.frames += 1;
        debug!(frame = self.frames, sprites = submitted, "frame drawn");
    }
}
