//! # engine_sprite
//!
//! Sprite animation and draw submission for the runtime.
//!
//! [`SpriteSystem`] is a [`Subsystem`](engine_system::Subsystem). On update it
//! advances every [`Sprite`](engine_entity::Sprite)'s animation by the tier's
//! elapsed time. On draw it turns every positioned sprite into a
//! [`SpriteQuad`] (sheet texture coordinates plus world and screen bounds)
//! and hands it to a [`SpriteSink`].

pub mod animate;
pub mod sink;
pub mod system;

pub use animate::{AnimationError, advance, frame_rect};
pub use sink::{LogSink, SpriteQuad, SpriteSink};
pub use system::SpriteSystem;
