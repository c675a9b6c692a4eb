//! # engine_math
//!
//! Math types for the simulation runtime. Re-exports [`glam`] for linear
//! algebra and defines the 2D spatial types shared by subsystems: axis-aligned
//! [`Rect`]s and the [`Camera`] that maps a world rectangle onto the screen.

pub mod camera;
pub mod rect;

// Re-export glam types for convenience.
pub use glam::{UVec2, Vec2};

pub use camera::{Camera, Screen};
pub use rect::Rect;
