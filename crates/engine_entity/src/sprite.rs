//! Sprite and animation components.
//!
//! A [`Sprite`] refers to a sprite sheet by texture name (texture loading is
//! handled outside the store), records how the sheet is cut into frames, and
//! carries the playback state advanced by the sprite subsystem.

use std::collections::BTreeMap;
use std::time::Duration;

use engine_math::UVec2;
use serde::{Deserialize, Serialize};

/// A named sequence of sheet frames played at a fixed rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    /// Sheet frame indices, in playback order.
    pub frames: Vec<u32>,
    /// Playback rate in frames per second.
    pub fps: u32,
    /// Animation to continue with once this one finishes. `None` loops.
    #[serde(default)]
    pub next: Option<String>,
}

impl Animation {
    /// A looping animation.
    #[must_use]
    pub fn new(frames: Vec<u32>, fps: u32) -> Self {
        Self {
            frames,
            fps,
            next: None,
        }
    }

    /// Continue with `next` after the last frame instead of looping.
    #[must_use]
    pub fn then(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    /// Time each frame is shown for. `None` if the rate is zero.
    #[must_use]
    pub fn frame_period(&self) -> Option<Duration> {
        (self.fps > 0).then(|| Duration::from_secs(1) / self.fps)
    }
}

/// An animated sprite drawn from a sprite sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    /// Name of the sheet texture, resolved by the renderer.
    pub texture: String,
    /// Size of the whole sheet in pixels.
    pub sheet_size: UVec2,
    /// Size of a single frame in pixels. Also the drawn size in world units.
    pub frame_size: UVec2,
    /// Animations available to this sprite, by name.
    pub animations: BTreeMap<String, Animation>,
    /// Name of the animation currently playing.
    pub current: String,
    /// Position within the current animation's frame list.
    pub frame: usize,
    /// Time accumulated towards the next frame.
    #[serde(default)]
    pub frame_time: Duration,
}

impl Sprite {
    /// A sprite with no animations yet.
    #[must_use]
    pub fn new(texture: impl Into<String>, sheet_size: UVec2, frame_size: UVec2) -> Self {
        Self {
            texture: texture.into(),
            sheet_size,
            frame_size,
            animations: BTreeMap::new(),
            current: String::new(),
            frame: 0,
            frame_time: Duration::ZERO,
        }
    }

    /// Add an animation. The first animation added becomes the current one.
    #[must_use]
    pub fn with_animation(mut self, name: impl Into<String>, animation: Animation) -> Self {
        let name = name.into();
        if self.animations.is_empty() {
            self.current = name.clone();
        }
        self.animations.insert(name, animation);
        self
    }

    /// The animation currently playing, if it exists.
    #[must_use]
    pub fn current_animation(&self) -> Option<&Animation> {
        self.animations.get(&self.current)
    }

    /// The sheet frame index currently shown.
    #[must_use]
    pub fn current_frame(&self) -> Option<u32> {
        self.current_animation()
            .and_then(|anim| anim.frames.get(self.frame))
            .copied()
    }

    /// Switch to the named animation from its first frame.
    ///
    /// Returns `false` and leaves playback untouched if no such animation
    /// exists.
    pub fn play(&mut self, name: &str) -> bool {
        if !self.animations.contains_key(name) {
            return false;
        }
        self.current = name.to_string();
        self.frame = 0;
        self.frame_time = Duration::ZERO;
        true
    }

    /// Number of frame columns in the sheet.
    #[must_use]
    pub fn columns(&self) -> u32 {
        if self.frame_size.x == 0 {
            0
        } else {
            self.sheet_size.x / self.frame_size.x
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walker() -> Sprite {
        Sprite::new("hero", UVec2::new(256, 64), UVec2::new(64, 64))
            .with_animation("walk", Animation::new(vec![0, 1, 2, 3], 8))
            .with_animation("idle", Animation::new(vec![0], 1))
    }

    #[test]
    fn test_first_animation_is_current() {
        let sprite = walker();
        assert_eq!(sprite.current, "walk");
        assert_eq!(sprite.current_frame(), Some(0));
        assert_eq!(sprite.columns(), 4);
    }

    #[test]
    fn test_play_resets_playback() {
        let mut sprite = walker();
        sprite.frame = 2;
        sprite.frame_time = Duration::from_millis(10);
        assert!(sprite.play("idle"));
        assert_eq!(sprite.current, "idle");
        assert_eq!(sprite.frame, 0);
        assert_eq!(sprite.frame_time, Duration::ZERO);
    }

    #[test]
    fn test_play_unknown_is_ignored() {
        let mut sprite = walker();
        sprite.frame = 1;
        assert!(!sprite.play("jump"));
        assert_eq!(sprite.current, "walk");
        assert_eq!(sprite.frame, 1);
    }

    #[test]
    fn test_frame_period() {
        assert_eq!(
            Animation::new(vec![0], 8).frame_period(),
            Some(Duration::from_millis(125))
        );
        assert_eq!(Animation::new(vec![0], 0).frame_period(), None);
    }

    #[test]
    fn test_zero_width_frames_have_no_columns() {
        let sprite = Sprite::new("bad", UVec2::new(64, 64), UVec2::ZERO);
        assert_eq!(sprite.columns(), 0);
    }
}
