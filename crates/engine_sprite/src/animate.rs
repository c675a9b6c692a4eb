//! Frame advance and sheet lookup for animated sprites.

use std::time::Duration;

use engine_entity::{Animation, Sprite};
use engine_math::{Rect, UVec2};

/// Reasons a sprite cannot be animated or drawn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnimationError {
    /// The sprite refers to an animation it does not have.
    #[error("sprite has no animation named `{0}`")]
    UnknownAnimation(String),

    /// The animation never advances.
    #[error("animation `{0}` has a frame rate of zero")]
    ZeroFps(String),

    /// The animation has nothing to show.
    #[error("animation `{0}` has no frames")]
    NoFrames(String),

    /// The frame size does not divide the sheet into at least one frame.
    #[error("frame size {frame} does not fit a {sheet} sheet")]
    BadSheet {
        /// Frame size in pixels.
        frame: UVec2,
        /// Sheet size in pixels.
        sheet: UVec2,
    },
}

const SECOND: Duration = Duration::from_secs(1);

/// Advance `sprite` by `dt` and return the number of frames stepped.
///
/// Time accumulates in [`Sprite::frame_time`]; one frame is consumed for
/// every `1 / fps` of it. Stepping past the last frame continues into the
/// animation's `next` (or the same animation if it has none), carrying any
/// excess frames over.
///
/// # Errors
///
/// Fails without touching the sprite if the current animation is missing,
/// has no frames, or has a zero frame rate. If a follow-up animation is
/// missing or empty, the current animation loops instead and the error is
/// still returned.
pub fn advance(sprite: &mut Sprite, dt: Duration) -> Result<usize, AnimationError> {
    let anim = playable(sprite, &sprite.current)?;
    let fps = anim.fps;
    let step = anim
        .frame_period()
        .ok_or_else(|| AnimationError::ZeroFps(sprite.current.clone()))?;

    sprite.frame_time += dt;
    let mut steps = 0;
    while sprite
        .frame_time
        .checked_mul(fps)
        .is_none_or(|scaled| scaled >= SECOND)
    {
        sprite.frame_time -= step;
        sprite.frame += 1;
        steps += 1;
    }

    wrap(sprite)?;
    Ok(steps)
}

/// Bring `sprite.frame` back within the current animation, following
/// `next` links as each animation runs out.
fn wrap(sprite: &mut Sprite) -> Result<(), AnimationError> {
    loop {
        let (len, next) = {
            let anim = playable(sprite, &sprite.current)?;
            (anim.frames.len(), anim.next.clone())
        };
        if sprite.frame < len {
            return Ok(());
        }
        sprite.frame -= len;

        if let Some(next) = next
            && next != sprite.current
        {
            if let Err(e) = playable(sprite, &next) {
                sprite.frame %= len;
                return Err(e);
            }
            sprite.current = next;
        }
    }
}

fn playable<'a>(sprite: &'a Sprite, name: &str) -> Result<&'a Animation, AnimationError> {
    let anim = sprite
        .animations
        .get(name)
        .ok_or_else(|| AnimationError::UnknownAnimation(name.to_string()))?;
    if anim.frames.is_empty() {
        return Err(AnimationError::NoFrames(name.to_string()));
    }
    if anim.fps == 0 {
        return Err(AnimationError::ZeroFps(name.to_string()));
    }
    Ok(anim)
}

/// Normalised texture coordinates of sheet frame `frame`.
///
/// Frames are numbered left to right, then top to bottom. The returned
/// rectangle is in `[0, 1]` sheet space.
///
/// # Errors
///
/// Returns [`AnimationError::BadSheet`] if a frame is empty or wider or
/// taller than the sheet.
pub fn frame_rect(sprite: &Sprite, frame: u32) -> Result<Rect, AnimationError> {
    let columns = sprite.columns();
    if columns == 0 || sprite.frame_size.y == 0 || sprite.frame_size.y > sprite.sheet_size.y {
        return Err(AnimationError::BadSheet {
            frame: sprite.frame_size,
            sheet: sprite.sheet_size,
        });
    }
    let w = sprite.frame_size.x as f32 / sprite.sheet_size.x as f32;
    let h = sprite.frame_size.y as f32 / sprite.sheet_size.y as f32;
    Ok(Rect::new(
        w * (frame % columns) as f32,
        h * (frame / columns) as f32,
        w,
        h,
    ))
}
