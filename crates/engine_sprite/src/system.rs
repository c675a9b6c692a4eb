//! The sprite subsystem.

use std::time::Duration;

use engine_entity::{Entity, EntityStore, Position, Sprite};
use engine_math::{Camera, Rect};
use engine_system::Subsystem;
use tracing::debug;

use crate::animate::{self, AnimationError};
use crate::sink::{SpriteQuad, SpriteSink};

/// Animates sprites on update and submits them to a [`SpriteSink`] on draw.
///
/// Only entities with both a [`Position`] and a [`Sprite`] are drawn. A
/// sprite is drawn at its position with its frame size in world units. With
/// a camera attached, sprites outside its view are culled and each quad
/// carries its screen rectangle.
#[derive(Debug)]
pub struct SpriteSystem<S> {
    sink: S,
    camera: Option<Camera>,
}

impl<S: SpriteSink> SpriteSystem<S> {
    /// Create a sprite system drawing to `sink` without a camera.
    pub fn new(sink: S) -> Self {
        Self { sink, camera: None }
    }

    /// Attach a camera.
    #[must_use]
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    /// The attached camera.
    #[must_use]
    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// The attached camera, for zooming and focusing.
    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    /// The sink quads are submitted to.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Advance every sprite in `store` by `dt`. Returns the number of sprites
    /// that could be animated.
    pub fn animate(&self, store: &mut EntityStore, dt: Duration) -> usize {
        let mut animated = 0;
        for id in store.all() {
            let Some(sprite) = store.get_mut(id).and_then(Entity::get_mut::<Sprite>) else {
                continue;
            };
            match animate::advance(sprite, dt) {
                Ok(_) => animated += 1,
                Err(e) => debug!(entity = %id, error = %e, "sprite not animated"),
            }
        }
        animated
    }

    /// Submit every visible sprite in `store` to the sink. Returns the number
    /// of quads submitted.
    pub fn render(&mut self, store: &EntityStore) -> usize {
        self.sink.begin_frame();
        let mut submitted = 0;
        for entity in store.iter() {
            let (Some(pos), Some(sprite)) = (entity.get::<Position>(), entity.get::<Sprite>())
            else {
                continue;
            };
            match self.quad(entity, pos, sprite) {
                Ok(Some(quad)) => {
                    self.sink.submit(quad);
                    submitted += 1;
                }
                Ok(None) => {}
                Err(e) => debug!(entity = %entity.id(), error = %e, "sprite not drawn"),
            }
        }
        self.sink.end_frame(submitted);
        submitted
    }

    /// Build the quad for one entity, or `None` if the camera cannot see it.
    fn quad(
        &self,
        entity: &Entity,
        pos: &Position,
        sprite: &Sprite,
    ) -> Result<Option<SpriteQuad>, AnimationError> {
        let frame = sprite
            .current_frame()
            .ok_or_else(|| AnimationError::UnknownAnimation(sprite.current.clone()))?;
        let tex_rect = animate::frame_rect(sprite, frame)?;
        let world_rect = Rect::from_origin_size(pos.0, sprite.frame_size.as_vec2());

        let screen_rect = match &self.camera {
            Some(camera) if !camera.sees(&world_rect) => return Ok(None),
            Some(camera) => Some(camera.rect_to_screen(&world_rect)),
            None => None,
        };

        Ok(Some(SpriteQuad {
            entity: entity.id(),
            texture: sprite.texture.clone(),
            frame,
            tex_rect,
            world_rect,
            screen_rect,
        }))
    }
}

impl<S: SpriteSink> Subsystem for SpriteSystem<S> {
    fn name(&self) -> &str {
        "sprites"
    }

    fn update(&mut self, dt: Duration, store: &mut EntityStore) {
        self.animate(store, dt);
    }

    fn draw(&mut self, store: &EntityStore) {
        self.render(store);
    }
}
