//! Velocity integration.

use std::time::Duration;

use engine_entity::{EntityStore, Position, Velocity};
use engine_math::Rect;
use engine_system::Subsystem;

/// Moves every entity with a [`Position`] and a [`Velocity`] by
/// `velocity * dt`. With bounds set, positions wrap around the bounds.
#[derive(Debug, Default)]
pub struct MotionSystem {
    bounds: Option<Rect>,
}

impl MotionSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap positions that leave `bounds` back in from the opposite side.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Integrate one step. Returns the number of entities moved.
    pub fn step(&self, store: &mut EntityStore, dt: Duration) -> usize {
        let secs = dt.as_secs_f32();
        let mut moved = 0;
        for id in store.all() {
            let Some(entity) = store.get_mut(id) else {
                continue;
            };
            let Some(vel) = entity.get::<Velocity>().copied() else {
                continue;
            };
            let Some(pos) = entity.get_mut::<Position>() else {
                continue;
            };
            pos.0 += vel.0 * secs;
            if let Some(bounds) = &self.bounds
                && bounds.width > 0.0
                && bounds.height > 0.0
            {
                pos.0.x = bounds.x + (pos.0.x - bounds.x).rem_euclid(bounds.width);
                pos.0.y = bounds.y + (pos.0.y - bounds.y).rem_euclid(bounds.height);
            }
            moved += 1;
        }
        moved
    }
}

impl Subsystem for MotionSystem {
    fn name(&self) -> &str {
        "motion"
    }

    fn update(&mut self, dt: Duration, store: &mut EntityStore) {
        self.step(store, dt);
    }
}
