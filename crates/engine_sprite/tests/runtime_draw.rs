//! The sprite subsystem driven by the runtime loop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use engine_entity::{Animation, ComponentValue, Position, Sprite};
use engine_math::UVec2;
use engine_sprite::{SpriteQuad, SpriteSink, SpriteSystem};
use engine_system::{RateTier, Runtime};

/// Keeps the frame index of every quad of every pass.
#[derive(Default)]
struct History {
    passes: Vec<Vec<u32>>,
}

impl SpriteSink for History {
    fn begin_frame(&mut self) {
        self.passes.push(Vec::new());
    }

    fn submit(&mut self, quad: SpriteQuad) {
        if let Some(pass) = self.passes.last_mut() {
            pass.push(quad.frame);
        }
    }
}

#[tokio::test(start_paused = true)]
async fn sprites_advance_on_their_tier_and_draw_on_render_ticks() {
    let history = Arc::new(Mutex::new(History::default()));
    let mut runtime = Runtime::default();
    runtime.entities_mut().spawn_with([
        ComponentValue::from(Position::new(0.0, 0.0)),
        ComponentValue::from(
            Sprite::new("coin", UVec2::new(64, 16), UVec2::new(16, 16))
                .with_animation("spin", Animation::new(vec![0, 1, 2, 3], 25)),
        ),
    ]);
    runtime.add_subsystem(RateTier::Normal, SpriteSystem::new(Arc::clone(&history)));

    let handle = runtime.handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(205)).await;
        handle.quit();
    });
    runtime.run().await;

    // 25 fps on a 20 ms tier: one frame every other tick.
    let passes = history.lock().unwrap().passes.clone();
    assert_eq!(
        passes,
        vec![
            vec![0],
            vec![1],
            vec![1],
            vec![2],
            vec![2],
            vec![3],
            vec![3],
            vec![0],
            vec![0],
            vec![1],
        ]
    );
}
