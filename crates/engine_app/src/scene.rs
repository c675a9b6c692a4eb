//! Demo scene: a tagged player and a group of moving coins.

use std::time::Duration;

use engine_entity::{Animation, ComponentValue, EntityId, EntityStore, Position, Sprite, Velocity};
use engine_math::{Rect, UVec2, Vec2};
use engine_system::Subsystem;
use tracing::info;

/// Tag of the player entity.
pub const PLAYER: &str = "player";
/// Group of every moving coin.
pub const MOVERS: &str = "movers";

/// World area the demo plays in.
pub const BOUNDS: Rect = Rect::new(0.0, 0.0, 320.0, 240.0);

fn hero() -> Sprite {
    Sprite::new("hero", UVec2::new(128, 64), UVec2::new(32, 32))
        .with_animation("idle", Animation::new(vec![0, 1], 2))
        .with_animation("wave", Animation::new(vec![4, 5, 6, 7], 8).then("idle"))
}

fn coin() -> Sprite {
    Sprite::new("coin", UVec2::new(64, 16), UVec2::new(16, 16))
        .with_animation("spin", Animation::new(vec![0, 1, 2, 3], 12))
}

/// Spawn the player and `movers` coins into `store`. Returns the player.
pub fn populate(store: &mut EntityStore, movers: usize) -> EntityId {
    let center = BOUNDS.center();
    let mut player_sprite = hero();
    player_sprite.play("wave");
    let player = store.spawn_with([
        ComponentValue::from(Position(center)),
        ComponentValue::from(Velocity::ZERO),
        ComponentValue::from(player_sprite),
    ]);
    store.set_tag(player, PLAYER);

    for i in 0..movers {
        let angle = i as f32 * std::f32::consts::TAU / movers as f32;
        let heading = Vec2::from_angle(angle);
        let coin = store.spawn_with([
            ComponentValue::from(Position(center + heading * 64.0)),
            ComponentValue::from(Velocity(heading * 40.0)),
            ComponentValue::from(coin()),
        ]);
        store.set_group(coin, [MOVERS]);
    }

    info!(entities = store.len(), movers, "scene populated");
    player
}

/// Logs a summary of the scene on every update.
#[derive(Debug, Default)]
pub struct Census {
    reports: u64,
}

/// What [`Census`] logs.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Live entities in the store.
    pub entities: usize,
    /// Members of the [`MOVERS`] group.
    pub movers: usize,
    /// Position of the [`PLAYER`] entity, if it is still alive.
    pub player: Option<Vec2>,
}

impl Census {
    /// Summarise `store`.
    #[must_use]
    pub fn report(store: &EntityStore) -> Report {
        let player = store
            .tag_lookup(PLAYER)
            .and_then(|id| store.get(id))
            .and_then(|e| e.get::<Position>())
            .map(|p| p.0);
        Report {
            entities: store.len(),
            movers: store.group_lookup(MOVERS).len(),
            player,
        }
    }
}

impl Subsystem for Census {
    fn name(&self) -> &str {
        "census"
    }

    fn update(&mut self, dt: Duration, store: &mut EntityStore) {
        self.reports += 1;
        let report = Self::report(store);
        info!(
            report = self.reports,
            elapsed_ms = dt.as_millis() as u64,
            entities = report.entities,
            movers = report.movers,
            player = ?report.player,
            "census"
        );
    }
}
