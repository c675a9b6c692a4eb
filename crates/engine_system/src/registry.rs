//! System registry: the registered subsystems and their rate tiers.
//!
//! Subsystems are kept in registration order. Each tier keeps its own ordered
//! list of indices into that sequence, so a tier update visits only its own
//! subsystems while a draw pass visits all of them, both in registration
//! order.

use std::time::Duration;

use engine_entity::EntityStore;
use tracing::{debug, info};

use crate::subsystem::Subsystem;
use crate::tier::RateTier;

/// A registered subsystem and the tier it was registered on.
struct Registration {
    name: String,
    tier: RateTier,
    system: Box<dyn Subsystem>,
}

/// Registry of every subsystem known to the runtime.
#[derive(Default)]
pub struct SystemRegistry {
    /// All subsystems, in registration order.
    systems: Vec<Registration>,
    /// Per-tier indices into `systems`, in registration order.
    tiers: [Vec<usize>; RateTier::COUNT],
}

impl SystemRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subsystem on `tier`. It is appended after every subsystem
    /// already registered.
    pub fn register(&mut self, tier: RateTier, system: Box<dyn Subsystem>) {
        let name = system.name().to_string();
        let index = self.systems.len();
        self.tiers[tier.index()].push(index);
        info!(subsystem = %name, %tier, index, "registered subsystem");
        self.systems.push(Registration { name, tier, system });
    }

    /// Call `update` on every subsystem registered on `tier`, in
    /// registration order. Returns how many were called.
    pub fn update(&mut self, tier: RateTier, dt: Duration, store: &mut EntityStore) -> usize {
        let indices = &self.tiers[tier.index()];
        for &index in indices {
            let registration = &mut self.systems[index];
            debug!(subsystem = %registration.name, %tier, ?dt, "update");
            registration.system.update(dt, store);
        }
        indices.len()
    }

    /// Call `draw` on every registered subsystem, in registration order.
    /// Returns how many were called.
    pub fn draw(&mut self, store: &EntityStore) -> usize {
        for registration in &mut self.systems {
            registration.system.draw(store);
        }
        self.systems.len()
    }

    /// Returns the total number of registered subsystems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Returns the number of subsystems registered on `tier`.
    #[must_use]
    pub fn tier_count(&self, tier: RateTier) -> usize {
        self.tiers[tier.index()].len()
    }

    /// Returns `(name, tier)` for every subsystem, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, RateTier)> {
        self.systems.iter().map(|r| (r.name.as_str(), r.tier))
    }
}

impl std::fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
