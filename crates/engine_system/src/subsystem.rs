//! The subsystem contract.

use std::time::Duration;

use engine_entity::EntityStore;

/// A unit of behaviour driven by the runtime.
///
/// A subsystem is registered on exactly one [`RateTier`](crate::RateTier). It
/// receives [`update`](Subsystem::update) on that tier's cadence and, like
/// every registered subsystem, [`draw`](Subsystem::draw) once per render
/// tick after that tick's updates.
///
/// The store borrow is only valid for the duration of the call. Calls are
/// never concurrent with each other.
pub trait Subsystem: Send {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Advance subsystem state by `dt`, the wall time since this tier last
    /// fired. Entities lacking the components this subsystem needs should be
    /// skipped rather than treated as an error.
    fn update(&mut self, dt: Duration, store: &mut EntityStore);

    /// Hand the current state to an external collaborator (renderer, audio).
    /// Must not change anything `update` depends on.
    fn draw(&mut self, store: &EntityStore) {
        let _ = store;
    }
}
