//! # engine_system
//!
//! Multi-rate scheduler and runtime loop.
//!
//! A [`Runtime`] owns the [`EntityStore`](engine_entity::EntityStore), a
//! [`SystemRegistry`] of [`Subsystem`]s, and one [`TierClock`] per
//! [`RateTier`]. While running it:
//!
//! 1. Fires each tier on its own interval, measuring real elapsed time.
//! 2. Updates the tier's subsystems in registration order.
//! 3. After each render-tier tick, draws every subsystem.
//! 4. Stops when [`RuntimeHandle::quit`] is called.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use engine_entity::EntityStore;
//! use engine_system::{RateTier, Runtime, SchedulerConfig, Subsystem};
//!
//! struct Ticker;
//!
//! impl Subsystem for Ticker {
//!     fn update(&mut self, dt: Duration, _store: &mut EntityStore) {
//!         println!("tick after {dt:?}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut runtime = Runtime::new(SchedulerConfig::default()).unwrap();
//!     runtime.add_subsystem(RateTier::Slow, Ticker);
//!
//!     let handle = runtime.handle();
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_secs(5)).await;
//!         handle.quit();
//!     });
//!     runtime.run().await;
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod registry;
pub mod runtime;
pub mod subsystem;
pub mod tier;

pub use clock::{TierClock, TierStats};
pub use config::SchedulerConfig;
pub use error::{ConfigError, RuntimeError};
pub use registry::SystemRegistry;
pub use runtime::{RunState, Runtime, RuntimeHandle};
pub use subsystem::Subsystem;
pub use tier::RateTier;
