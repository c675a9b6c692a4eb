//! The runtime loop.
//!
//! [`Runtime`] is the explicit context object of a simulation: it owns the
//! [`EntityStore`], the [`SystemRegistry`], and one [`TierClock`] per
//! [`RateTier`]. [`Runtime::run`] multiplexes the tier clocks into a single
//! loop that handles one event at a time:
//!
//! 1. Wait for the next control command or clock fire. Simultaneous events
//!    are taken in a fixed priority: commands, then `Fast`, `Normal`, `Slow`.
//! 2. On a tier fire, measure the time since that tier's previous fire. The
//!    first fire of each tier only primes its clock.
//! 3. Update every subsystem on the tier, in registration order.
//! 4. If the tier is the render tier, draw every subsystem, in registration
//!    order.
//!
//! Control from outside the loop (and from inside subsystems) goes through a
//! cloneable [`RuntimeHandle`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Duration;

use engine_entity::EntityStore;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::clock::{TierClock, TierStats};
use crate::config::SchedulerConfig;
use crate::error::{ConfigError, RuntimeError};
use crate::registry::SystemRegistry;
use crate::subsystem::Subsystem;
use crate::tier::RateTier;

/// Lifecycle state of a [`Runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    /// Not running. Initial and final state.
    Stopped = 0,
    /// Inside [`Runtime::run`], processing ticks.
    Running = 1,
    /// Quit observed; tearing down.
    Stopping = 2,
}

impl RunState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Stopping,
            _ => Self::Stopped,
        }
    }
}

/// Requests delivered to the loop through a [`RuntimeHandle`].
enum Command {
    /// Wake the loop so it observes the quit flag.
    Quit,
    SetSpeed(RateTier, Duration),
    AddSubsystem(RateTier, Box<dyn Subsystem>),
}

#[derive(Debug)]
struct Shared {
    quit: AtomicBool,
    state: AtomicU8,
}

/// Cloneable control handle for a [`Runtime`].
///
/// Safe to use before, during, and after a run, from any thread, including
/// from inside a subsystem's `update`. Requests made during a run are applied
/// between ticks, never in the middle of one.
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    shared: Arc<Shared>,
    commands: mpsc::UnboundedSender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quit => f.write_str("Quit"),
            Self::SetSpeed(tier, interval) => write!(f, "SetSpeed({tier}, {interval:?})"),
            Self::AddSubsystem(tier, system) => {
                write!(f, "AddSubsystem({tier}, {})", system.name())
            }
        }
    }
}

impl RuntimeHandle {
    /// Ask the loop to stop after the current tick.
    ///
    /// Idempotent. If called before [`Runtime::run`], that run stops as soon
    /// as it starts.
    pub fn quit(&self) {
        if !self.shared.quit.swap(true, Ordering::SeqCst) {
            // Nothing is listening once the runtime is dropped.
            let _ = self.commands.send(Command::Quit);
        }
    }

    /// Returns `true` once a quit has been requested and not yet served.
    #[must_use]
    pub fn is_quitting(&self) -> bool {
        self.shared.quit.load(Ordering::SeqCst)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RunState {
        RunState::from_u8(self.shared.state.load(Ordering::SeqCst))
    }

    /// Change the interval of `tier`. See [`TierClock::set_period`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroInterval`] if `interval` is zero.
    pub fn set_speed(&self, tier: RateTier, interval: Duration) -> Result<(), ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::ZeroInterval(tier));
        }
        let _ = self.commands.send(Command::SetSpeed(tier, interval));
        Ok(())
    }

    /// Register a subsystem on `tier`. It takes part from the next tick on.
    pub fn add_subsystem(&self, tier: RateTier, subsystem: impl Subsystem + 'static) {
        let _ = self
            .commands
            .send(Command::AddSubsystem(tier, Box::new(subsystem)));
    }

    fn set_state(&self, state: RunState) {
        self.shared.state.store(state as u8, Ordering::SeqCst);
    }
}

/// Owns the simulation state and drives it from the tier clocks.
#[derive(Debug)]
pub struct Runtime {
    /// The canonical entity state.
    entities: EntityStore,
    /// Registered subsystems.
    systems: SystemRegistry,
    /// One clock per tier, indexed by [`RateTier::index`].
    clocks: [TierClock; RateTier::COUNT],
    /// The tier whose ticks are followed by a draw pass.
    render_tier: RateTier,
    handle: RuntimeHandle,
    commands: mpsc::UnboundedReceiver<Command>,
}

impl Runtime {
    /// Create a stopped runtime with an empty store and no subsystems.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroInterval`] if any tier interval is zero.
    pub fn new(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let [slow, normal, fast] = RateTier::ALL;
        let clocks = [
            TierClock::new(slow, config.interval(slow))?,
            TierClock::new(normal, config.interval(normal))?,
            TierClock::new(fast, config.interval(fast))?,
        ];
        Ok(Self::with_clocks(clocks, config.render_tier))
    }

    fn with_clocks(clocks: [TierClock; RateTier::COUNT], render_tier: RateTier) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            entities: EntityStore::new(),
            systems: SystemRegistry::new(),
            clocks,
            render_tier,
            handle: RuntimeHandle {
                shared: Arc::new(Shared {
                    quit: AtomicBool::new(false),
                    state: AtomicU8::new(RunState::Stopped as u8),
                }),
                commands: tx,
            },
            commands: rx,
        }
    }

    /// Returns a reference to the entity store.
    #[must_use]
    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    /// Returns a mutable reference to the entity store.
    pub fn entities_mut(&mut self) -> &mut EntityStore {
        &mut self.entities
    }

    /// Returns a reference to the subsystem registry.
    #[must_use]
    pub fn registry(&self) -> &SystemRegistry {
        &self.systems
    }

    /// Returns a control handle.
    #[must_use]
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.handle.state()
    }

    /// The tier whose ticks are followed by a draw pass.
    #[must_use]
    pub fn render_tier(&self) -> RateTier {
        self.render_tier
    }

    /// The clock of `tier`.
    #[must_use]
    pub fn clock(&self, tier: RateTier) -> &TierClock {
        &self.clocks[tier.index()]
    }

    /// Activity counters of `tier`.
    #[must_use]
    pub fn stats(&self, tier: RateTier) -> TierStats {
        self.clock(tier).stats()
    }

    /// Register a subsystem on `tier`.
    pub fn add_subsystem(&mut self, tier: RateTier, subsystem: impl Subsystem + 'static) {
        self.systems.register(tier, Box::new(subsystem));
    }

    /// Change the interval of `tier`, keeping its last-fire timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroInterval`] if `interval` is zero.
    pub fn set_speed(&mut self, tier: RateTier, interval: Duration) -> Result<(), ConfigError> {
        self.clocks[tier.index()].set_period(interval, Instant::now())?;
        info!(%tier, ?interval, "tier speed changed");
        Ok(())
    }

    /// Request the loop to stop. See [`RuntimeHandle::quit`].
    pub fn quit(&self) {
        self.handle.quit();
    }

    /// Update every subsystem on `tier` with `dt`. Returns how many ran.
    pub fn update(&mut self, tier: RateTier, dt: Duration) -> usize {
        self.systems.update(tier, dt, &mut self.entities)
    }

    /// Draw every subsystem. Returns how many ran.
    pub fn draw(&mut self) -> usize {
        self.systems.draw(&self.entities)
    }

    /// Run the loop on the current tokio runtime until [`quit`](Self::quit)
    /// is requested, then stop all clocks.
    pub async fn run(&mut self) {
        self.handle.set_state(RunState::Running);
        info!(
            render_tier = %self.render_tier,
            subsystems = self.systems.system_count(),
            entities = self.entities.len(),
            "runtime starting"
        );

        let now = Instant::now();
        for clock in &mut self.clocks {
            clock.arm(now);
        }

        while !self.handle.is_quitting() {
            match self.next_event().await {
                Event::Command(command) => self.apply(command),
                Event::Tick(tier) => self.on_tick(tier, Instant::now()),
            }
        }

        self.handle.set_state(RunState::Stopping);
        self.teardown();
        self.handle.set_state(RunState::Stopped);
        info!("runtime stopped");
    }

    /// Run the loop to completion on a fresh single-threaded tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Io`] if the tokio runtime cannot be built.
    pub fn run_blocking(&mut self) -> Result<(), RuntimeError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        rt.block_on(self.run());
        Ok(())
    }

    async fn next_event(&mut self) -> Event {
        let [slow, normal, fast] = &mut self.clocks;
        tokio::select! {
            biased;
            command = self.commands.recv() => Event::Command(command),
            () = fast.tick() => Event::Tick(RateTier::Fast),
            () = normal.tick() => Event::Tick(RateTier::Normal),
            () = slow.tick() => Event::Tick(RateTier::Slow),
        }
    }

    fn on_tick(&mut self, tier: RateTier, now: Instant) {
        let clock = &mut self.clocks[tier.index()];
        let Some(dt) = clock.fire(now) else {
            debug!(%tier, "first tick, clock primed");
            return;
        };
        let budget = clock.period();

        let started = Instant::now();
        let updated = self.systems.update(tier, dt, &mut self.entities);
        let drawn = if tier == self.render_tier {
            self.systems.draw(&self.entities)
        } else {
            0
        };
        let elapsed = started.elapsed();

        debug!(%tier, ?dt, updated, drawn, "tick");

        if elapsed > budget {
            self.clocks[tier.index()].record_overrun();
            warn!(
                %tier,
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = budget.as_millis() as u64,
                "tick exceeded time budget"
            );
        }
    }

    fn apply(&mut self, command: Option<Command>) {
        match command {
            // The runtime holds a sender, so the channel never closes.
            None | Some(Command::Quit) => {}
            Some(Command::SetSpeed(tier, interval)) => {
                if let Err(e) = self.set_speed(tier, interval) {
                    warn!(%tier, %e, "ignored speed change");
                }
            }
            Some(Command::AddSubsystem(tier, system)) => self.systems.register(tier, system),
        }
    }

    /// Stop every clock and apply requests that arrived after the quit.
    fn teardown(&mut self) {
        for clock in &mut self.clocks {
            clock.disarm();
        }
        // A quit raised while draining stays pending for the next run.
        self.handle.shared.quit.store(false, Ordering::SeqCst);
        while let Ok(command) = self.commands.try_recv() {
            self.apply(Some(command));
        }
        info!("all tier clocks stopped");
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::with_clocks(
            RateTier::ALL.map(TierClock::with_default_period),
            RateTier::default(),
        )
    }
}

enum Event {
    Command(Option<Command>),
    Tick(RateTier),
}
