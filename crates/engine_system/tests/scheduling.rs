//! End-to-end scheduling behaviour of the runtime loop, on tokio's paused
//! clock so every tick lands exactly on its deadline.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use engine_entity::{ComponentValue, EntityStore, Position};
use engine_system::{
    ConfigError, RateTier, RunState, Runtime, RuntimeHandle, SchedulerConfig, Subsystem,
};

type Log = Arc<Mutex<Vec<String>>>;

/// Logs every call and optionally quits the runtime after a number of
/// updates.
struct Recorder {
    name: &'static str,
    log: Log,
    updates: usize,
    quit_after: Option<(usize, RuntimeHandle)>,
}

impl Recorder {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            updates: 0,
            quit_after: None,
        }
    }

    fn quit_after(mut self, updates: usize, handle: RuntimeHandle) -> Self {
        self.quit_after = Some((updates, handle));
        self
    }
}

impl Subsystem for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn update(&mut self, dt: Duration, _store: &mut EntityStore) {
        self.updates += 1;
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:update:{}", self.name, dt.as_millis()));
        if let Some((limit, handle)) = &self.quit_after
            && self.updates >= *limit
        {
            handle.quit();
        }
    }

    fn draw(&mut self, _store: &EntityStore) {
        self.log.lock().unwrap().push(format!("{}:draw", self.name));
    }
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn quit_at(handle: RuntimeHandle, after: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        handle.quit();
    });
}

#[tokio::test(start_paused = true)]
async fn first_tick_primes_then_updates_with_elapsed_time() {
    let log = Log::default();
    let mut runtime = Runtime::default();
    let handle = runtime.handle();
    runtime.add_subsystem(
        RateTier::Normal,
        Recorder::new("sprites", &log).quit_after(3, handle),
    );

    runtime.run().await;

    assert_eq!(
        entries(&log),
        vec![
            "sprites:update:20",
            "sprites:draw",
            "sprites:update:20",
            "sprites:draw",
            "sprites:update:20",
            "sprites:draw",
        ]
    );
    let stats = runtime.stats(RateTier::Normal);
    assert_eq!(stats.fires, 4);
    assert_eq!(stats.updates, 3);
    assert_eq!(stats.last_dt, Some(Duration::from_millis(20)));
}

#[tokio::test(start_paused = true)]
async fn render_tick_draws_every_subsystem_after_updates() {
    let log = Log::default();
    let mut runtime = Runtime::default();
    runtime.add_subsystem(RateTier::Fast, Recorder::new("input", &log));
    runtime.add_subsystem(RateTier::Slow, Recorder::new("audio", &log));
    quit_at(runtime.handle(), Duration::from_millis(45));

    runtime.run().await;

    assert_eq!(
        entries(&log),
        vec![
            "input:update:10",
            "input:update:10",
            "input:draw",
            "audio:draw",
            "input:update:10",
            "input:update:10",
            "input:draw",
            "audio:draw",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn fast_render_tier_draws_after_each_fast_tick() {
    let log = Log::default();
    let config = SchedulerConfig::default().with_render_tier(RateTier::Fast);
    let mut runtime = Runtime::new(config).unwrap();
    let handle = runtime.handle();
    runtime.add_subsystem(
        RateTier::Fast,
        Recorder::new("physics", &log).quit_after(2, handle),
    );

    runtime.run().await;

    assert_eq!(
        entries(&log),
        vec![
            "physics:update:10",
            "physics:draw",
            "physics:update:10",
            "physics:draw",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn tiers_fire_independently() {
    let log = Log::default();
    let mut runtime = Runtime::default();
    runtime.add_subsystem(RateTier::Slow, Recorder::new("save", &log));
    quit_at(runtime.handle(), Duration::from_millis(2505));

    runtime.run().await;

    let slow = runtime.stats(RateTier::Slow);
    assert_eq!(slow.fires, 3);
    assert_eq!(slow.updates, 2);
    assert_eq!(slow.last_dt, Some(Duration::from_secs(1)));
    assert_eq!(runtime.stats(RateTier::Normal).updates, 125);
    assert_eq!(runtime.stats(RateTier::Fast).updates, 250);

    let saves: Vec<_> = entries(&log)
        .into_iter()
        .filter(|e| e.starts_with("save:update"))
        .collect();
    assert_eq!(saves, vec!["save:update:1000", "save:update:1000"]);
}

/// Doubles as a speed controller: slows its own tier after two updates.
struct Throttle {
    dts: Arc<Mutex<Vec<Duration>>>,
    handle: RuntimeHandle,
}

impl Subsystem for Throttle {
    fn update(&mut self, dt: Duration, _store: &mut EntityStore) {
        let mut dts = self.dts.lock().unwrap();
        dts.push(dt);
        match dts.len() {
            2 => self
                .handle
                .set_speed(RateTier::Normal, Duration::from_millis(50))
                .unwrap(),
            4 => self.handle.quit(),
            _ => {}
        }
    }
}

#[tokio::test(start_paused = true)]
async fn set_speed_mid_run_measures_from_last_fire() {
    let dts = Arc::new(Mutex::new(Vec::new()));
    let mut runtime = Runtime::default();
    let handle = runtime.handle();
    runtime.add_subsystem(
        RateTier::Normal,
        Throttle {
            dts: Arc::clone(&dts),
            handle,
        },
    );

    runtime.run().await;

    let ms: Vec<u128> = dts.lock().unwrap().iter().map(Duration::as_millis).collect();
    assert_eq!(ms, vec![20, 20, 50, 50]);
    assert_eq!(
        runtime.clock(RateTier::Normal).period(),
        Duration::from_millis(50)
    );
}

#[tokio::test(start_paused = true)]
async fn set_speed_before_run_applies_from_start() {
    let log = Log::default();
    let mut runtime = Runtime::default();
    runtime
        .set_speed(RateTier::Normal, Duration::from_millis(40))
        .unwrap();
    let handle = runtime.handle();
    runtime.add_subsystem(
        RateTier::Normal,
        Recorder::new("sprites", &log).quit_after(1, handle),
    );

    runtime.run().await;

    assert_eq!(entries(&log), vec!["sprites:update:40", "sprites:draw"]);
}

#[test]
fn zero_speed_is_rejected() {
    let mut runtime = Runtime::default();
    assert!(matches!(
        runtime.set_speed(RateTier::Fast, Duration::ZERO),
        Err(ConfigError::ZeroInterval(RateTier::Fast))
    ));
    assert!(
        runtime
            .handle()
            .set_speed(RateTier::Slow, Duration::ZERO)
            .is_err()
    );
    assert_eq!(
        runtime.clock(RateTier::Fast).period(),
        Duration::from_millis(10)
    );
}

/// Registers a second subsystem from inside the loop on its first update.
struct Spawner {
    log: Log,
    handle: RuntimeHandle,
    updates: usize,
}

impl Subsystem for Spawner {
    fn update(&mut self, _dt: Duration, _store: &mut EntityStore) {
        self.updates += 1;
        self.log
            .lock()
            .unwrap()
            .push(format!("spawner:update:{}", self.updates));
        match self.updates {
            1 => self
                .handle
                .add_subsystem(RateTier::Normal, Recorder::new("late", &self.log)),
            3 => self.handle.quit(),
            _ => {}
        }
    }
}

#[tokio::test(start_paused = true)]
async fn add_subsystem_through_handle_joins_next_tick() {
    let log = Log::default();
    let mut runtime = Runtime::default();
    let handle = runtime.handle();
    runtime.add_subsystem(
        RateTier::Normal,
        Spawner {
            log: Arc::clone(&log),
            handle,
            updates: 0,
        },
    );

    runtime.run().await;

    assert_eq!(runtime.registry().system_count(), 2);
    assert_eq!(
        entries(&log),
        vec![
            "spawner:update:1",
            "spawner:update:2",
            "late:update:20",
            "late:draw",
            "spawner:update:3",
            "late:update:20",
            "late:draw",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn quit_before_run_returns_immediately() {
    let log = Log::default();
    let mut runtime = Runtime::default();
    runtime.add_subsystem(RateTier::Fast, Recorder::new("input", &log));

    runtime.quit();
    runtime.quit();
    let started = tokio::time::Instant::now();
    runtime.run().await;

    assert_eq!(started.elapsed(), Duration::ZERO);
    assert!(entries(&log).is_empty());
    assert_eq!(runtime.state(), RunState::Stopped);
    assert!(!runtime.handle().is_quitting());
    for tier in RateTier::ALL {
        assert!(!runtime.clock(tier).is_armed());
    }
}

#[tokio::test(start_paused = true)]
async fn runtime_can_run_again_after_quit() {
    let log = Log::default();
    let mut runtime = Runtime::default();
    runtime.add_subsystem(RateTier::Normal, Recorder::new("sprites", &log));

    quit_at(runtime.handle(), Duration::from_millis(25));
    runtime.run().await;
    quit_at(runtime.handle(), Duration::from_millis(25));
    runtime.run().await;

    assert_eq!(
        entries(&log),
        vec![
            "sprites:update:20",
            "sprites:draw",
            "sprites:update:20",
            "sprites:draw",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn state_is_running_inside_the_loop() {
    struct Observer {
        handle: RuntimeHandle,
        seen: Arc<Mutex<Vec<RunState>>>,
    }

    impl Subsystem for Observer {
        fn update(&mut self, _dt: Duration, _store: &mut EntityStore) {
            self.seen.lock().unwrap().push(self.handle.state());
            self.handle.quit();
        }
    }

    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut runtime = Runtime::default();
    let handle = runtime.handle();
    assert_eq!(handle.state(), RunState::Stopped);
    runtime.add_subsystem(
        RateTier::Fast,
        Observer {
            handle: handle.clone(),
            seen: Arc::clone(&seen),
        },
    );

    runtime.run().await;

    assert_eq!(*seen.lock().unwrap(), vec![RunState::Running]);
    assert_eq!(handle.state(), RunState::Stopped);
}

/// Moves every positioned entity one unit right per update.
struct Drift;

impl Subsystem for Drift {
    fn update(&mut self, _dt: Duration, store: &mut EntityStore) {
        for id in store.all() {
            if let Some(pos) = store.get_mut(id).and_then(|e| e.get_mut::<Position>()) {
                pos.0.x += 1.0;
            }
        }
    }
}

#[tokio::test(start_paused = true)]
async fn store_changes_survive_the_run() {
    let mut runtime = Runtime::default();
    let mover = runtime
        .entities_mut()
        .spawn_with([ComponentValue::from(Position::new(0.0, 0.0))]);
    let idle = runtime.entities_mut().spawn();
    runtime.add_subsystem(RateTier::Fast, Drift);
    quit_at(runtime.handle(), Duration::from_millis(55));

    runtime.run().await;

    let pos = runtime
        .entities()
        .get(mover)
        .and_then(|e| e.get::<Position>())
        .copied()
        .unwrap();
    assert_eq!(pos.0.x, 5.0);
    assert!(runtime.entities().contains(idle));
}

#[test]
fn run_blocking_with_pending_quit() {
    let mut runtime = Runtime::new(SchedulerConfig::default()).unwrap();
    runtime.quit();
    runtime.run_blocking().unwrap();
    assert_eq!(runtime.state(), RunState::Stopped);
}

#[test]
fn quit_from_another_thread() {
    let mut runtime = Runtime::default();
    let handle = runtime.handle();
    let quitter = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        handle.quit();
    });
    runtime.run_blocking().unwrap();
    quitter.join().unwrap();
    assert!(runtime.stats(RateTier::Fast).fires > 0);
}

/// Blocks the thread on every update, then quits after `limit` updates.
struct Sluggish {
    stall: Duration,
    updates: usize,
    limit: usize,
    handle: RuntimeHandle,
}

impl Subsystem for Sluggish {
    fn name(&self) -> &str {
        "sluggish"
    }

    fn update(&mut self, _dt: Duration, _store: &mut EntityStore) {
        std::thread::sleep(self.stall);
        self.updates += 1;
        if self.updates >= self.limit {
            self.handle.quit();
        }
    }
}

#[test]
fn slow_update_counts_as_overrun_on_its_tier_only() {
    let log = Log::default();
    let mut runtime = Runtime::default();
    let handle = runtime.handle();
    runtime.add_subsystem(RateTier::Fast, Recorder::new("input", &log));
    runtime.add_subsystem(
        RateTier::Normal,
        Sluggish {
            stall: Duration::from_millis(40),
            updates: 0,
            limit: 3,
            handle,
        },
    );

    runtime.run_blocking().unwrap();

    let normal = runtime.stats(RateTier::Normal);
    assert_eq!(normal.updates, 3);
    assert!(normal.overruns >= 1, "{normal:?}");
    assert!(runtime.stats(RateTier::Fast).updates > 0);
    assert_eq!(runtime.stats(RateTier::Fast).overruns, 0);
}

/// Quits the runtime when its name is first read, which happens as it is
/// registered.
struct QuitOnRegister(RuntimeHandle);

impl Subsystem for QuitOnRegister {
    fn name(&self) -> &str {
        self.0.quit();
        "quit-on-register"
    }

    fn update(&mut self, _dt: Duration, _store: &mut EntityStore) {}
}

#[tokio::test(start_paused = true)]
async fn quit_raised_while_stopping_carries_into_next_run() {
    let log = Log::default();
    let mut runtime = Runtime::default();
    let handle = runtime.handle();
    runtime.add_subsystem(RateTier::Fast, Recorder::new("input", &log));

    runtime.quit();
    handle.add_subsystem(RateTier::Slow, QuitOnRegister(handle.clone()));
    runtime.run().await;

    assert!(runtime.handle().is_quitting());
    assert_eq!(runtime.state(), RunState::Stopped);

    let started = tokio::time::Instant::now();
    runtime.run().await;

    assert_eq!(started.elapsed(), Duration::ZERO);
    assert!(entries(&log).is_empty());
    assert!(!runtime.handle().is_quitting());
}

#[test]
fn zero_interval_config_is_rejected() {
    let config = SchedulerConfig::default().with_interval(RateTier::Normal, Duration::ZERO);
    assert!(matches!(
        Runtime::new(config),
        Err(ConfigError::ZeroInterval(RateTier::Normal))
    ));
}
