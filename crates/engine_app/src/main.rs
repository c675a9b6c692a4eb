//! # engine_app
//!
//! Demo driver for the multi-rate runtime. Builds a [`Runtime`] from a JSON
//! config file and command-line overrides, populates a small sprite scene,
//! and runs it until Ctrl-C or until `--run-for` elapses.
//!
//! Subsystems:
//!
//! * `motion` on the fast tier moves everything with a velocity.
//! * `sprites` on the normal tier animates sprites and logs draw passes.
//! * `census` on the slow tier logs a scene summary.

mod motion;
mod scene;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use engine_math::{Camera, Screen};
use engine_sprite::{LogSink, SpriteSystem};
use engine_system::{RateTier, Runtime, RuntimeHandle, SchedulerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use motion::MotionSystem;
use scene::{BOUNDS, Census};

#[derive(Debug, Parser)]
#[command(name = "engine_app", about = "Multi-rate entity runtime demo")]
struct Args {
    /// Path to a JSON scheduler config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Slow tier interval in milliseconds
    #[arg(long)]
    slow_ms: Option<u64>,

    /// Normal tier interval in milliseconds
    #[arg(long)]
    normal_ms: Option<u64>,

    /// Fast tier interval in milliseconds
    #[arg(long)]
    fast_ms: Option<u64>,

    /// Tier whose ticks are followed by a draw pass (slow, normal, fast)
    #[arg(long)]
    render_tier: Option<RateTier>,

    /// Number of moving entities to spawn
    #[arg(short, long, default_value_t = 8)]
    entities: usize,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    run_for: Option<u64>,
}

impl Args {
    /// Layer the command-line overrides over the config file or defaults.
    fn scheduler_config(&self) -> Result<SchedulerConfig> {
        let mut config = match &self.config {
            Some(path) => SchedulerConfig::from_path(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SchedulerConfig::default(),
        };
        let overrides = [
            (RateTier::Slow, self.slow_ms),
            (RateTier::Normal, self.normal_ms),
            (RateTier::Fast, self.fast_ms),
        ];
        for (tier, ms) in overrides {
            if let Some(ms) = ms {
                config = config.with_interval(tier, Duration::from_millis(ms));
            }
        }
        if let Some(tier) = self.render_tier {
            config = config.with_render_tier(tier);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Quit the runtime on Ctrl-C or once `run_for` has elapsed.
fn spawn_stopper(handle: RuntimeHandle, run_for: Option<Duration>) {
    tokio::spawn(async move {
        match run_for {
            Some(limit) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("interrupted"),
                    () = tokio::time::sleep(limit) => info!(?limit, "run time elapsed"),
                }
            }
            None => {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("interrupted");
                }
            }
        }
        handle.quit();
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    let args = Args::parse();
    let config = args.scheduler_config()?;
    info!(?config, "engine starting");

    let mut runtime = Runtime::new(config)?;
    let player = scene::populate(runtime.entities_mut(), args.entities);
    info!(%player, "player spawned");

    let mut camera = Camera::pixel_perfect(Screen::new(BOUNDS.width as u32, BOUNDS.height as u32));
    camera.zoom(1.25);
    runtime.add_subsystem(RateTier::Fast, MotionSystem::new().with_bounds(BOUNDS));
    runtime.add_subsystem(
        RateTier::Normal,
        SpriteSystem::new(LogSink::new()).with_camera(camera),
    );
    runtime.add_subsystem(RateTier::Slow, Census::default());

    spawn_stopper(runtime.handle(), args.run_for.map(Duration::from_secs));
    runtime.run().await;

    for tier in RateTier::ALL {
        let stats = runtime.stats(tier);
        info!(
            %tier,
            updates = stats.updates,
            overruns = stats.overruns,
            last_dt = ?stats.last_dt,
            "tier summary"
        );
    }
    info!(entities = runtime.entities().len(), "engine shut down");
    Ok(())
}
