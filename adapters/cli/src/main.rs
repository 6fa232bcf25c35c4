#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Snake Portal headlessly.

mod config;
mod driver;
mod telemetry;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use snake_portal_core::SessionSnapshot;
use tracing::info;

use crate::{
    config::{FileConfig, Overrides, Settings},
    driver::Driver,
};

/// Runs a Snake Portal session without a window.
#[derive(Debug, Parser)]
#[command(name = "snake-portal", version)]
struct Cli {
    /// TOML file providing defaults for the flags below.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Seed for food placement and procedural levels. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of ticks to simulate.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_ticks: Option<u64>,
    /// Let the built-in autopilot steer the snake.
    #[arg(long)]
    autopilot: bool,
    /// Print the final snapshot as JSON instead of a summary line.
    #[arg(long)]
    json: bool,
    /// Tracing filter directives, e.g. `debug` or `snake_portal_world=trace`.
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,
    /// Pace ticks in wall-clock time at the session's speed.
    #[arg(long)]
    realtime: bool,
}

impl Cli {
    fn into_settings(self) -> Result<Settings> {
        let file = match self.config.as_deref() {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        let overrides = Overrides {
            seed: self.seed,
            max_ticks: self.max_ticks,
            autopilot: self.autopilot,
            log_filter: self.log_filter,
            json: self.json,
            realtime: self.realtime,
        };
        Ok(Settings::resolve(file, overrides))
    }
}

/// Entry point for the Snake Portal command-line interface.
fn main() -> Result<()> {
    let settings = Cli::parse()
        .into_settings()
        .context("failed to resolve run configuration")?;
    telemetry::init(settings.log_filter.as_deref())?;

    let seed = settings.seed.unwrap_or_else(rand::random);
    info!(
        seed,
        max_ticks = settings.max_ticks,
        autopilot = settings.autopilot,
        "starting session"
    );

    let snapshot = Driver::new(seed, settings.autopilot, settings.realtime).run(settings.max_ticks);

    if settings.json {
        let json =
            serde_json::to_string_pretty(&snapshot).context("failed to serialise snapshot")?;
        println!("{json}");
    } else {
        println!("{}", summary(&snapshot));
    }
    Ok(())
}

fn summary(snapshot: &SessionSnapshot) -> String {
    format!(
        "state={:?} level={} score={} apples={}/{} length={} ticks={}",
        snapshot.state,
        snapshot.level.get(),
        snapshot.score,
        snapshot.apples_eaten,
        snapshot.apples_per_level,
        snapshot.body.len(),
        snapshot.tick_index,
    )
}
