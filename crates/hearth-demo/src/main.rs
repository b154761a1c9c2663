//! Desktop host for the hearth bridge.
//!
//! Opens a window, feeds its lifecycle into a [`hearth_bridge::Bridge`] and
//! lets a logging demo engine render "frames" into it.

mod config;
mod engine;
mod host;
mod pacing;

use anyhow::Context;
use hearth_bridge::logging::{init_logging, LoggingConfig};
use hearth_bridge::ENGINE_LIBRARY;

use config::DemoConfig;

fn main() -> anyhow::Result<()> {
    let config = DemoConfig::from_args(std::env::args().skip(1))?;

    let mut logging = LoggingConfig::default();
    if let Some(filter) = &config.log_filter {
        logging = logging.with_filter(filter.clone());
    }
    init_logging(logging);

    // The demo engine is pure Rust; there is nothing native to resolve.
    let outcome = ENGINE_LIBRARY
        .load(|| Ok(()))
        .context("failed to load engine library")?;
    log::debug!("engine library: {outcome:?}");

    log::info!(
        "starting hearth demo ({:?}, target fps {:?})",
        config.bridge.mode,
        config.target_fps
    );

    host::run(config)
}
