//! Log output for `lila`.
//!
//! Composition events from `lila-core` are chatty (one per rule set and per
//! stack), so they run one level quieter than the CLI's own events: `-v`
//! shows session summaries, `-vv` every composition step, `-vvv` stack
//! assembly traces. `RUST_LOG` replaces the whole filter when set.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Levels for the CLI's own events and for `lila-core`.
fn levels(verbosity: u8) -> (LevelFilter, LevelFilter) {
    match verbosity {
        0 => (LevelFilter::INFO, LevelFilter::WARN),
        1 => (LevelFilter::DEBUG, LevelFilter::INFO),
        2 => (LevelFilter::TRACE, LevelFilter::DEBUG),
        _ => (LevelFilter::TRACE, LevelFilter::TRACE),
    }
}

fn filter(verbosity: u8) -> EnvFilter {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return from_env;
    }
    let (cli, core) = levels(verbosity);
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(format!("lila_cli={cli},lila_core={core}"))
}

/// Install the subscriber. Logs go to stderr so stdout stays pure JSON.
///
/// # Panics
/// Panics when a global subscriber is already installed.
pub fn init(verbosity: u8, json: bool) {
    let registry = tracing_subscriber::registry().with(filter(verbosity));
    let layer = fmt::layer().with_writer(std::io::stderr);

    if json {
        registry.with(layer.json().flatten_event(true)).init();
    } else {
        registry.with(layer.with_target(false).compact()).init();
    }
}
