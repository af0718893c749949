use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the tracing filter directives.
pub const LOG_FILTER_ENV: &str = "GRID_SNAKE_LOG";

const DEFAULT_FILTER: &str = "grid_snake=info";

/// Installs a subscriber writing plain-text events to `path`.
///
/// The terminal is owned by the game, so events never go to stdout/stderr.
pub fn init_file_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;

    tracing_subscriber::registry()
        .with(filter_from_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(io::Error::other)
}

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| DEFAULT_FILTER.into())
}
