//! Tracing subscriber setup for the `entity-feed` binary
//!
//! Logs go to stderr so that `--format json` and `--format csv` output on
//! stdout stays machine-readable.
//!
//! # Filter priority (highest to lowest)
//!
//! 1. `ENTITY_FEED_LOG` (e.g. `entity_feed::feed=trace,warn`)
//! 2. `RUST_LOG`
//! 3. CLI flags: `-q` → error, `-v` → debug, `-vv` → trace
//! 4. Default: `warn`

use std::io::IsTerminal;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Crate-specific filter variable
pub const LOG_ENV: &str = "ENTITY_FEED_LOG";

const CRATE_TARGET: &str = "entity_feed";

/// Verbosity level derived from CLI flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Trace,
}

impl Verbosity {
    /// `verbose` is the number of `-v` flags; it wins over `quiet`
    #[must_use]
    pub const fn from_flags(verbose: u8, quiet: bool) -> Self {
        match verbose {
            0 if quiet => Self::Quiet,
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    #[must_use]
    pub const fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive used when no environment variable is set
    ///
    /// Raised verbosity applies to this crate only; dependencies stay at `warn`.
    #[must_use]
    pub fn directive(self) -> String {
        match self {
            Self::Quiet | Self::Normal => self.default_level().to_string().to_lowercase(),
            Self::Verbose | Self::Trace => format!(
                "warn,{CRATE_TARGET}={}",
                self.default_level().to_string().to_lowercase()
            ),
        }
    }
}

/// Install the global subscriber
///
/// Later calls are ignored, so tests and embedders that already installed one
/// keep theirs.
pub fn init_subscriber(verbosity: Verbosity) {
    let filter = build_env_filter(verbosity);
    let use_ansi = std::io::stderr().is_terminal();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi)
        .with_target(true)
        .with_level(true);

    let result = if matches!(verbosity, Verbosity::Verbose | Verbosity::Trace) {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.with_timer(fmt::time::uptime()))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.without_time().compact())
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV)
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::try_new(verbosity.directive())
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_level().as_str()))
}
