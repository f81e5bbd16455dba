//! Diagnostic logging through `tracing-subscriber`.
//!
//! User-facing output goes through [`crate::output::Output`]; this only
//! controls the `tracing` events the storefront crates emit. Logs go to
//! stderr so `--json` output on stdout stays parseable.

use std::io;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: &[&str] = &[
    "storefront",
    "turbo_storefront",
    "turbo_fragment",
    "turbo_variants",
    "turbo_data",
];

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human format.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for the storefront crates.
    pub level: Level,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::default(),
            with_ansi: true,
            with_target: false,
        }
    }
}

impl LogConfig {
    /// Map the global `--verbose` / `--json` flags.
    ///
    /// Verbose raises our crates to debug and shows targets; JSON switches the
    /// format and drops colors.
    #[must_use]
    pub fn from_flags(verbose: bool, json: bool) -> Self {
        let mut config = Self::default();
        if verbose {
            config.level = Level::DEBUG;
            config.with_target = true;
        }
        if json {
            config.format = LogFormat::Json;
            config.with_ansi = false;
        }
        config
    }
}

/// Install the global subscriber. Call once at startup.
pub fn init(config: &LogConfig) {
    let filter = build_env_filter(config.level);

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(config.with_target),
            )
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .without_time()
                    .with_writer(io::stderr)
                    .with_ansi(config.with_ansi)
                    .with_target(config.with_target),
            )
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("logging already initialized: {}", e);
    }
}

/// `RUST_LOG` wins; otherwise our crates at `level`, everything else at warn.
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

fn default_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|krate| format!("{}={}", krate, level)));
    directives.join(",")
}
