//! Logging configuration and initialization.
//!
//! Log targets used across the workspace:
//! - `trainerd::startup`: configuration and listener setup
//! - `trainerd::session`: session lifecycle and detail-view selection
//! - `trainerd::router`: inbound device frames
//! - `trainerd::dispatch`: outbound commands
//! - `trainerd::ws`: device and observer sockets (`trainerd::ws::drop` for unreliable drops)
//! - `trainerd::api`: operator HTTP API
//!
//! `RUST_LOG`, when set, replaces everything configured here.

use clap::ValueEnum;
use std::collections::BTreeMap;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const TARGET_ROOT: &str = "trainerd";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Verbosity preset selected by CLI flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Lifecycle events, warnings and errors; per-frame routing stays quiet.
    #[default]
    Production,
    /// Adds per-command dispatch and catalog updates.
    Verbose,
    /// Everything at debug except unreliable-drop noise.
    Debug,
    /// Every frame in both directions.
    Trace,
    /// Warnings and errors only.
    Quiet,
}

impl LogPreset {
    fn directives(self) -> Vec<String> {
        let pairs: &[(&str, &str)] = match self {
            LogPreset::Production => &[
                ("trainerd::startup", "info"),
                ("trainerd::session", "info"),
                ("trainerd::api", "info"),
                ("trainerd::ws", "info"),
                ("trainerd::ws::drop", "off"),
                ("trainerd::router", "warn"),
                ("trainerd::dispatch", "warn"),
                ("tower_http", "warn"),
            ],
            LogPreset::Verbose => &[
                ("trainerd", "info"),
                ("trainerd::router", "debug"),
                ("trainerd::dispatch", "debug"),
                ("trainerd::ws::drop", "off"),
                ("tower_http", "info"),
            ],
            LogPreset::Debug => &[
                ("trainerd", "debug"),
                ("trainerd::ws::drop", "off"),
                ("tower_http", "debug"),
            ],
            LogPreset::Trace => &[("trainerd", "trace"), ("tower_http", "trace")],
            LogPreset::Quiet => &[("trainerd", "warn"), ("tower_http", "error")],
        };
        pairs
            .iter()
            .map(|(target, level)| format!("{}={}", target, level))
            .collect()
    }
}

/// Logging configuration built from CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub preset: LogPreset,
    /// Per-target overrides, applied after the preset.
    pub overrides: BTreeMap<String, Level>,
    pub format: LogFormat,
}

impl LogConfig {
    /// Build from CLI flags. When several preset flags are given, the quietest
    /// wins over the noisiest: quiet, then trace, debug, verbose.
    pub fn from_cli(
        verbose: bool,
        debug: bool,
        trace: bool,
        quiet: bool,
        log_overrides: &[String],
        format: LogFormat,
    ) -> Self {
        let preset = match (quiet, trace, debug, verbose) {
            (true, ..) => LogPreset::Quiet,
            (_, true, ..) => LogPreset::Trace,
            (_, _, true, _) => LogPreset::Debug,
            (_, _, _, true) => LogPreset::Verbose,
            _ => LogPreset::Production,
        };

        Self {
            preset,
            overrides: parse_overrides(log_overrides),
            format,
        }
    }

    /// Build the filter, preferring `RUST_LOG` when it is set and valid.
    pub fn build_filter(&self) -> EnvFilter {
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }
        EnvFilter::try_new(self.directive_string()).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn directive_string(&self) -> String {
        let mut directives = self.preset.directives();
        directives.extend(
            self.overrides
                .iter()
                .map(|(target, level)| format!("{}={}", target, level.as_str().to_lowercase())),
        );
        directives.join(",")
    }
}

/// Parse `target=level` pairs; entries may also be comma-separated.
///
/// Short targets are placed under `trainerd::` (`router=debug` ->
/// `trainerd::router=debug`). Entries with an unknown level are skipped.
fn parse_overrides(raw: &[String]) -> BTreeMap<String, Level> {
    raw.iter()
        .flat_map(|entry| entry.split(','))
        .filter_map(|part| {
            let (target, level) = part.split_once('=')?;
            let target = target.trim();
            let level: Level = level.trim().parse().ok()?;

            let full_target = if target == TARGET_ROOT
                || target.starts_with("trainerd::")
                || target == "tower_http"
            {
                target.to_string()
            } else {
                format!("{}::{}", TARGET_ROOT, target)
            };
            Some((full_target, level))
        })
        .collect()
}

/// Install the global tracing subscriber.
pub fn init(config: &LogConfig) {
    let filter = config.build_filter();

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
    }
}
