use anyhow::Context as _;
use clap::Args;
use krun::{LogConfig, LogLevel};
use tracing_subscriber::EnvFilter;

/// Flags accepted by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalFlags {
    /// Log filter for krunctl itself, e.g. "debug" or "krun=trace" (overrides RUST_LOG)
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Verbosity of libkrun's own log: off, error, warn, info, debug, trace
    #[arg(long, global = true, env = "KRUN_LOG_LEVEL", value_name = "LEVEL")]
    pub krun_log_level: Option<String>,
}

impl GlobalFlags {
    /// Install the stderr tracing subscriber. Defaults to `warn`.
    pub fn init_tracing(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        };

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    /// Native level from `--krun-log-level`, falling back to `RUST_LOG`.
    pub fn native_log_level(&self) -> LogLevel {
        match &self.krun_log_level {
            Some(level) => LogLevel::from_filter(level),
            None => LogLevel::from_env(),
        }
    }

    /// Initialize libkrun logging. Must run before the first context is created.
    pub fn init_native_logging(&self) -> anyhow::Result<()> {
        let config = LogConfig {
            level: self.native_log_level(),
            ..LogConfig::default()
        };
        tracing::debug!(?config, "Initializing libkrun logging");
        krun::logging::init_log(&config).context("Failed to initialize libkrun logging")
    }
}
