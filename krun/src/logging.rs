//! libkrun's process-wide logger.
//!
//! libkrun installs a global logger the first time either [`init_log`] or
//! [`set_log_level`] succeeds. That is a once-per-process event: call one of
//! them before creating any [`Context`](crate::Context) and never again.
//! Reinitialization is unsupported. Later calls are still forwarded to
//! libkrun, whose behaviour for them is its own, and a warning is traced.
//!
//! The configuration that took effect is recorded here and can be read back
//! with [`active_log_config`].

use std::os::unix::io::RawFd;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::KrunResult;
use crate::status::check_status;

/// Verbosity of libkrun's own log output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum LogLevel {
    Off = libkrun_sys::KRUN_LOG_LEVEL_OFF,
    #[default]
    Error = libkrun_sys::KRUN_LOG_LEVEL_ERROR,
    Warn = libkrun_sys::KRUN_LOG_LEVEL_WARN,
    Info = libkrun_sys::KRUN_LOG_LEVEL_INFO,
    Debug = libkrun_sys::KRUN_LOG_LEVEL_DEBUG,
    Trace = libkrun_sys::KRUN_LOG_LEVEL_TRACE,
}

impl LogLevel {
    /// Pick a native level from a `RUST_LOG`-style filter.
    ///
    /// Understands bare levels (`debug`) and `krun=<level>` directives; anything
    /// else falls back to [`LogLevel::Error`].
    pub fn from_filter(filter: &str) -> Self {
        let directive = filter
            .split(',')
            .map(str::trim)
            .find_map(|d| d.strip_prefix("krun="))
            .or_else(|| filter.split(',').map(str::trim).find(|d| !d.contains('=')))
            .unwrap_or("");

        match directive.to_lowercase().as_str() {
            "off" => LogLevel::Off,
            "warn" => LogLevel::Warn,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Error, // Default: only show errors
        }
    }

    /// [`LogLevel::from_filter`] applied to `RUST_LOG`.
    pub fn from_env() -> Self {
        std::env::var("RUST_LOG")
            .map(|filter| Self::from_filter(&filter))
            .unwrap_or_default()
    }
}

/// Whether libkrun emits terminal escape sequences.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum LogStyle {
    #[default]
    Auto = libkrun_sys::KRUN_LOG_STYLE_AUTO,
    Always = libkrun_sys::KRUN_LOG_STYLE_ALWAYS,
    Never = libkrun_sys::KRUN_LOG_STYLE_NEVER,
}

/// Where libkrun writes its log.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogTarget {
    /// libkrun's default (stderr).
    #[default]
    Default,
    Fd(RawFd),
}

impl LogTarget {
    fn as_raw(self) -> RawFd {
        match self {
            LogTarget::Default => libkrun_sys::KRUN_LOG_TARGET_DEFAULT,
            LogTarget::Fd(fd) => fd,
        }
    }
}

/// Arguments to [`init_log`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub target: LogTarget,
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub style: LogStyle,
    /// Stop environment variables from overriding these settings.
    #[serde(default)]
    pub no_env: bool,
}

impl LogConfig {
    fn options(&self) -> u32 {
        if self.no_env {
            libkrun_sys::KRUN_LOG_OPTION_NO_ENV
        } else {
            0
        }
    }
}

static ACTIVE: OnceLock<LogConfig> = OnceLock::new();

/// The logging configuration that took effect in this process, if any.
pub fn active_log_config() -> Option<&'static LogConfig> {
    ACTIVE.get()
}

fn record(config: LogConfig) {
    if ACTIVE.set(config).is_err() {
        tracing::warn!(
            ?config,
            "libkrun logging was already initialized; reinitialization is unsupported"
        );
    }
}

/// Initialize libkrun logging with an explicit target, level and style.
pub fn init_log(config: &LogConfig) -> KrunResult<()> {
    tracing::trace!(
        target_fd = config.target.as_raw(),
        level = ?config.level,
        style = ?config.style,
        options = config.options(),
        "Calling krun_init_log"
    );
    check_status("krun_init_log", unsafe {
        libkrun_sys::krun_init_log(
            config.target.as_raw(),
            config.level as u32,
            config.style as u32,
            config.options(),
        )
    })?;
    record(*config);
    Ok(())
}

/// Set libkrun's log level, initializing its logger with default target and
/// style on first use.
pub fn set_log_level(level: LogLevel) -> KrunResult<()> {
    tracing::trace!(?level, "Calling krun_set_log_level");
    check_status("krun_set_log_level", unsafe {
        libkrun_sys::krun_set_log_level(level as u32)
    })?;
    record(LogConfig {
        level,
        ..LogConfig::default()
    });
    Ok(())
}
