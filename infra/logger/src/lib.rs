//! # Logger
//!
//! Installs the process-wide tracing subscriber for kvfs binaries.
//!
//! Console output goes to **stderr**, so a command's stdout carries nothing but its
//! data and can be piped safely. Colors are enabled only when stderr is a terminal.
//! File output is optional: a rolling appender writes through a non-blocking worker
//! into a directory, in plain text or JSON.
//!
//! Filtering starts from a default level, which [`LoggerBuilder::verbosity`] can raise,
//! and `RUST_LOG` overrides it unless an explicit [`LoggerBuilder::env_filter`] is set.
//!
//! ## Example
//!
//! ```rust
//! # use kvfs_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("kvfs")
//!     .level(LevelFilter::WARN)
//!     .verbosity(1)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::io::{self, IsTerminal};
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 7;
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    dir: Option<PathBuf>,
    level: LevelFilter,
    verbosity: u8,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            dir: None,
            level: LevelFilter::WARN,
            verbosity: 0,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }
}

impl LoggerConfig {
    /// The configured level raised by one step per verbosity count.
    fn effective_level(&self) -> LevelFilter {
        let ladder = [
            LevelFilter::OFF,
            LevelFilter::ERROR,
            LevelFilter::WARN,
            LevelFilter::INFO,
            LevelFilter::DEBUG,
            LevelFilter::TRACE,
        ];
        let base = ladder.iter().position(|l| *l == self.level).unwrap_or(2);
        let raised = base.saturating_add(usize::from(self.verbosity)).min(ladder.len() - 1);
        ladder[raised]
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);
#[derive(Debug)]
pub struct NoDir;
#[derive(Debug)]
pub struct WithDir;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}
impl Sealed for NoDir {}
impl Sealed for WithDir {}

/// Configures and installs the global tracing subscriber.
///
/// A name is required before [`init`](LoggerBuilder::init); file-only settings become
/// available after [`dir`](LoggerBuilder::dir).
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, D: Sealed = NoDir> {
    config: LoggerConfig,
    name: N,
    dir_state: PhantomData<D>,
}

impl<D: Sealed> LoggerBuilder<NoName, D> {
    /// Sets the logger name, also used as the log file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, D> {
        LoggerBuilder { config: self.config, name: WithName(name.into()), dir_state: PhantomData }
    }
}

impl<N: Sealed, D: Sealed> LoggerBuilder<N, D> {
    /// Sets the default level before verbosity is applied.
    #[must_use = "The builder must be finished with .init()"]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Raises the default level by one step per count (`-v`, `-vv`, ...).
    #[must_use = "The builder must be finished with .init()"]
    pub const fn verbosity(mut self, count: u8) -> Self {
        self.config.verbosity = count;
        self
    }

    /// Sets explicit filter directives (e.g. `kvfs=debug,kvfs_storage=trace`).
    ///
    /// An explicit filter takes precedence over `RUST_LOG`. Invalid directives make
    /// [`init`](LoggerBuilder::init) fail.
    #[must_use = "The builder must be finished with .init()"]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    #[must_use = "The builder must be finished with .init()"]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Enables file output into `dir`, which is created if missing.
    pub fn dir(self, dir: impl Into<PathBuf>) -> LoggerBuilder<N, WithDir> {
        let mut config = self.config;
        config.dir = Some(dir.into());
        LoggerBuilder { config, name: self.name, dir_state: PhantomData }
    }
}

impl<N: Sealed> LoggerBuilder<N, WithDir> {
    #[must_use = "The builder must be finished with .init()"]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    #[must_use = "The builder must be finished with .init()"]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Writes the log file as JSON lines. Console output stays human-readable.
    #[must_use = "The builder must be finished with .init()"]
    pub const fn json(mut self) -> Self {
        self.config.json = true;
        self
    }
}

impl<D: Sealed> LoggerBuilder<WithName, D> {
    /// Installs the global subscriber.
    ///
    /// The returned [`Logger`] owns the file writer's worker; keep it alive until the
    /// program exits so buffered lines are flushed.
    ///
    /// # Errors
    ///
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, zero `max_files`,
    ///   bad filter directives, or when neither console nor file output is enabled.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] if the log directory is unusable.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let LoggerBuilder { config, name: WithName(name), .. } = self;
        validate_config(&config, &name)?;

        let env_filter = build_env_filter(&config)?;
        let mut layers = Vec::new();

        if config.console {
            layers.push(
                layer()
                    .compact()
                    .with_writer(io::stderr)
                    .with_ansi(io::stderr().is_terminal())
                    .boxed(),
            );
        }

        let guard = if let Some(dir) = &config.dir {
            fs::create_dir_all(dir)
                .context(format!("Failed to create log directory: {}", dir.display()))?;

            let appender = RollingFileAppender::builder()
                .rotation(config.rotation.clone())
                .filename_prefix(&name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(config.max_files)
                .build(dir)
                .context(format!("Failed to open log files in {}", dir.display()))?;

            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = layer().with_writer(writer).with_ansi(false);
            layers.push(if config.json { file_layer.json().boxed() } else { file_layer.boxed() });
            Some(guard)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No output enabled; enable the console or set a log directory".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

/// Handle to the installed logging system.
#[must_use = "Dropping this handle stops the background log file writer"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use = "The builder must be finished with .init()"]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName, dir_state: PhantomData }
    }

    /// `true` when a log file writer is running.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

/// Parses a level name such as `"info"` or `"off"`, case-insensitively.
///
/// # Errors
///
/// Returns [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    level.parse().map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("Invalid log level '{level}': {e}").into(),
        context: None,
    })
}

fn validate_config(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if config.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.effective_level().into());
    config.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}
