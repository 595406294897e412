//! Subscriber installation.
//!
//! [`TracingSetup`] builds a `tracing-subscriber` registry with one
//! formatting layer and an [`EnvFilter`]. The filter is chosen in this
//! order:
//!
//! 1. An explicit [`with_env_filter`](TracingSetup::with_env_filter) string
//! 2. `RUST_LOG`, when [`with_rust_log`](TracingSetup::with_rust_log) is on
//!    (the default) and the variable is set
//! 3. The configured [`Level`]
//!
//! An invalid directive string falls back to the next source instead of
//! failing.

use core::fmt;
use core::str::FromStr;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Multi-line human-readable output (default).
    #[default]
    Pretty,
    /// Single-line output.
    Compact,
    /// Newline-delimited JSON for log aggregation.
    Json,
}

impl fmt::Display for TracingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        })
    }
}

/// Error returned when a string names no [`TracingFormat`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log format '{0}', expected pretty, compact or json")]
pub struct ParseFormatError(String);

impl FromStr for TracingFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingSetup
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for the process-wide `tracing` subscriber.
///
/// # Example
///
/// ```
/// use toolscope_core::{TracingFormat, TracingSetup};
/// use tracing::Level;
///
/// // Development: pretty output, span enter/exit visible
/// let dev = TracingSetup::new()
///     .with_level(Level::DEBUG)
///     .with_span_events(true);
///
/// // Production: JSON with per-crate levels
/// let prod = TracingSetup::new()
///     .with_format(TracingFormat::Json)
///     .with_env_filter("toolscope_callbacks=info,toolscope_stream=warn");
/// # let _ = (dev, prod);
/// ```
#[derive(Debug, Clone)]
pub struct TracingSetup {
    level: Level,
    format: TracingFormat,
    env_filter: Option<String>,
    rust_log: bool,
    span_events: bool,
}

impl Default for TracingSetup {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            rust_log: true,
            span_events: false,
        }
    }
}

impl TracingSetup {
    /// Creates a setup with `INFO` level and pretty output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level used when no filter string applies.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a filter directive string, e.g. `toolscope_stream=debug,warn`.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Controls whether `RUST_LOG` is consulted.
    #[must_use]
    pub fn with_rust_log(mut self, enabled: bool) -> Self {
        self.rust_log = enabled;
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Returns the configured level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the configured format.
    #[must_use]
    pub fn format(&self) -> TracingFormat {
        self.format
    }

    fn filter(&self) -> EnvFilter {
        if let Some(directives) = &self.env_filter
            && let Ok(filter) = EnvFilter::try_new(directives)
        {
            return filter;
        }
        if self.rust_log
            && let Ok(filter) = EnvFilter::try_from_default_env()
        {
            return filter;
        }
        EnvFilter::new(self.level.as_str())
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };
        let filter = self.filter();
        let fmt = tracing_subscriber::fmt::layer().with_span_events(span_events);

        match self.format {
            TracingFormat::Pretty => fmt.pretty().with_filter(filter).boxed(),
            TracingFormat::Compact => fmt.compact().with_filter(filter).boxed(),
            TracingFormat::Json => fmt.json().with_filter(filter).boxed(),
        }
    }

    /// Installs the subscriber as the global default.
    ///
    /// Returns `false` if a global subscriber was already installed, in
    /// which case the existing one is kept. Never panics.
    pub fn init(self) -> bool {
        let installed = tracing_subscriber::registry()
            .with(self.layer())
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!(level = %self.level, format = %self.format, "tracing initialized");
        }
        installed
    }
}
