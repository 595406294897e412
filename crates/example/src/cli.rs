//! Command-line arguments.

use toolscope_core::{ParseFormatError, TracingFormat};

/// Usage text printed on argument errors.
pub const USAGE: &str = "\
Usage: react [OPTIONS] [QUERY]

Options:
  --location <CITY>     City to search in (default: Beijing)
  --failure-rate <P>    Probability in [0, 1] that the restaurant service fails (default: 0.5)
  --seed <N>            Seed for reproducible failures
  --log-format <F>      pretty, compact or json (default: compact)";

/// Errors from [`CliArgs::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CliError {
    /// A flag was given without its value.
    #[error("missing value for {0}")]
    MissingValue(String),
    /// A flag value could not be parsed.
    #[error("invalid value '{value}' for {flag}")]
    InvalidValue {
        /// The flag.
        flag: String,
        /// The rejected value.
        value: String,
    },
    /// The log format is unknown.
    #[error(transparent)]
    Format(#[from] ParseFormatError),
    /// An unrecognised flag.
    #[error("unknown option {0}")]
    UnknownFlag(String),
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    /// City the model searches in.
    pub location: String,
    /// Failure probability of the restaurant service.
    pub failure_rate: f64,
    /// Seed for the failure sequence.
    pub seed: Option<u64>,
    /// Log output format.
    pub log_format: TracingFormat,
    /// The user's request.
    pub query: String,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            location: "Beijing".to_string(),
            failure_rate: 0.5,
            seed: None,
            log_format: TracingFormat::Compact,
            query: "I'm in Beijing. Recommend some spicy dishes.".to_string(),
        }
    }
}

impl CliArgs {
    /// Parses arguments, excluding the program name.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] for unknown flags and missing or invalid values.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, CliError> {
        let mut parsed = Self::default();
        let mut query = Vec::new();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            if !arg.starts_with("--") {
                query.push(arg);
                continue;
            }
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| CliError::MissingValue(flag.to_string()))
            };
            match arg.as_str() {
                "--location" => parsed.location = value("--location")?,
                "--failure-rate" => {
                    let raw = value("--failure-rate")?;
                    parsed.failure_rate = raw
                        .parse::<f64>()
                        .ok()
                        .filter(|p| (0.0..=1.0).contains(p))
                        .ok_or(CliError::InvalidValue {
                            flag: "--failure-rate".to_string(),
                            value: raw,
                        })?;
                }
                "--seed" => {
                    let raw = value("--seed")?;
                    parsed.seed = Some(raw.parse().map_err(|_| CliError::InvalidValue {
                        flag: "--seed".to_string(),
                        value: raw.clone(),
                    })?);
                }
                "--log-format" => parsed.log_format = value("--log-format")?.parse()?,
                flag => return Err(CliError::UnknownFlag(flag.to_string())),
            }
        }

        if !query.is_empty() {
            parsed.query = query.join(" ");
        }
        Ok(parsed)
    }
}
