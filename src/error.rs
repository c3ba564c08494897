//! Error types for the analysis core.
//!
//! Missing data is not an error here: an empty clustering or an absent spread
//! vector is ordinary control flow. Only inputs that can never produce a
//! meaningful result surface as an [`AnalysisError`].

/// Failure at the boundary of the analysis core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// Malformed coordinates or other values that would poison the math.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },

    /// A component was asked to do something it has no defaults for.
    #[error("Configuration error: {message}")]
    Configuration {
        /// What was missing or out of range.
        message: String,
    },
}

impl AnalysisError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// A historical series that cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    /// The key is not an ISO-8601 timestamp.
    #[error("Unparsable timestamp: {raw:?}")]
    BadTimestamp {
        /// The key as it appeared in the series.
        raw: String,
    },

    /// Cumulative counts never go below zero.
    #[error("Negative case count {count} at {timestamp}")]
    NegativeCount {
        /// The key the count was stored under.
        timestamp: String,
        /// The offending count.
        count: i64,
    },

    /// Two keys name the same instant but disagree on the count.
    #[error("Keys {first:?} and {second:?} are the same instant with different counts")]
    DuplicateInstant {
        /// The key seen first, in key order.
        first: String,
        /// The conflicting key.
        second: String,
    },
}

/// Failure while loading an [`crate::config::AnalysisConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
