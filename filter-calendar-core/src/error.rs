//! Error types for filter-calendar.

use thiserror::Error;

/// Errors that can occur while loading configuration or refreshing a calendar.
#[derive(Error, Debug)]
pub enum FilterCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid filter regex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    #[error("Event source error: {0}")]
    Source(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for filter-calendar operations.
pub type FilterCalResult<T> = Result<T, FilterCalError>;

/// Reasons a raw event is rejected before filtering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("event '{0}' has no start time")]
    MissingStart(String),

    #[error("event '{0}' has no end time")]
    MissingEnd(String),

    #[error("event '{0}' ends before it starts")]
    EndBeforeStart(String),
}
