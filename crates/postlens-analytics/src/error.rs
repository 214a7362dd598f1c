use chrono::NaiveDate;
use thiserror::Error;

/// Invalid dashboard parameters. Raised before any filtering happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    #[error("invalid bucket width '{0}': expected <n>D or <n>W with n >= 1")]
    InvalidBucketWidth(String),

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("unknown metric '{0}'")]
    UnknownMetric(String),

    #[error("unknown search field '{0}'")]
    UnknownSearchField(String),
}
