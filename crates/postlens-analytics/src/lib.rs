//! Query-and-aggregation pipeline behind the dashboard.
//!
//! Raw posts flow through the record filter (date range, per-platform search
//! field and query), then into the metrics aggregator (totals, share of total,
//! time buckets) and the ranking view. [`render`] runs the whole pass as one
//! pure function of the dataset and the [`DashboardParams`].

pub mod dashboard;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod params;
pub mod ranking;
pub mod timeseries;

pub use dashboard::{render, DashboardParams, DashboardView, PlatformView, DEFAULT_QUERY};
pub use error::AnalyticsError;
pub use filter::{apply_matcher, filter_date_range, filter_records, FilterOutput, PlatformSubset};
pub use metrics::{aggregate_totals, share_of_total, Metric, PlatformTotals, ShareOfTotal};
pub use params::{DateRange, Language, SearchField, TextSelector};
pub use ranking::{rank, rank_top, RankedPost};
pub use timeseries::{
    aggregate_time_series, aggregate_time_series_anchored, tag_colors, BucketWidth, TrendRow,
};
