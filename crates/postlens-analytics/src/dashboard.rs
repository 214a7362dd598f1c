//! One full dashboard pass: filter, aggregate, rank.
//!
//! [`render`] is a pure function of the dataset and the parameters. Callers
//! re-run it on every parameter change; nothing is cached between passes.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use postlens_core::{ColorLookup, Dataset, Platform};
use postlens_query::{MatchOptions, QuerySyntaxError};
use serde::Serialize;

use crate::error::AnalyticsError;
use crate::filter::{filter_records, PlatformSubset};
use crate::metrics::{aggregate_totals, share_of_total, Metric, PlatformTotals, ShareOfTotal};
use crate::params::{DateRange, Language, SearchField, TextSelector};
use crate::ranking::{rank_top, RankedPost};
use crate::timeseries::{aggregate_time_series_anchored, tag_colors, BucketWidth, TrendRow};

pub const DEFAULT_QUERY: &str = "macron";

/// Everything the analyst can change between two passes.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardParams {
    /// Query per platform. A platform without an entry gets the blank query.
    pub queries: BTreeMap<Platform, String>,
    /// `None` keeps every date.
    pub date_range: Option<DateRange>,
    pub language: Language,
    pub field_overrides: BTreeMap<Platform, SearchField>,
    pub match_options: MatchOptions,
    pub bucket_width: BucketWidth,
    pub rank_by: Metric,
    /// `None` ranks every matching post.
    pub rank_limit: Option<usize>,
}

impl Default for DashboardParams {
    fn default() -> Self {
        Self {
            queries: Platform::ALL
                .into_iter()
                .map(|p| (p, DEFAULT_QUERY.to_string()))
                .collect(),
            date_range: None,
            language: Language::default(),
            field_overrides: BTreeMap::new(),
            match_options: MatchOptions::default(),
            bucket_width: BucketWidth::default(),
            rank_by: Metric::Engagements,
            rank_limit: None,
        }
    }
}

impl DashboardParams {
    /// The dataset's full `min..=max` date span, `None` when it has no posts.
    #[must_use]
    pub fn default_range(dataset: &Dataset) -> Option<DateRange> {
        let (start, end) = dataset.date_span()?;
        DateRange::new(start, end).ok()
    }

    /// Resolve user-supplied bounds against the dataset. A missing bound is
    /// taken from the dataset span, clamped so it never crosses the supplied
    /// one; a bound outside the data yields an empty range rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidDateRange`] when both bounds are given
    /// and `from` is after `to`.
    pub fn resolve_range(
        dataset: &Dataset,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Option<DateRange>, AnalyticsError> {
        let span = dataset.date_span();
        let bounds = match (from, to) {
            (Some(start), Some(end)) => Some((start, end)),
            (Some(start), None) => Some((start, span.map_or(start, |(_, hi)| hi.max(start)))),
            (None, Some(end)) => Some((span.map_or(end, |(lo, _)| lo.min(end)), end)),
            (None, None) => span,
        };
        bounds
            .map(|(start, end)| DateRange::new(start, end))
            .transpose()
    }

    #[must_use]
    pub fn selector(&self) -> TextSelector {
        self.field_overrides
            .iter()
            .fold(TextSelector::for_language(self.language), |selector, (platform, field)| {
                selector.with_override(*platform, *field)
            })
    }
}

/// One platform's column of the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformView {
    pub platform: Platform,
    pub query: String,
    /// Canonical form of the compiled query.
    pub expression: Option<String>,
    pub query_error: Option<QuerySyntaxError>,
    pub search_field: SearchField,
    pub totals: PlatformTotals,
    /// Date-filtered, query-unfiltered totals.
    pub baseline: PlatformTotals,
    pub share_of_total: ShareOfTotal,
    pub ranked: Vec<RankedPost>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub date_range: Option<DateRange>,
    pub bucket_width: BucketWidth,
    pub rank_by: Metric,
    pub match_options: MatchOptions,
    pub platforms: Vec<PlatformView>,
    pub trends: Vec<TrendRow>,
}

impl DashboardView {
    #[must_use]
    pub fn platform(&self, platform: Platform) -> Option<&PlatformView> {
        self.platforms.iter().find(|v| v.platform == platform)
    }
}

/// Run one dashboard pass over `dataset`.
///
/// Trend buckets are anchored at each platform's earliest date in its
/// baseline, so the grid does not move when only the query changes.
#[must_use]
pub fn render<C: ColorLookup + ?Sized>(
    dataset: &Dataset,
    params: &DashboardParams,
    palette: &C,
) -> DashboardView {
    let output = filter_records(
        dataset.posts(),
        params.date_range.as_ref(),
        &params.selector(),
        &params.queries,
        params.match_options,
    );

    let anchors: BTreeMap<Platform, NaiveDate> = output
        .platforms
        .iter()
        .filter_map(|s| Some((s.platform, s.baseline.iter().map(|p| p.date).min()?)))
        .collect();

    let matched: Vec<_> = output.matched().collect();
    let mut trends = aggregate_time_series_anchored(&matched, params.bucket_width, &anchors);
    tag_colors(&mut trends, palette);

    let platforms: Vec<PlatformView> = output
        .platforms
        .iter()
        .map(|subset| platform_view(subset, params, palette))
        .collect();

    tracing::debug!(
        matched = matched.len(),
        trend_rows = trends.len(),
        width = %params.bucket_width,
        "dashboard rendered"
    );

    DashboardView {
        date_range: params.date_range,
        bucket_width: params.bucket_width,
        rank_by: params.rank_by,
        match_options: params.match_options,
        platforms,
        trends,
    }
}

fn platform_view<C: ColorLookup + ?Sized>(
    subset: &PlatformSubset<'_>,
    params: &DashboardParams,
    palette: &C,
) -> PlatformView {
    let platform = subset.platform;
    let matched = subset.matched_posts();
    let totals = aggregate_totals(matched.iter().copied(), platform);
    let baseline = aggregate_totals(subset.baseline.iter().copied(), platform);

    PlatformView {
        platform,
        query: params.queries.get(&platform).cloned().unwrap_or_default(),
        expression: subset.expression.as_ref().map(ToString::to_string),
        query_error: subset.query_error().cloned(),
        search_field: subset.field,
        share_of_total: share_of_total(&totals, &baseline),
        totals,
        baseline,
        ranked: rank_top(matched, params.rank_by, params.rank_limit),
        color: palette.color_for(platform).map(String::from),
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
