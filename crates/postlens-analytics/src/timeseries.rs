//! Fixed-width time buckets per platform.
//!
//! Each platform is resampled on its own grid, anchored at that platform's
//! minimum date. Buckets without posts are omitted, not zero-filled.

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use postlens_core::{ColorLookup, Platform, Post};
use serde::{Serialize, Serializer};

use crate::error::AnalyticsError;
use crate::metrics::Metric;

/// Width of a trend bucket in whole days, parsed from strings like `7D` or `2W`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketWidth {
    days: u32,
}

impl BucketWidth {
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidBucketWidth`] for a zero width.
    pub fn from_days(days: u32) -> Result<Self, AnalyticsError> {
        if days == 0 {
            return Err(AnalyticsError::InvalidBucketWidth("0D".to_string()));
        }
        Ok(Self { days })
    }

    #[must_use]
    pub fn days(self) -> u32 {
        self.days
    }

    /// Start of the bucket containing `date` on the grid anchored at `anchor`.
    #[must_use]
    pub fn bucket_start(self, anchor: NaiveDate, date: NaiveDate) -> NaiveDate {
        let width = i64::from(self.days);
        let offset = (date - anchor).num_days().div_euclid(width) * width;
        let shifted = if offset >= 0 {
            anchor.checked_add_days(Days::new(offset.unsigned_abs()))
        } else {
            anchor.checked_sub_days(Days::new(offset.unsigned_abs()))
        };
        shifted.unwrap_or(date)
    }
}

impl Default for BucketWidth {
    fn default() -> Self {
        Self { days: 7 }
    }
}

impl FromStr for BucketWidth {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnalyticsError::InvalidBucketWidth(s.to_string());
        let trimmed = s.trim();
        let unit = trimmed.chars().last().ok_or_else(invalid)?;
        let digits = &trimmed[..trimmed.len() - unit.len_utf8()];

        let count: u32 = if digits.is_empty() {
            1
        } else if digits.bytes().all(|b| b.is_ascii_digit()) {
            digits.parse().map_err(|_| invalid())?
        } else {
            return Err(invalid());
        };

        let per_unit = match unit.to_ascii_uppercase() {
            'D' => 1,
            'W' => 7,
            _ => return Err(invalid()),
        };

        match count.checked_mul(per_unit) {
            Some(days) if days > 0 => Ok(Self { days }),
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for BucketWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}D", self.days)
    }
}

impl Serialize for BucketWidth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One `(platform, bucket_start, metric) -> value` cell of the trend table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendRow {
    pub platform: Platform,
    pub bucket_start: NaiveDate,
    pub metric: Metric,
    pub value: u64,
    pub color: Option<String>,
}

#[derive(Default)]
struct Bucket<'a> {
    ids: HashSet<&'a str>,
    views: u64,
    engagements: u64,
    shares: u64,
    likes: u64,
    comments: u64,
}

impl Bucket<'_> {
    fn value(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Posts => self.ids.len() as u64,
            Metric::Views => self.views,
            Metric::Engagements => self.engagements,
            Metric::Shares => self.shares,
            Metric::Likes => self.likes,
            Metric::Comments => self.comments,
        }
    }
}

/// Resample `records` into buckets, each platform anchored at its own
/// earliest date among `records`.
#[must_use]
pub fn aggregate_time_series(records: &[&Post], width: BucketWidth) -> Vec<TrendRow> {
    let mut anchors: BTreeMap<Platform, NaiveDate> = BTreeMap::new();
    for post in records {
        anchors
            .entry(post.platform)
            .and_modify(|d| *d = (*d).min(post.date))
            .or_insert(post.date);
    }
    aggregate_time_series_anchored(records, width, &anchors)
}

/// Resample `records` into buckets using explicit per-platform anchors.
///
/// Posts of a platform without an anchor are anchored at that platform's
/// earliest date among `records`. Rows come out ordered by platform, bucket
/// start, then metric.
#[must_use]
pub fn aggregate_time_series_anchored(
    records: &[&Post],
    width: BucketWidth,
    anchors: &BTreeMap<Platform, NaiveDate>,
) -> Vec<TrendRow> {
    let mut fallback: BTreeMap<Platform, NaiveDate> = BTreeMap::new();
    for post in records.iter().filter(|p| !anchors.contains_key(&p.platform)) {
        fallback
            .entry(post.platform)
            .and_modify(|d| *d = (*d).min(post.date))
            .or_insert(post.date);
    }

    let mut buckets: BTreeMap<(Platform, NaiveDate), Bucket<'_>> = BTreeMap::new();
    for post in records {
        let Some(anchor) = anchors
            .get(&post.platform)
            .or_else(|| fallback.get(&post.platform))
        else {
            continue;
        };
        let start = width.bucket_start(*anchor, post.date);
        let bucket = buckets.entry((post.platform, start)).or_default();
        bucket.ids.insert(post.id.as_str());
        bucket.views = bucket.views.saturating_add(post.views);
        bucket.engagements = bucket.engagements.saturating_add(post.engagements);
        bucket.shares = bucket.shares.saturating_add(post.shares);
        bucket.likes = bucket.likes.saturating_add(post.likes);
        bucket.comments = bucket.comments.saturating_add(post.comments);
    }

    buckets
        .iter()
        .flat_map(|((platform, start), bucket)| {
            Metric::ALL.into_iter().map(move |metric| TrendRow {
                platform: *platform,
                bucket_start: *start,
                metric,
                value: bucket.value(metric),
                color: None,
            })
        })
        .collect()
}

/// Tag every row with its platform's display color.
pub fn tag_colors<C: ColorLookup + ?Sized>(rows: &mut [TrendRow], palette: &C) {
    for row in rows {
        row.color = palette.color_for(row.platform).map(String::from);
    }
}

#[cfg(test)]
#[path = "timeseries_test.rs"]
mod tests;
