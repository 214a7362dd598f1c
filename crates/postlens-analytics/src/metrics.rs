use std::collections::HashSet;
use std::str::FromStr;

use postlens_core::{Platform, Post};
use serde::Serialize;

use crate::error::AnalyticsError;

/// An engagement figure that can be summed, charted or ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Distinct post identifiers.
    Posts,
    Views,
    Engagements,
    Shares,
    Likes,
    Comments,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Posts,
        Metric::Views,
        Metric::Engagements,
        Metric::Shares,
        Metric::Likes,
        Metric::Comments,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Posts => "posts",
            Metric::Views => "views",
            Metric::Engagements => "engagements",
            Metric::Shares => "shares",
            Metric::Likes => "likes",
            Metric::Comments => "comments",
        }
    }

    /// This metric's value on a single post. `Posts` counts as 1.
    #[must_use]
    pub fn value_of(self, post: &Post) -> u64 {
        match self {
            Metric::Posts => 1,
            Metric::Views => post.views,
            Metric::Engagements => post.engagements,
            Metric::Shares => post.shares,
            Metric::Likes => post.likes,
            Metric::Comments => post.comments,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "posts" | "verbatims" => Ok(Metric::Posts),
            "views" => Ok(Metric::Views),
            "engagements" => Ok(Metric::Engagements),
            "shares" | "share" => Ok(Metric::Shares),
            "likes" => Ok(Metric::Likes),
            "comments" => Ok(Metric::Comments),
            other => Err(AnalyticsError::UnknownMetric(other.to_string())),
        }
    }
}

/// Headline figures for one platform's post set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformTotals {
    pub platform: Platform,
    /// Distinct post ids; duplicate rows collapse.
    pub posts: u64,
    /// Distinct author ids; posts without one are not counted.
    pub authors: u64,
    pub views: u64,
    pub engagements: u64,
    pub shares: u64,
    pub likes: u64,
    pub comments: u64,
}

impl PlatformTotals {
    #[must_use]
    pub fn empty(platform: Platform) -> Self {
        Self {
            platform,
            posts: 0,
            authors: 0,
            views: 0,
            engagements: 0,
            shares: 0,
            likes: 0,
            comments: 0,
        }
    }

    #[must_use]
    pub fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Posts => self.posts,
            Metric::Views => self.views,
            Metric::Engagements => self.engagements,
            Metric::Shares => self.shares,
            Metric::Likes => self.likes,
            Metric::Comments => self.comments,
        }
    }
}

/// Aggregate the posts of `platform` found in `records`.
#[must_use]
pub fn aggregate_totals<'a, I>(records: I, platform: Platform) -> PlatformTotals
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut totals = PlatformTotals::empty(platform);
    let mut ids: HashSet<&str> = HashSet::new();
    let mut authors: HashSet<&str> = HashSet::new();

    for post in records.into_iter().filter(|p| p.platform == platform) {
        ids.insert(post.id.as_str());
        if let Some(author) = post.author_id.as_deref() {
            authors.insert(author);
        }
        totals.views = totals.views.saturating_add(post.views);
        totals.engagements = totals.engagements.saturating_add(post.engagements);
        totals.shares = totals.shares.saturating_add(post.shares);
        totals.likes = totals.likes.saturating_add(post.likes);
        totals.comments = totals.comments.saturating_add(post.comments);
    }

    totals.posts = ids.len() as u64;
    totals.authors = authors.len() as u64;
    totals
}

/// Filtered figures as fractions (`0.0..=1.0`) of the baseline figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShareOfTotal {
    pub posts: f64,
    pub authors: f64,
    pub views: f64,
    pub engagements: f64,
}

/// Compare filtered totals against the date-filtered, query-unfiltered
/// baseline of the same platform. A zero baseline reports `0.0`.
#[must_use]
pub fn share_of_total(filtered: &PlatformTotals, baseline: &PlatformTotals) -> ShareOfTotal {
    ShareOfTotal {
        posts: ratio(filtered.posts, baseline.posts),
        authors: ratio(filtered.authors, baseline.authors),
        views: ratio(filtered.views, baseline.views),
        engagements: ratio(filtered.engagements, baseline.engagements),
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
