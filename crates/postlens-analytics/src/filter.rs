//! Record filter: date range, platform partition, per-platform query.
//!
//! Subsets borrow from the dataset and keep the input order of posts.

use std::collections::BTreeMap;

use postlens_core::{Platform, Post};
use postlens_query::{compile, Expression, MatchOptions, Matcher, QuerySyntaxError};

use crate::params::{DateRange, SearchField, TextSelector};

/// One platform's share of a filter pass.
#[derive(Debug, Clone)]
pub struct PlatformSubset<'a> {
    pub platform: Platform,
    pub field: SearchField,
    /// The compiled query, absent when it failed to compile.
    pub expression: Option<Expression>,
    /// Date-filtered posts of this platform, before the query is applied.
    pub baseline: Vec<&'a Post>,
    /// Posts matching the query, or the reason the query could not run.
    pub matched: Result<Vec<&'a Post>, QuerySyntaxError>,
}

impl<'a> PlatformSubset<'a> {
    /// Matching posts; empty when the query failed to compile.
    #[must_use]
    pub fn matched_posts(&self) -> &[&'a Post] {
        self.matched.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn query_error(&self) -> Option<&QuerySyntaxError> {
        self.matched.as_ref().err()
    }
}

/// Result of filtering the whole dataset, one entry per platform.
#[derive(Debug, Clone, Default)]
pub struct FilterOutput<'a> {
    pub platforms: Vec<PlatformSubset<'a>>,
}

impl<'a> FilterOutput<'a> {
    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<&PlatformSubset<'a>> {
        self.platforms.iter().find(|s| s.platform == platform)
    }

    /// Matching posts of every platform, platform by platform.
    pub fn matched(&self) -> impl Iterator<Item = &'a Post> + '_ {
        self.platforms
            .iter()
            .flat_map(|s| s.matched_posts().iter().copied())
    }
}

/// Keep posts whose date falls inside `range`.
#[must_use]
pub fn filter_date_range<'a>(posts: &'a [Post], range: &DateRange) -> Vec<&'a Post> {
    posts.iter().filter(|p| range.contains(p.date)).collect()
}

/// Keep the `platform` posts whose `field` matches.
///
/// Posts where the field is absent never match.
#[must_use]
pub fn apply_matcher<'a>(
    posts: &[&'a Post],
    platform: Platform,
    field: SearchField,
    matcher: &Matcher,
) -> Vec<&'a Post> {
    posts
        .iter()
        .copied()
        .filter(|p| p.platform == platform && matcher.matches_field(field.select(p)))
        .collect()
}

/// Run the record filter for every platform.
///
/// Each platform's query is compiled once. A platform missing from `queries`
/// gets the blank query. A syntax error only empties that platform's subset.
#[must_use]
pub fn filter_records<'a>(
    posts: &'a [Post],
    range: Option<&DateRange>,
    selector: &TextSelector,
    queries: &BTreeMap<Platform, String>,
    options: MatchOptions,
) -> FilterOutput<'a> {
    let in_range: Vec<&Post> = match range {
        Some(range) => filter_date_range(posts, range),
        None => posts.iter().collect(),
    };

    let platforms = Platform::ALL
        .into_iter()
        .map(|platform| {
            let baseline: Vec<&Post> = in_range
                .iter()
                .copied()
                .filter(|p| p.platform == platform)
                .collect();
            let field = selector.field_for(platform);
            let query = queries.get(&platform).map_or("", String::as_str);

            let compiled = compile(query);
            let matched = match &compiled {
                Ok(expr) => {
                    let matcher = Matcher::new(expr, options);
                    Ok(apply_matcher(&baseline, platform, field, &matcher))
                }
                Err(e) => Err(e.clone()),
            };

            match &matched {
                Ok(hits) => tracing::debug!(
                    %platform,
                    baseline = baseline.len(),
                    matched = hits.len(),
                    "platform filtered"
                ),
                Err(e) => tracing::warn!(%platform, error = %e, "query rejected"),
            }

            PlatformSubset {
                platform,
                field,
                expression: compiled.ok(),
                baseline,
                matched,
            }
        })
        .collect();

    FilterOutput { platforms }
}
