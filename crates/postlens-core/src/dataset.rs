//! Dataset loading and load-time validation.
//!
//! Rows arrive as a JSON array or as JSON Lines. Required fields (`id`,
//! `platform`, `date`) are checked here once, so downstream stages work with
//! fully-typed [`Post`] values and never re-validate.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::post::{Platform, Post};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to parse dataset line {line}: {source}")]
    ParseLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a row was rejected at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingId,
    MissingPlatform,
    UnknownPlatform,
    MissingDate,
    InvalidDate,
    /// Not a JSON object, or a field of the wrong JSON type.
    MalformedRow,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SkipReason::MissingId => "missing id",
            SkipReason::MissingPlatform => "missing platform",
            SkipReason::UnknownPlatform => "unknown platform",
            SkipReason::MissingDate => "missing date",
            SkipReason::InvalidDate => "invalid date",
            SkipReason::MalformedRow => "malformed row",
        };
        f.write_str(label)
    }
}

/// Outcome of a load: how many rows made it in and why the rest did not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub accepted: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl LoadReport {
    #[must_use]
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// The in-memory, read-only post table for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    posts: Vec<Post>,
}

impl Dataset {
    #[must_use]
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn for_platform(&self, platform: Platform) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(move |p| p.platform == platform)
    }

    /// Earliest and latest post date across every platform.
    #[must_use]
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        span(self.posts.iter())
    }

    #[must_use]
    pub fn platform_date_span(&self, platform: Platform) -> Option<(NaiveDate, NaiveDate)> {
        span(self.for_platform(platform))
    }
}

fn span<'a>(posts: impl Iterator<Item = &'a Post>) -> Option<(NaiveDate, NaiveDate)> {
    posts.fold(None, |acc, p| match acc {
        None => Some((p.date, p.date)),
        Some((lo, hi)) => Some((lo.min(p.date), hi.max(p.date))),
    })
}

/// Export column names accepted in place of the canonical ones.
const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("message_id", "id"),
    ("plateforme", "platform"),
    ("user_id", "author_id"),
    ("user_name", "author_name"),
    ("user_handle", "author_handle"),
    ("timestamp", "date"),
    ("share", "shares"),
];

#[derive(Debug, Deserialize)]
struct RawPost {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default)]
    platform: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    author_id: Option<String>,
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    author_handle: Option<String>,
    #[serde(default)]
    date: Option<Value>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    translated_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    views: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    engagements: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    shares: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    likes: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    comments: Option<u64>,
}

/// Accept identifiers exported either as strings or as numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accept counters as integers, floats, numeric strings or `null`.
///
/// Negative and non-finite values clamp to zero.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => Some(count_from_number(&n)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().map(count_from_f64),
        _ => None,
    })
}

fn count_from_number(n: &serde_json::Number) -> u64 {
    if let Some(u) = n.as_u64() {
        u
    } else if n.as_i64().is_some() {
        0
    } else {
        n.as_f64().map_or(0, count_from_f64)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_from_f64(f: f64) -> u64 {
    if f.is_finite() && f > 0.0 {
        f.trunc() as u64
    } else {
        0
    }
}

fn parse_date(value: &Value) -> Result<NaiveDate, SkipReason> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(SkipReason::MissingDate);
            }
            s.get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .ok_or(SkipReason::InvalidDate)
        }
        // Epoch milliseconds, the default date encoding of dataframe JSON exports.
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive())
            .ok_or(SkipReason::InvalidDate),
        Value::Null => Err(SkipReason::MissingDate),
        _ => Err(SkipReason::InvalidDate),
    }
}

/// Fold alias columns onto their canonical names, then type the row.
///
/// A non-null canonical column wins over its alias.
fn read_row(row: Value) -> Result<RawPost, SkipReason> {
    let Value::Object(mut fields) = row else {
        return Err(SkipReason::MalformedRow);
    };
    for &(alias, canonical) in COLUMN_ALIASES {
        if let Some(value) = fields.remove(alias) {
            if fields.get(canonical).map_or(true, Value::is_null) {
                fields.insert(canonical.to_string(), value);
            }
        }
    }
    serde_json::from_value(Value::Object(fields)).map_err(|_| SkipReason::MalformedRow)
}

fn validate(raw: RawPost) -> Result<Post, SkipReason> {
    let id = raw.id.ok_or(SkipReason::MissingId)?;
    let platform = raw
        .platform
        .filter(|p| !p.trim().is_empty())
        .ok_or(SkipReason::MissingPlatform)?
        .parse::<Platform>()
        .map_err(|_| SkipReason::UnknownPlatform)?;
    let date = parse_date(raw.date.as_ref().ok_or(SkipReason::MissingDate)?)?;

    let shares = raw.shares.unwrap_or(0);
    let likes = raw.likes.unwrap_or(0);
    let comments = raw.comments.unwrap_or(0);
    let engagements = raw.engagements.unwrap_or_else(|| {
        shares.saturating_add(likes).saturating_add(comments)
    });

    Ok(Post {
        id,
        platform,
        author_id: raw.author_id,
        author_name: raw.author_name.unwrap_or_default(),
        author_handle: raw.author_handle,
        date,
        text: raw.text,
        translated_text: raw.translated_text,
        views: raw.views.unwrap_or(0),
        engagements,
        shares,
        likes,
        comments,
    })
}

/// Parse and validate a dataset from its JSON text.
///
/// A leading `[` selects JSON-array mode; anything else is read as JSON Lines.
/// Rows failing validation are skipped and counted in the [`LoadReport`].
///
/// # Errors
///
/// Returns [`DatasetError`] when the text is not structurally valid JSON.
/// Well-formed rows of the wrong shape are skipped, not fatal.
pub fn parse_dataset(content: &str) -> Result<(Dataset, LoadReport), DatasetError> {
    let rows: Vec<Value> = if content.trim_start().starts_with('[') {
        serde_json::from_str(content).map_err(DatasetError::Parse)?
    } else {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|source| DatasetError::ParseLine {
                    line: idx + 1,
                    source,
                })
            })
            .collect::<Result<_, _>>()?
    };

    let mut report = LoadReport::default();
    let mut posts = Vec::with_capacity(rows.len());
    for row in rows {
        match read_row(row).and_then(validate) {
            Ok(post) => posts.push(post),
            Err(reason) => *report.skipped.entry(reason).or_insert(0) += 1,
        }
    }
    report.accepted = posts.len();

    for (reason, count) in &report.skipped {
        tracing::warn!(%reason, count, "skipped dataset rows");
    }

    Ok((Dataset::new(posts), report))
}

/// Load and validate the dataset file once per session.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or is not valid JSON.
pub fn load_dataset(path: &Path) -> Result<(Dataset, LoadReport), DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let (dataset, report) = parse_dataset(&content)?;
    tracing::info!(
        path = %path.display(),
        accepted = report.accepted,
        skipped = report.skipped_total(),
        "dataset loaded"
    );
    Ok((dataset, report))
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;
