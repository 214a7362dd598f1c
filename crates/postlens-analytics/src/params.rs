use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use postlens_core::{Platform, Post};
use serde::Serialize;

use crate::error::AnalyticsError;

/// Inclusive `[start, end]` range over post dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidDateRange`] when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The user's language choice: English searches translations, anything else
/// searches the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    English,
    Original,
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Language::English,
            _ => Language::Original,
        })
    }
}

/// Which text column a platform's query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Text,
    TranslatedText,
}

impl SearchField {
    /// The field's value on `post`; `None` (or empty translation) means absent.
    #[must_use]
    pub fn select(self, post: &Post) -> Option<&str> {
        match self {
            SearchField::Text => post.text.as_deref(),
            SearchField::TranslatedText => post.translated_text.as_deref().filter(|t| !t.is_empty()),
        }
    }
}

impl FromStr for SearchField {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "original" => Ok(SearchField::Text),
            "translated_text" | "translated" | "translation" => Ok(SearchField::TranslatedText),
            other => Err(AnalyticsError::UnknownSearchField(other.to_string())),
        }
    }
}

/// Per-platform choice of search field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSelector {
    default: SearchField,
    overrides: BTreeMap<Platform, SearchField>,
}

impl TextSelector {
    #[must_use]
    pub fn uniform(field: SearchField) -> Self {
        Self {
            default: field,
            overrides: BTreeMap::new(),
        }
    }

    /// English searches the Telegram translation; Twitter is always searched
    /// in its original text.
    #[must_use]
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => Self::uniform(SearchField::TranslatedText)
                .with_override(Platform::Twitter, SearchField::Text),
            Language::Original => Self::uniform(SearchField::Text),
        }
    }

    #[must_use]
    pub fn with_override(mut self, platform: Platform, field: SearchField) -> Self {
        self.overrides.insert(platform, field);
        self
    }

    #[must_use]
    pub fn field_for(&self, platform: Platform) -> SearchField {
        self.overrides.get(&platform).copied().unwrap_or(self.default)
    }
}
