use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The social network a post originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(alias = "telegram")]
    Telegram,
    #[serde(alias = "twitter")]
    Twitter,
}

impl Platform {
    /// Every platform, in the order views and trend rows are emitted.
    pub const ALL: [Platform; 2] = [Platform::Telegram, Platform::Twitter];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Telegram => "Telegram",
            Platform::Twitter => "Twitter",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "telegram" => Ok(Platform::Telegram),
            "twitter" | "x" => Ok(Platform::Twitter),
            other => Err(format!("unknown platform: '{other}'")),
        }
    }
}

/// One validated row of the dataset.
///
/// Metric counters are never negative: the loader clamps and defaults them
/// before a `Post` is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub platform: Platform,
    pub author_id: Option<String>,
    pub author_name: String,
    /// Account handle used for permalinks. Falls back to `author_name`.
    pub author_handle: Option<String>,
    pub date: NaiveDate,
    pub text: Option<String>,
    pub translated_text: Option<String>,
    pub views: u64,
    pub engagements: u64,
    pub shares: u64,
    pub likes: u64,
    pub comments: u64,
}

impl Post {
    /// Handle used to address the author on the platform.
    #[must_use]
    pub fn handle(&self) -> Option<&str> {
        self.author_handle
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .or_else(|| Some(self.author_name.as_str()).filter(|n| !n.trim().is_empty()))
    }

    /// Text shown on a post card.
    ///
    /// Telegram posts are shown in translation when one exists; Twitter posts
    /// always show the original.
    #[must_use]
    pub fn display_text(&self) -> &str {
        let preferred = match self.platform {
            Platform::Telegram => self.translated_text.as_deref().filter(|t| !t.is_empty()),
            Platform::Twitter => None,
        };
        preferred.or(self.text.as_deref()).unwrap_or_default()
    }
}

/// Build the public URL of a post, if the platform and handle allow it.
#[must_use]
pub fn permalink(post: &Post) -> Option<String> {
    let handle = post.handle()?.trim().trim_start_matches('@');
    if handle.is_empty() || post.id.is_empty() {
        return None;
    }
    match post.platform {
        Platform::Twitter => Some(format!(
            "https://www.twitter.com/{handle}/status/{}",
            post.id
        )),
        Platform::Telegram => Some(format!("https://t.me/{handle}/{}", post.id)),
    }
}
