use chrono::NaiveDate;
use postlens_core::{permalink, Platform, Post};
use serde::Serialize;

use crate::metrics::Metric;

/// Order `records` by `metric`, highest first. Ties keep their input order.
#[must_use]
pub fn rank<'a>(records: &[&'a Post], metric: Metric) -> Vec<&'a Post> {
    let mut ranked = records.to_vec();
    // sort_by is stable; reversing the comparison keeps ties in input order.
    ranked.sort_by(|a, b| metric.value_of(b).cmp(&metric.value_of(a)));
    ranked
}

/// A ranked post, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPost {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub id: String,
    pub platform: Platform,
    pub author_name: String,
    pub date: NaiveDate,
    pub text: String,
    pub views: u64,
    pub engagements: u64,
    pub shares: u64,
    pub likes: u64,
    pub comments: u64,
    pub permalink: Option<String>,
}

impl RankedPost {
    /// This row's value of `metric`; `Posts` counts as 1.
    #[must_use]
    pub fn value(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Posts => 1,
            Metric::Views => self.views,
            Metric::Engagements => self.engagements,
            Metric::Shares => self.shares,
            Metric::Likes => self.likes,
            Metric::Comments => self.comments,
        }
    }

    fn from_post(rank: usize, post: &Post) -> Self {
        Self {
            rank,
            id: post.id.clone(),
            platform: post.platform,
            author_name: post.author_name.clone(),
            date: post.date,
            text: post.display_text().to_string(),
            views: post.views,
            engagements: post.engagements,
            shares: post.shares,
            likes: post.likes,
            comments: post.comments,
            permalink: permalink(post),
        }
    }
}

/// Rank `records` and keep the first `limit` as display rows.
#[must_use]
pub fn rank_top(records: &[&Post], metric: Metric, limit: Option<usize>) -> Vec<RankedPost> {
    rank(records, metric)
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(i, post)| RankedPost::from_post(i + 1, post))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, platform: Platform, engagements: u64, views: u64) -> Post {
        Post {
            id: id.to_string(),
            platform,
            author_id: None,
            author_name: "Élysée".to_string(),
            author_handle: Some("@elysee".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            text: Some(format!("original {id}")),
            translated_text: Some(format!("translated {id}")),
            views,
            engagements,
            shares: 0,
            likes: 0,
            comments: 0,
        }
    }

    fn ids(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn ranks_descending_by_metric() {
        let posts = [
            post("a", Platform::Twitter, 5, 300),
            post("b", Platform::Twitter, 50, 100),
            post("c", Platform::Twitter, 20, 200),
        ];
        let refs: Vec<&Post> = posts.iter().collect();
        assert_eq!(ids(&rank(&refs, Metric::Engagements)), vec!["b", "c", "a"]);
        assert_eq!(ids(&rank(&refs, Metric::Views)), vec!["a", "c", "b"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let posts = [
            post("first", Platform::Twitter, 10, 0),
            post("top", Platform::Twitter, 99, 0),
            post("second", Platform::Twitter, 10, 0),
            post("third", Platform::Twitter, 10, 0),
        ];
        let refs: Vec<&Post> = posts.iter().collect();
        assert_eq!(
            ids(&rank(&refs, Metric::Engagements)),
            vec!["top", "first", "second", "third"]
        );
        // Every post counts as 1, so the ranking is the input order.
        assert_eq!(
            ids(&rank(&refs, Metric::Posts)),
            vec!["first", "top", "second", "third"]
        );
    }

    #[test]
    fn rank_top_limits_and_numbers_rows() {
        let posts = [
            post("a", Platform::Telegram, 1, 0),
            post("b", Platform::Telegram, 3, 0),
            post("c", Platform::Telegram, 2, 0),
        ];
        let refs: Vec<&Post> = posts.iter().collect();
        let top = rank_top(&refs, Metric::Engagements, Some(2));
        assert_eq!(top.len(), 2);
        assert_eq!((top[0].rank, top[0].id.as_str()), (1, "b"));
        assert_eq!((top[1].rank, top[1].id.as_str()), (2, "c"));
        assert_eq!(top[1].value(Metric::Engagements), 2);
        assert_eq!(rank_top(&refs, Metric::Engagements, None).len(), 3);
    }

    #[test]
    fn ranked_rows_carry_display_text_and_permalink() {
        let posts = [
            post("7", Platform::Telegram, 1, 0),
            post("8", Platform::Twitter, 1, 0),
        ];
        let refs: Vec<&Post> = posts.iter().collect();
        let rows = rank_top(&refs, Metric::Engagements, None);

        assert_eq!(rows[0].text, "translated 7");
        assert_eq!(rows[0].permalink.as_deref(), Some("https://t.me/elysee/7"));
        assert_eq!(rows[1].text, "original 8");
        assert_eq!(
            rows[1].permalink.as_deref(),
            Some("https://www.twitter.com/elysee/status/8")
        );
    }

    #[test]
    fn empty_input_ranks_to_nothing() {
        assert!(rank(&[], Metric::Views).is_empty());
        assert!(rank_top(&[], Metric::Views, Some(10)).is_empty());
    }
}
