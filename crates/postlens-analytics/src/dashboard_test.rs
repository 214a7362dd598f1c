use std::collections::HashMap;

use postlens_core::{Palette, Post};
use postlens_query::SyntaxErrorKind;

use super::*;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
}

#[allow(clippy::too_many_arguments)]
fn post(
    id: &str,
    platform: Platform,
    author: &str,
    day: u32,
    text: &str,
    translated: &str,
    views: u64,
    engagements: u64,
) -> Post {
    Post {
        id: id.to_string(),
        platform,
        author_id: Some(author.to_string()),
        author_name: author.to_string(),
        author_handle: None,
        date: d(day),
        text: Some(text.to_string()),
        translated_text: Some(translated.to_string()).filter(|t| !t.is_empty()),
        views,
        engagements,
        shares: 0,
        likes: 0,
        comments: 0,
    }
}

fn dataset() -> Dataset {
    Dataset::new(vec![
        post("t1", Platform::Telegram, "rt", 1, "Макрон", "Macron visits Kyiv", 1000, 50),
        post("t2", Platform::Telegram, "rt", 8, "Реформа", "pension reform", 500, 5),
        post("t3", Platform::Telegram, "tass", 13, "Макрон", "Macron and the reform", 2000, 80),
        post("w1", Platform::Twitter, "lemonde", 2, "Macron parle ce soir", "", 300, 30),
        post("w2", Platform::Twitter, "afp", 9, "La macronésie", "", 100, 10),
        post("w3", Platform::Twitter, "afp", 14, "MACRON à Berlin", "", 600, 30),
    ])
}

fn params(telegram: &str, twitter: &str) -> DashboardParams {
    DashboardParams {
        queries: BTreeMap::from([
            (Platform::Telegram, telegram.to_string()),
            (Platform::Twitter, twitter.to_string()),
        ]),
        ..DashboardParams::default()
    }
}

fn ranked_ids(view: &PlatformView) -> Vec<&str> {
    view.ranked.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn default_params_search_macron_everywhere() {
    let defaults = DashboardParams::default();
    for platform in Platform::ALL {
        assert_eq!(defaults.queries.get(&platform).map(String::as_str), Some(DEFAULT_QUERY));
    }
    assert_eq!(defaults.bucket_width.days(), 7);
    assert_eq!(defaults.rank_by, Metric::Engagements);
    assert_eq!(defaults.selector().field_for(Platform::Telegram), SearchField::TranslatedText);
    assert_eq!(defaults.selector().field_for(Platform::Twitter), SearchField::Text);
}

#[test]
fn default_params_match_untranslated_tweets() {
    let data = Dataset::new(vec![post(
        "w1",
        Platform::Twitter,
        "lemonde",
        2,
        "Macron parle",
        "",
        300,
        30,
    )]);
    let view = render(&data, &DashboardParams::default(), &Palette::default());
    let twitter = view.platform(Platform::Twitter).unwrap();
    assert_eq!(twitter.search_field, SearchField::Text);
    assert_eq!(twitter.baseline.posts, 1);
    assert_eq!(twitter.totals.posts, 1);
}

#[test]
fn default_range_spans_the_dataset() {
    let range = DashboardParams::default_range(&dataset()).unwrap();
    assert_eq!((range.start(), range.end()), (d(1), d(14)));
    assert!(DashboardParams::default_range(&Dataset::default()).is_none());
}

#[test]
fn resolve_range_fills_and_clamps_open_bounds() {
    let data = dataset();
    let range = DashboardParams::resolve_range(&data, Some(d(5)), None)
        .unwrap()
        .unwrap();
    assert_eq!((range.start(), range.end()), (d(5), d(14)));

    let range = DashboardParams::resolve_range(&data, Some(d(20)), None)
        .unwrap()
        .unwrap();
    assert_eq!((range.start(), range.end()), (d(20), d(20)));

    let range = DashboardParams::resolve_range(&data, None, Some(d(1)))
        .unwrap()
        .unwrap();
    assert_eq!((range.start(), range.end()), (d(1), d(1)));

    assert_eq!(
        DashboardParams::resolve_range(&data, None, None).unwrap(),
        DashboardParams::default_range(&data)
    );
    assert!(DashboardParams::resolve_range(&data, Some(d(9)), Some(d(2))).is_err());
}

#[test]
fn range_past_the_last_post_renders_empty() {
    let data = dataset();
    let params = DashboardParams {
        date_range: DashboardParams::resolve_range(&data, Some(d(20)), None).unwrap(),
        ..params("macron", "macron")
    };
    let view = render(&data, &params, &Palette::default());
    for platform in &view.platforms {
        assert_eq!(platform.baseline.posts, 0);
        assert_eq!(platform.totals.posts, 0);
        assert!(platform.share_of_total.posts.abs() < f64::EPSILON);
        assert!(platform.ranked.is_empty());
    }
    assert!(view.trends.is_empty());
}

#[test]
fn renders_totals_share_and_ranking_per_platform() {
    let data = dataset();
    let view = render(&data, &params("macron", "macron"), &Palette::default());

    let telegram = view.platform(Platform::Telegram).unwrap();
    assert_eq!(telegram.totals.posts, 2);
    assert_eq!(telegram.totals.authors, 2);
    assert_eq!(telegram.totals.views, 3000);
    assert_eq!(telegram.baseline.posts, 3);
    assert_eq!(telegram.baseline.views, 3500);
    assert!((telegram.share_of_total.engagements - 130.0 / 135.0).abs() < 1e-9);
    assert_eq!(ranked_ids(telegram), vec!["t3", "t1"]);
    assert_eq!(telegram.expression.as_deref(), Some("macron"));

    // "macronésie" is not the word "macron".
    let twitter = view.platform(Platform::Twitter).unwrap();
    assert_eq!(ranked_ids(twitter), vec!["w1", "w3"]);
    assert_eq!(twitter.search_field, SearchField::Text);
    assert!(twitter.query_error.is_none());
}

#[test]
fn negation_excludes_texts_with_both_terms() {
    let data = dataset();
    let view = render(&data, &params("macron AND NOT reform", ""), &Palette::default());
    let telegram = view.platform(Platform::Telegram).unwrap();
    assert_eq!(ranked_ids(telegram), vec!["t1"]);
}

#[test]
fn date_range_restricts_baseline_and_matches() {
    let data = dataset();
    let mut p = params("macron", "macron");
    p.date_range = Some(DateRange::new(d(1), d(7)).unwrap());
    let view = render(&data, &p, &Palette::default());

    let telegram = view.platform(Platform::Telegram).unwrap();
    assert_eq!(telegram.baseline.posts, 1);
    assert_eq!(ranked_ids(telegram), vec!["t1"]);
    assert!((telegram.share_of_total.posts - 1.0).abs() < f64::EPSILON);
}

#[test]
fn empty_result_reports_zeros_without_failing() {
    let data = dataset();
    let view = render(&data, &params("zelensky", "zelensky"), &Palette::default());

    for platform_view in &view.platforms {
        assert_eq!(platform_view.totals, PlatformTotals::empty(platform_view.platform));
        assert_eq!(platform_view.share_of_total.posts, 0.0);
        assert_eq!(platform_view.share_of_total.views, 0.0);
        assert!(platform_view.ranked.is_empty());
    }
    assert!(view.trends.is_empty());
}

#[test]
fn empty_dataset_renders() {
    let view = render(&Dataset::default(), &DashboardParams::default(), &Palette::default());
    assert_eq!(view.platforms.len(), 2);
    assert!(view.trends.is_empty());
}

#[test]
fn bad_query_fails_only_its_platform() {
    let data = dataset();
    let view = render(&data, &params("macron AND", "macron"), &Palette::default());

    let telegram = view.platform(Platform::Telegram).unwrap();
    let error = telegram.query_error.as_ref().unwrap();
    assert_eq!(error.kind, SyntaxErrorKind::DanglingOperator);
    assert_eq!(error.query, "macron AND");
    assert!(telegram.ranked.is_empty());
    assert!(telegram.expression.is_none());
    assert_eq!(telegram.baseline.posts, 3);

    let twitter = view.platform(Platform::Twitter).unwrap();
    assert_eq!(twitter.totals.posts, 2);
    assert!(view.trends.iter().all(|r| r.platform == Platform::Twitter));
}

#[test]
fn trend_grid_is_anchored_at_baseline_start() {
    let data = dataset();
    // Only t3 (day 13) matches; its bucket still sits on the grid starting at day 1.
    let view = render(&data, &params("tass OR \"the reform\"", "berlin"), &Palette::default());

    let telegram_starts: Vec<NaiveDate> = view
        .trends
        .iter()
        .filter(|r| r.platform == Platform::Telegram)
        .map(|r| r.bucket_start)
        .collect();
    assert!(!telegram_starts.is_empty());
    assert!(telegram_starts.iter().all(|s| *s == d(8)));

    // Twitter's grid starts on its own earliest date, day 2.
    assert!(view
        .trends
        .iter()
        .filter(|r| r.platform == Platform::Twitter)
        .all(|r| r.bucket_start == d(9)));
}

#[test]
fn colors_come_from_the_palette() {
    let data = dataset();
    let palette = Palette::new(HashMap::from([(Platform::Twitter, "#1DA1F2".to_string())]));
    let view = render(&data, &params("macron", "macron"), &palette);

    assert_eq!(
        view.platform(Platform::Twitter).unwrap().color.as_deref(),
        Some("#1DA1F2")
    );
    assert!(view.platform(Platform::Telegram).unwrap().color.is_none());
    assert!(view
        .trends
        .iter()
        .all(|r| (r.platform == Platform::Twitter) == r.color.is_some()));
}

#[test]
fn rank_limit_and_metric_apply_per_platform() {
    let data = dataset();
    let mut p = params("", "");
    p.rank_by = Metric::Views;
    p.rank_limit = Some(1);
    let view = render(&data, &p, &Palette::default());

    assert_eq!(ranked_ids(view.platform(Platform::Telegram).unwrap()), vec!["t3"]);
    assert_eq!(ranked_ids(view.platform(Platform::Twitter).unwrap()), vec!["w3"]);
}

#[test]
fn view_serializes_to_json() {
    let data = dataset();
    let view = render(&data, &params("(macron", "macron"), &Palette::default());
    let json = serde_json::to_value(&view).unwrap();

    assert_eq!(json["bucket_width"], "7D");
    assert_eq!(json["rank_by"], "engagements");
    assert_eq!(json["platforms"][0]["platform"], "Telegram");
    assert_eq!(json["platforms"][0]["query_error"]["kind"], "unbalanced_paren");
    assert!(json["trends"].is_array());
}
