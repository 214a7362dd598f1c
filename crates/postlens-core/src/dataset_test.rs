use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn parses_json_array_with_dataframe_column_names() {
    let content = r#"[
        {"message_id": 42, "plateforme": "Telegram", "user_id": 7, "user_name": "chan",
         "date": "2024-01-05 13:45:00", "text": "bonjour", "translated_text": "hello",
         "views": 1200, "engagements": 30, "share": 10, "likes": 15, "comments": 5}
    ]"#;
    let (dataset, report) = parse_dataset(content).unwrap();
    assert_eq!(report.accepted, 1);
    assert_eq!(report.skipped_total(), 0);

    let post = &dataset.posts()[0];
    assert_eq!(post.id, "42");
    assert_eq!(post.platform, Platform::Telegram);
    assert_eq!(post.author_id.as_deref(), Some("7"));
    assert_eq!(post.author_name, "chan");
    assert_eq!(post.date, date(2024, 1, 5));
    assert_eq!(post.translated_text.as_deref(), Some("hello"));
    assert_eq!(post.views, 1200);
    assert_eq!(post.shares, 10);
}

#[test]
fn parses_json_lines_and_skips_blank_lines() {
    let content = "\
{\"id\": \"a\", \"platform\": \"twitter\", \"date\": \"2024-02-01\"}

{\"id\": \"b\", \"platform\": \"TELEGRAM\", \"date\": \"2024-02-02T08:00:00Z\"}
";
    let (dataset, report) = parse_dataset(content).unwrap();
    assert_eq!(report.accepted, 2);
    assert_eq!(dataset.posts()[0].platform, Platform::Twitter);
    assert_eq!(dataset.posts()[1].date, date(2024, 2, 2));
}

#[test]
fn malformed_json_line_reports_line_number() {
    let content = "{\"id\": \"a\", \"platform\": \"twitter\", \"date\": \"2024-02-01\"}\n{not json\n";
    let err = parse_dataset(content).unwrap_err();
    assert!(
        matches!(err, DatasetError::ParseLine { line: 2, .. }),
        "expected ParseLine(2), got: {err:?}"
    );
}

#[test]
fn rows_missing_required_fields_are_skipped_and_counted() {
    let content = r#"[
        {"platform": "Twitter", "date": "2024-01-01"},
        {"id": "1", "date": "2024-01-01"},
        {"id": "2", "platform": "Mastodon", "date": "2024-01-01"},
        {"id": "3", "platform": "Twitter"},
        {"id": "4", "platform": "Twitter", "date": "yesterday"},
        {"id": "5", "platform": "Twitter", "date": "2024-01-01"}
    ]"#;
    let (dataset, report) = parse_dataset(content).unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.skipped_total(), 5);
    assert_eq!(report.skipped[&SkipReason::MissingId], 1);
    assert_eq!(report.skipped[&SkipReason::MissingPlatform], 1);
    assert_eq!(report.skipped[&SkipReason::UnknownPlatform], 1);
    assert_eq!(report.skipped[&SkipReason::MissingDate], 1);
    assert_eq!(report.skipped[&SkipReason::InvalidDate], 1);
}

#[test]
fn canonical_column_wins_over_its_alias() {
    let content = r#"[
        {"id": "a", "message_id": 99, "platform": "Twitter", "plateforme": "Telegram",
         "date": "2024-03-02", "timestamp": 1704067200000, "share": 4, "shares": 6},
        {"id": null, "message_id": 7, "platform": "Twitter", "date": "2024-03-03"}
    ]"#;
    let (dataset, report) = parse_dataset(content).unwrap();
    assert_eq!(report.accepted, 2);

    let first = &dataset.posts()[0];
    assert_eq!(first.id, "a");
    assert_eq!(first.platform, Platform::Twitter);
    assert_eq!(first.date, date(2024, 3, 2));
    assert_eq!(first.shares, 6);

    assert_eq!(dataset.posts()[1].id, "7");
}

#[test]
fn rows_of_the_wrong_shape_are_skipped_not_fatal() {
    let content = r#"[
        {"id": "1", "platform": "Twitter", "date": "2024-01-01", "text": 12},
        "not a row",
        {"id": "2", "platform": "Twitter", "date": "2024-01-01", "text": "ok"}
    ]"#;
    let (dataset, report) = parse_dataset(content).unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.posts()[0].id, "2");
    assert_eq!(report.skipped[&SkipReason::MalformedRow], 2);
}

#[test]
fn metric_fields_default_to_zero_and_clamp_negatives() {
    let content = r#"[
        {"id": "1", "platform": "Twitter", "date": "2024-01-01",
         "views": null, "likes": -3, "comments": 4.9, "share": "2"}
    ]"#;
    let (dataset, _) = parse_dataset(content).unwrap();
    let post = &dataset.posts()[0];
    assert_eq!(post.views, 0);
    assert_eq!(post.likes, 0);
    assert_eq!(post.comments, 4);
    assert_eq!(post.shares, 2);
}

#[test]
fn engagements_fall_back_to_component_sum() {
    let content = r#"[
        {"id": "1", "platform": "Twitter", "date": "2024-01-01", "likes": 3, "share": 2, "comments": 1},
        {"id": "2", "platform": "Twitter", "date": "2024-01-01", "likes": 3, "engagements": 100}
    ]"#;
    let (dataset, _) = parse_dataset(content).unwrap();
    assert_eq!(dataset.posts()[0].engagements, 6);
    assert_eq!(dataset.posts()[1].engagements, 100);
}

#[test]
fn epoch_millisecond_dates_are_accepted() {
    // 2024-03-10T00:00:00Z
    let content = r#"[{"id": "1", "platform": "Telegram", "date": 1710028800000}]"#;
    let (dataset, _) = parse_dataset(content).unwrap();
    assert_eq!(dataset.posts()[0].date, date(2024, 3, 10));
}

#[test]
fn date_spans_cover_all_and_per_platform() {
    let content = r#"[
        {"id": "1", "platform": "Telegram", "date": "2024-01-03"},
        {"id": "2", "platform": "Twitter", "date": "2024-01-01"},
        {"id": "3", "platform": "Telegram", "date": "2024-01-09"}
    ]"#;
    let (dataset, _) = parse_dataset(content).unwrap();
    assert_eq!(
        dataset.date_span(),
        Some((date(2024, 1, 1), date(2024, 1, 9)))
    );
    assert_eq!(
        dataset.platform_date_span(Platform::Telegram),
        Some((date(2024, 1, 3), date(2024, 1, 9)))
    );
    assert_eq!(Dataset::default().date_span(), None);
}

#[test]
fn load_dataset_reports_missing_file() {
    let err = load_dataset(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
}

#[test]
fn load_dataset_reads_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("posts.jsonl");
    std::fs::write(
        &path,
        "{\"id\": \"1\", \"platform\": \"Twitter\", \"date\": \"2024-01-01\", \"text\": \"macron\"}\n",
    )
    .unwrap();

    let (dataset, report) = load_dataset(&path).unwrap();
    assert_eq!(report.accepted, 1);
    assert_eq!(dataset.posts()[0].text.as_deref(), Some("macron"));
}
