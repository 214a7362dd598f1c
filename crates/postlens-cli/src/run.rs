//! The `run` command: one dashboard pass rendered to the terminal.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use postlens_analytics::{
    render, BucketWidth, DashboardParams, DashboardView, Language, Metric, PlatformView,
    SearchField, DEFAULT_QUERY,
};
use postlens_core::{Dataset, Palette, Platform};
use postlens_query::MatchOptions;

use crate::format::{compact, percent, truncate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Query for Telegram posts
    #[arg(long, default_value = DEFAULT_QUERY)]
    pub telegram: String,

    /// Query for Twitter posts
    #[arg(long, default_value = DEFAULT_QUERY)]
    pub twitter: String,

    /// First day to include (YYYY-MM-DD); defaults to the earliest post
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD); defaults to the latest post
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// `english` searches translations, anything else the original text
    #[arg(long, default_value = "english")]
    pub language: Language,

    /// Search field for Telegram, overriding --language
    #[arg(long)]
    pub telegram_field: Option<SearchField>,

    /// Search field for Twitter, overriding --language
    #[arg(long)]
    pub twitter_field: Option<SearchField>,

    /// Match letter case exactly
    #[arg(long)]
    pub case_sensitive: bool,

    /// Treat accented letters as distinct
    #[arg(long)]
    pub keep_accents: bool,

    /// Match terms anywhere, not only on word boundaries
    #[arg(long)]
    pub substring: bool,

    /// Trend bucket width, e.g. 7D or 2W
    #[arg(long, env = "POSTLENS_ROLLING_PERIOD", default_value = "7D")]
    pub rolling: BucketWidth,

    /// Metric to rank posts by
    #[arg(long, default_value = "engagements")]
    pub rank_by: Metric,

    /// Ranked posts shown per platform
    #[arg(long, default_value = "10")]
    pub top: usize,

    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl RunArgs {
    /// Build dashboard parameters; open date bounds fall back to the
    /// dataset's span without crossing the bound that was given.
    ///
    /// # Errors
    ///
    /// Returns an error if `--from` is after `--to`.
    pub fn to_params(&self, dataset: &Dataset) -> anyhow::Result<DashboardParams> {
        let date_range = DashboardParams::resolve_range(dataset, self.from, self.to)?;

        let mut field_overrides = BTreeMap::new();
        if let Some(field) = self.telegram_field {
            field_overrides.insert(Platform::Telegram, field);
        }
        if let Some(field) = self.twitter_field {
            field_overrides.insert(Platform::Twitter, field);
        }

        Ok(DashboardParams {
            queries: BTreeMap::from([
                (Platform::Telegram, self.telegram.clone()),
                (Platform::Twitter, self.twitter.clone()),
            ]),
            date_range,
            language: self.language,
            field_overrides,
            match_options: MatchOptions {
                ignore_case: !self.case_sensitive,
                ignore_accent: !self.keep_accents,
                match_word: !self.substring,
            },
            bucket_width: self.rolling,
            rank_by: self.rank_by,
            rank_limit: Some(self.top),
        })
    }
}

/// Render the dashboard and print it.
///
/// # Errors
///
/// Returns an error if the parameters are invalid or JSON output fails.
pub(crate) fn run_dashboard(
    dataset: &Dataset,
    palette: &Palette,
    args: &RunArgs,
) -> anyhow::Result<()> {
    let params = args.to_params(dataset)?;
    let view = render(dataset, &params, palette);

    let matched: u64 = view.platforms.iter().map(|p| p.totals.posts).sum();
    tracing::info!(
        matched,
        trend_rows = view.trends.len(),
        width = %view.bucket_width,
        "dashboard pass complete"
    );

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Table => print_tables(&view),
    }
    Ok(())
}

fn print_tables(view: &DashboardView) {
    match view.date_range {
        Some(range) => println!(
            "Range: {} to {} | Buckets: {} | Ranked by: {}",
            range.start(),
            range.end(),
            view.bucket_width,
            view.rank_by
        ),
        None => println!("Range: (empty dataset)"),
    }
    println!();

    print_totals(view);
    println!();
    print_trends(view);

    for platform in &view.platforms {
        println!();
        print_ranking(platform, view.rank_by);
    }
}

fn print_totals(view: &DashboardView) {
    println!(
        "{:<10}{:>8}{:>9}{:>9}{:>13}{:>9}{:>9}{:>9}  QUERY",
        "PLATFORM", "POSTS", "AUTHORS", "VIEWS", "ENGAGEMENTS", "%POSTS", "%VIEWS", "%ENG"
    );
    for p in &view.platforms {
        let query = match &p.query_error {
            Some(e) => format!("{} [error: {}]", p.query, e.kind),
            None => p.expression.clone().unwrap_or_default(),
        };
        println!(
            "{:<10}{:>8}{:>9}{:>9}{:>13}{:>9}{:>9}{:>9}  {}",
            p.platform.as_str(),
            compact(p.totals.posts),
            compact(p.totals.authors),
            compact(p.totals.views),
            compact(p.totals.engagements),
            percent(p.share_of_total.posts),
            percent(p.share_of_total.views),
            percent(p.share_of_total.engagements),
            query
        );
    }
}

fn print_trends(view: &DashboardView) {
    let mut grid: BTreeMap<(Platform, NaiveDate), BTreeMap<Metric, u64>> = BTreeMap::new();
    for row in &view.trends {
        grid.entry((row.platform, row.bucket_start))
            .or_default()
            .insert(row.metric, row.value);
    }

    if grid.is_empty() {
        println!("no trend data");
        return;
    }

    println!(
        "{:<10}{:<12}{:>8}{:>9}{:>13}",
        "PLATFORM", "BUCKET", "POSTS", "VIEWS", "ENGAGEMENTS"
    );
    for ((platform, start), values) in &grid {
        let get = |m: Metric| compact(values.get(&m).copied().unwrap_or(0));
        println!(
            "{:<10}{:<12}{:>8}{:>9}{:>13}",
            platform.as_str(),
            start.to_string(),
            get(Metric::Posts),
            get(Metric::Views),
            get(Metric::Engagements)
        );
    }
}

fn print_ranking(platform: &PlatformView, metric: Metric) {
    println!("Top {} posts by {metric}", platform.platform);
    if platform.ranked.is_empty() {
        println!("  (none)");
        return;
    }
    for post in &platform.ranked {
        println!(
            "{:>3}. {} {:>7}  {:<16} {}",
            post.rank,
            post.date,
            compact(post.value(metric)),
            truncate(&post.author_name, 16),
            truncate(&post.text, 60)
        );
        if let Some(link) = &post.permalink {
            println!("     {link}");
        }
    }
}
