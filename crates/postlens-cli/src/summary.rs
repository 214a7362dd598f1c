use std::path::Path;

use postlens_core::{Dataset, LoadReport, Platform};

use crate::format::fmt_date;

/// Print the load report and a per-platform overview of the dataset.
pub(crate) fn run_dataset_summary(path: &Path, dataset: &Dataset, report: &LoadReport) {
    println!("Dataset: {}", path.display());
    println!(
        "Rows accepted: {}, skipped: {}",
        report.accepted,
        report.skipped_total()
    );
    for (reason, count) in &report.skipped {
        println!("  skipped {count:>6}  {reason}");
    }
    println!();

    println!(
        "{:<10}{:>8}{:>12}{:>12}{:>10}",
        "PLATFORM", "POSTS", "FIRST", "LAST", "AUTHORS"
    );
    for platform in Platform::ALL {
        let posts = dataset.for_platform(platform).count();
        let span = dataset.platform_date_span(platform);
        let mut authors: Vec<&str> = dataset
            .for_platform(platform)
            .filter_map(|p| p.author_id.as_deref())
            .collect();
        authors.sort_unstable();
        authors.dedup();

        println!(
            "{:<10}{:>8}{:>12}{:>12}{:>10}",
            platform.as_str(),
            posts,
            fmt_date(span.map(|(lo, _)| lo)),
            fmt_date(span.map(|(_, hi)| hi)),
            authors.len()
        );
    }
}
