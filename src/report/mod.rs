//! Report assembly: one chart per aggregate, the recap, and a JSON summary.
//!
//! Everything here is serialization of an already computed [`RunReport`].

pub mod chart;
pub mod recap;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::aggregates::{AggregateKind, Aggregates, Bucket};
use crate::output::write_json;
use crate::pipeline::RunReport;
use chart::{ChartKind, render_chart};
use recap::render_recap;

pub const RECAP_FILE: &str = "media_intelligence_recap.txt";
pub const SUMMARY_FILE: &str = "run_summary.json";

/// File name of the chart for `kind`.
pub fn chart_file_name(kind: AggregateKind) -> &'static str {
    match kind {
        AggregateKind::Sentiment => "sentiment_breakdown_pie.html",
        AggregateKind::EngagementTrend => "engagement_trend_line.html",
        AggregateKind::Platform => "platform_engagements_bar.html",
        AggregateKind::MediaType => "media_type_mix_pie.html",
        AggregateKind::TopLocations => "top_locations_bar.html",
    }
}

/// Chart type and plotted values for one aggregate.
pub fn chart_series(kind: AggregateKind, aggregates: &Aggregates) -> (ChartKind, Vec<(String, u64)>) {
    let ranked = |buckets: &[Bucket]| {
        buckets
            .iter()
            .map(|b| (b.label.clone(), b.value))
            .collect::<Vec<_>>()
    };

    match kind {
        AggregateKind::Sentiment => (ChartKind::Pie, ranked(&aggregates.sentiment.buckets)),
        AggregateKind::EngagementTrend => (
            ChartKind::Line,
            aggregates
                .engagement_trend
                .points
                .iter()
                .map(|p| (p.date.format("%Y-%m-%d").to_string(), p.engagements))
                .collect(),
        ),
        AggregateKind::Platform => (ChartKind::Bar, ranked(&aggregates.platforms.buckets)),
        AggregateKind::MediaType => (ChartKind::Pie, ranked(&aggregates.media_types.buckets)),
        AggregateKind::TopLocations => (ChartKind::Bar, ranked(&aggregates.top_locations.buckets)),
    }
}

/// Writes the five charts, the recap and the run summary into `out_dir`.
///
/// Returns the written paths: charts in report order, then recap, then summary.
pub fn write_report(report: &RunReport, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut written = Vec::new();

    for kind in AggregateKind::ALL {
        let (chart_kind, series) = chart_series(kind, &report.aggregates);
        let path = out_dir.join(chart_file_name(kind));
        fs::write(&path, render_chart(kind.title(), chart_kind, &series))
            .with_context(|| format!("writing chart {}", path.display()))?;
        debug!(path = %path.display(), points = series.len(), "Chart written");
        written.push(path);
    }

    let recap_path = out_dir.join(RECAP_FILE);
    fs::write(&recap_path, render_recap(&report.insights))
        .with_context(|| format!("writing recap {}", recap_path.display()))?;
    written.push(recap_path);

    let summary_path = out_dir.join(SUMMARY_FILE);
    write_json(&summary_path, report)?;
    written.push(summary_path);

    info!(out_dir = %out_dir.display(), files = written.len(), "Report written");
    Ok(written)
}
