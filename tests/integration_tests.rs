use media_intel::aggregates::{AggregateKind, Bucket};
use media_intel::cleaner::SkipReason;
use media_intel::insights::InsightFact;
use media_intel::pipeline::{PipelineError, run_file, run_reader};
use media_intel::report::{RECAP_FILE, SUMMARY_FILE, chart_file_name, write_report};
use media_intel::schema::CanonicalField;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn bucket(label: &str, value: u64) -> Bucket {
    Bucket {
        label: label.to_string(),
        value,
    }
}

#[test]
fn test_full_pipeline() {
    let report = run_file(&fixture("sample_media.csv")).expect("Failed to run pipeline");

    assert_eq!(report.mapping.header(CanonicalField::Date), " Date ");
    assert_eq!(report.mapping.header(CanonicalField::MediaType), "MediaType");

    assert_eq!(report.rows_read, 9);
    assert_eq!(report.rows_kept, 7);
    assert_eq!(report.skipped.get(SkipReason::InvalidDate), 1);
    assert_eq!(report.skipped.get(SkipReason::InvalidEngagements), 1);

    let aggregates = &report.aggregates;
    assert_eq!(aggregates.sentiment.count("Positive"), Some(4));
    assert_eq!(
        aggregates.platforms.buckets,
        vec![
            bucket("Instagram", 420),
            bucket("Facebook", 280),
            bucket("Twitter", 200),
            bucket("TikTok", 0),
        ]
    );
    assert_eq!(aggregates.engagement_trend.points.len(), 4);
    assert_eq!(
        aggregates.top_locations.buckets,
        vec![
            bucket("Surabaya", 300),
            bucket("Bandung", 200),
            bucket("Jakarta", 200),
            bucket("Medan", 200),
            bucket("Denpasar", 0),
        ]
    );
}

#[test]
fn test_aggregates_ignore_row_order() {
    let text = fs::read_to_string(fixture("sample_media.csv")).unwrap();
    let mut lines: Vec<&str> = text.lines().collect();
    let header = lines.remove(0);

    let baseline = run_reader(text.as_bytes()).unwrap();

    for shift in 1..lines.len() {
        let mut rows = lines.clone();
        rows.rotate_left(shift);
        rows.reverse();
        let shuffled = format!("{header}\n{}\n", rows.join("\n"));

        let report = run_reader(shuffled.as_bytes()).unwrap();
        assert_eq!(report.aggregates, baseline.aggregates, "shift {shift}");
        assert_eq!(report.insights, baseline.insights, "shift {shift}");
        assert_eq!(report.skipped, baseline.skipped);
    }
}

#[test]
fn test_top_locations_length_is_capped() {
    let mut csv = String::from("date,platform,sentiment,location,engagements,media_type\n");
    for i in 0..9 {
        csv.push_str(&format!("2023-02-01,X,Positive,Loc{i},{},Text\n", 100 - i * 5));
    }
    csv.push_str("2023-02-01,X,Positive,Loc9,80,Text\n");

    let report = run_reader(csv.as_bytes()).unwrap();
    let top = &report.aggregates.top_locations;

    assert_eq!(top.buckets.len(), 5);
    assert_eq!(top.distinct_locations, 10);
    let labels: Vec<&str> = top.buckets.iter().map(|b| b.label.as_str()).collect();
    // Loc4 and Loc9 tie at 80.
    assert_eq!(labels, vec!["Loc0", "Loc1", "Loc2", "Loc3", "Loc4"]);
    for pair in top.buckets.windows(2) {
        assert!(pair[0].value >= pair[1].value);
    }
}

#[test]
fn test_every_cleaned_row_counts_toward_totals() {
    let report = run_file(&fixture("sample_media.csv")).unwrap();
    let trend_total = report.aggregates.engagement_trend.total();

    assert_eq!(trend_total, report.aggregates.platforms.total);
    assert_eq!(trend_total, report.aggregates.top_locations.total);
    assert_eq!(report.aggregates.sentiment.total, report.rows_kept as u64);
    assert_eq!(report.aggregates.media_types.total, report.rows_kept as u64);
}

#[test]
fn test_insight_order_and_count() {
    let report = run_file(&fixture("sample_media.csv")).unwrap();
    let kinds: Vec<AggregateKind> = report.insights.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, AggregateKind::ALL.to_vec());

    for set in &report.insights {
        for (i, insight) in set.insights.iter().enumerate() {
            assert_eq!(insight.source, set.kind);
            assert_eq!(insight.rank as usize, i + 1);
        }
    }

    match &report.insights[1].insights[0].fact {
        InsightFact::Peak { date, engagements } => {
            assert_eq!(date.to_string(), "2023-01-02");
            assert_eq!(*engagements, 350);
        }
        other => panic!("unexpected fact: {other:?}"),
    }
}

#[test]
fn test_write_report_outputs() {
    let out_dir = env::temp_dir().join("media_intel_integration_report");
    let _ = fs::remove_dir_all(&out_dir);

    let report = run_file(&fixture("sample_media.csv")).unwrap();
    write_report(&report, &out_dir).unwrap();

    for kind in AggregateKind::ALL {
        let html = fs::read_to_string(out_dir.join(chart_file_name(kind))).unwrap();
        assert!(html.contains(kind.title()));
    }

    let recap = fs::read_to_string(out_dir.join(RECAP_FILE)).unwrap();
    assert!(recap.starts_with("# Media Intelligence Dashboard Recap"));
    assert_eq!(recap.matches("\n## ").count(), 5);
    assert_eq!(recap.lines().filter(|l| l.starts_with("- ")).count(), 15);
    assert!(recap.contains("'Instagram' leads 'Facebook' by 140 engagements."));

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join(SUMMARY_FILE)).unwrap()).unwrap();
    assert_eq!(summary["rows_kept"], 7);
    assert_eq!(summary["skipped"]["invalid_date"], 1);

    fs::remove_dir_all(&out_dir).unwrap();
}

#[test]
fn test_repeated_runs_write_identical_recaps() {
    let a = run_file(&fixture("sample_media.csv")).unwrap();
    let b = run_file(&fixture("sample_media.csv")).unwrap();

    assert_eq!(
        media_intel::report::recap::render_recap(&a.insights),
        media_intel::report::recap::render_recap(&b.insights)
    );
}

#[test]
fn test_missing_columns_reported_together() {
    let csv = "Date,Platform,Notes\n2023-01-01,Twitter,hi\n";
    match run_reader(csv.as_bytes()) {
        Err(PipelineError::Schema(err)) => {
            assert_eq!(
                err.missing,
                vec![
                    CanonicalField::Sentiment,
                    CanonicalField::Location,
                    CanonicalField::Engagements,
                    CanonicalField::MediaType,
                ]
            );
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}
