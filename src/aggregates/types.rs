//! Result types produced by the aggregation functions.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregates::utility::saturating_total;

/// Identifies one of the five aggregates, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKind {
    Sentiment,
    EngagementTrend,
    Platform,
    MediaType,
    TopLocations,
}

impl AggregateKind {
    pub const ALL: [AggregateKind; 5] = [
        AggregateKind::Sentiment,
        AggregateKind::EngagementTrend,
        AggregateKind::Platform,
        AggregateKind::MediaType,
        AggregateKind::TopLocations,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AggregateKind::Sentiment => "Sentiment Breakdown",
            AggregateKind::EngagementTrend => "Engagement Trend Over Time",
            AggregateKind::Platform => "Engagements by Platform",
            AggregateKind::MediaType => "Media Type Mix",
            AggregateKind::TopLocations => "Top 5 Locations by Engagements",
        }
    }
}

/// A labelled value in a ranked list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub value: u64,
}

/// Row counts per category, ranked by count descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDistribution {
    pub buckets: Vec<Bucket>,
    pub total: u64,
}

impl CategoryDistribution {
    pub fn count(&self, label: &str) -> Option<u64> {
        self.buckets.iter().find(|b| b.label == label).map(|b| b.value)
    }
}

/// Engagements summed for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub engagements: u64,
}

/// Daily engagement totals in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngagementTrend {
    pub points: Vec<TrendPoint>,
}

impl EngagementTrend {
    pub fn total(&self) -> u64 {
        saturating_total(self.points.iter().map(|p| p.engagements))
    }
}

/// Summed engagements per platform, ranked descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformEngagement {
    pub buckets: Vec<Bucket>,
    pub total: u64,
}

/// The highest-engagement locations, ranked descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopLocations {
    pub buckets: Vec<Bucket>,
    /// Number of distinct locations before truncation.
    pub distinct_locations: usize,
    /// Engagements across every location, not just the listed ones.
    pub total: u64,
}

/// All five aggregates of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    pub sentiment: CategoryDistribution,
    pub engagement_trend: EngagementTrend,
    pub platforms: PlatformEngagement,
    pub media_types: CategoryDistribution,
    pub top_locations: TopLocations,
}
