use std::collections::BTreeMap;
use tracing::debug;

use crate::aggregates::types::{
    Aggregates, CategoryDistribution, EngagementTrend, PlatformEngagement, TopLocations, TrendPoint,
};
use crate::aggregates::utility::{group_sum, rank_desc, saturating_total};
use crate::cleaner::CleanedDataset;

/// How many locations the location ranking keeps.
pub const TOP_LOCATIONS: usize = 5;

/// Rows per sentiment label.
pub fn sentiment_distribution(dataset: &CleanedDataset) -> CategoryDistribution {
    let groups = group_sum(dataset.records(), |r| r.sentiment.as_str(), |_| 1);
    CategoryDistribution {
        buckets: rank_desc(groups),
        total: dataset.len() as u64,
    }
}

/// Engagements summed per day, earliest first.
pub fn engagement_trend(dataset: &CleanedDataset) -> EngagementTrend {
    let mut by_date = BTreeMap::new();
    for record in dataset.records() {
        let sum = by_date.entry(record.date).or_insert(0u64);
        *sum = sum.saturating_add(record.engagements);
    }

    EngagementTrend {
        points: by_date
            .into_iter()
            .map(|(date, engagements)| TrendPoint { date, engagements })
            .collect(),
    }
}

/// Engagements summed per platform, largest first.
pub fn platform_engagement(dataset: &CleanedDataset) -> PlatformEngagement {
    let groups = group_sum(dataset.records(), |r| r.platform.as_str(), |r| r.engagements);
    let buckets = rank_desc(groups);
    let total = saturating_total(buckets.iter().map(|b| b.value));
    PlatformEngagement { buckets, total }
}

/// Rows per media type.
pub fn media_type_mix(dataset: &CleanedDataset) -> CategoryDistribution {
    let groups = group_sum(dataset.records(), |r| r.media_type.as_str(), |_| 1);
    CategoryDistribution {
        buckets: rank_desc(groups),
        total: dataset.len() as u64,
    }
}

/// The `n` locations with the most engagements.
///
/// Returns every location when fewer than `n` exist.
pub fn top_locations(dataset: &CleanedDataset, n: usize) -> TopLocations {
    let groups = group_sum(dataset.records(), |r| r.location.as_str(), |r| r.engagements);
    let mut buckets = rank_desc(groups);
    let distinct_locations = buckets.len();
    let total = saturating_total(buckets.iter().map(|b| b.value));
    buckets.truncate(n);

    TopLocations {
        buckets,
        distinct_locations,
        total,
    }
}

/// Computes all five aggregates.
pub fn aggregate_all(dataset: &CleanedDataset) -> Aggregates {
    let aggregates = Aggregates {
        sentiment: sentiment_distribution(dataset),
        engagement_trend: engagement_trend(dataset),
        platforms: platform_engagement(dataset),
        media_types: media_type_mix(dataset),
        top_locations: top_locations(dataset, TOP_LOCATIONS),
    };

    debug!(
        sentiments = aggregates.sentiment.buckets.len(),
        days = aggregates.engagement_trend.points.len(),
        platforms = aggregates.platforms.buckets.len(),
        media_types = aggregates.media_types.buckets.len(),
        locations = aggregates.top_locations.distinct_locations,
        "Aggregates computed"
    );

    aggregates
}
