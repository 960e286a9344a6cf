//! Structured observations derived from each aggregate.
//!
//! Every aggregate yields exactly three [`Insight`]s in a fixed rank order.
//! Insights carry data only; sentence wording lives in [`crate::report::recap`].

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregates::utility::{pct, saturating_total};
use crate::aggregates::{
    AggregateKind, Aggregates, Bucket, CategoryDistribution, EngagementTrend, PlatformEngagement,
    TopLocations,
};

/// A ranked entry with its share of the aggregate total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub label: String,
    pub value: u64,
    pub share_pct: f64,
}

/// Overall movement between the first and last period of the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increase,
    Decrease,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "fact", rename_all = "snake_case")]
pub enum InsightFact {
    /// The highest-ranked category.
    Leader { entry: RankedEntry },
    /// The second-ranked category, absent when only one exists.
    RunnerUp { entry: Option<RankedEntry> },
    /// Rows analyzed and the number of distinct categories.
    RecordCount { records: u64, categories: usize },
    /// Day with the most engagements.
    Peak { date: NaiveDate, engagements: u64 },
    /// First period compared with the last one.
    Direction {
        first_date: NaiveDate,
        first: u64,
        last_date: NaiveDate,
        last: u64,
        direction: TrendDirection,
        change_pct: Option<f64>,
    },
    /// Sum of engagements and how many groups contributed.
    TotalEngagements { total: u64, groups: usize },
    /// Lead of the top entry over the runner-up.
    Margin {
        leader: String,
        runner_up: Option<String>,
        margin: u64,
    },
    /// Share of all engagements held by the listed entries.
    Concentration {
        listed: usize,
        listed_total: u64,
        share_pct: f64,
    },
    /// Nothing to rank.
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub source: AggregateKind,
    /// 1-based position within the aggregate's three insights.
    pub rank: u8,
    pub fact: InsightFact,
}

/// The three insights of one aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightSet {
    pub kind: AggregateKind,
    pub insights: [Insight; 3],
}

impl InsightSet {
    fn new(kind: AggregateKind, facts: [InsightFact; 3]) -> Self {
        let [a, b, c] = facts;
        let insight = |rank, fact| Insight {
            source: kind,
            rank,
            fact,
        };
        Self {
            kind,
            insights: [insight(1, a), insight(2, b), insight(3, c)],
        }
    }
}

fn ranked(bucket: &Bucket, total: u64) -> RankedEntry {
    RankedEntry {
        label: bucket.label.clone(),
        value: bucket.value,
        share_pct: pct(bucket.value, total),
    }
}

fn leader(buckets: &[Bucket], total: u64) -> InsightFact {
    match buckets.first() {
        Some(top) => InsightFact::Leader {
            entry: ranked(top, total),
        },
        None => InsightFact::NoData,
    }
}

fn margin(buckets: &[Bucket]) -> InsightFact {
    match buckets {
        [] => InsightFact::NoData,
        [only] => InsightFact::Margin {
            leader: only.label.clone(),
            runner_up: None,
            margin: only.value,
        },
        [first, second, ..] => InsightFact::Margin {
            leader: first.label.clone(),
            runner_up: Some(second.label.clone()),
            margin: first.value - second.value,
        },
    }
}

/// Dominant category, runner-up, and record count.
pub fn distribution_insights(kind: AggregateKind, dist: &CategoryDistribution) -> InsightSet {
    InsightSet::new(
        kind,
        [
            leader(&dist.buckets, dist.total),
            InsightFact::RunnerUp {
                entry: dist.buckets.get(1).map(|b| ranked(b, dist.total)),
            },
            InsightFact::RecordCount {
                records: dist.total,
                categories: dist.buckets.len(),
            },
        ],
    )
}

/// Peak day, first-versus-last direction, and total engagements.
pub fn trend_insights(trend: &EngagementTrend) -> InsightSet {
    let kind = AggregateKind::EngagementTrend;

    // Earliest date wins a tie for the peak.
    let peak = trend.points.iter().max_by(|a, b| {
        a.engagements
            .cmp(&b.engagements)
            .then_with(|| b.date.cmp(&a.date))
    });

    let (Some(peak), Some(first), Some(last)) = (peak, trend.points.first(), trend.points.last())
    else {
        return InsightSet::new(kind, [InsightFact::NoData, InsightFact::NoData, InsightFact::NoData]);
    };

    let direction = match last.engagements.cmp(&first.engagements) {
        std::cmp::Ordering::Greater => TrendDirection::Increase,
        std::cmp::Ordering::Less => TrendDirection::Decrease,
        std::cmp::Ordering::Equal => TrendDirection::Flat,
    };
    let change_pct = (first.engagements > 0).then(|| {
        (last.engagements as f64 - first.engagements as f64) / first.engagements as f64 * 100.0
    });

    InsightSet::new(
        kind,
        [
            InsightFact::Peak {
                date: peak.date,
                engagements: peak.engagements,
            },
            InsightFact::Direction {
                first_date: first.date,
                first: first.engagements,
                last_date: last.date,
                last: last.engagements,
                direction,
                change_pct,
            },
            InsightFact::TotalEngagements {
                total: trend.total(),
                groups: trend.points.len(),
            },
        ],
    )
}

/// Leading platform, its margin over the runner-up, and the overall total.
pub fn platform_insights(platforms: &PlatformEngagement) -> InsightSet {
    InsightSet::new(
        AggregateKind::Platform,
        [
            leader(&platforms.buckets, platforms.total),
            margin(&platforms.buckets),
            InsightFact::TotalEngagements {
                total: platforms.total,
                groups: platforms.buckets.len(),
            },
        ],
    )
}

/// Top location, its margin, and how concentrated engagement is in the list.
pub fn location_insights(top: &TopLocations) -> InsightSet {
    let listed_total = saturating_total(top.buckets.iter().map(|b| b.value));
    InsightSet::new(
        AggregateKind::TopLocations,
        [
            leader(&top.buckets, top.total),
            margin(&top.buckets),
            InsightFact::Concentration {
                listed: top.buckets.len(),
                listed_total,
                share_pct: pct(listed_total, top.total),
            },
        ],
    )
}

/// Fifteen insights, in report order.
pub fn generate_insights(aggregates: &Aggregates) -> Vec<InsightSet> {
    AggregateKind::ALL
        .iter()
        .map(|kind| match kind {
            AggregateKind::Sentiment => distribution_insights(*kind, &aggregates.sentiment),
            AggregateKind::EngagementTrend => trend_insights(&aggregates.engagement_trend),
            AggregateKind::Platform => platform_insights(&aggregates.platforms),
            AggregateKind::MediaType => distribution_insights(*kind, &aggregates.media_types),
            AggregateKind::TopLocations => location_insights(&aggregates.top_locations),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::TrendPoint;

    fn bucket(label: &str, value: u64) -> Bucket {
        Bucket {
            label: label.to_string(),
            value,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    #[test]
    fn test_distribution_insights() {
        let dist = CategoryDistribution {
            buckets: vec![bucket("Positive", 3), bucket("Neutral", 2), bucket("Negative", 1)],
            total: 6,
        };
        let set = distribution_insights(AggregateKind::Sentiment, &dist);

        assert_eq!(set.kind, AggregateKind::Sentiment);
        let ranks: Vec<u8> = set.insights.iter().map(|i| i.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(
            set.insights[0].fact,
            InsightFact::Leader {
                entry: RankedEntry {
                    label: "Positive".into(),
                    value: 3,
                    share_pct: 50.0
                }
            }
        );
        match &set.insights[1].fact {
            InsightFact::RunnerUp { entry: Some(entry) } => assert_eq!(entry.label, "Neutral"),
            other => panic!("unexpected fact: {other:?}"),
        }
        assert_eq!(
            set.insights[2].fact,
            InsightFact::RecordCount {
                records: 6,
                categories: 3
            }
        );
    }

    #[test]
    fn test_single_category_has_no_runner_up() {
        let dist = CategoryDistribution {
            buckets: vec![bucket("Video", 4)],
            total: 4,
        };
        let set = distribution_insights(AggregateKind::MediaType, &dist);
        assert_eq!(set.insights[1].fact, InsightFact::RunnerUp { entry: None });
    }

    #[test]
    fn test_trend_insights() {
        let trend = EngagementTrend {
            points: vec![
                TrendPoint { date: day(1), engagements: 230 },
                TrendPoint { date: day(2), engagements: 350 },
                TrendPoint { date: day(3), engagements: 320 },
            ],
        };
        let set = trend_insights(&trend);

        assert_eq!(
            set.insights[0].fact,
            InsightFact::Peak {
                date: day(2),
                engagements: 350
            }
        );
        match &set.insights[1].fact {
            InsightFact::Direction {
                direction,
                first,
                last,
                ..
            } => {
                assert_eq!(*direction, TrendDirection::Increase);
                assert_eq!((*first, *last), (230, 320));
            }
            other => panic!("unexpected fact: {other:?}"),
        }
        assert_eq!(
            set.insights[2].fact,
            InsightFact::TotalEngagements { total: 900, groups: 3 }
        );
    }

    #[test]
    fn test_trend_peak_tie_prefers_earliest_date() {
        let trend = EngagementTrend {
            points: vec![
                TrendPoint { date: day(1), engagements: 500 },
                TrendPoint { date: day(2), engagements: 100 },
                TrendPoint { date: day(3), engagements: 500 },
            ],
        };
        let set = trend_insights(&trend);

        assert_eq!(
            set.insights[0].fact,
            InsightFact::Peak {
                date: day(1),
                engagements: 500
            }
        );
    }

    #[test]
    fn test_single_day_trend_is_flat() {
        let trend = EngagementTrend {
            points: vec![TrendPoint { date: day(1), engagements: 0 }],
        };
        let set = trend_insights(&trend);

        match &set.insights[1].fact {
            InsightFact::Direction {
                direction,
                change_pct,
                ..
            } => {
                assert_eq!(*direction, TrendDirection::Flat);
                assert_eq!(*change_pct, None);
            }
            other => panic!("unexpected fact: {other:?}"),
        }
    }

    #[test]
    fn test_platform_margin() {
        let platforms = PlatformEngagement {
            buckets: vec![bucket("Instagram", 420), bucket("Facebook", 280), bucket("Twitter", 200)],
            total: 900,
        };
        let set = platform_insights(&platforms);

        assert_eq!(
            set.insights[1].fact,
            InsightFact::Margin {
                leader: "Instagram".into(),
                runner_up: Some("Facebook".into()),
                margin: 140
            }
        );
    }

    #[test]
    fn test_location_concentration() {
        let top = TopLocations {
            buckets: vec![bucket("Surabaya", 300), bucket("Bandung", 200)],
            distinct_locations: 3,
            total: 1000,
        };
        let set = location_insights(&top);

        assert_eq!(
            set.insights[2].fact,
            InsightFact::Concentration {
                listed: 2,
                listed_total: 500,
                share_pct: 50.0
            }
        );
    }

    #[test]
    fn test_empty_ranking_reports_no_data() {
        let top = TopLocations {
            buckets: vec![],
            distinct_locations: 0,
            total: 0,
        };
        let set = location_insights(&top);
        assert_eq!(set.insights[0].fact, InsightFact::NoData);
        assert_eq!(set.insights[1].fact, InsightFact::NoData);
    }
}
