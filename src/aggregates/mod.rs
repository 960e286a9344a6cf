//! The five summaries computed over a cleaned dataset.
//!
//! Each aggregate is a standalone pure function of [`CleanedDataset`]; none
//! depends on another, and all are independent of row order. Ties in ranked
//! output are broken by ascending label.
//!
//! [`CleanedDataset`]: crate::cleaner::CleanedDataset

pub mod aggregate;
pub mod types;
pub mod utility;

pub use aggregate::{
    TOP_LOCATIONS, aggregate_all, engagement_trend, media_type_mix, platform_engagement,
    sentiment_distribution, top_locations,
};
pub use types::{
    AggregateKind, Aggregates, Bucket, CategoryDistribution, EngagementTrend, PlatformEngagement,
    TopLocations, TrendPoint,
};
