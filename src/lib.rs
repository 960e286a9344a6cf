pub mod aggregates;
pub mod cleaner;
pub mod config;
pub mod ingest;
pub mod insights;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod schema;
