//! Type coercion and validation of raw rows.
//!
//! Each row either becomes a [`CleanedRecord`] or is skipped with a
//! [`SkipReason`]. A bad row never aborts the run; only an empty result does.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

use crate::ingest::RawRecord;
use crate::schema::{CanonicalField, FieldMapping};

/// Date-only layouts tried in order. Slash dates are read month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%Y",
];

/// Date-time layouts; only the calendar day is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Why a row was excluded from the cleaned dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    InvalidDate,
    InvalidEngagements,
}

impl SkipReason {
    pub const ALL: [SkipReason; 2] = [SkipReason::InvalidDate, SkipReason::InvalidEngagements];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::InvalidDate => "invalid_date",
            SkipReason::InvalidEngagements => "invalid_engagements",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input row after coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedRecord {
    pub date: NaiveDate,
    pub platform: String,
    pub sentiment: String,
    pub location: String,
    pub engagements: u64,
    pub media_type: String,
}

/// Result of cleaning a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Clean(CleanedRecord),
    Skipped(SkipReason),
}

/// Skipped-row tally. Every reason is always present, zero included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipCounts(BTreeMap<SkipReason, usize>);

impl Default for SkipCounts {
    fn default() -> Self {
        Self(SkipReason::ALL.iter().map(|r| (*r, 0)).collect())
    }
}

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        *self.0.entry(reason).or_default() += 1;
    }

    pub fn get(&self, reason: SkipReason) -> usize {
        self.0.get(&reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkipReason, usize)> + '_ {
        self.0.iter().map(|(reason, count)| (*reason, *count))
    }
}

impl fmt::Display for SkipCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(reason, count)| format!("{reason}={count}"))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Cleaned rows of one run. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanedDataset {
    records: Vec<CleanedRecord>,
}

impl CleanedDataset {
    pub fn records(&self) -> &[CleanedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<CleanedRecord> for CleanedDataset {
    fn from_iter<I: IntoIterator<Item = CleanedRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Surviving rows plus the skip tally.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub dataset: CleanedDataset,
    pub rows_read: usize,
    pub skipped: SkipCounts,
}

/// No row survived cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no usable rows after cleaning ({rows_read} read; skipped: {skipped})")]
pub struct EmptyDataset {
    pub rows_read: usize,
    pub skipped: SkipCounts,
}

/// Parses a calendar date from the formats commonly found in exports.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    {
        return Some(date);
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt.date());
    }

    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .ok()
        .map(|dt| dt.naive_local().date())
}

/// Removes thousands separators, rejecting commas anywhere else.
///
/// `1,234` and `1,234.5` pass; `1,2,3`, `,5` and `1,,0` do not.
fn strip_thousands(value: &str) -> Option<String> {
    if !value.contains(',') {
        return Some(value.to_string());
    }

    let (integer, fraction) = match value.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (value, None),
    };
    if fraction.is_some_and(|f| f.contains(',')) {
        return None;
    }

    let is_digits = |group: &str| group.bytes().all(|b| b.is_ascii_digit());
    let mut groups = integer.split(',');
    let head = groups.next()?;
    if !(1..=3).contains(&head.len()) || !is_digits(head) {
        return None;
    }
    if !groups.all(|group| group.len() == 3 && is_digits(group)) {
        return None;
    }

    let mut digits = integer.replace(',', "");
    if let Some(fraction) = fraction {
        digits.push('.');
        digits.push_str(fraction);
    }
    Some(digits)
}

/// Parses an engagement count. Blank is zero; `None` means unusable.
pub fn parse_engagements(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0);
    }

    let digits = strip_thousands(value)?;
    if let Ok(n) = digits.parse::<u64>() {
        return Some(n);
    }

    // Spreadsheet exports often write counts as "150.0".
    match digits.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 && n < u64::MAX as f64 => Some(n.trunc() as u64),
        _ => None,
    }
}

/// Coerces one raw row using the resolved column mapping.
pub fn clean_row(record: &RawRecord, mapping: &FieldMapping) -> RowOutcome {
    let text = |field: CanonicalField| record.cell(mapping.index(field)).trim().to_string();

    let Some(date) = parse_date(record.cell(mapping.index(CanonicalField::Date))) else {
        return RowOutcome::Skipped(SkipReason::InvalidDate);
    };

    let Some(engagements) = parse_engagements(record.cell(mapping.index(CanonicalField::Engagements)))
    else {
        return RowOutcome::Skipped(SkipReason::InvalidEngagements);
    };

    RowOutcome::Clean(CleanedRecord {
        date,
        platform: text(CanonicalField::Platform),
        sentiment: text(CanonicalField::Sentiment),
        location: text(CanonicalField::Location),
        engagements,
        media_type: text(CanonicalField::MediaType),
    })
}

/// Cleans every row, counting skips by reason.
///
/// # Errors
///
/// Returns [`EmptyDataset`] when no row survives.
pub fn clean_rows(records: &[RawRecord], mapping: &FieldMapping) -> Result<CleanOutcome, EmptyDataset> {
    let mut skipped = SkipCounts::default();
    let mut cleaned = Vec::with_capacity(records.len());

    for record in records {
        match clean_row(record, mapping) {
            RowOutcome::Clean(row) => cleaned.push(row),
            RowOutcome::Skipped(reason) => {
                debug!(line = record.line, reason = %reason, "Row skipped");
                skipped.record(reason);
            }
        }
    }

    info!(
        rows_read = records.len(),
        kept = cleaned.len(),
        skipped = skipped.total(),
        "Rows cleaned"
    );

    if cleaned.is_empty() {
        return Err(EmptyDataset {
            rows_read: records.len(),
            skipped,
        });
    }

    Ok(CleanOutcome {
        dataset: cleaned.into_iter().collect(),
        rows_read: records.len(),
        skipped,
    })
}
