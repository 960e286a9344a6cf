//! Header resolution for incoming datasets.
//!
//! Column names in exported spreadsheets are rarely consistent ("Media Type",
//! "media_type", "MEDIA-TYPE"). Every header is canonicalized and matched
//! against the six fields the pipeline needs, ignoring case and separators.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The fixed set of dimensions the pipeline operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Date,
    Platform,
    Sentiment,
    Location,
    Engagements,
    MediaType,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::Date,
        CanonicalField::Platform,
        CanonicalField::Sentiment,
        CanonicalField::Location,
        CanonicalField::Engagements,
        CanonicalField::MediaType,
    ];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            CanonicalField::Date => "date",
            CanonicalField::Platform => "platform",
            CanonicalField::Sentiment => "sentiment",
            CanonicalField::Location => "location",
            CanonicalField::Engagements => "engagements",
            CanonicalField::MediaType => "media_type",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// A header that matched a canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    pub index: usize,
    pub header: String,
}

/// Canonical field → source column. Always holds all six fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMapping {
    columns: BTreeMap<CanonicalField, ResolvedColumn>,
}

impl FieldMapping {
    /// Column index for `field`.
    pub fn index(&self, field: CanonicalField) -> usize {
        self.columns[&field].index
    }

    /// Original header text that resolved to `field`.
    pub fn header(&self, field: CanonicalField) -> &str {
        &self.columns[&field].header
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &ResolvedColumn)> {
        self.columns.iter().map(|(field, column)| (*field, column))
    }
}

/// A canonical field claimed by more than one header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousField {
    pub field: CanonicalField,
    pub headers: Vec<String>,
}

/// Raised before any row is read when the header row cannot satisfy every
/// canonical field. Lists every problem at once.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", describe_schema_error(.missing, .ambiguous))]
pub struct SchemaError {
    pub missing: Vec<CanonicalField>,
    pub ambiguous: Vec<AmbiguousField>,
}

fn describe_schema_error(missing: &[CanonicalField], ambiguous: &[AmbiguousField]) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|f| f.canonical_name()).collect();
        parts.push(format!("missing required columns: {}", names.join(", ")));
    }
    for entry in ambiguous {
        parts.push(format!(
            "column {} matched by several headers: {}",
            entry.field,
            entry.headers.join(", ")
        ));
    }
    parts.join("; ")
}

/// Lowercases, trims and collapses each run of non-alphanumeric characters
/// into a single `_`.
///
/// `" Media  Type "` and `"MEDIA-TYPE"` both become `"media_type"`.
pub fn canonicalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_separator = false;

    for ch in raw.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(ch);
        } else {
            pending_separator = true;
        }
    }

    out
}

/// Separator-free comparison key, so "MediaType" and "media_type" agree.
fn match_key(raw: &str) -> String {
    canonicalize_header(raw).replace('_', "")
}

/// Resolves each canonical field to exactly one header.
pub fn resolve_fields<S: AsRef<str>>(headers: &[S]) -> Result<FieldMapping, SchemaError> {
    let keys: Vec<String> = headers.iter().map(|h| match_key(h.as_ref())).collect();

    let mut columns = BTreeMap::new();
    let mut missing = Vec::new();
    let mut ambiguous = Vec::new();

    for field in CanonicalField::ALL {
        let wanted = match_key(field.canonical_name());
        let matches: Vec<usize> = keys
            .iter()
            .enumerate()
            .filter(|(_, key)| **key == wanted)
            .map(|(index, _)| index)
            .collect();

        match matches.as_slice() {
            [] => missing.push(field),
            [index] => {
                columns.insert(
                    field,
                    ResolvedColumn {
                        index: *index,
                        header: headers[*index].as_ref().to_string(),
                    },
                );
            }
            several => ambiguous.push(AmbiguousField {
                field,
                headers: several
                    .iter()
                    .map(|i| headers[*i].as_ref().to_string())
                    .collect(),
            }),
        }
    }

    if missing.is_empty() && ambiguous.is_empty() {
        Ok(FieldMapping { columns })
    } else {
        Err(SchemaError { missing, ambiguous })
    }
}
