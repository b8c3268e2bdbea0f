//! Extracted SVG records and the persisted record file.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::identifier::is_valid_id;
use crate::locator::Span;

/// One extracted SVG element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvgRecord {
    /// Identifier written into the placeholder markers.
    pub id: String,
    /// Zero-based discovery order.
    pub index: usize,
    /// The original markup, byte for byte.
    pub svg_content: String,
    /// Raw text preceding the element in the original document.
    pub context_before: String,
    /// Raw text following the element in the original document.
    pub context_after: String,
    /// Position in the original document. Informational only.
    pub original_position: Span,
}

/// `metadata` section of a record file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// RFC 3339 on write. Timestamps without an offset are read as UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub extraction_date: DateTime<Utc>,
    pub total_svgs: usize,
    pub context_chars: usize,
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text)
        .ok_or_else(|| de::Error::custom(format!("invalid extraction_date: {text:?}")))
}

/// Parses an RFC 3339 timestamp, or an ISO 8601 one without offset
/// (`2024-05-01T12:00:00.123456`) taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|date| date.with_timezone(&Utc))
        .or_else(|_| text.parse::<NaiveDateTime>().map(|naive| naive.and_utc()))
        .ok()
}

/// The persisted form of an extraction, as written to `svgs.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFile {
    pub metadata: RecordMetadata,
    pub svgs: Vec<SvgRecord>,
}

impl RecordFile {
    pub fn new(svgs: Vec<SvgRecord>, context_chars: usize, extraction_date: DateTime<Utc>) -> Self {
        Self {
            metadata: RecordMetadata {
                extraction_date,
                total_svgs: svgs.len(),
                context_chars,
            },
            svgs,
        }
    }

    /// Validates the file and turns it into a [`RecordSet`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] if `total_svgs` disagrees with the
    /// number of records, plus any error from [`RecordSet::new`].
    pub fn into_record_set(self) -> Result<RecordSet> {
        if self.metadata.total_svgs != self.svgs.len() {
            return Err(Error::invalid_record(
                "<metadata>",
                format!(
                    "total_svgs is {} but the file holds {} records",
                    self.metadata.total_svgs,
                    self.svgs.len()
                ),
            ));
        }
        RecordSet::new(self.svgs)
    }
}

/// A validated, read-only collection of records indexed by identifier.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<SvgRecord>,
    by_id: HashMap<String, usize>,
}

impl RecordSet {
    /// Builds a record set, rejecting data that restoration cannot trust.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateIdentifier`] if two records share an id.
    /// - [`Error::InvalidRecord`] for a malformed id, empty content, an empty
    ///   original position, or indices that are not strictly increasing.
    pub fn new(records: Vec<SvgRecord>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(records.len());
        let mut last_index: Option<usize> = None;

        for (pos, record) in records.iter().enumerate() {
            if !is_valid_id(&record.id) {
                return Err(Error::invalid_record(&record.id, "malformed identifier"));
            }
            if record.svg_content.is_empty() {
                return Err(Error::invalid_record(&record.id, "svg_content is empty"));
            }
            if record.original_position.is_empty() {
                return Err(Error::invalid_record(
                    &record.id,
                    "original_position start must be before end",
                ));
            }
            if last_index.is_some_and(|last| record.index <= last) {
                return Err(Error::invalid_record(
                    &record.id,
                    format!("index {} is not greater than the previous record's", record.index),
                ));
            }
            last_index = Some(record.index);

            if by_id.insert(record.id.clone(), pos).is_some() {
                return Err(Error::DuplicateIdentifier {
                    id: record.id.clone(),
                });
            }
        }

        Ok(Self { records, by_id })
    }

    pub fn get(&self, id: &str) -> Option<&SvgRecord> {
        self.position(id).map(|pos| &self.records[pos])
    }

    /// Position of the record with `id` in [`RecordSet::records`].
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn records(&self) -> &[SvgRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SvgRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<SvgRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a SvgRecord;
    type IntoIter = std::slice::Iter<'a, SvgRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
