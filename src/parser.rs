//! Line-oriented parsing of a pose submission.
//!
//! Parsing never fails: every non-empty line becomes a [`RawRecord`] whose
//! tokens are kept as text. Numeric interpretation happens in the format check.

use crate::pose::{RawRecord, RobotKey};
use serde::Serialize;
use std::collections::HashMap;

/// The ordered records of one submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionBatch {
    records: Vec<RawRecord>,
}

impl SubmissionBatch {
    /// Splits `text` into records, one per non-empty line.
    ///
    /// Lines are separated by `\n`; a trailing `\r` is stripped. Lines that are
    /// empty or whitespace-only are skipped and consume no record, but the
    /// `line` number of later records still counts them.
    pub fn parse(text: &str) -> Self {
        let records = text
            .split('\n')
            .enumerate()
            .filter_map(|(idx, line)| {
                let line = line.strip_suffix('\r').unwrap_or(line);
                if line.trim().is_empty() {
                    return None;
                }
                let fields: Vec<String> = line.split(',').map(str::to_owned).collect();
                let key = fields[0].trim().to_owned();
                Some(RawRecord {
                    line: idx + 1,
                    key,
                    fields,
                })
            })
            .collect();

        Self { records }
    }

    /// All records, in submission order, duplicates included.
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One record per distinct identifier.
    ///
    /// Identifiers are ordered by their first appearance; each resolves to the
    /// record of its *last* appearance (last occurrence wins).
    pub fn latest(&self) -> Vec<&RawRecord> {
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut out: Vec<&RawRecord> = Vec::new();

        for record in &self.records {
            match slots.get(record.key.as_str()) {
                Some(&slot) => out[slot] = record,
                None => {
                    slots.insert(record.key.as_str(), out.len());
                    out.push(record);
                }
            }
        }

        out
    }

    /// Number of distinct identifiers in the batch.
    pub fn distinct_keys(&self) -> usize {
        self.latest().len()
    }

    /// Identifiers declared on more than one line, in first-appearance order.
    pub fn duplicate_keys(&self) -> Vec<RobotKey> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in &self.records {
            *counts.entry(record.key.as_str()).or_default() += 1;
        }

        self.latest()
            .into_iter()
            .filter(|r| counts.get(r.key.as_str()).copied().unwrap_or(0) > 1)
            .map(|r| r.key.clone())
            .collect()
    }
}
