// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Record Graph - sequential id allocation and DATA section output
//!
//! Records are appended in creation order and never reordered. Builders
//! always create children before the parent that points at them, so every
//! reference in a well-formed graph points backwards.

use crate::encode::write_record;
use crate::error::{Error, Result};
use crate::record::{AttributeValue, Attributes, Record, RecordId};
use rustc_hash::FxHashMap;
use std::fmt::Write;

/// Ordered, append-only record store for one export run
#[derive(Debug, Default)]
pub struct RecordGraph {
    records: Vec<Record>,
}

impl RecordGraph {
    /// Create an empty graph; the first record gets id 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Create graph with room for `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Append a record and return its id.
    ///
    /// References are not checked here; [`RecordGraph::validate`] walks the
    /// whole graph once before serialization.
    pub fn create<I>(&mut self, keyword: &str, attributes: I) -> RecordId
    where
        I: IntoIterator<Item = AttributeValue>,
    {
        debug_assert!(!keyword.is_empty(), "record keyword must not be empty");
        let id = self.next_id();
        self.records.push(Record {
            id,
            keyword: keyword.to_string(),
            attributes: attributes.into_iter().collect::<Attributes>(),
        });
        id
    }

    /// Id the next created record will receive
    #[inline]
    pub fn next_id(&self) -> RecordId {
        RecordId(self.records.len() as u32 + 1)
    }

    /// Number of records
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get record by id
    #[inline]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.records.get(index)
    }

    /// Get record by id, failing with [`Error::NotFound`]
    pub fn record(&self, id: RecordId) -> Result<&Record> {
        self.get(id).ok_or(Error::NotFound(id))
    }

    /// Records in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Records with the given keyword, in creation order
    pub fn find_by_keyword<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a Record> {
        self.records
            .iter()
            .filter(move |r| r.keyword.eq_ignore_ascii_case(keyword))
    }

    /// Count records by keyword
    pub fn count_by_keyword(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for record in &self.records {
            *counts.entry(record.keyword.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Check the structural invariants of the graph.
    ///
    /// Ids are positional, so they are `1..=len` by construction. This
    /// checks that every reference points strictly backwards, that every
    /// keyword is non-empty and that every real is finite.
    pub fn validate(&self) -> Result<()> {
        for record in &self.records {
            if record.keyword.is_empty() {
                return Err(Error::EmptyKeyword(record.id));
            }

            let mut violation = None;
            for attr in &record.attributes {
                attr.for_each_reference(&mut |target| {
                    if violation.is_none() && (target.0 == 0 || target >= record.id) {
                        violation = Some(target);
                    }
                });
                if attr.has_non_finite() {
                    return Err(Error::NonFiniteReal {
                        record: record.id,
                        keyword: record.keyword.clone(),
                    });
                }
            }
            if let Some(target) = violation {
                return Err(Error::ForwardReference {
                    record: record.id,
                    target,
                });
            }
        }
        Ok(())
    }

    /// Render all records, one line each, in creation order
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.records.len() * 64);
        // Writing into a String cannot fail
        let _ = self.write_to(&mut out);
        out
    }

    /// Render all records into any `fmt::Write` sink
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::fmt::Result {
        for record in &self.records {
            write_record(out, record)?;
            out.write_char('\n')?;
        }
        Ok(())
    }
}
