// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Records and attribute values
//!
//! A record is one `#id=KEYWORD(...)` line of the DATA section. Attribute
//! values mirror the STEP literal kinds that an IFC writer needs.

use smallvec::SmallVec;
use std::fmt;

/// Numeric id of a record (`#id`). Ids start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordId(pub u32);

impl RecordId {
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attribute storage; most IFC records carry fewer than ten attributes
pub type Attributes = SmallVec<[AttributeValue; 10]>;

/// IFC record attribute value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    /// Unset value: `$`
    Null,
    /// String literal, escaped on output
    String(String),
    /// Integer literal: `3`
    Integer(i64),
    /// Real literal: `3.`, `-0.5`
    Real(f64),
    /// Pre-formatted token written verbatim: `.AREA.`, `.T.`, `*`
    Enumeration(String),
    /// Reference to an earlier record: `#12`
    Reference(RecordId),
    /// Parenthesised list
    List(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Enumeration token from a bare name (`AREA` -> `.AREA.`)
    #[inline]
    pub fn enumeration(name: &str) -> Self {
        AttributeValue::Enumeration(format!(".{}.", name))
    }

    /// Derived attribute marker `*`
    #[inline]
    pub fn derived() -> Self {
        AttributeValue::Enumeration("*".to_string())
    }

    /// Logical `.T.` / `.F.`
    #[inline]
    pub fn boolean(value: bool) -> Self {
        AttributeValue::Enumeration(if value { ".T." } else { ".F." }.to_string())
    }

    /// List of references
    pub fn references<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = RecordId>,
    {
        AttributeValue::List(ids.into_iter().map(AttributeValue::Reference).collect())
    }

    /// List of reals, e.g. point coordinates or direction ratios
    pub fn reals(values: &[f64]) -> Self {
        AttributeValue::List(values.iter().copied().map(AttributeValue::Real).collect())
    }

    /// Optional string: `None` becomes `$`
    pub fn optional_string(value: Option<&str>) -> Self {
        match value {
            Some(s) => AttributeValue::String(s.to_string()),
            None => AttributeValue::Null,
        }
    }

    /// Get as reference
    #[inline]
    pub fn as_reference(&self) -> Option<RecordId> {
        match self {
            AttributeValue::Reference(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as string
    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as float (integers widen)
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Real(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as list
    #[inline]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Visit every reference in this value, descending into lists
    pub fn for_each_reference(&self, f: &mut impl FnMut(RecordId)) {
        match self {
            AttributeValue::Reference(id) => f(*id),
            AttributeValue::List(items) => {
                for item in items {
                    item.for_each_reference(f);
                }
            }
            _ => {}
        }
    }

    /// True if any real in this value (or nested list) is NaN or infinite
    pub fn has_non_finite(&self) -> bool {
        match self {
            AttributeValue::Real(f) => !f.is_finite(),
            AttributeValue::List(items) => items.iter().any(|v| v.has_non_finite()),
            _ => false,
        }
    }
}

impl From<RecordId> for AttributeValue {
    #[inline]
    fn from(id: RecordId) -> Self {
        AttributeValue::Reference(id)
    }
}

impl From<Option<RecordId>> for AttributeValue {
    #[inline]
    fn from(id: Option<RecordId>) -> Self {
        id.map_or(AttributeValue::Null, AttributeValue::Reference)
    }
}

impl From<f64> for AttributeValue {
    #[inline]
    fn from(value: f64) -> Self {
        AttributeValue::Real(value)
    }
}

impl From<i64> for AttributeValue {
    #[inline]
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<&str> for AttributeValue {
    #[inline]
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    #[inline]
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

/// One numbered, typed record of the DATA section
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    pub id: RecordId,
    /// Upper-case schema entity name, e.g. `IFCCOLUMN`
    pub keyword: String,
    pub attributes: Attributes,
}

impl Record {
    /// Get attribute by index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get reference attribute by index
    #[inline]
    pub fn get_ref(&self, index: usize) -> Option<RecordId> {
        self.get(index).and_then(|v| v.as_reference())
    }

    /// Get float attribute by index
    #[inline]
    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|v| v.as_float())
    }

    /// Get string attribute by index
    #[inline]
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_string())
    }

    /// All ids this record references, in attribute order
    pub fn references(&self) -> Vec<RecordId> {
        let mut refs = Vec::new();
        for attr in &self.attributes {
            attr.for_each_reference(&mut |id| refs.push(id));
        }
        refs
    }
}
