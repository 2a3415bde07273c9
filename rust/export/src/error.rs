// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export errors
//!
//! [`Error`] aborts an export call. [`SkipReason`] only drops the offending
//! element: it is logged, collected in the result and the export goes on.

use thiserror::Error;

/// Result type for export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal export error
#[derive(Error, Debug)]
pub enum Error {
    #[error("Record graph violation: {0}")]
    Graph(#[from] ifc_writer_core::Error),

    #[error("Invalid export options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("Failed to write file text: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Why an element was left out of the file
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("Node {0} not found")]
    MissingNode(u32),

    #[error("Non-finite coordinate")]
    NonFinite,

    #[error("Degenerate member: endpoints are {length} apart")]
    DegenerateLength { length: f64 },

    #[error("Polygon needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),

    #[error("Polygon has no area")]
    DegeneratePolygon,

    #[error("Polygon is not planar (deviation {deviation})")]
    NonPlanar { deviation: f64 },

    #[error("{name} must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: f64 },

    #[error("Section does not fit: {0}")]
    InconsistentSection(&'static str),

    #[error("Unsupported section profile")]
    UnsupportedProfile,

    #[error("Element has no section")]
    MissingSection,

    #[error("{kind} expects a {expected} shape")]
    ShapeMismatch {
        kind: &'static str,
        expected: &'static str,
    },
}

impl From<ifc_writer_geometry::Error> for SkipReason {
    fn from(error: ifc_writer_geometry::Error) -> Self {
        use ifc_writer_geometry::Error as GeometryError;
        match error {
            GeometryError::DegenerateAxis { length } => SkipReason::DegenerateLength { length },
            GeometryError::TooFewVertices(n) => SkipReason::TooFewVertices(n),
            GeometryError::DegeneratePolygon => SkipReason::DegeneratePolygon,
            GeometryError::NonPlanar { deviation } => SkipReason::NonPlanar { deviation },
            GeometryError::NonFinite => SkipReason::NonFinite,
        }
    }
}

/// Check that a size is finite and strictly positive
pub(crate) fn positive(name: &'static str, value: f64) -> std::result::Result<f64, SkipReason> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SkipReason::NonPositiveDimension { name, value })
    }
}
