// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for record graph operations.

use crate::record::RecordId;

/// Result type alias for record graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal graph violations.
///
/// These are contract errors in the code that builds the graph, never a
/// problem with the exported model data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A record references an id that does not exist yet.
    #[error("record #{record} references #{target} which is not created before it")]
    ForwardReference { record: RecordId, target: RecordId },

    /// A record was created without a keyword.
    #[error("record #{0} has an empty keyword")]
    EmptyKeyword(RecordId),

    /// A real attribute is NaN or infinite and has no STEP encoding.
    #[error("record #{record} ({keyword}) has a non-finite real attribute")]
    NonFiniteReal { record: RecordId, keyword: String },

    /// A record id was looked up that the graph never allocated.
    #[error("record #{0} not found")]
    NotFound(RecordId),
}
