// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Degenerate input detected while building placements or profiles
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Degenerate axis: points are {length} apart")]
    DegenerateAxis { length: f64 },

    #[error("Polygon needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),

    #[error("Polygon has no area")]
    DegeneratePolygon,

    #[error("Polygon is not planar: vertex deviates {deviation} from the fitted plane")]
    NonPlanar { deviation: f64 },

    #[error("Non-finite coordinate")]
    NonFinite,
}
