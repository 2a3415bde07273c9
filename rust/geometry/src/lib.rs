// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Writer Geometry
//!
//! Placement and extrusion math for structural members, using nalgebra for
//! vectors and transforms. Nothing here creates records; the export crate
//! turns these frames into `IFCAXIS2PLACEMENT3D` and friends.

pub mod error;
pub mod placement;
pub mod polygon;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use error::{Error, Result};
pub use placement::{
    axis_from_points, centered_extrusion_offset, member_frame, reference_direction,
    roll_reference_direction, rotation_frame, Frame, MemberAxis, AXIS_EPSILON,
};
pub use polygon::{ensure_ccw, newell_normal, signed_area, PlanarPolygon};
