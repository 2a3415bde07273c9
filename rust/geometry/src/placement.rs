// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement math for IfcAxis2Placement3D
//!
//! Members are placed at their midpoint with the local Z axis along the
//! member. The local X axis (RefDirection) is derived from the member axis
//! so that profiles keep a predictable orientation, and solids are shifted
//! back by half the member length so the extrusion is symmetric about the
//! placement origin.

use crate::error::{Error, Result};
use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};

/// Minimum member length in model units
pub const AXIS_EPSILON: f64 = 1e-6;

/// Above this |z| a member axis counts as vertical
const NEAR_VERTICAL: f64 = 0.99;

/// Direction and length of a two-point member
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberAxis {
    /// Unit vector from start to end
    pub direction: Vector3<f64>,
    pub length: f64,
}

/// Build the member axis from two points.
///
/// Fails with [`Error::DegenerateAxis`] when the points are closer than
/// [`AXIS_EPSILON`], so callers never see a NaN direction.
pub fn axis_from_points(p0: &Point3<f64>, p1: &Point3<f64>) -> Result<MemberAxis> {
    let delta = p1 - p0;
    if !delta.iter().all(|c| c.is_finite()) {
        return Err(Error::NonFinite);
    }

    let length = delta.norm();
    if length < AXIS_EPSILON {
        return Err(Error::DegenerateAxis { length });
    }

    Ok(MemberAxis {
        direction: delta / length,
        length,
    })
}

/// Reference direction (local X) for a member axis.
///
/// Non-vertical members use `axis x +Z`, falling back to +X if that cross
/// product vanishes. Near-vertical members use +X directly.
pub fn reference_direction(axis: &Vector3<f64>) -> Vector3<f64> {
    if axis.z.abs() < NEAR_VERTICAL {
        let cross = axis.cross(&Vector3::z());
        let norm = cross.norm();
        if norm > AXIS_EPSILON {
            return cross / norm;
        }
    }
    Vector3::x()
}

/// Rotate a reference direction about the member axis by `roll_degrees`
pub fn roll_reference_direction(
    axis: &Vector3<f64>,
    ref_direction: &Vector3<f64>,
    roll_degrees: f64,
) -> Vector3<f64> {
    if roll_degrees == 0.0 {
        return *ref_direction;
    }
    let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(*axis), roll_degrees.to_radians());
    rotation * ref_direction
}

/// Local offset of a solid whose placement sits at the member midpoint
#[inline]
pub fn centered_extrusion_offset(length: f64) -> Vector3<f64> {
    Vector3::new(0.0, 0.0, -length / 2.0)
}

/// Frame of a single-point vertical element with a roll angle.
///
/// Returns `(axis, ref_direction)`: axis is +Z, the reference direction is
/// `(cos t, sin t, 0)`. When `reference_flag` is false the angle is taken
/// from the Y axis instead (90 degrees added).
pub fn rotation_frame(roll_degrees: f64, reference_flag: bool) -> (Vector3<f64>, Vector3<f64>) {
    let degrees = if reference_flag {
        roll_degrees
    } else {
        roll_degrees + 90.0
    };
    let theta = degrees.to_radians();
    (Vector3::z(), Vector3::new(theta.cos(), theta.sin(), 0.0))
}

/// Right-handed coordinate frame: origin, local Z (`axis`) and local X
/// (`ref_direction`). Local Y is `axis x ref_direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub origin: Point3<f64>,
    pub axis: Vector3<f64>,
    pub ref_direction: Vector3<f64>,
}

impl Frame {
    /// Create frame, normalizing the axis and projecting the reference
    /// direction onto the plane perpendicular to it
    pub fn new(origin: Point3<f64>, axis: Vector3<f64>, ref_direction: Vector3<f64>) -> Self {
        let axis = axis.normalize();
        let projected = ref_direction - axis * ref_direction.dot(&axis);
        let ref_direction = if projected.norm() > AXIS_EPSILON {
            projected.normalize()
        } else {
            // Reference parallel to axis: derive one the same way members do
            reference_direction(&axis)
        };

        Self {
            origin,
            axis,
            ref_direction,
        }
    }

    /// Global frame at the origin
    pub fn world() -> Self {
        Self {
            origin: Point3::origin(),
            axis: Vector3::z(),
            ref_direction: Vector3::x(),
        }
    }

    /// Local Y axis
    #[inline]
    pub fn y_direction(&self) -> Vector3<f64> {
        self.axis.cross(&self.ref_direction)
    }

    /// Express a world point in local coordinates
    pub fn to_local(&self, point: &Point3<f64>) -> Point3<f64> {
        let d = point - self.origin;
        Point3::new(
            d.dot(&self.ref_direction),
            d.dot(&self.y_direction()),
            d.dot(&self.axis),
        )
    }

    /// Map a local point to world coordinates
    pub fn to_world(&self, local: &Point3<f64>) -> Point3<f64> {
        self.origin + self.local_vector(&local.coords)
    }

    /// Map a local vector to world coordinates
    pub fn local_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.ref_direction * v.x + self.y_direction() * v.y + self.axis * v.z
    }

    /// Same axes, origin moved by a local offset
    pub fn translated(&self, local_offset: &Vector3<f64>) -> Self {
        Self {
            origin: self.origin + self.local_vector(local_offset),
            ..*self
        }
    }

    /// 4x4 local-to-world transform
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let x = self.ref_direction;
        let y = self.y_direction();
        let z = self.axis;

        let mut transform = Matrix4::identity();
        transform[(0, 0)] = x.x;
        transform[(1, 0)] = x.y;
        transform[(2, 0)] = x.z;
        transform[(0, 1)] = y.x;
        transform[(1, 1)] = y.y;
        transform[(2, 1)] = y.z;
        transform[(0, 2)] = z.x;
        transform[(1, 2)] = z.y;
        transform[(2, 2)] = z.z;
        transform[(0, 3)] = self.origin.x;
        transform[(1, 3)] = self.origin.y;
        transform[(2, 3)] = self.origin.z;
        transform
    }
}

/// Placement frame of a two-point member: midpoint origin, axis along the
/// member, reference direction rolled by `roll_degrees`
pub fn member_frame(p0: &Point3<f64>, p1: &Point3<f64>, roll_degrees: f64) -> Result<(Frame, f64)> {
    let axis = axis_from_points(p0, p1)?;
    let reference = reference_direction(&axis.direction);
    let rolled = roll_reference_direction(&axis.direction, &reference, roll_degrees);
    let midpoint = Point3::from((p0.coords + p1.coords) / 2.0);
    Ok((Frame::new(midpoint, axis.direction, rolled), axis.length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_from_points() {
        let axis =
            axis_from_points(&Point3::new(0.0, 0.0, 0.0), &Point3::new(3000.0, 4000.0, 0.0)).unwrap();
        assert_relative_eq!(axis.length, 5000.0);
        assert_relative_eq!(axis.direction, Vector3::new(0.6, 0.8, 0.0));
    }

    #[test]
    fn test_degenerate_axis() {
        let p = Point3::new(100.0, 200.0, -5000.0);
        let result = axis_from_points(&p, &Point3::new(100.0, 200.0 + 1e-7, -5000.0));
        assert!(matches!(result, Err(Error::DegenerateAxis { .. })));
        assert!(matches!(axis_from_points(&p, &p), Err(Error::DegenerateAxis { length }) if length == 0.0));
    }

    #[test]
    fn test_non_finite_axis() {
        let result = axis_from_points(&Point3::origin(), &Point3::new(f64::NAN, 0.0, 0.0));
        assert_eq!(result, Err(Error::NonFinite));
    }

    #[test]
    fn test_reference_direction_horizontal() {
        // axis x Z for +X is -Y
        assert_relative_eq!(
            reference_direction(&Vector3::x()),
            Vector3::new(0.0, -1.0, 0.0)
        );
        assert_relative_eq!(reference_direction(&Vector3::y()), Vector3::x());
    }

    #[test]
    fn test_reference_direction_vertical_fallback() {
        assert_eq!(reference_direction(&Vector3::new(0.0, 0.0, -1.0)), Vector3::x());
        assert_eq!(reference_direction(&Vector3::z()), Vector3::x());

        // Steep but not vertical still uses the cross product
        let steep = Vector3::new(0.2, 0.0, 0.98).normalize();
        let reference = reference_direction(&steep);
        assert_relative_eq!(reference.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(reference.dot(&steep), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_centered_extrusion_offset() {
        assert_eq!(centered_extrusion_offset(3000.0), Vector3::new(0.0, 0.0, -1500.0));
    }

    #[test]
    fn test_rotation_frame() {
        let (axis, reference) = rotation_frame(0.0, true);
        assert_eq!(axis, Vector3::z());
        assert_relative_eq!(reference, Vector3::x());

        let (_, reference) = rotation_frame(90.0, true);
        assert_relative_eq!(reference, Vector3::y(), epsilon = 1e-12);

        // Alternate convention adds a quarter turn
        let (_, reference) = rotation_frame(0.0, false);
        assert_relative_eq!(reference, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_roll_reference_direction() {
        let rolled = roll_reference_direction(&Vector3::z(), &Vector3::x(), 90.0);
        assert_relative_eq!(rolled, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_member_frame_for_column() {
        let (frame, length) = member_frame(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(0.0, 0.0, 3500.0),
            0.0,
        )
        .unwrap();

        assert_relative_eq!(length, 3500.0);
        assert_relative_eq!(frame.origin, Point3::new(0.0, 0.0, 1750.0));
        assert_eq!(frame.ref_direction, Vector3::x());
        assert_relative_eq!(frame.y_direction(), Vector3::y());
    }

    #[test]
    fn test_frame_round_trip() {
        let frame = Frame::new(
            Point3::new(10.0, 20.0, 30.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::z(),
        );
        let p = Point3::new(-4.0, 7.5, 12.0);
        assert_relative_eq!(frame.to_world(&frame.to_local(&p)), p, epsilon = 1e-9);

        let m = frame.to_matrix();
        let mapped = m.transform_point(&Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(mapped, frame.to_world(&Point3::new(1.0, 2.0, 3.0)), epsilon = 1e-9);
    }

    #[test]
    fn test_frame_projects_reference_direction() {
        let frame = Frame::new(Point3::origin(), Vector3::z(), Vector3::new(1.0, 0.0, 1.0));
        assert_relative_eq!(frame.ref_direction, Vector3::x(), epsilon = 1e-12);

        // Parallel reference collapses to the member rule
        let frame = Frame::new(Point3::origin(), Vector3::z(), Vector3::z());
        assert_eq!(frame.ref_direction, Vector3::x());
    }
}
