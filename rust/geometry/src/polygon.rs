// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar polygons for slabs and walls
//!
//! A 3D vertex loop is fitted to a plane with Newell's method, then
//! expressed in a local frame whose origin is the area centroid. The 2D
//! contour is what ends up in the arbitrary closed profile; the frame
//! becomes the solid's placement.

use crate::error::{Error, Result};
use crate::placement::{reference_direction, Frame};
use nalgebra::{Point2, Point3, Vector2, Vector3};

/// Vertices closer than this are merged
const VERTEX_EPSILON: f64 = 1e-6;

/// Polygons with less area than this are degenerate
const MIN_AREA: f64 = 1e-6;

/// Allowed out-of-plane deviation relative to the polygon size
const PLANARITY_TOLERANCE: f64 = 1e-3;

/// Polygon expressed in its own plane
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarPolygon {
    /// Origin at the area centroid, axis along the plane normal
    pub frame: Frame,
    /// Counter-clockwise contour relative to the centroid, not closed
    pub vertices: Vec<Point2<f64>>,
    pub area: f64,
}

impl PlanarPolygon {
    /// Fit a plane through a vertex loop.
    ///
    /// A repeated closing vertex and consecutive duplicates are dropped.
    /// The normal is flipped to point upwards when it has a downward
    /// component, so horizontal polygons always get a +Z axis.
    pub fn from_points(points: &[Point3<f64>]) -> Result<Self> {
        if points
            .iter()
            .any(|p| !p.coords.iter().all(|c| c.is_finite()))
        {
            return Err(Error::NonFinite);
        }

        let loop_points = dedupe_loop(points);
        if loop_points.len() < 3 {
            return Err(Error::TooFewVertices(loop_points.len()));
        }

        let newell = newell_normal(&loop_points);
        let doubled_area = newell.norm();
        if doubled_area / 2.0 < MIN_AREA {
            return Err(Error::DegeneratePolygon);
        }

        let mut normal = newell / doubled_area;
        if normal.z < -VERTEX_EPSILON {
            normal = -normal;
        }

        let base = Frame::new(loop_points[0], normal, reference_direction(&normal));

        let mut deviation: f64 = 0.0;
        let mut extent: f64 = 0.0;
        let mut contour: Vec<Point2<f64>> = Vec::with_capacity(loop_points.len());
        for p in &loop_points {
            let local = base.to_local(p);
            deviation = deviation.max(local.z.abs());
            extent = extent.max(local.x.abs()).max(local.y.abs());
            contour.push(Point2::new(local.x, local.y));
        }
        if deviation > PLANARITY_TOLERANCE * extent.max(1.0) {
            return Err(Error::NonPlanar { deviation });
        }

        let centroid = contour_centroid(&contour);
        for v in contour.iter_mut() {
            *v -= centroid.coords;
        }
        ensure_ccw(&mut contour);

        let origin = base.to_world(&Point3::new(centroid.x, centroid.y, 0.0));
        let area = signed_area(&contour).abs();

        Ok(Self {
            frame: Frame { origin, ..base },
            vertices: contour,
            area,
        })
    }

    /// Unit normal of the plane
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.frame.axis
    }
}

/// Remove consecutive duplicates and a closing vertex equal to the first
fn dedupe_loop(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    let mut result: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if result
            .last()
            .map_or(true, |last| (p - last).norm() > VERTEX_EPSILON)
        {
            result.push(*p);
        }
    }
    while result.len() > 1 {
        let closes = match (result.first(), result.last()) {
            (Some(first), Some(last)) => (last - first).norm() <= VERTEX_EPSILON,
            _ => false,
        };
        if !closes {
            break;
        }
        result.pop();
    }
    result
}

/// Newell's method: unnormalized normal whose length is twice the area
pub fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    let n = points.len();
    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal
}

/// Signed area of a 2D contour (positive = counter-clockwise)
pub fn signed_area(contour: &[Point2<f64>]) -> f64 {
    let n = contour.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y - contour[j].x * contour[i].y;
    }
    area * 0.5
}

/// Make a contour counter-clockwise in place
pub fn ensure_ccw(contour: &mut [Point2<f64>]) {
    if signed_area(contour) < 0.0 {
        contour.reverse();
    }
}

/// Area centroid of a simple 2D contour
fn contour_centroid(contour: &[Point2<f64>]) -> Point2<f64> {
    let n = contour.len();
    let mut cx = 0.0;
    let mut cy = 0.0;
    let mut doubled_area = 0.0;
    for i in 0..n {
        let a = &contour[i];
        let b = &contour[(i + 1) % n];
        let cross = a.x * b.y - b.x * a.y;
        doubled_area += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }

    if doubled_area.abs() < f64::EPSILON {
        // Fall back to the vertex average
        let sum = contour
            .iter()
            .fold(Vector2::zeros(), |acc, p| acc + p.coords);
        return Point2::from(sum / n as f64);
    }

    let factor = 1.0 / (3.0 * doubled_area);
    Point2::new(cx * factor, cy * factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rectangle_at(z: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, z),
            Point3::new(4000.0, 0.0, z),
            Point3::new(4000.0, 3000.0, z),
            Point3::new(0.0, 3000.0, z),
        ]
    }

    #[test]
    fn test_horizontal_rectangle() {
        let polygon = PlanarPolygon::from_points(&rectangle_at(3000.0)).unwrap();

        assert_relative_eq!(polygon.normal(), Vector3::z());
        assert_relative_eq!(polygon.frame.origin, Point3::new(2000.0, 1500.0, 3000.0));
        assert_eq!(polygon.frame.ref_direction, Vector3::x());
        assert_relative_eq!(polygon.area, 12_000_000.0);
        assert_eq!(polygon.vertices.len(), 4);
        assert!(signed_area(&polygon.vertices) > 0.0);
        assert_relative_eq!(polygon.vertices[0], Point2::new(-2000.0, -1500.0));
    }

    #[test]
    fn test_clockwise_input_is_reoriented() {
        let mut points = rectangle_at(0.0);
        points.reverse();
        let polygon = PlanarPolygon::from_points(&points).unwrap();

        // Downward normal is flipped, contour still counter-clockwise
        assert_relative_eq!(polygon.normal(), Vector3::z());
        assert!(signed_area(&polygon.vertices) > 0.0);
    }

    #[test]
    fn test_closing_vertex_is_dropped() {
        let mut points = rectangle_at(0.0);
        points.push(points[0]);
        points.insert(1, points[0]);
        let polygon = PlanarPolygon::from_points(&points).unwrap();
        assert_eq!(polygon.vertices.len(), 4);
    }

    #[test]
    fn test_vertical_wall_polygon() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(5000.0, 0.0, 0.0),
            Point3::new(5000.0, 0.0, 3000.0),
            Point3::new(0.0, 0.0, 3000.0),
        ];
        let polygon = PlanarPolygon::from_points(&points).unwrap();

        assert_relative_eq!(polygon.normal().y.abs(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(polygon.frame.origin, Point3::new(2500.0, 0.0, 1500.0));
        assert_relative_eq!(polygon.area, 15_000_000.0);
        // Local X stays horizontal
        assert_relative_eq!(polygon.frame.ref_direction.z, 0.0);

        for local in &polygon.vertices {
            let mapped = polygon.frame.to_world(&Point3::new(local.x, local.y, 0.0));
            assert!(points.iter().any(|p| (p - mapped).norm() < 1e-6), "{:?}", mapped);
        }
    }

    #[test]
    fn test_too_few_vertices() {
        let points = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 0.0, 0.0)];
        assert_eq!(PlanarPolygon::from_points(&points), Err(Error::TooFewVertices(2)));
        assert_eq!(PlanarPolygon::from_points(&[]), Err(Error::TooFewVertices(0)));
    }

    #[test]
    fn test_collinear_polygon_is_degenerate() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1000.0, 0.0, 0.0),
            Point3::new(2000.0, 0.0, 0.0),
        ];
        assert_eq!(PlanarPolygon::from_points(&points), Err(Error::DegeneratePolygon));
    }

    #[test]
    fn test_non_planar_polygon() {
        let mut points = rectangle_at(0.0);
        points[2].z = 500.0;
        assert!(matches!(PlanarPolygon::from_points(&points), Err(Error::NonPlanar { .. })));
    }

    #[test]
    fn test_signed_area() {
        let square = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert_relative_eq!(signed_area(&square), 1.0);

        let mut reversed = square.clone();
        reversed.reverse();
        assert_relative_eq!(signed_area(&reversed), -1.0);
        ensure_ccw(&mut reversed);
        assert_relative_eq!(signed_area(&reversed), 1.0);
    }
}
