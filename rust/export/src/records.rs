// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric resource records shared by the project setup, the profile
//! factory and the element builders

use ifc_writer_core::{AttributeValue, RecordGraph, RecordId};
use ifc_writer_geometry::{Frame, Point2, Point3, Vector3};

/// `IFCCARTESIANPOINT` from raw coordinates (2D or 3D)
pub fn cartesian_point(graph: &mut RecordGraph, coords: &[f64]) -> RecordId {
    graph.create("IFCCARTESIANPOINT", [AttributeValue::reals(coords)])
}

#[inline]
pub fn point3(graph: &mut RecordGraph, point: &Point3<f64>) -> RecordId {
    cartesian_point(graph, &[point.x, point.y, point.z])
}

/// `IFCDIRECTION` from a 3D vector
pub fn direction(graph: &mut RecordGraph, v: &Vector3<f64>) -> RecordId {
    graph.create("IFCDIRECTION", [AttributeValue::reals(&[v.x, v.y, v.z])])
}

/// `IFCAXIS2PLACEMENT3D` with explicit axis and reference direction
pub fn axis2_placement_3d(graph: &mut RecordGraph, frame: &Frame) -> RecordId {
    let location = point3(graph, &frame.origin);
    let axis = direction(graph, &frame.axis);
    let ref_direction = direction(graph, &frame.ref_direction);
    graph.create(
        "IFCAXIS2PLACEMENT3D",
        [
            AttributeValue::Reference(location),
            axis.into(),
            ref_direction.into(),
        ],
    )
}

/// `IFCAXIS2PLACEMENT3D` translated from its parent, axes inherited
pub fn offset_placement(graph: &mut RecordGraph, offset: &Vector3<f64>) -> RecordId {
    let location = cartesian_point(graph, &[offset.x, offset.y, offset.z]);
    graph.create(
        "IFCAXIS2PLACEMENT3D",
        [location.into(), AttributeValue::Null, AttributeValue::Null],
    )
}

/// Centred `IFCAXIS2PLACEMENT2D` for parametric profiles
pub fn centered_placement_2d(graph: &mut RecordGraph) -> RecordId {
    let location = cartesian_point(graph, &[0.0, 0.0]);
    graph.create("IFCAXIS2PLACEMENT2D", [location.into(), AttributeValue::Null])
}

/// `IFCLOCALPLACEMENT`; `None` makes the placement absolute
pub fn local_placement(
    graph: &mut RecordGraph,
    parent: Option<RecordId>,
    relative: RecordId,
) -> RecordId {
    graph.create(
        "IFCLOCALPLACEMENT",
        [AttributeValue::from(parent), relative.into()],
    )
}

/// Closed 2D `IFCPOLYLINE`: the first point is repeated at the end
pub fn closed_polyline(graph: &mut RecordGraph, vertices: &[Point2<f64>]) -> RecordId {
    let mut points: Vec<RecordId> = vertices
        .iter()
        .map(|v| cartesian_point(graph, &[v.x, v.y]))
        .collect();
    if let Some(&first) = points.first() {
        points.push(first);
    }
    graph.create("IFCPOLYLINE", [AttributeValue::references(points)])
}
