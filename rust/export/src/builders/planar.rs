// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar elements: slabs and walls

use super::{emit, planar_offset, shape_mismatch, SolidPlan};
use crate::context::ExportContext;
use crate::error::{positive, SkipReason};
use crate::model::{ElementKind, ElementShape, StructuralElement, StructuralModel};
use crate::profile::create_polygon_profile;
use ifc_writer_core::RecordId;
use ifc_writer_geometry::{Frame, PlanarPolygon, Point3, Vector3};

/// The polygon outline becomes an arbitrary closed profile placed at its
/// centroid. Slabs hang below the polygon (it is their top face); walls
/// are centred on it. Both belong to the storey of their lowest vertex.
pub(super) fn build(
    ctx: &mut ExportContext,
    model: &StructuralModel,
    element: &StructuralElement,
) -> Result<RecordId, SkipReason> {
    let ElementShape::Polygon {
        vertices,
        thickness,
    } = &element.shape
    else {
        return Err(shape_mismatch(element, "polygon"));
    };

    let points = vertices
        .iter()
        .map(|v| model.resolve(v))
        .collect::<Result<Vec<Point3<f64>>, _>>()?;
    let thickness = positive("thickness", *thickness)?;
    let offset = planar_offset(element)?;
    let polygon = PlanarPolygon::from_points(&points)?;

    let placement = Frame {
        origin: polygon.frame.origin + offset,
        ..polygon.frame
    };
    let solid_offset = match element.kind {
        ElementKind::Wall => Vector3::new(0.0, 0.0, -thickness / 2.0),
        _ => Vector3::new(0.0, 0.0, -thickness),
    };
    let elevation = points
        .iter()
        .map(|p| p.z)
        .fold(f64::INFINITY, f64::min);

    let profile = create_polygon_profile(ctx, element.name.as_deref(), &polygon.vertices)
        .ok_or(SkipReason::DegeneratePolygon)?;

    Ok(emit(
        ctx,
        element,
        &profile,
        &SolidPlan {
            placement,
            solid_offset,
            depth: thickness,
            elevation,
        },
    ))
}
