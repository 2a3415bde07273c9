// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point-founded elements: footings and foundation columns

use super::{emit, planar_offset, shape_mismatch, SolidPlan};
use crate::context::ExportContext;
use crate::error::{positive, SkipReason};
use crate::model::{ElementShape, StructuralElement, StructuralModel};
use crate::profile::{check_section, create_profile};
use ifc_writer_core::RecordId;
use ifc_writer_geometry::{rotation_frame, Frame, Vector3};

/// The point is the top of the element: the section is rotated about +Z
/// and extruded downwards by the height. Offsets shift the point in
/// global X and Y.
pub(super) fn build(
    ctx: &mut ExportContext,
    model: &StructuralModel,
    element: &StructuralElement,
) -> Result<RecordId, SkipReason> {
    let ElementShape::Point {
        at,
        height,
        reference_flag,
    } = &element.shape
    else {
        return Err(shape_mismatch(element, "point"));
    };

    let point = model.resolve(at)?;
    let height = positive("height", *height)?;
    let section = element.section.as_ref().ok_or(SkipReason::MissingSection)?;
    check_section(&section.shape)?;
    if !element.rotation.is_finite() {
        return Err(SkipReason::NonFinite);
    }
    let offset = planar_offset(element)?;

    let (axis, ref_direction) = rotation_frame(element.rotation, *reference_flag);
    let placement = Frame::new(point + offset, axis, ref_direction);

    let profile = create_profile(ctx, section).ok_or(SkipReason::UnsupportedProfile)?;

    Ok(emit(
        ctx,
        element,
        &profile,
        &SolidPlan {
            placement,
            solid_offset: Vector3::new(0.0, 0.0, -height),
            depth: height,
            elevation: placement.origin.z,
        },
    ))
}
