// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Two-point members: columns, beams, braces and piles

use super::{emit, planar_offset, shape_mismatch, SolidPlan};
use crate::context::ExportContext;
use crate::error::SkipReason;
use crate::model::{ElementKind, ElementShape, StructuralElement, StructuralModel};
use crate::profile::{check_section, create_profile};
use ifc_writer_core::RecordId;
use ifc_writer_geometry::{centered_extrusion_offset, member_frame};

/// Place the member at its offset midpoint and extrude the section along
/// the full length, centred on the placement.
///
/// Piles run from `start` (top) to `end` (bottom) and belong to the storey
/// of their offset top; every other member goes by its lowest endpoint.
pub(super) fn build(
    ctx: &mut ExportContext,
    model: &StructuralModel,
    element: &StructuralElement,
) -> Result<RecordId, SkipReason> {
    let ElementShape::Line { start, end } = &element.shape else {
        return Err(shape_mismatch(element, "line"));
    };

    let p0 = model.resolve(start)?;
    let p1 = model.resolve(end)?;
    let section = element.section.as_ref().ok_or(SkipReason::MissingSection)?;
    check_section(&section.shape)?;
    if !element.rotation.is_finite() {
        return Err(SkipReason::NonFinite);
    }
    let offset = planar_offset(element)?;

    let (frame, length) = member_frame(&p0, &p1, element.rotation)?;
    let placement = frame.translated(&offset);

    let elevation = match element.kind {
        ElementKind::Pile => p0.z + frame.local_vector(&offset).z,
        _ => p0.z.min(p1.z),
    };

    let profile = create_profile(ctx, section).ok_or(SkipReason::UnsupportedProfile)?;

    Ok(emit(
        ctx,
        element,
        &profile,
        &SolidPlan {
            placement,
            solid_offset: centered_extrusion_offset(length),
            depth: length,
            elevation,
        },
    ))
}
