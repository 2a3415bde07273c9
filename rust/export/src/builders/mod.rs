// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element Builders
//!
//! Every builder follows the same steps: validate the input, compute the
//! geometry, build the profile, then write placement, solid,
//! representation, the element itself, its material and its storey
//! containment. Nothing is written until validation and geometry have
//! succeeded, and nothing after the profile can fail, so a skipped element
//! leaves the graph exactly as it was.

mod linear;
mod planar;
mod point;

use crate::context::ExportContext;
use crate::error::SkipReason;
use crate::model::{ElementKind, StructuralElement, StructuralModel};
use crate::profile::GeometricProfile;
use crate::records::{axis2_placement_3d, local_placement, offset_placement};
use crate::storey::assign_to_storey;
use ifc_writer_core::{AttributeValue, RecordId};
use ifc_writer_geometry::{Frame, Vector3};

/// Build one element, dispatching on its kind
pub fn build_element(
    ctx: &mut ExportContext,
    model: &StructuralModel,
    element: &StructuralElement,
) -> Result<RecordId, SkipReason> {
    match element.kind {
        ElementKind::Column | ElementKind::Beam | ElementKind::Brace | ElementKind::Pile => {
            linear::build(ctx, model, element)
        }
        ElementKind::Slab | ElementKind::Wall => planar::build(ctx, model, element),
        ElementKind::Footing | ElementKind::FoundationColumn => point::build(ctx, model, element),
    }
}

/// Resolved predefined type and object type of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredefinedType {
    /// Bare enumeration value, e.g. `COLUMN`
    pub value: String,
    pub object_type: Option<String>,
}

/// Map an input tag onto the entity's predefined type enumeration.
///
/// Tags are upper-cased. A tag the enumeration does not know becomes
/// `USERDEFINED` and is kept as the object type.
pub fn resolve_predefined_type(kind: ElementKind, tag: Option<&str>) -> PredefinedType {
    let tag = tag.map(str::trim).filter(|t| !t.is_empty());

    let (value, custom) = match tag {
        Some(tag) => {
            let upper = tag.to_uppercase();
            if kind.predefined_types().contains(&upper.as_str()) {
                (upper, None)
            } else {
                ("USERDEFINED".to_string(), Some(tag.to_string()))
            }
        }
        None => (kind.default_predefined_type().to_string(), None),
    };

    let object_type = kind
        .object_type()
        .map(str::to_string)
        .or(custom)
        .or_else(|| (value == "USERDEFINED").then(|| kind.label().to_string()));

    PredefinedType { value, object_type }
}

/// Where and how far to extrude
#[derive(Debug, Clone, Copy)]
struct SolidPlan {
    /// Absolute element placement
    placement: Frame,
    /// Solid position relative to the placement
    solid_offset: Vector3<f64>,
    depth: f64,
    /// Elevation used for storey assignment
    elevation: f64,
}

/// Planar offset as a vector, rejecting non-finite values
fn planar_offset(element: &StructuralElement) -> Result<Vector3<f64>, SkipReason> {
    let offset = Vector3::new(element.offset.x, element.offset.y, 0.0);
    if offset.iter().all(|c| c.is_finite()) {
        Ok(offset)
    } else {
        Err(SkipReason::NonFinite)
    }
}

fn shape_mismatch(element: &StructuralElement, expected: &'static str) -> SkipReason {
    SkipReason::ShapeMismatch {
        kind: element.kind.label(),
        expected,
    }
}

/// Write everything after the profile. Infallible.
fn emit(
    ctx: &mut ExportContext,
    element: &StructuralElement,
    profile: &GeometricProfile,
    plan: &SolidPlan,
) -> RecordId {
    let extrusion_direction = ctx.project.extrusion_direction;
    let body_context = ctx.project.body_context;

    let graph = &mut ctx.graph;
    let relative = axis2_placement_3d(graph, &plan.placement);
    let placement = local_placement(graph, None, relative);
    let position = offset_placement(graph, &plan.solid_offset);
    let solid = graph.create(
        "IFCEXTRUDEDAREASOLID",
        [
            AttributeValue::Reference(profile.id),
            position.into(),
            extrusion_direction.into(),
            plan.depth.into(),
        ],
    );
    let representation = graph.create(
        "IFCSHAPEREPRESENTATION",
        [
            AttributeValue::Reference(body_context),
            "Body".into(),
            "SweptSolid".into(),
            AttributeValue::references([solid]),
        ],
    );
    let product_shape = graph.create(
        "IFCPRODUCTDEFINITIONSHAPE",
        [
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::references([representation]),
        ],
    );

    let predefined = resolve_predefined_type(element.kind, element.predefined_type.as_deref());
    let mut attributes = vec![
        ctx.global_id(),
        ctx.owner_history(),
        element.display_name().into(),
        AttributeValue::Null,
        AttributeValue::optional_string(predefined.object_type.as_deref()),
        placement.into(),
        product_shape.into(),
        element.id.as_str().into(),
        AttributeValue::enumeration(&predefined.value),
    ];
    if element.kind == ElementKind::Pile {
        // ConstructionType
        attributes.push(AttributeValue::Null);
    }
    let id = ctx.graph.create(element.kind.entity(), attributes);

    if let Some(material) = element.material.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        let material = ctx.material(material);
        let global_id = ctx.global_id();
        let owner_history = ctx.owner_history();
        ctx.graph.create(
            "IFCRELASSOCIATESMATERIAL",
            [
                global_id,
                owner_history,
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::references([id]),
                material.into(),
            ],
        );
    }

    assign_to_storey(ctx, id, plan.elevation);
    id
}
