// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Profile Factory - cross-section descriptions to profile definitions
//!
//! Every input is checked before the first record is written, so a
//! rejected section leaves the graph untouched. Parametric profiles are
//! cached per export: members sharing a section share one profile.

use crate::context::ExportContext;
use crate::error::{positive, SkipReason};
use crate::model::{SectionProfile, SectionShape};
use crate::records::{centered_placement_2d, closed_polyline};
use ifc_writer_core::{AttributeValue, RecordId};
use ifc_writer_geometry::Point2;

/// Profile definition kinds written by the factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    IShape,
    RectangleHollow,
    Circle,
    CircleHollow,
    Rectangle,
    Channel,
    Angle,
    Polygon,
}

impl ProfileKind {
    /// IFC entity keyword
    pub fn entity(self) -> &'static str {
        match self {
            ProfileKind::IShape => "IFCISHAPEPROFILEDEF",
            ProfileKind::RectangleHollow => "IFCRECTANGLEHOLLOWPROFILEDEF",
            ProfileKind::Circle => "IFCCIRCLEPROFILEDEF",
            ProfileKind::CircleHollow => "IFCCIRCLEHOLLOWPROFILEDEF",
            ProfileKind::Rectangle => "IFCRECTANGLEPROFILEDEF",
            ProfileKind::Channel => "IFCUSHAPEPROFILEDEF",
            ProfileKind::Angle => "IFCLSHAPEPROFILEDEF",
            ProfileKind::Polygon => "IFCARBITRARYCLOSEDPROFILEDEF",
        }
    }
}

/// A written profile definition
#[derive(Debug, Clone, PartialEq)]
pub struct GeometricProfile {
    pub id: RecordId,
    pub kind: ProfileKind,
    /// Section the profile was made from
    pub description: String,
}

/// Check a section without writing anything
pub fn check_section(shape: &SectionShape) -> Result<ProfileKind, SkipReason> {
    match *shape {
        SectionShape::IShape {
            width,
            depth,
            web_thickness,
            flange_thickness,
            fillet_radius,
        } => {
            positive("width", width)?;
            positive("depth", depth)?;
            positive("web thickness", web_thickness)?;
            positive("flange thickness", flange_thickness)?;
            if web_thickness >= width {
                return Err(SkipReason::InconsistentSection("web thicker than flange width"));
            }
            if 2.0 * flange_thickness >= depth {
                return Err(SkipReason::InconsistentSection("flanges thicker than depth"));
            }
            if let Some(radius) = fillet_radius {
                if !(radius.is_finite() && radius >= 0.0) {
                    return Err(SkipReason::NonPositiveDimension {
                        name: "fillet radius",
                        value: radius,
                    });
                }
                // Fillet must fit between web and flange tips, and between flanges
                if radius > (width - web_thickness) / 2.0
                    || radius > (depth - 2.0 * flange_thickness) / 2.0
                {
                    return Err(SkipReason::InconsistentSection("fillet radius too large"));
                }
            }
            Ok(ProfileKind::IShape)
        }
        SectionShape::RectangleHollow {
            width,
            depth,
            wall_thickness,
        } => {
            positive("width", width)?;
            positive("depth", depth)?;
            positive("wall thickness", wall_thickness)?;
            if 2.0 * wall_thickness >= width.min(depth) {
                return Err(SkipReason::InconsistentSection("walls thicker than tube"));
            }
            Ok(ProfileKind::RectangleHollow)
        }
        SectionShape::Circle {
            radius,
            wall_thickness,
        } => {
            positive("radius", radius)?;
            match wall_thickness {
                None => Ok(ProfileKind::Circle),
                Some(wall) => {
                    positive("wall thickness", wall)?;
                    if wall >= radius {
                        return Err(SkipReason::InconsistentSection("wall thicker than radius"));
                    }
                    Ok(ProfileKind::CircleHollow)
                }
            }
        }
        SectionShape::Rectangle { width, depth } => {
            positive("width", width)?;
            positive("depth", depth)?;
            Ok(ProfileKind::Rectangle)
        }
        SectionShape::Channel {
            width,
            depth,
            web_thickness,
            flange_thickness,
        } => {
            positive("width", width)?;
            positive("depth", depth)?;
            positive("web thickness", web_thickness)?;
            positive("flange thickness", flange_thickness)?;
            if web_thickness >= width {
                return Err(SkipReason::InconsistentSection("web thicker than flange width"));
            }
            if 2.0 * flange_thickness >= depth {
                return Err(SkipReason::InconsistentSection("flanges thicker than depth"));
            }
            Ok(ProfileKind::Channel)
        }
        SectionShape::Angle {
            width,
            depth,
            thickness,
        } => {
            positive("width", width)?;
            positive("depth", depth)?;
            positive("thickness", thickness)?;
            if thickness >= width.min(depth) {
                return Err(SkipReason::InconsistentSection("leg thicker than angle"));
            }
            Ok(ProfileKind::Angle)
        }
        SectionShape::Unknown => Err(SkipReason::UnsupportedProfile),
    }
}

/// Create (or reuse) the profile for a section.
///
/// Returns `None`, with no records written, when the section is unknown or
/// its dimensions are invalid.
pub fn create_profile(ctx: &mut ExportContext, section: &SectionProfile) -> Option<GeometricProfile> {
    let kind = check_section(&section.shape).ok()?;

    let description = format!("{:?}", section);
    if let Some(profile) = ctx.cached_profile(&description) {
        return Some(profile.clone());
    }

    let graph = &mut ctx.graph;
    let position = centered_placement_2d(graph);
    let name = AttributeValue::optional_string(section.name.as_deref());
    let area = AttributeValue::enumeration("AREA");

    let id = match section.shape {
        SectionShape::IShape {
            width,
            depth,
            web_thickness,
            flange_thickness,
            fillet_radius,
        } => graph.create(
            kind.entity(),
            [
                area,
                name,
                position.into(),
                width.into(),
                depth.into(),
                web_thickness.into(),
                flange_thickness.into(),
                fillet_radius.map_or(AttributeValue::Null, AttributeValue::Real),
                AttributeValue::Null,
                AttributeValue::Null,
            ],
        ),
        SectionShape::RectangleHollow {
            width,
            depth,
            wall_thickness,
        } => graph.create(
            kind.entity(),
            [
                area,
                name,
                position.into(),
                width.into(),
                depth.into(),
                wall_thickness.into(),
                AttributeValue::Null,
                AttributeValue::Null,
            ],
        ),
        SectionShape::Circle {
            radius,
            wall_thickness: None,
        } => graph.create(kind.entity(), [area, name, position.into(), radius.into()]),
        SectionShape::Circle {
            radius,
            wall_thickness: Some(wall),
        } => graph.create(
            kind.entity(),
            [area, name, position.into(), radius.into(), wall.into()],
        ),
        SectionShape::Rectangle { width, depth } => graph.create(
            kind.entity(),
            [area, name, position.into(), width.into(), depth.into()],
        ),
        SectionShape::Channel {
            width,
            depth,
            web_thickness,
            flange_thickness,
        } => graph.create(
            kind.entity(),
            [
                area,
                name,
                position.into(),
                depth.into(),
                width.into(),
                web_thickness.into(),
                flange_thickness.into(),
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::Null,
            ],
        ),
        SectionShape::Angle {
            width,
            depth,
            thickness,
        } => graph.create(
            kind.entity(),
            [
                area,
                name,
                position.into(),
                depth.into(),
                width.into(),
                thickness.into(),
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::Null,
            ],
        ),
        // Rejected by check_section
        SectionShape::Unknown => return None,
    };

    let profile = GeometricProfile {
        id,
        kind,
        description: description.clone(),
    };
    tracing::debug!(profile = %profile.description, id = id.get(), "Created profile");
    ctx.cache_profile(description, profile.clone());
    Some(profile)
}

/// Arbitrary closed profile from a centroid-relative 2D contour.
///
/// Not cached: every planar element has its own outline.
pub fn create_polygon_profile(
    ctx: &mut ExportContext,
    name: Option<&str>,
    vertices: &[Point2<f64>],
) -> Option<GeometricProfile> {
    if vertices.len() < 3 || vertices.iter().any(|v| !(v.x.is_finite() && v.y.is_finite())) {
        return None;
    }

    let graph = &mut ctx.graph;
    let curve = closed_polyline(graph, vertices);
    let id = graph.create(
        ProfileKind::Polygon.entity(),
        [
            AttributeValue::enumeration("AREA"),
            AttributeValue::optional_string(name),
            curve.into(),
        ],
    );

    Some(GeometricProfile {
        id,
        kind: ProfileKind::Polygon,
        description: format!("polygon with {} vertices", vertices.len()),
    })
}
