// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Project and spatial structure setup
//!
//! Written once per export before any element: owner history, units,
//! representation contexts, project, site, building and storeys, and the
//! aggregation relationships tying them together.

use crate::model::Storey;
use crate::options::ExportOptions;
use crate::records::{cartesian_point, direction, local_placement, offset_placement};
use chrono::{DateTime, Utc};
use ifc_writer_core::{AttributeValue, RecordGraph, RecordId, UuidSource};
use ifc_writer_geometry::Vector3;

/// Application name written to the owner history and the header
pub const APPLICATION_NAME: &str = "IFC-Writer";

/// Application version
pub const APPLICATION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A storey as written to the file
#[derive(Debug, Clone, PartialEq)]
pub struct StoreyRecord {
    pub id: RecordId,
    pub placement: RecordId,
    pub name: String,
    pub elevation: f64,
}

/// Records every element refers back to
#[derive(Debug, Clone)]
pub struct ProjectRecords {
    pub owner_history: RecordId,
    pub body_context: RecordId,
    pub project: RecordId,
    pub site: RecordId,
    pub building: RecordId,
    /// Shared `+Z` extrusion direction
    pub extrusion_direction: RecordId,
    /// Sorted by elevation, never empty
    pub storeys: Vec<StoreyRecord>,
}

/// Write the project header records
pub fn setup(
    graph: &mut RecordGraph,
    uuids: &mut dyn UuidSource,
    storeys: &[Storey],
    options: &ExportOptions,
    timestamp: &DateTime<Utc>,
) -> ProjectRecords {
    let owner_history = owner_history(graph, options, timestamp);
    let units = unit_assignment(graph);

    // World coordinate system and representation contexts
    let origin = cartesian_point(graph, &[0.0, 0.0, 0.0]);
    let world = graph.create(
        "IFCAXIS2PLACEMENT3D",
        [origin.into(), AttributeValue::Null, AttributeValue::Null],
    );
    let model_context = graph.create(
        "IFCGEOMETRICREPRESENTATIONCONTEXT",
        [
            AttributeValue::Null,
            "Model".into(),
            AttributeValue::Integer(3),
            AttributeValue::Real(1e-5),
            world.into(),
            AttributeValue::Null,
        ],
    );
    let body_context = graph.create(
        "IFCGEOMETRICREPRESENTATIONSUBCONTEXT",
        [
            "Body".into(),
            "Model".into(),
            AttributeValue::derived(),
            AttributeValue::derived(),
            AttributeValue::derived(),
            AttributeValue::derived(),
            model_context.into(),
            AttributeValue::Null,
            AttributeValue::enumeration("MODEL_VIEW"),
            AttributeValue::Null,
        ],
    );

    let project = graph.create(
        "IFCPROJECT",
        [
            uuids.next_global_id().into(),
            owner_history.into(),
            options.project_name.as_str().into(),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::references([model_context]),
            units.into(),
        ],
    );

    let site_placement = local_placement(graph, None, world);
    let site = graph.create(
        "IFCSITE",
        [
            uuids.next_global_id().into(),
            owner_history.into(),
            options.site_name.as_str().into(),
            AttributeValue::Null,
            AttributeValue::Null,
            site_placement.into(),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::enumeration("ELEMENT"),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
        ],
    );

    let building_placement = local_placement(graph, Some(site_placement), world);
    let building = graph.create(
        "IFCBUILDING",
        [
            uuids.next_global_id().into(),
            owner_history.into(),
            options.building_name.as_str().into(),
            AttributeValue::Null,
            AttributeValue::Null,
            building_placement.into(),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::enumeration("ELEMENT"),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
        ],
    );

    let storeys: Vec<StoreyRecord> = sorted_storeys(storeys)
        .into_iter()
        .map(|storey| {
            let relative =
                offset_placement(graph, &Vector3::new(0.0, 0.0, storey.elevation));
            let placement = local_placement(graph, Some(building_placement), relative);
            let id = graph.create(
                "IFCBUILDINGSTOREY",
                [
                    uuids.next_global_id().into(),
                    owner_history.into(),
                    storey.name.as_str().into(),
                    AttributeValue::Null,
                    AttributeValue::Null,
                    placement.into(),
                    AttributeValue::Null,
                    AttributeValue::Null,
                    AttributeValue::enumeration("ELEMENT"),
                    AttributeValue::Real(storey.elevation),
                ],
            );
            StoreyRecord {
                id,
                placement,
                name: storey.name,
                elevation: storey.elevation,
            }
        })
        .collect();

    aggregate(graph, uuids, owner_history, project, [site]);
    aggregate(graph, uuids, owner_history, site, [building]);
    aggregate(
        graph,
        uuids,
        owner_history,
        building,
        storeys.iter().map(|s| s.id),
    );

    let extrusion_direction = direction(graph, &Vector3::z());

    tracing::debug!(
        storeys = storeys.len(),
        records = graph.len(),
        "Project structure written"
    );

    ProjectRecords {
        owner_history,
        body_context,
        project,
        site,
        building,
        extrusion_direction,
        storeys,
    }
}

/// Finite storeys sorted by elevation, or a single default level
fn sorted_storeys(storeys: &[Storey]) -> Vec<Storey> {
    let mut sorted: Vec<Storey> = storeys
        .iter()
        .filter(|storey| {
            let finite = storey.elevation.is_finite();
            if !finite {
                tracing::warn!(storey = %storey.id, "Ignoring storey with non-finite elevation");
            }
            finite
        })
        .cloned()
        .collect();

    if sorted.is_empty() {
        tracing::warn!("No storeys supplied, using a default level at elevation 0");
        sorted.push(Storey {
            id: "default".into(),
            name: "Level 0".into(),
            elevation: 0.0,
        });
    }

    sorted.sort_by(|a, b| a.elevation.total_cmp(&b.elevation));
    sorted
}

fn owner_history(
    graph: &mut RecordGraph,
    options: &ExportOptions,
    timestamp: &DateTime<Utc>,
) -> RecordId {
    let organization_name = non_empty(&options.organization).unwrap_or(APPLICATION_NAME);
    // IfcPerson needs a family or given name
    let family_name = non_empty(&options.author).unwrap_or(organization_name);
    let person = graph.create(
        "IFCPERSON",
        [
            AttributeValue::Null,
            family_name.into(),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
        ],
    );
    let organization = graph.create(
        "IFCORGANIZATION",
        [
            AttributeValue::Null,
            organization_name.into(),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Null,
        ],
    );
    let user = graph.create(
        "IFCPERSONANDORGANIZATION",
        [person.into(), organization.into(), AttributeValue::Null],
    );
    let application = graph.create(
        "IFCAPPLICATION",
        [
            AttributeValue::Reference(organization),
            APPLICATION_VERSION.into(),
            APPLICATION_NAME.into(),
            "ifc-writer".into(),
        ],
    );
    // .ADDED. needs a LastModifiedDate; both dates are the export time
    let seconds = timestamp.timestamp();
    graph.create(
        "IFCOWNERHISTORY",
        [
            user.into(),
            application.into(),
            AttributeValue::Null,
            AttributeValue::enumeration("ADDED"),
            AttributeValue::Integer(seconds),
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::Integer(seconds),
        ],
    )
}

fn unit_assignment(graph: &mut RecordGraph) -> RecordId {
    let units = [
        ("LENGTHUNIT", Some("MILLI"), "METRE"),
        ("AREAUNIT", None, "SQUARE_METRE"),
        ("VOLUMEUNIT", None, "CUBIC_METRE"),
        ("PLANEANGLEUNIT", None, "RADIAN"),
    ]
    .map(|(unit_type, prefix, name)| {
        graph.create(
            "IFCSIUNIT",
            [
                AttributeValue::derived(),
                AttributeValue::enumeration(unit_type),
                prefix.map_or(AttributeValue::Null, AttributeValue::enumeration),
                AttributeValue::enumeration(name),
            ],
        )
    });
    graph.create("IFCUNITASSIGNMENT", [AttributeValue::references(units)])
}

fn aggregate<I>(
    graph: &mut RecordGraph,
    uuids: &mut dyn UuidSource,
    owner_history: RecordId,
    relating: RecordId,
    related: I,
) -> RecordId
where
    I: IntoIterator<Item = RecordId>,
{
    graph.create(
        "IFCRELAGGREGATES",
        [
            uuids.next_global_id().into(),
            owner_history.into(),
            AttributeValue::Null,
            AttributeValue::Null,
            relating.into(),
            AttributeValue::references(related),
        ],
    )
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
