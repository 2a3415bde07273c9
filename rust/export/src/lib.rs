// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Writer Export
//!
//! Turns a structural model (columns, beams, braces, slabs, walls, piles,
//! footings and foundation columns) into an IFC4 STEP file.
//!
//! ## Overview
//!
//! - **Profiles**: I, tube, circle, rectangle, channel, angle and polygon sections
//! - **Placement**: members placed at their midpoint, solids centred on it
//! - **Storeys**: each element contained in the level below its lowest point
//! - **Skips**: invalid elements are logged and left out, the export goes on
//!
//! ## Quick Start
//!
//! ```rust
//! use ifc_writer_export::{
//!     export, ElementKind, ElementShape, Endpoint, ExportOptions, Point, SectionProfile,
//!     SectionShape, StructuralElement, StructuralModel,
//! };
//!
//! let mut model = StructuralModel::new();
//! model.add_storey("L0", "Ground", 0.0);
//! model.add_node(1, Point::new(0.0, 0.0, 0.0));
//! model.add_node(2, Point::new(0.0, 0.0, 3500.0));
//! model.add_element(
//!     StructuralElement::new(
//!         "C1",
//!         ElementKind::Column,
//!         ElementShape::Line { start: Endpoint::Node(1), end: Endpoint::Node(2) },
//!     )
//!     .with_section(SectionProfile::new(
//!         "SHS 200x10",
//!         SectionShape::RectangleHollow { width: 200.0, depth: 200.0, wall_thickness: 10.0 },
//!     )),
//! );
//!
//! let result = export(&model, &ExportOptions::default())?;
//! assert_eq!(result.exported.len(), 1);
//! assert!(result.text.contains("IFCCOLUMN("));
//! # Ok::<(), ifc_writer_export::Error>(())
//! ```

pub mod assembler;
pub mod builders;
pub mod context;
pub mod error;
pub mod model;
pub mod options;
pub mod profile;
pub mod project;
pub mod records;
pub mod storey;

pub use builders::{build_element, resolve_predefined_type, PredefinedType};
pub use context::ExportContext;
pub use error::{Error, Result, SkipReason};
pub use model::{
    ElementKind, ElementShape, Endpoint, NodeMap, PlanarOffset, Point, SectionProfile,
    SectionShape, Storey, StructuralElement, StructuralModel,
};
pub use options::ExportOptions;
pub use profile::{create_polygon_profile, create_profile, GeometricProfile, ProfileKind};
pub use storey::{assign_to_storey, select_storey};

pub use ifc_writer_core::{
    AttributeValue, RandomUuids, RecordGraph, RecordId, SequentialUuids, UuidSource,
};

use chrono::{DateTime, Utc};

/// An element that made it into the file
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedElement {
    pub id: String,
    pub kind: ElementKind,
    pub record: RecordId,
}

/// An element that was left out, and why
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedElement {
    pub id: String,
    pub kind: ElementKind,
    pub reason: SkipReason,
}

/// Outcome of one export call
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Complete STEP file text
    pub text: String,
    pub record_count: usize,
    pub exported: Vec<ExportedElement>,
    pub skipped: Vec<SkippedElement>,
}

/// Element-by-element exporter over one model
pub struct Exporter<'a> {
    model: &'a StructuralModel,
    options: ExportOptions,
    ctx: ExportContext,
    exported: Vec<ExportedElement>,
    skipped: Vec<SkippedElement>,
}

impl<'a> Exporter<'a> {
    /// Exporter with random GlobalIds and the current time
    pub fn new(model: &'a StructuralModel, options: &ExportOptions) -> Self {
        Self::with_settings(model, options, Box::new(RandomUuids), Utc::now())
    }

    /// Exporter with an explicit uuid source and timestamp
    pub fn with_settings(
        model: &'a StructuralModel,
        options: &ExportOptions,
        uuids: Box<dyn UuidSource>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let ctx = ExportContext::new(&model.storeys, options, uuids, timestamp);
        Self {
            model,
            options: options.clone(),
            ctx,
            exported: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Build one element. Returns `None` and records the reason when the
    /// element is skipped; the graph is then unchanged.
    pub fn add_element(&mut self, element: &StructuralElement) -> Option<RecordId> {
        let before = self.ctx.graph.len();

        match build_element(&mut self.ctx, self.model, element) {
            Ok(record) => {
                tracing::debug!(
                    element = %element.id,
                    kind = element.kind.label(),
                    record = record.get(),
                    records = self.ctx.graph.len() - before,
                    "Exported element"
                );
                self.exported.push(ExportedElement {
                    id: element.id.clone(),
                    kind: element.kind,
                    record,
                });
                Some(record)
            }
            Err(reason) => {
                debug_assert_eq!(self.ctx.graph.len(), before, "skipped element wrote records");
                tracing::warn!(
                    element = %element.id,
                    kind = element.kind.label(),
                    %reason,
                    "Skipping element"
                );
                self.skipped.push(SkippedElement {
                    id: element.id.clone(),
                    kind: element.kind,
                    reason,
                });
                None
            }
        }
    }

    /// Build every model element, kind by kind in export order
    pub fn add_all(&mut self) {
        let model = self.model;
        for kind in ElementKind::EXPORT_ORDER {
            for element in model.elements.iter().filter(|e| e.kind == kind) {
                self.add_element(element);
            }
        }
    }

    /// Records written so far
    pub fn graph(&self) -> &RecordGraph {
        &self.ctx.graph
    }

    pub fn context(&self) -> &ExportContext {
        &self.ctx
    }

    pub fn skipped(&self) -> &[SkippedElement] {
        &self.skipped
    }

    pub fn exported(&self) -> &[ExportedElement] {
        &self.exported
    }

    /// Validate and assemble the file
    pub fn finish(self) -> Result<ExportResult> {
        let text = assembler::assemble(&self.ctx.graph, &self.options, &self.ctx.timestamp)?;

        tracing::info!(
            file = %self.options.file_name,
            records = self.ctx.graph.len(),
            exported = self.exported.len(),
            skipped = self.skipped.len(),
            "Export finished"
        );

        Ok(ExportResult {
            text,
            record_count: self.ctx.graph.len(),
            exported: self.exported,
            skipped: self.skipped,
        })
    }
}

/// Export a whole model with random GlobalIds
pub fn export(model: &StructuralModel, options: &ExportOptions) -> Result<ExportResult> {
    export_with_uuids(model, options, RandomUuids)
}

/// Export a whole model drawing GlobalIds from `uuids`
pub fn export_with_uuids<U>(
    model: &StructuralModel,
    options: &ExportOptions,
    uuids: U,
) -> Result<ExportResult>
where
    U: UuidSource + 'static,
{
    tracing::info!(
        elements = model.elements.len(),
        storeys = model.storeys.len(),
        nodes = model.nodes.len(),
        "Starting IFC export"
    );

    let mut exporter = Exporter::with_settings(model, options, Box::new(uuids), Utc::now());
    exporter.add_all();
    exporter.finish()
}
