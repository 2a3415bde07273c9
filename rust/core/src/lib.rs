// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Writer Core
//!
//! Record graph and literal encoding for writing STEP/IFC physical files.
//!
//! ## Overview
//!
//! - **Record Graph**: append-only store that hands out sequential `#id`s
//! - **Attribute Values**: sum type over the STEP literal kinds
//! - **Encoding**: reals, escaped strings, nested lists
//! - **GlobalIds**: 128-bit uuid to 22-character `IfcGloballyUniqueId`
//!
//! ## Quick Start
//!
//! ```rust
//! use ifc_writer_core::{AttributeValue, RecordGraph};
//!
//! let mut graph = RecordGraph::new();
//! let origin = graph.create("IFCCARTESIANPOINT", [AttributeValue::reals(&[0.0, 0.0, 0.0])]);
//! graph.create(
//!     "IFCAXIS2PLACEMENT3D",
//!     [origin.into(), AttributeValue::Null, AttributeValue::Null],
//! );
//!
//! assert!(graph.validate().is_ok());
//! assert_eq!(
//!     graph.serialize(),
//!     "#1=IFCCARTESIANPOINT((0.,0.,0.));\n#2=IFCAXIS2PLACEMENT3D(#1,$,$);\n"
//! );
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for records

pub mod encode;
pub mod error;
pub mod graph;
pub mod guid;
pub mod record;

pub use encode::{escape_string, format_real};
pub use error::{Error, Result};
pub use graph::RecordGraph;
pub use guid::{compress, expand, RandomUuids, SequentialUuids, UuidSource};
pub use record::{AttributeValue, Attributes, Record, RecordId};
