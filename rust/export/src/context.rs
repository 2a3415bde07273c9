// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-export writer state
//!
//! One context per export call: its own record graph, id counter, uuid
//! source and caches. Nothing is shared between exports.

use crate::model::Storey;
use crate::options::ExportOptions;
use crate::profile::GeometricProfile;
use crate::project::{self, ProjectRecords};
use chrono::{DateTime, Utc};
use ifc_writer_core::{AttributeValue, RecordGraph, RecordId, UuidSource};
use rustc_hash::FxHashMap;

/// Writer state threaded through every builder
pub struct ExportContext {
    pub graph: RecordGraph,
    pub project: ProjectRecords,
    pub timestamp: DateTime<Utc>,
    uuids: Box<dyn UuidSource>,
    profiles: FxHashMap<String, GeometricProfile>,
    materials: FxHashMap<String, RecordId>,
}

impl ExportContext {
    /// Create a context and write the project structure into it
    pub fn new(
        storeys: &[Storey],
        options: &ExportOptions,
        mut uuids: Box<dyn UuidSource>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut graph = RecordGraph::with_capacity(256);
        let project = project::setup(&mut graph, uuids.as_mut(), storeys, options, &timestamp);

        Self {
            graph,
            project,
            timestamp,
            uuids,
            profiles: FxHashMap::default(),
            materials: FxHashMap::default(),
        }
    }

    /// Fresh GlobalId attribute
    pub fn global_id(&mut self) -> AttributeValue {
        AttributeValue::String(self.uuids.next_global_id())
    }

    #[inline]
    pub fn owner_history(&self) -> AttributeValue {
        AttributeValue::Reference(self.project.owner_history)
    }

    /// Previously created parametric profile with the same description
    pub fn cached_profile(&self, key: &str) -> Option<&GeometricProfile> {
        self.profiles.get(key)
    }

    pub fn cache_profile(&mut self, key: String, profile: GeometricProfile) {
        self.profiles.insert(key, profile);
    }

    /// Number of distinct parametric profiles written
    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    /// `IFCMATERIAL` for a name, created on first use
    pub fn material(&mut self, name: &str) -> RecordId {
        if let Some(&id) = self.materials.get(name) {
            return id;
        }
        let id = self.graph.create(
            "IFCMATERIAL",
            [name.into(), AttributeValue::Null, AttributeValue::Null],
        );
        self.materials.insert(name.to_string(), id);
        id
    }
}

impl std::fmt::Debug for ExportContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportContext")
            .field("records", &self.graph.len())
            .field("timestamp", &self.timestamp)
            .field("profiles", &self.profiles.len())
            .field("materials", &self.materials.len())
            .finish()
    }
}
