// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export options

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Header and project naming options.
///
/// Deserialized from JSON with camelCase keys. Unknown keys are ignored and
/// missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Name written to `FILE_NAME`
    pub file_name: String,
    /// Free text written to `FILE_DESCRIPTION`
    pub description: String,
    pub author: String,
    pub organization: String,
    pub project_name: String,
    pub site_name: String,
    pub building_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            file_name: "model.ifc".into(),
            description: "ViewDefinition [ReferenceView]".into(),
            author: String::new(),
            organization: String::new(),
            project_name: "Structural Model".into(),
            site_name: "Site".into(),
            building_name: "Building".into(),
        }
    }
}

impl ExportOptions {
    /// Parse options from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
