// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! File Assembler - HEADER / DATA framing of the record graph

use crate::error::Result;
use crate::options::ExportOptions;
use crate::project::{APPLICATION_NAME, APPLICATION_VERSION};
use chrono::{DateTime, Utc};
use ifc_writer_core::{escape_string, RecordGraph};
use std::fmt::Write;

/// Schema identifier written to `FILE_SCHEMA`
pub const SCHEMA: &str = "IFC4";

/// Validate the graph and frame it as a complete STEP physical file
pub fn assemble(
    graph: &RecordGraph,
    options: &ExportOptions,
    timestamp: &DateTime<Utc>,
) -> Result<String> {
    graph.validate()?;

    let mut out = String::with_capacity(graph.len() * 64 + 512);
    write_header(&mut out, options, timestamp)?;
    out.push_str("DATA;\n");
    graph.write_to(&mut out)?;
    out.push_str("ENDSEC;\n");
    out.push_str("END-ISO-10303-21;\n");
    Ok(out)
}

fn write_header<W: Write>(
    out: &mut W,
    options: &ExportOptions,
    timestamp: &DateTime<Utc>,
) -> std::fmt::Result {
    let system = format!("{} {}", APPLICATION_NAME, APPLICATION_VERSION);

    writeln!(out, "ISO-10303-21;")?;
    writeln!(out, "HEADER;")?;
    writeln!(
        out,
        "FILE_DESCRIPTION(('{}'),'2;1');",
        escape_string(&options.description)
    )?;
    writeln!(
        out,
        "FILE_NAME('{}','{}',('{}'),('{}'),'{}','{}','');",
        escape_string(&options.file_name),
        timestamp.format("%Y-%m-%dT%H:%M:%S"),
        escape_string(&options.author),
        escape_string(&options.organization),
        escape_string(&system),
        escape_string(&system),
    )?;
    writeln!(out, "FILE_SCHEMA(('{}'));", SCHEMA)?;
    writeln!(out, "ENDSEC;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ifc_writer_core::{AttributeValue, RecordId};

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_framing() {
        let mut graph = RecordGraph::new();
        graph.create("IFCCARTESIANPOINT", [AttributeValue::reals(&[0.0, 0.0, 0.0])]);

        let options = ExportOptions {
            file_name: "bridge.ifc".into(),
            author: "O'Brien".into(),
            ..ExportOptions::default()
        };
        let text = assemble(&graph, &options, &timestamp()).unwrap();

        assert!(text.starts_with("ISO-10303-21;\nHEADER;\n"));
        assert!(text.contains("FILE_NAME('bridge.ifc','2024-05-17T09:30:00',('O''Brien'),"));
        assert!(text.contains("FILE_SCHEMA(('IFC4'));\nENDSEC;\nDATA;\n#1=IFCCARTESIANPOINT((0.,0.,0.));\nENDSEC;\n"));
        assert!(text.ends_with("END-ISO-10303-21;\n"));
    }

    #[test]
    fn test_graph_violation_is_fatal() {
        let mut graph = RecordGraph::new();
        graph.create("IFCLOCALPLACEMENT", [AttributeValue::Null, RecordId(3).into()]);

        let result = assemble(&graph, &ExportOptions::default(), &timestamp());
        assert!(matches!(result, Err(crate::error::Error::Graph(_))));
    }
}
