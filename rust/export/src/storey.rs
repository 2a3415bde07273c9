// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storey assignment by elevation

use crate::context::ExportContext;
use crate::project::StoreyRecord;
use ifc_writer_core::{AttributeValue, RecordId};

/// Elevation tolerance in millimetres
pub const ELEVATION_TOLERANCE: f64 = 1e-6;

/// Index of the storey containing `elevation`.
///
/// Picks the highest storey whose elevation is at or below `elevation`;
/// anything below the lowest storey goes to the lowest one. A storey up to
/// `ELEVATION_TOLERANCE` above the element is taken only when no storey
/// lies within tolerance below it. `storeys` must be sorted by elevation
/// and non-empty.
pub fn select_storey(storeys: &[StoreyRecord], elevation: f64) -> usize {
    let below = storeys
        .iter()
        .rposition(|storey| storey.elevation <= elevation);
    if let Some(index) = below {
        if elevation - storeys[index].elevation <= ELEVATION_TOLERANCE {
            return index;
        }
    }

    let above = below.map_or(0, |index| index + 1);
    match storeys.get(above) {
        Some(storey) if storey.elevation - elevation <= ELEVATION_TOLERANCE => above,
        _ => below.unwrap_or(0),
    }
}

/// Contain an element in the storey matching its representative elevation.
///
/// Returns the `IFCRELCONTAINEDINSPATIALSTRUCTURE` id.
pub fn assign_to_storey(ctx: &mut ExportContext, element: RecordId, elevation: f64) -> RecordId {
    let index = select_storey(&ctx.project.storeys, elevation);
    let storey = ctx.project.storeys[index].id;

    let global_id = ctx.global_id();
    let owner_history = ctx.owner_history();
    ctx.graph.create(
        "IFCRELCONTAINEDINSPATIALSTRUCTURE",
        [
            global_id,
            owner_history,
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::references([element]),
            storey.into(),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storeys(elevations: &[f64]) -> Vec<StoreyRecord> {
        elevations
            .iter()
            .enumerate()
            .map(|(i, &elevation)| StoreyRecord {
                id: RecordId(i as u32 + 1),
                placement: RecordId(100 + i as u32),
                name: format!("Level {}", i),
                elevation,
            })
            .collect()
    }

    #[test]
    fn test_exactly_on_storey() {
        let levels = storeys(&[0.0, 3000.0, 6000.0]);
        assert_eq!(select_storey(&levels, 3000.0), 1);
        assert_eq!(select_storey(&levels, 6000.0), 2);
        // Within tolerance counts as on the level
        assert_eq!(select_storey(&levels, 3000.0 - 1e-7), 1);
    }

    #[test]
    fn test_storey_just_above_does_not_win() {
        let levels = storeys(&[0.0, 3000.0, 3000.0000001]);
        assert_eq!(select_storey(&levels, 3000.0), 1);
        assert_eq!(select_storey(&levels, 3000.00000005), 1);
        assert_eq!(select_storey(&levels, 3000.0000001), 2);

        // Nothing on the level below: snap up to the close storey
        let levels = storeys(&[0.0, 3000.0]);
        assert_eq!(select_storey(&levels, 3000.0 - 5e-7), 1);
        assert_eq!(select_storey(&levels, -5e-7), 0);
    }

    #[test]
    fn test_between_storeys() {
        let levels = storeys(&[0.0, 3000.0, 6000.0]);
        assert_eq!(select_storey(&levels, 2999.0), 0);
        assert_eq!(select_storey(&levels, 4500.0), 1);
        assert_eq!(select_storey(&levels, 90000.0), 2);
    }

    #[test]
    fn test_below_all_storeys() {
        let levels = storeys(&[0.0, 3000.0]);
        assert_eq!(select_storey(&levels, -12000.0), 0);

        let basement = storeys(&[-3500.0, 0.0]);
        assert_eq!(select_storey(&basement, -9000.0), 0);
        assert_eq!(select_storey(&basement, -1.0), 0);
    }

    #[test]
    fn test_single_storey() {
        let levels = storeys(&[4000.0]);
        assert_eq!(select_storey(&levels, 0.0), 0);
        assert_eq!(select_storey(&levels, 8000.0), 0);
    }
}
