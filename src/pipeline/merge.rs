//! Fragment merging: reunite all contours of a cell into one shape.
//!
//! A single hand-drawn glyph routinely traces as several contours: separate
//! strokes, the dot of an "i", the inner edge of a loop. After assignment they
//! all sit in the same cell, and the glyph we want is the bounding box of
//! their union. Since the bounding box of a union of point sets is the union
//! of their bounding boxes, merging never touches individual points.

use crate::error::SkipReason;
use crate::pipeline::assign::CellAssignment;
use crate::pipeline::contours::{BoundingBox, Contour};
use crate::pipeline::grid::CellId;
use tracing::debug;

/// The combined extent of every contour assigned to one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedShape {
    pub cell: CellId,
    pub bbox: BoundingBox,
    /// How many contours were merged into this shape.
    pub fragments: usize,
}

/// Result of merging a whole assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// One shape per non-empty cell, in row-major order.
    pub shapes: Vec<MergedShape>,
    /// Blank cells, in row-major order.
    pub skipped: Vec<SkipReason>,
}

/// Bounding box of the union of `contours`, or `None` if there are none.
pub fn merge_cell(contours: &[Contour]) -> Option<BoundingBox> {
    let (first, rest) = contours.split_first()?;
    Some(
        rest.iter()
            .fold(first.bounding_box(), |acc, c| acc.union(&c.bounding_box())),
    )
}

/// Merge every cell of `assignment`, walking cells in row-major order.
///
/// Every merged box is at least 1x1 (boxes are inclusive of their points),
/// so only blank cells are skipped here. Boxes that clip to nothing against
/// the page are caught in isolation.
pub fn merge_fragments(assignment: &CellAssignment) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for (cell, contours) in assignment.iter() {
        let Some(bbox) = merge_cell(contours) else {
            outcome.skipped.push(SkipReason::EmptyCell {
                row: cell.row,
                col: cell.col,
            });
            continue;
        };

        outcome.shapes.push(MergedShape {
            cell,
            bbox,
            fragments: contours.len(),
        });
    }

    debug!(
        "Merged into {} shapes ({} cells skipped)",
        outcome.shapes.len(),
        outcome.skipped.len()
    );
    outcome
}
