//! Cell assignment: give every contour to the grid cell nearest its center.
//!
//! Ownership of a contour is decided by the center of its bounding box: the
//! cell whose center point is closest (Euclidean) wins, ties going to the
//! first cell in row-major order. By default there is no distance cap, so a
//! stray mark far from any cell is still absorbed by the globally nearest
//! one and every detected mark is accounted for. Setting
//! [`CellAssigner::with_max_distance`] turns such marks into
//! [`RejectedContour`]s instead.
//!
//! Cost is O(contours × cells), which is tens × ~90 for one sheet.

use crate::config::ExtractionConfig;
use crate::error::SkipReason;
use crate::pipeline::contours::Contour;
use crate::pipeline::grid::{CellId, GridModel};
use tracing::debug;

/// A contour that was farther than the distance cap from every cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedContour {
    pub contour: Contour,
    pub nearest: CellId,
    pub distance: f64,
}

impl RejectedContour {
    pub fn reason(&self) -> SkipReason {
        SkipReason::DistanceRejected {
            distance: self.distance,
            row: self.nearest.row,
            col: self.nearest.col,
        }
    }
}

/// Per-cell contour lists, indexed in the grid's row-major order.
///
/// Lists are filled during assignment and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CellAssignment {
    cells: Vec<CellId>,
    buckets: Vec<Vec<Contour>>,
    rejected: Vec<RejectedContour>,
}

impl CellAssignment {
    /// Every cell with its assigned contours, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &[Contour])> + '_ {
        self.cells
            .iter()
            .copied()
            .zip(self.buckets.iter().map(Vec::as_slice))
    }

    /// Contours assigned to `id`; empty for unknown or blank cells.
    pub fn contours_for(&self, id: CellId) -> &[Contour] {
        self.cells
            .iter()
            .position(|c| *c == id)
            .map(|i| self.buckets[i].as_slice())
            .unwrap_or(&[])
    }

    /// Number of contours placed in some cell.
    pub fn assigned_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn rejected(&self) -> &[RejectedContour] {
        &self.rejected
    }

    /// Cells holding at least one contour.
    pub fn occupied_count(&self) -> usize {
        self.buckets.iter().filter(|b| !b.is_empty()).count()
    }

    /// Cells holding no contour, in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.iter()
            .filter(|(_, contours)| contours.is_empty())
            .map(|(id, _)| id)
    }
}

/// Nearest-center contour distributor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellAssigner {
    max_distance: Option<f64>,
}

impl CellAssigner {
    /// Assigner without a distance cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject contours whose center is farther than `px` from every cell center.
    pub fn with_max_distance(px: f64) -> Self {
        Self {
            max_distance: Some(px),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            max_distance: config.max_assign_distance,
        }
    }

    /// Distribute `contours` over the cells of `grid`, preserving input order
    /// within each cell.
    pub fn assign(&self, contours: Vec<Contour>, grid: &GridModel) -> CellAssignment {
        let cells: Vec<CellId> = grid.cells().iter().map(|c| c.id).collect();
        let mut buckets: Vec<Vec<Contour>> = vec![Vec::new(); cells.len()];
        let mut rejected = Vec::new();

        for contour in contours {
            let center = contour.bounding_box().center();
            let Some((cell, distance)) = grid.nearest(center) else {
                continue;
            };
            if let Some(cap) = self.max_distance {
                if distance > cap {
                    debug!(
                        "Rejecting contour {} at {:?}: {:.1}px from cell ({}, {})",
                        contour.id(),
                        center,
                        distance,
                        cell.id.row,
                        cell.id.col
                    );
                    rejected.push(RejectedContour {
                        contour,
                        nearest: cell.id,
                        distance,
                    });
                    continue;
                }
            }
            // Cells and buckets share the grid's row-major indexing.
            let slot = cell.id.row * grid.cols() + cell.id.col;
            buckets[slot].push(contour);
        }

        let assignment = CellAssignment {
            cells,
            buckets,
            rejected,
        };
        debug!(
            "Assigned {} contours to {} cells ({} rejected)",
            assignment.assigned_count(),
            assignment.occupied_count(),
            assignment.rejected.len()
        );
        assignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Padding;
    use crate::pipeline::contours::Point;

    fn square(id: usize, x: i32, y: i32, size: i32) -> Contour {
        let points = vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ];
        Contour::new(id, points, false, None).unwrap()
    }

    fn grid() -> GridModel {
        // 3x4 cells of 100x100, centers at (50 + 100c, 50 + 100r).
        GridModel::new(400, 300, Padding::uniform(0), 3, 4).unwrap()
    }

    #[test]
    fn every_contour_lands_in_exactly_one_cell() {
        let contours = vec![
            square(0, 40, 40, 20),
            square(1, 240, 140, 20),
            square(2, 45, 45, 4),
            square(3, 390, 290, 5),
        ];
        let a = CellAssigner::new().assign(contours, &grid());
        assert_eq!(a.assigned_count(), 4);
        assert!(a.rejected().is_empty());
        assert_eq!(a.contours_for(CellId::new(0, 0)).len(), 2);
        assert_eq!(a.contours_for(CellId::new(1, 2)).len(), 1);
        assert_eq!(a.contours_for(CellId::new(2, 3)).len(), 1);
        assert_eq!(a.occupied_count(), 3);
        assert_eq!(a.empty_cells().count(), 12 - 3);
    }

    #[test]
    fn input_order_is_kept_within_a_cell() {
        let contours = vec![square(7, 40, 40, 20), square(3, 45, 45, 4)];
        let a = CellAssigner::new().assign(contours, &grid());
        let ids: Vec<usize> = a
            .contours_for(CellId::new(0, 0))
            .iter()
            .map(Contour::id)
            .collect();
        assert_eq!(ids, vec![7, 3]);
    }

    #[test]
    fn far_contour_is_absorbed_without_a_cap() {
        let a = CellAssigner::new().assign(vec![square(0, 5000, 5000, 10)], &grid());
        assert_eq!(a.assigned_count(), 1);
        assert_eq!(a.contours_for(CellId::new(2, 3)).len(), 1);
    }

    #[test]
    fn cap_rejects_far_contours_and_keeps_near_ones() {
        let contours = vec![square(0, 40, 40, 20), square(1, 5000, 5000, 10)];
        let a = CellAssigner::with_max_distance(60.0).assign(contours, &grid());
        assert_eq!(a.assigned_count(), 1);
        assert_eq!(a.rejected().len(), 1);
        assert_eq!(a.assigned_count() + a.rejected().len(), 2);

        let r = &a.rejected()[0];
        assert_eq!(r.nearest, CellId::new(2, 3));
        assert!(matches!(r.reason(), SkipReason::DistanceRejected { row: 2, col: 3, .. }));
    }

    #[test]
    fn iteration_is_row_major() {
        let a = CellAssigner::new().assign(Vec::new(), &grid());
        let ids: Vec<CellId> = a.iter().map(|(id, _)| id).collect();
        assert_eq!(ids.first(), Some(&CellId::new(0, 0)));
        assert_eq!(ids[4], CellId::new(1, 0));
        assert_eq!(ids.len(), 12);
    }
}
