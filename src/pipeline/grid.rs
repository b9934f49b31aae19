//! Grid model: cell geometry derived from page size, padding and grid shape.
//!
//! The sheet is a fixed `rows x cols` grid inside padded margins. Cell size
//! uses floor division, so when the interior does not divide evenly the
//! leftover pixels collect along the right and bottom edges of the grid.
//!
//! ## Canonical order
//!
//! Cells are enumerated row-major: `(0,0), (0,1), …, (0,cols-1), (1,0), …`.
//! Every later stage walks cells in this order, which is what makes glyph
//! indices a pure function of `(row, col)` and cell occupancy.

use crate::config::{ExtractionConfig, Padding};
use crate::error::GlyphGridError;
use crate::pipeline::contours::BoundingBox;
use serde::{Deserialize, Serialize};

/// Grid coordinates of one cell. Orders row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellId {
    pub row: usize,
    pub col: usize,
}

impl CellId {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// One grid cell with its center point and nominal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub id: CellId,
    pub center: (i32, i32),
    pub width: u32,
    pub height: u32,
}

impl GridCell {
    /// Euclidean distance from the cell center to `point`.
    pub fn distance_to(&self, point: (i32, i32)) -> f64 {
        let dx = (point.0 - self.center.0) as f64;
        let dy = (point.1 - self.center.1) as f64;
        dx.hypot(dy)
    }

    /// The cell's nominal rectangle.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(
            self.center.0 - (self.width / 2) as i32,
            self.center.1 - (self.height / 2) as i32,
            self.width,
            self.height,
        )
    }
}

/// The full set of cells for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    page: (u32, u32),
    padding: Padding,
    rows: usize,
    cols: usize,
    cell_width: u32,
    cell_height: u32,
    cells: Vec<GridCell>,
}

impl GridModel {
    /// Compute cell geometry for a `width x height` page.
    ///
    /// # Errors
    /// [`GlyphGridError::GridTooSmall`] when the padded interior cannot give
    /// every cell at least one pixel in each direction.
    pub fn new(
        width: u32,
        height: u32,
        padding: Padding,
        rows: usize,
        cols: usize,
    ) -> Result<Self, GlyphGridError> {
        let interior_w = width as i64 - padding.left as i64 - padding.right as i64;
        let interior_h = height as i64 - padding.top as i64 - padding.bottom as i64;
        let cell_w = if cols == 0 { 0 } else { interior_w.div_euclid(cols as i64) };
        let cell_h = if rows == 0 { 0 } else { interior_h.div_euclid(rows as i64) };

        if cell_w < 1 || cell_h < 1 {
            return Err(GlyphGridError::GridTooSmall {
                width,
                height,
                rows,
                cols,
                cell_width: cell_w,
                cell_height: cell_h,
            });
        }

        let cell_width = cell_w as u32;
        let cell_height = cell_h as u32;
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let cx = padding.left + col as u32 * cell_width + cell_width / 2;
                let cy = padding.top + row as u32 * cell_height + cell_height / 2;
                cells.push(GridCell {
                    id: CellId::new(row, col),
                    center: (cx as i32, cy as i32),
                    width: cell_width,
                    height: cell_height,
                });
            }
        }

        Ok(Self {
            page: (width, height),
            padding,
            rows,
            cols,
            cell_width,
            cell_height,
            cells,
        })
    }

    /// Grid for a page of the given size using the config's padding and shape.
    pub fn from_config(
        width: u32,
        height: u32,
        config: &ExtractionConfig,
    ) -> Result<Self, GlyphGridError> {
        Self::new(width, height, config.padding, config.rows, config.cols)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> u32 {
        self.cell_height
    }

    pub fn page_size(&self) -> (u32, u32) {
        self.page
    }

    /// Row-major position of a cell, or `None` if it is outside the grid.
    pub fn index_of(&self, id: CellId) -> Option<usize> {
        (id.row < self.rows && id.col < self.cols).then(|| id.row * self.cols + id.col)
    }

    pub fn cell(&self, id: CellId) -> Option<&GridCell> {
        self.index_of(id).map(|i| &self.cells[i])
    }

    /// The padded interior rectangle (before floor-division residue is removed).
    pub fn interior(&self) -> BoundingBox {
        BoundingBox::new(
            self.padding.left as i32,
            self.padding.top as i32,
            self.page.0 - self.padding.left - self.padding.right,
            self.page.1 - self.padding.top - self.padding.bottom,
        )
    }

    /// The cell whose center is closest to `point`, with that distance.
    ///
    /// Ties go to the cell that comes first in row-major order.
    pub fn nearest(&self, point: (i32, i32)) -> Option<(&GridCell, f64)> {
        let mut best: Option<(&GridCell, f64)> = None;
        for cell in &self.cells {
            let d = cell.distance_to(point);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((cell, d)),
            }
        }
        best
    }
}
