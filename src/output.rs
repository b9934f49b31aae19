//! Result types returned by the extraction entry points.

use crate::error::{GlyphGridError, SkipReason};
use crate::pipeline::grid::GridModel;
use crate::pipeline::isolate::GlyphImage;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything the core pipeline produced for one page.
#[derive(Debug, Clone)]
pub struct ExtractionOutput {
    /// Cell geometry used for the run.
    pub grid: GridModel,
    /// Glyphs in index order (row-major over occupied cells).
    pub glyphs: Vec<GlyphImage>,
    /// Blank cells, degenerate shapes and rejected contours.
    pub skipped: Vec<SkipReason>,
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    /// Write every glyph as `letter_{index}.png` into `dir`, creating it if
    /// needed. Returns the written paths in index order.
    pub fn save_glyphs(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, GlyphGridError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| GlyphGridError::OutputWriteFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut paths = Vec::with_capacity(self.glyphs.len());
        for glyph in &self.glyphs {
            let path = dir.join(glyph.file_name());
            glyph
                .image
                .save(&path)
                .map_err(|e| GlyphGridError::ImageWriteFailed {
                    path: path.clone(),
                    source: e,
                })?;
            paths.push(path);
        }
        debug!("Saved {} glyphs to {}", paths.len(), dir.display());
        Ok(paths)
    }
}

/// Counters for one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub image_width: u32,
    pub image_height: u32,
    /// Contours traced in the edge map.
    pub contours: usize,
    /// Contours placed into a cell.
    pub assigned_contours: usize,
    /// Contours dropped by the distance cap.
    pub rejected_contours: usize,
    /// Cells holding at least one contour.
    pub occupied_cells: usize,
    /// Cells holding none.
    pub empty_cells: usize,
    /// Shapes skipped for zero area.
    pub degenerate_shapes: usize,
    /// Glyph images produced.
    pub glyphs: usize,
    pub duration_ms: u64,
}

/// The composited canvas plus what went where.
#[derive(Debug, Clone)]
pub struct CompositionReport {
    pub canvas: RgbaImage,
    /// Glyph indices that were placed, in order.
    pub placed: Vec<usize>,
    /// Glyphs without a table entry.
    pub skipped: Vec<SkipReason>,
}

/// Summary of a full file-to-file run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub output_path: PathBuf,
    pub stats: ExtractionStats,
    pub placed_glyphs: usize,
    pub unplaced_glyphs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Padding;
    use crate::pipeline::contours::BoundingBox;
    use crate::pipeline::grid::CellId;
    use image::Rgba;

    fn output_with(n: usize) -> ExtractionOutput {
        let glyphs = (0..n)
            .map(|i| GlyphImage {
                index: i,
                cell: CellId::new(0, i),
                bbox: BoundingBox::new(0, 0, 2, 2),
                image: RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255])),
            })
            .collect();
        ExtractionOutput {
            grid: GridModel::new(100, 100, Padding::uniform(0), 1, 4).unwrap(),
            glyphs,
            skipped: Vec::new(),
            stats: ExtractionStats::default(),
        }
    }

    #[test]
    fn save_glyphs_writes_indexed_pngs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/glyphs");
        let paths = output_with(3).save_glyphs(&target).expect("save");
        assert_eq!(paths.len(), 3);
        assert!(target.join("letter_0.png").exists());
        assert!(target.join("letter_2.png").exists());

        let back = image::open(&paths[1]).unwrap().to_rgba8();
        assert_eq!(back.dimensions(), (3, 3));
    }

    #[test]
    fn stats_serialise_to_json() {
        let stats = ExtractionStats {
            contours: 12,
            glyphs: 3,
            ..Default::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"contours\":12"));
        assert!(json.contains("\"glyphs\":3"));
    }
}
