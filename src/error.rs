//! Error types for the glyphgrid library.
//!
//! Two distinct types reflect two distinct outcomes:
//!
//! * [`GlyphGridError`] is **fatal**: the run cannot proceed at all (the
//!   source image does not decode, the grid does not fit the page, an
//!   output file cannot be written). Returned as `Err(GlyphGridError)` from
//!   the top-level entry points. No partial output is produced.
//!
//! * [`SkipReason`] is **non-fatal**: one cell, contour or glyph slot was
//!   skipped (blank cell, zero-area box, no placement entry) while the rest
//!   of the page is fine. Collected in [`crate::output::ExtractionOutput`]
//!   and [`crate::output::CompositionReport`] so callers can audit them.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the glyphgrid library.
#[derive(Debug, Error)]
pub enum GlyphGridError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Source image was not found at the given path.
    #[error("Image not found: '{path}'\nCheck the path exists and is readable.")]
    ImageNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be decoded as an image.
    #[error("Cannot decode image '{path}': {detail}")]
    UnreadableInput { path: PathBuf, detail: String },

    /// The template canvas could not be opened or decoded.
    #[error("Cannot load template '{path}': {detail}")]
    TemplateUnreadable { path: PathBuf, detail: String },

    // ── Placement table errors ────────────────────────────────────────────
    /// The placement table file could not be read.
    #[error("Cannot read placement table '{path}': {source}")]
    PlacementTableUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The placement table is not valid JSON or has a malformed key.
    #[error("Invalid placement table: {0}")]
    InvalidPlacementTable(String),

    // ── Geometry errors ───────────────────────────────────────────────────
    /// The padded interior is too small to give every cell at least one pixel.
    #[error(
        "Grid {rows}x{cols} does not fit a {width}x{height} page after padding \
         (cell size would be {cell_width}x{cell_height})"
    )]
    GridTooSmall {
        width: u32,
        height: u32,
        rows: usize,
        cols: usize,
        cell_width: i64,
        cell_height: i64,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create a directory or move a file into place.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image encoder failed while saving a PNG.
    #[error("Failed to encode image '{path}': {source}")]
    ImageWriteFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal reason a cell, contour or glyph slot was skipped.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum SkipReason {
    /// No contour was assigned to the cell; its glyph slot stays empty.
    #[error("Cell ({row}, {col}): no ink found")]
    EmptyCell { row: usize, col: usize },

    /// The merged bounding box has zero width or height and cannot be cropped.
    #[error("Cell ({row}, {col}): degenerate {width}x{height} bounding box")]
    DegenerateGeometry {
        row: usize,
        col: usize,
        width: u32,
        height: u32,
    },

    /// The placement table has no entry for this glyph index.
    #[error("Glyph {index}: no placement entry")]
    MissingPlacement { index: usize },

    /// A contour was farther than `max_assign_distance` from every cell center.
    #[error("Contour rejected: {distance:.1}px from nearest cell ({row}, {col})")]
    DistanceRejected { distance: f64, row: usize, col: usize },
}
