//! Observer hooks invoked after each pipeline stage.
//!
//! Inject an [`Arc<dyn PipelineObserver>`] via
//! [`crate::config::ExtractionConfigBuilder::observer`] to see intermediate
//! results as the page is processed: the edge map, the traced contours, the
//! per-cell assignment, the merged boxes, each glyph and the final canvas.
//!
//! The core never touches the filesystem itself. Writing debug images is
//! just one observer ([`crate::artifacts::ArtifactWriter`]); tests and other
//! hosts can plug in their own.
//!
//! # Example
//!
//! ```rust
//! use glyphgrid::{ExtractionConfig, GlyphImage, PipelineObserver};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct GlyphCounter(AtomicUsize);
//!
//! impl PipelineObserver for GlyphCounter {
//!     fn on_glyph(&self, _glyph: &GlyphImage) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .observer(Arc::new(GlyphCounter(AtomicUsize::new(0))) as Arc<dyn PipelineObserver>)
//!     .build()
//!     .unwrap();
//! ```

use crate::pipeline::assign::CellAssignment;
use crate::pipeline::contours::Contour;
use crate::pipeline::grid::GridModel;
use crate::pipeline::isolate::GlyphImage;
use crate::pipeline::merge::MergedShape;
use image::{DynamicImage, GrayImage, RgbaImage};
use std::sync::Arc;

/// Called by the pipeline after each stage completes.
///
/// All methods default to no-ops so implementors override only what they
/// need. Hooks are invoked synchronously, in stage order, on the thread that
/// runs the pipeline; `Send + Sync` lets a config holding an observer cross
/// threads.
pub trait PipelineObserver: Send + Sync {
    /// Binary edge map, same size as the source.
    fn on_edges(&self, edges: &GrayImage) {
        let _ = edges;
    }

    /// All traced contours, sorted by descending area.
    fn on_contours(&self, source: &DynamicImage, contours: &[Contour]) {
        let _ = (source, contours);
    }

    /// Per-cell contour lists.
    fn on_assignment(&self, grid: &GridModel, assignment: &CellAssignment) {
        let _ = (grid, assignment);
    }

    /// One merged box per occupied cell.
    fn on_merged(&self, source: &DynamicImage, shapes: &[MergedShape]) {
        let _ = (source, shapes);
    }

    /// Each finished glyph, in index order.
    fn on_glyph(&self, glyph: &GlyphImage) {
        let _ = glyph;
    }

    /// The composited template.
    fn on_composed(&self, canvas: &RgbaImage) {
        let _ = canvas;
    }
}

/// Observer that ignores every event. This is the default.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type SharedObserver = Arc<dyn PipelineObserver>;
