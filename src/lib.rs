//! # glyphgrid
//!
//! Cut hand-drawn glyphs out of a scanned grid sheet and place them onto a
//! template page.
//!
//! ## Why this crate?
//!
//! A glyph sheet is a page of evenly spaced boxes, one character drawn in
//! each. Slicing the page blindly by cell loses strokes that cross a cell
//! line and keeps paper texture as opaque pixels. Instead this crate finds the
//! actual ink through edge detection, groups every traced contour with the
//! cell it belongs to, and crops one tight, transparent image per glyph,
//! so the result composites cleanly onto any background.
//!
//! ## Pipeline Overview
//!
//! ```text
//! scanned page
//!  │
//!  ├─ 1. Edges     Canny edge map of the luminance
//!  ├─ 2. Contours  trace every outer and hole boundary, largest first
//!  ├─ 3. Grid      cell centers from page size, padding, rows x cols
//!  ├─ 4. Assign    each contour to the nearest cell center
//!  ├─ 5. Merge     one bounding box per occupied cell
//!  ├─ 6. Isolate   crop, invert, border, luminance-derived alpha
//!  └─ 7. Compose   place glyphs on a template by index
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glyphgrid::{compose, load_template, process, ExtractionConfig, PlacementTable};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let output = process("sheet.png", &config)?;
//!     output.save_glyphs("glyphs")?;
//!
//!     let template = load_template("template.png")?;
//!     let report = compose(&template, &output, PlacementTable::bundled(), &config);
//!     report.canvas.save("page.png")?;
//!     eprintln!("{} glyphs, {} placed", output.stats.glyphs, report.placed.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `glyphgrid` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! glyphgrid = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod artifacts;
pub mod config;
pub mod error;
pub mod extract;
pub mod observer;
pub mod output;
pub mod pipeline;
pub mod placement;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use artifacts::ArtifactWriter;
pub use config::{ExtractionConfig, ExtractionConfigBuilder, Padding};
pub use error::{GlyphGridError, SkipReason};
pub use extract::{compose, extract_glyphs, process, process_to_file, write_image_atomic};
pub use observer::{NoopObserver, PipelineObserver, SharedObserver};
pub use output::{CompositionReport, ExtractionOutput, ExtractionStats, ProcessSummary};
pub use pipeline::assign::CellAssignment;
pub use pipeline::contours::{BoundingBox, Contour};
pub use pipeline::grid::{CellId, GridModel};
pub use pipeline::input::{load_image, load_template};
pub use pipeline::isolate::GlyphImage;
pub use pipeline::merge::MergedShape;
pub use placement::PlacementTable;
