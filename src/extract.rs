//! Top-level entry points.
//!
//! ## Why split in-memory and file-based entry points?
//!
//! [`extract_glyphs`] is the pure core: it takes a decoded page and returns
//! glyph images without touching the filesystem, which keeps it trivially
//! testable on synthetic pages. [`process`] and [`process_to_file`] wrap it
//! with the loading and saving a command-line run needs. Intermediate images
//! are never written here; attach an [`crate::artifacts::ArtifactWriter`]
//! observer for that.

use crate::config::ExtractionConfig;
use crate::error::{GlyphGridError, SkipReason};
use crate::output::{CompositionReport, ExtractionOutput, ExtractionStats, ProcessSummary};
use crate::pipeline::assign::CellAssigner;
use crate::pipeline::composite::GlyphCompositor;
use crate::pipeline::grid::GridModel;
use crate::pipeline::isolate::GlyphIsolator;
use crate::pipeline::{contours, edges, input, merge};
use crate::placement::PlacementTable;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract one transparent glyph image per occupied grid cell.
///
/// # Returns
/// `Ok(ExtractionOutput)` even when cells are blank or shapes are skipped
/// (see `output.skipped`).
///
/// # Errors
/// Only [`GlyphGridError::GridTooSmall`], when the padded page cannot hold
/// the configured grid.
pub fn extract_glyphs(
    image: &DynamicImage,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, GlyphGridError> {
    let start = Instant::now();
    let (width, height) = (image.width(), image.height());
    let observer = config.observer.as_deref();
    info!(
        "Extracting {}x{} grid from {}x{} page",
        config.rows, config.cols, width, height
    );

    // ── Step 1: Grid geometry ────────────────────────────────────────────
    // Checked first so a page that cannot hold the grid fails before any work.
    let grid = GridModel::from_config(width, height, config)?;
    debug!(
        "Cells are {}x{} px inside {:?}",
        grid.cell_width(),
        grid.cell_height(),
        grid.interior()
    );

    // ── Step 2: Edges ────────────────────────────────────────────────────
    let gray = edges::to_luminance(image);
    let edge_map = edges::detect_edges(&gray, config.canny_low, config.canny_high);
    if let Some(o) = observer {
        o.on_edges(&edge_map);
    }

    // ── Step 3: Contours ─────────────────────────────────────────────────
    let traced = contours::extract_contours(&edge_map);
    let contour_count = traced.len();
    if let Some(o) = observer {
        o.on_contours(image, &traced);
    }

    // ── Step 4: Assignment ───────────────────────────────────────────────
    let assignment = CellAssigner::from_config(config).assign(traced, &grid);
    if let Some(o) = observer {
        o.on_assignment(&grid, &assignment);
    }
    let mut skipped: Vec<SkipReason> = assignment
        .rejected()
        .iter()
        .map(|r| r.reason())
        .collect();

    // ── Step 5: Merge ────────────────────────────────────────────────────
    let merged = merge::merge_fragments(&assignment);
    if let Some(o) = observer {
        o.on_merged(image, &merged.shapes);
    }

    // ── Step 6: Isolate ──────────────────────────────────────────────────
    let rgb = image.to_rgb8();
    let (glyphs, isolate_skipped) =
        GlyphIsolator::from_config(config).isolate_all(&rgb, &merged.shapes);
    if let Some(o) = observer {
        for glyph in &glyphs {
            o.on_glyph(glyph);
        }
    }

    skipped.extend(merged.skipped);
    skipped.extend(isolate_skipped);

    let degenerate_shapes = skipped
        .iter()
        .filter(|s| matches!(s, SkipReason::DegenerateGeometry { .. }))
        .count();
    let stats = ExtractionStats {
        image_width: width,
        image_height: height,
        contours: contour_count,
        assigned_contours: assignment.assigned_count(),
        rejected_contours: assignment.rejected().len(),
        occupied_cells: assignment.occupied_count(),
        empty_cells: assignment.empty_cells().count(),
        degenerate_shapes,
        glyphs: glyphs.len(),
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Extracted {} glyphs from {} contours ({} empty cells) in {}ms",
        stats.glyphs, stats.contours, stats.empty_cells, stats.duration_ms
    );

    Ok(ExtractionOutput {
        grid,
        glyphs,
        skipped,
        stats,
    })
}

/// Load the page at `path` and extract its glyphs.
///
/// A missing or undecodable file aborts before any processing.
pub fn process(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, GlyphGridError> {
    let image = input::load_image(path)?;
    extract_glyphs(&image, config)
}

/// Composite extracted glyphs onto a fresh copy of `template`.
pub fn compose(
    template: &RgbaImage,
    output: &ExtractionOutput,
    table: &PlacementTable,
    config: &ExtractionConfig,
) -> CompositionReport {
    let report = GlyphCompositor::new(table).compose(template, &output.glyphs);
    for reason in &report.skipped {
        warn!("{}", reason);
    }
    if let Some(o) = config.observer.as_deref() {
        o.on_composed(&report.canvas);
    }
    report
}

/// Run the whole pipeline from files and write the composited page.
pub fn process_to_file(
    input_path: impl AsRef<Path>,
    template_path: impl AsRef<Path>,
    table: &PlacementTable,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ProcessSummary, GlyphGridError> {
    let template = input::load_template(template_path)?;
    let output = process(input_path, config)?;
    let report = compose(&template, &output, table, config);
    let path = output_path.as_ref();
    write_image_atomic(&report.canvas, path)?;

    Ok(ProcessSummary {
        output_path: path.to_path_buf(),
        placed_glyphs: report.placed.len(),
        unplaced_glyphs: report.skipped.len(),
        stats: output.stats,
    })
}

/// Save `canvas` at `path`, encoding by extension (`.png`, `.jpg`,
/// `.jpeg`) and creating parent directories. JPEG drops the alpha channel.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
///
/// # Errors
/// [`GlyphGridError::InvalidConfig`] for any other extension, before anything
/// is written.
pub fn write_image_atomic(
    canvas: &RgbaImage,
    path: impl AsRef<Path>,
) -> Result<(), GlyphGridError> {
    let path = path.as_ref();
    let format = match ImageFormat::from_path(path) {
        Ok(f @ (ImageFormat::Png | ImageFormat::Jpeg)) => f,
        _ => {
            return Err(GlyphGridError::InvalidConfig(format!(
                "Unsupported output format for '{}': use .png, .jpg or .jpeg",
                path.display()
            )))
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GlyphGridError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let saved = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(canvas.clone())
            .to_rgb8()
            .save_with_format(&tmp_path, format),
        _ => canvas.save_with_format(&tmp_path, format),
    };
    if let Err(e) = saved {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(GlyphGridError::ImageWriteFailed {
            path: path.to_path_buf(),
            source: e,
        });
    }

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(GlyphGridError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        });
    }
    info!("Wrote {}", path.display());
    Ok(())
}
