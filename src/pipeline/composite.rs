//! Template compositing: paste glyphs onto the template at table positions.
//!
//! Each glyph is centred on its table entry: the top-left corner goes to
//! `center − size / 2` (floor division) and the glyph is alpha-blended over
//! the canvas. Glyphs whose index has no table entry are skipped and
//! reported, never fatal. Glyphs may hang off the canvas edge; the
//! overlapping part is drawn.

use crate::error::SkipReason;
use crate::output::CompositionReport;
use crate::pipeline::isolate::GlyphImage;
use crate::placement::PlacementTable;
use image::{imageops, RgbaImage};
use tracing::debug;

/// Top-left corner that centres a `width x height` glyph on `center`.
pub fn placement_origin(center: (i32, i32), width: u32, height: u32) -> (i64, i64) {
    (
        center.0 as i64 - (width / 2) as i64,
        center.1 as i64 - (height / 2) as i64,
    )
}

/// Places glyphs according to a [`PlacementTable`].
#[derive(Debug, Clone, Copy)]
pub struct GlyphCompositor<'a> {
    table: &'a PlacementTable,
}

impl<'a> GlyphCompositor<'a> {
    pub fn new(table: &'a PlacementTable) -> Self {
        Self { table }
    }

    /// Composite `glyphs` onto a fresh copy of `template`.
    pub fn compose(&self, template: &RgbaImage, glyphs: &[GlyphImage]) -> CompositionReport {
        let mut canvas = template.clone();
        let mut placed = Vec::with_capacity(glyphs.len());
        let mut skipped = Vec::new();

        for glyph in glyphs {
            let Some(center) = self.table.get(glyph.index) else {
                debug!("Glyph {} has no placement entry; skipping", glyph.index);
                skipped.push(SkipReason::MissingPlacement { index: glyph.index });
                continue;
            };
            let (x, y) = placement_origin(center, glyph.width(), glyph.height());
            imageops::overlay(&mut canvas, &glyph.image, x, y);
            placed.push(glyph.index);
        }

        debug!(
            "Composited {} glyphs onto {}x{} template ({} without placement)",
            placed.len(),
            canvas.width(),
            canvas.height(),
            skipped.len()
        );
        CompositionReport {
            canvas,
            placed,
            skipped,
        }
    }
}
