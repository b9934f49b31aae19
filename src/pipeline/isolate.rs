//! Glyph isolation: crop, invert, border and make the background transparent.
//!
//! For each merged shape, in row-major cell order:
//!
//! 1. crop the colour source to the shape's bounding box
//! 2. invert tone (optional, on by default)
//! 3. surround with a uniform border in `border_color`
//! 4. compute alpha per pixel as `255 − mean(R, G, B)`, truncated
//! 5. force every alpha below `threshold` to 0
//!
//! Dark pixels end up opaque and light pixels transparent. The hard cutoff in
//! step 5 removes faint halos at the cost of clipping very faint ink.

use crate::config::ExtractionConfig;
use crate::error::SkipReason;
use crate::pipeline::contours::BoundingBox;
use crate::pipeline::grid::CellId;
use crate::pipeline::merge::MergedShape;
use image::{imageops, Rgb, RgbImage, Rgba, RgbaImage};
use tracing::{debug, warn};

/// A cropped, bordered, background-transparent glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphImage {
    /// 0-based position among produced glyphs, in row-major cell order.
    pub index: usize,
    pub cell: CellId,
    /// Crop rectangle in source coordinates (before the border).
    pub bbox: BoundingBox,
    pub image: RgbaImage,
}

impl GlyphImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Artifact file name, `letter_{index}.png`.
    pub fn file_name(&self) -> String {
        format!("letter_{}.png", self.index)
    }
}

/// Alpha for one pixel: `255 − mean(r, g, b)` truncated toward zero, or 0
/// when that value is below `threshold`.
pub fn transparency(rgb: [u8; 3], threshold: u8) -> u8 {
    let sum = rgb[0] as u32 + rgb[1] as u32 + rgb[2] as u32;
    // floor(255 - sum/3) == floor((765 - sum) / 3)
    let alpha = ((765 - sum) / 3) as u8;
    if alpha < threshold {
        0
    } else {
        alpha
    }
}

/// Attach an alpha channel computed with [`transparency`].
pub fn apply_transparency(image: &RgbImage, threshold: u8) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgb([r, g, b]) = *image.get_pixel(x, y);
        Rgba([r, g, b, transparency([r, g, b], threshold)])
    })
}

/// Pad `image` with `width` pixels of `color` on every side.
pub fn add_border(image: &RgbImage, width: u32, color: Rgb<u8>) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(
        image.width() + 2 * width,
        image.height() + 2 * width,
        color,
    );
    imageops::replace(&mut canvas, image, width as i64, width as i64);
    canvas
}

/// Turns merged shapes into [`GlyphImage`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphIsolator {
    border_width: u32,
    border_color: Rgb<u8>,
    threshold: u8,
    invert: bool,
}

impl GlyphIsolator {
    pub fn new(border_width: u32, border_color: [u8; 3], threshold: u8, invert: bool) -> Self {
        Self {
            border_width,
            border_color: Rgb(border_color),
            threshold,
            invert,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(
            config.border_width,
            config.border_color,
            config.transparency_threshold,
            config.invert,
        )
    }

    /// Isolate one shape. Returns `None` when the box, clipped to the source,
    /// has no area.
    pub fn isolate(
        &self,
        source: &RgbImage,
        shape: &MergedShape,
        index: usize,
    ) -> Option<GlyphImage> {
        let clip = shape.bbox.clip_to(source.width(), source.height());
        if clip.is_degenerate() {
            return None;
        }

        let mut crop =
            imageops::crop_imm(source, clip.x as u32, clip.y as u32, clip.width, clip.height)
                .to_image();
        if self.invert {
            imageops::invert(&mut crop);
        }
        let bordered = add_border(&crop, self.border_width, self.border_color);
        let image = apply_transparency(&bordered, self.threshold);

        debug!(
            "Glyph {} from cell ({}, {}): {}x{} px",
            index,
            shape.cell.row,
            shape.cell.col,
            image.width(),
            image.height()
        );
        Some(GlyphImage {
            index,
            cell: shape.cell,
            bbox: clip,
            image,
        })
    }

    /// Isolate every shape in order. Indices are dense over produced glyphs.
    pub fn isolate_all(
        &self,
        source: &RgbImage,
        shapes: &[MergedShape],
    ) -> (Vec<GlyphImage>, Vec<SkipReason>) {
        let mut glyphs = Vec::with_capacity(shapes.len());
        let mut skipped = Vec::new();
        for shape in shapes {
            match self.isolate(source, shape, glyphs.len()) {
                Some(glyph) => glyphs.push(glyph),
                None => {
                    warn!(
                        "Cell ({}, {}) lies outside the {}x{} source; skipping",
                        shape.cell.row,
                        shape.cell.col,
                        source.width(),
                        source.height()
                    );
                    skipped.push(SkipReason::DegenerateGeometry {
                        row: shape.cell.row,
                        col: shape.cell.col,
                        width: shape.bbox.width,
                        height: shape.bbox.height,
                    });
                }
            }
        }
        (glyphs, skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(row: usize, col: usize, bbox: BoundingBox) -> MergedShape {
        MergedShape {
            cell: CellId::new(row, col),
            bbox,
            fragments: 1,
        }
    }

    #[test]
    fn transparency_at_threshold_is_kept() {
        // mean 55 → 200, exactly at the threshold.
        assert_eq!(transparency([55, 55, 55], 200), 200);
    }

    #[test]
    fn transparency_just_below_threshold_is_cut() {
        // mean 56 → 199.
        assert_eq!(transparency([56, 56, 56], 200), 0);
    }

    #[test]
    fn transparency_extremes() {
        assert_eq!(transparency([0, 0, 0], 200), 255);
        assert_eq!(transparency([255, 255, 255], 200), 0);
        assert_eq!(transparency([255, 255, 255], 0), 0);
        assert_eq!(transparency([200, 200, 200], 0), 55);
    }

    #[test]
    fn transparency_truncates_fractional_mean() {
        // mean = 100.33…, 255 − mean = 154.67 → 154
        assert_eq!(transparency([100, 100, 101], 0), 154);
    }

    #[test]
    fn border_surrounds_content() {
        let img = RgbImage::from_pixel(3, 2, Rgb([0, 0, 0]));
        let b = add_border(&img, 4, Rgb([255, 255, 255]));
        assert_eq!(b.dimensions(), (11, 10));
        assert_eq!(*b.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*b.get_pixel(4, 4), Rgb([0, 0, 0]));
        assert_eq!(*b.get_pixel(7, 4), Rgb([255, 255, 255]));
    }

    #[test]
    fn isolate_without_inversion_makes_ink_opaque() {
        let mut src = RgbImage::from_pixel(50, 50, Rgb([255, 255, 255]));
        for y in 10..20 {
            for x in 10..20 {
                src.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        let iso = GlyphIsolator::new(5, [255, 255, 255], 200, false);
        let g = iso
            .isolate(&src, &shape(0, 0, BoundingBox::new(8, 8, 14, 14)), 0)
            .unwrap();
        assert_eq!((g.width(), g.height()), (24, 24));
        // Border and paper: transparent. Ink: opaque.
        assert_eq!(g.image.get_pixel(0, 0).0[3], 0);
        assert_eq!(g.image.get_pixel(6, 6).0[3], 0);
        assert_eq!(g.image.get_pixel(10, 10).0[3], 255);
    }

    #[test]
    fn isolate_with_inversion_flips_polarity() {
        let mut src = RgbImage::from_pixel(50, 50, Rgb([255, 255, 255]));
        src.put_pixel(20, 20, Rgb([0, 0, 0]));
        let iso = GlyphIsolator::new(2, [255, 255, 255], 200, true);
        let g = iso
            .isolate(&src, &shape(0, 0, BoundingBox::new(19, 19, 3, 3)), 0)
            .unwrap();
        // Inverted paper is black → opaque; inverted ink is white → clear.
        assert_eq!(*g.image.get_pixel(2, 2), Rgba([0, 0, 0, 255]));
        assert_eq!(g.image.get_pixel(3, 3).0[3], 0);
        // The border keeps its own colour and is never inverted.
        assert_eq!(*g.image.get_pixel(0, 0), Rgba([255, 255, 255, 0]));
    }

    #[test]
    fn isolate_all_indexes_densely_and_skips_out_of_bounds() {
        let src = RgbImage::from_pixel(40, 40, Rgb([255, 255, 255]));
        let shapes = [
            shape(0, 0, BoundingBox::new(1, 1, 5, 5)),
            shape(0, 1, BoundingBox::new(100, 100, 5, 5)),
            shape(1, 0, BoundingBox::new(20, 20, 5, 5)),
        ];
        let iso = GlyphIsolator::new(1, [255, 255, 255], 200, true);
        let (glyphs, skipped) = iso.isolate_all(&src, &shapes);
        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[0].index, 0);
        assert_eq!(glyphs[1].index, 1);
        assert_eq!(glyphs[1].cell, CellId::new(1, 0));
        assert_eq!(skipped.len(), 1);
        assert!(matches!(skipped[0], SkipReason::DegenerateGeometry { row: 0, col: 1, .. }));
    }

    #[test]
    fn file_name_uses_index() {
        let g = GlyphImage {
            index: 12,
            cell: CellId::new(1, 3),
            bbox: BoundingBox::new(0, 0, 1, 1),
            image: RgbaImage::new(1, 1),
        };
        assert_eq!(g.file_name(), "letter_12.png");
    }
}
