//! Debug artifacts: an observer that saves intermediate stage images.
//!
//! Writes three files into its directory, each resized to a fixed canvas so
//! full-resolution scans stay easy to eyeball:
//!
//! | File | Contents |
//! |------|----------|
//! | `edges_resized.png` | binary edge map |
//! | `contours_resized.png` | every traced contour drawn in green over the source |
//! | `output_with_rectangles.png` | merged box of each occupied cell in green |
//!
//! Artifacts are diagnostics, so a failed write is logged and the run goes on.

use crate::observer::PipelineObserver;
use crate::pipeline::contours::Contour;
use crate::pipeline::merge::MergedShape;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImage, GrayImage, ImageBuffer, Pixel, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

/// Stroke width for contour and box overlays.
const STROKE: i32 = 2;

/// Saves intermediate stage images to a directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
    size: (u32, u32),
}

impl ArtifactWriter {
    /// Write into `dir` (created on first write), resizing to `size`.
    pub fn new(dir: impl Into<PathBuf>, size: (u32, u32)) -> Self {
        Self {
            dir: dir.into(),
            size: (size.0.max(1), size.1.max(1)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn save_resized<P>(&self, name: &str, image: &ImageBuffer<P, Vec<u8>>)
    where
        P: Pixel<Subpixel = u8> + image::PixelWithColorType + 'static,
    {
        let path = self.dir.join(name);
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!("Cannot create artifact dir {}: {}", self.dir.display(), e);
            return;
        }
        let resized = imageops::resize(image, self.size.0, self.size.1, FilterType::Triangle);
        match resized.save(&path) {
            Ok(()) => debug!("Wrote artifact {}", path.display()),
            Err(e) => warn!("Failed to write artifact {}: {}", path.display(), e),
        }
    }
}

/// Draw a closed polyline `STROKE` px wide.
fn draw_contour(canvas: &mut RgbImage, contour: &Contour) {
    let points = contour.points();
    if points.len() == 1 {
        let p = points[0];
        if p.x >= 0 && p.y >= 0 && (p.x as u32) < canvas.width() && (p.y as u32) < canvas.height() {
            canvas.put_pixel(p.x as u32, p.y as u32, GREEN);
        }
        return;
    }
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        for d in 0..STROKE {
            let o = d as f32;
            draw_line_segment_mut(
                canvas,
                (p.x as f32 + o, p.y as f32),
                (q.x as f32 + o, q.y as f32),
                GREEN,
            );
            draw_line_segment_mut(
                canvas,
                (p.x as f32, p.y as f32 + o),
                (q.x as f32, q.y as f32 + o),
                GREEN,
            );
        }
    }
}

/// Draw a rectangle outline `STROKE` px wide, growing inward.
fn draw_box<I>(canvas: &mut I, shape: &MergedShape)
where
    I: GenericImage<Pixel = Rgb<u8>>,
{
    for d in 0..STROKE {
        let w = shape.bbox.width as i32 - 2 * d;
        let h = shape.bbox.height as i32 - 2 * d;
        if w <= 0 || h <= 0 {
            break;
        }
        let rect = Rect::at(shape.bbox.x + d, shape.bbox.y + d).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(canvas, rect, GREEN);
    }
}

impl PipelineObserver for ArtifactWriter {
    fn on_edges(&self, edges: &GrayImage) {
        self.save_resized("edges_resized.png", edges);
    }

    fn on_contours(&self, source: &DynamicImage, contours: &[Contour]) {
        let mut canvas = source.to_rgb8();
        for contour in contours {
            draw_contour(&mut canvas, contour);
        }
        self.save_resized("contours_resized.png", &canvas);
    }

    fn on_merged(&self, source: &DynamicImage, shapes: &[MergedShape]) {
        let mut canvas = source.to_rgb8();
        for shape in shapes {
            draw_box(&mut canvas, shape);
        }
        self.save_resized("output_with_rectangles.png", &canvas);
    }
}
