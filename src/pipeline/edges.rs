//! Edge detection: luminance image → binary edge map.
//!
//! Canny with hysteresis thresholds. Ink strokes on paper produce closed
//! rings of edge pixels around each stroke, which the contour tracer then
//! follows. The output has the same dimensions as the input; edge pixels are
//! 255, everything else 0.

use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;
use tracing::debug;

/// Convert any decoded image to single-channel luminance.
pub fn to_luminance(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Run Canny edge detection. `low` must not exceed `high`.
pub fn detect_edges(gray: &GrayImage, low: f32, high: f32) -> GrayImage {
    let edges = canny(gray, low, high);
    debug!(
        "Edge map {}x{}: {} edge pixels",
        edges.width(),
        edges.height(),
        edges.pixels().filter(|p| p.0[0] != 0).count()
    );
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    #[test]
    fn blank_page_has_no_edges() {
        let page = GrayImage::from_pixel(64, 48, Luma([255]));
        let edges = detect_edges(&page, 50.0, 150.0);
        assert_eq!(edges.dimensions(), (64, 48));
        assert!(edges.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn ink_blob_produces_binary_edges_around_it() {
        let mut page = GrayImage::from_pixel(80, 80, Luma([255]));
        draw_filled_rect_mut(&mut page, Rect::at(30, 30).of_size(20, 20), Luma([0]));
        let edges = detect_edges(&page, 50.0, 150.0);

        assert!(edges.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        let on: Vec<(u32, u32)> = edges
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] != 0)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!on.is_empty());
        // All edges hug the blob; none appear at the page border.
        assert!(on.iter().all(|&(x, y)| (25..=55).contains(&x) && (25..=55).contains(&y)));
    }

    #[test]
    fn luminance_keeps_dimensions() {
        let img = DynamicImage::new_rgb8(17, 9);
        assert_eq!(to_luminance(&img).dimensions(), (17, 9));
    }
}
