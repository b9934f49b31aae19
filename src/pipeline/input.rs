//! Input loading: decode the scanned sheet and the template canvas.
//!
//! A missing, unreadable or undecodable source aborts before any processing
//! starts, so no partial artifacts are ever produced. The format is guessed
//! from the file contents rather than the extension.

use crate::error::GlyphGridError;
use image::{DynamicImage, ImageReader, RgbaImage};
use std::path::Path;
use tracing::debug;

/// Map an open failure to the matching fatal error.
fn open_error(path: &Path, e: std::io::Error) -> GlyphGridError {
    match e.kind() {
        std::io::ErrorKind::NotFound => GlyphGridError::ImageNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => GlyphGridError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => GlyphGridError::UnreadableInput {
            path: path.to_path_buf(),
            detail: e.to_string(),
        },
    }
}

fn decode(path: &Path) -> Result<DynamicImage, GlyphGridError> {
    let reader = ImageReader::open(path)
        .map_err(|e| open_error(path, e))?
        .with_guessed_format()
        .map_err(|e| open_error(path, e))?;
    reader.decode().map_err(|e| GlyphGridError::UnreadableInput {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Load the scanned grid sheet.
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage, GlyphGridError> {
    let path = path.as_ref();
    let image = decode(path)?;
    debug!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );
    Ok(image)
}

/// Load the template canvas as RGBA.
pub fn load_template(path: impl AsRef<Path>) -> Result<RgbaImage, GlyphGridError> {
    let path = path.as_ref();
    let template = decode(path).map_err(|e| match e {
        GlyphGridError::ImageNotFound { .. } | GlyphGridError::PermissionDenied { .. } => e,
        other => GlyphGridError::TemplateUnreadable {
            path: path.to_path_buf(),
            detail: other.to_string(),
        },
    })?;
    debug!(
        "Loaded template {} ({}x{})",
        path.display(),
        template.width(),
        template.height()
    );
    Ok(template.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn missing_file_is_not_found() {
        let err = load_image("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, GlyphGridError::ImageNotFound { .. }));
    }

    #[test]
    fn garbage_bytes_are_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, b"this is not an image").unwrap();
        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, GlyphGridError::UnreadableInput { .. }));
    }

    #[test]
    fn template_decode_failure_is_template_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.png");
        std::fs::write(&path, b"\x89PNG broken").unwrap();
        let err = load_template(&path).unwrap_err();
        assert!(matches!(err, GlyphGridError::TemplateUnreadable { .. }));
    }

    #[test]
    fn png_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.png");
        RgbImage::from_pixel(12, 8, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let img = load_image(&path).unwrap();
        assert_eq!((img.width(), img.height()), (12, 8));
        let template = load_template(&path).unwrap();
        assert_eq!(template.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }
}
