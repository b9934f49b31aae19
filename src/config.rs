//! Configuration types for glyph extraction.
//!
//! Every knob of the pipeline lives in one immutable [`ExtractionConfig`],
//! built through its [`ExtractionConfigBuilder`] and passed by reference into
//! each stage. Nothing is read from globals, so two runs with equal configs
//! over the same image produce identical output.

use crate::error::GlyphGridError;
use crate::observer::SharedObserver;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page margins (pixels) between the image edge and the grid interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    pub top: u32,
    pub left: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Padding {
    pub fn new(top: u32, left: u32, right: u32, bottom: u32) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
        }
    }

    pub fn uniform(px: u32) -> Self {
        Self::new(px, px, px, px)
    }
}

impl Default for Padding {
    /// Margins of the standard 10x9 template sheet.
    fn default() -> Self {
        Self::new(50, 80, 120, 40)
    }
}

/// Configuration for one extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use glyphgrid::{ExtractionConfig, Padding};
///
/// let config = ExtractionConfig::builder()
///     .grid(10, 9)
///     .padding(Padding::new(50, 80, 120, 40))
///     .transparency_threshold(200)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Margins outside the grid interior. Default: 50 / 80 / 120 / 40 (top/left/right/bottom).
    pub padding: Padding,

    /// Number of grid rows. Default: 10.
    pub rows: usize,

    /// Number of grid columns. Default: 9.
    pub cols: usize,

    /// Canny hysteresis low threshold. Default: 50.
    pub canny_low: f32,

    /// Canny hysteresis high threshold. Default: 150.
    ///
    /// Gradients above this start an edge; gradients between `canny_low` and
    /// this value only extend an edge that already started.
    pub canny_high: f32,

    /// Alpha cutoff. Default: 200.
    ///
    /// Computed alpha values below this are forced to 0. This removes faint
    /// paper texture and anti-aliasing halos, and also clips genuinely faint
    /// ink.
    pub transparency_threshold: u8,

    /// Uniform border added around each cropped glyph, in pixels. Default: 20.
    pub border_width: u32,

    /// Fill colour of the glyph border. Default: white.
    pub border_color: [u8; 3],

    /// Invert tone of the cropped glyph before the alpha mapping. Default: true.
    pub invert: bool,

    /// Reject contours whose center is farther than this from every cell
    /// center. Default: `None` (every contour goes to its nearest cell).
    pub max_assign_distance: Option<f64>,

    /// Canvas size for intermediate artifact images. Default: 1024x1024.
    pub artifact_size: (u32, u32),

    /// Stage hooks. Default: none.
    pub observer: Option<SharedObserver>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            rows: 10,
            cols: 9,
            canny_low: 50.0,
            canny_high: 150.0,
            transparency_threshold: 200,
            border_width: 20,
            border_color: [255, 255, 255],
            invert: true,
            max_assign_distance: None,
            artifact_size: (1024, 1024),
            observer: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("padding", &self.padding)
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("canny_low", &self.canny_low)
            .field("canny_high", &self.canny_high)
            .field("transparency_threshold", &self.transparency_threshold)
            .field("border_width", &self.border_width)
            .field("border_color", &self.border_color)
            .field("invert", &self.invert)
            .field("max_assign_distance", &self.max_assign_distance)
            .field("artifact_size", &self.artifact_size)
            .field(
                "observer",
                &self.observer.as_ref().map(|_| "<dyn PipelineObserver>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn padding(mut self, padding: Padding) -> Self {
        self.config.padding = padding;
        self
    }

    pub fn grid(mut self, rows: usize, cols: usize) -> Self {
        self.config.rows = rows;
        self.config.cols = cols;
        self
    }

    pub fn canny_thresholds(mut self, low: f32, high: f32) -> Self {
        self.config.canny_low = low;
        self.config.canny_high = high;
        self
    }

    pub fn transparency_threshold(mut self, t: u8) -> Self {
        self.config.transparency_threshold = t;
        self
    }

    pub fn border_width(mut self, px: u32) -> Self {
        self.config.border_width = px;
        self
    }

    pub fn border_color(mut self, rgb: [u8; 3]) -> Self {
        self.config.border_color = rgb;
        self
    }

    pub fn invert(mut self, v: bool) -> Self {
        self.config.invert = v;
        self
    }

    pub fn max_assign_distance(mut self, px: Option<f64>) -> Self {
        self.config.max_assign_distance = px;
        self
    }

    pub fn artifact_size(mut self, width: u32, height: u32) -> Self {
        self.config.artifact_size = (width.max(1), height.max(1));
        self
    }

    pub fn observer(mut self, observer: SharedObserver) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, GlyphGridError> {
        let c = &self.config;
        if c.rows == 0 || c.cols == 0 {
            return Err(GlyphGridError::InvalidConfig(format!(
                "Grid must have at least one row and one column, got {}x{}",
                c.rows, c.cols
            )));
        }
        if !(c.canny_low.is_finite() && c.canny_high.is_finite()) || c.canny_low < 0.0 {
            return Err(GlyphGridError::InvalidConfig(format!(
                "Canny thresholds must be finite and non-negative, got {} / {}",
                c.canny_low, c.canny_high
            )));
        }
        if c.canny_low > c.canny_high {
            return Err(GlyphGridError::InvalidConfig(format!(
                "Canny low threshold {} exceeds high threshold {}",
                c.canny_low, c.canny_high
            )));
        }
        if let Some(d) = c.max_assign_distance {
            if !(d.is_finite() && d >= 0.0) {
                return Err(GlyphGridError::InvalidConfig(format!(
                    "max_assign_distance must be a non-negative number, got {d}"
                )));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use std::sync::Arc;

    #[test]
    fn defaults_match_template_sheet() {
        let c = ExtractionConfig::default();
        assert_eq!(c.padding, Padding::new(50, 80, 120, 40));
        assert_eq!((c.rows, c.cols), (10, 9));
        assert_eq!(c.transparency_threshold, 200);
        assert_eq!(c.border_width, 20);
        assert!(c.max_assign_distance.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let c = ExtractionConfig::builder()
            .grid(3, 4)
            .padding(Padding::uniform(5))
            .canny_thresholds(10.0, 20.0)
            .transparency_threshold(128)
            .border_width(4)
            .invert(false)
            .max_assign_distance(Some(40.0))
            .build()
            .expect("valid config");
        assert_eq!((c.rows, c.cols), (3, 4));
        assert_eq!(c.padding, Padding::uniform(5));
        assert_eq!(c.transparency_threshold, 128);
        assert!(!c.invert);
        assert_eq!(c.max_assign_distance, Some(40.0));
    }

    #[test]
    fn zero_rows_rejected() {
        let err = ExtractionConfig::builder().grid(0, 9).build().unwrap_err();
        assert!(matches!(err, GlyphGridError::InvalidConfig(_)));
    }

    #[test]
    fn inverted_canny_thresholds_rejected() {
        let err = ExtractionConfig::builder()
            .canny_thresholds(150.0, 50.0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn negative_distance_cap_rejected() {
        assert!(ExtractionConfig::builder()
            .max_assign_distance(Some(-1.0))
            .build()
            .is_err());
    }

    #[test]
    fn debug_hides_observer() {
        let c = ExtractionConfig::builder()
            .observer(Arc::new(NoopObserver))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn PipelineObserver>"));
    }
}
