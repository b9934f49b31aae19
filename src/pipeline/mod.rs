//! Pipeline stages for glyph extraction.
//!
//! Each submodule implements exactly one transformation step and exchanges
//! plain values with its neighbours, so every stage can be tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ edges ──▶ contours ──▶ assign ──▶ merge ──▶ isolate ──▶ composite
//! (decode)  (Canny)   (trace)       ▲ (cells)  (bbox)   (alpha)     (template)
//!                                   │
//!                                  grid
//! ```
//!
//! 1. [`input`]: decode the page and the template; aborts the run on failure
//! 2. [`edges`]: luminance, then a binary Canny edge map
//! 3. [`contours`]: trace outer and hole boundaries, sorted by area
//! 4. [`grid`]: cell centers from page size, padding and shape
//! 5. [`assign`]: nearest-center ownership of each contour
//! 6. [`merge`]: one bounding box per occupied cell
//! 7. [`isolate`]: crop, invert, border and transparency per glyph
//! 8. [`composite`]: alpha-blend glyphs onto the template by index

pub mod assign;
pub mod composite;
pub mod contours;
pub mod edges;
pub mod grid;
pub mod input;
pub mod isolate;
pub mod merge;
