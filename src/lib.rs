// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::needless_range_loop)]
#![allow(clippy::unnecessary_map_or)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Strata
//!
//! Layout segmentation of positioned PDF glyphs: recover lines, columns and
//! text regions in reading order from the output of a glyph decoder.
//!
//! ## Pipeline
//!
//! - **Line runs**: the decoder's glyph stream is cut into nominal lines
//! - **Gap splitting**: runs spanning several columns are split at outlier word gaps
//! - **Line building**: text, dominant font, emphasis and meaningfulness per line
//! - **Column clustering**: lines are grouped by horizontal alignment
//! - **Region grouping**: same-row pieces are merged, contiguous lines form regions
//! - **Region verdict**: captions and numeric noise are discarded, bibliographies kept
//! - **XY-cut** (optional): recursive whitespace partitioning before line detection
//!
//! ## Quick Start
//!
//! ```
//! use pdf_strata::geometry::Rect;
//! use pdf_strata::layout::TextChar;
//! use pdf_strata::pipeline::{DocumentSegmenter, Page, SegmentationConfig};
//!
//! # fn main() -> pdf_strata::Result<()> {
//! let glyph = |c: char, x: f32, page: u32| {
//!     TextChar::new(c.to_string(), Rect::new(x, 90.0, 6.0, 10.0), "Times-Bold", 10.0, page)
//! };
//! let chars = "Abstract".chars().enumerate().map(|(i, c)| glyph(c, i as f32 * 6.0, 1)).collect();
//! let page = Page::new(1, Rect::new(0.0, 0.0, 612.0, 792.0), chars)?;
//!
//! let segmenter = DocumentSegmenter::with_config(SegmentationConfig::default())?;
//! let layout = segmenter.segment(&[page]);
//! let lines: Vec<&str> = layout.lines().map(|l| l.text.as_str()).collect();
//! assert_eq!(lines, vec!["Abstract "]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `parallel`: segment pages concurrently with rayon
//!   (`DocumentSegmenter::segment_parallel`)

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Geometry primitives and order relations
pub mod geometry;

// Segmentation algorithms
pub mod layout;

// Page and document pipeline
pub mod pipeline;

// Re-exports
pub use error::{Error, Result};
pub use layout::{Region, TextChar, TextLine};
pub use pipeline::{
    DocumentLayout, DocumentSegmenter, Page, PageLayout, PageSegmenter, SegmentationConfig,
};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Total order on floats for sorting glyphs and lines.
    ///
    /// NaN compares equal to NaN and greater than every number, so sorts
    /// never panic on malformed coordinates.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match a.partial_cmp(&b) {
            Some(ordering) => ordering,
            None => a.is_nan().cmp(&b.is_nan()),
        }
    }

}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
