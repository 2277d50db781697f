//! Page and document statistics for the segmentation heuristics.
//!
//! Statistics are computed once and passed by reference to the components
//! that need them, e.g. the XY-cut lane dimensions are multiples of the most
//! common glyph width and height of the page.
//!
//! ## Example
//!
//! ```
//! use pdf_strata::geometry::Rect;
//! use pdf_strata::layout::{PageStatistics, TextChar};
//!
//! let chars: Vec<TextChar> = (0..4)
//!     .map(|i| TextChar::new("x", Rect::new(i as f32 * 6.0, 0.0, 6.0, 11.0), "Times", 10.0, 1))
//!     .collect();
//! let stats = PageStatistics::analyze(&chars);
//! assert_eq!(stats.most_common_width, 6.0);
//! assert_eq!(stats.most_common_height, 11.0);
//! ```

use crate::layout::text_block::{most_common, TextChar};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Quantized frequency counts, 0.1 unit resolution.
#[derive(Debug, Default, Clone)]
struct Histogram {
    counts: IndexMap<i64, usize>,
}

impl Histogram {
    fn add(&mut self, value: f32) {
        if value.is_finite() && value > 0.0 {
            *self.counts.entry((value * 10.0).round() as i64).or_insert(0) += 1;
        }
    }

    fn merge(&mut self, other: &Histogram) {
        for (&key, &count) in &other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
    }

    /// Most frequent value, first seen wins ties; 0 when empty.
    fn mode(&self) -> f32 {
        most_common(&self.counts).map_or(0.0, |key| key as f32 / 10.0)
    }
}

#[derive(Debug, Default, Clone)]
struct Histograms {
    widths: Histogram,
    heights: Histogram,
    font_sizes: Histogram,
    chars: usize,
}

impl Histograms {
    fn collect<'a>(chars: impl IntoIterator<Item = &'a TextChar>) -> Self {
        let mut h = Self::default();
        for c in chars.into_iter().filter(|c| c.is_real()) {
            h.widths.add(c.bbox.width);
            h.heights.add(c.bbox.height);
            h.font_sizes.add(c.font_size);
            h.chars += 1;
        }
        h
    }
}

/// Statistics of one page's real glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageStatistics {
    /// Most common glyph width (0.1 resolution), 0 for an empty page
    pub most_common_width: f32,
    /// Most common glyph height (0.1 resolution), 0 for an empty page
    pub most_common_height: f32,
    /// Most common font size (0.1 resolution), 0 for an empty page
    pub most_common_font_size: f32,
    /// Number of real glyphs
    pub char_count: usize,
}

impl PageStatistics {
    /// Analyze a set of glyphs. Whitespace, separators and malformed glyphs are
    /// ignored.
    pub fn analyze<'a>(chars: impl IntoIterator<Item = &'a TextChar>) -> Self {
        Self::from_histograms(&Histograms::collect(chars))
    }

    fn from_histograms(h: &Histograms) -> Self {
        Self {
            most_common_width: h.widths.mode(),
            most_common_height: h.heights.mode(),
            most_common_font_size: h.font_sizes.mode(),
            char_count: h.chars,
        }
    }
}

/// Statistics over every segmented page of a document.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentStatistics {
    /// Most common glyph width over all pages
    pub most_common_width: f32,
    /// Most common glyph height over all pages
    pub most_common_height: f32,
    /// Most common font size over all pages
    pub most_common_font_size: f32,
    /// Number of real glyphs over all pages
    pub char_count: usize,
    /// Number of pages analyzed
    pub page_count: usize,
}

impl DocumentStatistics {
    /// Analyze the glyphs of several pages, one slice per page.
    pub fn analyze<'a>(pages: impl IntoIterator<Item = &'a [TextChar]>) -> Self {
        let mut total = Histograms::default();
        let mut page_count = 0;
        for chars in pages {
            let page = Histograms::collect(chars);
            total.widths.merge(&page.widths);
            total.heights.merge(&page.heights);
            total.font_sizes.merge(&page.font_sizes);
            total.chars += page.chars;
            page_count += 1;
        }

        let page = PageStatistics::from_histograms(&total);
        Self {
            most_common_width: page.most_common_width,
            most_common_height: page.most_common_height,
            most_common_font_size: page.most_common_font_size,
            char_count: page.char_count,
            page_count,
        }
    }
}
