//! The text line record built by the line builder.

use crate::geometry::{HorizontalExtent, Rect, VerticalExtent};
use crate::layout::patterns::is_meaningful;
use crate::layout::text_block::{FontFlags, TextChar};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A visual line of text on one page.
///
/// `x`/`y` are the position of the leftmost glyph, `y` being its baseline. The
/// line spans `[y - height, y]` vertically and `[x, x_of_line_end]`
/// horizontally. `bbox` is the union of every glyph the line was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Left edge of the leftmost glyph
    pub x: f32,
    /// Baseline of the leftmost glyph
    pub y: f32,
    /// Bottom of the leftmost glyph's box, below `y` for descenders
    pub y_lower_left: f32,
    /// `x_of_line_end - x`
    pub width: f32,
    /// Height of the tallest glyph
    pub height: f32,
    /// Right edge of the rightmost non-whitespace glyph
    pub x_of_line_end: f32,
    /// Union of the glyph boxes
    pub bbox: Rect,
    /// 1-based page number
    pub page_number: u32,
    /// Concatenated text, including the trailing line separator
    pub text: String,
    /// Most common rounded font size, 0 if unknown
    pub font_size: f32,
    /// Most common font name
    pub font_name: Option<String>,
    /// Emphasis derived from the dominant font name
    pub font_flags: FontFlags,
    /// True if the line has letters and all of them are uppercase
    pub is_uppercase: bool,
    /// Likely prose rather than noise
    pub meaningful: bool,
    /// True until the line is assigned to a column
    pub pending: bool,
    /// Build order of the line on its page
    pub index: usize,
    /// Build indices of every line merged into this one, ascending
    pub provenance: Vec<usize>,
    /// Source glyphs, in run order
    pub chars: Vec<TextChar>,
}

impl TextLine {
    /// Top edge of the line.
    pub fn y_top(&self) -> f32 {
        self.y - self.height
    }

    /// Horizontal extent used by the column comparator.
    pub fn h_extent(&self) -> HorizontalExtent {
        HorizontalExtent {
            start: self.x,
            end: self.x_of_line_end,
            char_count: self.text.chars().count(),
        }
    }

    /// Vertical extent used by the row comparator.
    pub fn v_extent(&self) -> VerticalExtent {
        VerticalExtent {
            baseline: self.y,
            height: self.height,
        }
    }
}

impl fmt::Display for TextLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[p{} #{} x={:.1} y={:.1} w={:.1} h={:.1} fs={} flags={:?}{}] {}",
            self.page_number,
            self.index,
            self.x,
            self.y,
            self.width,
            self.height,
            self.font_size,
            self.font_flags,
            if self.meaningful { " meaningful" } else { "" },
            self.text.trim_end()
        )
    }
}

/// Merge two lines that were split apart but share a row.
///
/// `left` must be the line with the smaller `x`. The result keeps the left
/// line's baseline, height, font and emphasis; the horizontal extent, text,
/// glyphs, box and provenance of both lines are combined, the index is the
/// larger of both and `meaningful` is recomputed.
///
/// # Examples
///
/// ```
/// use pdf_strata::geometry::Rect;
/// use pdf_strata::layout::{build_line, merge, TextChar};
/// use pdf_strata::pipeline::SegmentationConfig;
///
/// let config = SegmentationConfig::default();
/// let a = TextChar::new("a", Rect::new(0.0, 90.0, 5.0, 10.0), "Times", 10.0, 2);
/// let b = TextChar::new("b", Rect::new(50.0, 90.0, 5.0, 10.0), "Times", 10.0, 2);
/// let left = build_line(&[a], 2, 0, &config).unwrap();
/// let right = build_line(&[b], 2, 1, &config).unwrap();
///
/// let merged = merge(&left, &right, config.min_meaningful_len);
/// assert_eq!(merged.text, "a b ");
/// assert_eq!(merged.x_of_line_end, 55.0);
/// assert_eq!(merged.provenance, vec![0, 1]);
/// ```
pub fn merge(left: &TextLine, right: &TextLine, min_meaningful_len: usize) -> TextLine {
    let x = left.x.min(right.x);
    let x_of_line_end = left.x_of_line_end.max(right.x_of_line_end);

    let mut text = String::with_capacity(left.text.len() + right.text.len());
    text.push_str(&left.text);
    text.push_str(&right.text);

    let mut chars = Vec::with_capacity(left.chars.len() + right.chars.len());
    chars.extend_from_slice(&left.chars);
    chars.extend_from_slice(&right.chars);

    let mut provenance: Vec<usize> = left
        .provenance
        .iter()
        .chain(right.provenance.iter())
        .copied()
        .collect();
    provenance.sort_unstable();
    provenance.dedup();

    let meaningful = is_meaningful(&text, left.page_number, min_meaningful_len);

    TextLine {
        x,
        y: left.y,
        y_lower_left: left.y_lower_left,
        width: x_of_line_end - x,
        height: left.height,
        x_of_line_end,
        bbox: left.bbox.union(&right.bbox),
        page_number: left.page_number,
        text,
        font_size: left.font_size,
        font_name: left.font_name.clone(),
        font_flags: left.font_flags,
        is_uppercase: left.is_uppercase,
        meaningful,
        pending: left.pending && right.pending,
        index: left.index.max(right.index),
        provenance,
        chars,
    }
}
