//! Character and text block representation for layout segmentation.
//!
//! This module defines the positioned glyph record produced by the upstream
//! decoder, the emphasis flags derived from font names, and the leaf block
//! type emitted by the XY-cut partitioner.

use crate::geometry::Rect;
use crate::layout::patterns::is_caption;
use bitflags::bitflags;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single positioned glyph.
///
/// Word separators are synthetic spaces inserted by the decoder. They carry no
/// geometry of their own; [`enrich_word_separators`] gives them the position
/// of their left neighbour before a run is sorted.
///
/// [`enrich_word_separators`]: crate::layout::line_splitter::enrich_word_separators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChar {
    /// The text fragment, usually a single glyph
    pub text: String,
    /// Bounding box of the glyph (y grows downwards, baseline is the bottom)
    pub bbox: Rect,
    /// Font name/family
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// 1-based page number
    pub page_number: u32,
    /// True for synthetic spaces inserted by the decoder
    pub is_word_separator: bool,
    /// Baseline origin Y coordinate.
    ///
    /// Taken from the text matrix; usually equal to `bbox.bottom()`, but
    /// glyphs with descenders may report a lower box.
    pub origin_y: f32,
}

impl TextChar {
    /// Create a glyph whose baseline origin is the bottom of its box.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::geometry::Rect;
    /// use pdf_strata::layout::TextChar;
    ///
    /// let c = TextChar::new("a", Rect::new(10.0, 90.0, 5.0, 10.0), "Times-Roman", 10.0, 1);
    /// assert_eq!(c.baseline(), 100.0);
    /// assert!(c.is_real());
    /// ```
    pub fn new(
        text: impl Into<String>,
        bbox: Rect,
        font_name: impl Into<String>,
        font_size: f32,
        page_number: u32,
    ) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_name: font_name.into(),
            font_size,
            page_number,
            is_word_separator: false,
            origin_y: bbox.bottom(),
        }
    }

    /// Create a synthetic word separator.
    pub fn word_separator(bbox: Rect, page_number: u32) -> Self {
        Self {
            text: " ".to_string(),
            bbox,
            font_name: String::new(),
            font_size: 0.0,
            page_number,
            is_word_separator: true,
            origin_y: bbox.bottom(),
        }
    }

    /// Baseline of the glyph, i.e. its origin y.
    ///
    /// Glyphs with descenders have a box reaching below the baseline.
    pub fn baseline(&self) -> f32 {
        self.origin_y
    }

    /// True if the glyph has unusable geometry or no text.
    ///
    /// Word separators are never malformed: their geometry is inherited.
    pub fn is_malformed(&self) -> bool {
        !self.is_word_separator && (self.text.is_empty() || !self.bbox.is_well_formed())
    }

    /// True for whitespace that may separate two words: synthetic separators
    /// and literal whitespace glyphs.
    pub fn is_gap_candidate(&self) -> bool {
        self.is_word_separator || (!self.text.is_empty() && self.text.trim().is_empty())
    }

    /// True for a well-formed, visible glyph.
    pub fn is_real(&self) -> bool {
        !self.is_malformed() && !self.is_gap_candidate()
    }

    /// True if the text is a single ASCII letter or digit.
    ///
    /// Only such glyphs vote for the dominant font and font size of a line.
    pub fn is_alphanumeric(&self) -> bool {
        let mut chars = self.text.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphanumeric())
    }
}

bitflags! {
    /// Emphasis flags derived from the dominant font name of a line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct FontFlags: u8 {
        /// Font name contains "italic"
        const ITALIC = 1;
        /// Font name contains "bold"
        const BOLD = 2;
    }
}

impl FontFlags {
    /// Derive emphasis from a font name (case-insensitive substring match).
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::layout::FontFlags;
    ///
    /// let flags = FontFlags::from_font_name("CMR-BoldItalic");
    /// assert_eq!(flags.bits(), 3);
    /// assert!(FontFlags::from_font_name("Times-Roman").is_empty());
    /// ```
    pub fn from_font_name(font_name: &str) -> Self {
        let lower = font_name.to_lowercase();
        let mut flags = FontFlags::empty();
        if lower.contains("italic") {
            flags |= FontFlags::ITALIC;
        }
        if lower.contains("bold") {
            flags |= FontFlags::BOLD;
        }
        flags
    }
}

/// A leaf block of the XY-cut partitioner: characters sharing a bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Characters of the block, in input order
    pub chars: Vec<TextChar>,
    /// Union of the character boxes
    pub bbox: Rect,
    /// Text of the block in reading order
    pub text: String,
    /// Most common font name (first seen wins ties)
    pub dominant_font: String,
    /// False for empty blocks and captions
    pub consider: bool,
}

impl TextBlock {
    /// Create a text block from a collection of characters.
    ///
    /// The text is assembled in reading order: glyphs are ordered by their
    /// rounded baseline, then by x. An empty collection yields an empty block
    /// with a zero-sized box that is not considered.
    pub fn from_chars(chars: Vec<TextChar>) -> Self {
        let bbox = Rect::union_all(chars.iter().filter(|c| !c.is_malformed()).map(|c| &c.bbox))
            .unwrap_or_else(|| Rect::new(0.0, 0.0, 0.0, 0.0));

        let mut ordered: Vec<&TextChar> = chars.iter().filter(|c| !c.is_malformed()).collect();
        ordered.sort_by(|a, b| {
            (a.baseline().round() as i64)
                .cmp(&(b.baseline().round() as i64))
                .then_with(|| crate::utils::safe_float_cmp(a.bbox.x, b.bbox.x))
        });
        let text: String = ordered.iter().map(|c| c.text.as_str()).collect();

        let mut font_counts: IndexMap<&str, usize> = IndexMap::new();
        for c in chars.iter().filter(|c| c.is_real()) {
            *font_counts.entry(c.font_name.as_str()).or_insert(0) += 1;
        }
        let dominant_font = most_common(&font_counts)
            .map(|f| f.to_string())
            .unwrap_or_default();

        let consider = !text.trim().is_empty() && !is_caption(text.trim_start());

        Self {
            chars,
            bbox,
            text,
            dominant_font,
            consider,
        }
    }

    /// Number of characters in the block.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// True if the block holds no characters.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Key with the highest count; the first inserted key wins ties.
pub(crate) fn most_common<K: Copy>(counts: &IndexMap<K, usize>) -> Option<K> {
    let mut best: Option<(K, usize)> = None;
    for (key, &count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((*key, count));
        }
    }
    best.map(|(key, _)| key)
}
