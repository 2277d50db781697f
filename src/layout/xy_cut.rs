//! Recursive XY-cut partitioning of positioned elements.
//!
//! The partitioner sweeps an empty lane across a set of rectangles, first left
//! to right, then top to bottom, and splits the set at the first lane that no
//! element overlaps. Each vertical slice is cut horizontally; a slice that
//! cannot be cut horizontally is a leaf, otherwise every horizontal piece is
//! partitioned again.
//!
//! # Algorithm Overview
//!
//! 1. Sort by left edge. Keep a queue of elements whose right edge is still
//!    within `lane_width` of the current element's left edge; the first
//!    position where the queue drains is a vertical cut.
//! 2. Same sweep top to bottom with `lane_height`.
//! 3. Recurse. Every successful cut strictly shrinks both parts, so the
//!    recursion terminates; zero or one element is always a leaf.
//!
//! Lane sizes, lane validity and leaf wrapping are supplied by the
//! [`XyCut`] implementation.

use crate::geometry::Rect;
use crate::layout::document_analyzer::PageStatistics;
use crate::layout::text_block::{TextBlock, TextChar};
use crate::layout::text_line::TextLine;
use crate::utils::safe_float_cmp;
use std::collections::VecDeque;

/// Anything with a bounding box.
pub trait HasRect {
    /// Bounding box of the element.
    fn rect(&self) -> Rect;
}

impl HasRect for Rect {
    fn rect(&self) -> Rect {
        *self
    }
}

impl HasRect for TextChar {
    fn rect(&self) -> Rect {
        self.bbox
    }
}

impl HasRect for TextLine {
    fn rect(&self) -> Rect {
        self.bbox
    }
}

/// Recursive XY-cut over elements of type `E`, producing leaves of type
/// [`XyCut::Block`].
pub trait XyCut<E: HasRect> {
    /// Leaf type.
    type Block;

    /// Width of the empty lane required for a vertical cut of `elements`.
    fn lane_width(&self, elements: &[E]) -> f32;

    /// Height of the empty lane required for a horizontal cut of `elements`.
    fn lane_height(&self, elements: &[E]) -> f32;

    /// Decide whether the lane `[left, right]` is a valid vertical cut.
    ///
    /// `queue` holds the indices (into the sorted `elements`) of elements that
    /// may still reach into the lane. The default accepts only an empty queue.
    fn is_valid_vertical_lane(
        &self,
        _elements: &[E],
        _left: f32,
        _right: f32,
        queue: &VecDeque<usize>,
    ) -> bool {
        queue.is_empty()
    }

    /// Decide whether the lane `[top, bottom]` is a valid horizontal cut.
    fn is_valid_horizontal_lane(
        &self,
        _elements: &[E],
        _top: f32,
        _bottom: f32,
        queue: &VecDeque<usize>,
    ) -> bool {
        queue.is_empty()
    }

    /// Turn a set of elements that cannot be cut further into a leaf.
    fn wrap(&self, elements: Vec<E>) -> Self::Block;

    /// Partition the elements into leaves.
    ///
    /// An empty input yields no leaves.
    fn cut(&self, elements: Vec<E>) -> Vec<Self::Block> {
        let mut result = Vec::new();
        self.cut_into(elements, &mut result);
        result
    }

    /// Recursive step of [`XyCut::cut`], appending leaves to `result`.
    fn cut_into(&self, elements: Vec<E>, result: &mut Vec<Self::Block>) {
        for v_block in self.cut_vertically(elements) {
            let mut h_blocks = self.cut_horizontally(v_block);
            if h_blocks.len() == 1 {
                if let Some(leaf) = h_blocks.pop() {
                    result.push(self.wrap(leaf));
                }
            } else {
                for h_block in h_blocks {
                    self.cut_into(h_block, result);
                }
            }
        }
    }

    /// Split at the first valid vertical lane, scanning left to right.
    ///
    /// Returns the elements sorted by left edge, as one group if no lane is
    /// found or as two groups otherwise. An empty input yields no groups.
    fn cut_vertically(&self, elements: Vec<E>) -> Vec<Vec<E>> {
        let mut elements = elements;
        if elements.is_empty() {
            return Vec::new();
        }

        let lane = self.lane_width(&elements);
        elements.sort_by(|a, b| safe_float_cmp(a.rect().left(), b.rect().left()));

        let mut queue = VecDeque::from([0usize]);
        for i in 1..elements.len() {
            let right_boundary = elements[i].rect().left();
            while let Some(&front) = queue.front() {
                if right_boundary - elements[front].rect().right() < lane {
                    break;
                }
                queue.pop_front();
            }

            if self.is_valid_vertical_lane(&elements, right_boundary - lane, right_boundary, &queue)
            {
                log::debug!("vertical cut at x={:.2} ({} | {})", right_boundary, i, elements.len() - i);
                let tail = elements.split_off(i);
                return vec![elements, tail];
            }
            queue.push_back(i);
        }

        vec![elements]
    }

    /// Split at the first valid horizontal lane, scanning top to bottom.
    fn cut_horizontally(&self, elements: Vec<E>) -> Vec<Vec<E>> {
        let mut elements = elements;
        if elements.is_empty() {
            return Vec::new();
        }

        let lane = self.lane_height(&elements);
        elements.sort_by(|a, b| safe_float_cmp(a.rect().top(), b.rect().top()));

        let mut queue = VecDeque::from([0usize]);
        for i in 1..elements.len() {
            let lower_boundary = elements[i].rect().top();
            while let Some(&front) = queue.front() {
                if lower_boundary - elements[front].rect().bottom() < lane {
                    break;
                }
                queue.pop_front();
            }

            if self.is_valid_horizontal_lane(&elements, lower_boundary - lane, lower_boundary, &queue)
            {
                log::debug!("horizontal cut at y={:.2} ({} | {})", lower_boundary, i, elements.len() - i);
                let tail = elements.split_off(i);
                return vec![elements, tail];
            }
            queue.push_back(i);
        }

        vec![elements]
    }
}

/// XY-cut with fixed lane dimensions, producing plain element groups.
///
/// # Examples
///
/// ```
/// use pdf_strata::geometry::Rect;
/// use pdf_strata::layout::{FixedLaneCutter, XyCut};
///
/// let cutter = FixedLaneCutter::new(10.0, 10.0);
/// let rects = vec![
///     Rect::new(0.0, 0.0, 20.0, 10.0),
///     Rect::new(15.0, 0.0, 20.0, 10.0),
///     Rect::new(100.0, 0.0, 20.0, 10.0),
/// ];
/// let blocks = cutter.cut(rects);
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0].len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLaneCutter {
    /// Width of a vertical lane
    pub lane_width: f32,
    /// Height of a horizontal lane
    pub lane_height: f32,
}

impl FixedLaneCutter {
    /// Create a cutter with the given lane dimensions.
    pub fn new(lane_width: f32, lane_height: f32) -> Self {
        Self {
            lane_width,
            lane_height,
        }
    }
}

impl<E: HasRect> XyCut<E> for FixedLaneCutter {
    type Block = Vec<E>;

    fn lane_width(&self, _elements: &[E]) -> f32 {
        self.lane_width
    }

    fn lane_height(&self, _elements: &[E]) -> f32 {
        self.lane_height
    }

    fn wrap(&self, elements: Vec<E>) -> Vec<E> {
        elements
    }
}

/// XY-cut of a page's glyphs into [`TextBlock`]s.
///
/// Lanes are `lane_multiplier` times the most common glyph width (vertical
/// lanes) or height (horizontal lanes). With page statistics the page-level
/// values are used for every slice; otherwise they are measured per slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBlockCutter {
    /// Lane size as a multiple of the most common glyph dimension
    pub lane_multiplier: f32,
    /// Page-level statistics, if already computed
    pub statistics: Option<PageStatistics>,
}

impl TextBlockCutter {
    /// Create a cutter that measures every slice.
    pub fn new(lane_multiplier: f32) -> Self {
        Self {
            lane_multiplier,
            statistics: None,
        }
    }

    /// Use page-level statistics for every slice.
    pub fn with_statistics(mut self, statistics: PageStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }

    fn statistics_for(&self, elements: &[TextChar]) -> PageStatistics {
        self.statistics
            .unwrap_or_else(|| PageStatistics::analyze(elements))
    }
}

impl XyCut<TextChar> for TextBlockCutter {
    type Block = TextBlock;

    fn lane_width(&self, elements: &[TextChar]) -> f32 {
        self.lane_multiplier * self.statistics_for(elements).most_common_width
    }

    fn lane_height(&self, elements: &[TextChar]) -> f32 {
        self.lane_multiplier * self.statistics_for(elements).most_common_height
    }

    fn wrap(&self, elements: Vec<TextChar>) -> TextBlock {
        TextBlock::from_chars(elements)
    }
}
