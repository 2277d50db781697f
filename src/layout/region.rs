//! Grouping of column lines into regions.
//!
//! Within a column, lines that share a row are merged back together, and
//! vertically contiguous lines are accumulated into regions. Each region gets a
//! verdict deciding whether consumers should see it.

use crate::geometry::{compare, vertical_order, Rect, RelativeOrder};
use crate::layout::patterns::{is_bibliography_header, is_caption, starts_with_reference_anchor};
use crate::layout::text_line::{merge, TextLine};
use crate::pipeline::SegmentationConfig;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A vertically contiguous group of lines within one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Lines in reading order
    pub lines: Vec<TextLine>,
    /// Union of the line boxes
    pub bbox: Rect,
    /// Verdict of [`consider`]
    pub consider: bool,
    /// 1-based page number
    pub page_number: u32,
    /// Build indices of every line included in the region, ascending
    pub provenance: Vec<usize>,
}

impl Region {
    /// Create a region from non-empty lines and judge it.
    ///
    /// Returns `None` for an empty group.
    pub fn new(lines: Vec<TextLine>) -> Option<Self> {
        let first = lines.first()?;
        let page_number = first.page_number;
        let bbox = Rect::union_all(lines.iter().map(|l| &l.bbox)).unwrap_or(first.bbox);

        let mut provenance: Vec<usize> =
            lines.iter().flat_map(|l| l.provenance.iter().copied()).collect();
        provenance.sort_unstable();

        let consider = consider(&lines);
        Some(Self {
            lines,
            bbox,
            consider,
            page_number,
            provenance,
        })
    }

    /// Wrap a single line in a region that is always kept.
    pub fn unfiltered(line: TextLine) -> Self {
        Self {
            bbox: line.bbox,
            consider: true,
            page_number: line.page_number,
            provenance: line.provenance.clone(),
            lines: vec![line],
        }
    }

    /// Concatenated text of the region's lines.
    pub fn text(&self) -> String {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    /// True if the line's origin lies within the region's box, each edge
    /// compared with `tolerance`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::geometry::Rect;
    /// use pdf_strata::layout::{build_line, Region, TextChar};
    /// use pdf_strata::pipeline::SegmentationConfig;
    ///
    /// let config = SegmentationConfig::default();
    /// let glyph = TextChar::new("a", Rect::new(10.0, 90.0, 5.0, 10.0), "Times", 10.0, 1);
    /// let line = build_line(&[glyph], 1, 0, &config).unwrap();
    /// let region = Region::new(vec![line.clone()]).unwrap();
    ///
    /// let mut shifted = line;
    /// shifted.x += 4.0;
    /// assert!(region.contains_line(&shifted, 5.0));
    /// shifted.x += 20.0;
    /// assert!(!region.contains_line(&shifted, 5.0));
    /// ```
    pub fn contains_line(&self, line: &TextLine, tolerance: f32) -> bool {
        compare(line.x, self.bbox.left(), tolerance) != Ordering::Less
            && compare(line.x, self.bbox.right(), tolerance) != Ordering::Greater
            && compare(line.y, self.bbox.top(), tolerance) != Ordering::Less
            && compare(line.y, self.bbox.bottom(), tolerance) != Ordering::Greater
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Region[p{} {} lines, ({:.1},{:.1})-({:.1},{:.1}), {}]",
            self.page_number,
            self.lines.len(),
            self.bbox.left(),
            self.bbox.top(),
            self.bbox.right(),
            self.bbox.bottom(),
            if self.consider { "kept" } else { "discarded" }
        )
    }
}

/// Decide whether a group of lines is worth keeping.
///
/// A single line is kept if it is on page 1, starts with a reference anchor or
/// is a bibliography header (whitespace ignored, so `R E F E R E N C E S`
/// counts). For larger groups the lines are checked in order: a page 1 line or
/// a bibliography header keeps the group, a caption discards it. Otherwise the
/// group is kept iff at least half of its lines are meaningful.
pub fn consider(lines: &[TextLine]) -> bool {
    match lines {
        [] => false,
        [line] => {
            if line.page_number == 1 {
                return true;
            }
            let compact: String = line.text.chars().filter(|c| !c.is_whitespace()).collect();
            starts_with_reference_anchor(&line.text) || is_bibliography_header(&compact)
        },
        _ => {
            let mut meaningful = 0usize;
            for line in lines {
                if line.page_number == 1 {
                    return true;
                }
                if is_caption(&line.text) {
                    return false;
                }
                if is_bibliography_header(&line.text) {
                    return true;
                }
                if line.meaningful {
                    meaningful += 1;
                }
            }
            2 * meaningful >= lines.len()
        },
    }
}

/// Merge split lines and group each column into regions.
///
/// Columns must be in reading order. Within a column, every line absorbs the
/// following lines whose vertical order relative to it is `Equal`; the pieces
/// are concatenated left to right. A region is closed when the next line is
/// far away (`FarBefore`/`FarAfter`) from the previous one, and at the end of
/// every column. Regions are returned in reading order with their verdicts.
pub fn group_regions(columns: Vec<Vec<TextLine>>, config: &SegmentationConfig) -> Vec<Region> {
    let slack = config.vertical_slack;
    let mut regions = Vec::new();

    for column in columns {
        let mut group: Vec<TextLine> = Vec::new();
        let mut lines = column.into_iter().peekable();

        while let Some(mut line) = lines.next() {
            let far_from_prev = group.last().map_or(false, |prev| {
                !vertical_order(&prev.v_extent(), &line.v_extent(), slack).is_near()
            });
            if far_from_prev {
                close_group(&mut group, &mut regions);
            }

            while let Some(next) = lines.next_if(|next| {
                vertical_order(&line.v_extent(), &next.v_extent(), slack) == RelativeOrder::Equal
            }) {
                log::debug!("merging {} and {}", line, next);
                line = if line.x <= next.x {
                    merge(&line, &next, config.min_meaningful_len)
                } else {
                    merge(&next, &line, config.min_meaningful_len)
                };
            }

            group.push(line);
        }

        close_group(&mut group, &mut regions);
    }

    regions
}

fn close_group(group: &mut Vec<TextLine>, regions: &mut Vec<Region>) {
    if let Some(region) = Region::new(std::mem::take(group)) {
        log::debug!("{}", region);
        regions.push(region);
    }
}
