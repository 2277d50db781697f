//! Gap-based line splitting.
//!
//! Decoders occasionally emit one "line" that runs across several columns. The
//! splitter looks at the widths of the word gaps in such a run: a gap width
//! that is markedly larger than the next smaller one is taken as a column
//! boundary, and the run is cut there.

use crate::geometry::{vertical_order, RelativeOrder, Rect, VerticalExtent};
use crate::layout::text_block::TextChar;
use crate::utils::safe_float_cmp;
use indexmap::IndexMap;
use std::iter::FusedIterator;

/// Give every word separator the position of the nearest preceding real glyph.
///
/// The separator is placed at that glyph's right edge, with the same top and
/// height and zero width. Separators before the first real glyph keep their
/// own geometry.
pub fn enrich_word_separators(run: &mut [TextChar]) {
    let mut last_real: Option<(Rect, f32)> = None;
    for c in run.iter_mut() {
        if c.is_word_separator {
            if let Some((bbox, origin_y)) = last_real {
                c.bbox = Rect::new(bbox.right(), bbox.top(), 0.0, bbox.height);
                c.origin_y = origin_y;
            }
        } else if c.is_real() {
            last_real = Some((c.bbox, c.origin_y));
        }
    }
}

/// Stable sort of a run by x, ties broken by the top edge.
pub fn sort_run(run: &mut [TextChar]) {
    run.sort_by(|a, b| {
        safe_float_cmp(a.bbox.x, b.bbox.x).then_with(|| safe_float_cmp(a.bbox.y, b.bbox.y))
    });
}

fn char_extent(c: &TextChar) -> VerticalExtent {
    VerticalExtent {
        baseline: c.baseline(),
        height: c.bbox.height,
    }
}

fn same_row(a: &VerticalExtent, b: &VerticalExtent, slack: f32) -> bool {
    vertical_order(a, b, slack) == RelativeOrder::Equal
        || vertical_order(b, a, slack) == RelativeOrder::Equal
}

/// Cut a page's glyph stream into nominal lines.
///
/// A new run starts when the page changes, or when a real glyph does not share
/// a row with the previous real glyph. Two glyphs share a row when either one
/// overlaps the other vertically, so a superscript followed by a full-height
/// glyph stays on its line. Whitespace, separators and malformed glyphs never
/// start a run; they stay with the glyphs before them.
///
/// # Examples
///
/// ```
/// use pdf_strata::geometry::Rect;
/// use pdf_strata::layout::{line_runs, TextChar};
///
/// let chars = vec![
///     TextChar::new("a", Rect::new(0.0, 90.0, 5.0, 10.0), "Times", 10.0, 2),
///     TextChar::new("b", Rect::new(5.0, 90.0, 5.0, 10.0), "Times", 10.0, 2),
///     TextChar::new("c", Rect::new(0.0, 110.0, 5.0, 10.0), "Times", 10.0, 2),
/// ];
/// let runs = line_runs(&chars, 0.5);
/// assert_eq!(runs.len(), 2);
/// assert_eq!(runs[0].len(), 2);
/// ```
pub fn line_runs(chars: &[TextChar], slack: f32) -> Vec<Vec<TextChar>> {
    let mut runs = Vec::new();
    let mut current: Vec<TextChar> = Vec::new();
    let mut last_real: Option<VerticalExtent> = None;

    for c in chars {
        let page_changed = current.first().map_or(false, |f| f.page_number != c.page_number);
        let row_changed = c.is_real()
            && last_real.map_or(false, |prev| !same_row(&prev, &char_extent(c), slack));

        if (page_changed || row_changed) && !current.is_empty() {
            runs.push(std::mem::take(&mut current));
            last_real = None;
        }

        if c.is_real() {
            last_real = Some(char_extent(c));
        }
        current.push(c.clone());
    }

    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Positions at which a run should be split.
///
/// Every whitespace glyph or word separator that sits between two real glyphs
/// contributes a gap: the distance from the right edge of the real glyph
/// before it to the left edge of the real glyph after it, rounded. Gap widths
/// are bucketed and walked in ascending order; a width exceeding its smaller
/// neighbour by more than `margin` marks the last position holding that width
/// as a split point. The result is sorted ascending.
pub fn split_points(run: &[TextChar], margin: f32) -> Vec<usize> {
    let n = run.len();
    let mut prev_real = vec![None; n];
    let mut next_real = vec![None; n];

    let mut last = None;
    for (i, c) in run.iter().enumerate() {
        prev_real[i] = last;
        if c.is_real() {
            last = Some(i);
        }
    }
    last = None;
    for (i, c) in run.iter().enumerate().rev() {
        next_real[i] = last;
        if c.is_real() {
            last = Some(i);
        }
    }

    let mut gaps: IndexMap<i64, Vec<usize>> = IndexMap::new();
    for (i, c) in run.iter().enumerate() {
        if !c.is_gap_candidate() {
            continue;
        }
        if let (Some(p), Some(q)) = (prev_real[i], next_real[i]) {
            let gap = (run[q].bbox.left() - run[p].bbox.right()).round() as i64;
            gaps.entry(gap).or_default().push(i);
        }
    }

    let mut points = Vec::new();
    if gaps.len() > 1 {
        let mut widths: Vec<i64> = gaps.keys().copied().collect();
        widths.sort_unstable();

        let mut prev: Option<i64> = None;
        for width in widths {
            if let Some(prev_width) = prev {
                if width as f32 - margin > prev_width as f32 {
                    if let Some(&pos) = gaps.get(&width).and_then(|p| p.last()) {
                        log::trace!("split point at {} (gap {} after {})", pos, width, prev_width);
                        points.push(pos);
                    }
                }
            }
            prev = Some(width);
        }
        points.sort_unstable();
    }
    points
}

/// Lazy sequence of sub-runs produced by [`split_run`].
///
/// Each sub-run ends with (and includes) the whitespace at its split point.
#[derive(Debug, Clone)]
pub struct SplitRuns<'a> {
    run: &'a [TextChar],
    points: std::vec::IntoIter<usize>,
    start: usize,
    done: bool,
}

impl<'a> Iterator for SplitRuns<'a> {
    type Item = &'a [TextChar];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.points.next() {
            Some(point) => {
                let sub = &self.run[self.start..=point];
                self.start = point + 1;
                Some(sub)
            },
            None => {
                self.done = true;
                Some(&self.run[self.start..])
            },
        }
    }
}

impl FusedIterator for SplitRuns<'_> {}

/// Split a sorted run at its column gaps.
///
/// An empty run yields nothing; a run without qualifying gaps yields itself.
///
/// # Examples
///
/// ```
/// use pdf_strata::geometry::Rect;
/// use pdf_strata::layout::{split_run, TextChar};
///
/// let glyph = |t: &str, x: f32| TextChar::new(t, Rect::new(x, 90.0, 5.0, 10.0), "Times", 10.0, 2);
/// let space = |x: f32| TextChar::new(" ", Rect::new(x, 90.0, 2.0, 10.0), "Times", 10.0, 2);
///
/// // "a b    c": word gap 5, column gap 60
/// let run = vec![glyph("a", 0.0), space(5.0), glyph("b", 10.0), space(15.0), glyph("c", 75.0)];
/// let parts: Vec<_> = split_run(&run, 7.0).collect();
/// assert_eq!(parts.len(), 2);
/// assert_eq!(parts[0].len(), 4);
/// assert_eq!(parts[1][0].text, "c");
/// ```
pub fn split_run(run: &[TextChar], margin: f32) -> SplitRuns<'_> {
    let points = if run.is_empty() {
        Vec::new()
    } else {
        split_points(run, margin)
    };
    SplitRuns {
        run,
        points: points.into_iter(),
        start: 0,
        done: run.is_empty(),
    }
}
