//! Geometric primitives for layout segmentation.
//!
//! This module provides the rectangle type and the tolerance-based comparators
//! used throughout the segmentation algorithms. Coordinates follow the decoder's
//! page space: x grows to the right, y grows downwards, so a glyph's baseline
//! is the bottom edge of its box.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A 2D point in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: f32,
    /// Y coordinate of top-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its minimum and maximum corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::geometry::Rect;
    ///
    /// let rect = Rect::from_points(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(rect.x, 10.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn from_points(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Get the center point of the rectangle.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// True if all four components are finite and the extent is non-negative.
    pub fn is_well_formed(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// Check if the horizontal ranges of both rectangles overlap.
    ///
    /// Touching edges count as overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::geometry::Rect;
    ///
    /// let r1 = Rect::new(0.0, 0.0, 10.0, 10.0);
    /// let r2 = Rect::new(5.0, 100.0, 10.0, 10.0);
    /// let r3 = Rect::new(20.0, 0.0, 10.0, 10.0);
    ///
    /// assert!(r1.overlaps_horizontally(&r2));
    /// assert!(!r1.overlaps_horizontally(&r3));
    /// ```
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.left() <= other.right() && other.left() <= self.right()
    }

    /// Check if the vertical ranges of both rectangles overlap.
    ///
    /// Touching edges count as overlap.
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.top() <= other.bottom() && other.top() <= self.bottom()
    }

    /// Check if this rectangle intersects with another.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Check if this rectangle contains a point.
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Check if this rectangle fully contains another one.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Compute the union of this rectangle with another.
    ///
    /// Returns the smallest rectangle that contains both rectangles.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::geometry::Rect;
    ///
    /// let r1 = Rect::new(0.0, 0.0, 50.0, 50.0);
    /// let r2 = Rect::new(25.0, 25.0, 50.0, 50.0);
    /// let union = r1.union(&r2);
    ///
    /// assert_eq!(union.x, 0.0);
    /// assert_eq!(union.right(), 75.0);
    /// assert_eq!(union.bottom(), 75.0);
    /// ```
    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.left().min(other.left());
        let y0 = self.top().min(other.top());
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect::from_points(x0, y0, x1, y1)
    }

    /// Union of all rectangles yielded by the iterator, `None` if it is empty.
    pub fn union_all<'a, I>(rects: I) -> Option<Rect>
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        rects
            .into_iter()
            .fold(None, |acc: Option<Rect>, r| Some(acc.map_or(*r, |a| a.union(r))))
    }

    /// Compute the area of the rectangle.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Compare two coordinates, treating them as equal within `tolerance`.
///
/// Returns `Less` iff `a < b - tolerance`, `Greater` iff `a > b + tolerance`
/// and `Equal` otherwise, so `compare(a, b, t) == compare(b, a, t).reverse()`.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use pdf_strata::geometry::compare;
///
/// assert_eq!(compare(10.0, 12.0, 5.0), Ordering::Equal);
/// assert_eq!(compare(10.0, 20.0, 5.0), Ordering::Less);
/// assert_eq!(compare(20.0, 10.0, 5.0), Ordering::Greater);
/// ```
pub fn compare(a: f32, b: f32, tolerance: f32) -> Ordering {
    // a - b is exactly -(b - a) in IEEE arithmetic
    let delta = a - b;
    if delta < -tolerance {
        Ordering::Less
    } else if delta > tolerance {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Five-way relative order of two lines along one axis.
///
/// Describes the first line relative to the second one. The `Far*` outcomes
/// signal that the lines most likely belong to different columns (horizontal)
/// or different blocks (vertical), not merely that they are offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelativeOrder {
    /// First line lies beyond the far side of the second one, before it.
    FarBefore = -2,
    /// First line comes before the second one.
    Before = -1,
    /// Same position within tolerance.
    Equal = 0,
    /// First line comes after the second one.
    After = 1,
    /// First line lies beyond the far side of the second one, after it.
    FarAfter = 2,
}

impl RelativeOrder {
    /// Numeric value in `-2..=2`.
    pub fn value(self) -> i8 {
        self as i8
    }

    /// True for `Before`, `Equal` and `After` (`|value| < 2`).
    pub fn is_near(self) -> bool {
        self.value().abs() < 2
    }

    /// The order seen from the other line.
    pub fn reverse(self) -> Self {
        match self {
            Self::FarBefore => Self::FarAfter,
            Self::Before => Self::After,
            Self::Equal => Self::Equal,
            Self::After => Self::Before,
            Self::FarAfter => Self::FarBefore,
        }
    }
}

/// Horizontal extent of a line: where it starts, where its last glyph ends,
/// and how many characters its text has.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalExtent {
    /// Left edge of the line
    pub start: f32,
    /// Right edge of the last non-whitespace glyph
    pub end: f32,
    /// Number of characters of the line's text
    pub char_count: usize,
}

/// Vertical extent of a line: its baseline and its height above the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalExtent {
    /// Baseline y-coordinate
    pub baseline: f32,
    /// Height of the tallest glyph
    pub height: f32,
}

/// Compare the horizontal position of two lines.
///
/// The tolerance is self-calibrating: the first line's extent divided by its
/// character count, i.e. an estimate of its average glyph width. When the
/// starts differ by more than that, the outcome is `Before`/`After`, and
/// `FarBefore`/`FarAfter` when one line starts beyond the *end* of the other.
///
/// With `use_line_end`, both lines are mirrored so that their line ends are
/// compared instead of their starts.
pub fn horizontal_order(
    line1: &HorizontalExtent,
    line2: &HorizontalExtent,
    use_line_end: bool,
) -> RelativeOrder {
    let (x1, y1, x2, y2) = if use_line_end {
        (-line2.end, -line2.start, -line1.end, -line1.start)
    } else {
        (line1.start, line1.end, line2.start, line2.end)
    };

    let tolerance = if line1.char_count == 0 {
        0.0
    } else {
        (x1 - y1).abs() / line1.char_count as f32
    };
    let delta = (x1 - x2).abs();

    if delta <= tolerance {
        RelativeOrder::Equal
    } else if x2 > x1 {
        if x2 > y1 {
            RelativeOrder::FarBefore
        } else {
            RelativeOrder::Before
        }
    } else if x1 > x2 {
        if x1 > y2 {
            RelativeOrder::FarAfter
        } else {
            RelativeOrder::After
        }
    } else {
        RelativeOrder::Equal
    }
}

/// Compare the vertical position of two lines.
///
/// Lines whose vertical ranges overlap (with `slack` on either side of the
/// first line) are `Equal`, which keeps super- and subscripts glued to their
/// base line. Otherwise lines within `2 × height` of the first line are
/// `Before`/`After`, anything further away is `FarBefore`/`FarAfter`.
///
/// # Examples
///
/// ```
/// use pdf_strata::geometry::{vertical_order, RelativeOrder, VerticalExtent};
///
/// let a = VerticalExtent { baseline: 200.0, height: 10.0 };
/// let b = VerticalExtent { baseline: 195.0, height: 10.0 };
/// let c = VerticalExtent { baseline: 180.0, height: 10.0 };
///
/// assert_eq!(vertical_order(&a, &b, 0.5), RelativeOrder::Equal);
/// assert_eq!(vertical_order(&a, &c, 0.5), RelativeOrder::FarAfter);
/// ```
pub fn vertical_order(
    line1: &VerticalExtent,
    line2: &VerticalExtent,
    slack: f32,
) -> RelativeOrder {
    let top1 = line1.baseline - line1.height;
    let bottom1 = line1.baseline;
    let top2 = line2.baseline - line2.height;
    let bottom2 = line2.baseline;

    let overlaps = (top2 >= top1 - slack && top2 <= bottom1 + slack)
        || (bottom2 >= top1 - slack && bottom2 <= bottom1 + slack);
    if overlaps {
        return RelativeOrder::Equal;
    }

    let tolerance = 2.0 * line1.height;
    let delta = (top2 - bottom1).abs();
    let near = delta <= tolerance;

    match bottom1.partial_cmp(&bottom2) {
        Some(Ordering::Less) if near => RelativeOrder::Before,
        Some(Ordering::Less) => RelativeOrder::FarBefore,
        Some(Ordering::Greater) if near => RelativeOrder::After,
        Some(Ordering::Greater) => RelativeOrder::FarAfter,
        _ => RelativeOrder::Equal,
    }
}
