//! Text patterns used to classify lines and regions.
//!
//! Captions are discarded, bibliography headers and reference anchors are
//! always kept, and the "meaningful" test ranks lines as column anchors.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Figure and table captions. The dot after `Fig`/`FIG` matches any character.
    static ref CAPTION: Regex = Regex::new(r"^(Fig.|FIG.|Figure|FIGURE|Table|TABLE)").unwrap();

    /// `[1]`, `[Ab]` or `12.` followed by the reference body.
    static ref REFERENCE_ANCHOR: Regex = Regex::new(r"(^\[\w{1,3}\]|^\d{1,3}\.\D)(.+)").unwrap();

    /// Headers such as `References`, `7. Bibliography` or `(A) REFERENCES:`.
    static ref BIB_HEADER: Regex = Regex::new(
        r"(?mi)^\(?[A-Za-z0-9]{0,3}(\)|\.)?\s?(Reference|References|Bibliography)\s?[[:punct:]]?\s*$"
    )
    .unwrap();
}

/// True if the text starts like a figure or table caption.
///
/// # Examples
///
/// ```
/// use pdf_strata::layout::patterns::is_caption;
///
/// assert!(is_caption("Fig. 3: Model overview"));
/// assert!(is_caption("TABLE 1 Results"));
/// assert!(!is_caption("The figure shows"));
/// ```
pub fn is_caption(text: &str) -> bool {
    CAPTION.is_match(text)
}

/// True if any line of the text is a bibliography header.
pub fn is_bibliography_header(text: &str) -> bool {
    BIB_HEADER.is_match(text)
}

/// True if the text starts with a reference anchor followed by more than
/// three characters of body. Whitespace is ignored, so `[ 1 ]` counts as `[1]`.
///
/// # Examples
///
/// ```
/// use pdf_strata::layout::patterns::starts_with_reference_anchor;
///
/// assert!(starts_with_reference_anchor("[12] A. Author. Title."));
/// assert!(starts_with_reference_anchor("3. Smith, J."));
/// assert!(!starts_with_reference_anchor("[1] ab"));
/// ```
pub fn starts_with_reference_anchor(text: &str) -> bool {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    REFERENCE_ANCHOR
        .captures(&compact)
        .and_then(|caps| caps.get(2))
        .map_or(false, |body| body.as_str().chars().count() > 3)
}

/// True if the text is likely genuine prose rather than noise.
///
/// Everything on page 1 is meaningful, as are bibliography headers. Otherwise
/// the trimmed text must be at least `min_len` characters long and contain
/// more letters than digits.
pub fn is_meaningful(text: &str, page_number: u32, min_len: usize) -> bool {
    if page_number == 1 || is_bibliography_header(text) {
        return true;
    }

    let trimmed = text.trim();
    if trimmed.chars().count() < min_len {
        return false;
    }

    let (letters, digits) = trimmed.chars().fold((0usize, 0usize), |(l, d), c| {
        if c.is_alphabetic() {
            (l + 1, d)
        } else if c.is_numeric() {
            (l, d + 1)
        } else {
            (l, d)
        }
    });
    letters > digits
}
