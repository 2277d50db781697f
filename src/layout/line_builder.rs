//! Aggregation of a glyph run into a [`TextLine`].

use crate::geometry::Rect;
use crate::layout::patterns::is_meaningful;
use crate::layout::text_block::{most_common, FontFlags, TextChar};
use crate::layout::text_line::TextLine;
use crate::pipeline::SegmentationConfig;
use indexmap::IndexMap;

/// Build one line from a (possibly split) glyph run.
///
/// Returns `None` if the run holds no real glyph. Malformed glyphs are
/// skipped; word separators contribute `config.word_separator` to the text.
///
/// - `x`/`y` come from the first glyph with minimal x.
/// - `height` is the tallest real glyph, `x_of_line_end` the rightmost right
///   edge of a real glyph.
/// - The dominant font size (rounded, non-zero) and font name are the mode over
///   the single ASCII letters and digits of the run; ties go to the value seen
///   first.
/// - A trailing `-` is stripped. Otherwise `config.line_separator` is appended,
///   unless the run already ends in whitespace.
///
/// # Examples
///
/// ```
/// use pdf_strata::geometry::Rect;
/// use pdf_strata::layout::{build_line, TextChar};
/// use pdf_strata::pipeline::SegmentationConfig;
///
/// let chars = vec![
///     TextChar::new("O", Rect::new(0.0, 88.0, 8.0, 12.0), "Times-Bold", 12.0, 1),
///     TextChar::new("K", Rect::new(8.0, 88.0, 8.0, 12.0), "Times-Bold", 12.0, 1),
/// ];
/// let line = build_line(&chars, 1, 0, &SegmentationConfig::default()).unwrap();
/// assert_eq!(line.text, "OK ");
/// assert_eq!(line.height, 12.0);
/// assert!(line.is_uppercase);
/// assert!(line.meaningful);
/// ```
pub fn build_line(
    run: &[TextChar],
    page_number: u32,
    index: usize,
    config: &SegmentationConfig,
) -> Option<TextLine> {
    let mut text = String::new();
    let mut leftmost: Option<&TextChar> = None;
    let mut bbox: Option<Rect> = None;
    let mut height = 0.0f32;
    let mut x_of_line_end = f32::MIN;
    let mut font_sizes: IndexMap<i64, usize> = IndexMap::new();
    let mut fonts: IndexMap<&str, usize> = IndexMap::new();
    let mut letters = 0usize;
    let mut uppercase = 0usize;
    let mut ends_with_gap = false;

    for c in run {
        if c.is_malformed() {
            log::trace!("skipping malformed glyph {:?} at {:?}", c.text, c.bbox);
            continue;
        }
        if c.is_word_separator {
            text.push_str(&config.word_separator);
            ends_with_gap = true;
            continue;
        }

        text.push_str(&c.text);
        ends_with_gap = c.is_gap_candidate();
        bbox = Some(bbox.map_or(c.bbox, |b| b.union(&c.bbox)));
        if ends_with_gap {
            continue;
        }

        if leftmost.map_or(true, |l| c.bbox.x < l.bbox.x) {
            leftmost = Some(c);
        }
        height = height.max(c.bbox.height);
        x_of_line_end = x_of_line_end.max(c.bbox.right());

        if c.is_alphanumeric() {
            let size = c.font_size.round() as i64;
            if size > 0 {
                *font_sizes.entry(size).or_insert(0) += 1;
            }
            *fonts.entry(c.font_name.as_str()).or_insert(0) += 1;
        }

        for ch in c.text.chars().filter(|ch| ch.is_alphabetic()) {
            letters += 1;
            if ch.is_uppercase() {
                uppercase += 1;
            }
        }
    }

    let leftmost = leftmost?;

    if text.ends_with('-') {
        text.pop();
    } else if !ends_with_gap {
        text.push_str(&config.line_separator);
    }

    let font_name = most_common(&fonts).map(str::to_string);
    let font_flags = font_name
        .as_deref()
        .map(FontFlags::from_font_name)
        .unwrap_or_default();
    let font_size = most_common(&font_sizes).map_or(0.0, |s| s as f32);
    let meaningful = is_meaningful(&text, page_number, config.min_meaningful_len);
    let x = leftmost.bbox.x;

    Some(TextLine {
        x,
        y: leftmost.baseline(),
        y_lower_left: leftmost.bbox.bottom(),
        width: x_of_line_end - x,
        height,
        x_of_line_end,
        bbox: bbox.unwrap_or(leftmost.bbox),
        page_number,
        text,
        font_size,
        font_name,
        font_flags,
        is_uppercase: letters > 0 && uppercase == letters,
        meaningful,
        pending: true,
        index,
        provenance: vec![index],
        chars: run.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_char(text: &str, x: f32, font: &str) -> TextChar {
        TextChar::new(text, Rect::new(x, 90.0, 5.0, 10.0), font, 10.0, 2)
    }

    fn mock_run(text: &str, font: &str) -> Vec<TextChar> {
        text.chars()
            .enumerate()
            .map(|(i, ch)| {
                if ch == ' ' {
                    TextChar::word_separator(Rect::new(i as f32 * 5.0, 90.0, 0.0, 10.0), 2)
                } else {
                    mock_char(&ch.to_string(), i as f32 * 5.0, font)
                }
            })
            .collect()
    }

    fn config() -> SegmentationConfig {
        SegmentationConfig::default()
    }

    #[test]
    fn test_empty_and_whitespace_runs() {
        assert!(build_line(&[], 2, 0, &config()).is_none());

        let blank = vec![
            TextChar::word_separator(Rect::new(0.0, 0.0, 0.0, 0.0), 2),
            mock_char(" ", 5.0, "Times"),
        ];
        assert!(build_line(&blank, 2, 0, &config()).is_none());
    }

    #[test]
    fn test_geometry() {
        let mut run = mock_run("ab c", "Times-Roman");
        run[1].bbox.height = 14.0;
        run[1].bbox.y = 86.0;

        let line = build_line(&run, 2, 4, &config()).unwrap();
        assert_eq!(line.x, 0.0);
        assert_eq!(line.y, 100.0);
        assert_eq!(line.height, 14.0);
        assert_eq!(line.x_of_line_end, 20.0);
        assert_eq!(line.width, 20.0);
        assert_eq!(line.index, 4);
        assert_eq!(line.provenance, vec![4]);
        assert!(line.pending);
        assert_eq!(line.chars.len(), 4);
        for c in run.iter().filter(|c| c.is_real()) {
            assert!(line.bbox.contains_rect(&c.bbox));
        }
    }

    #[test]
    fn test_leftmost_glyph_defines_origin() {
        // Unsorted run: the leftmost glyph is not the first one
        let mut run = vec![mock_char("b", 10.0, "Times"), mock_char("a", 0.0, "Times")];
        run[1].bbox.y = 92.0;
        run[1].origin_y = 102.0;
        let line = build_line(&run, 2, 0, &config()).unwrap();
        assert_eq!(line.x, 0.0);
        assert_eq!(line.y, 102.0);
        assert_eq!(line.text, "ba ");
    }

    #[test]
    fn test_descender_does_not_move_baseline() {
        let mut p = mock_char("p", 0.0, "Times");
        p.bbox = Rect::new(0.0, 92.0, 5.0, 11.0);
        let run = vec![p, mock_char("a", 5.0, "Times")];

        let line = build_line(&run, 2, 0, &config()).unwrap();
        assert_eq!(line.y, 100.0);
        assert_eq!(line.y_lower_left, 103.0);
        assert_eq!(line.height, 11.0);
        assert!(line.bbox.contains_rect(&run[0].bbox));
    }

    #[test]
    fn test_text_and_separators() {
        let line = build_line(&mock_run("ab cd", "Times"), 2, 0, &config()).unwrap();
        assert_eq!(line.text, "ab cd ");

        let custom = config().with_word_separator("_").with_line_separator("\n");
        let line = build_line(&mock_run("ab cd", "Times"), 2, 0, &custom).unwrap();
        assert_eq!(line.text, "ab_cd\n");
    }

    #[test]
    fn test_trailing_hyphen_stripped() {
        let line = build_line(&mock_run("hyphen-", "Times"), 2, 0, &config()).unwrap();
        assert_eq!(line.text, "hyphen");
    }

    #[test]
    fn test_trailing_separator_no_line_separator() {
        let line = build_line(&mock_run("ab ", "Times"), 2, 0, &config()).unwrap();
        assert_eq!(line.text, "ab ");
    }

    #[test]
    fn test_dominant_font_and_flags() {
        let mut run = mock_run("abcd", "Times-BoldItalic");
        run[2].font_name = "Times-Roman".to_string();
        run.push(mock_char(",", 20.0, "Symbol"));
        run.push(mock_char(";", 25.0, "Symbol"));
        run.push(mock_char(":", 30.0, "Symbol"));
        run.push(mock_char(".", 35.0, "Symbol"));

        let line = build_line(&run, 2, 0, &config()).unwrap();
        assert_eq!(line.font_name.as_deref(), Some("Times-BoldItalic"));
        assert_eq!(line.font_flags, FontFlags::BOLD | FontFlags::ITALIC);
    }

    #[test]
    fn test_font_tie_first_seen() {
        let run = vec![mock_char("a", 0.0, "Beta"), mock_char("b", 5.0, "Alpha")];
        let line = build_line(&run, 2, 0, &config()).unwrap();
        assert_eq!(line.font_name.as_deref(), Some("Beta"));
    }

    #[test]
    fn test_font_size_mode_ignores_zero() {
        let mut run = mock_run("abc", "Times");
        run[0].font_size = 0.2;
        run[1].font_size = 0.3;
        run[2].font_size = 9.6;
        let line = build_line(&run, 2, 0, &config()).unwrap();
        assert_eq!(line.font_size, 10.0);
    }

    #[test]
    fn test_uppercase_requires_every_letter() {
        let line = build_line(&mock_run("ABSTRACT", "Times"), 2, 0, &config()).unwrap();
        assert!(line.is_uppercase);

        let line = build_line(&mock_run("ABSTRACt", "Times"), 2, 0, &config()).unwrap();
        assert!(!line.is_uppercase);

        let line = build_line(&mock_run("1234", "Times"), 2, 0, &config()).unwrap();
        assert!(!line.is_uppercase);
    }

    #[test]
    fn test_malformed_glyphs_skipped() {
        let mut run = mock_run("abc", "Times");
        run[1].bbox.height = f32::NAN;
        let line = build_line(&run, 2, 0, &config()).unwrap();
        assert_eq!(line.text, "ac ");
        assert_eq!(line.height, 10.0);
        assert!(line.bbox.is_well_formed());
    }

    #[test]
    fn test_meaningful_classification() {
        let line = build_line(&mock_run("short", "Times"), 2, 0, &config()).unwrap();
        assert!(!line.meaningful);

        let line = build_line(&mock_run("short", "Times"), 1, 0, &config()).unwrap();
        assert!(line.meaningful);

        let prose = mock_run("a sentence long enough to count as real prose", "Times");
        let line = build_line(&prose, 2, 0, &config()).unwrap();
        assert!(line.meaningful);
    }
}
