//! Page and document segmentation pipeline.
//!
//! ```text
//! Page (positioned glyphs)
//!     ↓
//! [line_runs] or [XY-cut pre-segmentation + line_runs per block]
//!     ↓
//! nominal runs
//!     ↓
//! [enrich + sort + split_run] → [build_line]
//!     ↓
//! TextLine[]
//!     ↓
//! [sort_by_meaningfulness → fill_columns → group_regions]
//!     ↓
//! PageLayout (kept and discarded regions in reading order)
//! ```
//!
//! Pages are independent of each other; [`DocumentSegmenter`] runs the page
//! pipeline over every selected page and assembles the results in page order.

pub mod config;

pub use config::SegmentationConfig;

use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::layout::{
    build_line, enrich_word_separators, fill_columns, group_regions, line_runs,
    sort_by_meaningfulness, sort_run, split_run, DocumentStatistics, PageStatistics, Region,
    TextBlock, TextBlockCutter, TextChar, TextLine, XyCut,
};
use crate::utils::safe_float_cmp;
use serde::{Deserialize, Serialize};

/// A page as delivered by the glyph decoder.
///
/// The page number is checked on construction and on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPage")]
pub struct Page {
    number: u32,
    bbox: Rect,
    chars: Vec<TextChar>,
}

#[derive(Deserialize)]
struct RawPage {
    number: u32,
    bbox: Rect,
    chars: Vec<TextChar>,
}

impl TryFrom<RawPage> for Page {
    type Error = Error;

    fn try_from(raw: RawPage) -> Result<Self> {
        Page::new(raw.number, raw.bbox, raw.chars)
    }
}

impl Page {
    /// Create a page. Page numbers start at 1.
    pub fn new(number: u32, bbox: Rect, chars: Vec<TextChar>) -> Result<Self> {
        if number == 0 {
            return Err(Error::InvalidPageNumber(number));
        }
        Ok(Self {
            number,
            bbox,
            chars,
        })
    }

    /// 1-based page number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Page bounding box.
    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    /// Glyphs in decoder order.
    pub fn chars(&self) -> &[TextChar] {
        &self.chars
    }
}

/// Segmentation result of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// 1-based page number
    pub page_number: u32,
    /// Kept regions in reading order
    pub regions: Vec<Region>,
    /// Regions rejected by the region verdict, in reading order
    pub discarded: Vec<Region>,
    /// Statistics of the page's glyphs
    pub statistics: PageStatistics,
    /// Text of every line built on the page, in build order
    pub text: String,
}

impl PageLayout {
    /// Kept lines in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.regions.iter().flat_map(|r| r.lines.iter())
    }

    /// Serialize the layout as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Segmentation result of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Page results ordered by page number
    pub pages: Vec<PageLayout>,
    /// Statistics over all segmented pages
    pub statistics: DocumentStatistics,
    /// Text of every line built, page by page
    pub full_text: String,
}

impl DocumentLayout {
    /// Kept lines of all pages in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.pages.iter().flat_map(|p| p.lines())
    }

    /// Kept regions of all pages in reading order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.pages.iter().flat_map(|p| p.regions.iter())
    }

    /// Serialize the layout as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Segments a single page.
///
/// # Examples
///
/// ```
/// use pdf_strata::geometry::Rect;
/// use pdf_strata::layout::TextChar;
/// use pdf_strata::pipeline::{Page, PageSegmenter};
///
/// let chars: Vec<TextChar> = "Title"
///     .chars()
///     .enumerate()
///     .map(|(i, c)| {
///         TextChar::new(c.to_string(), Rect::new(i as f32 * 6.0, 90.0, 6.0, 10.0), "Times", 10.0, 1)
///     })
///     .collect();
/// let page = Page::new(1, Rect::new(0.0, 0.0, 612.0, 792.0), chars).unwrap();
///
/// let layout = PageSegmenter::new().segment(&page);
/// assert_eq!(layout.regions.len(), 1);
/// assert_eq!(layout.text, "Title ");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PageSegmenter {
    config: SegmentationConfig,
}

impl PageSegmenter {
    /// Create a segmenter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a segmenter with custom configuration.
    pub fn with_config(config: SegmentationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Segment a page from its decoder-ordered glyph stream.
    pub fn segment(&self, page: &Page) -> PageLayout {
        let statistics = PageStatistics::analyze(&page.chars);
        let runs = if self.config.pre_segment {
            self.pre_segmented_runs(page, &statistics)
        } else {
            line_runs(&page.chars, self.config.vertical_slack)
        };
        self.layout_from_runs(page.number, runs, statistics)
    }

    /// Segment a page whose glyphs are already grouped into nominal lines.
    pub fn segment_runs(&self, page_number: u32, runs: Vec<Vec<TextChar>>) -> PageLayout {
        let statistics = PageStatistics::analyze(runs.iter().flatten());
        self.layout_from_runs(page_number, runs, statistics)
    }

    /// Partition a page's glyphs into XY-cut blocks.
    pub fn cut_blocks(&self, page: &Page, statistics: &PageStatistics) -> Vec<TextBlock> {
        let mut chars = page.chars.clone();
        enrich_word_separators(&mut chars);

        // Separators ahead of the first real glyph have no usable position
        let mut seen_real = false;
        chars.retain(|c| {
            seen_real |= c.is_real();
            !c.is_malformed() && (seen_real || !c.is_word_separator)
        });

        TextBlockCutter::new(self.config.lane_multiplier)
            .with_statistics(*statistics)
            .cut(chars)
    }

    fn pre_segmented_runs(&self, page: &Page, statistics: &PageStatistics) -> Vec<Vec<TextChar>> {
        let blocks = self.cut_blocks(page, statistics);
        log::debug!("page {}: {} XY-cut blocks", page.number, blocks.len());

        let mut runs = Vec::new();
        for block in blocks {
            let mut chars = block.chars;
            chars.sort_by(|a, b| {
                (a.baseline().round() as i64)
                    .cmp(&(b.baseline().round() as i64))
                    .then_with(|| safe_float_cmp(a.bbox.x, b.bbox.x))
            });
            runs.extend(line_runs(&chars, self.config.vertical_slack));
        }
        runs
    }

    /// Build the lines of a page, splitting runs at column gaps when enabled.
    pub fn build_lines(&self, page_number: u32, runs: Vec<Vec<TextChar>>) -> Vec<TextLine> {
        let config = &self.config;
        let mut lines = Vec::new();
        let mut index = 0;

        for mut run in runs {
            if !config.split_lines {
                if let Some(line) = build_line(&run, page_number, index, config) {
                    index += 1;
                    lines.push(line);
                }
                continue;
            }

            enrich_word_separators(&mut run);
            sort_run(&mut run);
            for sub_run in split_run(&run, config.split_margin) {
                if let Some(line) = build_line(sub_run, page_number, index, config) {
                    index += 1;
                    if line.height > 0.0 {
                        lines.push(line);
                    } else {
                        log::trace!("dropping flat line {}", line);
                    }
                }
            }
        }

        lines
    }

    fn layout_from_runs(
        &self,
        page_number: u32,
        runs: Vec<Vec<TextChar>>,
        statistics: PageStatistics,
    ) -> PageLayout {
        let lines = self.build_lines(page_number, runs);
        let text: String = lines.iter().map(|l| l.text.as_str()).collect();
        log::debug!("page {}: {} lines", page_number, lines.len());

        let (regions, discarded): (Vec<Region>, Vec<Region>) = if self.config.split_lines {
            let mut lines = lines;
            sort_by_meaningfulness(&mut lines);
            let columns = fill_columns(lines);
            group_regions(columns, &self.config)
                .into_iter()
                .partition(|region| region.consider)
        } else {
            let regions = lines.into_iter().map(Region::unfiltered).collect();
            (regions, Vec::new())
        };

        PageLayout {
            page_number,
            regions,
            discarded,
            statistics,
            text,
        }
    }
}

/// Segments every selected page of a document.
#[derive(Debug, Clone, Default)]
pub struct DocumentSegmenter {
    page_segmenter: PageSegmenter,
}

impl DocumentSegmenter {
    /// Create a segmenter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a segmenter with custom configuration.
    pub fn with_config(config: SegmentationConfig) -> Result<Self> {
        Ok(Self {
            page_segmenter: PageSegmenter::with_config(config)?,
        })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &SegmentationConfig {
        self.page_segmenter.config()
    }

    fn selected<'a>(&self, pages: &'a [Page]) -> Vec<&'a Page> {
        pages
            .iter()
            .filter(|page| self.config().includes_page(page.number))
            .collect()
    }

    /// Segment the pages one after another.
    pub fn segment(&self, pages: &[Page]) -> DocumentLayout {
        let selected = self.selected(pages);
        let layouts = selected
            .iter()
            .map(|page| self.page_segmenter.segment(page))
            .collect();
        assemble(&selected, layouts)
    }

    /// Segment the pages concurrently.
    ///
    /// The result is identical to [`DocumentSegmenter::segment`].
    #[cfg(feature = "parallel")]
    pub fn segment_parallel(&self, pages: &[Page]) -> DocumentLayout {
        use rayon::prelude::*;

        let selected = self.selected(pages);
        let layouts = selected
            .par_iter()
            .map(|page| self.page_segmenter.segment(page))
            .collect();
        assemble(&selected, layouts)
    }
}

fn assemble(selected: &[&Page], layouts: Vec<PageLayout>) -> DocumentLayout {
    let mut pages = layouts;
    pages.sort_by_key(|layout| layout.page_number);

    let statistics = DocumentStatistics::analyze(selected.iter().map(|page| page.chars.as_slice()));
    let full_text = pages.iter().map(|layout| layout.text.as_str()).collect();

    DocumentLayout {
        pages,
        statistics,
        full_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_char(text: &str, x: f32, baseline: f32, page: u32) -> TextChar {
        TextChar::new(text, Rect::new(x, baseline - 10.0, 5.0, 10.0), "Times-Roman", 10.0, page)
    }

    /// One glyph per character, 5 units wide; spaces become word separators.
    fn mock_text(text: &str, x: f32, baseline: f32, page: u32) -> Vec<TextChar> {
        text.chars()
            .enumerate()
            .map(|(i, ch)| {
                let cx = x + 5.0 * i as f32;
                if ch == ' ' {
                    TextChar::word_separator(Rect::new(cx, baseline - 10.0, 0.0, 10.0), page)
                } else {
                    mock_char(&ch.to_string(), cx, baseline, page)
                }
            })
            .collect()
    }

    fn page_bbox() -> Rect {
        Rect::new(0.0, 0.0, 612.0, 792.0)
    }

    #[test]
    fn test_page_number_zero_rejected() {
        assert!(matches!(Page::new(0, page_bbox(), Vec::new()), Err(Error::InvalidPageNumber(0))));
    }

    #[test]
    fn test_page_deserialization_checks_number() {
        let page = Page::new(3, page_bbox(), mock_text("ab", 0.0, 100.0, 3)).unwrap();
        let json = serde_json::to_string(&page).unwrap();
        let back: Page = serde_json::from_str(&json).unwrap();
        assert_eq!(back, page);
        assert_eq!(back.number(), 3);
        assert_eq!(back.chars().len(), 2);

        let zero = json.replacen("\"number\":3", "\"number\":0", 1);
        assert_ne!(zero, json);
        let err = serde_json::from_str::<Page>(&zero).unwrap_err();
        assert!(err.to_string().contains("Invalid page number: 0"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SegmentationConfig::default().with_vertical_slack(-1.0);
        assert!(PageSegmenter::with_config(config.clone()).is_err());
        assert!(DocumentSegmenter::with_config(config).is_err());
    }

    #[test]
    fn test_empty_page() {
        let page = Page::new(3, page_bbox(), Vec::new()).unwrap();
        let layout = PageSegmenter::new().segment(&page);
        assert!(layout.regions.is_empty());
        assert!(layout.discarded.is_empty());
        assert_eq!(layout.text, "");
    }

    #[test]
    fn test_build_lines_splits_columns() {
        let mut run = mock_text("left col", 0.0, 100.0, 2);
        run.push(TextChar::word_separator(Rect::new(0.0, 0.0, 0.0, 0.0), 2));
        run.extend(mock_text("right col", 300.0, 100.0, 2));

        let lines = PageSegmenter::new().build_lines(2, vec![run]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "left col ");
        assert_eq!(lines[1].text, "right col ");
        assert_eq!(lines[1].x, 300.0);
        assert_eq!(lines[1].index, 1);
    }

    #[test]
    fn test_non_split_mode_keeps_everything() {
        let config = SegmentationConfig::default().with_split_lines(false);
        let segmenter = PageSegmenter::with_config(config).unwrap();

        let mut run = mock_text("left col", 0.0, 100.0, 2);
        run.push(TextChar::word_separator(Rect::new(0.0, 0.0, 0.0, 0.0), 2));
        run.extend(mock_text("right col", 300.0, 100.0, 2));

        let layout = segmenter.segment_runs(2, vec![run, mock_text("Fig. 1", 0.0, 300.0, 2)]);
        assert_eq!(layout.regions.len(), 2);
        assert!(layout.discarded.is_empty());
        assert_eq!(layout.regions[0].lines[0].text, "left col right col ");
        assert!(layout.regions.iter().all(|r| r.consider));
    }

    #[test]
    fn test_flat_lines_dropped() {
        let mut run = mock_text("flat", 0.0, 100.0, 2);
        for c in run.iter_mut() {
            c.bbox.height = 0.0;
        }
        let lines = PageSegmenter::new().build_lines(2, vec![run]);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_pre_segment_matches_plain_on_simple_page() {
        let mut chars = mock_text("References", 0.0, 100.0, 4);
        chars.extend(mock_text("[1] A. Author. A title of a paper.", 0.0, 114.0, 4));
        let page = Page::new(4, page_bbox(), chars).unwrap();

        let plain = PageSegmenter::new().segment(&page);
        let config = SegmentationConfig::default().with_pre_segment(true);
        let cut = PageSegmenter::with_config(config).unwrap().segment(&page);

        let plain_text: Vec<&str> = plain.lines().map(|l| l.text.as_str()).collect();
        let cut_text: Vec<&str> = cut.lines().map(|l| l.text.as_str()).collect();
        assert_eq!(plain_text, vec!["References ", "[1] A. Author. A title of a paper. "]);
        assert_eq!(plain_text, cut_text);
    }

    #[test]
    fn test_cut_blocks_two_columns() {
        let mut chars = mock_text("left", 0.0, 100.0, 2);
        chars.extend(mock_text("right", 300.0, 100.0, 2));
        let page = Page::new(2, page_bbox(), chars).unwrap();

        let segmenter = PageSegmenter::new();
        let stats = PageStatistics::analyze(&page.chars);
        let blocks = segmenter.cut_blocks(&page, &stats);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "left");
        assert_eq!(blocks[1].text, "right");
    }

    #[test]
    fn test_document_page_range_and_order() {
        let pages: Vec<Page> = [3u32, 1, 2]
            .iter()
            .map(|&n| Page::new(n, page_bbox(), mock_text("Heading", 0.0, 100.0, n)).unwrap())
            .collect();

        let config = SegmentationConfig::default().with_page_range(1, 2);
        let layout = DocumentSegmenter::with_config(config).unwrap().segment(&pages);
        let numbers: Vec<u32> = layout.pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(layout.statistics.page_count, 2);
        assert_eq!(layout.full_text, "Heading Heading ");
    }

    #[test]
    fn test_layout_to_json() {
        let page = Page::new(1, page_bbox(), mock_text("Title", 0.0, 100.0, 1)).unwrap();
        let layout = PageSegmenter::new().segment(&page);
        let json = layout.to_json().unwrap();
        assert!(json.contains("\"page_number\": 1"));

        let back: PageLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }
}
