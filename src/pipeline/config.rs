//! Configuration for the segmentation pipeline.
//!
//! Every threshold used by the splitter, the builder, the grouping pass and the
//! XY-cut partitioner lives here. The defaults reproduce the tuned values the
//! heuristics were developed against.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for page and document segmentation.
///
/// # Examples
///
/// ```
/// use pdf_strata::pipeline::SegmentationConfig;
///
/// let config = SegmentationConfig::default()
///     .with_split_margin(10.0)
///     .with_page_range(2, 5);
/// assert!(config.validate().is_ok());
/// assert!(config.includes_page(3));
/// assert!(!config.includes_page(1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// A gap width must exceed the next smaller one by more than this to split a line
    pub split_margin: f32,
    /// XY-cut lanes are this multiple of the most common glyph width/height
    pub lane_multiplier: f32,
    /// Slack allowed when testing two lines for vertical overlap
    pub vertical_slack: f32,
    /// Minimum trimmed length of a meaningful line (pages other than 1)
    pub min_meaningful_len: usize,
    /// Text emitted for a synthetic word separator
    pub word_separator: String,
    /// Text appended to a line that does not end in a hyphen or whitespace
    pub line_separator: String,
    /// Split runs at column gaps and group lines into columns and regions.
    ///
    /// When disabled every run becomes one line and is kept as is.
    pub split_lines: bool,
    /// Partition each page with XY-cut before detecting lines
    pub pre_segment: bool,
    /// Inclusive, 1-based range of pages to segment; all pages when `None`
    pub page_range: Option<(u32, u32)>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            split_margin: 7.0,
            lane_multiplier: 2.0,
            vertical_slack: 0.5,
            min_meaningful_len: 35,
            word_separator: " ".to_string(),
            line_separator: " ".to_string(),
            split_lines: true,
            pre_segment: false,
            page_range: None,
        }
    }
}

impl SegmentationConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gap margin of the line splitter.
    pub fn with_split_margin(mut self, margin: f32) -> Self {
        self.split_margin = margin;
        self
    }

    /// Set the XY-cut lane multiplier.
    pub fn with_lane_multiplier(mut self, multiplier: f32) -> Self {
        self.lane_multiplier = multiplier;
        self
    }

    /// Set the vertical overlap slack.
    pub fn with_vertical_slack(mut self, slack: f32) -> Self {
        self.vertical_slack = slack;
        self
    }

    /// Set the minimum length of a meaningful line.
    pub fn with_min_meaningful_len(mut self, len: usize) -> Self {
        self.min_meaningful_len = len;
        self
    }

    /// Set the text emitted for word separators.
    pub fn with_word_separator(mut self, separator: impl Into<String>) -> Self {
        self.word_separator = separator.into();
        self
    }

    /// Set the text appended at the end of a line.
    pub fn with_line_separator(mut self, separator: impl Into<String>) -> Self {
        self.line_separator = separator.into();
        self
    }

    /// Enable or disable line splitting and region grouping.
    pub fn with_split_lines(mut self, enabled: bool) -> Self {
        self.split_lines = enabled;
        self
    }

    /// Enable or disable XY-cut pre-segmentation.
    pub fn with_pre_segment(mut self, enabled: bool) -> Self {
        self.pre_segment = enabled;
        self
    }

    /// Limit segmentation to the pages `start..=end`.
    pub fn with_page_range(mut self, start: u32, end: u32) -> Self {
        self.page_range = Some((start, end));
        self
    }

    /// True if the page falls within the configured page range.
    pub fn includes_page(&self, page_number: u32) -> bool {
        self.page_range
            .map_or(true, |(start, end)| page_number >= start && page_number <= end)
    }

    /// Check that every tunable is usable.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("split_margin", self.split_margin),
            ("lane_multiplier", self.lane_multiplier),
            ("vertical_slack", self.vertical_slack),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        if let Some((start, end)) = self.page_range {
            if start == 0 || start > end {
                return Err(Error::InvalidPageRange { start, end });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SegmentationConfig::default();
        assert_eq!(config.split_margin, 7.0);
        assert_eq!(config.lane_multiplier, 2.0);
        assert_eq!(config.vertical_slack, 0.5);
        assert_eq!(config.min_meaningful_len, 35);
        assert_eq!(config.word_separator, " ");
        assert_eq!(config.line_separator, " ");
        assert!(config.split_lines);
        assert!(!config.pre_segment);
        assert!(config.page_range.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = SegmentationConfig::new()
            .with_lane_multiplier(3.0)
            .with_vertical_slack(1.0)
            .with_min_meaningful_len(20)
            .with_word_separator("_")
            .with_line_separator("\n")
            .with_split_lines(false)
            .with_pre_segment(true);
        assert_eq!(config.lane_multiplier, 3.0);
        assert_eq!(config.vertical_slack, 1.0);
        assert_eq!(config.min_meaningful_len, 20);
        assert_eq!(config.word_separator, "_");
        assert_eq!(config.line_separator, "\n");
        assert!(!config.split_lines);
        assert!(config.pre_segment);
    }

    #[test]
    fn test_invalid_tunables() {
        let config = SegmentationConfig::default().with_split_margin(f32::NAN);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = SegmentationConfig::default().with_lane_multiplier(-1.0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(msg)) if msg.contains("lane_multiplier")));
    }

    #[test]
    fn test_invalid_page_range() {
        let config = SegmentationConfig::default().with_page_range(0, 3);
        assert!(matches!(config.validate(), Err(Error::InvalidPageRange { start: 0, end: 3 })));

        let config = SegmentationConfig::default().with_page_range(4, 2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_includes_page() {
        let all = SegmentationConfig::default();
        assert!(all.includes_page(1));
        assert!(all.includes_page(999));

        let some = SegmentationConfig::default().with_page_range(2, 3);
        assert!(!some.includes_page(1));
        assert!(some.includes_page(2));
        assert!(some.includes_page(3));
        assert!(!some.includes_page(4));
    }

    #[test]
    fn test_config_serde() {
        let config = SegmentationConfig::default().with_page_range(1, 2);
        let json = serde_json::to_string(&config).unwrap();
        let back: SegmentationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
