//! Layout segmentation algorithms.
//!
//! This module recovers the visual layout of a page from positioned glyphs:
//! - Gap-based line splitting (runs spanning several columns are cut apart)
//! - Line building (text, font statistics, emphasis, meaningfulness)
//! - Column clustering and region grouping
//! - Recursive XY-cut partitioning

pub mod column_detector;
pub mod document_analyzer;
pub mod line_builder;
pub mod line_splitter;
pub mod patterns;
pub mod region;
pub mod text_block;
pub mod text_line;
pub mod xy_cut;

// Re-export main types
pub use column_detector::{fill_columns, sort_by_meaningfulness, sort_column};
pub use document_analyzer::{DocumentStatistics, PageStatistics};
pub use line_builder::build_line;
pub use line_splitter::{
    enrich_word_separators, line_runs, sort_run, split_points, split_run, SplitRuns,
};
pub use region::{consider, group_regions, Region};
pub use text_block::{FontFlags, TextBlock, TextChar};
pub use text_line::{merge, TextLine};
pub use xy_cut::{FixedLaneCutter, HasRect, TextBlockCutter, XyCut};
