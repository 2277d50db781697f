//! Error types for the segmentation library.
//!
//! The segmentation algorithms themselves are total over their input: empty
//! pages, malformed glyphs and uncuttable regions are handled as data, not as
//! errors. Errors are only raised at the configuration and input boundary.

/// Result type alias for segmentation library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur when setting up or invoking segmentation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A tunable parameter is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Page numbers are 1-based
    #[error("Invalid page number: {0} (page numbers start at 1)")]
    InvalidPageNumber(u32),

    /// Page range is empty or starts at page 0
    #[error("Invalid page range: {start}..={end}")]
    InvalidPageRange {
        /// First page of the range
        start: u32,
        /// Last page of the range
        end: u32,
    },

    /// Serialization of a segmentation result failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
