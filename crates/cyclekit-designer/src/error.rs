//! Error types for the designer crate.

use thiserror::Error;

/// Errors that can occur while building a contour toolpath.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolpathError {
    /// An inside offset left a dimension with no room for the tool.
    #[error("Inside offset of {offset:.3}mm collapses {shape} {dimension} of {size:.3}mm")]
    OffsetCollapsed {
        shape: String,
        dimension: String,
        size: f64,
        offset: f64,
    },

    /// The polygon offset produced no loop.
    #[error("Offset of {offset:.3}mm leaves no contour for {shape}")]
    NoOffsetLoop { shape: String, offset: f64 },

    /// The geometry cannot be cut as given.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A cutting parameter is out of range.
    #[error("Invalid toolpath settings: {0}")]
    InvalidSettings(String),
}

/// Result type for toolpath operations.
pub type ToolpathResult<T> = Result<T, ToolpathError>;
