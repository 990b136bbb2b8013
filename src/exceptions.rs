//! ## Custom Errors for Tabprep
//!
//! This module defines custom error types for the Tabprep library.
//! It uses the `thiserror` crate to derive the `Error` trait for custom error types.
//! The `TabPrepError` enum includes variants representing different error scenarios
//! encountered throughout the library, making error handling straightforward and clear.
//!
//! The `TabPrepResult` type alias simplifies error handling by providing a convenient
//! alias for results returned by the library.
//!
//! ### Example
//!
//! ```rust
//! use tabprep::exceptions::{TabPrepError, TabPrepResult};
//!
//! fn check_feature() -> TabPrepResult<()> {
//!     Err(TabPrepError::MissingColumn("price".into()))
//! }
//! ```

use thiserror::Error;

/// Errors specific to the Tabprep library.
#[derive(Debug, Error)]
pub enum TabPrepError {
    /// Wraps underlying I/O errors.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Wraps errors from DataFusion.
    #[error("DataFusion error: {0}")]
    DataFusionError(#[from] datafusion::error::DataFusionError),

    /// Wraps errors from Arrow.
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Indicates that an invalid parameter was provided (e.g., unsupported value or incorrect data type).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Indicates that the specified column does not exist in the DataFrame.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Indicates the transform method was called before calling fit for a stateful transformer.
    #[error("Transform called before fit for stateful transformer")]
    FitNotCalled,
}

/// A convenient result type for Tabprep operations.
pub type TabPrepResult<T> = std::result::Result<T, TabPrepError>;
