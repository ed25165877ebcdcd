use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool downloads, flattens, or exports the category taxonomy.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as writing the output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a response body is not the JSON shape we expect.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level failures: connect errors, timeouts, body decoding.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Raised when the server answers with a non-success status code.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Raised when a filter response does not contain the requested facet.
    #[error("filter facet '{0}' not found in response")]
    MissingFacet(String),

    /// Raised when the output path cannot be used.
    #[error("invalid output path: {0}")]
    InvalidOutput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
