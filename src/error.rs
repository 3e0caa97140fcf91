use std::path::PathBuf;
use thiserror::Error;

/// The main error type for pagemask operations.
///
/// Every per-file variant carries the path of the annotation file (or output
/// file) it came from, so a batch failure names the offending input.
#[derive(Debug, Error)]
pub enum PageMaskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input directory not found: {path}")]
    InputDirNotFound { path: PathBuf },

    #[error("Failed to parse PAGE XML from {path}: {message}")]
    XmlParse { path: PathBuf, message: String },

    #[error("Missing page metadata in {path}: {message}")]
    MissingMetadata { path: PathBuf, message: String },

    #[error("Invalid page metadata in {path}: {message}")]
    InvalidMetadata { path: PathBuf, message: String },

    #[error("Malformed text-line coordinates in {path}: {message}")]
    MalformedCoordinates { path: PathBuf, message: String },

    #[error(
        "Invalid mask dimensions {width}x{height}: width and height must be positive and the buffer must fit in memory"
    )]
    InvalidDimensions { width: i64, height: i64 },

    #[error("Failed to write mask to {path}: {source}")]
    MaskWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "Refusing to delete output directory {output}: it contains the input directory {input}"
    )]
    UnsafeOutputDir { output: PathBuf, input: PathBuf },

    #[error("Failed to serialize summary report: {0}")]
    ReportSerialize(#[from] serde_json::Error),

    #[error("Conversion task for {annotation} panicked: {message}")]
    TaskPanicked { annotation: PathBuf, message: String },

    #[error("Batch ended after {received} of {expected} tasks reported back")]
    IncompleteBatch { expected: usize, received: usize },

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl PageMaskError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| PageMaskError::Filesystem { path, source }
    }
}
