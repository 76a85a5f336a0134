use std::path::PathBuf;

/// Generator result type
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors from generating provider variants
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// Source and output lists differ in length
    #[error("number of source files ({sources}) must match number of output files ({outputs})")]
    LengthMismatch {
        /// Number of source paths
        sources: usize,
        /// Number of output paths
        outputs: usize,
    },

    /// A source file could not be read
    #[error("error processing file {}: {source}", path.display())]
    Read {
        /// Source path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// An output file could not be written
    #[error("error writing file {}: {source}", path.display())]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}
