//! CLI-level error type, wrapping the core library's errors plus the
//! I/O failures that corpus loading can hit.

/// Errors that can abort a CLI run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A core-library failure (invalid config, in practice).
    #[error(transparent)]
    Core(#[from] resemblance_core::CoreError),
    /// Corpus directory could not be walked or a file could not be read.
    #[error("failed to read corpus: {0}")]
    CorpusIo(#[from] std::io::Error),
    /// The corpus directory contained no files.
    #[error("corpus directory {0} contained no readable files")]
    EmptyCorpus(String),
}
