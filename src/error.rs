use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the surfaces around the suggestion core: reading option
/// and configuration files, and running the terminal program.
///
/// The filtering engine and the controller never fail; they degrade to empty
/// results instead.
#[derive(Error, Debug)]
pub enum SuggestError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("program error: {0}")]
    Program(String),
}

pub type Result<T> = std::result::Result<T, SuggestError>;

pub(crate) fn read_file(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| SuggestError::Io {
        path: path.to_path_buf(),
        source,
    })
}
