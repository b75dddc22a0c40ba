use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModalisError {
    /// Vocabulary file is structurally invalid for an entry that was queried.
    #[error("Vocabulary parse error: {0}")]
    Parse(String),

    /// Static configuration (cluster table, config file) is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A dump line that does not deserialize into its record type.
    #[error("Malformed JSON record at {}:{line}: {source}", path.display())]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ModalisError>;
