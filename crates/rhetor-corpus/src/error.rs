use std::path::PathBuf;

use rhetor_rs3::Rs3Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("\"{}\" is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to scan corpus: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to load \"{}\": {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: Rs3Error,
    },

    #[error("document {0:?} not found")]
    DocumentNotFound(String),
}

pub type Result<T> = std::result::Result<T, CorpusError>;
