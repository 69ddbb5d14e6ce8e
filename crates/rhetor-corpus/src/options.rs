use std::path::PathBuf;

use serde::Serialize;

/// Environment variable overriding [`CorpusOptions::root`].
pub const DOCUMENTS_DIR_ENV: &str = "RHETOR_DOCUMENTS_DIR";

/// Options controlling which files the repository loads.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusOptions {
    /// Directory scanned recursively for documents.
    pub root: PathBuf,
    /// File extension to include (without dot, case-sensitive).
    pub extension: String,
    /// Default number of examples returned by example queries.
    pub example_limit: usize,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("documents"),
            extension: "rs3".to_string(),
            example_limit: 10,
        }
    }
}

impl CorpusOptions {
    /// Defaults, with the root taken from `RHETOR_DOCUMENTS_DIR` when set.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(root) = std::env::var(DOCUMENTS_DIR_ENV) {
            if !root.is_empty() {
                options.root = PathBuf::from(root);
            }
        }
        options
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }
}
