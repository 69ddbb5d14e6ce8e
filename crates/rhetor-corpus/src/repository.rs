//! Eager, all-or-nothing loading of an RS3 corpus from disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rhetor_rs3::{Rs3Error, RstTree};
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{CorpusError, Result};
use crate::options::CorpusOptions;
use crate::view::NodeView;

/// One parsed document with its intra-sentential relations resolved.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub filename: String,
    pub file_path: PathBuf,
    pub full_text: String,
    pub intra_sentential_relations: Vec<NodeView>,
    #[serde(skip)]
    tree: RstTree,
}

impl Document {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::build(path).map_err(|source| CorpusError::Document {
            path: path.to_path_buf(),
            source,
        })
    }

    fn build(path: &Path) -> std::result::Result<Self, Rs3Error> {
        let tree = RstTree::from_path(path)?;
        let intra_sentential_relations = tree
            .intra_sentential_relations()?
            .into_iter()
            .map(|node| NodeView::build(&tree, node))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let full_text = tree.text()?;
        Ok(Self {
            filename: filename_of(path),
            file_path: path.to_path_buf(),
            full_text,
            intra_sentential_relations,
            tree,
        })
    }

    pub fn tree(&self) -> &RstTree {
        &self.tree
    }
}

fn filename_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Every matching file under `root`, in a stable (file-name sorted) order.
pub fn find_documents(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(CorpusError::NotADirectory(root.to_path_buf()));
    }
    let mut paths = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.to_str() == Some(extension));
        if matches {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// Documents keyed by filename. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct DocumentsRepository {
    root: PathBuf,
    documents: BTreeMap<String, Document>,
}

impl DocumentsRepository {
    /// Loads every document under `options.root`. Any failure aborts the
    /// whole load.
    pub fn load(options: &CorpusOptions) -> Result<Self> {
        let paths = find_documents(&options.root, &options.extension)?;
        let mut documents = BTreeMap::new();
        for path in paths {
            let document = Document::from_path(&path)?;
            debug!(
                filename = %document.filename,
                relations = document.intra_sentential_relations.len(),
                "loaded document"
            );
            if let Some(previous) = documents.insert(document.filename.clone(), document) {
                warn!(
                    filename = %previous.filename,
                    replaced = %previous.file_path.display(),
                    by = %path.display(),
                    "duplicate filename, keeping the later document"
                );
            }
        }
        info!(
            root = %options.root.display(),
            documents = documents.len(),
            "corpus loaded"
        );
        Ok(Self {
            root: options.root.clone(),
            documents,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn documents(&self) -> &BTreeMap<String, Document> {
        &self.documents
    }

    pub fn get(&self, filename: &str) -> Option<&Document> {
        self.documents.get(filename)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_the_basename() {
        assert_eq!(filename_of(Path::new("a/b/c.rs3")), "c.rs3");
    }

    #[test]
    fn missing_root_is_not_a_directory() {
        let err = find_documents(Path::new("/no/such/corpus"), "rs3").unwrap_err();
        assert!(matches!(err, CorpusError::NotADirectory(_)));
    }
}
