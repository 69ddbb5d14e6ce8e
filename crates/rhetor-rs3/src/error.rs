use std::path::PathBuf;

use thiserror::Error;

use crate::NodeId;

/// Coarse classification of [`Rs3Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The source file does not exist.
    NotFound,
    /// The records do not describe a well-formed discourse tree.
    MalformedTree,
    /// A required attribute is missing or is not an integer.
    InvalidAttribute,
    /// The file could not be read or is not well-formed XML.
    Unreadable,
}

#[derive(Debug, Error)]
pub enum Rs3Error {
    #[error("document at \"{}\" does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("<{element}> attribute `{attribute}` is not an integer: {value:?}")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("no root node (a node without parent and relname)")]
    NoRoot,

    #[error("more than one root node: {first} and {second}")]
    MultipleRoots { first: NodeId, second: NodeId },

    #[error("node id {0} is declared more than once")]
    DuplicateNodeId(NodeId),

    #[error("node {node} references missing parent {parent}")]
    DanglingParent { node: NodeId, parent: NodeId },

    #[error("node {node} uses undeclared relation {relname:?}")]
    UndeclaredRelation { node: NodeId, relname: String },

    #[error("signal {signal} references missing source node {source_id}")]
    UnknownSignalSource { signal: usize, source_id: NodeId },

    #[error("parent chain of node {node} forms a cycle")]
    ParentCycle { node: NodeId },
}

impl Rs3Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Rs3Error::NotFound { .. } => ErrorCategory::NotFound,
            Rs3Error::Io { .. } | Rs3Error::Xml(_) => ErrorCategory::Unreadable,
            Rs3Error::MissingAttribute { .. } | Rs3Error::InvalidAttribute { .. } => {
                ErrorCategory::InvalidAttribute
            }
            Rs3Error::NoRoot
            | Rs3Error::MultipleRoots { .. }
            | Rs3Error::DuplicateNodeId(_)
            | Rs3Error::DanglingParent { .. }
            | Rs3Error::UndeclaredRelation { .. }
            | Rs3Error::UnknownSignalSource { .. }
            | Rs3Error::ParentCycle { .. } => ErrorCategory::MalformedTree,
        }
    }
}

pub type Result<T> = std::result::Result<T, Rs3Error>;
