//! RS3 corpus repository
//!
//! Loads every `.rs3` file under a directory into memory and answers
//! corpus-wide questions about their intra-sentential relations:
//!
//! - which documents exist, and their full text and selected relations;
//! - which relation names occur, how often, and example occurrences;
//! - how relations distribute over signal (type, subtype) pairs;
//! - which relations the documents declare, by name and by type.
//!
//! Loading is eager and all-or-nothing: one unreadable or malformed document
//! fails [`DocumentsRepository::load`]. The loaded repository is immutable and
//! is passed by reference to whatever serves it.

pub mod error;
pub mod options;
pub mod query;
pub mod repository;
pub mod view;

pub use error::{CorpusError, Result};
pub use options::{CorpusOptions, DOCUMENTS_DIR_ENV};
pub use query::{
    DeclaredRelation, DeclaredRelations, ExampleFilter, GroupedRelations, RelationExample,
};
pub use repository::{find_documents, Document, DocumentsRepository};
pub use view::{NodeView, SignalView, NO_SIGNAL, NO_SUBTYPE, NO_TYPE};
