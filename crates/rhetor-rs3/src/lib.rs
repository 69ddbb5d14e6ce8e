//! RS3 discourse trees
//!
//! Parses Rhetorical Structure Theory annotations in the RS3 XML schema into
//! an immutable, arena-backed tree:
//!
//! - [`RstTree`] owns every [`Node`] (segments and groups share one id space),
//!   the [`Relation`] registry, and the [`Signal`]s attached to their source
//!   nodes.
//! - Segments carry sentence ids and global token offsets computed by the
//!   [`segmenter`] while the tree is built.
//! - The [`selector`] decides which relations are intra-sentential.
//!
//! Nodes only store ids; every traversal takes the owning tree explicitly:
//!
//! ```no_run
//! use rhetor_rs3::RstTree;
//!
//! let tree = RstTree::from_path("documents/example.rs3")?;
//! for node in tree.intra_sentential_relations()? {
//!     println!("{:?}: {}", node.relname, node.text(&tree)?);
//! }
//! # Ok::<(), rhetor_rs3::Rs3Error>(())
//! ```

pub mod error;
pub mod node;
pub mod relation;
pub mod segmenter;
pub mod selector;
pub mod signal;
pub mod tree;
mod xml;

pub use error::{ErrorCategory, Result, Rs3Error};
pub use node::{Group, Node, NodeKind, Segment, MULTINUCLEAR_RELATIONS};
pub use relation::Relation;
pub use segmenter::SentencePosition;
pub use signal::Signal;
pub use tree::RstTree;

/// Identifier shared by segments and groups within one document.
pub type NodeId = i64;

/// Relation name of structural spans, never counted as a relation.
pub const SPAN_RELATION: &str = "span";

/// Relation name of same-unit chains.
pub const SAME_UNIT_RELATION: &str = "same-unit";
