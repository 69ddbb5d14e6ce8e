//! Serializable snapshots of selected relations.
//!
//! Views resolve everything that needs the owning tree (texts, the declared
//! relation) when the document is loaded, so queries never fail afterwards.

use rhetor_rs3::{Node, NodeId, Relation, Result, RstTree, Signal};
use serde::Serialize;

/// Bucket name for nodes without signals (used for both type and subtype).
pub const NO_SIGNAL: &str = "No Signal";
/// Bucket name for signals without a `type` attribute.
pub const NO_TYPE: &str = "No Type";
/// Bucket name for signals without a `subtype` attribute.
pub const NO_SUBTYPE: &str = "No Subtype";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalView {
    pub id: usize,
    pub source_id: NodeId,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub subtype: Option<String>,
    pub tokens_ids: Vec<usize>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub relname: Option<String>,
    pub relation: Option<Relation>,
    pub signals: Vec<SignalView>,
    pub text: String,
    pub parent_text: String,
}

impl SignalView {
    pub fn build(tree: &RstTree, signal: &Signal) -> Result<Self> {
        Ok(Self {
            id: signal.id,
            source_id: signal.source_id,
            kind: signal.kind.clone(),
            subtype: signal.subtype.clone(),
            tokens_ids: signal.tokens_ids.clone(),
            text: signal.text(tree)?,
        })
    }

    /// `(type, subtype)` bucket, with placeholders for absent attributes.
    pub fn bucket(&self) -> (&str, &str) {
        (
            self.kind.as_deref().unwrap_or(NO_TYPE),
            self.subtype.as_deref().unwrap_or(NO_SUBTYPE),
        )
    }
}

impl NodeView {
    pub fn build(tree: &RstTree, node: &Node) -> Result<Self> {
        let signals = node
            .signals
            .iter()
            .map(|signal| SignalView::build(tree, signal))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            id: node.id,
            parent_id: node.parent_id,
            relname: node.relname.clone(),
            relation: node.relation(tree)?.cloned(),
            signals,
            text: node.text(tree)?,
            parent_text: node.parent_text(tree)?,
        })
    }

    /// Distinct signal buckets of this node, in first-seen order. A node
    /// without signals has the single `("No Signal", "No Signal")` bucket.
    pub fn signal_buckets(&self) -> Vec<(&str, &str)> {
        if self.signals.is_empty() {
            return vec![(NO_SIGNAL, NO_SIGNAL)];
        }
        let mut buckets = Vec::new();
        for signal in &self.signals {
            let bucket = signal.bucket();
            if !buckets.contains(&bucket) {
                buckets.push(bucket);
            }
        }
        buckets
    }
}
