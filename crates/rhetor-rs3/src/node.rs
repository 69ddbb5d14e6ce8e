//! Discourse tree nodes.
//!
//! A [`Node`] holds the fields shared by segments and groups; the payload
//! that differs lives in [`NodeKind`]. Nodes never point at each other:
//! parent, children and siblings are resolved through the owning
//! [`RstTree`].

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::error::{Result, Rs3Error};
use crate::relation::Relation;
use crate::segmenter::tokenize;
use crate::signal::Signal;
use crate::tree::RstTree;
use crate::NodeId;

/// Relations with no privileged nucleus. A missing relname (the root) is
/// treated as multinuclear as well.
pub const MULTINUCLEAR_RELATIONS: [&str; 6] = [
    "sequence",
    "same-unit",
    "list",
    "contrast",
    "joint",
    "other-rel",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub relname: Option<String>,
    pub signals: Vec<Signal>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum NodeKind {
    Segment(Segment),
    Group(Group),
}

/// Leaf discourse unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// 0-based position among the segments of the source file.
    pub order: usize,
    pub inner_text: String,
    /// Global id (1-based) of this segment's first token.
    pub initial_token_id: usize,
    /// 1-based sentence id.
    pub sentence_id: usize,
}

/// Internal discourse unit; its text is the text of its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    /// `span`, `multinuc` or `constituent` in practice; descriptive only.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl Segment {
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        tokenize(&self.inner_text)
    }

    pub fn token_count(&self) -> usize {
        self.tokens().count()
    }
}

impl Node {
    pub fn as_segment(&self) -> Option<&Segment> {
        match &self.kind {
            NodeKind::Segment(segment) => Some(segment),
            NodeKind::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            NodeKind::Group(group) => Some(group),
            NodeKind::Segment(_) => None,
        }
    }

    pub fn is_segment(&self) -> bool {
        matches!(self.kind, NodeKind::Segment(_))
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none() && self.relname.is_none()
    }

    pub fn is_multinuclear(&self) -> bool {
        match self.relname.as_deref() {
            None => true,
            Some(relname) => MULTINUCLEAR_RELATIONS.contains(&relname),
        }
    }

    /// `Ok(None)` for parentless nodes; an error when the parent id does not
    /// resolve.
    pub fn parent<'t>(&self, tree: &'t RstTree) -> Result<Option<&'t Node>> {
        let Some(parent) = self.parent_id else {
            return Ok(None);
        };
        tree.node(parent)
            .map(Some)
            .ok_or(Rs3Error::DanglingParent {
                node: self.id,
                parent,
            })
    }

    pub fn children<'t>(&self, tree: &'t RstTree) -> Vec<&'t Node> {
        tree.children_of(Some(self.id)).collect()
    }

    /// Nodes sharing this node's parent, this node included.
    pub fn siblings<'t>(&self, tree: &'t RstTree) -> Vec<&'t Node> {
        tree.children_of(self.parent_id).collect()
    }

    /// Siblings with the same relname, in document order.
    ///
    /// Document order is the `order` of each sibling's first segment; siblings
    /// without segments go last, ties keep node-table order. The order is
    /// computed once when the tree is built.
    pub fn siblings_of_same_relation<'t>(&self, tree: &'t RstTree) -> Vec<&'t Node> {
        tree.relation_chain(self).collect()
    }

    /// Every segment in this node's subtree (itself included), by `order`.
    pub fn deep_children_segments<'t>(&'t self, tree: &'t RstTree) -> Result<Vec<&'t Segment>> {
        let mut segments = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            if !visited.insert(node.id) {
                return Err(Rs3Error::ParentCycle { node: self.id });
            }
            if let NodeKind::Segment(segment) = &node.kind {
                segments.push(segment);
            }
            stack.extend(tree.children_of(Some(node.id)));
        }

        segments.sort_by_key(|segment| segment.order);
        Ok(segments)
    }

    pub fn tokens<'t>(&'t self, tree: &'t RstTree) -> Result<Vec<&'t str>> {
        Ok(self
            .deep_children_segments(tree)?
            .into_iter()
            .flat_map(|segment| segment.tokens())
            .collect())
    }

    pub fn text(&self, tree: &RstTree) -> Result<String> {
        Ok(self.tokens(tree)?.join(" "))
    }

    /// Text of the parent node, empty for parentless nodes.
    pub fn parent_text(&self, tree: &RstTree) -> Result<String> {
        match self.parent(tree)? {
            Some(parent) => parent.text(tree),
            None => Ok(String::new()),
        }
    }

    pub fn sentence_ids(&self, tree: &RstTree) -> Result<BTreeSet<usize>> {
        Ok(self
            .deep_children_segments(tree)?
            .into_iter()
            .map(|segment| segment.sentence_id)
            .collect())
    }

    /// `order` of the first segment under this node.
    pub fn document_position(&self, tree: &RstTree) -> Option<usize> {
        tree.first_segment_order(self)
    }

    pub fn relation<'t>(&self, tree: &'t RstTree) -> Result<Option<&'t Relation>> {
        let Some(relname) = self.relname.as_deref() else {
            return Ok(None);
        };
        tree.relation(relname)
            .map(Some)
            .ok_or_else(|| Rs3Error::UndeclaredRelation {
                node: self.id,
                relname: relname.to_string(),
            })
    }
}
