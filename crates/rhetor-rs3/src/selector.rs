//! Intra-sentential relation selection.
//!
//! A node's relation to its parent is kept when it is meaningful for
//! within-sentence analysis:
//!
//! - structural `span` links and the root are never kept;
//! - a `same-unit` chain is represented once, by its first member;
//! - other multinuclear chains keep each member whose sentences equal those
//!   of the next member (the last member has no partner);
//! - mononuclear links are kept when parent and child resolve to a single
//!   sentence.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::node::Node;
use crate::tree::RstTree;
use crate::{SAME_UNIT_RELATION, SPAN_RELATION};

impl RstTree {
    pub fn is_intra_sentential(&self, node: &Node) -> Result<bool> {
        let relname = match node.relname.as_deref() {
            None | Some(SPAN_RELATION) => return Ok(false),
            Some(relname) => relname,
        };

        if !node.is_multinuclear() {
            let parent = node.parent(self)?;
            return self.are_of_same_sentence(&[parent, Some(node)]);
        }

        let Some((rank, next)) = self.chain_rank(node) else {
            return Ok(false);
        };
        if relname == SAME_UNIT_RELATION {
            return Ok(rank == 0);
        }
        match next {
            Some(next) => Ok(node.sentence_ids(self)? == next.sentence_ids(self)?),
            None => Ok(false),
        }
    }

    /// Whether all segments under the given nodes share one sentence.
    /// `None` entries are ignored; fewer than two segments is trivially true.
    pub fn are_of_same_sentence(&self, nodes: &[Option<&Node>]) -> Result<bool> {
        let mut segments = Vec::new();
        for node in nodes.iter().flatten() {
            segments.extend(node.deep_children_segments(self)?);
        }
        let Some((first, rest)) = segments.split_first() else {
            return Ok(true);
        };
        Ok(rest
            .iter()
            .all(|segment| segment.sentence_id == first.sentence_id))
    }

    /// Selected nodes in node-table order.
    pub fn intra_sentential_relations(&self) -> Result<Vec<&Node>> {
        let mut selected = Vec::new();
        for node in self.nodes() {
            if self.is_intra_sentential(node)? {
                selected.push(node);
            }
        }
        Ok(selected)
    }

    /// Relname -> number of selected nodes using it.
    pub fn count_intra_sentential_relations(&self) -> Result<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for node in self.intra_sentential_relations()? {
            if let Some(relname) = &node.relname {
                *counts.entry(relname.clone()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}
