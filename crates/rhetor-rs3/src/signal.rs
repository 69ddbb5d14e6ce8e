use serde::Serialize;

use crate::error::{Result, Rs3Error};
use crate::node::Node;
use crate::tree::RstTree;
use crate::NodeId;

/// A textual cue evidencing the relation of its source node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signal {
    /// 0-based position among the signals of the source file.
    pub id: usize,
    pub source_id: NodeId,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub subtype: Option<String>,
    /// Global 1-based token ids.
    pub tokens_ids: Vec<usize>,
}

impl Signal {
    /// Tokens referenced by this signal, in `tokens_ids` order. Ids outside
    /// the document are skipped.
    pub fn tokens<'t>(&self, tree: &'t RstTree) -> Result<Vec<&'t str>> {
        let dict = tree.tokens_dict()?;
        Ok(self
            .tokens_ids
            .iter()
            .filter_map(|id| dict.get(id).copied())
            .collect())
    }

    pub fn text(&self, tree: &RstTree) -> Result<String> {
        Ok(self.tokens(tree)?.join(" "))
    }

    pub fn source<'t>(&self, tree: &'t RstTree) -> Result<&'t Node> {
        tree.node(self.source_id)
            .ok_or(Rs3Error::UnknownSignalSource {
                signal: self.id,
                source_id: self.source_id,
            })
    }
}
