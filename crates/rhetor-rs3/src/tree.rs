//! Tree construction and document-level queries.
//!
//! Construction runs in one pass over the records read from the XML:
//!
//! 1. relations are registered by name (later duplicates win);
//! 2. groups then segments are placed in the node table, segments carrying
//!    the sentence positions computed by [`segment_sentences`];
//! 3. ids are indexed (a repeated id is an error) and the unique root found;
//! 4. signals are moved onto their source nodes.
//!
//! Nothing is mutated afterwards.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use quick_xml::Reader;
use tracing::debug;

use crate::error::{Result, Rs3Error};
use crate::node::{Group, Node, NodeKind, Segment};
use crate::relation::Relation;
use crate::segmenter::segment_sentences;
use crate::signal::Signal;
use crate::xml::{self, RawDocument};
use crate::NodeId;

#[derive(Debug, Clone)]
pub struct RstTree {
    relations: BTreeMap<String, Relation>,
    /// Groups in source order, then segments in source order.
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    /// Parent id (None for top-level nodes) -> child positions, table order.
    children: HashMap<Option<NodeId>, Vec<usize>>,
    /// Signal id -> (node position, position in that node's signals).
    signal_index: Vec<(usize, usize)>,
    root: usize,
    /// Node position -> `order` of the first segment in its subtree.
    first_orders: Vec<Option<usize>>,
    /// Same-parent, same-relname node positions, each in document order.
    chains: Vec<Vec<usize>>,
    /// Node position -> (chain, rank within that chain).
    chain_slots: Vec<(usize, usize)>,
}

impl RstTree {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Rs3Error::NotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path).map_err(|source| Rs3Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records = xml::read_document(Reader::from_reader(BufReader::new(file)))?;
        let tree = Self::from_records(records)?;
        debug!(
            path = %path.display(),
            nodes = tree.nodes.len(),
            signals = tree.signal_index.len(),
            "parsed rs3 document"
        );
        Ok(tree)
    }

    pub fn parse_str(xml: &str) -> Result<Self> {
        Self::from_records(xml::read_document(Reader::from_str(xml))?)
    }

    fn from_records(records: RawDocument) -> Result<Self> {
        let RawDocument {
            relations: raw_relations,
            segments: raw_segments,
            groups: raw_groups,
            signals: raw_signals,
        } = records;

        let mut relations = BTreeMap::new();
        for relation in raw_relations {
            relations.insert(
                relation.name.clone(),
                Relation {
                    name: relation.name,
                    kind: relation.kind,
                },
            );
        }

        let positions = segment_sentences(raw_segments.iter().map(|s| s.text.as_str()));

        let mut nodes = Vec::with_capacity(raw_groups.len() + raw_segments.len());
        for group in raw_groups {
            nodes.push(Node {
                id: group.id,
                parent_id: group.parent,
                relname: group.relname,
                signals: Vec::new(),
                kind: NodeKind::Group(Group { kind: group.kind }),
            });
        }
        for (order, (segment, position)) in raw_segments.into_iter().zip(positions).enumerate() {
            nodes.push(Node {
                id: segment.id,
                parent_id: segment.parent,
                relname: segment.relname,
                signals: Vec::new(),
                kind: NodeKind::Segment(Segment {
                    order,
                    inner_text: segment.text,
                    initial_token_id: position.initial_token_id,
                    sentence_id: position.sentence_id,
                }),
            });
        }

        let mut index = HashMap::with_capacity(nodes.len());
        let mut children: HashMap<Option<NodeId>, Vec<usize>> = HashMap::new();
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id, position).is_some() {
                return Err(Rs3Error::DuplicateNodeId(node.id));
            }
            children.entry(node.parent_id).or_default().push(position);
        }

        let mut roots = nodes.iter().enumerate().filter(|(_, node)| node.is_root());
        let root = match (roots.next(), roots.next()) {
            (None, _) => return Err(Rs3Error::NoRoot),
            (Some((position, _)), None) => position,
            (Some((_, first)), Some((_, second))) => {
                return Err(Rs3Error::MultipleRoots {
                    first: first.id,
                    second: second.id,
                })
            }
        };

        let first_orders = first_segment_orders(&nodes, &index);
        let (chains, chain_slots) = relation_chains(&nodes, &first_orders);

        let mut signal_index = Vec::with_capacity(raw_signals.len());
        for (id, signal) in raw_signals.into_iter().enumerate() {
            let &position = index
                .get(&signal.source)
                .ok_or(Rs3Error::UnknownSignalSource {
                    signal: id,
                    source_id: signal.source,
                })?;
            let node = &mut nodes[position];
            node.signals.push(Signal {
                id,
                source_id: signal.source,
                kind: signal.kind,
                subtype: signal.subtype,
                tokens_ids: signal.tokens,
            });
            signal_index.push((position, node.signals.len() - 1));
        }

        Ok(Self {
            relations,
            nodes,
            index,
            children,
            signal_index,
            root,
            first_orders,
            chains,
            chain_slots,
        })
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    /// All nodes: groups in source order, then segments in source order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&position| &self.nodes[position])
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root]
    }

    pub fn segments(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_segment())
    }

    pub fn groups(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| !node.is_segment())
    }

    /// Segment nodes ascending by `order`.
    pub fn sorted_segments(&self) -> Vec<&Node> {
        let mut segments: Vec<&Node> = self.segments().collect();
        segments.sort_by_key(|node| node.as_segment().map(|segment| segment.order));
        segments
    }

    /// Signals in source order.
    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.signal_index
            .iter()
            .map(|&(node, slot)| &self.nodes[node].signals[slot])
    }

    pub fn signal(&self, id: usize) -> Option<&Signal> {
        self.signal_index
            .get(id)
            .map(|&(node, slot)| &self.nodes[node].signals[slot])
    }

    /// Nodes whose parent is `parent`, in node-table order.
    pub fn children_of(&self, parent: Option<NodeId>) -> impl Iterator<Item = &Node> {
        self.children
            .get(&parent)
            .into_iter()
            .flatten()
            .map(|&position| &self.nodes[position])
    }

    fn position_of(&self, node: &Node) -> Option<usize> {
        self.index.get(&node.id).copied()
    }

    /// `order` of the first segment under `node`, `None` for segment-less
    /// subtrees.
    pub fn first_segment_order(&self, node: &Node) -> Option<usize> {
        self.position_of(node)
            .and_then(|position| self.first_orders[position])
    }

    /// Nodes sharing `node`'s parent and relname (itself included), in
    /// document order.
    pub fn relation_chain(&self, node: &Node) -> impl Iterator<Item = &Node> {
        self.position_of(node)
            .map(|position| self.chains[self.chain_slots[position].0].as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&position| &self.nodes[position])
    }

    /// Rank of `node` within [`RstTree::relation_chain`], and the member that
    /// follows it.
    pub(crate) fn chain_rank(&self, node: &Node) -> Option<(usize, Option<&Node>)> {
        let position = self.position_of(node)?;
        let (chain, rank) = self.chain_slots[position];
        let next = self.chains[chain]
            .get(rank + 1)
            .map(|&next| &self.nodes[next]);
        Some((rank, next))
    }

    // ========================================================================
    // Text
    // ========================================================================

    pub fn tokens(&self) -> Result<Vec<&str>> {
        self.root().tokens(self)
    }

    pub fn text(&self) -> Result<String> {
        self.root().text(self)
    }

    /// Global 1-based token id -> token.
    pub fn tokens_dict(&self) -> Result<BTreeMap<usize, &str>> {
        Ok(self
            .tokens()?
            .into_iter()
            .enumerate()
            .map(|(index, token)| (index + 1, token))
            .collect())
    }

    pub fn tokens_ids(&self) -> Result<Vec<usize>> {
        Ok(self.tokens_dict()?.into_keys().collect())
    }
}

/// Node position -> `order` of the first segment in its subtree.
///
/// Segments sit in the table in ascending `order`, so the first walk that
/// reaches an ancestor records its smallest order and later walks stop there.
fn first_segment_orders(nodes: &[Node], index: &HashMap<NodeId, usize>) -> Vec<Option<usize>> {
    let mut first = vec![None; nodes.len()];
    for (position, node) in nodes.iter().enumerate() {
        let NodeKind::Segment(segment) = &node.kind else {
            continue;
        };
        let mut current = Some(position);
        while let Some(at) = current {
            if first[at].is_some() {
                break;
            }
            first[at] = Some(segment.order);
            current = nodes[at]
                .parent_id
                .and_then(|parent| index.get(&parent).copied());
        }
    }
    first
}

/// Groups node positions by (parent, relname) and orders each group by first
/// segment, segment-less nodes last, ties in table order.
fn relation_chains(
    nodes: &[Node],
    first_orders: &[Option<usize>],
) -> (Vec<Vec<usize>>, Vec<(usize, usize)>) {
    let mut keys: HashMap<(Option<NodeId>, Option<&str>), usize> = HashMap::new();
    let mut chains: Vec<Vec<usize>> = Vec::new();
    for (position, node) in nodes.iter().enumerate() {
        let chain = *keys
            .entry((node.parent_id, node.relname.as_deref()))
            .or_insert_with(|| {
                chains.push(Vec::new());
                chains.len() - 1
            });
        chains[chain].push(position);
    }

    let mut slots = vec![(0, 0); nodes.len()];
    for (index, chain) in chains.iter_mut().enumerate() {
        chain.sort_by_key(|&position| first_orders[position].unwrap_or(usize::MAX));
        for (rank, &position) in chain.iter().enumerate() {
            slots[position] = (index, rank);
        }
    }
    (chains, slots)
}
