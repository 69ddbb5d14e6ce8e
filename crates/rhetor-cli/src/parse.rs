//! `rhetor parse`: summary of a single RS3 file, no repository involved.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use rhetor_rs3::RstTree;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ParseSummary {
    pub file: String,
    pub root: rhetor_rs3::NodeId,
    pub segments: usize,
    pub groups: usize,
    pub signals: usize,
    pub sentences: usize,
    pub tokens: usize,
    pub declared_relations: Vec<String>,
    pub intra_sentential_relations: BTreeMap<String, usize>,
    pub text: String,
}

impl ParseSummary {
    pub fn from_tree(file: &Path, tree: &RstTree) -> Result<Self> {
        let sentences = tree
            .segments()
            .filter_map(|node| node.as_segment())
            .map(|segment| segment.sentence_id)
            .max()
            .unwrap_or(0);
        Ok(Self {
            file: file.display().to_string(),
            root: tree.root().id,
            segments: tree.segments().count(),
            groups: tree.groups().count(),
            signals: tree.signals().count(),
            sentences,
            tokens: tree.tokens()?.len(),
            declared_relations: tree.relations().map(|r| r.name.clone()).collect(),
            intra_sentential_relations: tree.count_intra_sentential_relations()?,
            text: tree.text()?,
        })
    }
}

pub fn cmd_parse(file: &Path) -> Result<ParseSummary> {
    let tree = RstTree::from_path(file)
        .with_context(|| format!("failed to parse {}", file.display()))?;
    let summary = ParseSummary::from_tree(file, &tree)?;
    eprintln!(
        "{} {} ({} segments, {} sentences, {} selected relations)",
        "parsed".green().bold(),
        file.display().to_string().bold(),
        summary.segments,
        summary.sentences,
        summary.intra_sentential_relations.values().sum::<usize>()
    );
    Ok(summary)
}
