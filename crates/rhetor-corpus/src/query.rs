//! Corpus-wide queries over the selected relations of every document.
//!
//! Documents are visited in filename order and relations in selection order,
//! so every listing below is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{CorpusError, Result};
use crate::repository::{Document, DocumentsRepository};
use crate::view::{NodeView, NO_TYPE};

/// Signal type -> signal subtype -> relation name -> count.
pub type GroupedRelations = BTreeMap<String, BTreeMap<String, BTreeMap<String, usize>>>;

/// One occurrence of a relation in a document.
#[derive(Debug, Clone, Serialize)]
pub struct RelationExample<'a> {
    pub document: &'a str,
    pub relation: &'a NodeView,
}

/// Usage of one declared relation across the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredRelation {
    /// Number of documents declaring the relation.
    pub count: usize,
    /// Declared type, as given by the last document (in filename order).
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Statistics over the relations declared in document headers, whether or
/// not any node uses them. Relations without a type fall under `"No Type"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeclaredRelations {
    pub by_name: BTreeMap<String, DeclaredRelation>,
    /// Declared type -> distinct relation names.
    pub by_type: BTreeMap<String, BTreeSet<String>>,
    /// Declared type -> number of declarations.
    pub type_counts: BTreeMap<String, usize>,
}

/// Filter for [`DocumentsRepository::grouped_relation_examples`]. Unset
/// fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExampleFilter {
    pub relation_name: Option<String>,
    pub signal_type: Option<String>,
    pub signal_subtype: Option<String>,
}

impl ExampleFilter {
    pub fn relation(name: impl Into<String>) -> Self {
        Self {
            relation_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, relation: &NodeView) -> bool {
        if let Some(name) = &self.relation_name {
            if relation.relname.as_deref() != Some(name.as_str()) {
                return false;
            }
        }
        if self.signal_type.is_none() && self.signal_subtype.is_none() {
            return true;
        }
        relation.signal_buckets().into_iter().any(|(kind, subtype)| {
            self.signal_type.as_deref().map_or(true, |wanted| wanted == kind)
                && self
                    .signal_subtype
                    .as_deref()
                    .map_or(true, |wanted| wanted == subtype)
        })
    }
}

impl DocumentsRepository {
    fn relations(&self) -> impl Iterator<Item = (&Document, &NodeView)> {
        self.documents().values().flat_map(|document| {
            document
                .intra_sentential_relations
                .iter()
                .map(move |relation| (document, relation))
        })
    }

    pub fn filenames(&self) -> Vec<&str> {
        self.documents().keys().map(String::as_str).collect()
    }

    pub fn document(&self, filename: &str) -> Result<&Document> {
        self.get(filename)
            .ok_or_else(|| CorpusError::DocumentNotFound(filename.to_string()))
    }

    /// Distinct names of the selected relations across the corpus.
    pub fn relation_names(&self) -> BTreeSet<&str> {
        self.relations()
            .filter_map(|(_, relation)| relation.relname.as_deref())
            .collect()
    }

    /// Relation name -> number of selected occurrences across the corpus.
    pub fn relation_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for (_, relation) in self.relations() {
            if let Some(name) = relation.relname.as_deref() {
                *counts.entry(name).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Up to `limit` occurrences of the relation named `name`.
    pub fn relation_examples(&self, name: &str, limit: usize) -> Vec<RelationExample<'_>> {
        self.grouped_relation_examples(&ExampleFilter::relation(name), limit)
    }

    /// Relation counts bucketed by the (type, subtype) of their signals.
    ///
    /// A relation with signals in several buckets is counted once in each;
    /// relations without signals land in `"No Signal"/"No Signal"`.
    pub fn grouped_relations(&self) -> GroupedRelations {
        let mut grouped = GroupedRelations::new();
        for (_, relation) in self.relations() {
            let Some(name) = relation.relname.as_deref() else {
                continue;
            };
            for (kind, subtype) in relation.signal_buckets() {
                *grouped
                    .entry(kind.to_string())
                    .or_default()
                    .entry(subtype.to_string())
                    .or_default()
                    .entry(name.to_string())
                    .or_insert(0) += 1;
            }
        }
        grouped
    }

    /// Declared relations aggregated by name and by type.
    pub fn declared_relations(&self) -> DeclaredRelations {
        let mut declared = DeclaredRelations::default();
        for document in self.documents().values() {
            for relation in document.tree().relations() {
                let entry = declared
                    .by_name
                    .entry(relation.name.clone())
                    .or_insert(DeclaredRelation {
                        count: 0,
                        kind: None,
                    });
                entry.count += 1;
                entry.kind = relation.kind.clone();

                let kind = relation.kind.as_deref().unwrap_or(NO_TYPE).to_string();
                declared
                    .by_type
                    .entry(kind.clone())
                    .or_default()
                    .insert(relation.name.clone());
                *declared.type_counts.entry(kind).or_insert(0) += 1;
            }
        }
        declared
    }

    /// Up to `limit` occurrences matching `filter`.
    pub fn grouped_relation_examples(
        &self,
        filter: &ExampleFilter,
        limit: usize,
    ) -> Vec<RelationExample<'_>> {
        self.relations()
            .filter(|(_, relation)| filter.matches(relation))
            .take(limit)
            .map(|(document, relation)| RelationExample {
                document: &document.filename,
                relation,
            })
            .collect()
    }
}
