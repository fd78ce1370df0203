//! Search index for fast substring matching.
//!
//! An n-gram inverted index over every searchable text of a node: its
//! label, id, entity type name and property values. A query's n-grams are
//! intersected to get candidates, which are then confirmed with a real
//! substring check.

use crate::graph::{NodeId, OntologyGraph};
use std::collections::{HashMap, HashSet};

/// Minimum n-gram length for indexing.
const MIN_NGRAM_LEN: usize = 2;

/// Maximum n-gram length for indexing.
const MAX_NGRAM_LEN: usize = 4;

/// An inverted index for fast substring search.
#[derive(Debug, Default, Clone)]
pub struct SearchIndex {
    /// Lowercased searchable texts per node.
    texts: HashMap<NodeId, Vec<String>>,
    /// Maps lowercased n-grams to NodeIds for substring search.
    ngram_index: HashMap<String, HashSet<NodeId>>,
}

impl SearchIndex {
    /// Creates a new empty search index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every node of a graph.
    pub fn build(graph: &OntologyGraph) -> Self {
        let mut index = Self::new();
        for idx in graph.node_indexes() {
            if let Some(node) = graph.get(idx) {
                index.insert(&node.label, idx);
                index.insert(&node.id, idx);
                index.insert(node.entity_type.as_str(), idx);
                index.insert(node.entity_type.display_name(), idx);
                for value in node.properties.values() {
                    index.insert(value, idx);
                }
            }
        }
        index
    }

    /// Inserts one searchable text for a node.
    pub fn insert(&mut self, text: &str, id: NodeId) {
        let lower = text.to_lowercase();
        if lower.is_empty() {
            return;
        }

        for ngram in generate_ngrams(&lower) {
            self.ngram_index.entry(ngram).or_default().insert(id);
        }
        self.texts.entry(id).or_default().push(lower);
    }

    /// Searches for nodes with any text containing the query.
    ///
    /// Returns matching NodeIds in store order. An empty query matches
    /// nothing.
    pub fn search(&self, query: &str) -> Vec<NodeId> {
        let query_lower = query.to_lowercase();
        if query_lower.is_empty() {
            return Vec::new();
        }

        let query_len = query_lower.chars().count();

        // Single characters have no n-grams; scan the texts instead
        let candidates: Vec<NodeId> = if query_len < MIN_NGRAM_LEN {
            self.texts.keys().copied().collect()
        } else {
            let query_ngrams = generate_ngrams(&query_lower);
            let mut candidates: Option<HashSet<NodeId>> = None;

            for ngram in &query_ngrams {
                match self.ngram_index.get(ngram) {
                    Some(ids) => match &mut candidates {
                        None => candidates = Some(ids.clone()),
                        Some(c) => c.retain(|id| ids.contains(id)),
                    },
                    // If any n-gram has no matches, the query has no results
                    None => return Vec::new(),
                }
            }

            candidates.unwrap_or_default().into_iter().collect()
        };

        // n-gram intersection can have false positives
        let mut results: Vec<NodeId> = candidates
            .into_iter()
            .filter(|id| {
                self.texts
                    .get(id)
                    .map_or(false, |texts| texts.iter().any(|t| t.contains(&query_lower)))
            })
            .collect();

        results.sort();
        results
    }

    /// Returns the number of indexed nodes.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Generates n-grams for a lowercased string.
fn generate_ngrams(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut ngrams = Vec::new();

    for n in MIN_NGRAM_LEN..=MAX_NGRAM_LEN {
        if chars.len() >= n {
            for i in 0..=(chars.len() - n) {
                ngrams.push(chars[i..i + n].iter().collect());
            }
        }
    }

    ngrams
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::NodeIndex;

    fn node_id(n: u32) -> NodeId {
        NodeIndex::new(n as usize)
    }

    #[test]
    fn test_search_substring() {
        let mut index = SearchIndex::new();
        index.insert("KR-US-WC", node_id(0));
        index.insert("KR-US-EC", node_id(1));
        index.insert("KR-EU", node_id(2));

        let results = index.search("kr-us");
        assert_eq!(results, vec![node_id(0), node_id(1)]);
    }

    #[test]
    fn test_search_case_insensitive() {
        let mut index = SearchIndex::new();
        index.insert("Samsung Elec", node_id(0));

        assert_eq!(index.search("SAMSUNG"), vec![node_id(0)]);
        assert_eq!(index.search("sung el"), vec![node_id(0)]);
    }

    #[test]
    fn test_any_text_of_a_node_matches() {
        let mut index = SearchIndex::new();
        index.insert("KMTC SEOUL", node_id(3));
        index.insert("VSL-002", node_id(3));
        index.insert("Hyundai Merchant", node_id(1));

        assert_eq!(index.search("vsl"), vec![node_id(3)]);
        assert_eq!(index.search("seoul"), vec![node_id(3)]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_results_in_store_order() {
        let mut index = SearchIndex::new();
        index.insert("port b", node_id(5));
        index.insert("port a", node_id(1));
        index.insert("port c", node_id(3));

        assert_eq!(index.search("port"), vec![node_id(1), node_id(3), node_id(5)]);
    }

    #[test]
    fn test_search_no_match() {
        let mut index = SearchIndex::new();
        index.insert("hello", node_id(0));

        assert!(index.search("world").is_empty());
        assert!(index.search("").is_empty());
    }

    #[test]
    fn test_single_char_query_is_substring() {
        let mut index = SearchIndex::new();
        index.insert("ab", node_id(0));
        index.insert("cba", node_id(1));
        index.insert("xyz", node_id(2));

        assert_eq!(index.search("a"), vec![node_id(0), node_id(1)]);
    }
}
