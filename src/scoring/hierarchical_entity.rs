//! Hierarchy-aware entity matcher.
//!
//! Extends exact entity identity with subsumption: a query concept that is
//! an ancestor or descendant of a document concept in a [`ConceptHierarchy`]
//! earns partial credit that decays with the number of edges between them.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use compsim::scoring::hierarchical_entity::ConceptHierarchy;
//!
//! let hierarchy = ConceptHierarchy::new(HashMap::from([
//!     ("cat".to_string(), "feline".to_string()),
//!     ("feline".to_string(), "animal".to_string()),
//! ]))
//! .unwrap();
//!
//! assert_eq!(hierarchy.distance("cat", "animal"), Some(2));
//! assert_eq!(hierarchy.distance("animal", "cat"), Some(2));
//! assert_eq!(hierarchy.distance("cat", "dog"), None);
//! ```

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::document::document::Document;
use crate::error::{CompsimError, Result};
use crate::scoring::config::HierarchicalEntityConfig;
use crate::scoring::element::ElementScorer;
use crate::scoring::entity_identity::span_tokens;
use crate::scoring::link::Link;
use crate::scoring::matrix::SimilarityMatrix;

/// Child concept id → parent concept id. Guaranteed acyclic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HashMap<String, String>", into = "HashMap<String, String>")]
pub struct ConceptHierarchy {
    parents: HashMap<String, String>,
}

impl ConceptHierarchy {
    /// Build a hierarchy, rejecting parent cycles.
    pub fn new(parents: HashMap<String, String>) -> Result<Self> {
        for start in parents.keys() {
            let mut current = start.as_str();
            let mut steps = 0;
            while let Some(parent) = parents.get(current) {
                steps += 1;
                if steps > parents.len() {
                    return Err(CompsimError::config(format!(
                        "concept hierarchy has a cycle through '{start}'"
                    )));
                }
                current = parent.as_str();
            }
        }
        Ok(ConceptHierarchy { parents })
    }

    /// Number of child → parent edges recorded.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Edges from `id` up to `ancestor`, if `ancestor` is on its chain.
    fn depth_below(&self, id: &str, ancestor: &str) -> Option<usize> {
        let mut current = id;
        let mut depth = 0;
        loop {
            if current == ancestor {
                return Some(depth);
            }
            current = self.parents.get(current)?.as_str();
            depth += 1;
        }
    }

    /// Edges between two concepts related by subsumption; `None` otherwise.
    pub fn distance(&self, a: &str, b: &str) -> Option<usize> {
        self.depth_below(a, b).or_else(|| self.depth_below(b, a))
    }
}

impl TryFrom<HashMap<String, String>> for ConceptHierarchy {
    type Error = CompsimError;

    fn try_from(parents: HashMap<String, String>) -> Result<Self> {
        ConceptHierarchy::new(parents)
    }
}

impl From<ConceptHierarchy> for HashMap<String, String> {
    fn from(hierarchy: ConceptHierarchy) -> Self {
        hierarchy.parents
    }
}

/// Scores entity pairs by `decay ^ distance` in the concept hierarchy.
#[derive(Debug, Clone, Default)]
pub struct HierarchicalEntityScorer {
    config: HierarchicalEntityConfig,
}

impl HierarchicalEntityScorer {
    pub fn new(config: HierarchicalEntityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HierarchicalEntityConfig {
        &self.config
    }

    fn similarity(&self, a: &str, b: &str) -> (f32, Option<usize>) {
        if a == b {
            return (1.0, Some(0));
        }
        if a.is_empty() || b.is_empty() {
            return (0.0, None);
        }
        match self.config.hierarchy.distance(a, b) {
            Some(distance) => (self.config.decay.powi(distance as i32), Some(distance)),
            None => (0.0, None),
        }
    }
}

impl ElementScorer for HierarchicalEntityScorer {
    fn name(&self) -> &'static str {
        "hierarchical_entity"
    }

    fn score(&self, query: &Document, document: &Document, _links: &[Link]) -> Result<Vec<Link>> {
        let query_entities = query.entities();
        let document_entities = document.entities();
        if query_entities.is_empty() || document_entities.is_empty() {
            return Ok(Vec::new());
        }

        let query_ids: Vec<&str> = query_entities
            .iter()
            .map(|e| query.span_entity_id(e))
            .collect();
        let document_ids: Vec<&str> = document_entities
            .iter()
            .map(|e| document.span_entity_id(e))
            .collect();

        let matrix = SimilarityMatrix::from_fn(query_ids.len(), document_ids.len(), |i, j| {
            self.similarity(query_ids[i], document_ids[j]).0
        });

        let mut links = Vec::new();
        for (i, (best, score)) in matrix.row_argmax().into_iter().enumerate() {
            if score <= self.config.threshold {
                continue;
            }
            let (q_id, d_id) = (query_ids[i], document_ids[best]);
            let explanation = match self.similarity(q_id, d_id).1 {
                Some(0) => format!("same concept [{q_id}]"),
                Some(distance) => {
                    format!("subsumed concept [{q_id}] ~ [{d_id}] (distance {distance})")
                }
                None => "different".to_string(),
            };
            links.push(Link::new(
                span_tokens(&query_entities[i]),
                score,
                span_tokens(&document_entities[best]),
                explanation,
            )?);
        }

        debug!(
            "hierarchical_entity: {} of {} query entities related",
            links.len(),
            query_entities.len()
        );
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::token::Token;

    fn hierarchy() -> ConceptHierarchy {
        ConceptHierarchy::new(HashMap::from([
            ("cat".to_string(), "feline".to_string()),
            ("feline".to_string(), "animal".to_string()),
            ("dog".to_string(), "animal".to_string()),
        ]))
        .unwrap()
    }

    fn doc(ids: &[&str]) -> Document {
        Document::builder()
            .tokens(ids.iter().map(|id| Token::new(*id).with_entity_id(*id)))
            .entity(0..1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_rejects_cycles() {
        let result = ConceptHierarchy::new(HashMap::from([
            ("a".to_string(), "b".to_string()),
            ("b".to_string(), "a".to_string()),
        ]));
        assert!(matches!(result, Err(CompsimError::Config(_))));
    }

    #[test]
    fn test_distance() {
        let h = hierarchy();
        assert_eq!(h.distance("cat", "cat"), Some(0));
        assert_eq!(h.distance("cat", "feline"), Some(1));
        assert_eq!(h.distance("animal", "cat"), Some(2));
        assert_eq!(h.distance("cat", "dog"), None);
    }

    #[test]
    fn test_deserialize_validates() {
        let h: ConceptHierarchy = serde_json::from_str(r#"{"cat": "animal"}"#).unwrap();
        assert_eq!(h.len(), 1);
        assert!(serde_json::from_str::<ConceptHierarchy>(r#"{"a": "a"}"#).is_err());
    }

    #[test]
    fn test_partial_credit_decays() {
        let scorer = HierarchicalEntityScorer::new(HierarchicalEntityConfig {
            hierarchy: hierarchy(),
            ..HierarchicalEntityConfig::default()
        });

        let links = scorer.score(&doc(&["cat"]), &doc(&["animal"]), &[]).unwrap();
        assert_eq!(links.len(), 1);
        assert!((links[0].score - 0.25).abs() < 1e-6);
        assert_eq!(
            links[0].explanation,
            "subsumed concept [cat] ~ [animal] (distance 2)"
        );

        let links = scorer.score(&doc(&["cat"]), &doc(&["cat"]), &[]).unwrap();
        assert_eq!(links[0].score, 1.0);
        assert_eq!(links[0].explanation, "same concept [cat]");

        let links = scorer.score(&doc(&["cat"]), &doc(&["dog"]), &[]).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_empty_ids_match_only_each_other() {
        let scorer = HierarchicalEntityScorer::new(HierarchicalEntityConfig::new(hierarchy()));

        let links = scorer.score(&doc(&[""]), &doc(&[""]), &[]).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].score, 1.0);
        assert_eq!(links[0].explanation, "same concept []");

        let links = scorer.score(&doc(&[""]), &doc(&["animal"]), &[]).unwrap();
        assert!(links.is_empty());
    }
}
