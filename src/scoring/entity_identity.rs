//! Entity-identity matcher: exact concept-id equality between entity spans.

use log::debug;

use crate::document::document::Document;
use crate::document::span::Span;
use crate::error::Result;
use crate::scoring::config::EntityIdentityConfig;
use crate::scoring::element::ElementScorer;
use crate::scoring::link::{Link, Unit};
use crate::scoring::matrix::SimilarityMatrix;

/// Treats entity-id equality as total semantic equivalence.
///
/// Every query entity is paired with the first document entity sharing its
/// id (score 1) or, failing that, the first document entity (score 0).
#[derive(Debug, Clone, Default)]
pub struct EntityIdentityScorer {
    config: EntityIdentityConfig,
}

impl EntityIdentityScorer {
    pub fn new(config: EntityIdentityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EntityIdentityConfig {
        &self.config
    }
}

/// One token unit per member of the span.
pub(crate) fn span_tokens(span: &Span) -> Vec<Unit> {
    span.token_range().map(Unit::Token).collect()
}

impl ElementScorer for EntityIdentityScorer {
    fn name(&self) -> &'static str {
        "entity_identity"
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
            if query_ids[i] == document_ids[j] {
                1.0
            } else {
                0.0
            }
        });

        let mut links = Vec::new();
        for (i, (best, score)) in matrix.row_argmax().into_iter().enumerate() {
            if score <= self.config.threshold {
                continue;
            }
            let explanation = if score == 1.0 {
                format!("same concept [{}]", query_ids[i])
            } else {
                "different".to_string()
            };
            links.push(Link::new(
                span_tokens(&query_entities[i]),
                score,
                span_tokens(&document_entities[best]),
                explanation,
            )?);
        }

        debug!(
            "entity_identity: {} of {} query entities matched",
            links.len(),
            query_entities.len()
        );
        Ok(links)
    }
}
