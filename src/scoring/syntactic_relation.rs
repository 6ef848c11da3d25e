//! Syntactic-relation booster.
//!
//! Strengthens strong entity-to-entity links whose noun chunks hang off
//! similar heads with the same dependency role, e.g. the subjects of
//! "drug1 reduces symptom2" and "drug1 lowers symptom2". The booster emits
//! new, wider links; prior links are read but never changed, and links that
//! fail the test are not re-emitted.

use log::{debug, trace};

use crate::document::document::Document;
use crate::document::token::Token;
use crate::error::Result;
use crate::scoring::config::SyntacticRelationConfig;
use crate::scoring::element::ElementScorer;
use crate::scoring::link::{Link, Unit};
use crate::util::simd;

#[derive(Debug, Clone, Default)]
pub struct SyntacticRelationScorer {
    config: SyntacticRelationConfig,
}

impl SyntacticRelationScorer {
    pub fn new(config: SyntacticRelationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyntacticRelationConfig {
        &self.config
    }

    fn boost(&self, link: &Link, query: &Document, document: &Document) -> Result<Option<Link>> {
        if link.score <= self.config.threshold {
            return Ok(None);
        }

        let (Some(q_index), Some(d_index)) =
            (link.primary_query_token(), link.primary_document_token())
        else {
            return Ok(None);
        };
        let (Some(q_token), Some(d_token)) = (query.token(q_index), document.token(d_index)) else {
            return Ok(None);
        };
        if !q_token.is_entity() || !d_token.is_entity() {
            return Ok(None);
        }

        let (Some(q_chunk), Some(d_chunk)) = (
            query.noun_chunk_containing(q_index),
            document.noun_chunk_containing(d_index),
        ) else {
            trace!("syntactic_relation: no noun chunk around {} / {}", q_token.text, d_token.text);
            return Ok(None);
        };

        let (Some(q_head), Some(d_head)) =
            (query.head_of(q_chunk.root), document.head_of(d_chunk.root))
        else {
            trace!("syntactic_relation: no head above chunk root for {}", q_token.text);
            return Ok(None);
        };

        let q_root = &query.tokens()[q_chunk.root];
        let d_root = &document.tokens()[d_chunk.root];
        let root_similarity = token_similarity(q_head, d_head)?;

        if root_similarity <= self.config.root_threshold || q_root.dep != d_root.dep {
            return Ok(None);
        }

        let mut query_units = link.query.clone();
        query_units.push(Unit::Token(q_head.index));
        let mut document_units = link.document.clone();
        document_units.push(Unit::Token(d_head.index));

        Link::new(
            query_units,
            link.score + root_similarity,
            document_units,
            format!(
                "{}. Related verbs {} and {} [{}].",
                link.explanation, q_head.text, d_head.text, d_root.dep
            ),
        )
        .map(Some)
    }
}

/// Cosine similarity of two tokens, 0 when either lacks a vector.
fn token_similarity(a: &Token, b: &Token) -> Result<f32> {
    match (a.vector(), b.vector()) {
        (Some(x), Some(y)) => simd::cosine_similarity(x, y),
        _ => Ok(0.0),
    }
}

impl ElementScorer for SyntacticRelationScorer {
    fn name(&self) -> &'static str {
        "syntactic_relation"
    }

    fn score(&self, query: &Document, document: &Document, links: &[Link]) -> Result<Vec<Link>> {
        let mut boosted = Vec::new();
        for link in links {
            if let Some(new_link) = self.boost(link, query, document)? {
                boosted.push(new_link);
            }
        }

        debug!(
            "syntactic_relation: boosted {} of {} prior links",
            boosted.len(),
            links.len()
        );
        Ok(boosted)
    }
}
