//! Simple late-interaction scoring.
//!
//! Every vectorized query token is matched to its most similar vectorized
//! document token (no span units, no conflict resolution) and the score is
//! the mean of those maxima. Cheaper than the composite pipeline and always
//! bounded by 1.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::document::document::Document;
use crate::document::token::Token;
use crate::error::Result;
use crate::scoring::matrix::SimilarityMatrix;
use crate::scoring::token_vector::PREVIEW_CHARS;

/// Best document token for one query token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenAlignment {
    /// Index of the query token in its document.
    pub query_index: usize,
    /// Index of the best-matching document token in its document.
    pub document_index: usize,
    pub similarity: f32,
}

/// Late-interaction score with per-token diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateInteractionSimilarity {
    pub score: f32,
    pub alignments: Vec<TokenAlignment>,
}

/// Max-sim scorer over token vectors.
///
/// With `filter_low_information` set, tokens whose information content is
/// known and not positive (stop-words and the like) are removed from both
/// sides first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LateInteractionScorer {
    pub filter_low_information: bool,
}

impl LateInteractionScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn information_weighted() -> Self {
        Self {
            filter_low_information: true,
        }
    }

    fn participants<'a>(&self, doc: &'a Document) -> Vec<&'a Token> {
        doc.vectorized_tokens()
            .filter(|t| !self.filter_low_information || t.is_informative())
            .collect()
    }

    pub fn score(&self, query: &Document, document: &Document) -> Result<LateInteractionSimilarity> {
        let query_tokens = self.participants(query);
        let document_tokens = self.participants(document);

        if query_tokens.is_empty() || document_tokens.is_empty() {
            let side = if query_tokens.is_empty() { "Query" } else { "Document" };
            let doc = if query_tokens.is_empty() { query } else { document };
            warn!(
                "{side} has no tokens with a vector. [{}...]",
                doc.text_preview(PREVIEW_CHARS)
            );
            return Ok(LateInteractionSimilarity {
                score: 0.0,
                alignments: Vec::new(),
            });
        }

        let rows: Vec<&[f32]> = query_tokens.iter().filter_map(|t| t.vector()).collect();
        let cols: Vec<&[f32]> = document_tokens.iter().filter_map(|t| t.vector()).collect();
        let matrix = SimilarityMatrix::cosine(&rows, &cols)?;

        let alignments: Vec<TokenAlignment> = query_tokens
            .iter()
            .zip(matrix.row_argmax())
            .map(|(q, (d, similarity))| TokenAlignment {
                query_index: q.index,
                document_index: document_tokens[d].index,
                similarity,
            })
            .collect();

        let score = alignments.iter().map(|a| a.similarity).sum::<f32>() / alignments.len() as f32;
        Ok(LateInteractionSimilarity { score, alignments })
    }
}

/// Plain late interaction over all vectorized tokens.
pub fn late_interaction_similarity(
    query: &Document,
    document: &Document,
) -> Result<LateInteractionSimilarity> {
    LateInteractionScorer::new().score(query, document)
}

/// Late interaction after dropping low-information tokens.
pub fn information_weighted_late_interaction(
    query: &Document,
    document: &Document,
) -> Result<LateInteractionSimilarity> {
    LateInteractionScorer::information_weighted().score(query, document)
}
