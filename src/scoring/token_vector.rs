//! Token-vector matcher: per-token nearest neighbour by cosine similarity.

use std::borrow::Cow;

use log::{debug, warn};

use crate::document::document::Document;
use crate::document::token::Token;
use crate::error::Result;
use crate::scoring::config::TokenVectorConfig;
use crate::scoring::element::ElementScorer;
use crate::scoring::link::{Link, Unit};
use crate::scoring::matrix::SimilarityMatrix;

/// Tolerance under which a similarity counts as an identical token.
const SAME_TOKEN_TOLERANCE: f32 = 1e-3;

/// Characters of document text quoted in warnings.
pub(crate) const PREVIEW_CHARS: usize = 50;

/// Links every vectorized query token to its most similar document unit.
///
/// Document-side candidates are the vectorized tokens followed, when
/// enabled, by entity spans that have a vector and by all noun chunks. Each
/// span competes as a single unit through its mean vector. Ties go to the
/// earliest candidate in that order.
#[derive(Debug, Clone, Default)]
pub struct TokenVectorScorer {
    config: TokenVectorConfig,
}

impl TokenVectorScorer {
    pub fn new(config: TokenVectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TokenVectorConfig {
        &self.config
    }

    fn candidates<'a>(
        &self,
        document: &'a Document,
        tokens: &[&'a Token],
        dimension: usize,
    ) -> Vec<(Unit, Cow<'a, [f32]>)> {
        let mut candidates: Vec<(Unit, Cow<'a, [f32]>)> = tokens
            .iter()
            .filter_map(|t| t.vector().map(|v| (Unit::Token(t.index), Cow::Borrowed(v))))
            .collect();

        if self.config.allow_entities {
            candidates.extend(document.entities().iter().filter_map(|entity| {
                document
                    .span_vector(entity)
                    .map(|v| (Unit::Span(*entity), Cow::Owned(v)))
            }));
        }

        if self.config.allow_chunks {
            candidates.extend(document.noun_chunks().iter().map(|chunk| {
                let vector = document
                    .span_vector(chunk)
                    .unwrap_or_else(|| vec![0.0; dimension]);
                (Unit::Span(*chunk), Cow::Owned(vector))
            }));
        }

        candidates
    }
}

impl ElementScorer for TokenVectorScorer {
    fn name(&self) -> &'static str {
        "token_vector"
    }

    fn score(&self, query: &Document, document: &Document, _links: &[Link]) -> Result<Vec<Link>> {
        let query_tokens: Vec<&Token> = query.vectorized_tokens().collect();
        if query_tokens.is_empty() {
            warn!(
                "Query has no tokens with a vector. [{}...]",
                query.text_preview(PREVIEW_CHARS)
            );
            return Ok(Vec::new());
        }

        let document_tokens: Vec<&Token> = document.vectorized_tokens().collect();
        let Some(dimension) = document.dimension().filter(|_| !document_tokens.is_empty()) else {
            warn!(
                "Document has no tokens with a vector. [{}...]",
                document.text_preview(PREVIEW_CHARS)
            );
            return Ok(Vec::new());
        };

        let candidates = self.candidates(document, &document_tokens, dimension);
        let rows: Vec<&[f32]> = query_tokens.iter().filter_map(|t| t.vector()).collect();
        let cols: Vec<&[f32]> = candidates.iter().map(|(_, v)| v.as_ref()).collect();
        let matrix = SimilarityMatrix::cosine(&rows, &cols)?;

        let mut links = Vec::with_capacity(query_tokens.len());
        for (token, (best, score)) in query_tokens.iter().zip(matrix.row_argmax()) {
            if score <= self.config.threshold {
                continue;
            }
            let explanation = if (score - 1.0).abs() <= SAME_TOKEN_TOLERANCE {
                "same token".to_string()
            } else {
                format!("{score:.3} semantic similarity")
            };
            links.push(Link::new(
                vec![Unit::Token(token.index)],
                score,
                vec![candidates[best].0],
                explanation,
            )?);
        }

        debug!(
            "token_vector: {} links from {} query tokens against {} candidates",
            links.len(),
            query_tokens.len(),
            candidates.len()
        );
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::span::SpanKind;

    fn query() -> Document {
        Document::builder()
            .token(Token::new("cat").with_vector(vec![1.0, 0.0, 0.0]))
            .token(Token::new("the"))
            .token(Token::new("runs").with_vector(vec![0.0, 1.0, 0.0]))
            .build()
            .unwrap()
    }

    fn document() -> Document {
        Document::builder()
            .token(Token::new("quick").with_vector(vec![0.0, 0.6, 0.8]))
            .token(Token::new("feline").with_vector(vec![0.9, 0.1, 0.0]))
            .token(Token::new("cat").with_vector(vec![1.0, 0.0, 0.0]))
            .noun_chunk(0..2)
            .build()
            .unwrap()
    }

    #[test]
    fn test_one_link_per_vectorized_query_token() {
        let links = TokenVectorScorer::default()
            .score(&query(), &document(), &[])
            .unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].query, vec![Unit::Token(0)]);
        assert_eq!(links[0].document, vec![Unit::Token(2)]);
        assert_eq!(links[0].explanation, "same token");
        assert_eq!(links[1].query, vec![Unit::Token(2)]);
        assert_eq!(links[1].document, vec![Unit::Token(0)]);
        assert!((links[1].score - 0.6).abs() < 1e-6);
        assert_eq!(links[1].explanation, "0.600 semantic similarity");
    }

    #[test]
    fn test_noun_chunk_can_win() {
        let query = Document::builder()
            .token(Token::new("kitty").with_vector(vec![0.45, 0.35, 0.4]))
            .build()
            .unwrap();
        let doc = document();

        let links = TokenVectorScorer::default().score(&query, &doc, &[]).unwrap();
        assert_eq!(links.len(), 1);
        assert!(matches!(
            links[0].document[0],
            Unit::Span(span) if span.kind == SpanKind::NounChunk
        ));

        let tokens_only = TokenVectorScorer::new(TokenVectorConfig {
            allow_chunks: false,
            ..TokenVectorConfig::default()
        });
        let links = tokens_only.score(&query, &doc, &[]).unwrap();
        assert!(matches!(links[0].document[0], Unit::Token(_)));
    }

    #[test]
    fn test_entity_span_candidates() {
        // "new york" has a mean vector; "xabf" has none.
        let doc = Document::builder()
            .token(Token::new("new").with_vector(vec![1.0, 0.0, 0.0]))
            .token(Token::new("york").with_vector(vec![0.0, 1.0, 0.0]))
            .token(Token::new("xabf"))
            .token(Token::new("city").with_vector(vec![0.0, 0.0, 1.0]))
            .entity(0..2)
            .entity(2..3)
            .build()
            .unwrap();
        let query = Document::builder()
            .token(Token::new("nyc").with_vector(vec![0.5, 0.5, 0.0]))
            .build()
            .unwrap();

        let scorer = TokenVectorScorer::default();
        let tokens: Vec<&Token> = doc.vectorized_tokens().collect();
        let candidates = scorer.candidates(&doc, &tokens, 3);
        assert_eq!(candidates.len(), 4);
        assert!(candidates.iter().all(|(unit, _)| !matches!(
            unit,
            Unit::Span(span) if span.start == 2
        )));

        let links = scorer.score(&query, &doc, &[]).unwrap();
        assert_eq!(links.len(), 1);
        assert!(matches!(
            links[0].document[0],
            Unit::Span(span) if span.kind == SpanKind::Entity && span.start == 0 && span.end == 2
        ));
        assert!((links[0].score - 1.0).abs() < 1e-5);

        let no_entities = TokenVectorScorer::new(TokenVectorConfig::default().with_entities(false));
        let links = no_entities.score(&query, &doc, &[]).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].document, vec![Unit::Token(0)]);
    }

    #[test]
    fn test_threshold_drops_weak_links() {
        let scorer = TokenVectorScorer::new(TokenVectorConfig {
            threshold: 0.7,
            ..TokenVectorConfig::default()
        });
        let links = scorer.score(&query(), &document(), &[]).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].explanation, "same token");
    }

    #[test]
    fn test_vacuous_inputs_yield_no_links() {
        let empty = Document::builder()
            .token(Token::new("xabf"))
            .build()
            .unwrap();
        let scorer = TokenVectorScorer::default();
        assert!(scorer.score(&empty, &document(), &[]).unwrap().is_empty());
        assert!(scorer.score(&query(), &empty, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_cross_document_dimension_mismatch_is_fatal() {
        let other = Document::builder()
            .token(Token::new("cat").with_vector(vec![1.0, 0.0]))
            .build()
            .unwrap();
        assert!(TokenVectorScorer::default().score(&query(), &other, &[]).is_err());
    }
}
