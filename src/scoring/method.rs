//! Interchangeable document-level similarity methods.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::document::document::Document;
use crate::error::Result;
use crate::scoring::aggregator::CompositeScorer;
use crate::scoring::late_interaction::LateInteractionScorer;

/// Which similarity to compute between two documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    /// Mean of per-token maximum cosine similarities.
    LateInteraction,
    /// Late interaction without low-information tokens.
    InformationWeighted,
    /// Composite link aggregation with explanations.
    #[default]
    Complex,
}

impl SimilarityMethod {
    pub fn name(&self) -> &'static str {
        match self {
            SimilarityMethod::LateInteraction => "late_interaction",
            SimilarityMethod::InformationWeighted => "information_weighted",
            SimilarityMethod::Complex => "complex",
        }
    }

    /// Score `document` against `query`. `composite` is used by
    /// [`SimilarityMethod::Complex`] only.
    pub fn score(
        &self,
        query: &Document,
        document: &Document,
        composite: &CompositeScorer,
    ) -> Result<f32> {
        match self {
            SimilarityMethod::LateInteraction => {
                Ok(LateInteractionScorer::new().score(query, document)?.score)
            }
            SimilarityMethod::InformationWeighted => {
                Ok(LateInteractionScorer::information_weighted()
                    .score(query, document)?
                    .score)
            }
            SimilarityMethod::Complex => Ok(composite.score(query, document)?.score),
        }
    }

    /// `score(query, document) / score(query, query)`, or 0 when the query
    /// has no self-similarity.
    pub fn normalized_score(
        &self,
        query: &Document,
        document: &Document,
        composite: &CompositeScorer,
    ) -> Result<f32> {
        let self_score = self.score(query, query, composite)?;
        if self_score == 0.0 {
            return Ok(0.0);
        }
        Ok(self.score(query, document, composite)? / self_score)
    }
}

/// [`SimilarityMethod::normalized_score`] with the default composite elements.
pub fn normalized_similarity(
    query: &Document,
    document: &Document,
    method: SimilarityMethod,
) -> Result<f32> {
    method.normalized_score(query, document, &CompositeScorer::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::token::Token;

    fn doc(vectors: &[[f32; 2]]) -> Document {
        Document::builder()
            .tokens(
                vectors
                    .iter()
                    .enumerate()
                    .map(|(i, v)| Token::new(format!("t{i}")).with_vector(v.to_vec())),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_methods_agree_on_plain_tokens() {
        let query = doc(&[[1.0, 0.0], [0.0, 1.0]]);
        let document = doc(&[[0.6, 0.8]]);
        let composite = CompositeScorer::default();

        let late = SimilarityMethod::LateInteraction
            .score(&query, &document, &composite)
            .unwrap();
        assert!((late - 0.7).abs() < 1e-5);

        let weighted = SimilarityMethod::InformationWeighted
            .score(&query, &document, &composite)
            .unwrap();
        assert!((weighted - late).abs() < 1e-6);

        // Both query tokens want the single document token; only one link survives.
        let complex = SimilarityMethod::Complex
            .score(&query, &document, &composite)
            .unwrap();
        assert!((complex - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_normalized_score() {
        let query = doc(&[[1.0, 0.0], [0.0, 1.0]]);
        let document = doc(&[[1.0, 0.0]]);
        let composite = CompositeScorer::default();

        let normalized = SimilarityMethod::LateInteraction
            .normalized_score(&query, &document, &composite)
            .unwrap();
        assert!((normalized - 0.5).abs() < 1e-6);

        let empty = Document::builder().token(Token::new("xabf")).build().unwrap();
        let normalized = SimilarityMethod::Complex
            .normalized_score(&empty, &document, &composite)
            .unwrap();
        assert_eq!(normalized, 0.0);
    }

    #[test]
    fn test_self_normalizes_to_one() {
        let query = doc(&[[1.0, 0.0], [0.3, 0.7]]);
        for method in [
            SimilarityMethod::LateInteraction,
            SimilarityMethod::InformationWeighted,
            SimilarityMethod::Complex,
        ] {
            let normalized = normalized_similarity(&query, &query, method).unwrap();
            assert!((normalized - 1.0).abs() < 1e-6, "{method:?}");
        }
    }
}
