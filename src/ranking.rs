//! Ranking many documents against one query.
//!
//! Each comparison is an independent pure function of its two documents, so
//! larger batches fan out across the rayon thread pool with no
//! coordination. Small batches stay on the calling thread.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::document::Document;
use crate::error::Result;
use crate::scoring::aggregator::CompositeScorer;
use crate::scoring::method::SimilarityMethod;

const PARALLEL_THRESHOLD: usize = 16;

/// One scored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDocument {
    /// Position of the document in the input batch.
    pub position: usize,
    pub document_id: Uuid,
    pub score: f32,
}

/// Score every document and sort by score, highest first.
///
/// Documents with equal scores keep their input order.
pub fn rank_documents(
    query: &Document,
    documents: &[Document],
    method: SimilarityMethod,
    composite: &CompositeScorer,
) -> Result<Vec<RankedDocument>> {
    let score_one = |(position, document): (usize, &Document)| -> Result<RankedDocument> {
        Ok(RankedDocument {
            position,
            document_id: document.id(),
            score: method.score(query, document, composite)?,
        })
    };

    let mut ranked: Vec<RankedDocument> = if documents.len() < PARALLEL_THRESHOLD {
        documents.iter().enumerate().map(score_one).collect::<Result<_>>()?
    } else {
        documents
            .par_iter()
            .enumerate()
            .map(score_one)
            .collect::<Result<_>>()?
    };

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(ranked)
}
