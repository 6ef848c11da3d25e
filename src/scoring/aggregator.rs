//! Composite aggregation: run the elements, resolve conflicts, reduce.
//!
//! ```text
//! query, document
//!       │
//!       ▼
//! ┌──────────────┐   ┌─────────────────┐   ┌────────────────────┐
//! │ token_vector │ → │ entity_identity │ → │ syntactic_relation │   (candidate links)
//! └──────────────┘   └─────────────────┘   └────────────────────┘
//!       │
//!       ▼
//! sort by (score ↓, width ↓) → greedy claim of unclaimed tokens → mean score
//! ```

use std::cmp::Ordering;

use ahash::AHashSet;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::document::Document;
use crate::error::Result;
use crate::scoring::config::ScoringConfig;
use crate::scoring::element::ElementScorer;
use crate::scoring::link::{Link, Unit};

/// Final score and the links that produced it.
///
/// The retained links double as the explanation trace, in the order they
/// were accepted (strongest first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexSimilarity {
    pub score: f32,
    pub links: Vec<Link>,
}

impl ComplexSimilarity {
    /// No surviving links: similarity 0 with an empty explanation.
    pub fn empty() -> Self {
        ComplexSimilarity {
            score: 0.0,
            links: Vec::new(),
        }
    }

    /// One explanation string per retained link.
    pub fn explanation(&self) -> Vec<&str> {
        self.links.iter().map(|l| l.explanation.as_str()).collect()
    }
}

/// Orchestrates an ordered list of element scorers into one score.
#[derive(Debug)]
pub struct CompositeScorer {
    elements: Vec<Box<dyn ElementScorer>>,
}

impl Default for CompositeScorer {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

impl CompositeScorer {
    /// Use a custom element list, run in the given order.
    pub fn new(elements: Vec<Box<dyn ElementScorer>>) -> Self {
        Self { elements }
    }

    /// Build the standard element list from a configuration.
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(config.elements())
    }

    pub fn elements(&self) -> &[Box<dyn ElementScorer>] {
        &self.elements
    }

    /// Run every element in order, each seeing the links before it.
    pub fn candidate_links(&self, query: &Document, document: &Document) -> Result<Vec<Link>> {
        let mut links: Vec<Link> = Vec::new();
        for element in &self.elements {
            let produced = element.score(query, document, &links)?;
            debug!("{}: produced {} candidate links", element.name(), produced.len());
            links.extend(produced);
        }
        Ok(links)
    }

    /// Score `document` against `query`.
    pub fn score(&self, query: &Document, document: &Document) -> Result<ComplexSimilarity> {
        let candidates = self.candidate_links(query, document)?;
        let retained = resolve_conflicts(candidates, query.id(), document.id());
        Ok(reduce(retained))
    }
}

/// Order links by score, then width, both descending. Equal keys keep
/// their production order.
fn by_strength(a: &Link, b: &Link) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.width().cmp(&a.width()))
}

fn claim_keys(units: &[Unit], doc: Uuid) -> impl Iterator<Item = (Uuid, usize)> + '_ {
    units
        .iter()
        .flat_map(move |unit| unit.token_indices().map(move |index| (doc, index)))
}

/// Greedy conflict resolution.
///
/// Walks links strongest first and accepts a link only when none of its
/// tokens (on either side) was claimed by an accepted link. Tokens are
/// identified by `(document id, index)`, and span units claim every member.
pub fn resolve_conflicts(mut links: Vec<Link>, query_id: Uuid, document_id: Uuid) -> Vec<Link> {
    links.sort_by(by_strength);

    let mut claimed: AHashSet<(Uuid, usize)> = AHashSet::new();
    let mut retained = Vec::new();
    for link in links {
        let conflicts = claim_keys(&link.query, query_id)
            .chain(claim_keys(&link.document, document_id))
            .any(|key| claimed.contains(&key));
        if conflicts {
            continue;
        }
        claimed.extend(claim_keys(&link.query, query_id));
        claimed.extend(claim_keys(&link.document, document_id));
        retained.push(link);
    }

    debug!("conflict resolution retained {} links", retained.len());
    retained
}

/// Arithmetic mean of the retained link scores.
pub fn reduce(links: Vec<Link>) -> ComplexSimilarity {
    if links.is_empty() {
        return ComplexSimilarity::empty();
    }
    let count = links.len() as f32;
    let score = links.iter().map(|l| l.score / count).sum();
    ComplexSimilarity { score, links }
}

/// Score with the default elements, or with `elements` when given.
pub fn complex_similarity(
    query: &Document,
    document: &Document,
    elements: Option<Vec<Box<dyn ElementScorer>>>,
) -> Result<ComplexSimilarity> {
    match elements {
        Some(elements) if !elements.is_empty() => CompositeScorer::new(elements).score(query, document),
        _ => CompositeScorer::default().score(query, document),
    }
}
