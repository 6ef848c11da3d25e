//! Explainable query/document similarity.
//!
//! Independent element scorers propose [`Link`]s between query and document
//! units; the [`CompositeScorer`] merges them into one non-redundant
//! alignment and reduces it to a score whose retained links explain it.
//! [`LateInteractionScorer`] is the single-strategy alternative.
//!
//! # Module Structure
//!
//! - `link`: links and the units they connect
//! - `matrix`: cosine similarity matrices with stable arg-max
//! - `element`: the [`ElementScorer`] trait
//! - `token_vector`, `entity_identity`, `hierarchical_entity`,
//!   `syntactic_relation`: the element scorers
//! - `aggregator`: conflict resolution and score reduction
//! - `late_interaction`: simple max-sim scoring
//! - `config`: thresholds and toggles
//! - `method`: document-level method selection and normalization

pub mod aggregator;
pub mod config;
pub mod element;
pub mod entity_identity;
pub mod hierarchical_entity;
pub mod late_interaction;
pub mod link;
pub mod matrix;
pub mod method;
pub mod syntactic_relation;
pub mod token_vector;

pub use self::aggregator::{ComplexSimilarity, CompositeScorer, complex_similarity};
pub use self::config::ScoringConfig;
pub use self::element::ElementScorer;
pub use self::late_interaction::{
    LateInteractionScorer, LateInteractionSimilarity, TokenAlignment,
    information_weighted_late_interaction, late_interaction_similarity,
};
pub use self::link::{Link, Unit};
pub use self::method::{SimilarityMethod, normalized_similarity};
