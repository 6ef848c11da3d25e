//! # compsim
//!
//! Asymmetric, explainable similarity between annotated token sequences.
//!
//! ## Features
//!
//! - Composable element scorers proposing token and span links
//! - Greedy, conflict-free link aggregation with per-link explanations
//! - Token-vector, entity-identity, concept-hierarchy and syntactic evidence
//! - Simple and information-weighted late interaction
//! - Parallel batch ranking
//!
//! ## Example
//!
//! ```
//! use compsim::prelude::*;
//!
//! let query = Document::builder()
//!     .token(Token::new("drug1").with_entity_id("3").with_dep("nsubj").with_head(1))
//!     .token(Token::new("reduces").with_vector(vec![0.0, 1.0, 0.0]).with_dep("ROOT").with_head(1))
//!     .token(Token::new("symptom2").with_entity_id("6").with_dep("dobj").with_head(1))
//!     .entity(0..1)
//!     .entity(2..3)
//!     .noun_chunk(0..1)
//!     .noun_chunk(2..3)
//!     .build()
//!     .unwrap();
//!
//! let result = complex_similarity(&query, &query, None).unwrap();
//! assert!(result.score > 1.0);
//! for link in &result.links {
//!     println!("{}", link.describe(&query, &query));
//! }
//! ```

pub mod cli;
pub mod document;
pub mod error;
pub mod ranking;
pub mod scoring;
pub mod util;

pub mod prelude {
    pub use crate::document::{Document, DocumentBuilder, Span, SpanKind, Token};
    pub use crate::error::{CompsimError, Result};
    pub use crate::ranking::{RankedDocument, rank_documents};
    pub use crate::scoring::{
        ComplexSimilarity, CompositeScorer, ElementScorer, LateInteractionSimilarity, Link,
        ScoringConfig, SimilarityMethod, Unit, complex_similarity,
        information_weighted_late_interaction, late_interaction_similarity, normalized_similarity,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
