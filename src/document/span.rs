//! Entity and noun-chunk spans.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// The semantic role a span plays in its document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// A named-entity mention.
    Entity,
    /// A base noun phrase.
    NounChunk,
}

/// A contiguous, non-empty run of tokens `[start, end)` with a syntactic root.
///
/// Spans are plain coordinates into their document. Vectors and entity ids
/// are resolved through [`Document`](crate::document::Document), which
/// owns the tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
    /// Index of the token heading the span.
    pub root: usize,
}

impl Span {
    /// Number of tokens covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Spans are validated non-empty on construction; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether the token at `index` lies inside this span.
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// The covered token indices.
    pub fn token_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether two spans share at least one token.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}
