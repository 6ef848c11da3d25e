//! Links: the unit of alignment evidence.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::document::document::Document;
use crate::document::span::Span;
use crate::error::{CompsimError, Result};

/// One comparable unit on either side of a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// A single token, by index.
    Token(usize),
    /// A whole span compared through its aggregate vector.
    Span(Span),
}

impl Unit {
    /// Token indices covered by this unit.
    pub fn token_indices(&self) -> Range<usize> {
        match self {
            Unit::Token(index) => *index..*index + 1,
            Unit::Span(span) => span.token_range(),
        }
    }

    /// The token index when this unit is a single token.
    pub fn as_token(&self) -> Option<usize> {
        match self {
            Unit::Token(index) => Some(*index),
            Unit::Span(_) => None,
        }
    }

    /// Surface text of the unit within `doc`.
    pub fn text(&self, doc: &Document) -> String {
        match self {
            Unit::Token(index) => doc
                .token(*index)
                .map(|t| t.text.clone())
                .unwrap_or_default(),
            Unit::Span(span) => doc.span_text(span),
        }
    }
}

/// Alignment evidence between query units and document units.
///
/// Both sides are non-empty. The `width` of a link is the number of query
/// units it covers; wider links win score ties during conflict resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub query: Vec<Unit>,
    pub score: f32,
    pub document: Vec<Unit>,
    pub explanation: String,
}

impl Link {
    /// Create a link, rejecting empty sides.
    pub fn new<S: Into<String>>(
        query: Vec<Unit>,
        score: f32,
        document: Vec<Unit>,
        explanation: S,
    ) -> Result<Self> {
        if query.is_empty() || document.is_empty() {
            return Err(CompsimError::invalid_link(format!(
                "link sides must be non-empty (query: {}, document: {})",
                query.len(),
                document.len()
            )));
        }
        Ok(Link {
            query,
            score,
            document,
            explanation: explanation.into(),
        })
    }

    /// Number of query-side units.
    pub fn width(&self) -> usize {
        self.query.len()
    }

    /// The first query unit, when it is a single token.
    pub fn primary_query_token(&self) -> Option<usize> {
        self.query.first().and_then(Unit::as_token)
    }

    /// The first document unit, when it is a single token.
    pub fn primary_document_token(&self) -> Option<usize> {
        self.document.first().and_then(Unit::as_token)
    }

    /// Render the link against the documents it was built from.
    pub fn describe(&self, query: &Document, document: &Document) -> String {
        let side = |units: &[Unit], doc: &Document| {
            units
                .iter()
                .map(|u| u.text(doc))
                .collect::<Vec<_>>()
                .join(" + ")
        };
        format!(
            "[{}] -> [{}] ({:.3}): {}",
            side(&self.query, query),
            side(&self.document, document),
            self.score,
            self.explanation
        )
    }
}
