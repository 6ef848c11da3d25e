//! JSON wire format for annotated documents.
//!
//! The annotator hands documents over as JSON objects:
//!
//! ```json
//! {
//!   "tokens": [
//!     {"text": "drug1", "entity_id": "3", "dep": "nsubj", "head": 1},
//!     {"text": "reduces", "vector": [0.0, 1.0, 0.0], "dep": "ROOT", "head": 1},
//!     {"text": "symptom2", "entity_id": "6", "dep": "dobj", "head": 1}
//!   ],
//!   "entities": [{"start": 0, "end": 1}, {"start": 2, "end": 3}],
//!   "noun_chunks": [{"start": 0, "end": 1}, {"start": 2, "end": 3}]
//! }
//! ```
//!
//! Every field except `tokens[].text` is optional. An `id` (UUID) may be
//! supplied to make token identities stable across runs; otherwise a random
//! one is assigned. Many documents can be supplied as JSON Lines.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::document::Document;
use crate::document::token::Token;
use crate::error::{CompsimError, Result};

/// Serialized span coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanRecord {
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub root: Option<usize>,
}

/// Serialized form of a [`Document`] before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub entities: Vec<SpanRecord>,
    #[serde(default)]
    pub noun_chunks: Vec<SpanRecord>,
}

impl TryFrom<AnnotatedDocument> for Document {
    type Error = CompsimError;

    fn try_from(raw: AnnotatedDocument) -> Result<Self> {
        let mut builder = Document::builder().tokens(raw.tokens);
        if let Some(id) = raw.id {
            builder = builder.id(id);
        }
        for span in raw.entities {
            builder = match span.root {
                Some(root) => builder.entity_with_root(span.start..span.end, root),
                None => builder.entity(span.start..span.end),
            };
        }
        for span in raw.noun_chunks {
            builder = match span.root {
                Some(root) => builder.noun_chunk_with_root(span.start..span.end, root),
                None => builder.noun_chunk(span.start..span.end),
            };
        }
        builder.build()
    }
}

/// Loads validated documents from JSON or JSON Lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentParser;

impl DocumentParser {
    /// Create a new parser.
    pub fn new() -> Self {
        DocumentParser
    }

    /// Parse a single JSON document.
    pub fn parse_str(&self, input: &str) -> Result<Document> {
        let raw: AnnotatedDocument = serde_json::from_str(input)?;
        Document::try_from(raw)
    }

    /// Parse a single JSON document from a file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let content = fs::read_to_string(path)?;
        self.parse_str(&content)
    }

    /// Parse one document per non-blank line.
    pub fn parse_jsonl(&self, input: &str) -> Result<Vec<Document>> {
        input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(line_num, line)| {
                self.parse_str(line).map_err(|e| {
                    CompsimError::invalid_document(format!("line {}: {e}", line_num + 1))
                })
            })
            .collect()
    }

    /// Parse a JSON Lines file.
    pub fn parse_jsonl_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Document>> {
        let content = fs::read_to_string(path)?;
        self.parse_jsonl(&content)
    }
}
