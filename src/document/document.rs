//! Validated, read-only annotated document.

use std::ops::Range;

use uuid::Uuid;

use crate::document::span::{Span, SpanKind};
use crate::document::token::Token;
use crate::error::{CompsimError, Result};
use crate::util::simd;

/// An ordered sequence of annotated tokens plus the spans derived from them.
///
/// A `Document` is only obtainable through [`DocumentBuilder::build`], which
/// rejects malformed annotator output. Once built it is immutable; scorers
/// borrow it for the duration of a call.
///
/// The `id` gives tokens an identity across documents: two links refer to
/// the same token exactly when they agree on `(document id, token index)`.
/// Comparing a document with itself therefore shares every token.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: Uuid,
    tokens: Vec<Token>,
    entities: Vec<Span>,
    noun_chunks: Vec<Span>,
    dimension: Option<usize>,
}

impl Document {
    /// Start building a document.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// Identity of this document.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// All tokens in document order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Token at `index`, if any.
    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the document has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Entity spans, ordered and non-overlapping.
    pub fn entities(&self) -> &[Span] {
        &self.entities
    }

    /// Noun-chunk spans, ordered by start.
    pub fn noun_chunks(&self) -> &[Span] {
        &self.noun_chunks
    }

    /// Vector dimension shared by every vectorized token, if any token has one.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Token texts joined by single spaces.
    pub fn text(&self) -> String {
        self.join(0..self.tokens.len())
    }

    /// Text of a span.
    pub fn span_text(&self, span: &Span) -> String {
        self.join(span.token_range())
    }

    /// At most `max_chars` characters of the document text, for diagnostics.
    pub fn text_preview(&self, max_chars: usize) -> String {
        self.text().chars().take(max_chars).collect()
    }

    fn join(&self, range: Range<usize>) -> String {
        self.tokens[range]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Tokens that carry a usable vector, in document order.
    pub fn vectorized_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.has_vector())
    }

    /// Mean of the member vectors; members without a vector count as zeros.
    ///
    /// Returns `None` when no member has a vector.
    pub fn span_vector(&self, span: &Span) -> Option<Vec<f32>> {
        let dimension = self.dimension?;
        if !self.span_has_vector(span) {
            return None;
        }
        let mut sum = vec![0.0f32; dimension];
        for token in &self.tokens[span.token_range()] {
            if let Some(vector) = token.vector() {
                simd::add_assign_unchecked(&mut sum, vector);
            }
        }
        let count = span.len() as f32;
        for value in &mut sum {
            *value /= count;
        }
        Some(sum)
    }

    /// Whether the span has a usable aggregate vector.
    pub fn span_has_vector(&self, span: &Span) -> bool {
        self.tokens[span.token_range()].iter().any(|t| t.has_vector())
    }

    /// Entity id of a span, taken from its root token.
    pub fn span_entity_id(&self, span: &Span) -> &str {
        &self.tokens[span.root].entity_id
    }

    /// First noun chunk containing the token at `index`.
    pub fn noun_chunk_containing(&self, index: usize) -> Option<&Span> {
        self.noun_chunks.iter().find(|chunk| chunk.contains(index))
    }

    /// Syntactic head of the token at `index`, if the parse provides one.
    pub fn head_of(&self, index: usize) -> Option<&Token> {
        self.tokens
            .get(index)
            .and_then(|t| t.head)
            .and_then(|head| self.tokens.get(head))
    }
}

/// A builder for constructing validated documents in a fluent manner.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    id: Option<Uuid>,
    tokens: Vec<Token>,
    entities: Vec<(Range<usize>, Option<usize>)>,
    noun_chunks: Vec<(Range<usize>, Option<usize>)>,
}

impl DocumentBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed document id instead of a random one.
    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Append a token. Its `index` is assigned on build.
    pub fn token(mut self, token: Token) -> Self {
        self.tokens.push(token);
        self
    }

    /// Append several tokens.
    pub fn tokens<I: IntoIterator<Item = Token>>(mut self, tokens: I) -> Self {
        self.tokens.extend(tokens);
        self
    }

    /// Add an entity span; its root is derived from the parse.
    pub fn entity(mut self, range: Range<usize>) -> Self {
        self.entities.push((range, None));
        self
    }

    /// Add an entity span with an explicit root.
    pub fn entity_with_root(mut self, range: Range<usize>, root: usize) -> Self {
        self.entities.push((range, Some(root)));
        self
    }

    /// Add a noun chunk; its root is derived from the parse.
    pub fn noun_chunk(mut self, range: Range<usize>) -> Self {
        self.noun_chunks.push((range, None));
        self
    }

    /// Add a noun chunk with an explicit root.
    pub fn noun_chunk_with_root(mut self, range: Range<usize>, root: usize) -> Self {
        self.noun_chunks.push((range, Some(root)));
        self
    }

    /// Validate the annotations and build the document.
    pub fn build(self) -> Result<Document> {
        let mut tokens = self.tokens;
        let len = tokens.len();
        let mut dimension: Option<usize> = None;

        for (index, token) in tokens.iter_mut().enumerate() {
            token.index = index;

            if let Some(head) = token.head
                && head >= len
            {
                return Err(CompsimError::invalid_document(format!(
                    "token {index} ({}) has head {head} outside a document of {len} tokens",
                    token.text
                )));
            }

            if let Some(vector) = &token.vector {
                if !vector.iter().all(|x| x.is_finite()) {
                    return Err(CompsimError::invalid_document(format!(
                        "token {index} ({}) has a non-finite vector component",
                        token.text
                    )));
                }
                match dimension {
                    Some(expected) if expected != vector.len() => {
                        return Err(CompsimError::dimension_mismatch(expected, vector.len()));
                    }
                    _ => dimension = Some(vector.len()),
                }
            }
        }

        let entities = resolve_spans(&tokens, self.entities, SpanKind::Entity)?;
        for pair in entities.windows(2) {
            if pair[0].overlaps(&pair[1]) {
                return Err(CompsimError::invalid_document(format!(
                    "entity spans {}..{} and {}..{} overlap",
                    pair[0].start, pair[0].end, pair[1].start, pair[1].end
                )));
            }
        }
        let noun_chunks = resolve_spans(&tokens, self.noun_chunks, SpanKind::NounChunk)?;

        Ok(Document {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            tokens,
            entities,
            noun_chunks,
            dimension,
        })
    }
}

fn resolve_spans(
    tokens: &[Token],
    ranges: Vec<(Range<usize>, Option<usize>)>,
    kind: SpanKind,
) -> Result<Vec<Span>> {
    let mut spans = Vec::with_capacity(ranges.len());
    for (range, root) in ranges {
        if range.start >= range.end {
            return Err(CompsimError::invalid_document(format!(
                "{kind:?} span {}..{} is empty",
                range.start, range.end
            )));
        }
        if range.end > tokens.len() {
            return Err(CompsimError::invalid_document(format!(
                "{kind:?} span {}..{} exceeds document length {}",
                range.start,
                range.end,
                tokens.len()
            )));
        }
        if let Some(previous) = spans.last().map(|s: &Span| s.start)
            && range.start < previous
        {
            return Err(CompsimError::invalid_document(format!(
                "{kind:?} spans are not ordered: {}..{} follows a span starting at {previous}",
                range.start, range.end
            )));
        }
        let root = match root {
            Some(root) if range.contains(&root) => root,
            Some(root) => {
                return Err(CompsimError::invalid_document(format!(
                    "{kind:?} span {}..{} has root {root} outside the span",
                    range.start, range.end
                )));
            }
            None => derive_root(tokens, &range),
        };
        spans.push(Span {
            kind,
            start: range.start,
            end: range.end,
            root,
        });
    }
    Ok(spans)
}

/// The first member whose head leaves the span (or is itself / missing).
fn derive_root(tokens: &[Token], range: &Range<usize>) -> usize {
    range
        .clone()
        .find(|&i| match tokens[i].head {
            Some(head) => head == i || !range.contains(&head),
            None => true,
        })
        .unwrap_or(range.start)
}
