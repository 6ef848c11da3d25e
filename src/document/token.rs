//! Annotated token type.

use serde::{Deserialize, Serialize};

/// A single annotated word.
///
/// Tokens are owned by their [`Document`](crate::document::Document); the
/// syntactic head is stored as an index into the same document rather than
/// a reference, so a token never owns or outlives its neighbours.
///
/// # Examples
///
/// ```
/// use compsim::document::token::Token;
///
/// let token = Token::new("cat")
///     .with_vector(vec![0.2, 0.9, 0.1])
///     .with_entity_id("0")
///     .with_dep("nsubj")
///     .with_head(2);
///
/// assert!(token.has_vector());
/// assert!(token.is_entity());
/// assert_eq!(token.head, Some(2));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Position of the token in its document (0-based). Assigned by the builder.
    #[serde(default)]
    pub index: usize,

    /// Surface text.
    pub text: String,

    /// Embedding vector; `None` for out-of-vocabulary tokens.
    #[serde(default)]
    pub vector: Option<Vec<f32>>,

    /// External concept id, empty when the token is not part of an entity.
    #[serde(default)]
    pub entity_id: String,

    /// Dependency label (e.g. `nsubj`, `dobj`, `ROOT`).
    #[serde(default)]
    pub dep: String,

    /// Index of the syntactic head. The sentence root points at itself.
    #[serde(default)]
    pub head: Option<usize>,

    /// Externally computed information content (e.g. inverse frequency).
    #[serde(default)]
    pub information_content: Option<f32>,
}

impl Token {
    /// Create a bare token with the given text.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Token {
            index: 0,
            text: text.into(),
            vector: None,
            entity_id: String::new(),
            dep: String::new(),
            head: None,
            information_content: None,
        }
    }

    /// Attach an embedding vector.
    pub fn with_vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = Some(vector);
        self
    }

    /// Attach an entity id.
    pub fn with_entity_id<S: Into<String>>(mut self, entity_id: S) -> Self {
        self.entity_id = entity_id.into();
        self
    }

    /// Set the dependency label.
    pub fn with_dep<S: Into<String>>(mut self, dep: S) -> Self {
        self.dep = dep.into();
        self
    }

    /// Set the index of the syntactic head.
    pub fn with_head(mut self, head: usize) -> Self {
        self.head = Some(head);
        self
    }

    /// Set the information content attribute.
    pub fn with_information_content(mut self, information_content: f32) -> Self {
        self.information_content = Some(information_content);
        self
    }

    /// Whether the token carries a usable (present, non-zero) vector.
    pub fn has_vector(&self) -> bool {
        self.vector
            .as_deref()
            .is_some_and(|v| v.iter().any(|x| *x != 0.0))
    }

    /// The vector, if it is usable.
    pub fn vector(&self) -> Option<&[f32]> {
        if self.has_vector() {
            self.vector.as_deref()
        } else {
            None
        }
    }

    /// Whether the token belongs to a named entity.
    pub fn is_entity(&self) -> bool {
        !self.entity_id.is_empty()
    }

    /// Low-information tokens (information content present and not positive)
    /// are excluded by the information-weighted scorer.
    pub fn is_informative(&self) -> bool {
        self.information_content.is_none_or(|ic| ic > 0.0)
    }
}
