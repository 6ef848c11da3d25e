//! Annotated documents as produced by an external NLP annotator.
//!
//! The scorers never annotate text themselves. They borrow a [`Document`]
//! whose tokens already carry embedding vectors, entity ids and a
//! dependency parse, together with the entity and noun-chunk spans derived
//! from them.
//!
//! # Core Components
//!
//! - [`token::Token`] - A single annotated word
//! - [`span::Span`] - An entity mention or noun chunk over a token range
//! - [`document::Document`] - The validated, read-only token sequence
//! - [`parser::DocumentParser`] - Loads documents from the JSON wire format
//!
//! # Examples
//!
//! ```
//! use compsim::document::document::Document;
//! use compsim::document::token::Token;
//!
//! let doc = Document::builder()
//!     .token(Token::new("aspirin").with_entity_id("3").with_dep("nsubj").with_head(1))
//!     .token(Token::new("reduces").with_vector(vec![0.0, 1.0]).with_dep("ROOT").with_head(1))
//!     .token(Token::new("fever").with_entity_id("6").with_dep("dobj").with_head(1))
//!     .entity(0..1)
//!     .entity(2..3)
//!     .noun_chunk(0..1)
//!     .noun_chunk(2..3)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(doc.len(), 3);
//! assert_eq!(doc.entities().len(), 2);
//! assert_eq!(doc.text(), "aspirin reduces fever");
//! ```

pub mod document;
pub mod parser;
pub mod span;
pub mod token;

pub use self::document::{Document, DocumentBuilder};
pub use self::span::{Span, SpanKind};
pub use self::token::Token;
