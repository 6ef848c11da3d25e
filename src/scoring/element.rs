//! The element scorer abstraction.

use std::fmt::Debug;

use crate::document::document::Document;
use crate::error::Result;
use crate::scoring::link::Link;

/// A strategy proposing candidate links between a query and a document.
///
/// Elements run in order inside a
/// [`CompositeScorer`](crate::scoring::aggregator::CompositeScorer). Each one
/// sees the links produced by the elements before it and returns only its
/// own new links; it never edits the prior ones.
pub trait ElementScorer: Send + Sync + Debug {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Propose links for `query` against `document`.
    fn score(&self, query: &Document, document: &Document, links: &[Link]) -> Result<Vec<Link>>;
}

impl<T: ElementScorer + ?Sized> ElementScorer for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn score(&self, query: &Document, document: &Document, links: &[Link]) -> Result<Vec<Link>> {
        (**self).score(query, document, links)
    }
}
