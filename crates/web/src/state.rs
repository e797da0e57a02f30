//! Page state shared across widgets.

use std::rc::Rc;

use crate::dom::Document;

/// Page state shared across all widgets.
///
/// Cheaply cloneable via `Rc`; every listener closure holds its own clone.
/// `!Send` since the page runs on a single thread.
pub struct PageState<D, A> {
    inner: Rc<PageStateInner<D, A>>,
}

struct PageStateInner<D, A> {
    document: D,
    api: A,
}

impl<D: Document, A> PageState<D, A> {
    /// Create a new page state.
    #[must_use]
    pub fn new(document: D, api: A) -> Self {
        Self {
            inner: Rc::new(PageStateInner { document, api }),
        }
    }

    /// Get a reference to the document.
    #[must_use]
    pub fn document(&self) -> &D {
        &self.inner.document
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.inner.api
    }
}

// Manual impl: `derive` would require `D: Clone, A: Clone`.
impl<D, A> Clone for PageState<D, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}
