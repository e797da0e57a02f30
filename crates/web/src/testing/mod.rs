//! Test doubles for running widgets natively.
//!
//! Available to this crate's tests and, through the `testing` feature, to the
//! integration tests. Drive timers with a paused tokio clock inside a
//! `LocalSet`:
//!
//! ```ignore
//! #[tokio::test(start_paused = true)]
//! async fn test_flow() {
//!     LocalSet::new().run_until(async {
//!         let doc = FakeDocument::from_html(PAGE);
//!         // wire widgets, dispatch events, advance time...
//!     }).await;
//! }
//! ```

mod api;
mod document;
mod selector;
mod tree;

pub use api::{ApiCall, FakeApi};
pub use document::{FakeDocument, FakeElement, FakeEvent, FakeObserver};
