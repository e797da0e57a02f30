//! Single-threaded task spawning and timers.
//!
//! In the browser tasks run on the page's event loop and timers are
//! `setTimeout`. Natively (tests) tasks run on the current tokio `LocalSet`
//! and timers are `tokio::time`, so a paused test clock drives them.

use std::cell::RefCell;
use std::future::Future;
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};

/// Run `future` to completion in the background on the current thread.
#[cfg(target_arch = "wasm32")]
pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

/// Run `future` to completion in the background on the current thread.
///
/// Must be called from within a `tokio::task::LocalSet`.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    drop(tokio::task::spawn_local(future));
}

/// Wait for `duration`.
#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

/// Wait for `duration`.
#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// Run `task` after `delay`.
pub fn spawn_after<F>(delay: Duration, task: F)
where
    F: FnOnce() + 'static,
{
    spawn(async move {
        sleep(delay).await;
        task();
    });
}

/// A restartable timer: scheduling again cancels the pending run.
///
/// Only the wait is cancellable. Once the delay has elapsed the task runs to
/// completion even if `schedule` is called again while it is in flight.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: RefCell<Option<AbortHandle>>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: RefCell::new(None),
        }
    }

    /// Cancel any pending run and schedule `task` after the delay.
    pub fn schedule<F, Fut>(&self, task: F)
    where
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        self.cancel();

        let (handle, registration) = AbortHandle::new_pair();
        *self.pending.borrow_mut() = Some(handle);

        let delay = self.delay;
        spawn(async move {
            if Abortable::new(sleep(delay), registration).await.is_ok() {
                task().await;
            }
        });
    }

    /// Cancel the pending run, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.borrow_mut().take() {
            handle.abort();
        }
    }
}
