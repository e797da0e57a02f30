//! `tracing` subscriber setup.
//!
//! The page has no stdout, so the fmt layer writes through a caller-supplied
//! [`MakeWriter`]; the browser build passes the console writer from the `web`
//! module. Timestamps are disabled since `SystemTime` is unavailable on wasm32.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::DEFAULT_LOG_FILTER;

/// Build the subscriber: an `EnvFilter` from `filter` plus a plain fmt layer.
///
/// An unparseable `filter` falls back to [`DEFAULT_LOG_FILTER`].
pub fn subscriber<W>(filter: &str, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .without_time()
            .with_ansi(false)
            .with_writer(writer),
    )
}

/// Install the subscriber as the global default.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init<W>(filter: &str, writer: W) -> Result<(), TryInitError>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    subscriber(filter, writer).try_init()
}
