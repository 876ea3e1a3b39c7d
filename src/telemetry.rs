//! Structured logging setup.

use tracing::Subscriber;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter, Layer,
    Registry,
};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log_level` when set. Fails instead of
/// panicking if a subscriber is already installed.
pub fn init_tracing(log_level: &str, json_format: bool) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let registry = Registry::default().with(env_filter);

    if json_format {
        registry.with(json_layer()).try_init()
    } else {
        registry.with(pretty_layer()).try_init()
    }
}

fn json_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .json()
        .with_current_span(true)
        .with_target(true)
        .with_level(true)
}

fn pretty_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer().with_target(true).with_level(true).compact()
}
