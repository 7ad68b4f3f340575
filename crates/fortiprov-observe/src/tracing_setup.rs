//! Log and span output for the `fprov` binary.
//!
//! Everything is written through `tracing`. Provisioning runs produce one
//! `provision.step` span per dispatched step, so closing spans are printed
//! with their duration. `--otel` additionally exports those spans to stdout
//! as OpenTelemetry data.
//!
//! ```no_run
//! use fortiprov_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};
//!
//! init_tracing(verbosity_filter(1, false), false).expect("subscriber already set");
//! // ... run a command ...
//! shutdown_tracing();
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::sync::OnceLock;

/// Provider kept for `shutdown_tracing`; only set when `--otel` is on.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Install the process-wide subscriber.
///
/// `RUST_LOG` wins over `default_filter` when it parses. Fails if a global
/// subscriber is already installed.
pub fn init_tracing(
    default_filter: &str,
    enable_otel: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let otel_layer = enable_otel.then(|| {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("fortiprov");
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);
        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Flush exported spans before exit. Does nothing without `--otel`.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("fprov: failed to flush OpenTelemetry spans: {e}");
        }
    }
}

/// Default filter for the given `-v` count; `--quiet` only applies at zero.
pub fn verbosity_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "info,fortiprov=debug",
        _ => "trace",
    }
}
