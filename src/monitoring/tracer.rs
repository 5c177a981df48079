/*!
 * Tracing
 * Subscriber setup and timed spans for store operations
 */

use std::time::Instant;
use tracing::{debug, info, span, warn, Level, Span};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable switching log output to JSON
pub const ENV_TRACE_JSON: &str = "YUNVFS_TRACE_JSON";

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - YUNVFS_TRACE_JSON: Enable JSON output (default: false)
///
/// Logs go to stderr so they never mix with file contents printed on stdout.
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        debug!(json = use_json, "Tracing initialized");
    }
}

/// Span around one store operation, logging its duration when finished
pub struct OperationSpan {
    span: Span,
    start: Instant,
    operation: &'static str,
}

impl OperationSpan {
    pub fn new(operation: &'static str, path: &str) -> Self {
        let span = span!(
            Level::DEBUG,
            "store_op",
            operation,
            path,
            duration_ms = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
            operation,
        }
    }

    /// Run `f` inside the span
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        self.span.in_scope(f)
    }

    /// Record the elapsed time and outcome
    pub fn finish<T, E: std::fmt::Display>(self, result: &Result<T, E>) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        self.span.record("duration_ms", elapsed_ms);
        let _entered = self.span.enter();
        match result {
            Ok(_) => info!(operation = self.operation, elapsed_ms, "Store operation finished"),
            Err(e) => warn!(operation = self.operation, elapsed_ms, error = %e, "Store operation failed"),
        }
    }
}
