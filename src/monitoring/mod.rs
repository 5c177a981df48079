/*!
 * Monitoring
 * Structured logging setup
 */

mod tracer;

pub use tracer::{init_tracing, OperationSpan, ENV_TRACE_JSON};
