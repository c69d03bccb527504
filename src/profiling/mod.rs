//! Chrome Trace execution profiler.
//!
//! When the `profiling` feature is enabled, update passes record spans for
//! the whole pass, the scalar phase, and every parallel chunk, and
//! [`profiler::shutdown`] writes a **Chrome Trace Event JSON** file that can
//! be inspected with `chrome://tracing` or <https://ui.perfetto.dev>.
//!
//! ```bash
//! cargo test --features profiling
//! ```
//!
//! Without the feature every call compiles to a no-op.

pub mod profiler;
