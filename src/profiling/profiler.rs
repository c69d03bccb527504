//! Chrome Trace ("flame style") profiling of update passes.
//!
//! Feature-gated with `--features profiling`.
//!
//! Usage:
//!   group_update::profiler::init("profile/trace.json");
//!   {
//!     let _g = group_update::profiler::span("GroupUpdater::execute");
//!     // run updates...
//!   }
//!   group_update::profiler::shutdown();

use std::borrow::Cow;
use std::path::Path;

#[cfg(feature = "profiling")]
mod enabled {
    use std::fs::File;
    use std::io::{BufWriter, Write};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::{Mutex, OnceLock};
    use std::time::Instant;

    use serde_json::{json, Map, Value};

    use super::*;


    struct ProfilerState {
        start: Instant,
        out_path: PathBuf,
        is_on: AtomicBool,
        events: Mutex<Vec<Value>>,
    }

    static STATE: OnceLock<ProfilerState> = OnceLock::new();
    static NEXT_TID: AtomicU64 = AtomicU64::new(1);

    thread_local! {
        static TID: u64 = NEXT_TID.fetch_add(1, Ordering::Relaxed);
    }

    fn now_us(st: &ProfilerState) -> u64 {
        st.start.elapsed().as_micros() as u64
    }

    /// Initialize the profiler and set the output path.
    pub fn init<P: AsRef<Path>>(path: P) {
        let _ = STATE.set(ProfilerState {
            start: Instant::now(),
            out_path: path.as_ref().to_path_buf(),
            is_on: AtomicBool::new(true),
            events: Mutex::new(Vec::new()),
        });
    }

    /// Stop recording and write the Chrome Trace JSON.
    pub fn shutdown() {
        if let Some(st) = STATE.get() {
            st.is_on.store(false, Ordering::Release);
            if let Err(e) = write_trace_file(st) {
                tracing::error!(error = %e, path = %st.out_path.display(), "failed to write trace");
            }
        }
    }

    fn write_trace_file(st: &ProfilerState) -> std::io::Result<()> {
        let events = match st.events.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };

        if let Some(parent) = st.out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut w = BufWriter::new(File::create(&st.out_path)?);
        serde_json::to_writer(&mut w, &json!({ "traceEvents": events }))?;
        w.flush()
    }

    fn push_event(st: &ProfilerState, event: Value) {
        if !st.is_on.load(Ordering::Acquire) {
            return;
        }
        if let Ok(mut guard) = st.events.lock() {
            guard.push(event);
        }
    }

    /// Create a profiling span.
    pub fn span(name: impl Into<super::SpanName>) -> SpanGuard {
        match STATE.get() {
            Some(st) if st.is_on.load(Ordering::Acquire) => SpanGuard {
                name: name.into().0.into_owned(),
                ts0: now_us(st),
                tid: TID.with(|t| *t),
                args: Map::new(),
                active: true,
            },
            _ => SpanGuard::disabled(),
        }
    }

    /// A RAII guard that records a Chrome Trace complete event on drop.
    pub struct SpanGuard {
        name: String,
        ts0: u64,
        tid: u64,
        args: Map<String, Value>,
        active: bool,
    }

    impl SpanGuard {
        fn disabled() -> Self {
            Self {
                name: String::new(),
                ts0: 0,
                tid: 0,
                args: Map::new(),
                active: false,
            }
        }

        /// Attach an argument to this span (builder-style).
        #[inline]
        pub fn arg(mut self, key: impl Into<String>, value: super::Arg) -> Self {
            if self.active {
                self.args.insert(key.into(), value.into_json());
            }
            self
        }
    }

    impl super::Arg {
        fn into_json(self) -> Value {
            match self {
                super::Arg::Str(s) => Value::String(s.to_owned()),
                super::Arg::U64(v) => json!(v),
            }
        }
    }

    impl Drop for SpanGuard {
        fn drop(&mut self) {
            if !self.active {
                return;
            }
            let Some(st) = STATE.get() else { return };
            let dur = now_us(st).saturating_sub(self.ts0);
            let mut event = json!({
                "name": std::mem::take(&mut self.name),
                "cat": "group_update",
                "ph": "X",
                "ts": self.ts0,
                "dur": dur,
                "pid": 1,
                "tid": self.tid,
            });
            if !self.args.is_empty() {
                event["args"] = Value::Object(std::mem::take(&mut self.args));
            }
            push_event(st, event);
        }
    }
}

#[cfg(not(feature = "profiling"))]
mod disabled {
    use super::*;

    /// Initialize profiler (no-op when profiling is disabled).
    #[inline]
    pub fn init<P: AsRef<Path>>(_path: P) {}

    /// Shut down profiler (no-op).
    #[inline]
    pub fn shutdown() {}

    /// Create profiling span (no-op).
    #[inline]
    pub fn span(_name: impl Into<super::SpanName>) -> SpanGuard {
        SpanGuard
    }

    /// No-op span guard.
    pub struct SpanGuard;

    impl SpanGuard {
        /// Attach an argument to this span (builder-style; no-op).
        #[inline]
        pub fn arg(self, _key: impl Into<String>, _value: super::Arg) -> Self {
            self
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API surface (stable regardless of feature flag)
// ─────────────────────────────────────────────────────────────────────────────

/// A span name; accepts `&'static str`, `String`, or `Cow<'static, str>`.
pub struct SpanName(pub Cow<'static, str>);

impl From<&'static str> for SpanName {
    fn from(s: &'static str) -> Self {
        SpanName(Cow::Borrowed(s))
    }
}
impl From<String> for SpanName {
    fn from(s: String) -> Self {
        SpanName(Cow::Owned(s))
    }
}
impl From<Cow<'static, str>> for SpanName {
    fn from(s: Cow<'static, str>) -> Self {
        SpanName(s)
    }
}

/// Argument value for profiling spans.
///
/// Serialized into the `args` field of Chrome Trace events.
pub enum Arg {
    /// Static string value; only copied when the span is recorded.
    Str(&'static str),

    /// Unsigned 64-bit integer value.
    U64(u64),
}

#[cfg(feature = "profiling")]
pub use enabled::{init, shutdown, span, SpanGuard};

#[cfg(not(feature = "profiling"))]
pub use disabled::{init, shutdown, span, SpanGuard};
