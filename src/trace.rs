//! Step-by-step event trace of a branch-and-bound run.
//!
//! When the `trace` feature is enabled, the engine writes one tagged line per
//! decision to a [`TraceWriter`]. Tests replay these lines to check ordering
//! properties of the search that are not visible in its final result, such as
//! the upper bound never increasing.
//!
//! The trace output format is a series of tagged lines:
//! ```text
//! TRACE EVAL depth=<d> x=[<lo>,<hi>] y=[<lo>,<hi>] flo=<v> fhi=<v> ub=<v>
//! TRACE PRUNE depth=<d> flo=<v> ub=<v>
//! TRACE TIGHTEN ub=<v> evicted=<n> kept=<n>
//! TRACE LEAF depth=<d> flo=<v> fhi=<v> inserted=<bool> size=<n>
//! TRACE SPLIT depth=<d> width=<v>
//! ```

use std::fmt::Write;
use std::sync::{Mutex, MutexGuard};

/// A thread-safe buffer that collects trace lines.
pub struct TraceWriter {
    buffer: Mutex<String>,
}

impl TraceWriter {
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(String::with_capacity(64 * 1024)),
        }
    }

    // Writers never leave a partial line behind, so a poisoned buffer is
    // still valid.
    fn lock(&self) -> MutexGuard<'_, String> {
        self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write a trace line.
    pub fn write_line(&self, line: &str) {
        let mut buf = self.lock();
        buf.push_str(line);
        buf.push('\n');
    }

    /// Write a trace line using format args.
    pub fn write_fmt(&self, args: std::fmt::Arguments<'_>) {
        let mut buf = self.lock();
        let _ = buf.write_fmt(args);
        buf.push('\n');
    }

    /// Get all collected trace output.
    pub fn get_output(&self) -> String {
        self.lock().clone()
    }

    /// Get trace output as a vector of lines.
    pub fn get_lines(&self) -> Vec<String> {
        self.lock().lines().map(|s| s.to_string()).collect()
    }

    /// Lines carrying the given tag, e.g. `"TIGHTEN"`.
    pub fn lines_tagged(&self, tag: &str) -> Vec<String> {
        let prefix = format!("TRACE {} ", tag);
        self.lock()
            .lines()
            .filter(|l| l.starts_with(&prefix))
            .map(|s| s.to_string())
            .collect()
    }
}

impl Default for TraceWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the value of `key=<value>` from a trace line.
pub fn field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.split_whitespace()
        .find_map(|tok| tok.strip_prefix(key)?.strip_prefix('='))
}

/// Conditional trace output (only active with the `trace` feature).
#[cfg(feature = "trace")]
#[macro_export]
macro_rules! trace_write {
    ($tracer:expr, $($arg:tt)*) => {
        if let Some(tw) = $tracer {
            tw.write_fmt(format_args!($($arg)*));
        }
    };
}

/// No-op when the `trace` feature is disabled.
#[cfg(not(feature = "trace"))]
#[macro_export]
macro_rules! trace_write {
    ($tracer:expr, $($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}
