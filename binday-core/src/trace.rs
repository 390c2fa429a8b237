//! Debug trace scoped to a single lookup.
//!
//! Every step records what it decided. Lines are always forwarded to `tracing`; when
//! the lookup runs in debug mode they are also buffered so the tail can be attached to
//! a failure.

use std::collections::{BTreeMap, VecDeque};

use crate::ports::LookupError;

/// Number of trace lines attached to a failed lookup.
pub const TRACE_TAIL: usize = 50;

const MAX_LINES: usize = 500;
const MAX_SHOWN_VALUE: usize = 60;

/// Trace buffer owned by one lookup.
#[derive(Debug, Default)]
pub struct LookupTrace {
    verbose: bool,
    lines: VecDeque<String>,
}

impl LookupTrace {
    /// Create a trace; only a verbose trace keeps lines.
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            lines: VecDeque::new(),
        }
    }

    /// Whether lines are being kept.
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Record one line.
    pub fn record<S: Into<String>>(&mut self, line: S) {
        let line = line.into();
        tracing::debug!(target: "binday::trace", "{line}");

        if !self.verbose {
            return;
        }
        if self.lines.len() == MAX_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Record every field of a form, hiding the content of postback state fields.
    pub fn record_fields(&mut self, prefix: &str, fields: &BTreeMap<String, String>) {
        if !self.verbose {
            return;
        }
        self.record(format!("{prefix} fields ({} total):", fields.len()));
        for (name, value) in fields {
            let line = if name.starts_with("__") {
                format!("  {name}=[{} bytes]", value.len())
            } else if value.chars().count() <= MAX_SHOWN_VALUE {
                format!("  {name}={value:?}")
            } else {
                let shown: String = value.chars().take(MAX_SHOWN_VALUE - 3).collect();
                format!("  {name}={:?}", format!("{shown}..."))
            };
            self.record(line);
        }
    }

    /// The last `count` lines, oldest first.
    #[must_use]
    pub fn tail(&self, count: usize) -> Vec<&str> {
        let skip = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(skip).map(String::as_str).collect()
    }

    /// Attach the trace tail to a failure when running verbosely.
    #[must_use]
    pub fn attach(&self, error: LookupError) -> LookupError {
        if !self.verbose {
            return error;
        }
        LookupError::Traced {
            source: Box::new(error),
            trace: self.tail(TRACE_TAIL).join("\n"),
        }
    }
}
