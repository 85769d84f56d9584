//! Render `tracing` events into concise logfmt strings.
//!
//! Engine events are named with a snake_case message (`overlay_open`) and
//! carry structured fields (`overlay=enrollmentModal`). Hosts without a
//! terminal, such as a browser console, receive them as a single
//! `message key=value ...` line.

use std::fmt::{Debug, Write};

use tracing::{
    Event,
    field::{Field, Visit},
};

/// Rendered fields extracted from a tracing Event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLog {
    /// Severity level (e.g., INFO, WARN) for the event.
    pub level: String,
    /// Event target (typically the module path).
    pub target: String,
    /// Message followed by the remaining fields in `key=value` form.
    pub message: String,
}

impl RenderedLog {
    /// Full logfmt line including level and target.
    pub fn line(&self) -> String {
        format!(
            "level={} target={} {}",
            self.level.to_ascii_lowercase(),
            self.target,
            self.message
        )
    }
}

/// Quote a logfmt value when it contains spaces, quotes or `=`.
pub fn quote(value: &str) -> String {
    if !value.is_empty() && !value.contains([' ', '"', '=', '\t', '\n']) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Collects the `message` field and the remaining fields of an event.
#[derive(Default)]
struct LogfmtVisitor {
    /// Captured `message` field, if present.
    msg: Option<String>,
    /// Accumulated non-message fields rendered as `key=value`.
    fields: String,
}

impl LogfmtVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.msg = Some(value);
        } else {
            if !self.fields.is_empty() {
                self.fields.push(' ');
            }
            let _ignored = write!(self.fields, "{}={}", field.name(), quote(&value));
        }
    }
}

impl Visit for LogfmtVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }
    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.push(field, format!("{:?}", value));
    }
}

/// Extract level, target and a logfmt message from a tracing Event.
///
/// The `message` field leads; every other field follows as `key=value`.
pub fn render_event(event: &Event<'_>) -> RenderedLog {
    let meta = event.metadata();
    let mut vis = LogfmtVisitor::default();
    event.record(&mut vis);
    let message = match (vis.msg, vis.fields.is_empty()) {
        (Some(m), true) => m,
        (Some(m), false) => format!("{} {}", m, vis.fields),
        (None, _) => vis.fields,
    };
    RenderedLog {
        level: meta.level().to_string(),
        target: meta.target().to_string(),
        message,
    }
}
