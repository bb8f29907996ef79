//! Operator-facing output.
//!
//! Each exchange is narrated with a short marker so results stand out when
//! scrolling back through a session. Write failures on the operator's
//! terminal are ignored; there is nowhere better to report them.

use std::fmt::Display;
use std::io::Write;

use serde_json::{Map, Value};

pub(crate) struct Console<W: Write> {
    out: W,
}

impl<W: Write> Console<W> {
    pub(crate) const fn new(out: W) -> Self {
        Self { out }
    }

    pub(crate) fn line(&mut self, text: impl Display) {
        let _ = writeln!(self.out, "{text}");
    }

    pub(crate) fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    pub(crate) fn sending(&mut self, text: impl Display) {
        self.line(format_args!("→ {text}"));
    }

    pub(crate) fn success(&mut self, text: impl Display) {
        self.line(format_args!("✓ {text}"));
    }

    pub(crate) fn failure(&mut self, text: impl Display) {
        self.line(format_args!("✗ {text}"));
    }

    pub(crate) fn waiting(&mut self, text: impl Display) {
        self.line(format_args!("⏳ {text}"));
    }

    pub(crate) fn detail(&mut self, key: &str, value: impl Display) {
        self.line(format_args!("  {key}: {value}"));
    }

    /// Prints every field of `fields` as an indented detail line.
    pub(crate) fn fields(&mut self, fields: &Map<String, Value>) {
        for (key, value) in fields {
            self.detail(key, render_value(value));
        }
    }

    /// Writes `text` without a newline and flushes so it shows before input.
    pub(crate) fn prompt(&mut self, text: &str) {
        let _ = write!(self.out, "{text}");
        let _ = self.out.flush();
    }

    pub(crate) fn flush(&mut self) {
        let _ = self.out.flush();
    }
}

/// Renders a JSON value for an operator: strings without quotes, missing
/// values as `none`.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::from("none"),
        other => other.to_string(),
    }
}

pub(crate) fn render_optional(value: Option<&Value>) -> String {
    value.map_or_else(|| String::from("none"), render_value)
}
