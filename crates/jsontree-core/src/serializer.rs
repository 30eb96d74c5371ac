//! Renders a node tree back to JSON text.
//!
//! Output is always valid input for [`crate::parse`]. Two layouts are selected
//! by a single indent width:
//!
//! - **0 (canonical)**: no whitespace between tokens, `{"a":1,"b":[true,null]}`
//! - **N > 0**: each Object/Array element on its own line, prefixed by
//!   `N × depth` spaces; the closing bracket sits on its own line at the
//!   parent's depth. Key/value separators stay `:` without a space.
//!
//! Empty containers render as `{}` / `[]` in both layouts. A whole-number
//! Decimal is written with a `.0` suffix so it is not read back as a Long.

use crate::coerce::{format_date, format_instant};
use crate::node::Node;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// Indent width used by [`RenderOptions::pretty`] and `{:#}` formatting.
pub const DEFAULT_INDENT: usize = 2;

/// Serializer configuration, owned by the caller and passed per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Spaces per nesting level; 0 selects the canonical compact form.
    pub indent: usize,
}

impl RenderOptions {
    pub fn compact() -> Self {
        RenderOptions { indent: 0 }
    }

    pub fn pretty() -> Self {
        RenderOptions {
            indent: DEFAULT_INDENT,
        }
    }

    pub fn with_indent(indent: usize) -> Self {
        RenderOptions { indent }
    }
}

impl Node {
    /// Canonical (compact) JSON text.
    pub fn to_json(&self) -> String {
        self.to_json_with(&RenderOptions::compact())
    }

    /// Indented JSON text using [`DEFAULT_INDENT`].
    pub fn to_json_pretty(&self) -> String {
        self.to_json_with(&RenderOptions::pretty())
    }

    pub fn to_json_with(&self, options: &RenderOptions) -> String {
        let mut out = String::new();
        self.render(&mut out, options.indent, 0);
        log::trace!("rendered {} node into {} bytes", self.kind(), out.len());
        out
    }

    /// Append this node to `out`. `level` is the nesting depth of this node,
    /// which determines the indentation of its children when `indent > 0`.
    pub fn render(&self, out: &mut String, indent: usize, level: usize) {
        match self {
            Node::Null => out.push_str("null"),
            Node::String(s) => write_quoted(s, out),
            Node::Enum(symbol) => write_quoted(&symbol.name, out),
            Node::Decimal(d) => {
                out.push_str(&d.to_string());
                // Keep a dot so the text parses back as a Decimal.
                if d.scale() == 0 {
                    out.push_str(".0");
                }
            }
            Node::Integer(i) => out.push_str(&i.to_string()),
            Node::Long(l) => out.push_str(&l.to_string()),
            Node::Instant(t) => write_quoted(&format_instant(t), out),
            Node::Date(t) => write_quoted(&format_date(t), out),
            Node::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
            Node::Binary(bytes) => write_quoted(&STANDARD.encode(bytes), out),
            Node::Object(map) => {
                if map.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push('{');
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    break_line(out, indent, level + 1);
                    write_quoted(key, out);
                    out.push(':');
                    value.render(out, indent, level + 1);
                }
                break_line(out, indent, level);
                out.push('}');
            }
            Node::Array(items) => {
                if items.is_empty() {
                    out.push_str("[]");
                    return;
                }
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    break_line(out, indent, level + 1);
                    item.render(out, indent, level + 1);
                }
                break_line(out, indent, level);
                out.push(']');
            }
        }
    }
}

/// `{}` renders canonical JSON, `{:#}` renders with [`DEFAULT_INDENT`].
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = if f.alternate() {
            RenderOptions::pretty()
        } else {
            RenderOptions::compact()
        };
        f.write_str(&self.to_json_with(&options))
    }
}

/// Escape string content for a JSON string literal (without the quotes).
///
/// Emits `\" \\ \b \f \n \r \t`; every other character, `/` included, is
/// passed through verbatim.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(s, &mut out);
    out
}

fn escape_into(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
}

fn write_quoted(s: &str, out: &mut String) {
    out.push('"');
    escape_into(s, out);
    out.push('"');
}

fn break_line(out: &mut String, indent: usize, level: usize) {
    if indent > 0 {
        out.push('\n');
        out.extend(std::iter::repeat_n(' ', indent * level));
    }
}
