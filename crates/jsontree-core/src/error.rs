//! Error types for parsing, coercion and rendering of node trees.

use crate::node::NodeKind;
use thiserror::Error;

/// Maximum number of characters of input echoed back in a parse error.
pub const CONTEXT_LIMIT: usize = 100;

/// Errors raised by the node engine.
///
/// A fourth, caller-defined error (the "missing value" case) is produced only by
/// the `require_*` accessors, through a closure the caller supplies. Any error
/// type used there must implement `From<NodeError>` so that the variants below
/// still propagate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The input text was not valid JSON.
    /// `position` is a byte offset into the input; `context` is the text starting
    /// at that offset, truncated to [`CONTEXT_LIMIT`] characters plus `...`.
    #[error("JSON parse error at position {position}: {message} (near `{context}`)")]
    Parse {
        position: usize,
        message: String,
        context: String,
    },

    /// A getter was called on a node whose kind cannot service it at all.
    #[error("Type mismatch: cannot read {found} node as {expected}")]
    TypeMismatch {
        expected: &'static str,
        found: NodeKind,
    },

    /// The node's kind is convertible to the target, but its content is not.
    #[error("Format error: cannot convert to {target}: {message}")]
    Format {
        target: &'static str,
        message: String,
    },
}

impl NodeError {
    /// Build a parse error positioned at `position` within `input`.
    pub(crate) fn parse_at(input: &str, position: usize, message: impl Into<String>) -> Self {
        NodeError::Parse {
            position,
            message: message.into(),
            context: context_snippet(input, position),
        }
    }

    pub(crate) fn mismatch(expected: &'static str, found: NodeKind) -> Self {
        NodeError::TypeMismatch { expected, found }
    }

    pub(crate) fn format(target: &'static str, message: impl ToString) -> Self {
        NodeError::Format {
            target,
            message: message.to_string(),
        }
    }

    /// Byte offset of a parse error, `None` for the other variants.
    pub fn position(&self) -> Option<usize> {
        match self {
            NodeError::Parse { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Text of `input` starting at byte `position`, cut at [`CONTEXT_LIMIT`] characters.
fn context_snippet(input: &str, position: usize) -> String {
    let start = position.min(input.len());
    // Positions always come from char boundaries, but stay safe on odd input.
    let tail = match input.get(start..) {
        Some(tail) => tail,
        None => return String::new(),
    };
    let mut chars = tail.chars();
    let snippet: String = chars.by_ref().take(CONTEXT_LIMIT).collect();
    if chars.next().is_some() {
        format!("{snippet}...")
    } else {
        snippet
    }
}

/// Convenience alias used throughout jsontree-core.
pub type Result<T> = std::result::Result<T, NodeError>;
