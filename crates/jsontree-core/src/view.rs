//! Read-only flat view of a tree as `complex name -> string`.
//!
//! Consumers such as configuration or template layers see a document as a flat
//! mapping. Nested Objects contribute dot-joined keys, Array elements
//! contribute their decimal index as a segment, and only nodes whose value
//! converts to a String are visible.

use crate::node::Node;
use crate::path::{split_points, SEPARATOR};
use indexmap::IndexMap;

pub trait DottedView {
    /// String value at `complex_name`, or `None` if absent, null, or not
    /// representable as a string.
    fn lookup(&self, complex_name: &str) -> Option<String>;

    /// Every visible entry, in document order.
    fn dump(&self) -> IndexMap<String, String>;
}

impl DottedView for Node {
    fn lookup(&self, complex_name: &str) -> Option<String> {
        resolve(self, complex_name)?.get_string().ok().flatten()
    }

    fn dump(&self) -> IndexMap<String, String> {
        let mut out = IndexMap::new();
        dump_into(self, None, &mut out);
        out
    }
}

/// Path lookup that, unlike [`Node::get`], also steps into Arrays by index.
fn resolve<'a>(node: &'a Node, complex_name: &str) -> Option<&'a Node> {
    match node {
        Node::Object(map) => {
            if let Some(child) = map.get(complex_name) {
                return Some(child);
            }
            split_points(complex_name).find_map(|(head, rest)| resolve(map.get(head)?, rest))
        }
        Node::Array(items) => {
            let (head, rest) = match complex_name.split_once(SEPARATOR) {
                Some((head, rest)) => (head, Some(rest)),
                None => (complex_name, None),
            };
            let child = items.get(head.parse::<usize>().ok()?)?;
            match rest {
                Some(rest) => resolve(child, rest),
                None => Some(child),
            }
        }
        _ => None,
    }
}

fn dump_into(node: &Node, prefix: Option<&str>, out: &mut IndexMap<String, String>) {
    match node {
        Node::Object(map) => {
            for (key, child) in map {
                dump_into(child, Some(&join(prefix, key)), out);
            }
        }
        Node::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                dump_into(child, Some(&join(prefix, &index.to_string())), out);
            }
        }
        scalar => {
            if let (Some(key), Ok(Some(text))) = (prefix, scalar.get_string()) {
                out.insert(key.to_string(), text);
            }
        }
    }
}

fn join(prefix: Option<&str>, segment: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}{SEPARATOR}{segment}"),
        None => segment.to_string(),
    }
}
