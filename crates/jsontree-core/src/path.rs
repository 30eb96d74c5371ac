//! Dotted-path addressing over nested objects.
//!
//! A *complex name* such as `"server.http.port"` addresses a descendant through
//! Object nodes. At every level the whole remaining name is first tried as a
//! single flat key, so keys that themselves contain dots stay reachable. Only
//! when no such key exists is the name split hierarchically; reads try each
//! `.` from left to right and take the first split that resolves.
//!
//! Writing operations ([`Node::get_or_spawn`], [`Node::new_child`],
//! [`Node::put`]) always create the hierarchical form. A name spawned that way
//! is not visible afterwards as a flat key of the same composite string.

use crate::node::{Node, ObjectMap};

/// Separator between the segments of a complex name.
pub const SEPARATOR: char = '.';

impl Node {
    /// Read-only lookup. Returns `None` when any step of the path is missing
    /// or is not an Object.
    pub fn get(&self, complex_name: &str) -> Option<&Node> {
        let map = match self {
            Node::Object(map) => map,
            _ => return None,
        };
        if let Some(child) = map.get(complex_name) {
            return Some(child);
        }
        split_points(complex_name).find_map(|(head, rest)| map.get(head)?.get(rest))
    }

    pub fn get_mut(&mut self, complex_name: &str) -> Option<&mut Node> {
        let map = match self {
            Node::Object(map) => map,
            _ => return None,
        };
        if let Some(index) = map.get_index_of(complex_name) {
            return Some(&mut map[index]);
        }
        let (head, rest) = resolving_split(map, complex_name)?;
        map.get_mut(head)?.get_mut(rest)
    }

    /// Resolve for writing: missing intermediate and final nodes are created,
    /// and any non-Object node met along the way (including `self`) is replaced
    /// by an empty Object. An existing final node is returned untouched.
    pub fn get_or_spawn(&mut self, complex_name: &str) -> &mut Node {
        let map = self.make_object();
        if let Some(index) = map.get_index_of(complex_name) {
            return &mut map[index];
        }
        match complex_name.split_once(SEPARATOR) {
            Some((head, rest)) => child_entry(map, head).get_or_spawn(rest),
            None => child_entry(map, complex_name),
        }
    }

    /// Like [`Node::get_or_spawn`], but the final node is always reset to a
    /// fresh `Null`. An existing key keeps its position.
    pub fn new_child(&mut self, complex_name: &str) -> &mut Node {
        let map = self.make_object();
        if let Some(index) = map.get_index_of(complex_name) {
            map[index] = Node::Null;
            return &mut map[index];
        }
        match complex_name.split_once(SEPARATOR) {
            Some((head, rest)) => child_entry(map, head).new_child(rest),
            None => child_entry(map, complex_name),
        }
    }

    /// `get_or_spawn(complex_name).set(value)`.
    pub fn put(&mut self, complex_name: &str, value: impl Into<Node>) -> &mut Node {
        let slot = self.get_or_spawn(complex_name);
        slot.set(value);
        slot
    }

    /// Detach and return the addressed node. Sibling order is preserved.
    pub fn remove(&mut self, complex_name: &str) -> Option<Node> {
        let map = match self {
            Node::Object(map) => map,
            _ => return None,
        };
        if let Some(removed) = map.shift_remove(complex_name) {
            return Some(removed);
        }
        let (head, rest) = resolving_split(map, complex_name)?;
        map.get_mut(head)?.remove(rest)
    }

    /// Rewrite nested Objects into one level with dot-joined keys.
    ///
    /// `{"a":{"b":1,"c":{"d":2}},"e":[{"f":3}]}` becomes
    /// `{"a.b":1,"a.c.d":2,"e":[{"f":3}]}`. Arrays are not descended into and
    /// empty nested Objects are kept under their own key.
    pub fn flatten(&mut self) {
        let Node::Object(map) = self else {
            return;
        };
        let source = std::mem::take(map);
        let mut flat = ObjectMap::with_capacity(source.len());
        let mut folded = 0usize;
        for (key, mut value) in source {
            if matches!(&value, Node::Object(inner) if !inner.is_empty()) {
                value.flatten();
                if let Node::Object(inner) = value {
                    folded += 1;
                    for (child_key, child) in inner {
                        flat.insert(format!("{key}{SEPARATOR}{child_key}"), child);
                    }
                }
            } else {
                flat.insert(key, value);
            }
        }
        if folded > 0 {
            log::debug!("flatten folded {folded} nested objects into {} keys", flat.len());
        }
        *map = flat;
    }

    /// Prune every effectively-null entry, bottom-up, then demote this node
    /// to `Null` if nothing but nulls remained.
    pub fn collapse(&mut self) {
        match self {
            Node::Object(map) => {
                map.values_mut().for_each(Node::collapse);
                map.retain(|_, child| !child.is_null());
            }
            Node::Array(items) => {
                items.iter_mut().for_each(Node::collapse);
                items.retain(|child| !child.is_null());
            }
            _ => {}
        }
        if !self.is_null() && self.is_effectively_null() {
            log::debug!("collapse demoted an empty {} to Null", self.kind());
            *self = Node::Null;
        }
    }
}

/// Every `(head, rest)` split of a complex name, leftmost separator first.
pub(crate) fn split_points(complex_name: &str) -> impl Iterator<Item = (&str, &str)> {
    complex_name
        .match_indices(SEPARATOR)
        .map(move |(i, _)| (&complex_name[..i], &complex_name[i + 1..]))
}

/// The first split whose head is a child of `map` and whose rest resolves
/// beneath that child.
fn resolving_split<'n>(map: &ObjectMap, complex_name: &'n str) -> Option<(&'n str, &'n str)> {
    split_points(complex_name)
        .find(|(head, rest)| map.get(*head).is_some_and(|child| child.get(rest).is_some()))
}

fn child_entry<'a>(map: &'a mut ObjectMap, key: &str) -> &'a mut Node {
    map.entry(key.to_string()).or_default()
}
